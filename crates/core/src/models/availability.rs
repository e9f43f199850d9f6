use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::schedule::DayAvailability;
use crate::models::time::{Interval, TimeOfDay};
use crate::slots::candidate_slots;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Booked,
    Break,
    Blocked,
}

/// A status-annotated slot as stored in snapshots and returned by
/// availability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub status: SlotStatus,
}

impl Slot {
    pub fn interval(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Cached, materialized slot list for one provider/date.
///
/// A read optimization only: it records when it was generated and from which
/// template version, and it is never consulted for a commit decision. Writes
/// to the day's appointments leave it stale until the next regeneration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<Slot>,
    pub generated_at: DateTime<Utc>,
    pub template_version: i32,
}

/// Builds the status-annotated slot list for one provider day.
///
/// Generated slots are marked booked when they overlap a live active
/// appointment. The break window is carried as a `break` entry, and portions
/// of the template window cut off by a partial-day exception appear as
/// `blocked` entries, so a day view renders without consulting the template.
pub fn build_day_slots(day: &DayAvailability, booked: &[Interval]) -> Vec<Slot> {
    let resolved = match day {
        DayAvailability::Closed { .. } => return Vec::new(),
        DayAvailability::Open(resolved) => resolved,
    };

    let mut slots: Vec<Slot> = candidate_slots(day)
        .into_iter()
        .map(|interval| Slot {
            start: interval.start,
            end: interval.end,
            status: if booked.iter().any(|b| b.overlaps(&interval)) {
                SlotStatus::Booked
            } else {
                SlotStatus::Available
            },
        })
        .collect();

    if let Some(break_window) = resolved.break_window {
        if break_window.overlaps(&resolved.window) {
            slots.push(Slot {
                start: break_window.start,
                end: break_window.end,
                status: SlotStatus::Break,
            });
        }
    }

    if let Some(template_window) = resolved.template_window {
        if template_window.start < resolved.window.start {
            slots.push(Slot {
                start: template_window.start,
                end: resolved.window.start,
                status: SlotStatus::Blocked,
            });
        }
        if resolved.window.end < template_window.end {
            slots.push(Slot {
                start: resolved.window.end,
                end: template_window.end,
                status: SlotStatus::Blocked,
            });
        }
    }

    slots.sort_by_key(|slot| slot.start);
    slots
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAvailabilityResponse {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub available: bool,
    pub working_window: Option<Interval>,
    pub slots: Vec<Slot>,
    pub generated_at: DateTime<Utc>,
    pub template_version: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableProviderEntry {
    pub provider_id: Uuid,
    pub name: String,
    pub available: bool,
    pub slots: Vec<Slot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableProvidersResponse {
    pub date: NaiveDate,
    pub providers: Vec<AvailableProviderEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAvailabilityRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateAvailabilityResponse {
    pub provider_id: Uuid,
    pub dates_processed: Vec<NaiveDate>,
}
