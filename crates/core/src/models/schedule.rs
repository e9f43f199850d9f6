use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult};
use crate::models::time::{Interval, TimeOfDay};

/// Working hours for a single weekday of a provider's recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayConfig {
    pub active: bool,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    pub break_start: Option<TimeOfDay>,
    pub break_end: Option<TimeOfDay>,
    pub slot_minutes: u16,
    pub buffer_minutes: u16,
    pub max_per_day: Option<u16>,
}

impl DayConfig {
    pub fn window(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }

    pub fn break_window(&self) -> Option<Interval> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some(Interval { start, end }),
            _ => None,
        }
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.end <= self.start {
            return Err(BookingError::Validation(format!(
                "Day end {} must be after start {}",
                self.end, self.start
            )));
        }
        match (self.break_start, self.break_end) {
            (None, None) => {}
            (Some(break_start), Some(break_end)) => {
                if break_end <= break_start {
                    return Err(BookingError::Validation(format!(
                        "Break end {} must be after break start {}",
                        break_end, break_start
                    )));
                }
                if break_start < self.start || break_end > self.end {
                    return Err(BookingError::Validation(format!(
                        "Break {}-{} must lie within working hours {}-{}",
                        break_start, break_end, self.start, self.end
                    )));
                }
            }
            _ => {
                return Err(BookingError::Validation(
                    "Break start and end must be provided together".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A provider's recurring weekly schedule, one `DayConfig` per weekday
/// starting from Monday. Edits create a new version; versions are never
/// deleted, and availability snapshots record the version they were built
/// from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyTemplate {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub version: i32,
    pub days: Vec<DayConfig>,
    pub created_at: DateTime<Utc>,
}

impl WeeklyTemplate {
    pub fn day_for(&self, date: NaiveDate) -> &DayConfig {
        &self.days[date.weekday().num_days_from_monday() as usize]
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.days.len() != 7 {
            return Err(BookingError::Validation(format!(
                "Weekly template must have 7 day configs, got {}",
                self.days.len()
            )));
        }
        for day in &self.days {
            day.validate()?;
        }
        Ok(())
    }
}

/// A date-specific override of the weekly template: either the whole day is
/// unavailable, or custom working hours replace the template window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleException {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub all_day: bool,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    pub created_at: DateTime<Utc>,
}

impl ScheduleException {
    pub fn window(&self) -> Option<Interval> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(Interval { start, end }),
            _ => None,
        }
    }

    pub fn validate(&self) -> BookingResult<()> {
        if self.all_day {
            if self.start.is_some() || self.end.is_some() {
                return Err(BookingError::Validation(
                    "An all-day exception must not carry custom hours".to_string(),
                ));
            }
            return Ok(());
        }
        match (self.start, self.end) {
            (Some(start), Some(end)) if end > start => Ok(()),
            (Some(_), Some(_)) => Err(BookingError::Validation(
                "Exception end must be after start".to_string(),
            )),
            _ => Err(BookingError::Validation(
                "A partial-day exception must carry custom start and end".to_string(),
            )),
        }
    }
}

/// One provider day after merging the weekly template with any exception.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayAvailability {
    /// The provider does not work this date.
    Closed { reason: String },
    Open(ResolvedDay),
}

impl DayAvailability {
    pub fn working_window(&self) -> Option<Interval> {
        match self {
            DayAvailability::Closed { .. } => None,
            DayAvailability::Open(day) => Some(day.window),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDay {
    pub window: Interval,
    pub break_window: Option<Interval>,
    pub slot_minutes: u16,
    pub buffer_minutes: u16,
    pub max_per_day: Option<u16>,
    /// The window the template alone would give, when an exception override
    /// replaced it. Used to mark the cut-off portions as blocked.
    pub template_window: Option<Interval>,
}

/// Merges a weekday config with an optional exception into the day's
/// effective availability.
///
/// An all-day exception closes the day regardless of the template. A
/// partial-day exception replaces the working window (opening the day even
/// if the weekday is flagged inactive); the template break still applies
/// where it intersects the override window.
pub fn resolve_day(
    day: &DayConfig,
    exception: Option<&ScheduleException>,
) -> BookingResult<DayAvailability> {
    if let Some(exception) = exception {
        if exception.all_day {
            return Ok(DayAvailability::Closed {
                reason: exception.reason.clone(),
            });
        }
        let window = exception.window().ok_or_else(|| {
            BookingError::Validation(
                "A partial-day exception must carry custom start and end".to_string(),
            )
        })?;
        return Ok(DayAvailability::Open(ResolvedDay {
            window,
            break_window: day.break_window(),
            slot_minutes: day.slot_minutes,
            buffer_minutes: day.buffer_minutes,
            max_per_day: day.max_per_day,
            template_window: day.active.then(|| day.window()),
        }));
    }

    if !day.active {
        return Ok(DayAvailability::Closed {
            reason: "Not scheduled to work".to_string(),
        });
    }

    Ok(DayAvailability::Open(ResolvedDay {
        window: day.window(),
        break_window: day.break_window(),
        slot_minutes: day.slot_minutes,
        buffer_minutes: day.buffer_minutes,
        max_per_day: day.max_per_day,
        template_window: None,
    }))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetTemplateRequest {
    pub days: Vec<DayConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub version: i32,
    pub days: Vec<DayConfig>,
    pub created_at: DateTime<Utc>,
}

impl From<WeeklyTemplate> for TemplateResponse {
    fn from(template: WeeklyTemplate) -> Self {
        Self {
            id: template.id,
            provider_id: template.provider_id,
            version: template.version,
            days: template.days,
            created_at: template.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExceptionRequest {
    pub date: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub all_day: bool,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub all_day: bool,
    pub start: Option<TimeOfDay>,
    pub end: Option<TimeOfDay>,
    pub created_at: DateTime<Utc>,
}

impl From<ScheduleException> for ExceptionResponse {
    fn from(exception: ScheduleException) -> Self {
        Self {
            id: exception.id,
            provider_id: exception.provider_id,
            date: exception.date,
            reason: exception.reason,
            all_day: exception.all_day,
            start: exception.start,
            end: exception.end,
            created_at: exception.created_at,
        }
    }
}
