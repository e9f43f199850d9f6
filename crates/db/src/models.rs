use chrono::{DateTime, NaiveDate, Utc};
use eyre::{Report, eyre};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use vetbook_core::models::appointment::Appointment;
use vetbook_core::models::availability::{AvailabilitySnapshot, Slot};
use vetbook_core::models::provider::{Pet, Provider};
use vetbook_core::models::schedule::{DayConfig, ScheduleException, WeeklyTemplate};
use vetbook_core::models::time::TimeOfDay;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbProvider {
    pub id: Uuid,
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbProvider> for Provider {
    fn from(row: DbProvider) -> Self {
        Self {
            id: row.id,
            name: row.name,
            active: row.active,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbPet {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<DbPet> for Pet {
    fn from(row: DbPet) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWeeklyTemplate {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub version: i32,
    pub created_at: DateTime<Utc>,
}

/// One weekday row of a template version; `weekday` is 0 (Monday) .. 6.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbTemplateDay {
    pub template_id: Uuid,
    pub weekday: i16,
    pub active: bool,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub break_start_minutes: Option<i32>,
    pub break_end_minutes: Option<i32>,
    pub slot_minutes: i32,
    pub buffer_minutes: i32,
    pub max_per_day: Option<i32>,
}

fn time_of_day(minutes: i32) -> Result<TimeOfDay, Report> {
    u16::try_from(minutes)
        .ok()
        .and_then(|m| TimeOfDay::from_minutes(m).ok())
        .ok_or_else(|| eyre!("Stored time of day out of range: {} minutes", minutes))
}

fn optional_time_of_day(minutes: Option<i32>) -> Result<Option<TimeOfDay>, Report> {
    minutes.map(time_of_day).transpose()
}

impl DbTemplateDay {
    pub fn into_day_config(self) -> Result<DayConfig, Report> {
        Ok(DayConfig {
            active: self.active,
            start: time_of_day(self.start_minutes)?,
            end: time_of_day(self.end_minutes)?,
            break_start: optional_time_of_day(self.break_start_minutes)?,
            break_end: optional_time_of_day(self.break_end_minutes)?,
            slot_minutes: u16::try_from(self.slot_minutes)
                .map_err(|_| eyre!("Stored slot duration out of range: {}", self.slot_minutes))?,
            buffer_minutes: u16::try_from(self.buffer_minutes)
                .map_err(|_| eyre!("Stored buffer out of range: {}", self.buffer_minutes))?,
            max_per_day: self
                .max_per_day
                .map(|m| {
                    u16::try_from(m).map_err(|_| eyre!("Stored daily limit out of range: {}", m))
                })
                .transpose()?,
        })
    }
}

/// Assembles a template version from its header row and its seven day rows,
/// which must arrive ordered by weekday.
pub fn assemble_template(
    header: DbWeeklyTemplate,
    days: Vec<DbTemplateDay>,
) -> Result<WeeklyTemplate, Report> {
    if days.len() != 7 {
        return Err(eyre!(
            "Template {} has {} day rows, expected 7",
            header.id,
            days.len()
        ));
    }
    let days = days
        .into_iter()
        .map(DbTemplateDay::into_day_config)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WeeklyTemplate {
        id: header.id,
        provider_id: header.provider_id,
        version: header.version,
        days,
        created_at: header.created_at,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbScheduleException {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub all_day: bool,
    pub start_minutes: Option<i32>,
    pub end_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbScheduleException> for ScheduleException {
    type Error = Report;

    fn try_from(row: DbScheduleException) -> Result<Self, Report> {
        Ok(Self {
            id: row.id,
            provider_id: row.provider_id,
            date: row.date,
            reason: row.reason,
            all_day: row.all_day,
            start: optional_time_of_day(row.start_minutes)?,
            end: optional_time_of_day(row.end_minutes)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAppointment {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub pet_id: Uuid,
    pub date: NaiveDate,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub status: String,
    pub reason: Option<String>,
    pub check_in_at: Option<DateTime<Utc>>,
    pub check_out_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbAppointment> for Appointment {
    type Error = Report;

    fn try_from(row: DbAppointment) -> Result<Self, Report> {
        Ok(Self {
            id: row.id,
            provider_id: row.provider_id,
            pet_id: row.pet_id,
            date: row.date,
            start_time: time_of_day(row.start_minutes)?,
            end_time: time_of_day(row.end_minutes)?,
            status: row
                .status
                .parse()
                .map_err(|e| eyre!("Stored appointment status invalid: {}", e))?,
            reason: row.reason,
            check_in_at: row.check_in_at,
            check_out_at: row.check_out_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbAvailabilitySnapshot {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub slots: serde_json::Value,
    pub generated_at: DateTime<Utc>,
    pub template_version: i32,
}

impl TryFrom<DbAvailabilitySnapshot> for AvailabilitySnapshot {
    type Error = Report;

    fn try_from(row: DbAvailabilitySnapshot) -> Result<Self, Report> {
        let slots: Vec<Slot> = serde_json::from_value(row.slots)
            .map_err(|e| eyre!("Stored snapshot slots invalid: {}", e))?;
        Ok(Self {
            provider_id: row.provider_id,
            date: row.date,
            slots,
            generated_at: row.generated_at,
            template_version: row.template_version,
        })
    }
}
