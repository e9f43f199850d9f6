use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::errors::BookingError;

/// Minutes in a full day; `TimeOfDay` may equal this to represent midnight
/// at the end of the day (a valid working-window end).
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Wall-clock time of day, stored as minutes since midnight.
///
/// The service runs in a single fixed time zone, so schedules and
/// appointments carry plain `HH:MM` values. Parsing and formatting happen
/// here, once, at the boundary; everything else works in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(pub(crate) u16);

impl TimeOfDay {
    pub fn from_minutes(minutes: u16) -> Result<Self, BookingError> {
        if minutes > MINUTES_PER_DAY {
            return Err(BookingError::Validation(format!(
                "Time of day out of range: {} minutes since midnight",
                minutes
            )));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl FromStr for TimeOfDay {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::Validation(format!("Invalid time of day: {:?}", s));

        let (hours, minutes) = s.split_once(':').ok_or_else(invalid)?;
        let hours: u16 = hours.parse().map_err(|_| invalid())?;
        let minutes: u16 = minutes.parse().map_err(|_| invalid())?;

        if hours > 23 || minutes > 59 {
            return Err(invalid());
        }
        Ok(Self(hours * 60 + minutes))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A half-open `[start, end)` interval of wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

impl Interval {
    pub fn new(start: TimeOfDay, end: TimeOfDay) -> Result<Self, BookingError> {
        if end <= start {
            return Err(BookingError::Validation(format!(
                "Interval end {} must be after start {}",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.0 - self.start.0
    }

    /// The overlap rule for half-open intervals. Every overlap check in the
    /// codebase goes through this predicate; do not re-derive it elsewhere.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely within this interval.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
