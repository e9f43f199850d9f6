//! Booking-conflict validation.
//!
//! The single decision path used by create, update and reschedule: a
//! requested interval must fall inside the resolved working window and must
//! not overlap any active appointment. Callers load the live ledger for the
//! provider/date (never the availability snapshot) and pass the active
//! intervals here.

use crate::errors::{BookingError, BookingResult};
use crate::models::schedule::DayAvailability;
use crate::models::time::Interval;

/// Returns the intervals in `existing` that overlap `candidate`, in input
/// order.
pub fn find_conflicts(candidate: Interval, existing: &[Interval]) -> Vec<Interval> {
    existing
        .iter()
        .filter(|interval| interval.overlaps(&candidate))
        .copied()
        .collect()
}

/// Validates a requested booking interval against the resolved day and the
/// day's active appointment intervals.
///
/// `existing` must hold only active-status intervals, with the appointment
/// being rescheduled (if any) already excluded by the caller.
pub fn validate_booking(
    day: &DayAvailability,
    candidate: Interval,
    existing: &[Interval],
) -> BookingResult<()> {
    let resolved = match day {
        DayAvailability::Closed { reason } => {
            return Err(BookingError::Schedule(format!(
                "Provider is unavailable: {}",
                reason
            )));
        }
        DayAvailability::Open(resolved) => resolved,
    };

    if !resolved.window.contains(&candidate) {
        return Err(BookingError::Schedule(format!(
            "Requested time {} is outside working hours {}",
            candidate, resolved.window
        )));
    }

    if let Some(max_per_day) = resolved.max_per_day {
        if existing.len() >= max_per_day as usize {
            return Err(BookingError::Schedule(format!(
                "Provider has reached the daily limit of {} appointments",
                max_per_day
            )));
        }
    }

    if let Some(conflict) = find_conflicts(candidate, existing).into_iter().next() {
        return Err(BookingError::Conflict { interval: conflict });
    }

    Ok(())
}
