//! Candidate slot generation.
//!
//! Turns a resolved provider day into the ordered, finite sequence of
//! bookable intervals. Conflict state is layered on elsewhere; the generator
//! only knows the working window, the break, and the slot/buffer sizes.

use crate::models::schedule::{DayAvailability, ResolvedDay};
use crate::models::time::{Interval, TimeOfDay};

/// Iterator over the candidate slots of one working day.
///
/// A cursor advances from the window start in steps of
/// `slot_minutes + buffer_minutes`. A candidate that overlaps the break
/// window is never emitted truncated: the cursor jumps to the break end and
/// the candidate is re-tested. Generation stops once a full slot no longer
/// fits before the window end.
pub struct SlotIter {
    cursor: u16,
    window_end: u16,
    slot_minutes: u16,
    step: u16,
    break_window: Option<Interval>,
}

impl SlotIter {
    pub fn new(day: &ResolvedDay) -> Self {
        Self {
            cursor: day.window.start.minutes(),
            window_end: day.window.end.minutes(),
            slot_minutes: day.slot_minutes,
            step: day.slot_minutes.saturating_add(day.buffer_minutes),
            break_window: day.break_window,
        }
    }
}

impl Iterator for SlotIter {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        // A non-positive duration would loop forever; emit nothing.
        if self.slot_minutes == 0 {
            return None;
        }
        loop {
            let end = self.cursor.checked_add(self.slot_minutes)?;
            if end > self.window_end {
                return None;
            }
            let candidate = Interval {
                start: TimeOfDay(self.cursor),
                end: TimeOfDay(end),
            };
            if let Some(break_window) = self.break_window {
                if candidate.overlaps(&break_window) {
                    self.cursor = break_window.end.minutes();
                    continue;
                }
            }
            self.cursor = self.cursor.saturating_add(self.step);
            return Some(candidate);
        }
    }
}

/// Convenience wrapper: the candidate slots for a resolved day, empty when
/// the day is closed.
pub fn candidate_slots(day: &DayAvailability) -> Vec<Interval> {
    match day {
        DayAvailability::Closed { .. } => Vec::new(),
        DayAvailability::Open(resolved) => SlotIter::new(resolved).collect(),
    }
}
