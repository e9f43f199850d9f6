use pretty_assertions::assert_eq;
use vetbook_core::models::availability::{Slot, SlotStatus, build_day_slots};
use vetbook_core::models::schedule::{DayAvailability, ResolvedDay};
use vetbook_core::models::time::{Interval, TimeOfDay};
use vetbook_core::slots::candidate_slots;

fn t(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

fn interval(start: &str, end: &str) -> Interval {
    Interval::new(t(start), t(end)).expect("valid interval")
}

fn slot(start: &str, end: &str, status: SlotStatus) -> Slot {
    Slot {
        start: t(start),
        end: t(end),
        status,
    }
}

fn open_day(day: ResolvedDay) -> DayAvailability {
    DayAvailability::Open(day)
}

fn plain_day(start: &str, end: &str, slot_minutes: u16) -> ResolvedDay {
    ResolvedDay {
        window: interval(start, end),
        break_window: None,
        slot_minutes,
        buffer_minutes: 0,
        max_per_day: None,
        template_window: None,
    }
}

#[test]
fn test_booked_intervals_mark_their_slots() {
    let day = open_day(plain_day("09:00", "12:00", 60));
    let booked = vec![interval("10:00", "11:00")];

    let slots = build_day_slots(&day, &booked);

    assert_eq!(
        slots,
        vec![
            slot("09:00", "10:00", SlotStatus::Available),
            slot("10:00", "11:00", SlotStatus::Booked),
            slot("11:00", "12:00", SlotStatus::Available),
        ]
    );
}

#[test]
fn test_partial_overlap_books_every_touched_slot() {
    let day = open_day(plain_day("09:00", "11:00", 30));
    // A manually-placed appointment straddling two generated slots
    let booked = vec![interval("09:15", "09:45")];

    let slots = build_day_slots(&day, &booked);

    assert_eq!(slots[0], slot("09:00", "09:30", SlotStatus::Booked));
    assert_eq!(slots[1], slot("09:30", "10:00", SlotStatus::Booked));
    assert_eq!(slots[2], slot("10:00", "10:30", SlotStatus::Available));
}

#[test]
fn test_break_window_appears_as_break_entry() {
    let mut day = plain_day("09:00", "13:00", 60);
    day.break_window = Some(interval("11:00", "12:00"));
    let slots = build_day_slots(&open_day(day), &[]);

    assert_eq!(
        slots,
        vec![
            slot("09:00", "10:00", SlotStatus::Available),
            slot("10:00", "11:00", SlotStatus::Available),
            slot("11:00", "12:00", SlotStatus::Break),
            slot("12:00", "13:00", SlotStatus::Available),
        ]
    );
}

#[test]
fn test_exception_cutoffs_appear_as_blocked_entries() {
    // Template would give 08:00-17:00; a partial-day exception narrowed the
    // day to 09:00-12:00.
    let mut day = plain_day("09:00", "12:00", 60);
    day.template_window = Some(interval("08:00", "17:00"));
    let slots = build_day_slots(&open_day(day), &[]);

    assert_eq!(slots.first(), Some(&slot("08:00", "09:00", SlotStatus::Blocked)));
    assert_eq!(slots.last(), Some(&slot("12:00", "17:00", SlotStatus::Blocked)));
    assert_eq!(
        slots
            .iter()
            .filter(|s| s.status == SlotStatus::Available)
            .count(),
        3
    );
}

#[test]
fn test_closed_day_yields_no_slots() {
    let closed = DayAvailability::Closed {
        reason: "Public holiday".to_string(),
    };
    assert!(build_day_slots(&closed, &[interval("09:00", "09:30")]).is_empty());
}

#[test]
fn test_snapshot_slots_agree_with_the_generator() {
    let day = open_day(ResolvedDay {
        window: interval("08:00", "17:00"),
        break_window: Some(interval("12:00", "13:00")),
        slot_minutes: 30,
        buffer_minutes: 5,
        max_per_day: None,
        template_window: None,
    });
    let booked = vec![interval("09:10", "09:40"), interval("14:10", "14:40")];

    let generated = candidate_slots(&day);
    let snapshot = build_day_slots(&day, &booked);

    // Every generated candidate appears exactly once, as available or booked
    let bookable: Vec<Interval> = snapshot
        .iter()
        .filter(|s| matches!(s.status, SlotStatus::Available | SlotStatus::Booked))
        .map(Slot::interval)
        .collect();
    assert_eq!(bookable, generated);

    // And a slot is available exactly when no active appointment overlaps it
    for entry in snapshot
        .iter()
        .filter(|s| matches!(s.status, SlotStatus::Available | SlotStatus::Booked))
    {
        let overlapping = booked.iter().any(|b| b.overlaps(&entry.interval()));
        let expected = if overlapping {
            SlotStatus::Booked
        } else {
            SlotStatus::Available
        };
        assert_eq!(entry.status, expected);
    }
}
