use pretty_assertions::assert_eq;
use vetbook_core::models::schedule::{DayAvailability, ResolvedDay};
use vetbook_core::models::time::{Interval, TimeOfDay};
use vetbook_core::slots::{SlotIter, candidate_slots};

fn t(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

fn interval(start: &str, end: &str) -> Interval {
    Interval::new(t(start), t(end)).expect("valid interval")
}

fn resolved(
    start: &str,
    end: &str,
    break_window: Option<(&str, &str)>,
    slot_minutes: u16,
    buffer_minutes: u16,
) -> ResolvedDay {
    ResolvedDay {
        window: interval(start, end),
        break_window: break_window.map(|(s, e)| interval(s, e)),
        slot_minutes,
        buffer_minutes,
        max_per_day: None,
        template_window: None,
    }
}

#[test]
fn test_full_working_day_with_break_and_buffer() {
    // 08:00-17:00, break 12:00-13:00, 30 minute slots, 5 minute buffer:
    // slots advance in steps of 35 and skip the break entirely.
    let day = resolved("08:00", "17:00", Some(("12:00", "13:00")), 30, 5);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    assert_eq!(slots[0], interval("08:00", "08:30"));
    assert_eq!(slots[1], interval("08:35", "09:05"));

    // The last morning slot ends exactly at the break start
    assert_eq!(slots[6], interval("11:30", "12:00"));
    // The first afternoon slot resumes at the break end
    assert_eq!(slots[7], interval("13:00", "13:30"));

    assert_eq!(slots.len(), 14);

    let break_window = interval("12:00", "13:00");
    assert!(slots.iter().all(|slot| !slot.overlaps(&break_window)));
    assert!(slots.iter().all(|slot| slot.end <= t("17:00")));
    assert_eq!(slots.last(), Some(&interval("16:30", "17:00")));
}

#[test]
fn test_no_break_no_buffer() {
    let day = resolved("09:00", "10:00", None, 30, 0);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    assert_eq!(
        slots,
        vec![interval("09:00", "09:30"), interval("09:30", "10:00")]
    );
}

#[test]
fn test_slots_are_ordered_and_disjoint() {
    let day = resolved("08:00", "18:00", Some(("12:30", "13:15")), 20, 10);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    assert!(!slots.is_empty());
    for pair in slots.windows(2) {
        assert!(pair[0].end <= pair[1].start);
        assert!(!pair[0].overlaps(&pair[1]));
    }
}

#[test]
fn test_candidate_overlapping_break_is_not_truncated() {
    // 11:45 + 30 overlaps the break; the generator must jump to the break
    // end rather than emit a shortened 11:45-12:00 slot.
    let day = resolved("11:00", "14:00", Some(("12:00", "13:00")), 30, 15);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    // 11:00-11:30 emits, 11:45-12:15 is skipped over the break, 13:00-13:30
    // emits, and 13:45-14:15 no longer fits.
    assert_eq!(
        slots,
        vec![interval("11:00", "11:30"), interval("13:00", "13:30")]
    );
}

#[test]
fn test_zero_duration_yields_no_slots() {
    let day = resolved("09:00", "17:00", None, 0, 5);
    assert_eq!(SlotIter::new(&day).count(), 0);
}

#[test]
fn test_slot_longer_than_window_yields_no_slots() {
    let day = resolved("09:00", "09:20", None, 30, 0);
    assert_eq!(SlotIter::new(&day).count(), 0);
}

#[test]
fn test_break_at_window_end() {
    let day = resolved("15:00", "17:00", Some(("16:30", "17:00")), 30, 0);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    assert_eq!(
        slots,
        vec![
            interval("15:00", "15:30"),
            interval("15:30", "16:00"),
            interval("16:00", "16:30"),
        ]
    );
}

#[test]
fn test_closed_day_has_no_candidates() {
    let closed = DayAvailability::Closed {
        reason: "Public holiday".to_string(),
    };
    assert!(candidate_slots(&closed).is_empty());
}

#[test]
fn test_open_day_candidates_match_iterator() {
    let day = resolved("09:00", "12:00", None, 45, 0);
    let from_iter: Vec<Interval> = SlotIter::new(&day).collect();
    let from_helper = candidate_slots(&DayAvailability::Open(day));

    assert_eq!(from_helper, from_iter);
}

#[test]
fn test_break_outside_window_has_no_effect() {
    // An override window may sit entirely before the template break.
    let day = resolved("08:00", "11:00", Some(("12:00", "13:00")), 60, 0);
    let slots: Vec<Interval> = SlotIter::new(&day).collect();

    assert_eq!(
        slots,
        vec![
            interval("08:00", "09:00"),
            interval("09:00", "10:00"),
            interval("10:00", "11:00"),
        ]
    );
}
