use pretty_assertions::assert_eq;
use vetbook_api::config::DefaultScheduleConfig;
use vetbook_core::models::time::TimeOfDay;

fn t(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

#[test]
fn test_default_schedule_expands_to_a_working_week() {
    let config = DefaultScheduleConfig {
        start: t("09:00"),
        end: t("17:00"),
        break_start: Some(t("12:00")),
        break_end: Some(t("13:00")),
        slot_minutes: 30,
        buffer_minutes: 5,
    };

    let days = config.days();
    assert_eq!(days.len(), 7);

    // Monday through Friday work the configured hours
    for day in &days[..5] {
        assert!(day.active);
        assert_eq!(day.start, t("09:00"));
        assert_eq!(day.end, t("17:00"));
        assert_eq!(day.slot_minutes, 30);
        assert_eq!(day.buffer_minutes, 5);
        day.validate().expect("valid day config");
    }

    // The weekend is off
    assert!(!days[5].active);
    assert!(!days[6].active);
}

#[test]
fn test_default_schedule_without_break() {
    let config = DefaultScheduleConfig {
        start: t("08:00"),
        end: t("16:00"),
        break_start: None,
        break_end: None,
        slot_minutes: 20,
        buffer_minutes: 0,
    };

    for day in config.days() {
        assert_eq!(day.break_window(), None);
        day.validate().expect("valid day config");
    }
}
