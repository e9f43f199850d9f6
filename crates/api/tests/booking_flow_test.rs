mod test_utils;

use chrono::{NaiveDate, Utc};
use pretty_assertions::assert_eq;
use uuid::Uuid;
use vetbook_core::booking::validate_booking;
use vetbook_core::errors::BookingError;
use vetbook_core::models::appointment::{Appointment, AppointmentStatus};
use vetbook_core::models::schedule::{DayAvailability, ResolvedDay};
use vetbook_core::models::time::Interval;
use vetbook_db::repositories::appointment::AppointmentWrite;

use test_utils::{TestContext, appointment_row, sample_pet, sample_provider, t};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

fn open_day() -> DayAvailability {
    DayAvailability::Open(ResolvedDay {
        window: Interval::new(t("08:00"), t("17:00")).expect("valid interval"),
        break_window: None,
        slot_minutes: 30,
        buffer_minutes: 0,
        max_per_day: None,
        template_window: None,
    })
}

// Drives the create-appointment decision sequence against the mocked
// repository surface: collaborator existence reads, the live-ledger conflict
// check, then the insert that may lose the uniqueness race.
async fn attempt_booking(
    ctx: &TestContext,
    provider_id: Uuid,
    pet_id: Uuid,
    date: NaiveDate,
    candidate: Interval,
    day: &DayAvailability,
) -> Result<Appointment, BookingError> {
    let provider = ctx
        .provider_repo
        .get_provider_by_id(provider_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Provider {} not found", provider_id)))?;

    if !provider.active {
        return Err(BookingError::Schedule(format!(
            "Provider {} is not accepting appointments",
            provider.id
        )));
    }

    ctx.provider_repo
        .get_pet_by_id(pet_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Pet {} not found", pet_id)))?;

    let rows = ctx
        .appointment_repo
        .get_active_appointments(provider_id, date)
        .await
        .map_err(BookingError::Database)?;
    let mut booked = Vec::with_capacity(rows.len());
    for row in rows {
        let appointment = Appointment::try_from(row).map_err(BookingError::Database)?;
        booked.push(appointment.interval());
    }

    validate_booking(day, candidate, &booked)?;

    let now = Utc::now();
    let appointment = Appointment {
        id: Uuid::new_v4(),
        provider_id,
        pet_id,
        date,
        start_time: candidate.start,
        end_time: candidate.end,
        status: AppointmentStatus::Scheduled,
        reason: None,
        check_in_at: None,
        check_out_at: None,
        created_at: now,
        updated_at: now,
    };

    match ctx
        .appointment_repo
        .create_appointment(appointment)
        .await
        .map_err(BookingError::Database)?
    {
        AppointmentWrite::Persisted(row) => {
            Appointment::try_from(row).map_err(BookingError::Database)
        }
        AppointmentWrite::SlotTaken => Err(BookingError::Conflict {
            interval: candidate,
        }),
    }
}

#[tokio::test]
async fn test_booking_over_an_existing_appointment_conflicts() {
    let mut ctx = TestContext::new();
    let provider = sample_provider(true);
    let provider_id = provider.id;
    let pet = sample_pet();
    let pet_id = pet.id;

    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.provider_repo
        .expect_get_pet_by_id()
        .returning(move |_| Ok(Some(pet.clone())));
    ctx.appointment_repo
        .expect_get_active_appointments()
        .returning(move |p, d| Ok(vec![appointment_row(p, d, "09:00", "09:30", "scheduled")]));

    let candidate = Interval::new(t("09:15"), t("09:45")).expect("valid interval");
    let result =
        attempt_booking(&ctx, provider_id, pet_id, monday(), candidate, &open_day()).await;

    match result.unwrap_err() {
        BookingError::Conflict { interval } => {
            assert_eq!(interval, Interval::new(t("09:00"), t("09:30")).expect("valid interval"));
        }
        other => panic!("Expected Conflict error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_losing_the_insert_race_surfaces_as_a_conflict() {
    let mut ctx = TestContext::new();
    let provider = sample_provider(true);
    let provider_id = provider.id;
    let pet = sample_pet();
    let pet_id = pet.id;

    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.provider_repo
        .expect_get_pet_by_id()
        .returning(move |_| Ok(Some(pet.clone())));
    // The application-level check sees an empty day...
    ctx.appointment_repo
        .expect_get_active_appointments()
        .returning(|_, _| Ok(Vec::new()));
    // ...but a concurrent booking wins the unique index.
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(|_| Ok(AppointmentWrite::SlotTaken));

    let candidate = Interval::new(t("09:00"), t("09:30")).expect("valid interval");
    let result =
        attempt_booking(&ctx, provider_id, pet_id, monday(), candidate, &open_day()).await;

    assert!(matches!(result.unwrap_err(), BookingError::Conflict { .. }));
}

#[tokio::test]
async fn test_successful_booking_lands_in_scheduled_status() {
    let mut ctx = TestContext::new();
    let provider = sample_provider(true);
    let provider_id = provider.id;
    let pet = sample_pet();
    let pet_id = pet.id;

    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.provider_repo
        .expect_get_pet_by_id()
        .returning(move |_| Ok(Some(pet.clone())));
    ctx.appointment_repo
        .expect_get_active_appointments()
        .returning(|_, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(|appointment| {
            Ok(AppointmentWrite::Persisted(appointment_row(
                appointment.provider_id,
                appointment.date,
                "09:00",
                "09:30",
                "scheduled",
            )))
        });

    let candidate = Interval::new(t("09:00"), t("09:30")).expect("valid interval");
    let appointment = attempt_booking(&ctx, provider_id, pet_id, monday(), candidate, &open_day())
        .await
        .expect("booking succeeds");

    assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    assert_eq!(appointment.interval(), candidate);
}

#[tokio::test]
async fn test_unknown_provider_is_not_found() {
    let mut ctx = TestContext::new();
    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(|_| Ok(None));

    let candidate = Interval::new(t("09:00"), t("09:30")).expect("valid interval");
    let result = attempt_booking(
        &ctx,
        Uuid::new_v4(),
        Uuid::new_v4(),
        monday(),
        candidate,
        &open_day(),
    )
    .await;

    assert!(matches!(result.unwrap_err(), BookingError::NotFound(_)));
}

#[tokio::test]
async fn test_inactive_provider_rejects_bookings() {
    let mut ctx = TestContext::new();
    let provider = sample_provider(false);

    let provider_id = provider.id;
    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(move |_| Ok(Some(provider.clone())));

    let candidate = Interval::new(t("09:00"), t("09:30")).expect("valid interval");
    let result = attempt_booking(
        &ctx,
        provider_id,
        Uuid::new_v4(),
        monday(),
        candidate,
        &open_day(),
    )
    .await;

    assert!(matches!(result.unwrap_err(), BookingError::Schedule(_)));
}

#[tokio::test]
async fn test_terminal_statuses_free_the_interval() {
    let mut ctx = TestContext::new();
    let provider = sample_provider(true);
    let provider_id = provider.id;
    let pet = sample_pet();
    let pet_id = pet.id;

    ctx.provider_repo
        .expect_get_provider_by_id()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.provider_repo
        .expect_get_pet_by_id()
        .returning(move |_| Ok(Some(pet.clone())));
    // The ledger query filters to active statuses, so a cancelled
    // appointment at 09:00 never reaches the conflict check.
    ctx.appointment_repo
        .expect_get_active_appointments()
        .returning(|_, _| Ok(Vec::new()));
    ctx.appointment_repo
        .expect_create_appointment()
        .returning(|appointment| {
            Ok(AppointmentWrite::Persisted(appointment_row(
                appointment.provider_id,
                appointment.date,
                "09:00",
                "09:30",
                "scheduled",
            )))
        });

    let candidate = Interval::new(t("09:00"), t("09:30")).expect("valid interval");
    attempt_booking(&ctx, provider_id, pet_id, monday(), candidate, &open_day())
        .await
        .expect("the freed slot books again");
}
