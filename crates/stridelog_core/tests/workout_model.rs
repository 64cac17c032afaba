use stridelog_core::{
    DerivedMetric, Discipline, DisciplineData, Position, WorkoutFields, WorkoutId, WorkoutRecord,
    WorkoutValidationError,
};

// 2024-04-05T12:00:00Z
const APRIL_5_MS: i64 = 1_712_318_400_000;

fn kyiv() -> Position {
    Position::new(50.0, 30.0)
}

#[test]
fn running_pace_is_duration_over_distance() {
    let record = WorkoutRecord::create_at(
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(5.0, 25.0, 170.0),
        APRIL_5_MS,
    )
    .unwrap();

    assert_eq!(record.discipline(), Discipline::Running);
    assert_eq!(record.pace_min_per_km(), Some(5.0));
    assert_eq!(record.speed_km_per_h(), None);
    assert_eq!(record.cadence(), Some(170.0));
    assert_eq!(record.elevation_gain_m(), None);
    assert_eq!(record.description(), "Running on April 5");
    assert_eq!(record.interaction_count(), 0);
}

#[test]
fn cycling_speed_is_distance_per_hour() {
    let record = WorkoutRecord::create_at(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(20.0, 60.0, 300.0),
        APRIL_5_MS,
    )
    .unwrap();

    assert_eq!(record.derived(), DerivedMetric::Speed(20.0));
    assert_eq!(
        record.data(),
        DisciplineData::Cycling {
            elevation_gain_m: 300.0
        }
    );
    assert_eq!(record.description(), "Cycling on April 5");
}

#[test]
fn create_stamps_current_day_into_description() {
    let record = WorkoutRecord::create(
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(5.0, 25.0, 170.0),
    )
    .unwrap();

    assert!(record.description().starts_with("Running on "));
    assert!(record.created_at_ms() > APRIL_5_MS);
    assert!(!record.id().as_str().is_empty());
}

#[test]
fn metric_formulas_hold_for_assorted_inputs() {
    for (distance, duration) in [(1.0, 1.0), (0.5, 3.25), (42.195, 210.0), (123.4, 0.75)] {
        let run = WorkoutRecord::create(
            Discipline::Running,
            kyiv(),
            WorkoutFields::new(distance, duration, 160.0),
        )
        .unwrap();
        assert_eq!(run.pace_min_per_km(), Some(duration / distance));

        let ride = WorkoutRecord::create(
            Discipline::Cycling,
            kyiv(),
            WorkoutFields::new(distance, duration, -40.0),
        )
        .unwrap();
        assert_eq!(ride.speed_km_per_h(), Some(distance / (duration / 60.0)));
    }
}

#[test]
fn non_positive_distance_or_duration_is_rejected() {
    let err = WorkoutRecord::create(
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(-1.0, 25.0, 170.0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        WorkoutValidationError::NonPositive {
            field: "distance_km"
        }
    );

    let err = WorkoutRecord::create(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(10.0, 0.0, 100.0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        WorkoutValidationError::NonPositive {
            field: "duration_min"
        }
    );
}

#[test]
fn non_finite_inputs_are_rejected_before_sign_checks() {
    let err = WorkoutRecord::create(
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(-1.0, f64::NAN, 170.0),
    )
    .unwrap_err();
    assert_eq!(
        err,
        WorkoutValidationError::NonFinite {
            field: "duration_min"
        }
    );

    let err = WorkoutRecord::create(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(10.0, 30.0, f64::INFINITY),
    )
    .unwrap_err();
    assert_eq!(
        err,
        WorkoutValidationError::NonFinite {
            field: "elevation_gain_m"
        }
    );

    let err = WorkoutRecord::create(
        Discipline::Cycling,
        Position::new(f64::NAN, 30.0),
        WorkoutFields::new(10.0, 30.0, 0.0),
    )
    .unwrap_err();
    assert_eq!(err, WorkoutValidationError::NonFinite { field: "latitude" });
}

#[test]
fn cadence_must_be_positive_but_elevation_may_be_negative() {
    let err = WorkoutRecord::create(
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(5.0, 25.0, 0.0),
    )
    .unwrap_err();
    assert_eq!(err, WorkoutValidationError::NonPositive { field: "cadence" });

    let descent = WorkoutRecord::create(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(30.0, 45.0, -250.0),
    )
    .unwrap();
    assert_eq!(descent.elevation_gain_m(), Some(-250.0));
}

#[test]
fn recompute_is_idempotent() {
    let mut record = WorkoutRecord::create_at(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(33.0, 71.0, 120.0),
        APRIL_5_MS,
    )
    .unwrap();
    let original = record.clone();

    record.recompute();
    let once = record.derived();
    record.recompute();

    assert_eq!(record.derived(), once);
    assert_eq!(record, original);
}

#[test]
fn restore_keeps_supplied_identity() {
    let id = WorkoutId::parse("1712318400").unwrap();
    let record = WorkoutRecord::restore(
        id.clone(),
        APRIL_5_MS,
        Discipline::Running,
        kyiv(),
        WorkoutFields::new(10.0, 55.0, 178.0),
    )
    .unwrap();

    assert_eq!(record.id(), &id);
    assert_eq!(record.created_at_ms(), APRIL_5_MS);
    assert_eq!(record.pace_min_per_km(), Some(5.5));
}

#[test]
fn marker_label_prefixes_discipline_glyph() {
    let record = WorkoutRecord::create_at(
        Discipline::Cycling,
        kyiv(),
        WorkoutFields::new(20.0, 60.0, 300.0),
        APRIL_5_MS,
    )
    .unwrap();

    assert_eq!(record.marker_label(), "🚴 Cycling on April 5");
    assert_eq!(record.fields(), WorkoutFields::new(20.0, 60.0, 300.0));
}

#[test]
fn position_map_url_points_at_coordinates() {
    assert_eq!(
        Position::new(50.45, 30.52).map_url(),
        "https://www.google.com/maps/@50.45,30.52,16z"
    );
}
