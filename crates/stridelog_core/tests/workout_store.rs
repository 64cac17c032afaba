use stridelog_core::{
    Discipline, Position, SortView, StoreError, WorkoutFields, WorkoutId, WorkoutRecord,
    WorkoutStore, WorkoutValidationError,
};

fn run(distance_km: f64) -> WorkoutRecord {
    WorkoutRecord::create(
        Discipline::Running,
        Position::new(50.0, 30.0),
        WorkoutFields::new(distance_km, distance_km * 5.0, 170.0),
    )
    .unwrap()
}

fn ride(distance_km: f64) -> WorkoutRecord {
    WorkoutRecord::create(
        Discipline::Cycling,
        Position::new(51.0, 31.0),
        WorkoutFields::new(distance_km, 60.0, 300.0),
    )
    .unwrap()
}

fn distances(records: &[&WorkoutRecord]) -> Vec<f64> {
    records.iter().map(|record| record.distance_km()).collect()
}

#[test]
fn add_keeps_creation_order() {
    let mut store = WorkoutStore::new();
    let first = run(10.0);
    let second = ride(3.0);
    let ids = vec![first.id().clone(), second.id().clone()];

    store.add(first).unwrap();
    store.add(second).unwrap();

    let stored: Vec<WorkoutId> = store.records().iter().map(|r| r.id().clone()).collect();
    assert_eq!(stored, ids);
    assert_eq!(store.len(), 2);
}

#[test]
fn add_rejects_duplicate_id() {
    let mut store = WorkoutStore::new();
    let record = run(5.0);
    store.add(record.clone()).unwrap();

    let err = store.add(record.clone()).unwrap_err();
    assert_eq!(err, StoreError::DuplicateId(record.id().clone()));
    assert_eq!(store.len(), 1);
}

#[test]
fn from_records_rejects_duplicates() {
    let record = run(5.0);
    let err = WorkoutStore::from_records(vec![record.clone(), record]).unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId(_)));
}

#[test]
fn remove_then_find_returns_not_found() {
    let mut store = WorkoutStore::new();
    let record = run(5.0);
    let id = record.id().clone();
    store.add(record).unwrap();

    let removed = store.remove(&id).unwrap();
    assert_eq!(removed.id(), &id);
    assert_eq!(store.find(&id).unwrap_err(), StoreError::NotFound(id.clone()));
    assert_eq!(store.remove(&id).unwrap_err(), StoreError::NotFound(id));
}

#[test]
fn replace_fields_preserves_identity_and_updates_metric() {
    let mut store = WorkoutStore::new();
    let record = run(5.0);
    let id = record.id().clone();
    let created_at = record.created_at_ms();
    let description = record.description().to_string();
    store.add(record).unwrap();
    store.mark_interacted(&id).unwrap();

    let updated = store
        .replace_fields(&id, WorkoutFields::new(8.0, 48.0, 182.0))
        .unwrap();

    assert_eq!(updated.id(), &id);
    assert_eq!(updated.created_at_ms(), created_at);
    assert_eq!(updated.discipline(), Discipline::Running);
    assert_eq!(updated.pace_min_per_km(), Some(6.0));
    assert_eq!(updated.cadence(), Some(182.0));
    assert_eq!(updated.description(), description);
    assert_eq!(updated.interaction_count(), 1);
}

#[test]
fn replace_fields_keeps_discipline_payload_kind() {
    let mut store = WorkoutStore::new();
    let record = ride(20.0);
    let id = record.id().clone();
    store.add(record).unwrap();

    let updated = store
        .replace_fields(&id, WorkoutFields::new(30.0, 90.0, -120.0))
        .unwrap();
    assert_eq!(updated.elevation_gain_m(), Some(-120.0));
    assert_eq!(updated.cadence(), None);
    assert_eq!(updated.speed_km_per_h(), Some(20.0));
}

#[test]
fn replace_fields_validation_failure_leaves_record_untouched() {
    let mut store = WorkoutStore::new();
    let record = run(5.0);
    let id = record.id().clone();
    let before = record.clone();
    store.add(record).unwrap();

    let err = store
        .replace_fields(&id, WorkoutFields::new(0.0, 20.0, 170.0))
        .unwrap_err();
    assert_eq!(
        err,
        StoreError::Validation(WorkoutValidationError::NonPositive {
            field: "distance_km"
        })
    );
    assert_eq!(store.find(&id).unwrap(), &before);

    let missing = WorkoutId::generate();
    assert_eq!(
        store
            .replace_fields(&missing, WorkoutFields::new(1.0, 1.0, 1.0))
            .unwrap_err(),
        StoreError::NotFound(missing)
    );
}

#[test]
fn sorted_by_distance_is_a_view_and_toggle_restores_order() {
    let mut store = WorkoutStore::new();
    store.add(run(10.0)).unwrap();
    store.add(ride(3.0)).unwrap();

    assert_eq!(distances(&store.sorted_by_distance()), vec![3.0, 10.0]);
    assert_eq!(distances(&store.view()), vec![10.0, 3.0]);

    assert_eq!(store.toggle_distance_sort(), SortView::ByDistance);
    assert_eq!(distances(&store.view()), vec![3.0, 10.0]);
    assert_eq!(store.records()[0].distance_km(), 10.0);

    assert_eq!(store.toggle_distance_sort(), SortView::CreationOrder);
    assert_eq!(distances(&store.view()), vec![10.0, 3.0]);
}

#[test]
fn sort_is_stable_for_equal_distances() {
    let mut store = WorkoutStore::new();
    let first = run(5.0);
    let second = ride(5.0);
    let third = run(1.0);
    let expected = vec![
        third.id().clone(),
        first.id().clone(),
        second.id().clone(),
    ];
    store.add(first).unwrap();
    store.add(second).unwrap();
    store.add(third).unwrap();

    let sorted: Vec<WorkoutId> = store
        .sorted_by_distance()
        .iter()
        .map(|record| record.id().clone())
        .collect();
    assert_eq!(sorted, expected);
}

#[test]
fn mark_interacted_counts_each_selection() {
    let mut store = WorkoutStore::new();
    let record = run(5.0);
    let id = record.id().clone();
    store.add(record).unwrap();

    assert_eq!(store.mark_interacted(&id).unwrap(), 1);
    assert_eq!(store.mark_interacted(&id).unwrap(), 2);
    assert_eq!(store.find(&id).unwrap().interaction_count(), 2);

    let missing = WorkoutId::generate();
    assert_eq!(
        store.mark_interacted(&missing).unwrap_err(),
        StoreError::NotFound(missing)
    );
}

#[test]
fn clear_empties_store_and_resets_sort() {
    let mut store = WorkoutStore::new();
    store.add(run(5.0)).unwrap();
    store.toggle_distance_sort();

    store.clear();

    assert!(store.is_empty());
    assert_eq!(store.sort_view(), SortView::CreationOrder);
}
