use weightlog_core::{Measurement, MeasurementStore, MemoryRepository, StoreError, ValidationError};

fn canonical_store() -> MeasurementStore<MemoryRepository> {
    MeasurementStore::load(MemoryRepository::with_measurements(vec![
        Measurement::new("2023-01-31", 70.0).unwrap(),
        Measurement::new("2023-01-15", 71.5).unwrap(),
        Measurement::new("2023-02-01", 69.9).unwrap(),
    ]))
    .unwrap()
}

#[test]
fn export_writes_header_and_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.csv");

    canonical_store().export_csv(&path).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        text,
        "date,weight\n2023-01-31,70\n2023-01-15,71.5\n2023-02-01,69.9\n"
    );
}

#[test]
fn export_of_empty_store_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");

    let store = MeasurementStore::load(MemoryRepository::new()).unwrap();
    store.export_csv(&path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "date,weight\n");
}

#[test]
fn export_then_import_into_empty_store_preserves_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.csv");
    let source = canonical_store();
    source.export_csv(&path).unwrap();

    let mut target = MeasurementStore::load(MemoryRepository::new()).unwrap();
    let report = target.import_csv(&path).unwrap();

    assert!(report.is_lossless());
    assert_eq!(target.measurements(), source.measurements());
}

#[test]
fn import_appends_and_normalizes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("import.csv");
    std::fs::write(&path, "date,weight\n01/03/2023,68.2\nnot-a-date,70\n").unwrap();

    let repo = MemoryRepository::with_measurements(vec![
        Measurement::new("31/01/2023", 70.0).unwrap(),
    ]);
    let mut store = MeasurementStore::load(&repo).unwrap();
    let report = store.import_csv(&path).unwrap();

    assert_eq!(report.dropped.len(), 1);
    assert_eq!(report.dropped[0].index, 2);
    assert_eq!(
        repo.snapshot(),
        vec![
            Measurement::new("2023-01-31", 70.0).unwrap(),
            Measurement::new("2023-03-01", 68.2).unwrap(),
        ]
    );
}

#[test]
fn import_matches_columns_by_header_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reordered.csv");
    std::fs::write(&path, "weight,note,date\n75.5,after run,2023-04-02\n").unwrap();

    let mut store = MeasurementStore::load(MemoryRepository::new()).unwrap();
    store.import_csv(&path).unwrap();
    assert_eq!(
        store.measurements(),
        &[Measurement::new("2023-04-02", 75.5).unwrap()]
    );
}

#[test]
fn malformed_row_aborts_whole_import() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "date,weight\n2023-01-01,70\n2023-01-02,heavy\n").unwrap();

    let original = vec![Measurement::new("31/01/2023", 70.0).unwrap()];
    let repo = MemoryRepository::with_measurements(original.clone());
    let mut store = MeasurementStore::load(&repo).unwrap();

    let err = store.import_csv(&path).unwrap_err();
    match err {
        StoreError::Validation(ValidationError::MalformedRow { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.measurements(), original.as_slice());
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn missing_column_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no_weight.csv");
    std::fs::write(&path, "date\n2023-01-01\n").unwrap();

    let mut store = MeasurementStore::load(MemoryRepository::new()).unwrap();
    let err = store.import_csv(&path).unwrap_err();
    match err {
        StoreError::Validation(ValidationError::MalformedRow { line, .. }) => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn row_with_extra_field_reports_its_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ragged.csv");
    std::fs::write(&path, "date,weight\n2023-01-01,70\n2023-01-02,71,extra\n").unwrap();

    let repo = MemoryRepository::new();
    let mut store = MeasurementStore::load(&repo).unwrap();

    let err = store.import_csv(&path).unwrap_err();
    match err {
        StoreError::Validation(ValidationError::MalformedRow { line, .. }) => assert_eq!(line, 3),
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.is_empty());
    assert_eq!(repo.save_count(), 0);
}

#[test]
fn missing_import_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = MeasurementStore::load(MemoryRepository::new()).unwrap();

    let err = store.import_csv(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, StoreError::Repo(_)));
}
