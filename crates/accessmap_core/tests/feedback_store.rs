use accessmap_core::db::migrations::latest_version;
use accessmap_core::db::open_db;
use accessmap_core::{
    FeedbackFlags, FeedbackRecord, FeedbackStore, GeoPoint, SqliteFeedbackStore, StoreError,
};
use rusqlite::Connection;

#[test]
fn save_and_load_roundtrip_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let mut flags = FeedbackFlags::default();
    flags.accessible_entrance = true;
    flags.has_ramp = true;
    let records = vec![
        FeedbackRecord::new(
            GeoPoint::new(41.0082, 28.9784),
            Some("Corner cafe".to_string()),
            Some("Ramp by the side door".to_string()),
            flags,
        ),
        FeedbackRecord::new(GeoPoint::new(41.01, 28.98), None, None, FeedbackFlags::default()),
    ];

    let mut store = SqliteFeedbackStore::open(&path).unwrap();
    store.save(&records).unwrap();
    drop(store);

    let reopened = SqliteFeedbackStore::open(&path).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded, records);
    assert!(loaded[0].flags.accessible_entrance);
    assert!(loaded[0].flags.has_ramp);
    assert!(!loaded[0].flags.has_elevator);
}

#[test]
fn load_without_slot_returns_empty() {
    let store = SqliteFeedbackStore::open_in_memory().unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn saving_empty_collection_is_loadable_and_distinct_from_missing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let mut store = SqliteFeedbackStore::open(&path).unwrap();
    store.save(&[]).unwrap();
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let raw: String = conn
        .query_row(
            "SELECT value FROM slots WHERE name = 'feedback_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "[]");

    let store = SqliteFeedbackStore::open(&path).unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn second_save_replaces_the_whole_collection_in_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let first = vec![FeedbackRecord::new(
        GeoPoint::new(1.0, 1.0),
        None,
        None,
        FeedbackFlags::default(),
    )];
    let second = vec![
        first[0].clone(),
        FeedbackRecord::new(GeoPoint::new(2.0, 2.0), None, None, FeedbackFlags::default()),
    ];

    let mut store = SqliteFeedbackStore::open(&path).unwrap();
    store.save(&first).unwrap();
    store.save(&second).unwrap();
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);

    let store = SqliteFeedbackStore::open(&path).unwrap();
    assert_eq!(store.load().unwrap(), second);
}

#[test]
fn malformed_slot_loads_as_empty_and_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO slots (name, value, updated_at) VALUES ('feedback_entries', ?1, 0);",
        ["{not json["],
    )
    .unwrap();
    drop(conn);

    let store = SqliteFeedbackStore::open(&path).unwrap();
    assert!(store.load().unwrap().is_empty());
    drop(store);

    let conn = Connection::open(&path).unwrap();
    let raw: String = conn
        .query_row(
            "SELECT value FROM slots WHERE name = 'feedback_entries';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(raw, "{not json[");
}

#[test]
fn entries_with_unknown_fields_still_decode() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.db");

    let stored = r#"[{
        "coordinate": {"lat": 41.0, "lon": 29.0},
        "place_name": "Museum gate",
        "note": null,
        "accessible_entrance": true,
        "submitted_via": "widget-v2",
        "schema_hint": 7
    }]"#;
    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO slots (name, value, updated_at) VALUES ('feedback_entries', ?1, 0);",
        [stored],
    )
    .unwrap();
    drop(conn);

    let store = SqliteFeedbackStore::open(&path).unwrap();
    let loaded = store.load().unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].place_name.as_deref(), Some("Museum gate"));
    assert!(loaded[0].flags.accessible_entrance);
    assert!(!loaded[0].flags.accessible_parking);
}

#[test]
fn store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteFeedbackStore::try_new(conn);
    match result {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert!(expected_version > 0),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn store_rejects_connection_without_slots_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let result = SqliteFeedbackStore::try_new(conn);
    assert!(matches!(
        result,
        Err(StoreError::MissingRequiredTable("slots"))
    ));
}
