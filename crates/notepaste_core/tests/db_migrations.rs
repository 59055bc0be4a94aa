use notepaste_core::db::migrations::latest_version;
use notepaste_core::db::{open_db, open_db_in_memory, DbError};
use notepaste_core::{NoteService, SqliteStore, StoreError, StoreGateway, StoreKey};
use rusqlite::Connection;
use serde_json::json;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepaste.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "kv");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        SqliteStore::open(&path),
        Err(StoreError::Db(DbError::UnsupportedSchemaVersion { .. }))
    ));
}

#[test]
fn sqlite_store_keeps_notes_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.db");

    {
        let mut service = NoteService::new(SqliteStore::open(&path).unwrap());
        assert!(service.bootstrap().unwrap());
        service.create_note("first", None).unwrap();
        service.create_note("second", Some("Greeting")).unwrap();
    }

    let mut service = NoteService::new(SqliteStore::open(&path).unwrap());
    assert!(!service.bootstrap().unwrap());

    let notes = service.list_notes().unwrap();
    let names: Vec<&str> = notes.iter().map(|note| note.name.as_str()).collect();
    assert_eq!(names, vec!["Greeting", "Note 1"]);
    assert_eq!(service.repo().counter().unwrap(), 2);
}

#[test]
fn sqlite_store_set_many_upserts_and_remove_is_idempotent() {
    let mut store = SqliteStore::open_in_memory().unwrap();

    store
        .set_many(vec![
            (StoreKey::NoteCounter, json!(1)),
            (StoreKey::IsInstalled, json!(true)),
        ])
        .unwrap();
    store.set(StoreKey::NoteCounter, json!(7)).unwrap();
    assert_eq!(store.get(StoreKey::NoteCounter).unwrap(), Some(json!(7)));

    store.remove(StoreKey::IsInstalled).unwrap();
    store.remove(StoreKey::IsInstalled).unwrap();
    assert_eq!(store.get(StoreKey::IsInstalled).unwrap(), None);
}

#[test]
fn sqlite_store_rejects_corrupted_documents() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO kv (key, value) VALUES ('notes', '{not json');",
        [],
    )
    .unwrap();
    let store = SqliteStore::from_connection(conn);

    assert!(matches!(
        store.get(StoreKey::Notes),
        Err(StoreError::Serialization(_))
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table `{table}` should exist");
}
