use crudlite_core::{
    ColumnDef, ColumnType, Conditions, CrudStore, Database, DatabaseConfig, DbErrorKind, Record,
    TableSchema, Value,
};
use std::sync::{Arc, Mutex};
use std::thread;

fn notes_schema() -> TableSchema {
    TableSchema::new()
        .with_column(ColumnDef::new("id", ColumnType::Integer).primary_key())
        .column("body", ColumnType::Text)
}

#[test]
fn file_store_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crudlite.db");

    let db = Database::open(&path).unwrap();
    db.create_table("notes", &notes_schema()).unwrap();
    db.insert("notes", &Record::new().with("id", 1).with("body", "kept"))
        .unwrap();
    db.close().unwrap();

    let reopened = Database::open(&path).unwrap();
    assert!(reopened.table_exists("notes").unwrap());
    assert_eq!(
        reopened.read("notes", None).unwrap(),
        vec![vec![Value::Integer(1), Value::from("kept")]]
    );
}

#[test]
fn memory_identifier_is_handled_by_engine() {
    let first = Database::open(":memory:").unwrap();
    first.create_table("notes", &notes_schema()).unwrap();

    let second = Database::open(":memory:").unwrap();
    assert!(!second.table_exists("notes").unwrap());
}

#[test]
fn unopenable_store_is_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("nested").join("db.sqlite");

    let err = match Database::open(&path) {
        Ok(_) => panic!("opening inside a missing directory should fail"),
        Err(err) => err,
    };
    assert_eq!(err.kind(), DbErrorKind::Connection);
}

#[test]
fn foreign_keys_follow_config() {
    let parent = TableSchema::new()
        .with_column(ColumnDef::new("id", ColumnType::Integer).primary_key());
    let child = TableSchema::new()
        .with_column(ColumnDef::new("id", ColumnType::Integer).primary_key())
        .with_column(
            ColumnDef::new("parent_id", ColumnType::Integer).references("parents", "id"),
        );
    let orphan = Record::new().with("id", 1).with("parent_id", 42);

    let strict = Database::open_in_memory().unwrap();
    strict.create_table("parents", &parent).unwrap();
    strict.create_table("children", &child).unwrap();
    let err = strict.insert("children", &orphan).unwrap_err();
    assert_eq!(err.kind(), DbErrorKind::Constraint);

    let lenient = Database::open_with_config(
        ":memory:",
        &DatabaseConfig::default().with_foreign_keys(false),
    )
    .unwrap();
    lenient.create_table("parents", &parent).unwrap();
    lenient.create_table("children", &child).unwrap();
    lenient.insert("children", &orphan).unwrap();
    assert_eq!(lenient.read("children", None).unwrap().len(), 1);
}

#[test]
fn undecodable_text_fails_the_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mangled.db");

    let db = Database::open(&path).unwrap();
    db.create_table("notes", &notes_schema()).unwrap();
    db.insert("notes", &Record::new().with("id", 1).with("body", "fine"))
        .unwrap();

    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute("UPDATE notes SET body = CAST(x'FFFE' AS TEXT) WHERE id = 1", [])
        .unwrap();

    let err = db.read("notes", None).unwrap_err();
    assert_eq!(err.kind(), DbErrorKind::Engine);
    assert!(matches!(
        err,
        crudlite_core::DbError::Sqlite(rusqlite::Error::FromSqlConversionFailure(1, _, _))
    ));
}

#[test]
fn each_call_commits_independently() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("autocommit.db");

    let writer = Database::open(&path).unwrap();
    writer.create_table("notes", &notes_schema()).unwrap();
    writer
        .insert("notes", &Record::new().with("id", 1).with("body", "a"))
        .unwrap();
    let failed = writer.insert("notes", &Record::new().with("id", 1).with("body", "dup"));
    assert!(failed.is_err());

    // A second connection sees the committed row while the writer is open.
    let reader = Database::open(&path).unwrap();
    let rows = reader
        .read("notes", Some(&Conditions::new().eq("id", 1)))
        .unwrap();
    assert_eq!(rows, vec![vec![Value::Integer(1), Value::from("a")]]);
}

#[test]
fn shared_use_is_serialized_by_caller_lock() {
    let db = Database::open_in_memory().unwrap();
    db.create_table("counter", &TableSchema::new().column("n", ColumnType::Integer))
        .unwrap();
    let db = Arc::new(Mutex::new(db));

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                for step in 0..25 {
                    let guard = db.lock().unwrap();
                    guard
                        .insert("counter", &Record::new().with("n", worker * 100 + step))
                        .unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let guard = db.lock().unwrap();
    assert_eq!(guard.read("counter", None).unwrap().len(), 100);
}
