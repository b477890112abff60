use clockkit_core::db::{open_db, open_db_in_memory};
use clockkit_core::repo::collection::{load_list, save_list, ALARMS_KEY, WORLD_CLOCKS_KEY};
use clockkit_core::{KeyValueStore, SqliteKeyValueStore, StoreError};

#[test]
fn missing_key_reads_as_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    assert_eq!(store.get(ALARMS_KEY).unwrap(), None);
}

#[test]
fn set_overwrites_previous_value() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    store.set(WORLD_CLOCKS_KEY, "[1]").unwrap();
    store.set(WORLD_CLOCKS_KEY, "[1,2]").unwrap();

    assert_eq!(store.get(WORLD_CLOCKS_KEY).unwrap().as_deref(), Some("[1,2]"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn values_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::new(&conn);
        save_list(&store, ALARMS_KEY, &["a".to_string(), "b".to_string()]).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    let loaded: Vec<String> = load_list(&store, ALARMS_KEY).unwrap();
    assert_eq!(loaded, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn corrupt_stored_json_surfaces_as_serialization_error() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKeyValueStore::new(&conn);
    store.set(ALARMS_KEY, "[{\"id\":").unwrap();

    let err = load_list::<String, _>(&store, ALARMS_KEY).unwrap_err();
    assert!(matches!(err, StoreError::Serialization(_)));
}

#[test]
fn missing_table_surfaces_as_db_error() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE kv_entries;").unwrap();
    let store = SqliteKeyValueStore::new(&conn);

    let err = store.set(ALARMS_KEY, "[]").unwrap_err();
    assert!(matches!(err, StoreError::Db(_)));
}
