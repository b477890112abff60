use clockkit_core::db::open_db_in_memory;
use clockkit_core::format::zone::TimeZoneError;
use clockkit_core::repo::collection::WORLD_CLOCKS_KEY;
use clockkit_core::{
    search_catalog, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, WorldClockEntry,
    WorldClockStore, CITY_CATALOG,
};

fn entry(city: &str, timezone: &str) -> WorldClockEntry {
    WorldClockEntry {
        city: city.to_string(),
        country: "Somewhere".to_string(),
        timezone: timezone.to_string(),
        flag: "🏳".to_string(),
    }
}

#[test]
fn add_appends_in_order_and_persists() {
    let kv = MemoryKeyValueStore::new();
    let mut store = WorldClockStore::open(&kv);

    assert!(store.add(entry("Tokyo", "Asia/Tokyo")).unwrap());
    assert!(store.add(entry("Paris", "Europe/Paris")).unwrap());

    let cities: Vec<&str> = store.list().iter().map(|e| e.city.as_str()).collect();
    assert_eq!(cities, vec!["Tokyo", "Paris"]);
    let raw = kv.raw(WORLD_CLOCKS_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[1]["timezone"], "Europe/Paris");
}

#[test]
fn adding_a_listed_timezone_is_a_no_op() {
    let kv = MemoryKeyValueStore::new();
    let mut store = WorldClockStore::open(&kv);
    store.add(entry("Tokyo", "Asia/Tokyo")).unwrap();

    assert!(!store.add(entry("Tokyo again", "Asia/Tokyo")).unwrap());

    assert_eq!(store.list().len(), 1);
    assert_eq!(store.list()[0].city, "Tokyo");
}

#[test]
fn unknown_timezone_is_rejected() {
    let kv = MemoryKeyValueStore::new();
    let mut store = WorldClockStore::open(&kv);

    let err = store.add(entry("Atlantis", "Ocean/Atlantis")).unwrap_err();

    assert_eq!(err, TimeZoneError::Unknown("Ocean/Atlantis".to_string()));
    assert!(store.list().is_empty());
    assert_eq!(kv.raw(WORLD_CLOCKS_KEY), None);
}

#[test]
fn remove_is_tolerant_of_missing_entries() {
    let kv = MemoryKeyValueStore::new();
    let mut store = WorldClockStore::open(&kv);
    store.add(entry("Tokyo", "Asia/Tokyo")).unwrap();

    assert!(!store.remove("Europe/Paris"));
    assert!(store.remove("Asia/Tokyo"));
    assert!(store.list().is_empty());
    assert_eq!(kv.raw(WORLD_CLOCKS_KEY).as_deref(), Some("[]"));
}

#[test]
fn list_survives_reopening_sqlite_store() {
    let conn = open_db_in_memory().unwrap();
    {
        let mut store = WorldClockStore::open(SqliteKeyValueStore::new(&conn));
        store.add(CITY_CATALOG[0].to_entry()).unwrap();
    }

    let store = WorldClockStore::open(SqliteKeyValueStore::new(&conn));
    assert_eq!(store.list(), &[CITY_CATALOG[0].to_entry()]);
}

#[test]
fn corrupt_storage_starts_empty() {
    let kv = MemoryKeyValueStore::new();
    kv.set(WORLD_CLOCKS_KEY, "{\"city\":").unwrap();

    let store = WorldClockStore::open(&kv);

    assert!(store.list().is_empty());
}

#[test]
fn catalog_search_matches_city_or_country_ignoring_case() {
    let by_city = search_catalog("lOnDoN");
    assert_eq!(by_city.len(), 1);
    assert_eq!(by_city[0].timezone, "Europe/London");

    let by_country = search_catalog("united states");
    assert!(by_country.len() >= 2);
    assert!(by_country
        .iter()
        .all(|city| city.country == "United States"));

    assert_eq!(search_catalog("").len(), CITY_CATALOG.len());
    assert!(search_catalog("zzz-no-such-place").is_empty());
}
