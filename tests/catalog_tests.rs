//! Catalog tests: building from csv, full-text search, limits and term tagging.

use crossbeam_channel::unbounded;
use std::collections::HashSet;
use std::sync::Arc;
use thames::engine::catalog::{catalog_size, search_catalog};
use thames::engine::{Catalog, SqliteCatalog, init_catalog, open_catalog_in_memory};
use thames::CatalogItem;

const CSV: &str = r#"location,description,secs,category,CDNumber,CDName,tracknum
07000001.wav,"Cafe, busy with clatter of cups and general chatter.",120,Cafes,BBC 01,Ambience 1,1
07000002.wav,Small cafe interior with espresso machine.,95,Cafes,BBC 01,Ambience 1,2
07000003.wav,Outdoor cafe by a busy road.,61,Cafes,BBC 01,Ambience 1,3
07000004.wav,Manual typewriter typing fast.,30,Office,BBC 02,Office Sounds,1
07000005.wav,Electric typewriter carriage return.,12,Office,BBC 02,Office Sounds,2
07000006.wav,Heavy rain on a tin roof.,,Weather,BBC 03,Weather,1
"#;

fn loaded_in_memory() -> rusqlite::Connection {
    let mut conn = open_catalog_in_memory().unwrap();
    let n = init_catalog(&mut conn, CSV.as_bytes(), false).unwrap();
    assert_eq!(n, 6);
    conn
}

fn search_all(conn: &rusqlite::Connection, term: &str, limit: usize) -> Vec<CatalogItem> {
    let mut items = Vec::new();
    search_catalog(conn, term, limit, |item| {
        items.push(item);
        true
    })
    .unwrap();
    items
}

#[test]
fn test_init_catalog_skips_header() {
    let conn = loaded_in_memory();
    assert_eq!(catalog_size(&conn), Some(6));
    assert!(search_all(&conn, "location", 10).is_empty());
}

#[test]
fn test_search_tags_items_with_term() {
    let conn = loaded_in_memory();
    let items = search_all(&conn, "cafe", 10);
    let names: HashSet<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        HashSet::from(["07000001.wav", "07000002.wav", "07000003.wav"])
    );
    assert!(items.iter().all(|i| i.term == "cafe"));
}

#[test]
fn test_search_respects_limit() {
    let conn = loaded_in_memory();
    for limit in 0..=4 {
        let items = search_all(&conn, "cafe", limit);
        assert_eq!(items.len(), limit.min(3));
    }
}

#[test]
fn test_search_stops_when_callback_declines() {
    let conn = loaded_in_memory();
    let mut seen = 0;
    let n = search_catalog(&conn, "cafe", 10, |_| {
        seen += 1;
        seen < 2
    })
    .unwrap();
    assert_eq!(n, 1);
    assert_eq!(seen, 2);
}

#[test]
fn test_search_parses_duration() {
    let conn = loaded_in_memory();
    let typing = search_all(&conn, "manual", 10);
    assert_eq!(typing.len(), 1);
    assert_eq!(typing[0].secs, 30);
    assert_eq!(typing[0].description, "Manual typewriter typing fast.");

    let rain = search_all(&conn, "rain", 10);
    assert_eq!(rain.len(), 1);
    assert_eq!(rain[0].secs, 0, "empty duration reads as 0");
}

#[test]
fn test_search_phrase_query() {
    let conn = loaded_in_memory();
    let items = search_all(&conn, "\"electric typewriter\"", 10);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "07000005.wav");
}

#[test]
fn test_init_catalog_rejects_short_record() {
    let mut conn = open_catalog_in_memory().unwrap();
    let csv = "location,description,secs,category,CDNumber,CDName,tracknum\na.wav,only two\n";
    assert!(init_catalog(&mut conn, csv.as_bytes(), false).is_err());
}

#[test]
fn test_sqlite_catalog_streams_into_channel() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sounds.db");
    {
        let mut conn = rusqlite::Connection::open(&db).unwrap();
        init_catalog(&mut conn, CSV.as_bytes(), false).unwrap();
    }

    let catalog: Arc<dyn Catalog> = Arc::new(SqliteCatalog::new(&db));
    let (tx, rx) = unbounded();
    let sent = catalog.search("typewriter", 5, &tx).unwrap();
    drop(tx);
    assert_eq!(sent, 2);
    let items: Vec<CatalogItem> = rx.iter().collect();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|i| i.term == "typewriter"));
}

#[test]
fn test_sqlite_catalog_stops_when_receiver_gone() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sounds.db");
    {
        let mut conn = rusqlite::Connection::open(&db).unwrap();
        init_catalog(&mut conn, CSV.as_bytes(), false).unwrap();
    }
    let catalog = SqliteCatalog::new(&db);
    let (tx, rx) = unbounded::<CatalogItem>();
    drop(rx);
    assert_eq!(catalog.search("cafe", 5, &tx).unwrap(), 0);
}

#[test]
fn test_sqlite_catalog_missing_store_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = SqliteCatalog::new(&dir.path().join("missing.db"));
    let (tx, _rx) = unbounded();
    assert!(catalog.search("cafe", 5, &tx).is_err());
}

#[test]
fn test_sqlite_catalog_malformed_query_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sounds.db");
    {
        let mut conn = rusqlite::Connection::open(&db).unwrap();
        init_catalog(&mut conn, CSV.as_bytes(), false).unwrap();
    }
    let catalog = SqliteCatalog::new(&db);
    for term in ["(cafe", "cafe)", "\"cafe", "NEAR("] {
        let (tx, rx) = unbounded();
        let err = catalog.search(term, 5, &tx).unwrap_err();
        drop(tx);
        assert!(
            format!("{err:#}").contains("malformed MATCH"),
            "{term}: {err:#}"
        );
        assert_eq!(rx.iter().count(), 0, "{term}: nothing may be sent");
    }
}
