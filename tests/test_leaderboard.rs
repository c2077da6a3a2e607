use std::fs;
use std::path::PathBuf;

use energy_dash::leaderboard::*;

fn entry(name: &str, score: u32) -> ScoreEntry {
    ScoreEntry {
        name: name.to_string(),
        character: "Dave".to_string(),
        score,
        distance: score / 10,
        date: "2024-06-01".to_string(),
    }
}

fn scratch_dir(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("energy_dash_{}_{}", tag, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn insert_keeps_ten_best_in_order() {
    let mut list = Vec::new();
    for i in 0..15u32 {
        list = insert(&list, entry(&format!("p{}", i), (i * 37) % 101));
        assert!(list.len() <= MAX_ENTRIES);
        assert!(list.windows(2).all(|w| w[0].score >= w[1].score));
    }
    assert_eq!(list.len(), MAX_ENTRIES);
}

#[test]
fn equal_scores_keep_arrival_order() {
    let list = insert(&[entry("first", 50)], entry("second", 50));
    let list = insert(&list, entry("top", 60));
    let names: Vec<&str> = list.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["top", "first", "second"]);
}

#[test]
fn qualifying_scores() {
    assert!(qualifies(&[], 0));
    let nine: Vec<ScoreEntry> = (0..9).map(|i| entry("x", 100 + i)).collect();
    assert!(qualifies(&nine, 1));

    let ten = normalize((0..10).map(|i| entry("x", 100 + i)).collect());
    assert!(!qualifies(&ten, 50));
    assert!(!qualifies(&ten, 100));
    assert!(qualifies(&ten, 101));
}

#[test]
fn entries_serialize_with_plain_field_names() {
    let json = serde_json::to_value(entry("Ada", 420)).unwrap();
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["character"], "Dave");
    assert_eq!(json["score"], 420);
    assert_eq!(json["distance"], 42);
    assert_eq!(json["date"], "2024-06-01");
}

#[test]
fn today_stamps_an_iso_date() {
    let e = ScoreEntry::today("Ada", "Mel", 10, 3);
    assert_eq!(e.date.len(), 10);
    assert_eq!(e.date.as_bytes()[4], b'-');
    assert_eq!(e.date.as_bytes()[7], b'-');
}

#[test]
fn file_store_round_trips_through_disk() {
    let dir = scratch_dir("roundtrip");
    let mut store = JsonFileStore::new(dir.join("nested").join("scores.json"));
    assert!(store.load().is_empty());

    store.record(entry("a", 10)).unwrap();
    let after = store.record(entry("b", 30)).unwrap();
    assert_eq!(after[0].name, "b");
    assert!(store.path().exists());

    let reopened = JsonFileStore::new(store.path());
    let loaded = reopened.load();
    assert_eq!(loaded, after);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn file_store_normalizes_what_it_reads() {
    let dir = scratch_dir("normalize");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scores.json");
    let unsorted: Vec<ScoreEntry> = (0..12).map(|i| entry("x", i)).collect();
    fs::write(&path, serde_json::to_string(&unsorted).unwrap()).unwrap();

    let loaded = JsonFileStore::new(&path).load();
    assert_eq!(loaded.len(), MAX_ENTRIES);
    assert_eq!(loaded[0].score, 11);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_file_reads_as_empty() {
    let dir = scratch_dir("corrupt");
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("scores.json");
    fs::write(&path, "{ not json ]").unwrap();

    let mut store = JsonFileStore::new(&path);
    assert!(store.load().is_empty());
    // The next record replaces the damaged file.
    let list = store.record(entry("fresh", 5)).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(store.load(), list);
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn memory_store_counts_saves() {
    let mut store = MemoryStore::default();
    store.record(entry("a", 1)).unwrap();
    store.record(entry("b", 2)).unwrap();
    assert_eq!(store.saves, 2);
    assert_eq!(store.load()[0].name, "b");
}

#[test]
fn unusable_directory_is_reported() {
    let dir = scratch_dir("blocked");
    fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let mut store = JsonFileStore::new(blocker.join("scores.json"));
    let err = store.record(entry("a", 1)).unwrap_err();
    assert!(format!("{:#}", err).contains("creating"), "{:#}", err);
    let _ = fs::remove_dir_all(&dir);
}
