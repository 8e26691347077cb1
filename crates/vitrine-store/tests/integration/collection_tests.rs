use std::fs;

use vitrine_core::collection::COLLECTION_KEY;
use vitrine_core::testutil::make_test_artwork;

use crate::integration::common::{reopen, temp_collection};

#[test]
fn collection_survives_reopen() {
    let (collection, dir) = temp_collection();

    assert!(collection.add(make_test_artwork("aic-1")).success);
    assert!(collection.add(make_test_artwork("rijks-SK-C-5")).success);

    let reopened = reopen(&dir);
    let ids: Vec<_> = reopened
        .get()
        .into_iter()
        .map(|entry| entry.artwork.id)
        .collect();
    assert_eq!(ids, vec!["aic-1", "rijks-SK-C-5"]);
}

#[test]
fn entries_are_stored_flat_with_added_at() {
    let (collection, dir) = temp_collection();
    collection.add(make_test_artwork("met-436535"));

    let raw = fs::read_to_string(dir.path().join(format!("{COLLECTION_KEY}.json"))).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let entry = &value[0];
    assert_eq!(entry["id"], "met-436535");
    assert_eq!(entry["museumCode"], "MET");
    assert!(entry["addedAt"].is_string());
}

#[test]
fn corrupt_file_reads_as_empty_and_is_replaced() {
    let (collection, dir) = temp_collection();
    fs::write(dir.path().join(format!("{COLLECTION_KEY}.json")), "{not json").unwrap();

    assert!(collection.get().is_empty());
    assert!(collection.add(make_test_artwork("aic-7")).success);
    assert!(reopen(&dir).contains("aic-7"));
}

#[test]
fn clear_removes_the_file() {
    let (collection, dir) = temp_collection();
    collection.add(make_test_artwork("aic-1"));

    let outcome = collection.clear();

    assert!(outcome.success);
    assert_eq!(outcome.message, "Collection cleared");
    assert!(!dir.path().join(format!("{COLLECTION_KEY}.json")).exists());
    assert!(collection.clear().success);
}

#[test]
fn remove_keeps_other_entries() {
    let (collection, dir) = temp_collection();
    collection.add(make_test_artwork("aic-1"));
    collection.add(make_test_artwork("aic-2"));

    assert!(collection.remove("aic-1").success);
    assert!(collection.remove("aic-404").success);

    let reopened = reopen(&dir);
    assert!(!reopened.contains("aic-1"));
    assert!(reopened.contains("aic-2"));
}
