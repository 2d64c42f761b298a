//! Tests for snapshot save/load
//!
//! These tests verify:
//! - Save/load round trips
//! - File format (one `key:value` line per record, ascending)
//! - Escaping of delimiter and line breaks
//! - Strict vs lenient handling of malformed lines
//! - Atomic replacement and error paths
//! - `open` / `persist` / `restore` with the configured path

use std::fs;

use skipkv::{Config, LoadPolicy, SkipKvError, SkipListIndex};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn index_with_policy(policy: LoadPolicy) -> SkipListIndex<u32, String> {
    let config = Config::builder().load_policy(policy).seed(11).build();
    SkipListIndex::with_config(config).unwrap()
}

fn strict_index() -> SkipListIndex<u32, String> {
    index_with_policy(LoadPolicy::Strict)
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_scenario_save_then_fresh_load() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");

    let index = strict_index();
    index.insert(3, "c".to_string());
    index.insert(1, "a".to_string());
    index.insert(2, "b".to_string());
    assert!(index.delete(&2));

    let report = index.save(&path).unwrap();
    assert_eq!(report.records, 2);

    let fresh = strict_index();
    let loaded = fresh.load(&path).unwrap();
    assert_eq!(loaded.records_applied, 2);
    assert_eq!(loaded.keys_added, 2);
    assert_eq!(loaded.lines_skipped, 0);
    assert_eq!(
        fresh.entries(),
        vec![(1, "a".to_string()), (3, "c".to_string())]
    );
}

#[test]
fn test_file_format_is_sorted_key_value_lines() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");

    let index = strict_index();
    index.insert(10, "ten".to_string());
    index.insert(2, "two".to_string());
    let report = index.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text, "2:two\n10:ten\n");
    assert_eq!(report.bytes, text.len() as u64);
}

#[test]
fn test_empty_index_saves_empty_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");

    strict_index().save(&path).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "");

    let fresh = strict_index();
    assert_eq!(fresh.load(&path).unwrap().records_applied, 0);
    assert!(fresh.is_empty());
}

#[test]
fn test_special_characters_round_trip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");

    let index: SkipListIndex<String, String> = SkipListIndex::new();
    index.insert("host:port".to_string(), "a\nb".to_string());
    index.insert("back\\slash".to_string(), "x:y:z\r".to_string());
    index.insert(String::new(), String::new());
    index.save(&path).unwrap();

    // Every record stays on its own line
    assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 3);

    let fresh: SkipListIndex<String, String> = SkipListIndex::new();
    fresh.load(&path).unwrap();
    assert_eq!(fresh.entries(), index.entries());
}

#[test]
fn test_load_merges_into_existing() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "1:from-file\n5:five\n").unwrap();

    let index = strict_index();
    index.insert(1, "in-memory".to_string());
    index.insert(9, "nine".to_string());

    let report = index.load(&path).unwrap();
    assert_eq!(report.records_applied, 2);
    assert_eq!(report.keys_added, 1);
    assert_eq!(index.search(&1), Some("from-file".to_string()));
    assert_eq!(index.size(), 3);
}

#[test]
fn test_duplicate_keys_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "4:old\n4:newer\n4:newest\n").unwrap();

    let index = strict_index();
    let report = index.load(&path).unwrap();
    assert_eq!(report.records_applied, 3);
    assert_eq!(report.keys_added, 1);
    assert_eq!(index.search(&4), Some("newest".to_string()));
    assert_eq!(index.size(), 1);
}

#[test]
fn test_blank_lines_and_crlf_are_accepted() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "1:a\r\n\n\r\n2:b").unwrap();

    let index = strict_index();
    index.load(&path).unwrap();
    assert_eq!(
        index.entries(),
        vec![(1, "a".to_string()), (2, "b".to_string())]
    );
}

// =============================================================================
// Parse Policy Tests
// =============================================================================

#[test]
fn test_strict_load_aborts_and_leaves_index_unchanged() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "1:a\n2:b\nnot-a-record\n3:c\n").unwrap();

    let index = strict_index();
    index.insert(100, "keep".to_string());

    let err = index.load(&path).unwrap_err();
    match err {
        SkipKvError::Parse { line, .. } => assert_eq!(line, 3),
        other => panic!("expected parse error, got {}", other),
    }
    assert_eq!(index.entries(), vec![(100, "keep".to_string())]);
}

#[test]
fn test_strict_load_rejects_bad_key_type() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "one:a\n").unwrap();

    let err = strict_index().load(&path).unwrap_err();
    assert!(matches!(err, SkipKvError::Parse { line: 1, .. }));
}

#[test]
fn test_lenient_load_skips_bad_lines() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "1:a\ngarbage\nx:b\n3:c\n4:bad\\q\n").unwrap();

    let index = index_with_policy(LoadPolicy::Lenient);
    let report = index.load(&path).unwrap();
    assert_eq!(report.records_applied, 2);
    assert_eq!(report.lines_skipped, 3);
    assert_eq!(
        index.entries(),
        vec![(1, "a".to_string()), (3, "c".to_string())]
    );
}

#[test]
fn test_invalid_utf8_is_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, b"1:a\n2:\xff\xfe\n").unwrap();

    let err = strict_index().load(&path).unwrap_err();
    assert!(matches!(err, SkipKvError::Parse { line: 2, .. }));

    let lenient = index_with_policy(LoadPolicy::Lenient);
    let report = lenient.load(&path).unwrap();
    assert_eq!(report.lines_skipped, 1);
    assert_eq!(lenient.size(), 1);
}

// =============================================================================
// I/O Error Tests
// =============================================================================

#[test]
fn test_load_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let err = strict_index().load(temp.path().join("missing")).unwrap_err();
    assert!(matches!(err, SkipKvError::Io(_)));
}

#[test]
fn test_save_into_path_blocked_by_file_fails() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "i am a file").unwrap();

    let index = strict_index();
    index.insert(1, "a".to_string());

    // Parent "directory" is a regular file
    let err = index.save(blocker.join("snap")).unwrap_err();
    assert!(matches!(err, SkipKvError::Io(_)));
    assert_eq!(index.size(), 1);
}

#[test]
fn test_failed_rename_keeps_target_and_cleans_temp_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("snap");
    fs::create_dir(&target).unwrap();
    fs::write(target.join("inner"), "old contents").unwrap();

    let index = strict_index();
    index.insert(1, "a".to_string());

    // Temp file is written, then renaming it over a non-empty directory fails
    let err = index.save(&target).unwrap_err();
    assert!(matches!(err, SkipKvError::Io(_)));

    assert!(target.is_dir());
    assert_eq!(fs::read_to_string(target.join("inner")).unwrap(), "old contents");

    let names: Vec<String> = fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["snap".to_string()]);
    assert_eq!(index.size(), 1);
}

#[test]
fn test_save_replaces_previous_snapshot() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("snap");
    fs::write(&path, "999:stale\n").unwrap();

    let index = strict_index();
    index.insert(1, "fresh".to_string());
    index.save(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "1:fresh\n");

    // No temp files left behind
    let leftovers = fs::read_dir(temp.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn test_save_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store").join("dumpfile");

    let index = strict_index();
    index.insert(1, "a".to_string());
    index.save(&path).unwrap();
    assert!(path.exists());
}

// =============================================================================
// Configured Path Tests
// =============================================================================

#[test]
fn test_open_without_snapshot_starts_empty() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .snapshot_path(temp.path().join("store/dumpfile"))
        .build();

    let index: SkipListIndex<u32, String> = SkipListIndex::open(config).unwrap();
    assert!(index.is_empty());
}

#[test]
fn test_persist_then_open_restores() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .snapshot_path(temp.path().join("store/dumpfile"))
        .build();

    {
        let index: SkipListIndex<u32, String> = SkipListIndex::open(config.clone()).unwrap();
        index.insert(8, "h".to_string());
        index.insert(5, "e".to_string());
        index.persist().unwrap();
    }

    let reopened: SkipListIndex<u32, String> = SkipListIndex::open(config).unwrap();
    assert_eq!(
        reopened.entries(),
        vec![(5, "e".to_string()), (8, "h".to_string())]
    );

    reopened.clear();
    let report = reopened.restore().unwrap();
    assert_eq!(report.keys_added, 2);
}

#[test]
fn test_open_propagates_strict_parse_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dumpfile");
    fs::write(&path, "broken line\n").unwrap();

    let config = Config::builder().snapshot_path(&path).build();
    let result = SkipListIndex::<u32, String>::open(config);
    assert!(matches!(result, Err(SkipKvError::Parse { .. })));
}
