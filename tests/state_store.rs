use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use std::fs;
use tempfile::TempDir;

use stock_monitor::error::MonitorError;
use stock_monitor::models::{ProductId, ProductSnapshot, StoredState};
use stock_monitor::storage::{InstanceLock, JsonFileStore, StateStore};

fn sample_state() -> StoredState {
    let mut state = StoredState::new();
    state.insert(
        ProductId::from("https://shop.example/p/20123"),
        ProductSnapshot::in_stock(Some(Decimal::new(129995, 2))).with_currency("USD"),
    );
    state.insert(
        ProductId::from("https://shop.example/p/20456"),
        ProductSnapshot::out_of_stock(None),
    );
    state.insert(
        ProductId::from("lens"),
        ProductSnapshot::in_stock(Some(Decimal::new(500, 0))),
    );
    state
}

#[tokio::test]
async fn test_missing_file_loads_empty_state() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join(".state.json"));

    let state = store.load().await.unwrap();
    assert!(state.is_empty());
}

#[tokio::test]
async fn test_save_then_load_round_trips() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join(".state.json"));
    let state = sample_state();

    store.save(&state).await.unwrap();
    let loaded = store.load().await.unwrap();

    assert_eq!(loaded, state);
    let price = loaded[&ProductId::from("https://shop.example/p/20123")]
        .price
        .unwrap();
    assert_eq!(price.to_string(), "1299.95");
}

#[tokio::test]
async fn test_save_replaces_previous_content() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join(".state.json"));

    store.save(&sample_state()).await.unwrap();
    let mut smaller = StoredState::new();
    smaller.insert(ProductId::from("only"), ProductSnapshot::out_of_stock(None));
    store.save(&smaller).await.unwrap();

    assert_eq!(store.load().await.unwrap(), smaller);
    // No temp files left behind next to the state file.
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[tokio::test]
async fn test_saved_file_is_sorted_readable_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    let store = JsonFileStore::new(&path);

    store.save(&sample_state()).await.unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let first = content.find("https://shop.example/p/20123").unwrap();
    let second = content.find("https://shop.example/p/20456").unwrap();
    let third = content.find("\"lens\"").unwrap();
    assert!(first < second && second < third);
    assert!(content.contains("\"price\": \"1299.95\""));
}

#[tokio::test]
async fn test_corrupt_file_is_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".state.json");
    fs::write(&path, "{\"lens\": {\"available\": tru").unwrap();

    let err = JsonFileStore::new(&path).load().await.unwrap_err();
    match err {
        MonitorError::StoreUnavailable { message, .. } => assert!(message.contains("corrupt")),
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_file_loads_empty_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(".state.json");
    fs::write(&path, "\n").unwrap();

    assert!(JsonFileStore::new(&path).load().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unwritable_location_is_store_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = JsonFileStore::new(dir.path().join("missing-dir").join(".state.json"));

    let err = store.save(&sample_state()).await.unwrap_err();
    assert!(matches!(err, MonitorError::StoreUnavailable { .. }));
}

#[test]
fn test_instance_lock_is_exclusive_and_released_on_drop() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join(".state.json");

    let lock = InstanceLock::acquire(&state_path).unwrap();
    assert!(lock.path().exists());

    let err = InstanceLock::acquire(&state_path).unwrap_err();
    match err {
        MonitorError::StoreUnavailable { message, .. } => {
            assert!(message.contains("another instance"))
        }
        other => panic!("expected StoreUnavailable, got {:?}", other),
    }

    drop(lock);
    assert!(InstanceLock::acquire(&state_path).is_ok());
}

#[test]
fn test_lock_file_left_by_a_killed_run_does_not_block() {
    let dir = TempDir::new().unwrap();
    let state_path = dir.path().join(".state.json");
    let lock_path = dir.path().join(".state.json.lock");
    // A run that died without unwinding leaves its lock file behind.
    fs::write(&lock_path, "4194303\n").unwrap();

    let lock = InstanceLock::acquire(&state_path).unwrap();

    assert_eq!(lock.path(), lock_path.as_path());
    drop(lock);
    assert_eq!(
        fs::read_to_string(&lock_path).unwrap().trim(),
        std::process::id().to_string()
    );
}
