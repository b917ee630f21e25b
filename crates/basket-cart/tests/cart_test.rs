//! Persistence scenarios: reload, expiry, corruption recovery, and the
//! backup landing spot for failed writes.

use std::rc::Rc;

use chrono::Duration;

use basket_cart::CartEngine;
use basket_core::config::CartConfig;
use basket_core::errors::StorageError;
use basket_core::traits::KeyValueStore;
use basket_storage::{keys, MemoryStore, StoreHandle};
use test_fixtures::{product, FixedClock};

fn engine(store: &StoreHandle, clock: &FixedClock) -> CartEngine {
    CartEngine::new(store.clone(), Rc::new(clock.clone()), CartConfig::default())
}

#[test]
fn cart_survives_a_reload() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    {
        let mut cart = engine(&store, &clock);
        cart.add_item(product("p1", 10.0), 2);
        cart.add_item(product("p2", 5.0), 1);
    }

    let cart = engine(&store, &clock);
    assert_eq!(cart.lines().len(), 2);
    assert_eq!(cart.item_quantity("p1"), 2);
    assert_eq!(cart.item_count(), 3);
}

#[test]
fn expired_cart_is_discarded_on_load() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    {
        let mut cart = engine(&store, &clock);
        cart.add_item(product("p1", 10.0), 2);
    }

    clock.advance(Duration::days(31));
    let cart = engine(&store, &clock);
    assert!(cart.lines().is_empty());

    // The cleared cart is persisted, so the stale one never comes back.
    let cart = engine(&store, &clock);
    assert!(cart.lines().is_empty());
}

#[test]
fn cart_just_inside_the_expiry_window_survives() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    {
        let mut cart = engine(&store, &clock);
        cart.add_item(product("p1", 10.0), 2);
    }

    clock.advance(Duration::days(29));
    let cart = engine(&store, &clock);
    assert_eq!(cart.lines().len(), 1);
}

#[test]
fn corrupt_current_snapshot_recovers_from_backup() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    {
        let mut cart = engine(&store, &clock);
        cart.add_item(product("p1", 10.0), 2);
    }
    // A load with a valid current snapshot refreshes the backup copy.
    drop(engine(&store, &clock));

    store.set_raw(keys::CART, "{definitely not json").unwrap();
    let cart = engine(&store, &clock);
    assert_eq!(cart.item_quantity("p1"), 2);
    // The backup was promoted and consumed.
    assert!(store.get_raw(keys::CART_BACKUP).is_none());
}

#[test]
fn corrupt_current_and_backup_yield_an_empty_cart() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    store.set_raw(keys::CART, "{nope").unwrap();
    store.set_raw(keys::CART_BACKUP, "[1, 2, 3").unwrap();

    let cart = engine(&store, &clock);
    assert!(cart.lines().is_empty());
    assert_eq!(cart.metadata().version, 1);
}

#[test]
fn well_formed_but_invalid_snapshot_is_treated_as_corrupt() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    {
        let mut cart = engine(&store, &clock);
        cart.add_item(product("p1", 10.0), 2);
    }
    drop(engine(&store, &clock)); // refresh the backup

    // Parseable JSON whose lines fail the validity check (zero quantity).
    let doctored = store
        .get_raw(keys::CART)
        .unwrap()
        .replace("\"quantity\":2", "\"quantity\":0");
    store.set_raw(keys::CART, &doctored).unwrap();

    let cart = engine(&store, &clock);
    assert_eq!(cart.item_quantity("p1"), 2);
}

#[test]
fn remove_is_idempotent_and_skips_the_version_bump() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    let mut cart = engine(&store, &clock);
    cart.add_item(product("p1", 10.0), 1);

    cart.remove_item("p1");
    let version = cart.metadata().version;
    cart.remove_item("p1");
    assert_eq!(cart.metadata().version, version);
    assert!(cart.lines().is_empty());
}

#[test]
fn same_value_quantity_update_still_commits() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    let mut cart = engine(&store, &clock);
    cart.add_item(product("p1", 10.0), 3);
    let version = cart.metadata().version;
    let persisted_before = store.get_raw(keys::CART).unwrap();

    cart.update_quantity("p1", 3);

    assert_eq!(cart.metadata().version, version + 1);
    assert_ne!(store.get_raw(keys::CART).unwrap(), persisted_before);
    assert_eq!(cart.item_quantity("p1"), 3);
}

#[test]
fn setting_quantity_to_zero_removes_the_line() {
    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    let mut cart = engine(&store, &clock);
    cart.add_item(product("p1", 10.0), 3);

    cart.update_quantity("p1", 0);
    assert!(!cart.contains("p1"));
}

#[test]
fn signals_replay_the_current_value_to_new_subscribers() {
    use std::cell::RefCell;

    let store = StoreHandle::new(MemoryStore::default());
    let clock = FixedClock::new();
    let mut cart = engine(&store, &clock);
    cart.add_item(product("p1", 10.0), 2);

    let counts = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&counts);
    cart.totals_signal()
        .subscribe(move |t| sink.borrow_mut().push(t.item_count));

    cart.add_item(product("p2", 5.0), 1);
    assert_eq!(*counts.borrow(), vec![2, 3]);
}

/// Store whose primary cart key rejects writes, as a quota-exhausted browser
/// store would.
struct QuotaStore {
    inner: MemoryStore,
    rejected_key: String,
}

impl KeyValueStore for QuotaStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == self.rejected_key {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                reason: "quota exceeded".into(),
            });
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) {
        self.inner.remove(key);
    }
}

#[test]
fn failed_primary_write_lands_in_the_backup_slot() {
    let store = StoreHandle::new(QuotaStore {
        inner: MemoryStore::default(),
        rejected_key: keys::CART.to_string(),
    });
    let clock = FixedClock::new();
    let mut cart = engine(&store, &clock);

    cart.add_item(product("p1", 10.0), 2);
    assert!(store.get_raw(keys::CART).is_none());
    assert!(store.get_raw(keys::CART_BACKUP).unwrap().contains("\"p1\""));

    // The next session recovers the state from the backup.
    let recovered = engine(&store, &clock);
    assert_eq!(recovered.item_quantity("p1"), 2);
}
