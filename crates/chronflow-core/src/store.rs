//! Process-wide handle store: assigns stable numeric handles to series so
//! a multi-stage pipeline can be orchestrated by a thin request layer.
//!
//! Concurrency discipline mirrors the original's `sync.RWMutex` + atomic
//! counter: many readers may look up series concurrently, writers are
//! serialized, and handle assignment never blocks on the map lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{OnceLock, RwLock};

use crate::model::Series;

pub struct Store {
    counter: AtomicU64,
    table: RwLock<HashMap<u64, Series>>,
}

impl Store {
    pub fn new() -> Self {
        Store {
            counter: AtomicU64::new(0),
            table: RwLock::new(HashMap::new()),
        }
    }

    /// Atomically allocates the next handle. The first call returns `1` —
    /// `0` is reserved to mean "not yet registered".
    pub fn new_mem_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Inserts or replaces the series at `series.mem_id`.
    pub fn save(&self, series: Series) {
        let id = series.mem_id;
        self.table.write().expect("store lock poisoned").insert(id, series);
    }

    /// Looks up a series by handle. Series are handed out by value — the
    /// caller owns a copy and must not expect writes back through it.
    pub fn get(&self, id: u64) -> Option<Series> {
        self.table.read().expect("store lock poisoned").get(&id).cloned()
    }
}

impl Default for Store {
    fn default() -> Self {
        Store::new()
    }
}

/// The process-wide store. A thin request layer calls through this rather
/// than threading a `Store` handle through every function signature,
/// mirroring the original's package-level `GlobalTsStore`.
pub fn global() -> &'static Store {
    static STORE: OnceLock<Store> = OnceLock::new();
    STORE.get_or_init(Store::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Series;

    #[test]
    fn first_handle_is_one() {
        let store = Store::new();
        assert_eq!(store.new_mem_id(), 1);
        assert_eq!(store.new_mem_id(), 2);
    }

    #[test]
    fn save_then_get_round_trips() {
        let store = Store::new();
        let id = store.new_mem_id();
        let mut s = Series::new("x");
        s.mem_id = id;
        store.save(s);
        let fetched = store.get(id).unwrap();
        assert_eq!(fetched.name, "x");
    }

    #[test]
    fn get_missing_handle_is_none() {
        let store = Store::new();
        assert!(store.get(999).is_none());
    }
}
