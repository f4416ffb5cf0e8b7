//! Memoization of road searches.
//!
//! The same piece configurations come up again and again during search, and
//! checking for a road is the most expensive part of checking for a game end.
//! A `RoadCache` is owned by whoever runs a batch of games, shared with every
//! `GameState` it creates, and cleared explicitly between batches.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use log::debug;

use crate::position::bitboard::BitBoard;

pub const DEFAULT_ROAD_CACHE_CAPACITY: usize = 1 << 20;

/// Everything a road search depends on. The side and the low-road rule are folded
/// into `pieces`, which holds exactly the squares allowed on the road.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RoadKey {
    pub pieces: BitBoard,
    pub size: u8,
    pub straight: bool,
}

#[derive(Debug)]
pub struct RoadCache {
    entries: RwLock<HashMap<RoadKey, bool>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for RoadCache {
    fn default() -> Self {
        RoadCache::with_capacity(DEFAULT_ROAD_CACHE_CAPACITY)
    }
}

impl RoadCache {
    /// A cache holding at most `capacity` results. It is emptied whenever it fills up.
    pub fn with_capacity(capacity: usize) -> Self {
        RoadCache {
            entries: RwLock::new(HashMap::new()),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up `key`, running `search` and storing its result if it isn't known yet
    pub fn get_or_insert_with<F: FnOnce() -> bool>(&self, key: RoadKey, search: F) -> bool {
        {
            let entries = self.entries.read().unwrap_or_else(|err| err.into_inner());
            if let Some(&has_road) = entries.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return has_road;
            }
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let has_road = search();

        let mut entries = self.entries.write().unwrap_or_else(|err| err.into_inner());
        if entries.len() >= self.capacity {
            debug!(
                "Road cache full with {} entries, clearing it",
                entries.len()
            );
            entries.clear();
        }
        entries.insert(key, has_road);
        has_road
    }

    /// Forget every stored result. Call this between batches of games with different board sizes.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|err| err.into_inner());
        debug!(
            "Clearing road cache: {} entries, {} hits, {} misses",
            entries.len(),
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed)
        );
        entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of lookups answered from the cache, and number that had to search
    pub fn stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }
}
