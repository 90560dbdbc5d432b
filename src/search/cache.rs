// file: src/search/cache.rs
// description: bounded cache of ranked results keyed by query and fuzzy settings

use crate::models::SearchMatch;
use std::collections::{BTreeSet, HashMap, VecDeque};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub fuzzy_enabled: bool,
    pub fuzzy_threshold: u8,
}

impl CacheKey {
    pub fn new(query: &str, fuzzy_enabled: bool, fuzzy_threshold: u8) -> Self {
        Self {
            query: query.to_string(),
            fuzzy_enabled,
            fuzzy_threshold,
        }
    }
}

/// Keywords and ranked matches of one finished search.
#[derive(Debug, Clone)]
pub struct CachedSearch {
    pub keywords: BTreeSet<String>,
    pub matches: Arc<[SearchMatch]>,
}

/// Holds at most `capacity` result lists; the oldest insertion goes first.
#[derive(Debug)]
pub struct SearchCache {
    capacity: usize,
    entries: HashMap<CacheKey, CachedSearch>,
    order: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl SearchCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<CachedSearch> {
        match self.entries.get(key) {
            Some(cached) => {
                self.hits += 1;
                Some(cached.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, search: CachedSearch) {
        if self.capacity == 0 {
            return;
        }

        if self.entries.insert(key.clone(), search).is_some() {
            return;
        }
        self.order.push_back(key);

        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// (hits, misses) since creation.
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}
