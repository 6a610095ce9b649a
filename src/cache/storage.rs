//! Named response caches

use super::request::{Request, Response};
use std::collections::HashMap;

/// One named cache
#[derive(Debug, Clone, Default)]
pub struct Cache {
    entries: HashMap<String, Response>,
}

impl Cache {
    pub fn put(&mut self, request: &Request, response: Response) {
        self.entries.insert(request.cache_key(), response);
    }

    pub fn get(&self, request: &Request) -> Option<&Response> {
        self.entries.get(&request.cache_key())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// All caches, kept in the order they were created
#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    caches: Vec<(String, Cache)>,
}

impl CacheStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache called `name`, created if needed
    pub fn open(&mut self, name: &str) -> &mut Cache {
        let index = match self.caches.iter().position(|(n, _)| n == name) {
            Some(index) => index,
            None => {
                self.caches.push((name.to_string(), Cache::default()));
                self.caches.len() - 1
            }
        };
        &mut self.caches[index].1
    }

    pub fn get(&self, name: &str) -> Option<&Cache> {
        self.caches.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Remove a cache; returns whether it existed
    pub fn delete(&mut self, name: &str) -> bool {
        let before = self.caches.len();
        self.caches.retain(|(n, _)| n != name);
        self.caches.len() != before
    }

    /// Cache names in creation order
    pub fn keys(&self) -> Vec<String> {
        self.caches.iter().map(|(n, _)| n.clone()).collect()
    }

    /// First stored response for `request`, searching caches in order
    pub fn match_request(&self, request: &Request) -> Option<&Response> {
        self.caches.iter().find_map(|(_, cache)| cache.get(request))
    }
}
