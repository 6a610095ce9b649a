//! Offline cache tests
//!
//! Runs the caching strategies against a fake network that counts fetches
//! and can be taken offline

use maru_tts::cache::strategy::{OPTIONAL_RESOURCES, SHELL_ENTRY, STATIC_RESOURCES};
use maru_tts::cache::{
    Destination, Fetcher, OfflineCache, Request, Response, Route, RUNTIME_CACHE, STATIC_CACHE,
};
use maru_tts::{MaruError, Result};
use std::collections::HashMap;

const ORIGIN: &str = "https://maru.example/";

#[derive(Default)]
struct FakeNetwork {
    online: bool,
    fetches: usize,
    /// Status per path; paths not listed answer 200
    statuses: HashMap<String, u16>,
}

impl FakeNetwork {
    fn online() -> Self {
        Self {
            online: true,
            ..Default::default()
        }
    }

    fn offline() -> Self {
        Self::default()
    }
}

impl Fetcher for FakeNetwork {
    fn fetch(&mut self, request: &Request) -> Result<Response> {
        self.fetches += 1;
        if !self.online {
            return Err(MaruError::Fetch("network unreachable".to_string()));
        }
        let path = request.url.path().to_string();
        let status = self.statuses.get(&path).copied().unwrap_or(200);
        Ok(Response::new(status, format!("body of {}", path)))
    }
}

fn get(path: &str) -> Request {
    Request::get(&format!("https://maru.example{}", path)).unwrap()
}

#[test]
fn test_cache_first_never_refetches() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();

    let first = cache.handle(&get("/styles.css"), &mut network).unwrap().unwrap();
    assert_eq!(network.fetches, 1);

    network.online = false;
    let second = cache.handle(&get("/styles.css"), &mut network).unwrap().unwrap();
    assert_eq!(network.fetches, 1);
    assert_eq!(first, second);
}

#[test]
fn test_failed_responses_not_cached() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();
    network.statuses.insert("/missing.png".to_string(), 404);

    let response = cache.handle(&get("/missing.png"), &mut network).unwrap().unwrap();
    assert_eq!(response.status, 404);
    cache.handle(&get("/missing.png"), &mut network).unwrap().unwrap();
    assert_eq!(network.fetches, 2);
}

#[test]
fn test_network_first_falls_back_to_cache() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();

    cache.handle(&get("/voices.json"), &mut network).unwrap().unwrap();
    cache.handle(&get("/voices.json"), &mut network).unwrap().unwrap();
    // Always tries the network while it is up
    assert_eq!(network.fetches, 2);

    network.online = false;
    let response = cache.handle(&get("/voices.json"), &mut network).unwrap().unwrap();
    assert_eq!(response.body, b"body of /voices.json");

    let result = cache.handle(&get("/never-seen"), &mut network).unwrap();
    assert!(matches!(result, Err(MaruError::Offline(_))));
}

#[test]
fn test_offline_document_gets_app_shell() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    cache.install(&mut FakeNetwork::online()).unwrap();

    let mut network = FakeNetwork::offline();

    // Precached shell paths are served directly
    let index = cache.handle(&get("/"), &mut network).unwrap().unwrap();
    assert_eq!(index.body, b"body of /");
    assert_eq!(network.fetches, 0);

    // Evict "/" so the document has to fall back
    cache.storage_mut().delete(STATIC_CACHE);
    cache.storage_mut().open(STATIC_CACHE).put(
        &get(SHELL_ENTRY),
        Response::new(200, "shell").with_content_type("text/html"),
    );

    let document = get("/").with_destination(Destination::Document);
    let response = cache.handle(&document, &mut network).unwrap().unwrap();
    assert_eq!(response.body, b"shell");

    // Non-document requests get the error
    let result = cache.handle(&get("/manifest.json"), &mut network).unwrap();
    assert!(result.is_err());
}

#[test]
fn test_install_is_all_or_nothing() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();
    network.statuses.insert("/app.js".to_string(), 500);

    assert!(cache.install(&mut network).is_err());
    assert!(!cache.storage().has(STATIC_CACHE));

    network.statuses.clear();
    cache.install(&mut network).unwrap();
    let shell = cache.storage().get(STATIC_CACHE).unwrap();
    assert_eq!(shell.len(), STATIC_RESOURCES.len());
}

#[test]
fn test_install_tolerates_missing_optional_resources() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();
    network
        .statuses
        .insert(OPTIONAL_RESOURCES[0].to_string(), 404);

    cache.install(&mut network).unwrap();
    let runtime = cache.storage().get(RUNTIME_CACHE).unwrap();
    assert_eq!(runtime.len(), OPTIONAL_RESOURCES.len() - 1);
}

#[test]
fn test_activate_removes_old_generations() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    cache.storage_mut().open("maru-tts-v0.9.0");
    cache.storage_mut().open("maru-tts-static-v0.9.0");
    cache.storage_mut().open(RUNTIME_CACHE);
    cache.storage_mut().open(STATIC_CACHE);

    let deleted = cache.activate();
    assert_eq!(deleted, vec!["maru-tts-v0.9.0", "maru-tts-static-v0.9.0"]);
    assert_eq!(cache.storage().keys(), vec![RUNTIME_CACHE, STATIC_CACHE]);
    assert!(cache.activate().is_empty());
}

#[test]
fn test_passthrough() {
    let mut cache = OfflineCache::new(ORIGIN).unwrap();
    let mut network = FakeNetwork::online();

    let foreign = Request::get("https://fonts.example/font.woff2").unwrap();
    assert_eq!(cache.route(&foreign), Route::Passthrough);
    assert!(cache.handle(&foreign, &mut network).is_none());

    let post = get("/api/speak").with_method("POST");
    assert!(cache.handle(&post, &mut network).is_none());
    assert_eq!(network.fetches, 0);
}
