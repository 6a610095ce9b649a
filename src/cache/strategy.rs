//! Offline caching strategies
//!
//! Same-origin GET requests are routed by path:
//! - static assets (stylesheets, scripts, images, fonts) are served cache
//!   first and cached when fetched
//! - the app shell is served cache first, and a document request that
//!   cannot reach the network gets the cached entry page
//! - everything else goes to the network first and falls back to the cache
//!
//! Other requests are left alone.

use super::request::{Destination, Request, Response};
use super::storage::CacheStorage;
use crate::{MaruError, Result};
use log::{debug, info, warn};
use url::Url;

/// Cache for responses fetched at runtime
pub const RUNTIME_CACHE: &str = "maru-tts-v1.0.0";

/// Cache for the precached app shell
pub const STATIC_CACHE: &str = "maru-tts-static-v1.0.0";

/// Precached on install; install fails if any of these fails
pub const STATIC_RESOURCES: &[&str] = &[
    "/",
    "/index.html",
    "/styles.css",
    "/app.js",
    "/manifest.json",
    "/icons/icon-144.png",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

/// Precached on install when available
pub const OPTIONAL_RESOURCES: &[&str] = &["/screenshots/desktop.png", "/screenshots/mobile.png"];

/// Entry page served to documents when offline
pub const SHELL_ENTRY: &str = "/index.html";

const STATIC_EXTENSIONS: &[&str] = &[
    ".css", ".js", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico", ".woff", ".woff2", ".ttf",
];

const APP_SHELL_PATHS: &[&str] = &["/", "/index.html", "/manifest.json"];

/// Network access used by the strategies
pub trait Fetcher {
    /// Fetch `request`; `Err` means the network could not be reached
    fn fetch(&mut self, request: &Request) -> Result<Response>;
}

/// How a request is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    CacheFirst,
    AppShell,
    NetworkFirst,
    /// Not handled; goes straight to the network
    Passthrough,
}

/// Path ends in a static asset extension
pub fn is_static_resource(path: &str) -> bool {
    STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// Path is part of the app shell
pub fn is_app_shell(path: &str) -> bool {
    APP_SHELL_PATHS.contains(&path)
}

/// Offline cache for one origin
pub struct OfflineCache {
    origin: Url,
    storage: CacheStorage,
}

impl OfflineCache {
    /// Cache serving requests for `origin`, e.g. "https://maru.example/"
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            origin: Url::parse(origin)?,
            storage: CacheStorage::new(),
        })
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut CacheStorage {
        &mut self.storage
    }

    /// Route `request` would take
    pub fn route(&self, request: &Request) -> Route {
        if request.url.origin() != self.origin.origin() || !request.is_get() {
            return Route::Passthrough;
        }

        let path = request.url.path();
        if is_static_resource(path) {
            Route::CacheFirst
        } else if is_app_shell(path) {
            Route::AppShell
        } else {
            Route::NetworkFirst
        }
    }

    /// Handle a request; `None` means it is left to the network untouched
    pub fn handle(
        &mut self,
        request: &Request,
        fetcher: &mut dyn Fetcher,
    ) -> Option<Result<Response>> {
        let route = self.route(request);
        debug!("{} {} -> {:?}", request.method, request.url, route);

        match route {
            Route::CacheFirst => Some(self.cache_first(request, fetcher)),
            Route::AppShell => Some(self.cache_first_with_network_fallback(request, fetcher)),
            Route::NetworkFirst => Some(self.network_first(request, fetcher)),
            Route::Passthrough => None,
        }
    }

    /// Serve from any cache, else fetch and keep successful responses
    pub fn cache_first(&mut self, request: &Request, fetcher: &mut dyn Fetcher) -> Result<Response> {
        if let Some(cached) = self.storage.match_request(request) {
            return Ok(cached.clone());
        }

        let response = fetcher.fetch(request).map_err(|e| {
            warn!("Cache first strategy failed: {}", e);
            e
        })?;

        if response.ok() {
            self.storage.open(RUNTIME_CACHE).put(request, response.clone());
        }
        Ok(response)
    }

    /// Like `cache_first`, but documents fall back to the cached entry page
    pub fn cache_first_with_network_fallback(
        &mut self,
        request: &Request,
        fetcher: &mut dyn Fetcher,
    ) -> Result<Response> {
        if let Some(cached) = self.storage.match_request(request) {
            return Ok(cached.clone());
        }

        match fetcher.fetch(request) {
            Ok(response) => {
                if response.ok() {
                    self.storage.open(STATIC_CACHE).put(request, response.clone());
                }
                Ok(response)
            }
            Err(e) => {
                warn!("Cache first with network fallback failed: {}", e);
                if request.destination == Destination::Document {
                    let entry = self.origin.join(SHELL_ENTRY)?;
                    let entry = Request::get(entry.as_str())?;
                    if let Some(shell) = self.storage.match_request(&entry) {
                        return Ok(shell.clone());
                    }
                }
                Err(e)
            }
        }
    }

    /// Fetch and keep successful responses, else serve from cache
    pub fn network_first(&mut self, request: &Request, fetcher: &mut dyn Fetcher) -> Result<Response> {
        match fetcher.fetch(request) {
            Ok(response) => {
                if response.ok() {
                    self.storage.open(RUNTIME_CACHE).put(request, response.clone());
                }
                Ok(response)
            }
            Err(e) => {
                warn!("Network first strategy failed, trying cache: {}", e);
                self.storage
                    .match_request(request)
                    .cloned()
                    .ok_or_else(|| MaruError::Offline(format!("{} ({})", request.url, e)))
            }
        }
    }

    /// Precache the app shell and whatever optional resources are reachable
    ///
    /// The shell is stored only if every resource fetched successfully.
    pub fn install(&mut self, fetcher: &mut dyn Fetcher) -> Result<()> {
        info!("Caching static resources...");
        let mut fetched = Vec::with_capacity(STATIC_RESOURCES.len());
        for path in STATIC_RESOURCES {
            let request = Request::get(self.origin.join(path)?.as_str())?;
            let response = fetcher.fetch(&request)?;
            if !response.ok() {
                return Err(MaruError::Fetch(format!(
                    "{} returned status {}",
                    request.url, response.status
                )));
            }
            fetched.push((request, response));
        }

        let cache = self.storage.open(STATIC_CACHE);
        for (request, response) in fetched {
            cache.put(&request, response);
        }

        info!("Caching optional resources...");
        for path in OPTIONAL_RESOURCES {
            let request = Request::get(self.origin.join(path)?.as_str())?;
            match fetcher.fetch(&request) {
                Ok(response) if response.ok() => {
                    self.storage.open(RUNTIME_CACHE).put(&request, response)
                }
                Ok(response) => debug!("Skipping {}: status {}", request.url, response.status),
                Err(e) => debug!("Skipping {}: {}", request.url, e),
            }
        }

        Ok(())
    }

    /// Delete every cache that is not a current generation
    pub fn activate(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .storage
            .keys()
            .into_iter()
            .filter(|name| name != RUNTIME_CACHE && name != STATIC_CACHE)
            .collect();

        for name in &stale {
            info!("Deleting old cache: {}", name);
            self.storage.delete(name);
        }
        stale
    }
}
