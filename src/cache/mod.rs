//! Offline resource cache
//!
//! Keeps the app shell and static assets available without a network.
//! Caches are named by generation; activating a new generation drops the
//! old ones wholesale.

pub mod request;
pub mod storage;
pub mod strategy;

pub use request::{Destination, Request, Response};
pub use storage::{Cache, CacheStorage};
pub use strategy::{Fetcher, OfflineCache, Route, RUNTIME_CACHE, STATIC_CACHE};
