//! Render cache
//!
//! One file per template base name, holding the rendered output together
//! with the fingerprint of the bindings it was rendered with and every file
//! it included. An entry is replayed only while none of those sources is
//! newer than the entry and the bindings are unchanged.

mod entry;
mod error;
mod lock;
mod store;

pub use entry::{CacheEntry, CacheHeader, CACHE_FORMAT};
pub use error::CacheError;
pub use store::{CacheStore, Freshness, StaleReason, DEFAULT_CACHE_EXTENSION};

/// How the cache took part in a render
#[derive(Debug)]
pub enum CacheStatus {
    /// Caching is switched off
    Disabled,
    /// Fresh entry replayed without rendering
    Hit,
    /// No entry existed; rendered and stored
    Miss,
    /// Entry was out of date; rendered and replaced
    Stale(StaleReason),
    /// Template source is gone; output served from the existing entry
    FallbackToCache,
    /// Cache could not be used; rendered without it
    Unavailable(CacheError),
}

impl CacheStatus {
    /// Output came from the cache file rather than the engine
    pub fn is_replay(&self) -> bool {
        matches!(self, CacheStatus::Hit | CacheStatus::FallbackToCache)
    }
}

impl std::fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheStatus::Disabled => write!(f, "disabled"),
            CacheStatus::Hit => write!(f, "hit"),
            CacheStatus::Miss => write!(f, "miss"),
            CacheStatus::Stale(reason) => write!(f, "stale ({})", reason),
            CacheStatus::FallbackToCache => write!(f, "fallback (source missing)"),
            CacheStatus::Unavailable(e) => write!(f, "unavailable ({})", e),
        }
    }
}
