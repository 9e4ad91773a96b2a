//! Durable local storage for the user's filter selection.

use crate::error::CacheError;

pub mod cache;
pub mod local;

pub use cache::FilterCache;
pub use local::{FileStorage, MemoryStorage};

/// Key the filter selection is stored under.
pub const CACHE_KEY: &str = "flats-filter";

/// String key-value store, the same contract as browser local storage.
pub trait FilterStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError>;
}
