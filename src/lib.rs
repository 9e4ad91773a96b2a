//! Client-side state for an apartment listing: an incrementally paginated
//! feed, room/price/area filters derived over it, and debounced local
//! persistence of the filter selection.

pub mod config;
pub mod debounce;
pub mod error;
pub mod feed;
pub mod storage;
pub mod store;

pub use store::FlatsStore;
