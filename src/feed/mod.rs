//! The external listing backend: two read-only JSON endpoints.

use async_trait::async_trait;

use crate::error::FeedError;

pub mod fetcher;
pub mod models;

pub use fetcher::{build_client, HttpListingSource};
pub use models::{Apartment, FlatsResponse, RoomsResponse};

/// Where the store gets its data from.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_flats_page(&self, page: u32) -> Result<FlatsResponse, FeedError>;

    async fn fetch_rooms(&self) -> Result<RoomsResponse, FeedError>;
}
