use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::FeedError;
use crate::feed::models::{FlatsResponse, RoomsResponse};
use crate::feed::ListingSource;

pub fn build_client() -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(concat!("flat-listing/", env!("CARGO_PKG_VERSION")))
        .build()
}

pub fn flats_page_url(base_url: &str, page: u32) -> String {
    format!("{}/{}.json", base_url.trim_end_matches('/'), page)
}

async fn fetch_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FeedError> {
    let transport = |source: reqwest::Error| FeedError::Transport {
        url: url.to_string(),
        source,
    };

    let res = client.get(url).send().await.map_err(transport)?;
    debug!(url, status = %res.status(), "Feed responded");

    // Status is not checked: a non-JSON error page fails decoding instead.
    let text = res.text().await.map_err(transport)?;

    serde_json::from_str(&text).map_err(|source| FeedError::Decode {
        url: url.to_string(),
        source,
    })
}

/// The paginated listing backend reached over HTTP.
pub struct HttpListingSource {
    client: Client,
    flats_base_url: String,
    rooms_url: String,
}

impl HttpListingSource {
    pub fn new(
        client: Client,
        flats_base_url: impl Into<String>,
        rooms_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            flats_base_url: flats_base_url.into(),
            rooms_url: rooms_url.into(),
        }
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_flats_page(&self, page: u32) -> Result<FlatsResponse, FeedError> {
        let url = flats_page_url(&self.flats_base_url, page);
        fetch_json(&self.client, &url).await
    }

    async fn fetch_rooms(&self) -> Result<RoomsResponse, FeedError> {
        fetch_json(&self.client, &self.rooms_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_appends_json_suffix() {
        assert_eq!(
            flats_page_url("https://api.example.com/flats", 3),
            "https://api.example.com/flats/3.json"
        );
        assert_eq!(
            flats_page_url("https://api.example.com/flats/", 1),
            "https://api.example.com/flats/1.json"
        );
    }

    #[tokio::test]
    async fn unreachable_host_is_a_transport_error() {
        let source = HttpListingSource::new(
            build_client().unwrap(),
            "http://127.0.0.1:9/flats",
            "http://127.0.0.1:9/rooms.json",
        );

        let err = source.fetch_rooms().await.unwrap_err();
        assert!(matches!(err, FeedError::Transport { .. }));
    }
}
