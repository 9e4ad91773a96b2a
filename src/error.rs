use thiserror::Error;

/// Failures on the listing feed path. The store logs and swallows these.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not a valid payload: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures reading or writing the persisted filter selection.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed cache payload: {0}")]
    Malformed(#[from] serde_json::Error),
}
