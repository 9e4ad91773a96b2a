use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use crate::debounce::DEFAULT_DELAY;

pub struct Config {
    pub flats_base_url: String,
    pub rooms_url: String,
    /// No directory means no durable storage: filters are not persisted.
    pub filter_cache_dir: Option<PathBuf>,
    pub save_debounce: Duration,
    pub max_pages: u32,
    pub delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            flats_base_url: env::var("FLATS_BASE_URL").context("FLATS_BASE_URL is not set")?,
            rooms_url: env::var("ROOMS_URL").context("ROOMS_URL is not set")?,
            filter_cache_dir: env::var_os("FILTER_CACHE_DIR").map(PathBuf::from),
            save_debounce: optional::<u64>("FILTER_SAVE_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_DELAY),
            max_pages: optional("MAX_PAGES")?.unwrap_or(5),
            delay_ms: optional("DELAY_MS")?.unwrap_or(300),
        })
    }
}

fn optional<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e).with_context(|| format!("{name} is not readable")),
    }
}
