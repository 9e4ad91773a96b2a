//! Shared fixtures for store integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use flat_listing::error::{CacheError, FeedError};
use flat_listing::feed::{Apartment, FlatsResponse, ListingSource, RoomsResponse};
use flat_listing::storage::{FilterStorage, MemoryStorage};

pub fn flat(price: f64, area: f64, rooms: u32) -> Apartment {
    Apartment::new(price, area, rooms)
}

fn decode_error(url: &str) -> FeedError {
    FeedError::Decode {
        url: url.to_string(),
        source: serde_json::from_str::<FlatsResponse>("<html>502</html>").unwrap_err(),
    }
}

/// Canned listing backend. Pages that were not registered answer with a
/// decode error, like an HTML error page would. Every call yields once so
/// concurrent callers interleave.
#[derive(Default)]
pub struct FakeSource {
    pages: Mutex<HashMap<u32, FlatsResponse>>,
    rooms: Mutex<Option<Vec<u32>>>,
    flats_calls: AtomicUsize,
    rooms_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, items: Vec<Apartment>, next: Option<u32>) -> Self {
        self.set_page(page, items, next);
        self
    }

    pub fn set_page(&self, page: u32, items: Vec<Apartment>, next: Option<u32>) {
        let count = items.len() as u64;
        self.pages
            .lock()
            .insert(page, FlatsResponse { count, next, items });
    }

    pub fn set_rooms(&self, rooms: Option<Vec<u32>>) {
        *self.rooms.lock() = rooms;
    }

    pub fn flats_calls(&self) -> usize {
        self.flats_calls.load(Ordering::SeqCst)
    }

    pub fn rooms_calls(&self) -> usize {
        self.rooms_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingSource for FakeSource {
    async fn fetch_flats_page(&self, page: u32) -> Result<FlatsResponse, FeedError> {
        self.flats_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let url = format!("fake://flats/{page}.json");
        self.pages
            .lock()
            .get(&page)
            .cloned()
            .ok_or_else(|| decode_error(&url))
    }

    async fn fetch_rooms(&self) -> Result<RoomsResponse, FeedError> {
        self.rooms_calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        match self.rooms.lock().clone() {
            Some(items) => Ok(RoomsResponse { items }),
            None => Err(decode_error("fake://rooms.json")),
        }
    }
}

/// Memory storage that counts writes.
#[derive(Default)]
pub struct CountingStorage {
    inner: MemoryStorage,
    writes: AtomicUsize,
}

impl CountingStorage {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl FilterStorage for CountingStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set_item(key, value)
    }
}

pub fn first_page_source() -> Arc<FakeSource> {
    Arc::new(FakeSource::new().with_page(
        1,
        vec![flat(100.0, 20.0, 1), flat(300.0, 50.0, 2)],
        Some(2),
    ))
}

/// Collects formatted `tracing` output of the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Routes this thread's events here until the guard is dropped.
    pub fn install() -> (Self, DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.contents().contains(needle)
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
