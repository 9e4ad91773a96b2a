//! Listing/filter store.
//!
//! Owns the paginated flat list, the room facets and the user's filter
//! selection, and derives bounds and filtered views from them on every read.
//! Fetches go through a [`ListingSource`]; each kind of fetch is guarded by
//! an in-flight flag, so a second call while one is pending is dropped.
//!
//! When the store has durable storage, every change to the filter selection
//! schedules a save through one debouncer shared by all selection fields.
//! The saved selection is laid back over the data-derived defaults after
//! each page load.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::debounce::Debouncer;
use crate::feed::{Apartment, ListingSource};
use crate::storage::{FilterCache, FilterStorage};

pub mod filter;
pub mod sort;

pub use filter::{Bounds, FilterSelection, Interval};
pub use sort::{Direction, SortKey, SortState};

use filter::clamp_interval;

#[derive(Debug, Clone, PartialEq)]
pub struct StoreState {
    pub flats_list: Vec<Apartment>,
    pub rooms_list: Vec<u32>,
    pub current_page: u32,
    pub flats_loading: bool,
    pub rooms_loading: bool,
    pub flats_data_loaded: bool,
    pub rooms_data_loaded: bool,
    pub can_fetch_more: bool,
    pub selection: FilterSelection,
    pub sort_state: SortState,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            flats_list: Vec::new(),
            rooms_list: Vec::new(),
            current_page: 1,
            flats_loading: false,
            rooms_loading: false,
            flats_data_loaded: false,
            rooms_data_loaded: false,
            can_fetch_more: false,
            selection: FilterSelection::default(),
            sort_state: SortState::default(),
        }
    }
}

impl StoreState {
    pub fn bounds(&self) -> Bounds {
        Bounds::of(&self.flats_list)
    }

    pub fn filtered_flats_list(&self) -> Vec<Apartment> {
        self.selection.filter(&self.flats_list).cloned().collect()
    }

    pub fn filters_active(&self) -> bool {
        self.selection.is_active(&self.bounds())
    }

    /// Orders the interval and, once there is data, keeps it inside `limits`.
    fn fit(&self, interval: Interval, limits: Interval) -> Interval {
        if self.flats_list.is_empty() {
            clamp_interval(interval, [f64::NEG_INFINITY, f64::INFINITY])
        } else {
            clamp_interval(interval, limits)
        }
    }
}

#[derive(Clone, Copy)]
enum Fetch {
    Flats,
    Rooms,
}

impl Fetch {
    fn flag(self, state: &mut StoreState) -> &mut bool {
        match self {
            Fetch::Flats => &mut state.flats_loading,
            Fetch::Rooms => &mut state.rooms_loading,
        }
    }
}

/// Clears a loading flag when the fetch ends, however it ends.
struct Loading {
    state: Arc<Mutex<StoreState>>,
    fetch: Fetch,
}

impl Drop for Loading {
    fn drop(&mut self) {
        *self.fetch.flag(&mut self.state.lock()) = false;
    }
}

pub struct FlatsStore {
    state: Arc<Mutex<StoreState>>,
    source: Arc<dyn ListingSource>,
    cache: Option<FilterCache>,
    save_debounce: Option<Debouncer<()>>,
}

impl FlatsStore {
    /// A store without durable storage: selections are neither saved nor
    /// restored.
    pub fn new(source: Arc<dyn ListingSource>) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            source,
            cache: None,
            save_debounce: None,
        }
    }

    /// Persists the filter selection to `storage`, `save_delay` after the
    /// last change.
    pub fn with_storage(mut self, storage: Arc<dyn FilterStorage>, save_delay: Duration) -> Self {
        let cache = FilterCache::new(storage);
        let writer = cache.clone();
        let state = Arc::clone(&self.state);

        self.save_debounce = Some(Debouncer::with_delay(
            move |()| {
                let selection = state.lock().selection.clone();
                match writer.save(&selection) {
                    Ok(()) => debug!(rooms = selection.selected_rooms.len(), "Filter selection saved"),
                    Err(e) => warn!(error = %e, "Failed to save filter selection"),
                }
            },
            save_delay,
        ));
        self.cache = Some(cache);
        self
    }

    pub fn has_storage(&self) -> bool {
        self.cache.is_some()
    }

    /// Loads the next page and appends it.
    ///
    /// The first successful page seeds both ranges to the observed min/max,
    /// then any saved selection is laid over them. Failures are logged and
    /// leave the list and cursor untouched.
    pub async fn fetch_more_flats(&self) {
        let Some(_loading) = self.begin(Fetch::Flats) else {
            debug!("Flats fetch already in flight");
            return;
        };

        let page = self.state.lock().current_page;
        info!(page, "Fetching flats page");

        let response = match self.source.fetch_flats_page(page).await {
            Ok(v) => v,
            Err(e) => {
                error!(page, error = %e, "Failed to fetch flats page");
                return;
            }
        };

        let received = response.items.len();
        self.mutate(|state| {
            state.flats_list.extend(response.items);
            state.current_page += 1;
            state.can_fetch_more = response.next.is_some();

            if !state.flats_data_loaded {
                let bounds = state.bounds();
                state.selection.price_filter_value = bounds.price();
                state.selection.area_filter_value = bounds.area();
            }

            info!(
                page,
                received,
                total = state.flats_list.len(),
                count = response.count,
                has_next = state.can_fetch_more,
                "Flats page loaded"
            );
        });

        self.load_cache();

        self.state.lock().flats_data_loaded = true;
    }

    /// Loads the room facets. An empty answer keeps the current facets.
    pub async fn fetch_available_rooms_data(&self) {
        let Some(_loading) = self.begin(Fetch::Rooms) else {
            debug!("Rooms fetch already in flight");
            return;
        };

        match self.source.fetch_rooms().await {
            Ok(response) => {
                let mut state = self.state.lock();
                if !response.items.is_empty() {
                    state.rooms_list = response.items;
                }
                state.rooms_data_loaded = true;
                info!(count = state.rooms_list.len(), "Room options loaded");
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch room options");
            }
        }
    }

    /// Lays the saved selection over the current one. Does nothing without
    /// storage or when nothing is saved.
    pub fn load_cache(&self) {
        let Some(cache) = &self.cache else {
            return;
        };

        self.mutate(|state| match cache.load(&state.selection) {
            Ok(Some(loaded)) => {
                // Restored as stored; later pages may widen the bounds to it.
                state.selection = loaded;
                debug!("Saved filter selection restored");
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable filter cache"),
        });
    }

    pub fn toggle_room_options(&self, rooms: u32) {
        self.mutate(|state| {
            state.selection.selected_rooms = state.selection.toggled_rooms(rooms);
        });
    }

    pub fn reset_filter(&self) {
        self.mutate(|state| {
            let bounds = state.bounds();
            state.selection.reset(&bounds);
        });
    }

    pub fn set_price_filter_value(&self, interval: Interval) {
        if !is_finite(interval) {
            warn!(?interval, "Ignoring non-finite price range");
            return;
        }
        self.mutate(|state| {
            let limits = state.bounds().price();
            state.selection.price_filter_value = state.fit(interval, limits);
        });
    }

    pub fn set_area_filter_value(&self, interval: Interval) {
        if !is_finite(interval) {
            warn!(?interval, "Ignoring non-finite area range");
            return;
        }
        self.mutate(|state| {
            let limits = state.bounds().area();
            state.selection.area_filter_value = state.fit(interval, limits);
        });
    }

    pub fn set_sort(&self, sort: SortState) {
        self.state.lock().sort_state = sort;
    }

    pub fn toggle_sort(&self, key: SortKey) {
        let mut state = self.state.lock();
        state.sort_state = state.sort_state.toggled(key);
    }

    pub fn snapshot(&self) -> StoreState {
        self.state.lock().clone()
    }

    pub fn flats_list(&self) -> Vec<Apartment> {
        self.state.lock().flats_list.clone()
    }

    pub fn rooms_list(&self) -> Vec<u32> {
        self.state.lock().rooms_list.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.state.lock().current_page
    }

    pub fn flats_loading(&self) -> bool {
        self.state.lock().flats_loading
    }

    pub fn rooms_loading(&self) -> bool {
        self.state.lock().rooms_loading
    }

    pub fn flats_data_loaded(&self) -> bool {
        self.state.lock().flats_data_loaded
    }

    pub fn rooms_data_loaded(&self) -> bool {
        self.state.lock().rooms_data_loaded
    }

    pub fn can_fetch_more(&self) -> bool {
        self.state.lock().can_fetch_more
    }

    pub fn selected_rooms(&self) -> BTreeSet<u32> {
        self.state.lock().selection.selected_rooms.clone()
    }

    pub fn price_filter_value(&self) -> Interval {
        self.state.lock().selection.price_filter_value
    }

    pub fn area_filter_value(&self) -> Interval {
        self.state.lock().selection.area_filter_value
    }

    pub fn sort_state(&self) -> SortState {
        self.state.lock().sort_state
    }

    pub fn bounds(&self) -> Bounds {
        self.state.lock().bounds()
    }

    pub fn min_price(&self) -> f64 {
        self.bounds().min_price
    }

    pub fn max_price(&self) -> f64 {
        self.bounds().max_price
    }

    pub fn min_area(&self) -> f64 {
        self.bounds().min_area
    }

    pub fn max_area(&self) -> f64 {
        self.bounds().max_area
    }

    pub fn filtered_flats_list(&self) -> Vec<Apartment> {
        self.state.lock().filtered_flats_list()
    }

    /// The filtered list in the current sort order.
    pub fn sorted_flats_list(&self) -> Vec<Apartment> {
        let state = self.state.lock();
        let mut flats = state.filtered_flats_list();
        state.sort_state.apply(&mut flats);
        flats
    }

    pub fn filters_active(&self) -> bool {
        self.state.lock().filters_active()
    }

    fn begin(&self, fetch: Fetch) -> Option<Loading> {
        let mut state = self.state.lock();
        let flag = fetch.flag(&mut state);
        if *flag {
            return None;
        }
        *flag = true;

        Some(Loading {
            state: Arc::clone(&self.state),
            fetch,
        })
    }

    /// Runs `f` under the lock and schedules a save if the filter
    /// selection changed. The lock is released before scheduling.
    fn mutate<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> R {
        let (out, changed) = {
            let mut state = self.state.lock();
            let before = state.selection.clone();
            let out = f(&mut state);
            let changed = state.selection != before;
            (out, changed)
        };

        if changed {
            if let Some(debounce) = &self.save_debounce {
                debounce.call(());
            }
        }
        out
    }
}

fn is_finite(interval: Interval) -> bool {
    interval.iter().all(|v| v.is_finite())
}

