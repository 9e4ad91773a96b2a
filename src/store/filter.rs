//! Pure derivations over the loaded list: observed bounds, the filter
//! predicate and whether any filter narrows the list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::feed::Apartment;

/// Closed numeric range `[from, to]`.
pub type Interval = [f64; 2];

/// What the user picked. This is also the persisted cache record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSelection {
    pub selected_rooms: BTreeSet<u32>,
    pub price_filter_value: Interval,
    pub area_filter_value: Interval,
}

impl FilterSelection {
    pub fn matches(&self, flat: &Apartment) -> bool {
        (self.selected_rooms.is_empty() || self.selected_rooms.contains(&flat.rooms))
            && contains(self.price_filter_value, flat.price)
            && contains(self.area_filter_value, flat.area)
    }

    /// Order-preserving view of the flats that pass every predicate.
    pub fn filter<'a>(&'a self, flats: &'a [Apartment]) -> impl Iterator<Item = &'a Apartment> {
        flats.iter().filter(move |flat| self.matches(flat))
    }

    pub fn is_active(&self, bounds: &Bounds) -> bool {
        !self.selected_rooms.is_empty()
            || self.price_filter_value != bounds.price()
            || self.area_filter_value != bounds.area()
    }

    pub fn reset(&mut self, bounds: &Bounds) {
        self.selected_rooms.clear();
        self.price_filter_value = bounds.price();
        self.area_filter_value = bounds.area();
    }

    /// Copy of the room selection with `rooms` flipped.
    pub fn toggled_rooms(&self, rooms: u32) -> BTreeSet<u32> {
        let mut options = self.selected_rooms.clone();
        if !options.remove(&rooms) {
            options.insert(rooms);
        }
        options
    }
}

fn contains(interval: Interval, value: f64) -> bool {
    value >= interval[0] && value <= interval[1]
}

/// Observed min/max of price and area across the loaded list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub min_price: f64,
    pub max_price: f64,
    pub min_area: f64,
    pub max_area: f64,
}

impl Bounds {
    /// All zero for an empty list.
    pub fn of(flats: &[Apartment]) -> Self {
        let [min_price, max_price] = min_max(flats.iter().map(|f| f.price));
        let [min_area, max_area] = min_max(flats.iter().map(|f| f.area));
        Self {
            min_price,
            max_price,
            min_area,
            max_area,
        }
    }

    pub fn price(&self) -> Interval {
        [self.min_price, self.max_price]
    }

    pub fn area(&self) -> Interval {
        [self.min_area, self.max_area]
    }
}

fn min_max(mut values: impl Iterator<Item = f64>) -> Interval {
    let Some(first) = values.next() else {
        return [0.0, 0.0];
    };
    values.fold([first, first], |[lo, hi], v| [lo.min(v), hi.max(v)])
}

/// Orders the ends and pulls both inside `limits`.
pub fn clamp_interval(interval: Interval, limits: Interval) -> Interval {
    let [lo, hi] = limits;
    let clamp = |v: f64| v.max(lo).min(hi);
    let (from, to) = if interval[0] <= interval[1] {
        (interval[0], interval[1])
    } else {
        (interval[1], interval[0])
    };
    [clamp(from), clamp(to)]
}
