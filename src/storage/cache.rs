use std::sync::Arc;

use serde_json::Value;

use crate::error::CacheError;
use crate::storage::{FilterStorage, CACHE_KEY};
use crate::store::filter::{FilterSelection, Interval};

/// Reads and writes the [`FilterSelection`] record under [`CACHE_KEY`].
#[derive(Clone)]
pub struct FilterCache {
    storage: Arc<dyn FilterStorage>,
}

impl FilterCache {
    pub fn new(storage: Arc<dyn FilterStorage>) -> Self {
        Self { storage }
    }

    pub fn save(&self, selection: &FilterSelection) -> Result<(), CacheError> {
        let raw = serde_json::to_string(selection)?;
        self.storage.set_item(CACHE_KEY, &raw)
    }

    /// The stored selection laid over `current`, or `None` if nothing is
    /// stored. Fields that are missing or malformed keep their `current`
    /// value; a missing room list means "all rooms".
    pub fn load(&self, current: &FilterSelection) -> Result<Option<FilterSelection>, CacheError> {
        let Some(raw) = self.storage.get_item(CACHE_KEY)? else {
            return Ok(None);
        };

        let data: Value = serde_json::from_str(&raw)?;
        Ok(Some(overlay(&data, current)))
    }
}

fn overlay(data: &Value, current: &FilterSelection) -> FilterSelection {
    let selected_rooms = data
        .get("selectedRooms")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(to_room).collect())
        .unwrap_or_default();

    FilterSelection {
        selected_rooms,
        price_filter_value: to_interval(data.get("priceFilterValue"))
            .unwrap_or(current.price_filter_value),
        area_filter_value: to_interval(data.get("areaFilterValue"))
            .unwrap_or(current.area_filter_value),
    }
}

fn to_interval(value: Option<&Value>) -> Option<Interval> {
    match value?.as_array()?.as_slice() {
        [from, to] => Some([to_number(from)?, to_number(to)?]),
        _ => None,
    }
}

fn to_room(value: &Value) -> Option<u32> {
    let n = to_number(value)?;
    (n >= 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX)).then_some(n as u32)
}

/// Lenient numeric coercion: numbers, numeric strings (blank is 0), booleans
/// and null. Anything that does not yield a finite number is rejected.
fn to_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                0.0
            } else {
                s.parse().ok()?
            }
        }
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Null => 0.0,
        Value::Array(_) | Value::Object(_) => return None,
    };
    n.is_finite().then_some(n)
}
