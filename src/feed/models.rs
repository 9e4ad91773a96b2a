use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apartment {
    pub price: f64,
    pub area: f64,
    pub rooms: u32,
    /// Display-only fields (title, floor, image, ...) passed through untouched.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Apartment {
    pub fn new(price: f64, area: f64, rooms: u32) -> Self {
        Self {
            price,
            area,
            rooms,
            details: Map::new(),
        }
    }
}

/// One page of `GET {flats_base_url}/{page}.json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlatsResponse {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub next: Option<u32>,
    #[serde(default)]
    pub items: Vec<Apartment>,
}

/// Body of `GET {rooms_url}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomsResponse {
    #[serde(default)]
    pub items: Vec<u32>,
}
