use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::feed::Apartment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Price,
    Area,
    Rooms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

/// No key or no direction means list order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: Option<SortKey>,
    pub direction: Option<Direction>,
}

impl SortState {
    pub fn by(key: SortKey, direction: Direction) -> Self {
        Self {
            key: Some(key),
            direction: Some(direction),
        }
    }

    /// Header-click behaviour: asc, then desc, then unsorted. A different
    /// key starts over at asc.
    pub fn toggled(self, key: SortKey) -> Self {
        match (self.key, self.direction) {
            (Some(current), Some(Direction::Asc)) if current == key => {
                Self::by(key, Direction::Desc)
            }
            (Some(current), Some(Direction::Desc)) if current == key => Self::default(),
            _ => Self::by(key, Direction::Asc),
        }
    }

    /// Stable sort, so equal keys keep list order.
    pub fn apply(&self, flats: &mut [Apartment]) {
        let (Some(key), Some(direction)) = (self.key, self.direction) else {
            return;
        };

        flats.sort_by(|a, b| {
            let ord = compare(key, a, b);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });
    }
}

fn compare(key: SortKey, a: &Apartment, b: &Apartment) -> Ordering {
    match key {
        SortKey::Price => a.price.total_cmp(&b.price),
        SortKey::Area => a.area.total_cmp(&b.area),
        SortKey::Rooms => a.rooms.cmp(&b.rooms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(price: f64, rooms: u32, title: &str) -> Apartment {
        let mut flat = Apartment::new(price, 30.0, rooms);
        flat.details.insert("title".into(), title.into());
        flat
    }

    fn titles(flats: &[Apartment]) -> Vec<&str> {
        flats
            .iter()
            .map(|f| f.details["title"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn toggling_same_key_cycles_to_unsorted() {
        let state = SortState::default().toggled(SortKey::Price);
        assert_eq!(state, SortState::by(SortKey::Price, Direction::Asc));

        let state = state.toggled(SortKey::Price);
        assert_eq!(state, SortState::by(SortKey::Price, Direction::Desc));

        assert_eq!(state.toggled(SortKey::Price), SortState::default());
    }

    #[test]
    fn new_key_starts_ascending() {
        let state = SortState::by(SortKey::Price, Direction::Desc).toggled(SortKey::Area);
        assert_eq!(state, SortState::by(SortKey::Area, Direction::Asc));
    }

    #[test]
    fn sort_is_stable_both_ways() {
        let mut flats = vec![flat(200.0, 2, "a"), flat(100.0, 1, "b"), flat(200.0, 3, "c")];

        SortState::by(SortKey::Price, Direction::Asc).apply(&mut flats);
        assert_eq!(titles(&flats), vec!["b", "a", "c"]);

        SortState::by(SortKey::Price, Direction::Desc).apply(&mut flats);
        assert_eq!(titles(&flats), vec!["a", "c", "b"]);
    }

    #[test]
    fn unsorted_state_keeps_order() {
        let mut flats = vec![flat(300.0, 2, "x"), flat(100.0, 1, "y")];
        SortState::default().apply(&mut flats);
        assert_eq!(titles(&flats), vec!["x", "y"]);
    }
}
