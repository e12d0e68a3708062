//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! Every supported game is strictly two-player. `Side::First` always makes
//! the opening move; `Side::Second` replies.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`, used for stores, pieces in hand
//! and other per-side counters.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The side that moves first.
    First,
    /// The side that replies.
    Second,
}

impl Side {
    /// Both sides in turn order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// Raw index (0 for `First`, 1 for `Second`).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }

    /// Score sign for evaluations: positive scores favor `First`.
    #[must_use]
    pub const fn sign(self) -> i32 {
        match self {
            Side::First => 1,
            Side::Second => -1,
        }
    }

    /// Lowercase label used in bet values and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Side::First => "first",
            Side::Second => "second",
        }
    }

    /// Parse a label produced by [`Side::label`].
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "first" => Some(Side::First),
            "second" => Some(Side::Second),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use boardstake::core::{Side, SideMap};
///
/// let mut stores: SideMap<u16> = SideMap::with_value(0);
/// stores[Side::Second] += 4;
///
/// assert_eq!(stores[Side::First], 0);
/// assert_eq!(stores[Side::Second], 4);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map from explicit values.
    pub const fn new(first: T, second: T) -> Self {
        Self {
            data: [first, second],
        }
    }

    /// Create a map with values from a factory function.
    pub fn from_fn(factory: impl Fn(Side) -> T) -> Self {
        Self::new(factory(Side::First), factory(Side::Second))
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(value.clone(), value)
    }

    /// Iterate over (Side, &T) pairs in turn order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        &self.data[side.index()]
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        &mut self.data[side.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_basics() {
        assert_eq!(Side::First.opponent(), Side::Second);
        assert_eq!(Side::Second.opponent(), Side::First);
        assert_eq!(Side::First.index(), 0);
        assert_eq!(Side::Second.index(), 1);
        assert_eq!(Side::First.sign(), 1);
        assert_eq!(Side::Second.sign(), -1);
        assert_eq!(format!("{}", Side::Second), "second");
    }

    #[test]
    fn test_side_labels() {
        for side in Side::BOTH {
            assert_eq!(Side::from_label(side.label()), Some(side));
        }
        assert_eq!(Side::from_label(" first "), Some(Side::First));
        assert_eq!(Side::from_label("draw"), None);
    }

    #[test]
    fn test_side_map_from_fn() {
        let map = SideMap::from_fn(|s| s.index() * 10);
        assert_eq!(map[Side::First], 0);
        assert_eq!(map[Side::Second], 10);
    }

    #[test]
    fn test_side_map_mutation() {
        let mut map: SideMap<i32> = SideMap::with_value(0);
        map[Side::First] = 10;
        map[Side::Second] -= 3;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Side::First, &10), (Side::Second, &-3)]);
    }

    #[test]
    fn test_side_map_serialization() {
        let map = SideMap::new(4u8, 9u8);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: SideMap<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
