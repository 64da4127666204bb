use std::fmt;

use serde::{Deserialize, Serialize};

/// Neighbor offsets in fixed clockwise order starting north.
/// Every iteration over adjacent tiles uses this order so that
/// path and drop-site choices are deterministic.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Grid position. Derived `Ord` (x-major, then y) gives map containers a
/// stable iteration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: moves needed on an 8-neighbor grid with no
    /// terrain in the way.
    pub fn distance(self, other: Coord) -> u32 {
        let dx = (self.x - other.x).abs();
        let dy = (self.y - other.y).abs();
        dx.max(dy) as u32
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self != other && self.distance(other) == 1
    }

    /// The eight surrounding coordinates in [`NEIGHBOR_OFFSETS`] order.
    /// Off-map coordinates are not filtered here.
    pub fn neighbors(self) -> impl Iterator<Item = Coord> {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| Coord::new(self.x + dx, self.y + dy))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Where a unit or goods parcel currently is.
///
/// `Settlement` and `Aboard` reference their container by ID; IDs come from
/// one shared generator, so the reference kind is never ambiguous. `Homeland`
/// is the off-map overseas port colonial factions ship to and from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Tile(Coord),
    Settlement(u64),
    Aboard(u64),
    Homeland,
}

impl Location {
    pub fn settlement_id(self) -> Option<u64> {
        match self {
            Location::Settlement(id) => Some(id),
            _ => None,
        }
    }

    pub fn carrier_id(self) -> Option<u64> {
        match self {
            Location::Aboard(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_aboard(self) -> bool {
        matches!(self, Location::Aboard(_))
    }

    pub fn is_homeland(self) -> bool {
        matches!(self, Location::Homeland)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Tile(c) => write!(f, "tile {c}"),
            Location::Settlement(id) => write!(f, "settlement {id}"),
            Location::Aboard(id) => write!(f, "aboard {id}"),
            Location::Homeland => write!(f, "homeland"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_chebyshev() {
        let a = Coord::new(0, 0);
        assert_eq!(a.distance(Coord::new(3, 1)), 3);
        assert_eq!(a.distance(Coord::new(-2, -2)), 2);
        assert_eq!(a.distance(a), 0);
    }

    #[test]
    fn adjacency_excludes_self() {
        let a = Coord::new(4, 4);
        assert!(a.is_adjacent(Coord::new(5, 5)));
        assert!(a.is_adjacent(Coord::new(4, 3)));
        assert!(!a.is_adjacent(a));
        assert!(!a.is_adjacent(Coord::new(6, 4)));
    }

    #[test]
    fn neighbors_are_deterministic_and_complete() {
        let c = Coord::new(2, 2);
        let ns: Vec<Coord> = c.neighbors().collect();
        assert_eq!(ns.len(), 8);
        assert_eq!(ns[0], Coord::new(2, 1));
        assert_eq!(ns[4], Coord::new(2, 3));
        assert!(ns.iter().all(|n| c.is_adjacent(*n)));
    }

    #[test]
    fn location_accessors() {
        assert_eq!(Location::Settlement(7).settlement_id(), Some(7));
        assert_eq!(Location::Tile(Coord::new(1, 1)).settlement_id(), None);
        assert_eq!(Location::Aboard(3).carrier_id(), Some(3));
        assert!(Location::Aboard(3).is_aboard());
        assert!(Location::Homeland.is_homeland());
        assert!(!Location::Tile(Coord::new(0, 0)).is_aboard());
    }

    #[test]
    fn serde_round_trip() {
        let locs = [
            Location::Tile(Coord::new(3, -1)),
            Location::Settlement(12),
            Location::Aboard(4),
            Location::Homeland,
        ];
        for loc in locs {
            let json = serde_json::to_string(&loc).unwrap();
            let parsed: Location = serde_json::from_str(&json).unwrap();
            assert_eq!(loc, parsed);
        }
    }

    #[test]
    fn coord_ordering_is_stable() {
        let mut coords = vec![Coord::new(1, 0), Coord::new(0, 1), Coord::new(0, 0)];
        coords.sort();
        assert_eq!(
            coords,
            vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)]
        );
    }
}
