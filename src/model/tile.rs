use serde::{Deserialize, Serialize};

use super::rules::{GoodsKind, ImprovementKind, Terrain};

/// Pioneer work in progress on a tile. Only one job runs at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileWork {
    pub kind: ImprovementKind,
    pub remaining: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub terrain: Terrain,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub improvements: Vec<ImprovementKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<TileWork>,
}

impl Tile {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            improvements: Vec::new(),
            work: None,
        }
    }

    pub fn has_improvement(&self, kind: ImprovementKind) -> bool {
        self.improvements.contains(&kind)
    }

    /// Current yield of one goods kind, base terrain plus improvements.
    pub fn yield_of(&self, goods: GoodsKind) -> i32 {
        let base = self.terrain.base_yield(goods);
        let bonus: i32 = self
            .improvements
            .iter()
            .map(|i| i.yield_delta(self.terrain, goods))
            .sum();
        base + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_stack_improvements_on_base() {
        let mut tile = Tile::new(Terrain::Plains);
        assert_eq!(tile.yield_of(GoodsKind::Food), 3);
        tile.improvements.push(ImprovementKind::Plow);
        assert_eq!(tile.yield_of(GoodsKind::Food), 4);
        tile.improvements.push(ImprovementKind::River);
        assert_eq!(tile.yield_of(GoodsKind::Food), 5);
    }

    #[test]
    fn has_improvement() {
        let mut tile = Tile::new(Terrain::Hills);
        assert!(!tile.has_improvement(ImprovementKind::Road));
        tile.improvements.push(ImprovementKind::Road);
        assert!(tile.has_improvement(ImprovementKind::Road));
        assert_eq!(tile.yield_of(GoodsKind::Ore), 5);
    }
}
