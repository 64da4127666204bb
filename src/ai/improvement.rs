use serde::{Deserialize, Serialize};

use crate::model::{Coord, GoodsKind, ImprovementKind, Tile, World};

/// A scored proposal to improve one tile for one goods kind.
///
/// Plans are planner-side bookkeeping, not world state: the world only
/// changes when a pioneer works the tile. `kind` and `target` are optional
/// solely because persisted plans can come back without them; such a plan is
/// invalid and gets discarded, never repaired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementPlan {
    pub id: u64,
    pub target: Option<Coord>,
    pub kind: Option<ImprovementKind>,
    pub value: i32,
    /// Agent working the plan, if one has taken it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor: Option<u64>,
}

impl ImprovementPlan {
    pub fn new(id: u64, target: Coord, kind: ImprovementKind, value: i32) -> Self {
        Self {
            id,
            target: Some(target),
            kind: Some(kind),
            value,
            executor: None,
        }
    }

    /// A blank survey plan for `target`: no kind, no value, id 0 until the
    /// planner registers it. [`update_best`] decides whether the tile
    /// deserves the plan and what it should build.
    ///
    /// [`update_best`]: ImprovementPlan::update_best
    pub fn draft(target: Coord) -> Self {
        Self {
            id: 0,
            target: Some(target),
            kind: None,
            value: 0,
            executor: None,
        }
    }

    /// The most valuable improvement that could be started on `tile` for
    /// `goods`, with its value. Natural features, improvements already
    /// present, kinds the terrain refuses, and kinds costing more than one
    /// tool bundle are all out; so is anything without a positive yield
    /// gain. Ties keep the first kind in catalog order.
    pub fn best_improvement_for(
        tile: &Tile,
        goods: GoodsKind,
    ) -> Option<(ImprovementKind, i32)> {
        let mut best: Option<(ImprovementKind, i32)> = None;
        for kind in ImprovementKind::ALL {
            if kind.is_natural()
                || kind.tool_cost() > 1
                || !kind.allowed_on(tile.terrain)
                || tile.has_improvement(kind)
            {
                continue;
            }
            let value = kind.yield_delta(tile.terrain, goods);
            if value > best.map(|(_, v)| v).unwrap_or(0) {
                best = Some((kind, value));
            }
        }
        best
    }

    /// Re-derive kind and value from the target tile's current state.
    /// Returns `false` when no worthwhile improvement remains; the caller
    /// discards the plan.
    pub fn update(&mut self, world: &World, goods: GoodsKind) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let Some(tile) = world.tile(target) else {
            return false;
        };
        match Self::best_improvement_for(tile, goods) {
            Some((kind, value)) => {
                self.kind = Some(kind);
                self.value = value;
                true
            }
            None => false,
        }
    }

    /// [`update`] against every goods kind, keeping the most valuable
    /// outcome. Ties keep the earliest goods kind. Returns `false`, the plan
    /// untouched, when no goods kind wants the tile improved.
    ///
    /// [`update`]: ImprovementPlan::update
    pub fn update_best(&mut self, world: &World) -> bool {
        let mut best: Option<(ImprovementKind, i32)> = None;
        for goods in GoodsKind::ALL {
            if !self.update(world, goods) {
                continue;
            }
            if let Some(kind) = self.kind {
                if best.map(|(_, v)| self.value > v).unwrap_or(true) {
                    best = Some((kind, self.value));
                }
            }
        }
        match best {
            Some((kind, value)) => {
                self.kind = Some(kind);
                self.value = value;
                true
            }
            None => false,
        }
    }

    /// Structural soundness: a plan missing its kind or target, or pointing
    /// off-map, is beyond repair.
    pub fn validate(&self, world: &World) -> bool {
        match (self.kind, self.target) {
            (Some(_), Some(target)) => world.tile(target).is_some(),
            _ => false,
        }
    }

    /// Has the planned improvement been built?
    pub fn is_complete(&self, world: &World) -> bool {
        match (self.kind, self.target) {
            (Some(kind), Some(target)) => world
                .tile(target)
                .map(|t| t.has_improvement(kind))
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FactionKind, Terrain};

    #[test]
    fn best_improvement_prefers_highest_yield_gain() {
        let tile = Tile::new(Terrain::Plains);
        let (kind, value) =
            ImprovementPlan::best_improvement_for(&tile, GoodsKind::Food).unwrap();
        assert_eq!(kind, ImprovementKind::Plow);
        assert_eq!(value, 1);
    }

    #[test]
    fn best_improvement_none_when_nothing_gains() {
        let tile = Tile::new(Terrain::Plains);
        // Neither plowing nor roads raise furs on plains.
        assert_eq!(
            ImprovementPlan::best_improvement_for(&tile, GoodsKind::Furs),
            None
        );
    }

    #[test]
    fn best_improvement_skips_present_and_expensive_kinds() {
        let mut tile = Tile::new(Terrain::Plains);
        tile.improvements.push(ImprovementKind::Plow);
        assert_eq!(
            ImprovementPlan::best_improvement_for(&tile, GoodsKind::Food),
            None,
            "plow already present, nothing else feeds plains"
        );

        // Draining swamp would pay off but costs two bundles.
        let swamp = Tile::new(Terrain::Swamp);
        assert_eq!(
            ImprovementPlan::best_improvement_for(&swamp, GoodsKind::Food),
            None
        );
    }

    #[test]
    fn clearing_wins_for_food_on_forest() {
        let tile = Tile::new(Terrain::Forest);
        let (kind, value) =
            ImprovementPlan::best_improvement_for(&tile, GoodsKind::Food).unwrap();
        assert_eq!(kind, ImprovementKind::ClearForest);
        assert_eq!(value, 1);
        // For lumber the only move is negative, so there is none.
        assert_eq!(
            ImprovementPlan::best_improvement_for(&tile, GoodsKind::Lumber),
            None
        );
    }

    #[test]
    fn update_rederives_and_reports_dead_plans() {
        let mut world = World::new(4, 4);
        world.set_terrain(Coord::new(1, 1), Terrain::Plains);
        world.add_faction(FactionKind::Colonial, "Crown");
        let mut plan = ImprovementPlan::new(9, Coord::new(1, 1), ImprovementKind::Plow, 1);
        assert!(plan.update(&world, GoodsKind::Food));
        assert_eq!(plan.kind, Some(ImprovementKind::Plow));

        // Once the plow exists the plan has nothing left to offer.
        world
            .tile_mut(Coord::new(1, 1))
            .unwrap()
            .improvements
            .push(ImprovementKind::Plow);
        assert!(!plan.update(&world, GoodsKind::Food));
        assert!(plan.is_complete(&world));
    }

    #[test]
    fn update_is_stable_while_the_world_stands_still() {
        let mut world = World::new(4, 4);
        world.set_terrain(Coord::new(1, 1), Terrain::Plains);
        let mut plan = ImprovementPlan::new(9, Coord::new(1, 1), ImprovementKind::Plow, 1);
        assert!(plan.update(&world, GoodsKind::Food));
        let (kind, value) = (plan.kind, plan.value);
        // Same world, same goods: the second pass must land on the same plan.
        assert!(plan.update(&world, GoodsKind::Food));
        assert_eq!(plan.kind, kind);
        assert_eq!(plan.value, value);
    }

    #[test]
    fn a_draft_takes_the_best_goods_line() {
        let mut world = World::new(4, 4);
        world.set_terrain(Coord::new(1, 1), Terrain::Plains);
        let mut plan = ImprovementPlan::draft(Coord::new(1, 1));
        assert!(plan.update_best(&world));
        assert_eq!(plan.kind, Some(ImprovementKind::Plow));
        assert_eq!(plan.value, 1);

        let mut barren = ImprovementPlan::draft(Coord::new(9, 9));
        assert!(!barren.update_best(&world));
        assert_eq!(barren.kind, None, "a refused draft stays blank");
    }

    #[test]
    fn validate_rejects_missing_pieces() {
        let world = World::new(4, 4);
        let plan = ImprovementPlan::new(9, Coord::new(1, 1), ImprovementKind::Road, 1);
        assert!(plan.validate(&world));

        let mut broken = plan.clone();
        broken.kind = None;
        assert!(!broken.validate(&world));

        let mut off_map = plan.clone();
        off_map.target = Some(Coord::new(9, 9));
        assert!(!off_map.validate(&world));
    }

    #[test]
    fn serde_round_trip() {
        let mut plan = ImprovementPlan::new(9, Coord::new(2, 3), ImprovementKind::Plow, 1);
        plan.executor = Some(4);
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: ImprovementPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, plan);
    }
}
