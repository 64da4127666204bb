use serde::{Deserialize, Serialize};

/// Unit archetypes. A closed set so every dispatch over unit behavior is an
/// exhaustive match; stats live in the table methods below.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Colonist,
    ExpertFarmer,
    HardyPioneer,
    VeteranSoldier,
    Brave,
    TreasureTrain,
    Caravel,
    Galleon,
    Privateer,
}

impl UnitKind {
    pub fn is_naval(self) -> bool {
        matches!(
            self,
            UnitKind::Caravel | UnitKind::Galleon | UnitKind::Privateer
        )
    }

    /// Cargo holds for carriers; zero for everything else.
    pub fn capacity(self) -> u32 {
        match self {
            UnitKind::Caravel => 2,
            UnitKind::Galleon => 6,
            UnitKind::Privateer => 2,
            _ => 0,
        }
    }

    /// Holds consumed when this unit is carried. Naval units are never
    /// carried themselves.
    pub fn space_taken(self) -> u32 {
        match self {
            UnitKind::TreasureTrain => 6,
            k if k.is_naval() => 0,
            _ => 1,
        }
    }

    pub fn movement(self) -> u32 {
        match self {
            UnitKind::Caravel => 4,
            UnitKind::Galleon => 6,
            UnitKind::Privateer => 8,
            _ => 1,
        }
    }

    pub fn offence(self) -> u32 {
        match self {
            UnitKind::VeteranSoldier => 2,
            UnitKind::Privateer => 3,
            UnitKind::TreasureTrain | UnitKind::Caravel | UnitKind::Galleon => 0,
            _ => 1,
        }
    }

    pub fn defence(self) -> u32 {
        match self {
            UnitKind::VeteranSoldier => 2,
            UnitKind::Caravel => 2,
            UnitKind::Galleon => 3,
            UnitKind::Privateer => 2,
            _ => 1,
        }
    }

    /// Professional skill relative to a free colonist. Experts are too
    /// valuable to spend on generic work like founding settlements.
    pub fn skill_level(self) -> i32 {
        match self {
            UnitKind::ExpertFarmer | UnitKind::HardyPioneer | UnitKind::VeteranSoldier => 2,
            _ => 0,
        }
    }

    pub fn is_person(self) -> bool {
        matches!(
            self,
            UnitKind::Colonist
                | UnitKind::ExpertFarmer
                | UnitKind::HardyPioneer
                | UnitKind::VeteranSoldier
                | UnitKind::Brave
        )
    }

    /// Colonial persons can found settlements and take equipment roles.
    pub fn is_colonist(self) -> bool {
        self.is_person() && self != UnitKind::Brave
    }

    pub fn can_found_settlement(self) -> bool {
        self.is_colonist()
    }

    /// Only the heavy galleon has holds rated for treasure.
    pub fn can_carry_treasure(self) -> bool {
        self == UnitKind::Galleon
    }

    /// Expert bonus applies when the unit works the role it was trained for.
    pub fn expert_role(self) -> Option<UnitRole> {
        match self {
            UnitKind::HardyPioneer => Some(UnitRole::Pioneer),
            UnitKind::VeteranSoldier => Some(UnitRole::Soldier),
            _ => None,
        }
    }
}

/// Equipment role layered on top of a unit kind. Equipment is bought with
/// gold at a friendly colony or in the homeland.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRole {
    Default,
    Soldier,
    Scout,
    Pioneer,
    Missionary,
}

impl UnitRole {
    /// Maximum equipment count the role can carry. Pioneers stack tool
    /// bundles; one bundle is expended per finished improvement.
    pub fn max_count(self) -> u32 {
        match self {
            UnitRole::Default => 0,
            UnitRole::Soldier => 1,
            UnitRole::Scout => 1,
            UnitRole::Pioneer => 5,
            UnitRole::Missionary => 1,
        }
    }

    /// Gold price per equipment count.
    pub fn price(self) -> u32 {
        match self {
            UnitRole::Default => 0,
            UnitRole::Soldier => 60,
            UnitRole::Scout => 50,
            UnitRole::Pioneer => 20,
            UnitRole::Missionary => 30,
        }
    }

    pub fn offence_bonus(self) -> u32 {
        match self {
            UnitRole::Soldier => 1,
            _ => 0,
        }
    }

    pub fn defence_bonus(self) -> u32 {
        match self {
            UnitRole::Soldier => 1,
            _ => 0,
        }
    }

    /// Scouts ride; everyone else walks.
    pub fn movement_bonus(self) -> u32 {
        match self {
            UnitRole::Scout => 3,
            _ => 0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    Ocean,
    Plains,
    Grassland,
    Forest,
    Hills,
    Mountains,
    Swamp,
}

impl Terrain {
    pub fn is_water(self) -> bool {
        self == Terrain::Ocean
    }

    pub fn is_settleable(self) -> bool {
        !self.is_water() && self != Terrain::Mountains
    }

    /// Base yield of one goods kind on unimproved terrain.
    pub fn base_yield(self, goods: GoodsKind) -> i32 {
        use GoodsKind::*;
        use Terrain::*;
        match (self, goods) {
            (Ocean, Food) => 2,
            (Plains, Food) => 3,
            (Plains, Cotton) => 2,
            (Plains, Ore) => 1,
            (Grassland, Food) => 2,
            (Grassland, Cotton) => 3,
            (Forest, Food) => 2,
            (Forest, Lumber) => 4,
            (Forest, Furs) => 3,
            (Hills, Food) => 1,
            (Hills, Ore) => 4,
            (Mountains, Ore) => 5,
            (Swamp, Food) => 1,
            (Swamp, Ore) => 1,
            _ => 0,
        }
    }
}

/// Everything a work tile can produce or a settlement can stock.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoodsKind {
    Food,
    Lumber,
    Ore,
    Furs,
    Cotton,
}

impl GoodsKind {
    pub const ALL: [GoodsKind; 5] = [
        GoodsKind::Food,
        GoodsKind::Lumber,
        GoodsKind::Ore,
        GoodsKind::Furs,
        GoodsKind::Cotton,
    ];
}

/// Tile improvement kinds, both buildable and natural.
///
/// Natural improvements (rivers) appear on the map but are never planned or
/// built. `Drain` is buildable in principle but costs more than one tool
/// bundle, which keeps it below the bar pioneers plan for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImprovementKind {
    Plow,
    Road,
    ClearForest,
    Drain,
    River,
}

impl ImprovementKind {
    pub const ALL: [ImprovementKind; 5] = [
        ImprovementKind::Plow,
        ImprovementKind::Road,
        ImprovementKind::ClearForest,
        ImprovementKind::Drain,
        ImprovementKind::River,
    ];

    pub fn is_natural(self) -> bool {
        self == ImprovementKind::River
    }

    pub fn allowed_on(self, terrain: Terrain) -> bool {
        use Terrain::*;
        match self {
            ImprovementKind::Plow => matches!(terrain, Plains | Grassland),
            ImprovementKind::Road => !terrain.is_water(),
            ImprovementKind::ClearForest => terrain == Forest,
            ImprovementKind::Drain => terrain == Swamp,
            ImprovementKind::River => !terrain.is_water(),
        }
    }

    /// Tool bundles expended on completion.
    pub fn tool_cost(self) -> u32 {
        match self {
            ImprovementKind::Drain => 2,
            ImprovementKind::River => 0,
            _ => 1,
        }
    }

    /// Pioneer turns of work to finish.
    pub fn work_turns(self) -> u32 {
        match self {
            ImprovementKind::Plow => 2,
            ImprovementKind::Road => 1,
            ImprovementKind::ClearForest => 3,
            ImprovementKind::Drain => 4,
            ImprovementKind::River => 0,
        }
    }

    /// Terrain left behind when the improvement finishes, if it changes.
    pub fn transforms_to(self) -> Option<Terrain> {
        match self {
            ImprovementKind::ClearForest => Some(Terrain::Plains),
            _ => None,
        }
    }

    /// Change in yield of `goods` if this improvement were added to
    /// `terrain`. Clearing is valued as the difference between the new
    /// terrain's base yield and the old one's.
    pub fn yield_delta(self, terrain: Terrain, goods: GoodsKind) -> i32 {
        match self {
            ImprovementKind::Plow => {
                if goods == GoodsKind::Food && self.allowed_on(terrain) {
                    1
                } else {
                    0
                }
            }
            ImprovementKind::Road => {
                if goods == GoodsKind::Ore
                    && matches!(terrain, Terrain::Hills | Terrain::Mountains)
                {
                    1
                } else {
                    0
                }
            }
            ImprovementKind::ClearForest => {
                if terrain == Terrain::Forest {
                    Terrain::Plains.base_yield(goods) - terrain.base_yield(goods)
                } else {
                    0
                }
            }
            ImprovementKind::Drain => {
                if goods == GoodsKind::Food && terrain == Terrain::Swamp {
                    2
                } else {
                    0
                }
            }
            ImprovementKind::River => {
                if goods == GoodsKind::Food && !terrain.is_water() {
                    1
                } else {
                    0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carriers_are_naval_with_capacity() {
        for kind in [UnitKind::Caravel, UnitKind::Galleon, UnitKind::Privateer] {
            assert!(kind.is_naval());
            assert!(kind.capacity() > 0);
            assert_eq!(kind.space_taken(), 0);
        }
    }

    #[test]
    fn treasure_train_fits_only_in_a_galleon() {
        assert_eq!(UnitKind::TreasureTrain.space_taken(), 6);
        assert!(UnitKind::TreasureTrain.space_taken() > UnitKind::Caravel.capacity());
        assert!(UnitKind::TreasureTrain.space_taken() <= UnitKind::Galleon.capacity());
        assert!(UnitKind::Galleon.can_carry_treasure());
        assert!(!UnitKind::Caravel.can_carry_treasure());
    }

    #[test]
    fn braves_are_persons_but_not_colonists() {
        assert!(UnitKind::Brave.is_person());
        assert!(!UnitKind::Brave.is_colonist());
        assert!(!UnitKind::Brave.can_found_settlement());
        assert!(UnitKind::Colonist.can_found_settlement());
    }

    #[test]
    fn scout_role_rides() {
        assert_eq!(
            UnitKind::Colonist.movement() + UnitRole::Scout.movement_bonus(),
            4
        );
        assert_eq!(UnitRole::Pioneer.movement_bonus(), 0);
    }

    #[test]
    fn pioneer_role_stacks_tool_bundles() {
        assert_eq!(UnitRole::Pioneer.max_count(), 5);
        assert_eq!(UnitRole::Pioneer.price(), 20);
        assert_eq!(UnitRole::Default.max_count(), 0);
    }

    #[test]
    fn plow_feeds_open_land_only() {
        assert_eq!(
            ImprovementKind::Plow.yield_delta(Terrain::Plains, GoodsKind::Food),
            1
        );
        assert_eq!(
            ImprovementKind::Plow.yield_delta(Terrain::Forest, GoodsKind::Food),
            0
        );
        assert!(!ImprovementKind::Plow.allowed_on(Terrain::Forest));
    }

    #[test]
    fn clearing_trades_lumber_for_food() {
        let food = ImprovementKind::ClearForest.yield_delta(Terrain::Forest, GoodsKind::Food);
        let lumber = ImprovementKind::ClearForest.yield_delta(Terrain::Forest, GoodsKind::Lumber);
        assert_eq!(food, 1);
        assert_eq!(lumber, -4);
        assert_eq!(
            ImprovementKind::ClearForest.transforms_to(),
            Some(Terrain::Plains)
        );
    }

    #[test]
    fn river_is_natural_and_free() {
        assert!(ImprovementKind::River.is_natural());
        assert_eq!(ImprovementKind::River.tool_cost(), 0);
        assert!(!ImprovementKind::Plow.is_natural());
    }

    #[test]
    fn drain_costs_more_than_one_bundle() {
        assert_eq!(ImprovementKind::Drain.tool_cost(), 2);
        assert!(
            ImprovementKind::Drain.yield_delta(Terrain::Swamp, GoodsKind::Food) > 0,
            "drain is worth building, just too expensive to plan"
        );
    }

    #[test]
    fn mountains_cannot_be_settled() {
        assert!(!Terrain::Mountains.is_settleable());
        assert!(!Terrain::Ocean.is_settleable());
        assert!(Terrain::Plains.is_settleable());
    }
}
