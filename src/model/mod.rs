pub mod commands;
pub mod faction;
pub mod force;
pub mod goods;
pub mod location;
pub mod rules;
pub mod settlement;
pub mod tile;
pub mod unit;
pub mod world;

pub use commands::{AttackOutcome, WorkOutcome};
pub use faction::{Faction, FactionKind};
pub use force::{Force, UnitCohort};
pub use goods::GoodsLot;
pub use location::{Coord, Location};
pub use rules::{GoodsKind, ImprovementKind, Terrain, UnitKind, UnitRole};
pub use settlement::{Settlement, SettlementKind, Wish};
pub use tile::{Tile, TileWork};
pub use unit::Unit;
pub use world::World;
