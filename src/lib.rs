pub mod ai;
pub mod id;
pub mod model;
pub mod scenario;
pub mod snapshot;
pub mod testutil;

pub use ai::{Planner, PlannerConfig, TaskKind, TurnLog};
pub use id::IdGenerator;
pub use model::{Coord, Location, World};
pub use snapshot::SnapshotError;
