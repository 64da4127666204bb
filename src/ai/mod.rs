//! Faction-side planning: agents, tasks, improvement plans, and the
//! transport coordinator, driven once per turn by the [`Planner`].

pub mod agent;
pub mod config;
pub mod context;
pub mod improvement;
pub mod log;
pub mod planner;
pub mod task;
pub mod transport;

pub use agent::Agent;
pub use config::PlannerConfig;
pub use context::TurnContext;
pub use improvement::ImprovementPlan;
pub use log::TurnLog;
pub use planner::Planner;
pub use task::{Task, TaskKind, TaskState};
pub use transport::{Cargo, Claim, Shipment, TransportCoordinator, TransportDemand};
