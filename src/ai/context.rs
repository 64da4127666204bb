use std::collections::BTreeMap;

use rand::RngCore;

use super::config::PlannerConfig;
use super::improvement::ImprovementPlan;
use super::log::TurnLog;
use super::transport::TransportDemand;
use crate::model::World;

/// Context passed to a task for one step of execution.
///
/// Bundled so task signatures stay put as the planner grows. Tasks never see
/// other agents directly: anything that needs cross-agent arbitration goes
/// through `demands` and is resolved by the planner between agent steps.
pub struct TurnContext<'a> {
    pub world: &'a mut World,
    pub rng: &'a mut dyn RngCore,
    pub log: &'a mut TurnLog,
    pub config: &'a PlannerConfig,
    /// Tasks push transport requests and releases here during a step.
    pub demands: &'a mut Vec<TransportDemand>,
    /// The faction's improvement plans, read-only during execution.
    pub plans: &'a BTreeMap<u64, ImprovementPlan>,
}
