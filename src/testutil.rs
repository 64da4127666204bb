//! Shared helpers for integration tests and examples.

use crate::ai::{Cargo, Planner, PlannerConfig, TaskKind, TurnLog};
use crate::model::World;

/// A planner with deterministic defaults for one faction.
pub fn planner_for(faction: u64, seed: u64) -> Planner {
    Planner::new(faction, PlannerConfig::new(seed))
}

/// World upkeep plus one planning pass. For worlds with a single planned
/// faction; use [`run_turns`] when several planners share the world.
pub fn run_turn(world: &mut World, planner: &mut Planner) -> TurnLog {
    world.begin_turn();
    planner.run_turn(world)
}

/// Run the given number of turns, each planner once per turn in slice order.
pub fn run_turns(world: &mut World, planners: &mut [Planner], turns: u32) {
    for _ in 0..turns {
        world.begin_turn();
        for planner in planners.iter_mut() {
            planner.run_turn(world);
        }
    }
}

/// The kind of task an agent currently carries.
pub fn task_of(planner: &Planner, unit: u64) -> Option<&TaskKind> {
    planner
        .agent(unit)
        .and_then(|a| a.task.as_ref())
        .map(|t| &t.kind)
}

/// Does the agent carry a task the predicate accepts?
pub fn has_task(planner: &Planner, unit: u64, want: impl Fn(&TaskKind) -> bool) -> bool {
    task_of(planner, unit).map(want).unwrap_or(false)
}

/// Cargo legs on a carrier's manifest, in manifest order.
pub fn manifest_of(planner: &Planner, carrier: u64) -> Vec<Cargo> {
    match task_of(planner, carrier) {
        Some(TaskKind::Transport { manifest }) => manifest.iter().map(|s| s.cargo).collect(),
        _ => Vec::new(),
    }
}

/// Live units of a faction, ascending id.
pub fn units_of(world: &World, faction: u64) -> Vec<u64> {
    world
        .units
        .values()
        .filter(|u| !u.disposed && u.faction == faction)
        .map(|u| u.id)
        .collect()
}

/// Settlements of a faction, ascending id.
pub fn settlements_of(world: &World, faction: u64) -> Vec<u64> {
    world
        .settlements
        .values()
        .filter(|s| s.faction == faction)
        .map(|s| s.id)
        .collect()
}
