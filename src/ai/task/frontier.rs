//! Tasks that push out past the settled edge: scouting, pioneering,
//! missions, treasure hauling, and plain wandering.

use std::collections::BTreeMap;

use super::{approach, roam, StepResult, Travel};
use crate::ai::agent::equip_for_role;
use crate::ai::context::TurnContext;
use crate::ai::improvement::ImprovementPlan;
use crate::model::{Location, Unit, UnitKind, UnitRole, WorkOutcome, World};

pub(super) fn scout(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    camp: u64,
    priority: i32,
) -> StepResult {
    match approach(ctx, agent, Location::Settlement(camp), priority, true) {
        Travel::Arrived => {
            if ctx.world.speak_to_chief(agent, camp) {
                ctx.log
                    .note(format!("agent {agent} spoke with the chief of camp {camp}"));
                StepResult::Complete
            } else {
                StepResult::InProgress
            }
        }
        _ => StepResult::InProgress,
    }
}

pub(super) fn scout_invalid(world: &World, unit: &Unit, camp: u64) -> Option<&'static str> {
    if unit.role != UnitRole::Scout {
        return Some("not-a-scout");
    }
    let Some(s) = world.settlement(camp) else {
        return Some("camp-gone");
    };
    if !s.is_camp() {
        return Some("camp-gone");
    }
    if s.scouted_by(unit.faction) {
        return Some("already-scouted");
    }
    None
}

pub(super) fn pioneer(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    plan: u64,
    priority: i32,
) -> StepResult {
    let Some(record) = ctx.plans.get(&plan) else {
        return StepResult::InProgress;
    };
    // Another pioneer may have worked the tile since the plan was drawn.
    if record.is_complete(ctx.world) {
        return StepResult::Complete;
    }
    let Some((target, kind)) = record.target.zip(record.kind) else {
        return StepResult::InProgress;
    };
    let (faction, role, location) = match ctx.world.live_unit(agent) {
        Some(u) => (u.faction, u.role, u.location),
        None => return StepResult::InProgress,
    };
    if role != UnitRole::Pioneer {
        // Tools first: walk to a colony outfitter and buy them.
        if !at_own_colony(ctx.world, faction, location) {
            let colony = match ctx.world.tile_of(location) {
                Some(here) => ctx.world.nearest_settlement_of(faction, here, true),
                // Overseas: any colony will do as a goal.
                None => ctx
                    .world
                    .settlements
                    .values()
                    .find(|s| s.faction == faction && s.is_colony())
                    .map(|s| s.id),
            };
            let Some(colony) = colony else {
                return StepResult::InProgress;
            };
            let arrived = matches!(
                approach(ctx, agent, Location::Settlement(colony), priority, false),
                Travel::Arrived
            );
            if !arrived {
                return StepResult::InProgress;
            }
        }
        if !equip_for_role(ctx.world, agent, UnitRole::Pioneer) {
            // Saving up. The plan keeps its executor while we wait.
            return StepResult::InProgress;
        }
        ctx.log.note(format!("agent {agent} equipped as pioneer"));
    }
    match approach(ctx, agent, Location::Tile(target), priority, false) {
        Travel::Arrived => match ctx.world.improvement_work(agent, kind) {
            Some(WorkOutcome::Finished) => {
                ctx.log
                    .note(format!("agent {agent} finished improving {target}"));
                StepResult::Complete
            }
            Some(WorkOutcome::Progressed) | None => StepResult::InProgress,
        },
        _ => StepResult::InProgress,
    }
}

pub(super) fn pioneer_invalid(
    world: &World,
    unit: &Unit,
    plan: u64,
    plans: &BTreeMap<u64, ImprovementPlan>,
) -> Option<&'static str> {
    if !unit.kind.is_colonist() {
        return Some("not-a-pioneer");
    }
    match plans.get(&plan) {
        Some(p) if p.validate(world) => {}
        _ => return Some("plan-gone"),
    }
    if unit.role != UnitRole::Pioneer {
        let has_outfitter = world
            .settlements
            .values()
            .any(|s| s.faction == unit.faction && s.is_colony());
        if !has_outfitter {
            return Some("no-tool-source");
        }
    }
    None
}

pub(super) fn missionary(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    camp: u64,
    priority: i32,
) -> StepResult {
    match approach(ctx, agent, Location::Settlement(camp), priority, true) {
        Travel::Arrived => {
            // The missionary settles into the camp and leaves the map.
            if ctx.world.establish_mission(agent, camp) {
                ctx.log
                    .note(format!("agent {agent} established a mission at camp {camp}"));
                StepResult::Complete
            } else {
                StepResult::InProgress
            }
        }
        _ => StepResult::InProgress,
    }
}

pub(super) fn missionary_invalid(
    world: &World,
    unit: &Unit,
    camp: u64,
) -> Option<&'static str> {
    if unit.role != UnitRole::Missionary {
        return Some("not-a-missionary");
    }
    let Some(s) = world.settlement(camp) else {
        return Some("camp-gone");
    };
    if !s.is_camp() {
        return Some("camp-gone");
    }
    if s.mission == Some(unit.faction) {
        return Some("mission-present");
    }
    None
}

pub(super) fn cash_in_treasure(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    priority: i32,
) -> StepResult {
    let (faction, location, treasure) = match ctx.world.live_unit(agent) {
        Some(u) => (u.faction, u.location, u.treasure),
        None => return StepResult::InProgress,
    };
    if location.is_homeland() || at_own_colony(ctx.world, faction, location) {
        if ctx.world.cash_in_treasure(agent) {
            ctx.log
                .note(format!("agent {agent} cashed in {treasure} treasure"));
            return StepResult::Complete;
        }
        return StepResult::InProgress;
    }
    let colony = match ctx.world.tile_of(location) {
        Some(here) => ctx.world.nearest_settlement_of(faction, here, true),
        None => ctx
            .world
            .settlements
            .values()
            .find(|s| s.faction == faction && s.is_colony())
            .map(|s| s.id),
    };
    let Some(colony) = colony else {
        return StepResult::InProgress;
    };
    match approach(ctx, agent, Location::Settlement(colony), priority, false) {
        Travel::Arrived => {
            if ctx.world.cash_in_treasure(agent) {
                ctx.log
                    .note(format!("agent {agent} cashed in {treasure} treasure"));
                StepResult::Complete
            } else {
                StepResult::InProgress
            }
        }
        _ => StepResult::InProgress,
    }
}

pub(super) fn cash_in_treasure_invalid(world: &World, unit: &Unit) -> Option<&'static str> {
    if unit.kind != UnitKind::TreasureTrain || unit.treasure == 0 {
        return Some("no-treasure");
    }
    let has_bank = world
        .settlements
        .values()
        .any(|s| s.faction == unit.faction && s.is_colony());
    if !has_bank && !unit.location.is_homeland() {
        return Some("no-dropoff");
    }
    None
}

pub(super) fn wander(ctx: &mut TurnContext<'_>, agent: u64) -> StepResult {
    roam(ctx, agent);
    StepResult::InProgress
}

/// Is the unit standing in (or on the tile of) a colony of its own faction?
pub(super) fn at_own_colony(world: &World, faction: u64, location: Location) -> bool {
    let id = match location.settlement_id() {
        Some(id) => Some(id),
        None => world
            .tile_of(location)
            .and_then(|c| world.settlement_at(c))
            .map(|s| s.id),
    };
    id.and_then(|id| world.settlement(id))
        .map(|s| s.faction == faction && s.is_colony())
        .unwrap_or(false)
}
