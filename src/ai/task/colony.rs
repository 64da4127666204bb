//! Settlement-bound tasks: founding, wish delivery, working, idling.

use super::{approach, travel_toward, StepResult, Travel};
use crate::ai::context::TurnContext;
use crate::model::{Coord, Location, Unit, World};

pub(super) fn build_settlement(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    site: Coord,
    priority: i32,
) -> StepResult {
    match approach(ctx, agent, Location::Tile(site), priority, false) {
        Travel::Arrived => {
            let name = next_colony_name(ctx.world, agent);
            match ctx.world.found_settlement(agent, name) {
                Some(id) => {
                    ctx.log
                        .note(format!("agent {agent} founded settlement {id} at {site}"));
                    StepResult::Complete
                }
                None => StepResult::InProgress,
            }
        }
        _ => StepResult::InProgress,
    }
}

/// "Fairhaven 3": the founder's faction name plus the next ordinal.
fn next_colony_name(world: &World, agent: u64) -> String {
    let Some(u) = world.live_unit(agent) else {
        return "Colony".to_string();
    };
    let owned = world
        .settlements
        .values()
        .filter(|s| s.faction == u.faction)
        .count();
    match world.faction(u.faction) {
        Some(f) => format!("{} {}", f.name, owned + 1),
        None => "Colony".to_string(),
    }
}

pub(super) fn build_settlement_invalid(
    world: &World,
    unit: &Unit,
    site: Coord,
) -> Option<&'static str> {
    if !unit.kind.can_found_settlement() {
        return Some("not-a-founder");
    }
    let Some(tile) = world.tile(site) else {
        return Some("site-gone");
    };
    if !tile.terrain.is_settleable() {
        return Some("site-unsettleable");
    }
    if world.settlement_at(site).is_some() {
        return Some("site-occupied");
    }
    None
}

pub(super) fn wish_realization(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    settlement: u64,
    wish: u64,
    priority: i32,
) -> StepResult {
    match approach(ctx, agent, Location::Settlement(settlement), priority, false) {
        Travel::Arrived => {
            let taken = ctx
                .world
                .settlement_mut(settlement)
                .and_then(|s| s.take_wish(wish));
            match taken {
                Some(_) => {
                    ctx.log.note(format!(
                        "agent {agent} answered wish {wish} at settlement {settlement}"
                    ));
                    StepResult::Complete
                }
                None => StepResult::InProgress,
            }
        }
        _ => StepResult::InProgress,
    }
}

pub(super) fn wish_realization_invalid(
    world: &World,
    unit: &Unit,
    settlement: u64,
    wish: u64,
) -> Option<&'static str> {
    let Some(s) = world.settlement(settlement) else {
        return Some("settlement-gone");
    };
    if s.faction != unit.faction {
        return Some("not-our-settlement");
    }
    let Some(w) = s.wish(wish) else {
        return Some("wish-gone");
    };
    if w.kind != unit.kind {
        return Some("wish-mismatch");
    }
    None
}

pub(super) fn work_inside_colony(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    settlement: u64,
    priority: i32,
) -> StepResult {
    // Standing duty: getting there is the work.
    approach(ctx, agent, Location::Settlement(settlement), priority, false);
    StepResult::InProgress
}

pub(super) fn work_inside_colony_invalid(
    world: &World,
    unit: &Unit,
    settlement: u64,
) -> Option<&'static str> {
    let Some(s) = world.settlement(settlement) else {
        return Some("settlement-gone");
    };
    if s.faction != unit.faction || !s.is_colony() {
        return Some("not-our-settlement");
    }
    if !unit.kind.is_colonist() {
        return Some("not-a-worker");
    }
    None
}

pub(super) fn idle_at_settlement(ctx: &mut TurnContext<'_>, agent: u64) -> StepResult {
    let (faction, location) = match ctx.world.live_unit(agent) {
        Some(u) => (u.faction, u.location),
        None => return StepResult::InProgress,
    };
    if let Some(id) = location.settlement_id() {
        if ctx
            .world
            .settlement(id)
            .map(|s| s.faction == faction)
            .unwrap_or(false)
        {
            return StepResult::InProgress;
        }
    }
    // Drift home on foot; idlers do not compete for shipping.
    let Some(here) = ctx.world.tile_of(location) else {
        return StepResult::InProgress;
    };
    if let Some(home) = ctx.world.nearest_settlement_of(faction, here, false) {
        if let Some(coord) = ctx.world.settlement(home).map(|s| s.coord) {
            travel_toward(ctx, agent, coord, false);
        }
    }
    StepResult::InProgress
}
