//! Fighting tasks: garrisons, hunts, hostile prowling, privateering.

use super::{approach, roam, travel_toward, StepResult, Travel};
use crate::ai::context::TurnContext;
use crate::model::{AttackOutcome, Coord, Location, Unit, UnitKind, World};

pub(super) fn defend(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    settlement: u64,
    priority: i32,
) -> StepResult {
    match approach(ctx, agent, Location::Settlement(settlement), priority, false) {
        Travel::Arrived => {
            // Garrison duty: meet whatever comes up to the walls.
            if let Some(foe) = adjacent_enemy(ctx.world, agent) {
                if let Some(outcome) = ctx.world.attack(agent, foe) {
                    ctx.log.note(format!(
                        "agent {agent} sallied against unit {foe} and {}",
                        outcome_word(outcome)
                    ));
                }
            }
            StepResult::InProgress
        }
        _ => StepResult::InProgress,
    }
}

pub(super) fn defend_invalid(
    world: &World,
    unit: &Unit,
    settlement: u64,
) -> Option<&'static str> {
    let Some(s) = world.settlement(settlement) else {
        return Some("settlement-gone");
    };
    if s.faction != unit.faction {
        return Some("not-our-settlement");
    }
    None
}

pub(super) fn seek_and_destroy(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    quarry: u64,
    priority: i32,
) -> StepResult {
    // A quarry killed by someone else this turn is validation's business.
    let quarry_at = ctx
        .world
        .live_unit(quarry)
        .map(|q| q.location)
        .and_then(|l| ctx.world.tile_of(l));
    let Some(quarry_at) = quarry_at else {
        return StepResult::InProgress;
    };
    match approach(ctx, agent, Location::Tile(quarry_at), priority, true) {
        Travel::Arrived => match ctx.world.attack(agent, quarry) {
            Some(AttackOutcome::Won) => {
                ctx.log
                    .note(format!("agent {agent} destroyed unit {quarry}"));
                StepResult::Complete
            }
            Some(AttackOutcome::Repulsed) => {
                ctx.log
                    .note(format!("agent {agent} was repulsed by unit {quarry}"));
                StepResult::InProgress
            }
            None => StepResult::InProgress,
        },
        _ => StepResult::InProgress,
    }
}

pub(super) fn seek_and_destroy_invalid(
    world: &World,
    unit: &Unit,
    quarry: u64,
) -> Option<&'static str> {
    if unit.offence() == 0 {
        return Some("no-offence");
    }
    let Some(q) = world.live_unit(quarry) else {
        return Some("quarry-gone");
    };
    if q.faction == unit.faction {
        return Some("quarry-friendly");
    }
    if q.kind.is_naval() != unit.kind.is_naval() {
        return Some("wrong-arm");
    }
    if q.location.is_aboard() {
        return Some("quarry-embarked");
    }
    None
}

pub(super) fn wander_hostile(ctx: &mut TurnContext<'_>, agent: u64) -> StepResult {
    let (faction, naval, here) = match ctx.world.live_unit(agent) {
        Some(u) => match ctx.world.tile_of(u.location) {
            Some(c) => (u.faction, u.kind.is_naval(), c),
            None => return StepResult::InProgress,
        },
        None => return StepResult::InProgress,
    };
    match nearest_enemy(ctx.world, faction, here, ctx.config.patrol_radius, naval) {
        Some(foe) => {
            let foe_at = ctx
                .world
                .live_unit(foe)
                .map(|f| f.location)
                .and_then(|l| ctx.world.tile_of(l));
            let Some(foe_at) = foe_at else {
                return StepResult::InProgress;
            };
            if ctx.world.route(here, foe_at, naval, faction, true).is_none() {
                roam(ctx, agent);
                return StepResult::InProgress;
            }
            if let Travel::Arrived = travel_toward(ctx, agent, foe_at, true) {
                if let Some(outcome) = ctx.world.attack(agent, foe) {
                    ctx.log.note(format!(
                        "agent {agent} fell on unit {foe} and {}",
                        outcome_word(outcome)
                    ));
                }
            }
            StepResult::InProgress
        }
        None => {
            roam(ctx, agent);
            StepResult::InProgress
        }
    }
}

pub(super) fn wander_hostile_invalid(unit: &Unit) -> Option<&'static str> {
    if unit.offence() == 0 {
        return Some("no-offence");
    }
    None
}

pub(super) fn privateer_raid(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    quarry: &mut Option<u64>,
) -> StepResult {
    let (faction, location) = match ctx.world.live_unit(agent) {
        Some(u) => (u.faction, u.location),
        None => return StepResult::InProgress,
    };
    if location.is_homeland() && !ctx.world.sail_from_homeland(agent) {
        return StepResult::InProgress;
    }
    let Some(here) = ctx.world.unit_tile(agent) else {
        return StepResult::InProgress;
    };

    // Drop a stale mark before hunting.
    if let Some(q) = *quarry {
        let stale = ctx
            .world
            .live_unit(q)
            .map(|t| t.faction == faction || !t.kind.is_naval() || t.location.is_aboard())
            .unwrap_or(true);
        if stale {
            *quarry = None;
        }
    }
    if quarry.is_none() {
        *quarry = nearest_enemy(ctx.world, faction, here, ctx.config.patrol_radius, true);
        if let Some(q) = *quarry {
            ctx.log
                .note(format!("agent {agent} marked unit {q} for raiding"));
        }
    }
    match *quarry {
        Some(q) => {
            let quarry_at = ctx
                .world
                .live_unit(q)
                .map(|t| t.location)
                .and_then(|l| ctx.world.tile_of(l));
            let Some(quarry_at) = quarry_at else {
                return StepResult::InProgress;
            };
            if ctx.world.route(here, quarry_at, true, faction, true).is_none() {
                *quarry = None;
                roam(ctx, agent);
                return StepResult::InProgress;
            }
            if let Travel::Arrived = travel_toward(ctx, agent, quarry_at, true) {
                match ctx.world.attack(agent, q) {
                    Some(AttackOutcome::Won) => {
                        ctx.log.note(format!("agent {agent} sank unit {q}"));
                        *quarry = None;
                    }
                    Some(AttackOutcome::Repulsed) => {
                        ctx.log
                            .note(format!("agent {agent} was beaten off by unit {q}"));
                    }
                    None => {}
                }
            }
            StepResult::InProgress
        }
        None => {
            roam(ctx, agent);
            StepResult::InProgress
        }
    }
}

pub(super) fn privateer_raid_invalid(unit: &Unit) -> Option<&'static str> {
    if unit.kind != UnitKind::Privateer {
        return Some("not-a-privateer");
    }
    None
}

fn outcome_word(outcome: AttackOutcome) -> &'static str {
    match outcome {
        AttackOutcome::Won => "won",
        AttackOutcome::Repulsed => "was repulsed",
    }
}

/// Lowest-id live enemy of the same arm standing next to the agent.
fn adjacent_enemy(world: &World, agent: u64) -> Option<u64> {
    let u = world.live_unit(agent)?;
    let here = world.tile_of(u.location)?;
    let (faction, naval) = (u.faction, u.kind.is_naval());
    world
        .units
        .values()
        .filter(|t| {
            !t.disposed
                && t.faction != faction
                && t.kind.is_naval() == naval
                && !t.location.is_aboard()
        })
        .filter_map(|t| world.tile_of(t.location).map(|c| (t.id, c)))
        .filter(|(_, c)| here.is_adjacent(*c))
        .map(|(id, _)| id)
        .min()
}

/// Nearest live enemy of the given arm within `radius`, closest first and
/// lowest id on ties.
pub(super) fn nearest_enemy(
    world: &World,
    faction: u64,
    from: Coord,
    radius: u32,
    naval: bool,
) -> Option<u64> {
    let mut best: Option<(u32, u64)> = None;
    for t in world.units.values() {
        if t.disposed
            || t.faction == faction
            || t.kind.is_naval() != naval
            || t.location.is_aboard()
        {
            continue;
        }
        let Some(c) = world.tile_of(t.location) else {
            continue;
        };
        let d = from.distance(c);
        if d > radius {
            continue;
        }
        if best.map(|(bd, bid)| (d, t.id) < (bd, bid)).unwrap_or(true) {
            best = Some((d, t.id));
        }
    }
    best.map(|(_, id)| id)
}
