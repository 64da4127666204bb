//! Native errands: gifts and tribute demands against colonial settlements.

use super::{approach, StepResult, Travel};
use crate::ai::context::TurnContext;
use crate::model::{GoodsKind, Location, Unit, UnitKind, World};

/// Parcel size a camp spares for one gift run.
const GIFT_AMOUNT: u32 = 25;

pub(super) fn bring_gift(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    colony: u64,
    gift: &mut Option<(GoodsKind, u32)>,
    priority: i32,
) -> StepResult {
    match *gift {
        None => {
            let home = ctx.world.live_unit(agent).and_then(|u| u.home);
            let Some(home) = home else {
                return StepResult::InProgress;
            };
            if let Travel::Arrived =
                approach(ctx, agent, Location::Settlement(home), priority, true)
            {
                if let Some(goods) = ctx.world.collect_gift(agent, home) {
                    *gift = Some((goods, GIFT_AMOUNT));
                    ctx.log.note(format!(
                        "agent {agent} picked up a gift of {goods:?} at camp {home}"
                    ));
                }
            }
            StepResult::InProgress
        }
        Some((goods, amount)) => {
            match approach(ctx, agent, Location::Settlement(colony), priority, true) {
                Travel::Arrived => {
                    if ctx.world.deliver_gift(agent, colony, goods, amount) {
                        ctx.log.note(format!(
                            "agent {agent} delivered {amount} {goods:?} to colony {colony}"
                        ));
                        StepResult::Complete
                    } else {
                        StepResult::InProgress
                    }
                }
                _ => StepResult::InProgress,
            }
        }
    }
}

pub(super) fn bring_gift_invalid(
    world: &World,
    unit: &Unit,
    colony: u64,
    collected: bool,
) -> Option<&'static str> {
    if unit.kind != UnitKind::Brave {
        return Some("not-native");
    }
    match world.settlement(colony) {
        Some(s) if s.is_colony() && s.faction != unit.faction => {}
        _ => return Some("colony-gone"),
    }
    if !collected {
        let Some(home) = unit.home else {
            return Some("no-home");
        };
        match world.settlement(home) {
            Some(s) if s.is_camp() && s.faction == unit.faction => {
                if s.stock == 0 {
                    return Some("no-gift");
                }
            }
            _ => return Some("no-home"),
        }
    }
    None
}

pub(super) fn demand_tribute(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    colony: u64,
    collected: &mut bool,
    priority: i32,
) -> StepResult {
    if !*collected {
        if let Travel::Arrived =
            approach(ctx, agent, Location::Settlement(colony), priority, true)
        {
            let can_ask = ctx
                .world
                .live_unit(agent)
                .map(|u| u.moves_left > 0)
                .unwrap_or(false);
            if can_ask {
                // A refusal settles the matter as surely as payment does.
                match ctx.world.demand_tribute(agent, colony, ctx.config.tribute_demand) {
                    Some(gold) => ctx.log.note(format!(
                        "agent {agent} extracted {gold} gold from colony {colony}"
                    )),
                    None => ctx.log.note(format!(
                        "agent {agent} was turned away from colony {colony}"
                    )),
                }
                *collected = true;
            }
        }
        return StepResult::InProgress;
    }
    // Carry the answer home; no home camp means the errand just ends.
    let home = ctx.world.live_unit(agent).and_then(|u| u.home);
    let Some(home) = home.filter(|h| ctx.world.settlement(*h).is_some()) else {
        return StepResult::Complete;
    };
    match approach(ctx, agent, Location::Settlement(home), priority, false) {
        Travel::Arrived => StepResult::Complete,
        _ => StepResult::InProgress,
    }
}

pub(super) fn demand_tribute_invalid(
    world: &World,
    unit: &Unit,
    colony: u64,
    collected: bool,
) -> Option<&'static str> {
    if unit.kind != UnitKind::Brave {
        return Some("not-native");
    }
    if !collected {
        match world.settlement(colony) {
            Some(s) if s.is_colony() && s.faction != unit.faction => {}
            _ => return Some("colony-gone"),
        }
    }
    None
}
