//! Tasks: the multi-turn goals agents pursue.
//!
//! A task is a small state machine attached to exactly one agent. Every turn
//! the planner re-derives its validity from world state, then lets it run one
//! step; the step issues world commands and may push transport demands. A
//! failed command leaves the world untouched, so the task simply tries again
//! next turn.

mod carrier;
mod colony;
mod frontier;
mod military;
mod native;

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::context::TurnContext;
use super::improvement::ImprovementPlan;
use super::transport::{Cargo, Shipment, TransportDemand};
use crate::model::location::NEIGHBOR_OFFSETS;
use crate::model::{Coord, GoodsKind, Location, Unit, World};

/// Lifecycle of a task. Fresh and restored tasks start `Unvalidated`; the
/// planner promotes them to `Active` after the turn's validity check and
/// never executes anything else.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TaskState {
    Unvalidated,
    Active,
    Completed,
    Invalid,
    Disposed,
}

/// Every goal an agent can hold. Closed on purpose: the planner matches
/// exhaustively, so a new variant has to answer every question below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskKind {
    /// Walk to a site and found a colony there.
    BuildSettlement { site: Coord },

    /// Parley with the chief of a native camp.
    Scout { camp: u64 },

    /// Garrison a friendly settlement and sally against anything adjacent.
    Defend { settlement: u64 },

    /// Carry claimed cargo along the manifest, in order.
    Transport { manifest: Vec<Shipment> },

    /// Work an improvement plan, buying tools first when needed.
    Pioneer { plan: u64 },

    /// Establish a mission in a native camp.
    Missionary { camp: u64 },

    /// Hunt down one specific enemy unit.
    SeekAndDestroy { quarry: u64 },

    /// Roam and pick fights with whatever comes near.
    WanderHostile,

    /// Roam without purpose. One-time filler.
    Wander,

    /// Bring a unit of the wished-for kind to the settlement that asked.
    WishRealization { settlement: u64, wish: u64 },

    /// Join a colony's working population.
    WorkInsideColony { settlement: u64 },

    /// Sit (or head back) home. One-time filler.
    IdleAtSettlement,

    /// Haul a treasure to a colony counting house.
    CashInTreasure,

    /// Prowl the sea lanes for enemy shipping.
    PrivateerRaid { quarry: Option<u64> },

    /// Collect goods at the home camp and present them at a colony.
    BringGift {
        colony: u64,
        gift: Option<(GoodsKind, u32)>,
    },

    /// March on a colony, demand payment, and carry the answer home.
    DemandTribute { colony: u64, collected: bool },
}

impl TaskKind {
    /// How urgently this task's agent should be carried when it cannot walk.
    pub fn base_transport_priority(&self) -> i32 {
        match self {
            TaskKind::WishRealization { .. } => 100,
            TaskKind::CashInTreasure => 95,
            TaskKind::BuildSettlement { .. } => 90,
            TaskKind::Pioneer { .. } => 80,
            TaskKind::Missionary { .. } => 70,
            TaskKind::Scout { .. } => 60,
            TaskKind::Defend { .. } => 50,
            TaskKind::SeekAndDestroy { .. } => 40,
            TaskKind::WorkInsideColony { .. } => 30,
            TaskKind::BringGift { .. } | TaskKind::DemandTribute { .. } => 20,
            TaskKind::Transport { .. }
            | TaskKind::Wander
            | TaskKind::WanderHostile
            | TaskKind::IdleAtSettlement
            | TaskKind::PrivateerRaid { .. } => 0,
        }
    }

    /// Fixed variant order for breaking assignment-score ties.
    pub fn rank(&self) -> u32 {
        match self {
            TaskKind::CashInTreasure => 16,
            TaskKind::WishRealization { .. } => 15,
            TaskKind::BuildSettlement { .. } => 14,
            TaskKind::Transport { .. } => 13,
            TaskKind::Defend { .. } => 12,
            TaskKind::Pioneer { .. } => 11,
            TaskKind::Missionary { .. } => 10,
            TaskKind::Scout { .. } => 9,
            TaskKind::SeekAndDestroy { .. } => 8,
            TaskKind::PrivateerRaid { .. } => 7,
            TaskKind::BringGift { .. } => 6,
            TaskKind::DemandTribute { .. } => 5,
            TaskKind::WorkInsideColony { .. } => 4,
            TaskKind::IdleAtSettlement => 3,
            TaskKind::WanderHostile => 2,
            TaskKind::Wander => 1,
        }
    }

    /// One-time tasks are filler: assigned, run once, thrown away, and never
    /// persisted.
    pub fn is_one_time(&self) -> bool {
        matches!(
            self,
            TaskKind::Wander | TaskKind::WanderHostile | TaskKind::IdleAtSettlement
        )
    }

    /// Same goal, ignoring progress baggage such as manifests or collected
    /// gifts. Assigning a task with the same goal as the current one is a
    /// no-op.
    pub fn goal_eq(&self, other: &TaskKind) -> bool {
        use TaskKind::*;
        match (self, other) {
            (BuildSettlement { site: a }, BuildSettlement { site: b }) => a == b,
            (Scout { camp: a }, Scout { camp: b }) => a == b,
            (Defend { settlement: a }, Defend { settlement: b }) => a == b,
            (Transport { .. }, Transport { .. }) => true,
            (Pioneer { plan: a }, Pioneer { plan: b }) => a == b,
            (Missionary { camp: a }, Missionary { camp: b }) => a == b,
            (SeekAndDestroy { quarry: a }, SeekAndDestroy { quarry: b }) => a == b,
            (WanderHostile, WanderHostile) => true,
            (Wander, Wander) => true,
            (WishRealization { wish: a, .. }, WishRealization { wish: b, .. }) => a == b,
            (WorkInsideColony { settlement: a }, WorkInsideColony { settlement: b }) => a == b,
            (IdleAtSettlement, IdleAtSettlement) => true,
            (CashInTreasure, CashInTreasure) => true,
            (PrivateerRaid { .. }, PrivateerRaid { .. }) => true,
            (BringGift { colony: a, .. }, BringGift { colony: b, .. }) => a == b,
            (DemandTribute { colony: a, .. }, DemandTribute { colony: b, .. }) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::BuildSettlement { site } => write!(f, "build-settlement at {site}"),
            TaskKind::Scout { camp } => write!(f, "scout camp {camp}"),
            TaskKind::Defend { settlement } => write!(f, "defend settlement {settlement}"),
            TaskKind::Transport { manifest } => {
                write!(f, "transport ({} legs)", manifest.len())
            }
            TaskKind::Pioneer { plan } => write!(f, "pioneer plan {plan}"),
            TaskKind::Missionary { camp } => write!(f, "missionary to camp {camp}"),
            TaskKind::SeekAndDestroy { quarry } => {
                write!(f, "seek-and-destroy unit {quarry}")
            }
            TaskKind::WanderHostile => write!(f, "wander-hostile"),
            TaskKind::Wander => write!(f, "wander"),
            TaskKind::WishRealization { settlement, wish } => {
                write!(f, "realize wish {wish} at settlement {settlement}")
            }
            TaskKind::WorkInsideColony { settlement } => {
                write!(f, "work inside colony {settlement}")
            }
            TaskKind::IdleAtSettlement => write!(f, "idle-at-settlement"),
            TaskKind::CashInTreasure => write!(f, "cash-in-treasure"),
            TaskKind::PrivateerRaid { .. } => write!(f, "privateer-raid"),
            TaskKind::BringGift { colony, .. } => write!(f, "bring-gift to colony {colony}"),
            TaskKind::DemandTribute { colony, .. } => {
                write!(f, "demand-tribute at colony {colony}")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Task {
    pub state: TaskState,
    pub kind: TaskKind,
}

/// What a step tells the planner afterwards.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StepResult {
    InProgress,
    Complete,
}

impl Task {
    pub fn new(kind: TaskKind) -> Self {
        Self {
            state: TaskState::Unvalidated,
            kind,
        }
    }

    pub fn is_one_time(&self) -> bool {
        self.kind.is_one_time()
    }

    /// Why this task can no longer work, or `None` while it still can.
    /// Derived fresh from world state; nothing here is cached.
    pub fn invalid_reason(
        &self,
        world: &World,
        unit: &Unit,
        plans: &BTreeMap<u64, ImprovementPlan>,
    ) -> Option<&'static str> {
        match &self.kind {
            TaskKind::BuildSettlement { site } => {
                colony::build_settlement_invalid(world, unit, *site)
            }
            TaskKind::Scout { camp } => frontier::scout_invalid(world, unit, *camp),
            TaskKind::Defend { settlement } => {
                military::defend_invalid(world, unit, *settlement)
            }
            TaskKind::Transport { .. } => carrier::transport_invalid(unit),
            TaskKind::Pioneer { plan } => {
                frontier::pioneer_invalid(world, unit, *plan, plans)
            }
            TaskKind::Missionary { camp } => frontier::missionary_invalid(world, unit, *camp),
            TaskKind::SeekAndDestroy { quarry } => {
                military::seek_and_destroy_invalid(world, unit, *quarry)
            }
            TaskKind::WanderHostile => military::wander_hostile_invalid(unit),
            TaskKind::Wander | TaskKind::IdleAtSettlement => None,
            TaskKind::WishRealization { settlement, wish } => {
                colony::wish_realization_invalid(world, unit, *settlement, *wish)
            }
            TaskKind::WorkInsideColony { settlement } => {
                colony::work_inside_colony_invalid(world, unit, *settlement)
            }
            TaskKind::CashInTreasure => frontier::cash_in_treasure_invalid(world, unit),
            TaskKind::PrivateerRaid { .. } => military::privateer_raid_invalid(unit),
            TaskKind::BringGift { colony: target, gift } => {
                native::bring_gift_invalid(world, unit, *target, gift.is_some())
            }
            TaskKind::DemandTribute { colony: target, collected } => {
                native::demand_tribute_invalid(world, unit, *target, *collected)
            }
        }
    }

    /// Run one turn of behavior. The planner validates first; stepping a
    /// task it has not activated is a programming error.
    pub(crate) fn step(&mut self, agent: u64, ctx: &mut TurnContext<'_>) {
        assert!(
            self.state == TaskState::Active,
            "step: task of agent {agent} is not active"
        );
        let priority = self.kind.base_transport_priority();
        let result = match &mut self.kind {
            TaskKind::BuildSettlement { site } => {
                colony::build_settlement(ctx, agent, *site, priority)
            }
            TaskKind::Scout { camp } => frontier::scout(ctx, agent, *camp, priority),
            TaskKind::Defend { settlement } => {
                military::defend(ctx, agent, *settlement, priority)
            }
            TaskKind::Transport { manifest } => carrier::transport(ctx, agent, manifest),
            TaskKind::Pioneer { plan } => frontier::pioneer(ctx, agent, *plan, priority),
            TaskKind::Missionary { camp } => frontier::missionary(ctx, agent, *camp, priority),
            TaskKind::SeekAndDestroy { quarry } => {
                military::seek_and_destroy(ctx, agent, *quarry, priority)
            }
            TaskKind::WanderHostile => military::wander_hostile(ctx, agent),
            TaskKind::Wander => frontier::wander(ctx, agent),
            TaskKind::WishRealization { settlement, wish } => {
                colony::wish_realization(ctx, agent, *settlement, *wish, priority)
            }
            TaskKind::WorkInsideColony { settlement } => {
                colony::work_inside_colony(ctx, agent, *settlement, priority)
            }
            TaskKind::IdleAtSettlement => colony::idle_at_settlement(ctx, agent),
            TaskKind::CashInTreasure => frontier::cash_in_treasure(ctx, agent, priority),
            TaskKind::PrivateerRaid { quarry } => military::privateer_raid(ctx, agent, quarry),
            TaskKind::BringGift { colony: target, gift } => {
                native::bring_gift(ctx, agent, *target, gift, priority)
            }
            TaskKind::DemandTribute { colony: target, collected } => {
                native::demand_tribute(ctx, agent, *target, collected, priority)
            }
        };
        if result == StepResult::Complete {
            self.state = TaskState::Completed;
        }
    }
}

/// How far a turn's travel got.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Travel {
    /// At (or, when allowed, next to) the goal.
    Arrived,
    /// Still en route: out of moves, waiting for a ride, or momentarily
    /// barred.
    Underway,
    /// The traveler or the goal no longer exists.
    Stuck,
}

/// Walk (or sail) toward `goal` until arrival or the moves run out. A blocked
/// step just ends this turn's travel; next turn re-routes around it.
pub(super) fn travel_toward(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    goal: Coord,
    adjacent_ok: bool,
) -> Travel {
    loop {
        let (here, moves) = match ctx.world.live_unit(agent) {
            Some(u) => match ctx.world.tile_of(u.location) {
                Some(c) => (c, u.moves_left),
                None => return Travel::Stuck,
            },
            None => return Travel::Stuck,
        };
        if here == goal || (adjacent_ok && here.is_adjacent(goal)) {
            return Travel::Arrived;
        }
        if moves == 0 {
            return Travel::Underway;
        }
        let Some(step) = ctx.world.next_step(agent, goal, adjacent_ok) else {
            return Travel::Underway;
        };
        if !ctx.world.move_unit(agent, step) {
            return Travel::Underway;
        }
    }
}

/// Move an agent toward a destination, riding carriers and demanding passage
/// where walking cannot work. `adjacent_ok` arrival is for business done over
/// a border: parley, attack, gift, tribute.
pub(super) fn approach(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    dest: Location,
    priority: i32,
    adjacent_ok: bool,
) -> Travel {
    let Some(goal) = ctx.world.tile_of(dest) else {
        return Travel::Stuck;
    };
    let (faction, naval, location) = match ctx.world.live_unit(agent) {
        Some(u) => (u.faction, u.kind.is_naval(), u.location),
        None => return Travel::Stuck,
    };

    if let Some(deck_carrier) = location.carrier_id() {
        // Riding. Step off once the carrier has pulled alongside the goal;
        // until then the carrier's turn is the passenger's turn.
        let Some(deck) = ctx.world.unit_tile(deck_carrier) else {
            return Travel::Underway;
        };
        if deck == goal || deck.is_adjacent(goal) {
            if disembark_toward(ctx.world, agent, goal) {
                ctx.demands.push(TransportDemand::Release {
                    cargo: Cargo::Agent(agent),
                });
                let ashore = ctx.world.unit_tile(agent);
                if ashore == Some(goal)
                    || (adjacent_ok && ashore.is_some_and(|c| c.is_adjacent(goal)))
                {
                    return Travel::Arrived;
                }
            }
        }
        return Travel::Underway;
    }

    if location.is_homeland() {
        if naval {
            if !ctx.world.sail_from_homeland(agent) {
                return Travel::Underway;
            }
        } else {
            ctx.demands.push(TransportDemand::Request {
                cargo: Cargo::Agent(agent),
                destination: dest,
                priority,
            });
            return Travel::Underway;
        }
    }

    let Some(here) = ctx.world.unit_tile(agent) else {
        return Travel::Stuck;
    };
    if here == goal || (adjacent_ok && here.is_adjacent(goal)) {
        return Travel::Arrived;
    }
    if ctx.world.route(here, goal, naval, faction, adjacent_ok).is_none() {
        if naval {
            return Travel::Stuck;
        }
        ctx.demands.push(TransportDemand::Request {
            cargo: Cargo::Agent(agent),
            destination: dest,
            priority,
        });
        return Travel::Underway;
    }
    travel_toward(ctx, agent, goal, adjacent_ok)
}

/// Put a passenger ashore as close to `goal` as the carrier allows: the goal
/// tile itself when the carrier lies alongside it, otherwise the adjacent
/// land tile nearest the goal, friendly settlements winning ties.
pub(super) fn disembark_toward(world: &mut World, unit: u64, goal: Coord) -> bool {
    let (faction, carrier) = match world.live_unit(unit) {
        Some(u) => match u.location.carrier_id() {
            Some(c) => (u.faction, c),
            None => return false,
        },
        None => return false,
    };
    if world.disembark(unit, goal) {
        return true;
    }
    let Some(deck) = world.unit_tile(carrier) else {
        return false;
    };
    let mut best: Option<((u32, bool), Coord)> = None;
    for n in deck.neighbors() {
        if !world.passable(false, faction, n) || world.has_enemy_on(faction, n) {
            continue;
        }
        let key = (n.distance(goal), world.settlement_at(n).is_none());
        if best.map(|(bk, _)| key < bk).unwrap_or(true) {
            best = Some((key, n));
        }
    }
    match best {
        Some((_, c)) => world.disembark(unit, c),
        None => false,
    }
}

/// Aimless movement: spend the turn's moves on random adjacent steps.
pub(super) fn roam(ctx: &mut TurnContext<'_>, agent: u64) {
    loop {
        let (here, moves) = match ctx.world.live_unit(agent) {
            Some(u) if !u.location.is_aboard() && !u.location.is_homeland() => {
                match ctx.world.tile_of(u.location) {
                    Some(c) => (c, u.moves_left),
                    None => return,
                }
            }
            _ => return,
        };
        if moves == 0 {
            return;
        }
        let start = ctx.rng.random_range(0..NEIGHBOR_OFFSETS.len());
        let mut moved = false;
        for i in 0..NEIGHBOR_OFFSETS.len() {
            let (dx, dy) = NEIGHBOR_OFFSETS[(start + i) % NEIGHBOR_OFFSETS.len()];
            let to = Coord::new(here.x + dx, here.y + dy);
            if ctx.world.move_unit(agent, to) {
                moved = true;
                break;
            }
        }
        if !moved {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_time_tasks_are_exactly_the_fillers() {
        assert!(TaskKind::Wander.is_one_time());
        assert!(TaskKind::WanderHostile.is_one_time());
        assert!(TaskKind::IdleAtSettlement.is_one_time());
        assert!(!TaskKind::CashInTreasure.is_one_time());
        assert!(!TaskKind::Transport { manifest: Vec::new() }.is_one_time());
    }

    #[test]
    fn transport_priorities_follow_the_table() {
        let wish = TaskKind::WishRealization {
            settlement: 1,
            wish: 2,
        };
        assert_eq!(wish.base_transport_priority(), 100);
        assert_eq!(TaskKind::CashInTreasure.base_transport_priority(), 95);
        assert_eq!(
            TaskKind::BuildSettlement {
                site: Coord::new(1, 1)
            }
            .base_transport_priority(),
            90
        );
        assert_eq!(TaskKind::Wander.base_transport_priority(), 0);
        assert_eq!(
            TaskKind::Transport { manifest: Vec::new() }.base_transport_priority(),
            0
        );
    }

    #[test]
    fn goal_eq_ignores_progress_baggage() {
        let a = TaskKind::BringGift {
            colony: 7,
            gift: None,
        };
        let b = TaskKind::BringGift {
            colony: 7,
            gift: Some((GoodsKind::Furs, 25)),
        };
        assert!(a.goal_eq(&b));
        let c = TaskKind::BringGift {
            colony: 8,
            gift: None,
        };
        assert!(!a.goal_eq(&c));
        assert!(!a.goal_eq(&TaskKind::Wander));
    }

    #[test]
    fn ranks_are_distinct() {
        let kinds = [
            TaskKind::BuildSettlement {
                site: Coord::new(0, 0),
            },
            TaskKind::Scout { camp: 0 },
            TaskKind::Defend { settlement: 0 },
            TaskKind::Transport { manifest: Vec::new() },
            TaskKind::Pioneer { plan: 0 },
            TaskKind::Missionary { camp: 0 },
            TaskKind::SeekAndDestroy { quarry: 0 },
            TaskKind::WanderHostile,
            TaskKind::Wander,
            TaskKind::WishRealization {
                settlement: 0,
                wish: 0,
            },
            TaskKind::WorkInsideColony { settlement: 0 },
            TaskKind::IdleAtSettlement,
            TaskKind::CashInTreasure,
            TaskKind::PrivateerRaid { quarry: None },
            TaskKind::BringGift {
                colony: 0,
                gift: None,
            },
            TaskKind::DemandTribute {
                colony: 0,
                collected: false,
            },
        ];
        let mut ranks: Vec<u32> = kinds.iter().map(|k| k.rank()).collect();
        ranks.sort_unstable();
        ranks.dedup();
        assert_eq!(ranks.len(), kinds.len());
    }

    #[test]
    fn kind_serde_round_trip_is_tagged() {
        let kind = TaskKind::Scout { camp: 12 };
        let json = serde_json::to_string(&kind).unwrap();
        assert!(json.contains("\"type\":\"scout\""));
        let parsed: TaskKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, kind);
    }
}
