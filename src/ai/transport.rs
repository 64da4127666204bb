//! Naval transport arbitration: demands, claims, and carrier matching.
//!
//! Tasks that cannot walk to their goal push a [`TransportDemand`] during
//! their step; the planner drains the buffer after every agent and feeds it
//! through the [`TransportCoordinator`]. The coordinator owns the claim
//! table: at most one carrier per piece of cargo, ever. Matching is greedy
//! and deterministic: requests by descending priority (cargo id breaking
//! ties), carriers by fewest turns to reach the cargo, then lowest id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::agent::Agent;
use super::log::TurnLog;
use super::task::{Task, TaskKind};
use crate::model::{Location, World};

/// Transport priority given to earmarked goods parcels. Sits between the
/// settlement-bound passenger tasks and the military errands.
pub const GOODS_PRIORITY: i32 = 50;

/// Something that can be carried: a planned agent or a goods parcel.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cargo {
    Agent(u64),
    Goods(u64),
}

/// One leg on a carrier's manifest.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub cargo: Cargo,
    pub destination: Location,
}

/// What a task tells the coordinator during its step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TransportDemand {
    Request {
        cargo: Cargo,
        destination: Location,
        priority: i32,
    },
    Release {
        cargo: Cargo,
    },
}

/// An active pairing of cargo to carrier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub carrier: u64,
    pub destination: Location,
}

/// The claim table and the matching pass over it.
#[derive(Debug, Default)]
pub struct TransportCoordinator {
    claims: BTreeMap<Cargo, Claim>,
}

impl TransportCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim_of(&self, cargo: Cargo) -> Option<Claim> {
        self.claims.get(&cargo).copied()
    }

    pub fn is_claimed(&self, cargo: Cargo) -> bool {
        self.claims.contains_key(&cargo)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Cargo, &Claim)> {
        self.claims.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }

    pub fn clear(&mut self) {
        self.claims.clear();
    }

    /// Re-seat a persisted claim. `false` when the cargo is already claimed;
    /// the first claim read wins.
    pub fn restore(&mut self, cargo: Cargo, claim: Claim) -> bool {
        if self.claims.contains_key(&cargo) {
            return false;
        }
        self.claims.insert(cargo, claim);
        true
    }

    /// Drop a claim and purge the matching leg from its carrier's manifest.
    /// Idempotent: releasing unclaimed cargo does nothing.
    pub fn release(&mut self, cargo: Cargo, agents: &mut BTreeMap<u64, Agent>) {
        let Some(claim) = self.claims.remove(&cargo) else {
            return;
        };
        if let Some(agent) = agents.get_mut(&claim.carrier) {
            if let Some(Task {
                kind: TaskKind::Transport { manifest },
                ..
            }) = agent.task.as_mut()
            {
                manifest.retain(|s| s.cargo != cargo);
            }
        }
    }

    /// Drop every claim held by one carrier, returning the freed cargo.
    /// Used when a transport task dies with legs still on its manifest.
    pub fn release_carrier(&mut self, carrier: u64) -> Vec<Cargo> {
        let freed: Vec<Cargo> = self
            .claims
            .iter()
            .filter(|(_, c)| c.carrier == carrier)
            .map(|(cargo, _)| *cargo)
            .collect();
        for cargo in &freed {
            self.claims.remove(cargo);
        }
        freed
    }

    /// One arbitration pass: releases first (freed capacity helps the
    /// requests), then requests in priority order.
    pub fn resolve(
        &mut self,
        demands: Vec<TransportDemand>,
        agents: &mut BTreeMap<u64, Agent>,
        world: &mut World,
        log: &mut TurnLog,
    ) {
        let mut requests = Vec::new();
        for demand in demands {
            match demand {
                TransportDemand::Release { cargo } => self.release(cargo, agents),
                TransportDemand::Request {
                    cargo,
                    destination,
                    priority,
                } => requests.push((priority, cargo, destination)),
            }
        }
        requests.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        for (_, cargo, destination) in requests {
            self.try_assign(cargo, destination, agents, world, log);
        }
    }

    fn try_assign(
        &mut self,
        cargo: Cargo,
        destination: Location,
        agents: &mut BTreeMap<u64, Agent>,
        world: &mut World,
        log: &mut TurnLog,
    ) {
        let Some((faction, space, at)) = cargo_brief(world, cargo) else {
            return;
        };
        if at.is_aboard() {
            return;
        }
        // A fresh request supersedes any standing claim on this cargo: the
        // old carrier loses the leg before the new match is scored.
        self.release(cargo, agents);

        let mut best: Option<(u32, u64)> = None;
        for (id, agent) in agents.iter() {
            let Some(unit) = world.live_unit(agent.unit) else {
                continue;
            };
            if unit.faction != faction || !unit.is_carrier() {
                continue;
            }
            if !available(agent) {
                continue;
            }
            if headroom(world, agent) < space {
                continue;
            }
            let Some(turns) = world.turns_to_reach(agent.unit, at) else {
                continue;
            };
            if best.map(|(bt, bid)| (turns, *id) < (bt, bid)).unwrap_or(true) {
                best = Some((turns, *id));
            }
        }
        let Some((_, carrier)) = best else {
            // No match. The demand stands; the task will raise it again.
            return;
        };

        self.claims.insert(cargo, Claim { carrier, destination });
        let Some(agent) = agents.get_mut(&carrier) else {
            return;
        };
        let shipment = Shipment { cargo, destination };
        match agent.task.as_mut() {
            Some(Task {
                kind: TaskKind::Transport { manifest },
                ..
            }) => manifest.push(shipment),
            _ => agent.assign(Task::new(TaskKind::Transport {
                manifest: vec![shipment],
            })),
        }
        log.note(format!("cargo {cargo:?} claimed by carrier {carrier}"));

        // Board on the spot when the two are already alongside.
        if alongside(world, carrier, at) {
            let boarded = match cargo {
                Cargo::Agent(id) => world.embark(id, carrier),
                Cargo::Goods(id) => world.load_goods(id, carrier),
            };
            if boarded {
                log.note(format!("cargo {cargo:?} boarded carrier {carrier}"));
            }
        }
    }
}

fn cargo_brief(world: &World, cargo: Cargo) -> Option<(u64, u32, Location)> {
    match cargo {
        Cargo::Agent(id) => world
            .live_unit(id)
            .map(|u| (u.faction, u.kind.space_taken(), u.location)),
        Cargo::Goods(id) => world.goods_lot(id).map(|g| (g.faction, 1, g.location)),
    }
}

/// A carrier can take transport work when idle, already hauling, or on
/// one-time filler.
fn available(agent: &Agent) -> bool {
    match &agent.task {
        None => true,
        Some(t) => matches!(t.kind, TaskKind::Transport { .. }) || t.kind.is_one_time(),
    }
}

/// Free hold space after subtracting manifest legs not yet embarked.
fn headroom(world: &World, agent: &Agent) -> u32 {
    let free = world.free_capacity(agent.unit);
    let reserved: u32 = match &agent.task {
        Some(Task {
            kind: TaskKind::Transport { manifest },
            ..
        }) => manifest
            .iter()
            .filter(|s| !is_aboard(world, agent.unit, s.cargo))
            .map(|s| cargo_space(world, s.cargo))
            .sum(),
        _ => 0,
    };
    free.saturating_sub(reserved)
}

fn is_aboard(world: &World, carrier: u64, cargo: Cargo) -> bool {
    let location = match cargo {
        Cargo::Agent(id) => world.live_unit(id).map(|u| u.location),
        Cargo::Goods(id) => world.goods_lot(id).map(|g| g.location),
    };
    location == Some(Location::Aboard(carrier))
}

fn cargo_space(world: &World, cargo: Cargo) -> u32 {
    match cargo {
        Cargo::Agent(id) => world
            .live_unit(id)
            .map(|u| u.kind.space_taken())
            .unwrap_or(0),
        Cargo::Goods(id) => world.goods_lot(id).map(|_| 1).unwrap_or(0),
    }
}

/// Same tile or adjacent on the map, or both sitting in the homeland port.
fn alongside(world: &World, carrier: u64, cargo_at: Location) -> bool {
    let Some(c) = world.live_unit(carrier) else {
        return false;
    };
    if c.location.is_homeland() {
        return cargo_at.is_homeland();
    }
    match (world.tile_of(c.location), world.tile_of(cargo_at)) {
        (Some(a), Some(b)) => a == b || a.is_adjacent(b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(carrier: u64) -> Claim {
        Claim {
            carrier,
            destination: Location::Settlement(9),
        }
    }

    #[test]
    fn one_claim_per_cargo() {
        let mut coord = TransportCoordinator::new();
        assert!(coord.restore(Cargo::Agent(1), claim(10)));
        assert!(!coord.restore(Cargo::Agent(1), claim(11)));
        assert_eq!(coord.claim_of(Cargo::Agent(1)).unwrap().carrier, 10);
    }

    #[test]
    fn release_is_idempotent() {
        let mut coord = TransportCoordinator::new();
        let mut agents = BTreeMap::new();
        coord.restore(Cargo::Goods(3), claim(10));
        coord.release(Cargo::Goods(3), &mut agents);
        assert!(!coord.is_claimed(Cargo::Goods(3)));
        // Again, now unclaimed.
        coord.release(Cargo::Goods(3), &mut agents);
        assert!(coord.is_empty());
    }

    #[test]
    fn release_carrier_frees_all_its_cargo() {
        let mut coord = TransportCoordinator::new();
        coord.restore(Cargo::Agent(1), claim(10));
        coord.restore(Cargo::Agent(2), claim(10));
        coord.restore(Cargo::Agent(3), claim(11));
        let freed = coord.release_carrier(10);
        assert_eq!(freed, vec![Cargo::Agent(1), Cargo::Agent(2)]);
        assert!(coord.is_claimed(Cargo::Agent(3)));
    }

    #[test]
    fn a_rerouted_request_replaces_the_standing_claim() {
        use crate::model::{GoodsKind, UnitKind};
        use crate::scenario::Scenario;
        use crate::Coord;

        let mut s = Scenario::island(8, 8);
        let crown = s.colonial("Crown", Coord::new(0, 5));
        let quay = s.colony(crown, "Quay", Coord::new(1, 1));
        let uphill = s.colony(crown, "Uphill", Coord::new(5, 5));
        let landing = s.colony(crown, "Landing", Coord::new(1, 5));
        let lot = s.goods(crown, GoodsKind::Furs, 40, Location::Settlement(quay));
        let ship = s.unit(crown, UnitKind::Caravel, Coord::new(0, 5));
        let mut world = s.finish();

        let mut agents = BTreeMap::new();
        agents.insert(ship, Agent::new(ship));
        let mut coord = TransportCoordinator::new();
        let mut log = TurnLog::new();
        let request = |to: u64| {
            vec![TransportDemand::Request {
                cargo: Cargo::Goods(lot),
                destination: Location::Settlement(to),
                priority: GOODS_PRIORITY,
            }]
        };

        coord.resolve(request(uphill), &mut agents, &mut world, &mut log);
        let first = coord.claim_of(Cargo::Goods(lot)).unwrap();
        assert_eq!(first.carrier, ship);
        assert_eq!(first.destination, Location::Settlement(uphill));

        // The lot is re-routed before the ship arrives; the claim and the
        // manifest must follow, not stack.
        coord.resolve(request(landing), &mut agents, &mut world, &mut log);
        let second = coord.claim_of(Cargo::Goods(lot)).unwrap();
        assert_eq!(second.carrier, ship);
        assert_eq!(second.destination, Location::Settlement(landing));

        let Some(Task {
            kind: TaskKind::Transport { manifest },
            ..
        }) = &agents[&ship].task
        else {
            panic!("the carrier should hold a transport task");
        };
        assert_eq!(
            manifest,
            &vec![Shipment {
                cargo: Cargo::Goods(lot),
                destination: Location::Settlement(landing),
            }]
        );
    }

    #[test]
    fn cargo_orders_by_variant_then_id() {
        let mut cargos = vec![Cargo::Goods(1), Cargo::Agent(7), Cargo::Agent(2)];
        cargos.sort();
        assert_eq!(
            cargos,
            vec![Cargo::Agent(2), Cargo::Agent(7), Cargo::Goods(1)]
        );
    }
}
