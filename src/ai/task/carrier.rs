//! The transport task: a carrier working its manifest of claimed cargo.

use super::{disembark_toward, travel_toward, StepResult, Travel};
use crate::ai::context::TurnContext;
use crate::ai::transport::{Cargo, Shipment, TransportDemand};
use crate::model::{Coord, Location, Unit, World};

enum CargoPlace {
    /// Disposed, deleted, or dangling. The claim is dead.
    Gone,
    /// On this carrier's deck.
    AboardUs,
    /// On some other carrier. Not ours to move.
    Elsewhere,
    /// Standing on a map tile, waiting.
    Ashore(Coord),
    /// Waiting at the homeland dock.
    Overseas,
}

fn cargo_place(world: &World, carrier: u64, cargo: Cargo) -> CargoPlace {
    let location = match cargo {
        Cargo::Agent(id) => match world.live_unit(id) {
            Some(u) => u.location,
            None => return CargoPlace::Gone,
        },
        Cargo::Goods(id) => match world.goods_lot(id) {
            Some(g) => g.location,
            None => return CargoPlace::Gone,
        },
    };
    match location {
        Location::Aboard(c) if c == carrier => CargoPlace::AboardUs,
        Location::Aboard(_) => CargoPlace::Elsewhere,
        Location::Homeland => CargoPlace::Overseas,
        other => match world.tile_of(other) {
            Some(c) => CargoPlace::Ashore(c),
            None => CargoPlace::Gone,
        },
    }
}

fn release(ctx: &mut TurnContext<'_>, cargo: Cargo) {
    ctx.demands.push(TransportDemand::Release { cargo });
}

fn drop_off(world: &mut World, shipment: Shipment) -> bool {
    match shipment.cargo {
        Cargo::Agent(id) => match world.tile_of(shipment.destination) {
            Some(goal) => disembark_toward(world, id, goal),
            None => false,
        },
        Cargo::Goods(id) => match shipment.destination.settlement_id() {
            Some(s) => world.unload_goods(id, s),
            None => false,
        },
    }
}

fn pick_up(world: &mut World, carrier: u64, cargo: Cargo) -> bool {
    match cargo {
        Cargo::Agent(id) => world.embark(id, carrier),
        Cargo::Goods(id) => world.load_goods(id, carrier),
    }
}

pub(super) fn transport(
    ctx: &mut TurnContext<'_>,
    agent: u64,
    manifest: &mut Vec<Shipment>,
) -> StepResult {
    let location = match ctx.world.live_unit(agent) {
        Some(u) => u.location,
        None => return StepResult::InProgress,
    };
    if location.is_homeland() {
        // Take on anything waiting at the dock, then put to sea if the
        // manifest calls for it.
        for shipment in manifest.iter() {
            if let CargoPlace::Overseas = cargo_place(ctx.world, agent, shipment.cargo) {
                pick_up(ctx.world, agent, shipment.cargo);
            }
        }
        let must_sail = manifest.iter().any(|s| {
            matches!(
                cargo_place(ctx.world, agent, s.cargo),
                CargoPlace::AboardUs | CargoPlace::Ashore(_)
            )
        });
        if !must_sail || !ctx.world.sail_from_homeland(agent) {
            return StepResult::InProgress;
        }
    }

    // Work the manifest in order, as far as this turn's sailing allows.
    let mut i = 0;
    while i < manifest.len() {
        let shipment = manifest[i];
        match cargo_place(ctx.world, agent, shipment.cargo) {
            CargoPlace::Gone | CargoPlace::Elsewhere => {
                release(ctx, shipment.cargo);
                manifest.remove(i);
            }
            CargoPlace::Overseas => {
                // Served on the next call home.
                i += 1;
            }
            CargoPlace::AboardUs => {
                let Some(goal) = ctx.world.tile_of(shipment.destination) else {
                    // Destination razed while we sailed. The passenger's own
                    // task will sort out a new one.
                    release(ctx, shipment.cargo);
                    manifest.remove(i);
                    continue;
                };
                match travel_toward(ctx, agent, goal, true) {
                    Travel::Arrived => {
                        if drop_off(ctx.world, shipment) {
                            ctx.log.note(format!(
                                "carrier {agent} delivered {:?} at {goal}",
                                shipment.cargo
                            ));
                            release(ctx, shipment.cargo);
                            manifest.remove(i);
                        } else {
                            break;
                        }
                    }
                    _ => break,
                }
            }
            CargoPlace::Ashore(at) => {
                if ctx.world.tile_of(shipment.destination) == Some(at) {
                    // Found its own way there; the claim is spent.
                    release(ctx, shipment.cargo);
                    manifest.remove(i);
                    continue;
                }
                match travel_toward(ctx, agent, at, true) {
                    Travel::Arrived => {
                        if pick_up(ctx.world, agent, shipment.cargo) {
                            ctx.log.note(format!(
                                "carrier {agent} took on {:?}",
                                shipment.cargo
                            ));
                            // Same entry again: the delivery leg may still
                            // fit into this turn.
                        } else {
                            break;
                        }
                    }
                    _ => break,
                }
            }
        }
    }

    if manifest.is_empty() {
        port_call(ctx, agent);
    }
    StepResult::InProgress
}

/// Hold station by the nearest friendly harbor between jobs.
fn port_call(ctx: &mut TurnContext<'_>, agent: u64) {
    let (faction, here) = match ctx.world.live_unit(agent) {
        Some(u) => match ctx.world.tile_of(u.location) {
            Some(c) => (u.faction, c),
            None => return,
        },
        None => return,
    };
    if let Some(port) = ctx.world.nearest_settlement_of(faction, here, true) {
        if let Some(coord) = ctx.world.settlement(port).map(|s| s.coord) {
            travel_toward(ctx, agent, coord, true);
        }
    }
}

pub(super) fn transport_invalid(unit: &Unit) -> Option<&'static str> {
    if !unit.is_carrier() {
        return Some("not-a-carrier");
    }
    None
}
