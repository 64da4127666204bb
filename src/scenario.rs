//! Canned worlds for tests and examples.
//!
//! A [`Scenario`] wraps a [`World`] under construction and offers shortcuts
//! for the setups that come up again and again: an island arena, a colonial
//! power with its entry point on the rim, a native tribe with a stocked camp.
//! Everything here goes through the same `World::add_*` constructors the
//! planner sees at runtime, so a scenario world is never in a state the
//! model could not have reached.

use crate::model::{
    Coord, FactionKind, GoodsKind, Location, SettlementKind, Terrain, UnitKind, World,
};

/// IDs returned by [`Scenario::settled_power`].
pub struct ColonyIds {
    pub faction: u64,
    pub colony: u64,
}

/// IDs returned by [`Scenario::tribe`].
pub struct TribeIds {
    pub faction: u64,
    pub camp: u64,
    pub brave: u64,
}

pub struct Scenario {
    pub world: World,
}

impl Scenario {
    /// Plains interior with an ocean rim, the standard arena. Ships can
    /// reach any rim tile; everything inland is walkable.
    pub fn island(width: i32, height: i32) -> Self {
        let mut world = World::new(width, height);
        for x in 1..width - 1 {
            for y in 1..height - 1 {
                world.set_terrain(Coord::new(x, y), Terrain::Plains);
            }
        }
        Self { world }
    }

    /// Plains everywhere, no water at all. For tests that must keep ships
    /// and homeland crossings out of the picture.
    pub fn landlocked(width: i32, height: i32) -> Self {
        let mut world = World::new(width, height);
        for x in 0..width {
            for y in 0..height {
                world.set_terrain(Coord::new(x, y), Terrain::Plains);
            }
        }
        Self { world }
    }

    pub fn terrain(&mut self, c: Coord, terrain: Terrain) -> &mut Self {
        self.world.set_terrain(c, terrain);
        self
    }

    /// A colonial power whose ships enter the map at `entry`.
    pub fn colonial(&mut self, name: &str, entry: Coord) -> u64 {
        let id = self.world.add_faction(FactionKind::Colonial, name);
        if let Some(faction) = self.world.faction_mut(id) {
            faction.entry = Some(entry);
        }
        id
    }

    pub fn native(&mut self, name: &str) -> u64 {
        self.world.add_faction(FactionKind::Native, name)
    }

    pub fn colony(&mut self, faction: u64, name: &str, coord: Coord) -> u64 {
        self.world
            .add_settlement(faction, name, SettlementKind::Colony, coord)
    }

    pub fn camp(&mut self, faction: u64, name: &str, coord: Coord) -> u64 {
        self.world
            .add_settlement(faction, name, SettlementKind::Camp, coord)
    }

    pub fn unit(&mut self, faction: u64, kind: UnitKind, coord: Coord) -> u64 {
        self.world.add_unit(faction, kind, Location::Tile(coord))
    }

    pub fn unit_in(&mut self, faction: u64, kind: UnitKind, settlement: u64) -> u64 {
        self.world
            .add_unit(faction, kind, Location::Settlement(settlement))
    }

    /// A unit still waiting in the homeland port.
    pub fn unit_overseas(&mut self, faction: u64, kind: UnitKind) -> u64 {
        self.world.add_unit(faction, kind, Location::Homeland)
    }

    pub fn gold(&mut self, faction: u64, amount: u32) -> &mut Self {
        if let Some(f) = self.world.faction_mut(faction) {
            f.gold = amount;
        }
        self
    }

    /// Stock a camp's gift stores.
    pub fn stock(&mut self, settlement: u64, amount: u32) -> &mut Self {
        if let Some(s) = self.world.settlement_mut(settlement) {
            s.stock = amount;
        }
        self
    }

    pub fn goods(&mut self, faction: u64, kind: GoodsKind, amount: u32, at: Location) -> u64 {
        self.world.add_goods_lot(faction, kind, amount, at)
    }

    /// Earmark a goods lot for delivery to a settlement.
    pub fn earmark(&mut self, lot: u64, settlement: u64) -> &mut Self {
        if let Some(g) = self.world.goods_lot_mut(lot) {
            g.destination = Some(settlement);
        }
        self
    }

    /// Colonial power with one colony, the common opening.
    pub fn settled_power(&mut self, name: &str, entry: Coord, colony_at: Coord) -> ColonyIds {
        let faction = self.colonial(name, entry);
        let colony = self.colony(faction, &format!("{name} Landing"), colony_at);
        ColonyIds { faction, colony }
    }

    /// Native tribe with one camp and a brave living there.
    pub fn tribe(&mut self, name: &str, camp_at: Coord) -> TribeIds {
        let faction = self.native(name);
        let camp = self.camp(faction, &format!("{name} Camp"), camp_at);
        let brave = self.unit_in(faction, UnitKind::Brave, camp);
        if let Some(u) = self.world.unit_mut(brave) {
            u.home = Some(camp);
        }
        TribeIds {
            faction,
            camp,
            brave,
        }
    }

    pub fn finish(self) -> World {
        self.world
    }
}
