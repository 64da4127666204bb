//! Command issuance: every mutation the planner may ask of the world.
//!
//! Commands validate their own preconditions and return `false` (or `None`)
//! without touching anything when a precondition fails. Callers treat a
//! failed command as "try again next turn", never as an error; only calls
//! that reference objects that cannot exist get a diagnostic.

use serde::{Deserialize, Serialize};

use super::location::{Coord, Location};
use super::rules::{GoodsKind, ImprovementKind, UnitKind, UnitRole};
use super::settlement::SettlementKind;
use super::world::World;

/// Result of a resolved attack. The attacker always ends its turn;
/// a repulsed attack disposes nobody.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Won,
    Repulsed,
}

/// One turn of pioneer effort on a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOutcome {
    Progressed,
    Finished,
}

impl World {
    /// Step a unit onto an adjacent tile. Entering a tile with a friendly
    /// settlement promotes the unit's location to that settlement.
    pub fn move_unit(&mut self, unit: u64, to: Coord) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "move_unit: unknown or disposed unit");
            return false;
        };
        if u.moves_left == 0 || u.location.is_aboard() {
            return false;
        }
        let (faction, naval) = (u.faction, u.kind.is_naval());
        let Some(from) = self.tile_of(u.location) else {
            return false;
        };
        if !from.is_adjacent(to)
            || !self.passable(naval, faction, to)
            || self.has_enemy_on(faction, to)
        {
            return false;
        }
        let dest = self.canonical_location(to);
        let u = self.unit_mut(unit).unwrap();
        u.moves_left -= 1;
        u.location = dest;
        true
    }

    /// Board a friendly carrier with room. Works on the map when the unit
    /// stands on or next to the carrier's tile, and freely in the homeland.
    pub fn embark(&mut self, unit: u64, carrier: u64) -> bool {
        let (Some(u), Some(c)) = (self.live_unit(unit), self.live_unit(carrier)) else {
            tracing::warn!(unit, carrier, "embark: unknown or disposed party");
            return false;
        };
        if !c.is_carrier()
            || u.kind.is_naval()
            || u.faction != c.faction
            || u.location.is_aboard()
        {
            return false;
        }
        if u.kind == UnitKind::TreasureTrain && !c.kind.can_carry_treasure() {
            return false;
        }
        if self.free_capacity(carrier) < u.kind.space_taken() {
            return false;
        }
        let at_home = u.location.is_homeland() && c.location.is_homeland();
        if !at_home {
            let (Some(ut), Some(ct)) = (self.tile_of(u.location), self.tile_of(c.location))
            else {
                return false;
            };
            if ut != ct && !ut.is_adjacent(ct) {
                return false;
            }
            if u.moves_left == 0 {
                return false;
            }
        }
        let u = self.unit_mut(unit).unwrap();
        u.location = Location::Aboard(carrier);
        u.moves_left = 0;
        true
    }

    /// Put a carried unit ashore on a tile next to the carrier.
    pub fn disembark(&mut self, unit: u64, to: Coord) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "disembark: unknown or disposed unit");
            return false;
        };
        let Some(carrier) = u.location.carrier_id() else {
            return false;
        };
        let faction = u.faction;
        let Some(ct) = self.unit_tile(carrier) else {
            return false;
        };
        if !ct.is_adjacent(to)
            || !self.passable(false, faction, to)
            || self.has_enemy_on(faction, to)
        {
            return false;
        }
        let dest = self.canonical_location(to);
        let u = self.unit_mut(unit).unwrap();
        u.location = dest;
        u.moves_left = 0;
        true
    }

    /// Step off a carrier that is sitting in the homeland port.
    pub fn disembark_homeland(&mut self, unit: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            return false;
        };
        let Some(carrier) = u.location.carrier_id() else {
            return false;
        };
        if self.live_unit(carrier).map(|c| c.location) != Some(Location::Homeland) {
            return false;
        }
        self.unit_mut(unit).unwrap().location = Location::Homeland;
        true
    }

    /// Load a goods parcel onto a friendly carrier alongside it.
    pub fn load_goods(&mut self, lot: u64, carrier: u64) -> bool {
        let (Some(g), Some(c)) = (self.goods_lot(lot), self.live_unit(carrier)) else {
            tracing::warn!(lot, carrier, "load_goods: unknown party");
            return false;
        };
        if !c.is_carrier() || g.faction != c.faction || g.location.is_aboard() {
            return false;
        }
        if self.free_capacity(carrier) < 1 {
            return false;
        }
        let at_home = g.location.is_homeland() && c.location.is_homeland();
        if !at_home {
            let (Some(gt), Some(ct)) = (self.tile_of(g.location), self.tile_of(c.location))
            else {
                return false;
            };
            if gt != ct && !gt.is_adjacent(ct) {
                return false;
            }
        }
        self.goods_lot_mut(lot).unwrap().location = Location::Aboard(carrier);
        true
    }

    /// Unload a carried parcel into a settlement the carrier stands at or
    /// next to. Delivery to the parcel's earmarked destination clears the
    /// earmark.
    pub fn unload_goods(&mut self, lot: u64, settlement: u64) -> bool {
        let Some(g) = self.goods_lot(lot) else {
            tracing::warn!(lot, "unload_goods: unknown parcel");
            return false;
        };
        let Some(carrier) = g.location.carrier_id() else {
            return false;
        };
        let Some(s) = self.settlement(settlement) else {
            return false;
        };
        let coord = s.coord;
        let Some(ct) = self.unit_tile(carrier) else {
            return false;
        };
        if ct != coord && !ct.is_adjacent(coord) {
            return false;
        }
        let g = self.goods_lot_mut(lot).unwrap();
        g.location = Location::Settlement(settlement);
        if g.destination == Some(settlement) {
            g.destination = None;
        }
        true
    }

    /// Buy equipment for a role at a friendly colony or in the homeland.
    /// The faction pays price-per-count; the exact amount must be
    /// affordable, count-down haggling is the agent's business.
    pub fn equip_unit(&mut self, unit: u64, role: UnitRole, count: u32) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "equip_unit: unknown or disposed unit");
            return false;
        };
        if !u.kind.is_colonist() || count > role.max_count() {
            return false;
        }
        if role != UnitRole::Default && count == 0 {
            return false;
        }
        let faction = u.faction;
        let at_outfitter = match u.location {
            Location::Homeland => true,
            loc => match loc.settlement_id().or_else(|| {
                self.tile_of(loc)
                    .and_then(|c| self.settlement_at(c).map(|s| s.id))
            }) {
                Some(id) => self
                    .settlement(id)
                    .map(|s| s.faction == faction && s.is_colony())
                    .unwrap_or(false),
                None => false,
            },
        };
        if !at_outfitter {
            return false;
        }
        let price = role.price() * count;
        if !self.faction(faction).map(|f| f.can_afford(price)).unwrap_or(false) {
            return false;
        }
        self.faction_mut(faction).unwrap().gold -= price;
        let u = self.unit_mut(unit).unwrap();
        u.role = role;
        u.role_count = count;
        true
    }

    /// Found a colony where the unit stands. The founder moves inside.
    pub fn found_settlement(&mut self, unit: u64, name: impl Into<String>) -> Option<u64> {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "found_settlement: unknown or disposed unit");
            return None;
        };
        if !u.kind.can_found_settlement() || u.moves_left == 0 {
            return None;
        }
        let Location::Tile(coord) = u.location else {
            return None;
        };
        let faction = u.faction;
        let settleable = self
            .tile(coord)
            .map(|t| t.terrain.is_settleable())
            .unwrap_or(false);
        if !settleable || self.settlement_at(coord).is_some() {
            return None;
        }
        let id = self.add_settlement(faction, name, SettlementKind::Colony, coord);
        let u = self.unit_mut(unit).unwrap();
        u.location = Location::Settlement(id);
        u.moves_left = 0;
        Some(id)
    }

    /// Scout parley at a native camp. Each faction's scouts are received
    /// once.
    pub fn speak_to_chief(&mut self, unit: u64, camp: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "speak_to_chief: unknown or disposed unit");
            return false;
        };
        if u.role != UnitRole::Scout || u.moves_left == 0 {
            return false;
        }
        let faction = u.faction;
        let Some(ut) = self.tile_of(u.location) else {
            return false;
        };
        let Some(s) = self.settlement(camp) else {
            return false;
        };
        if !s.is_camp() || s.scouted_by(faction) {
            return false;
        }
        if ut != s.coord && !ut.is_adjacent(s.coord) {
            return false;
        }
        self.settlement_mut(camp).unwrap().scouted_by.push(faction);
        self.unit_mut(unit).unwrap().moves_left = 0;
        true
    }

    /// Plant a mission in a native camp. The missionary settles there and
    /// leaves the map.
    pub fn establish_mission(&mut self, unit: u64, camp: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "establish_mission: unknown or disposed unit");
            return false;
        };
        if u.role != UnitRole::Missionary || u.moves_left == 0 {
            return false;
        }
        let faction = u.faction;
        let Some(ut) = self.tile_of(u.location) else {
            return false;
        };
        let Some(s) = self.settlement(camp) else {
            return false;
        };
        if !s.is_camp() || s.mission == Some(faction) {
            return false;
        }
        if ut != s.coord && !ut.is_adjacent(s.coord) {
            return false;
        }
        self.settlement_mut(camp).unwrap().mission = Some(faction);
        self.dispose_unit(unit);
        true
    }

    /// Resolve an attack on an adjacent enemy unit of the same arm.
    /// Spends the attacker's turn; the loser of a won fight is disposed.
    pub fn attack(&mut self, attacker: u64, target: u64) -> Option<AttackOutcome> {
        let (Some(a), Some(t)) = (self.live_unit(attacker), self.live_unit(target)) else {
            return None;
        };
        if a.faction == t.faction
            || a.offence() == 0
            || a.moves_left == 0
            || a.kind.is_naval() != t.kind.is_naval()
            || t.location.is_aboard()
        {
            return None;
        }
        let (Some(at), Some(tt)) = (self.tile_of(a.location), self.tile_of(t.location)) else {
            return None;
        };
        if !at.is_adjacent(tt) {
            return None;
        }
        let won = a.offence() > t.defence();
        self.unit_mut(attacker).unwrap().moves_left = 0;
        if won {
            self.dispose_unit(target);
            Some(AttackOutcome::Won)
        } else {
            Some(AttackOutcome::Repulsed)
        }
    }

    /// Mark a unit disposed. Anything riding it goes down with it; carried
    /// goods are lost outright.
    pub fn dispose_unit(&mut self, unit: u64) {
        let riders: Vec<u64> = self.units_aboard(unit).map(|u| u.id).collect();
        let lots: Vec<u64> = self.goods_aboard(unit).map(|g| g.id).collect();
        for rider in riders {
            if let Some(u) = self.unit_mut(rider) {
                u.disposed = true;
            }
        }
        for lot in lots {
            self.goods.remove(&lot);
        }
        if let Some(u) = self.unit_mut(unit) {
            u.disposed = true;
        }
    }

    /// Turn a treasure train's haul into faction gold at a friendly colony
    /// or back in the homeland. The train disbands.
    pub fn cash_in_treasure(&mut self, unit: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "cash_in_treasure: unknown or disposed unit");
            return false;
        };
        if u.kind != UnitKind::TreasureTrain || u.treasure == 0 {
            return false;
        }
        let (faction, treasure) = (u.faction, u.treasure);
        let at_bank = match u.location {
            Location::Homeland => true,
            Location::Settlement(id) => self
                .settlement(id)
                .map(|s| s.faction == faction && s.is_colony())
                .unwrap_or(false),
            _ => false,
        };
        if !at_bank {
            return false;
        }
        self.faction_mut(faction).unwrap().gold += treasure;
        self.dispose_unit(unit);
        true
    }

    /// Take one parcel of gift goods from the unit's own camp stock.
    pub fn collect_gift(&mut self, unit: u64, camp: u64) -> Option<GoodsKind> {
        let Some(u) = self.live_unit(unit) else {
            return None;
        };
        if u.kind != UnitKind::Brave || u.moves_left == 0 {
            return None;
        }
        let faction = u.faction;
        let ut = self.tile_of(u.location)?;
        let s = self.settlement(camp)?;
        if s.faction != faction || !s.is_camp() || s.stock == 0 {
            return None;
        }
        if ut != s.coord && !ut.is_adjacent(s.coord) {
            return None;
        }
        self.settlement_mut(camp).unwrap().stock -= 1;
        Some(GoodsKind::Furs)
    }

    /// Hand a gift over at a colonial settlement's gate.
    pub fn deliver_gift(
        &mut self,
        unit: u64,
        colony: u64,
        _goods: GoodsKind,
        _amount: u32,
    ) -> bool {
        let Some(u) = self.live_unit(unit) else {
            return false;
        };
        if u.kind != UnitKind::Brave || u.moves_left == 0 {
            return false;
        }
        let faction = u.faction;
        let Some(ut) = self.tile_of(u.location) else {
            return false;
        };
        let Some(s) = self.settlement(colony) else {
            return false;
        };
        if !s.is_colony() || s.faction == faction {
            return false;
        }
        if ut != s.coord && !ut.is_adjacent(s.coord) {
            return false;
        }
        self.unit_mut(unit).unwrap().moves_left = 0;
        true
    }

    /// Demand tribute at a colonial settlement's gate. Pays out whatever the
    /// owner can cover, up to `amount`; `None` means a refusal (an empty
    /// treasury buys nothing).
    pub fn demand_tribute(&mut self, unit: u64, colony: u64, amount: u32) -> Option<u32> {
        let Some(u) = self.live_unit(unit) else {
            return None;
        };
        if u.kind != UnitKind::Brave || u.moves_left == 0 {
            return None;
        }
        let faction = u.faction;
        let ut = self.tile_of(u.location)?;
        let s = self.settlement(colony)?;
        if !s.is_colony() || s.faction == faction {
            return None;
        }
        if ut != s.coord && !ut.is_adjacent(s.coord) {
            return None;
        }
        let victim = s.faction;
        self.unit_mut(unit).unwrap().moves_left = 0;
        let payment = self.faction(victim).map(|f| f.gold.min(amount)).unwrap_or(0);
        if payment == 0 {
            return None;
        }
        self.faction_mut(victim).unwrap().gold -= payment;
        self.faction_mut(faction).unwrap().gold += payment;
        Some(payment)
    }

    /// Catch the winds home from a border ocean tile. Arrival is immediate;
    /// the crossing costs the rest of the turn.
    pub fn sail_for_homeland(&mut self, unit: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            return false;
        };
        if !u.kind.is_naval() || u.moves_left == 0 {
            return false;
        }
        let Some(c) = self.tile_of(u.location) else {
            return false;
        };
        if !self.is_border(c) {
            return false;
        }
        let u = self.unit_mut(unit).unwrap();
        u.location = Location::Homeland;
        u.moves_left = 0;
        true
    }

    /// Sail from the homeland to the faction's map entry tile.
    pub fn sail_from_homeland(&mut self, unit: u64) -> bool {
        let Some(u) = self.live_unit(unit) else {
            return false;
        };
        if !u.kind.is_naval() || !u.location.is_homeland() || u.moves_left == 0 {
            return false;
        }
        let faction = u.faction;
        let Some(entry) = self.faction(faction).and_then(|f| f.entry) else {
            return false;
        };
        if !self.passable(true, faction, entry) {
            return false;
        }
        let u = self.unit_mut(unit).unwrap();
        u.location = Location::Tile(entry);
        u.moves_left = 0;
        true
    }

    /// One turn of pioneer work toward an improvement on the unit's tile.
    /// Finishing expends tool bundles and may transform the terrain; a
    /// pioneer out of tools reverts to the default role.
    pub fn improvement_work(&mut self, unit: u64, kind: ImprovementKind) -> Option<WorkOutcome> {
        let Some(u) = self.live_unit(unit) else {
            tracing::warn!(unit, "improvement_work: unknown or disposed unit");
            return None;
        };
        if u.role != UnitRole::Pioneer || u.role_count < kind.tool_cost() || u.moves_left == 0 {
            return None;
        }
        let Location::Tile(coord) = u.location else {
            return None;
        };
        if kind.is_natural() {
            return None;
        }
        let tile = self.tile(coord)?;
        if !kind.allowed_on(tile.terrain) || tile.has_improvement(kind) {
            return None;
        }
        self.unit_mut(unit).unwrap().moves_left = 0;
        let tile = self.tile_mut(coord).unwrap();
        let mut work = match tile.work {
            Some(w) if w.kind == kind => w,
            _ => super::tile::TileWork {
                kind,
                remaining: kind.work_turns(),
            },
        };
        work.remaining -= 1;
        if work.remaining > 0 {
            tile.work = Some(work);
            return Some(WorkOutcome::Progressed);
        }
        tile.work = None;
        tile.improvements.push(kind);
        if let Some(terrain) = kind.transforms_to() {
            tile.terrain = terrain;
        }
        let u = self.unit_mut(unit).unwrap();
        u.role_count -= kind.tool_cost();
        if u.role_count == 0 {
            u.role = UnitRole::Default;
        }
        Some(WorkOutcome::Finished)
    }

    /// Tear a settlement out of the world. Occupants are turned out onto
    /// the tile; stored goods are dropped with them.
    pub fn remove_settlement(&mut self, settlement: u64) {
        let Some(s) = self.settlements.remove(&settlement) else {
            tracing::warn!(settlement, "remove_settlement: unknown settlement");
            return;
        };
        let evicted: Vec<u64> = self
            .units
            .values()
            .filter(|u| u.location == Location::Settlement(settlement))
            .map(|u| u.id)
            .collect();
        for id in evicted {
            self.unit_mut(id).unwrap().location = Location::Tile(s.coord);
        }
        let dropped: Vec<u64> = self
            .goods
            .values()
            .filter(|g| g.location == Location::Settlement(settlement))
            .map(|g| g.id)
            .collect();
        for id in dropped {
            self.goods_lot_mut(id).unwrap().location = Location::Tile(s.coord);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::faction::FactionKind;
    use crate::model::rules::Terrain;

    fn coastal_world() -> (World, u64) {
        let mut world = World::new(8, 8);
        for x in 1..8 {
            for y in 0..8 {
                world.set_terrain(Coord::new(x, y), Terrain::Plains);
            }
        }
        let f = world.add_faction(FactionKind::Colonial, "Crown");
        (world, f)
    }

    #[test]
    fn move_costs_a_point_and_promotes_into_settlements() {
        let (mut world, f) = coastal_world();
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(3, 3));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(2, 2)));
        assert!(world.move_unit(u, Coord::new(3, 3)));
        let unit = world.unit(u).unwrap();
        assert_eq!(unit.location, Location::Settlement(s));
        assert_eq!(unit.moves_left, 0);
        // Out of moves now.
        assert!(!world.move_unit(u, Coord::new(3, 3)));
    }

    #[test]
    fn move_refuses_water_enemies_and_non_adjacent() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(3, 2)));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(2, 2)));
        assert!(!world.move_unit(u, Coord::new(5, 2)), "not adjacent");
        assert!(!world.move_unit(u, Coord::new(3, 2)), "enemy on tile");
        let ship = world.add_unit(f, UnitKind::Caravel, Location::Tile(Coord::new(0, 2)));
        assert!(!world.move_unit(ship, Coord::new(1, 2)), "ships stay at sea");
        assert!(world.move_unit(ship, Coord::new(0, 3)));
    }

    #[test]
    fn embark_and_disembark_round_trip() {
        let (mut world, f) = coastal_world();
        let ship = world.add_unit(f, UnitKind::Caravel, Location::Tile(Coord::new(0, 4)));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(1, 4)));
        assert!(world.embark(u, ship));
        assert_eq!(world.unit(u).unwrap().location, Location::Aboard(ship));
        assert_eq!(world.free_capacity(ship), 1);

        world.begin_turn();
        assert!(world.disembark(u, Coord::new(1, 5)));
        assert_eq!(world.unit(u).unwrap().location, Location::Tile(Coord::new(1, 5)));
        assert_eq!(world.unit(u).unwrap().moves_left, 0);
    }

    #[test]
    fn embark_respects_capacity() {
        let (mut world, f) = coastal_world();
        let ship = world.add_unit(f, UnitKind::Caravel, Location::Tile(Coord::new(0, 4)));
        let a = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(1, 4)));
        let b = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(1, 4)));
        let train = world.add_unit(f, UnitKind::TreasureTrain, Location::Tile(Coord::new(1, 4)));
        assert!(!world.embark(train, ship), "train needs more holds than a caravel has");
        assert!(world.embark(a, ship));
        assert!(world.embark(b, ship));
        let c = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(1, 4)));
        assert!(!world.embark(c, ship), "full");
    }

    #[test]
    fn foreign_carriers_refuse_passengers() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Colonial, "Rival");
        let ship = world.add_unit(them, UnitKind::Caravel, Location::Tile(Coord::new(0, 4)));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(1, 4)));
        assert!(!world.embark(u, ship));
    }

    #[test]
    fn goods_load_and_unload_clear_earmark() {
        let (mut world, f) = coastal_world();
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(1, 4));
        let ship = world.add_unit(f, UnitKind::Caravel, Location::Tile(Coord::new(0, 4)));
        let lot = world.add_goods_lot(f, GoodsKind::Furs, 100, Location::Tile(Coord::new(1, 5)));
        world.goods_lot_mut(lot).unwrap().destination = Some(s);

        assert!(world.load_goods(lot, ship));
        assert_eq!(world.goods_lot(lot).unwrap().location, Location::Aboard(ship));
        assert!(world.unload_goods(lot, s));
        let g = world.goods_lot(lot).unwrap();
        assert_eq!(g.location, Location::Settlement(s));
        assert_eq!(g.destination, None);
    }

    #[test]
    fn equip_charges_gold_at_a_colony() {
        let (mut world, f) = coastal_world();
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(3, 3));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Settlement(s));
        assert!(!world.equip_unit(u, UnitRole::Pioneer, 5), "broke");
        world.faction_mut(f).unwrap().gold = 100;
        assert!(world.equip_unit(u, UnitRole::Pioneer, 5));
        let unit = world.unit(u).unwrap();
        assert_eq!(unit.role, UnitRole::Pioneer);
        assert_eq!(unit.role_count, 5);
        assert_eq!(world.faction(f).unwrap().gold, 0);
    }

    #[test]
    fn equip_needs_an_outfitter() {
        let (mut world, f) = coastal_world();
        world.faction_mut(f).unwrap().gold = 1000;
        let afield = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(5, 5)));
        assert!(!world.equip_unit(afield, UnitRole::Scout, 1));
        let home = world.add_unit(f, UnitKind::Colonist, Location::Homeland);
        assert!(world.equip_unit(home, UnitRole::Scout, 1));
        let brave_faction = world.add_faction(FactionKind::Native, "Lenape");
        let brave = world.add_unit(brave_faction, UnitKind::Brave, Location::Tile(Coord::new(5, 6)));
        assert!(!world.equip_unit(brave, UnitRole::Soldier, 1));
    }

    #[test]
    fn found_settlement_moves_the_founder_inside() {
        let (mut world, f) = coastal_world();
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(4, 4)));
        let id = world.found_settlement(u, "Newhaven").unwrap();
        assert_eq!(world.unit(u).unwrap().location, Location::Settlement(id));
        assert!(world.settlement(id).unwrap().is_colony());
        assert_eq!(world.settlement_at(Coord::new(4, 4)).unwrap().id, id);
    }

    #[test]
    fn found_settlement_refuses_braves_and_occupied_ground() {
        let (mut world, f) = coastal_world();
        world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(4, 4));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(4, 4)));
        assert!(world.found_settlement(u, "Twin").is_none());
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let brave = world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(6, 6)));
        assert!(world.found_settlement(brave, "No").is_none());
    }

    #[test]
    fn scout_parley_is_once_per_faction() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let camp = world.add_settlement(them, "Camp", SettlementKind::Camp, Coord::new(5, 5));
        let scout = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(4, 4)));
        assert!(!world.speak_to_chief(scout, camp), "needs the scout role");
        world.unit_mut(scout).unwrap().role = UnitRole::Scout;
        assert!(world.speak_to_chief(scout, camp));
        assert!(world.settlement(camp).unwrap().scouted_by(f));
        world.begin_turn();
        assert!(!world.speak_to_chief(scout, camp), "already received");
    }

    #[test]
    fn mission_consumes_the_missionary() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let camp = world.add_settlement(them, "Camp", SettlementKind::Camp, Coord::new(5, 5));
        let m = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(4, 4)));
        world.unit_mut(m).unwrap().role = UnitRole::Missionary;
        world.unit_mut(m).unwrap().role_count = 1;
        assert!(world.establish_mission(m, camp));
        assert_eq!(world.settlement(camp).unwrap().mission, Some(f));
        assert!(world.unit(m).unwrap().disposed);
    }

    #[test]
    fn attack_disposes_the_loser_or_repulses() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let soldier = world.add_unit(f, UnitKind::VeteranSoldier, Location::Tile(Coord::new(3, 3)));
        let brave = world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(4, 4)));
        assert_eq!(world.attack(soldier, brave), Some(AttackOutcome::Won));
        assert!(world.unit(brave).unwrap().disposed);
        assert_eq!(world.unit(soldier).unwrap().moves_left, 0);

        world.begin_turn();
        let second = world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(4, 4)));
        assert_eq!(world.attack(second, soldier), Some(AttackOutcome::Repulsed));
        assert!(!world.unit(soldier).unwrap().disposed);
        assert!(!world.unit(second).unwrap().disposed);
    }

    #[test]
    fn attack_refuses_cross_arm_and_distant_targets() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Colonial, "Rival");
        let privateer = world.add_unit(f, UnitKind::Privateer, Location::Tile(Coord::new(0, 4)));
        let soldier = world.add_unit(them, UnitKind::VeteranSoldier, Location::Tile(Coord::new(1, 4)));
        assert_eq!(world.attack(privateer, soldier), None, "ship cannot hit shore");
        let far_ship = world.add_unit(them, UnitKind::Caravel, Location::Tile(Coord::new(0, 7)));
        assert_eq!(world.attack(privateer, far_ship), None, "not adjacent");
    }

    #[test]
    fn sinking_a_carrier_takes_the_cargo_down() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Colonial, "Rival");
        let privateer = world.add_unit(f, UnitKind::Privateer, Location::Tile(Coord::new(0, 4)));
        let prize = world.add_unit(them, UnitKind::Caravel, Location::Tile(Coord::new(0, 5)));
        let passenger = world.add_unit(them, UnitKind::Colonist, Location::Aboard(prize));
        let lot = world.add_goods_lot(them, GoodsKind::Furs, 100, Location::Aboard(prize));
        assert_eq!(world.attack(privateer, prize), Some(AttackOutcome::Won));
        assert!(world.unit(prize).unwrap().disposed);
        assert!(world.unit(passenger).unwrap().disposed);
        assert!(world.goods_lot(lot).is_none());
    }

    #[test]
    fn treasure_cashes_in_at_a_colony() {
        let (mut world, f) = coastal_world();
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(3, 3));
        let train = world.add_unit(f, UnitKind::TreasureTrain, Location::Settlement(s));
        assert!(!world.cash_in_treasure(train), "empty train");
        world.unit_mut(train).unwrap().treasure = 800;
        assert!(world.cash_in_treasure(train));
        assert_eq!(world.faction(f).unwrap().gold, 800);
        assert!(world.unit(train).unwrap().disposed);
    }

    #[test]
    fn tribute_pays_what_the_treasury_covers() {
        let (mut world, f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let colony = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(3, 3));
        let brave = world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(4, 4)));
        assert_eq!(world.demand_tribute(brave, colony, 50), None, "empty treasury refuses");

        world.begin_turn();
        world.faction_mut(f).unwrap().gold = 30;
        assert_eq!(world.demand_tribute(brave, colony, 50), Some(30));
        assert_eq!(world.faction(f).unwrap().gold, 0);
        assert_eq!(world.faction(them).unwrap().gold, 30);
    }

    #[test]
    fn gift_collection_draws_down_camp_stock() {
        let (mut world, _f) = coastal_world();
        let them = world.add_faction(FactionKind::Native, "Lenape");
        let camp = world.add_settlement(them, "Camp", SettlementKind::Camp, Coord::new(5, 5));
        let brave = world.add_unit(them, UnitKind::Brave, Location::Tile(Coord::new(5, 6)));
        assert_eq!(world.collect_gift(brave, camp), Some(GoodsKind::Furs));
        assert_eq!(world.settlement(camp).unwrap().stock, 1);
    }

    #[test]
    fn sailing_round_trip_through_the_homeland() {
        let (mut world, f) = coastal_world();
        world.faction_mut(f).unwrap().entry = Some(Coord::new(0, 0));
        let ship = world.add_unit(f, UnitKind::Caravel, Location::Tile(Coord::new(0, 3)));
        assert!(world.is_border(Coord::new(0, 3)));
        assert!(world.sail_for_homeland(ship));
        assert!(world.unit(ship).unwrap().location.is_homeland());

        world.begin_turn();
        assert!(world.sail_from_homeland(ship));
        assert_eq!(
            world.unit(ship).unwrap().location,
            Location::Tile(Coord::new(0, 0))
        );
    }

    #[test]
    fn homeland_embark_needs_no_moves() {
        let (mut world, f) = coastal_world();
        let ship = world.add_unit(f, UnitKind::Galleon, Location::Homeland);
        let u = world.add_unit(f, UnitKind::Colonist, Location::Homeland);
        world.unit_mut(u).unwrap().moves_left = 0;
        assert!(world.embark(u, ship));
        assert!(world.disembark_homeland(u));
        assert!(world.unit(u).unwrap().location.is_homeland());
    }

    #[test]
    fn improvement_work_finishes_and_spends_tools() {
        let (mut world, f) = coastal_world();
        let u = world.add_unit(f, UnitKind::Colonist, Location::Tile(Coord::new(4, 4)));
        world.faction_mut(f).unwrap().gold = 40;
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(4, 5));
        // Equip at the colony next door, then walk out and plow.
        world.unit_mut(u).unwrap().location = Location::Settlement(s);
        assert!(world.equip_unit(u, UnitRole::Pioneer, 2));
        world.unit_mut(u).unwrap().location = Location::Tile(Coord::new(4, 4));

        assert_eq!(
            world.improvement_work(u, ImprovementKind::Plow),
            Some(WorkOutcome::Progressed)
        );
        world.begin_turn();
        assert_eq!(
            world.improvement_work(u, ImprovementKind::Plow),
            Some(WorkOutcome::Finished)
        );
        let tile = world.tile(Coord::new(4, 4)).unwrap();
        assert!(tile.has_improvement(ImprovementKind::Plow));
        assert_eq!(tile.work, None);
        assert_eq!(world.unit(u).unwrap().role_count, 1);

        world.begin_turn();
        assert_eq!(
            world.improvement_work(u, ImprovementKind::Plow),
            None,
            "already present"
        );
    }

    #[test]
    fn clearing_forest_transforms_the_tile() {
        let (mut world, f) = coastal_world();
        world.set_terrain(Coord::new(4, 4), Terrain::Forest);
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(4, 5));
        world.faction_mut(f).unwrap().gold = 100;
        let u = world.add_unit(f, UnitKind::Colonist, Location::Settlement(s));
        assert!(world.equip_unit(u, UnitRole::Pioneer, 1));
        world.unit_mut(u).unwrap().location = Location::Tile(Coord::new(4, 4));

        for _ in 0..2 {
            assert_eq!(
                world.improvement_work(u, ImprovementKind::ClearForest),
                Some(WorkOutcome::Progressed)
            );
            world.begin_turn();
        }
        assert_eq!(
            world.improvement_work(u, ImprovementKind::ClearForest),
            Some(WorkOutcome::Finished)
        );
        assert_eq!(world.tile(Coord::new(4, 4)).unwrap().terrain, Terrain::Plains);
        let unit = world.unit(u).unwrap();
        assert_eq!(unit.role, UnitRole::Default, "tools spent");
    }

    #[test]
    fn remove_settlement_evicts_occupants() {
        let (mut world, f) = coastal_world();
        let s = world.add_settlement(f, "Fairport", SettlementKind::Colony, Coord::new(3, 3));
        let u = world.add_unit(f, UnitKind::Colonist, Location::Settlement(s));
        let lot = world.add_goods_lot(f, GoodsKind::Food, 10, Location::Settlement(s));
        world.remove_settlement(s);
        assert!(world.settlement(s).is_none());
        assert_eq!(world.unit(u).unwrap().location, Location::Tile(Coord::new(3, 3)));
        assert_eq!(
            world.goods_lot(lot).unwrap().location,
            Location::Tile(Coord::new(3, 3))
        );
    }
}
