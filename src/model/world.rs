use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::faction::{Faction, FactionKind};
use super::force::{Force, UnitCohort};
use super::goods::GoodsLot;
use super::location::{Coord, Location};
use super::rules::{GoodsKind, Terrain, UnitKind};
use super::settlement::{Settlement, SettlementKind, Wish};
use super::tile::Tile;
use super::unit::Unit;
use crate::id::IdGenerator;

/// Complete game state the planner reads and commands.
///
/// All registries are `BTreeMap` keyed by IDs from one shared generator:
/// iteration order is stable, so any planning pass over the world is
/// deterministic, and a bare `u64` reference can be resolved without knowing
/// what it points at.
#[derive(Debug)]
pub struct World {
    pub width: i32,
    pub height: i32,
    pub tiles: BTreeMap<Coord, Tile>,
    pub factions: BTreeMap<u64, Faction>,
    pub settlements: BTreeMap<u64, Settlement>,
    pub units: BTreeMap<u64, Unit>,
    pub goods: BTreeMap<u64, GoodsLot>,
    pub id_gen: IdGenerator,
    pub turn: u32,
}

impl World {
    /// A `width` x `height` map of open ocean. Terrain is painted afterwards.
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "world: degenerate map size");
        let mut tiles = BTreeMap::new();
        for x in 0..width {
            for y in 0..height {
                tiles.insert(Coord::new(x, y), Tile::new(Terrain::Ocean));
            }
        }
        Self {
            width,
            height,
            tiles,
            factions: BTreeMap::new(),
            settlements: BTreeMap::new(),
            units: BTreeMap::new(),
            goods: BTreeMap::new(),
            id_gen: IdGenerator::new(),
            turn: 0,
        }
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    /// Map-edge tiles, where ships can catch the winds for the homeland.
    pub fn is_border(&self, c: Coord) -> bool {
        self.in_bounds(c)
            && (c.x == 0 || c.y == 0 || c.x == self.width - 1 || c.y == self.height - 1)
    }

    pub fn tile(&self, c: Coord) -> Option<&Tile> {
        self.tiles.get(&c)
    }

    pub fn tile_mut(&mut self, c: Coord) -> Option<&mut Tile> {
        self.tiles.get_mut(&c)
    }

    /// # Panics
    /// Panics if `c` is off-map.
    pub fn set_terrain(&mut self, c: Coord, terrain: Terrain) {
        let tile = self
            .tiles
            .get_mut(&c)
            .unwrap_or_else(|| panic!("set_terrain: coord {c} off-map"));
        tile.terrain = terrain;
    }

    pub fn add_faction(&mut self, kind: FactionKind, name: impl Into<String>) -> u64 {
        let id = self.id_gen.next_id();
        self.factions.insert(id, Faction::new(id, kind, name.into()));
        id
    }

    /// # Panics
    /// Panics if the faction is unknown, the tile is off-map or not
    /// settleable, or another settlement already stands there.
    pub fn add_settlement(
        &mut self,
        faction: u64,
        name: impl Into<String>,
        kind: SettlementKind,
        coord: Coord,
    ) -> u64 {
        assert!(
            self.factions.contains_key(&faction),
            "add_settlement: faction {faction} not found"
        );
        let tile = self
            .tiles
            .get(&coord)
            .unwrap_or_else(|| panic!("add_settlement: coord {coord} off-map"));
        assert!(
            tile.terrain.is_settleable(),
            "add_settlement: {coord} is not settleable"
        );
        assert!(
            self.settlement_at(coord).is_none(),
            "add_settlement: {coord} already settled"
        );
        let id = self.id_gen.next_id();
        self.settlements
            .insert(id, Settlement::new(id, faction, name.into(), kind, coord));
        id
    }

    /// # Panics
    /// Panics if the faction or a referenced container is unknown.
    pub fn add_unit(&mut self, faction: u64, kind: UnitKind, location: Location) -> u64 {
        assert!(
            self.factions.contains_key(&faction),
            "add_unit: faction {faction} not found"
        );
        match location {
            Location::Tile(c) => {
                assert!(self.in_bounds(c), "add_unit: coord {c} off-map");
            }
            Location::Settlement(s) => {
                assert!(
                    self.settlements.contains_key(&s),
                    "add_unit: settlement {s} not found"
                );
            }
            Location::Aboard(carrier) => {
                let c = self
                    .units
                    .get(&carrier)
                    .unwrap_or_else(|| panic!("add_unit: carrier {carrier} not found"));
                assert!(c.is_carrier(), "add_unit: unit {carrier} is not a carrier");
            }
            Location::Homeland => {}
        }
        let id = self.id_gen.next_id();
        self.units.insert(id, Unit::new(id, faction, kind, location));
        id
    }

    pub fn add_goods_lot(
        &mut self,
        faction: u64,
        goods: GoodsKind,
        amount: u32,
        location: Location,
    ) -> u64 {
        assert!(
            self.factions.contains_key(&faction),
            "add_goods_lot: faction {faction} not found"
        );
        let id = self.id_gen.next_id();
        self.goods
            .insert(id, GoodsLot::new(id, faction, goods, amount, location));
        id
    }

    /// # Panics
    /// Panics if the settlement is unknown.
    pub fn add_wish(&mut self, settlement: u64, kind: UnitKind, value: i32) -> u64 {
        let id = self.id_gen.next_id();
        let s = self
            .settlements
            .get_mut(&settlement)
            .unwrap_or_else(|| panic!("add_wish: settlement {settlement} not found"));
        s.wishes.push(Wish { id, kind, value });
        id
    }

    pub fn faction(&self, id: u64) -> Option<&Faction> {
        self.factions.get(&id)
    }

    pub fn faction_mut(&mut self, id: u64) -> Option<&mut Faction> {
        self.factions.get_mut(&id)
    }

    pub fn settlement(&self, id: u64) -> Option<&Settlement> {
        self.settlements.get(&id)
    }

    pub fn settlement_mut(&mut self, id: u64) -> Option<&mut Settlement> {
        self.settlements.get_mut(&id)
    }

    /// Raw lookup; includes disposed units.
    pub fn unit(&self, id: u64) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: u64) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Lookup that treats disposed units as gone. Planning code wants this
    /// one; a dead reference and a missing one mean the same thing.
    pub fn live_unit(&self, id: u64) -> Option<&Unit> {
        self.units.get(&id).filter(|u| !u.disposed)
    }

    pub fn goods_lot(&self, id: u64) -> Option<&GoodsLot> {
        self.goods.get(&id)
    }

    pub fn goods_lot_mut(&mut self, id: u64) -> Option<&mut GoodsLot> {
        self.goods.get_mut(&id)
    }

    pub fn settlement_at(&self, coord: Coord) -> Option<&Settlement> {
        self.settlements.values().find(|s| s.coord == coord)
    }

    /// The tile a location resolves to; `None` for the homeland.
    pub fn tile_of(&self, location: Location) -> Option<Coord> {
        match location {
            Location::Tile(c) => Some(c),
            Location::Settlement(id) => self.settlements.get(&id).map(|s| s.coord),
            Location::Aboard(carrier) => {
                let u = self.units.get(&carrier)?;
                match u.location {
                    Location::Tile(c) => Some(c),
                    Location::Settlement(id) => self.settlements.get(&id).map(|s| s.coord),
                    _ => None,
                }
            }
            Location::Homeland => None,
        }
    }

    pub fn unit_tile(&self, id: u64) -> Option<Coord> {
        let unit = self.units.get(&id)?;
        self.tile_of(unit.location)
    }

    /// Promote a coordinate to the settlement standing on it, when present.
    pub fn canonical_location(&self, coord: Coord) -> Location {
        match self.settlement_at(coord) {
            Some(s) => Location::Settlement(s.id),
            None => Location::Tile(coord),
        }
    }

    /// Live units standing on a tile or inside the settlement there.
    /// Units riding a carrier on the tile are not included.
    pub fn units_on_tile(&self, coord: Coord) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| {
            !u.disposed && !u.location.is_aboard() && self.tile_of(u.location) == Some(coord)
        })
    }

    pub fn units_aboard(&self, carrier: u64) -> impl Iterator<Item = &Unit> {
        self.units
            .values()
            .filter(move |u| !u.disposed && u.location == Location::Aboard(carrier))
    }

    pub fn goods_aboard(&self, carrier: u64) -> impl Iterator<Item = &GoodsLot> {
        self.goods
            .values()
            .filter(move |g| g.location == Location::Aboard(carrier))
    }

    /// Unclaimed holds on a carrier. Goods parcels take one hold each.
    pub fn free_capacity(&self, carrier: u64) -> u32 {
        let Some(unit) = self.live_unit(carrier) else {
            return 0;
        };
        let used: u32 = self
            .units_aboard(carrier)
            .map(|u| u.kind.space_taken())
            .sum::<u32>()
            + self.goods_aboard(carrier).count() as u32;
        unit.kind.capacity().saturating_sub(used)
    }

    pub fn has_enemy_on(&self, faction: u64, coord: Coord) -> bool {
        if let Some(s) = self.settlement_at(coord) {
            if s.faction != faction {
                return true;
            }
        }
        self.units_on_tile(coord).any(|u| u.faction != faction)
    }

    /// Units of all other factions within `radius`, weighed as a force.
    /// Drives the danger penalty in task scoring and the garrison deficit
    /// boost for threatened settlements.
    pub fn enemy_strength_near(&self, faction: u64, center: Coord, radius: u32) -> u32 {
        let mut force = Force::new();
        for unit in self.units.values() {
            if unit.disposed || unit.faction == faction || unit.location.is_aboard() {
                continue;
            }
            let Some(tile) = self.tile_of(unit.location) else {
                continue;
            };
            if tile.distance(center) <= radius {
                force.add(UnitCohort::new(unit.kind, unit.role, 1));
            }
        }
        force.strength(false) + force.strength(true)
    }

    /// Nearest own settlement by straight-line distance; ties go to the
    /// lowest ID. Optional filter for colonies only.
    pub fn nearest_settlement_of(
        &self,
        faction: u64,
        from: Coord,
        colonies_only: bool,
    ) -> Option<u64> {
        let mut best: Option<(u32, u64)> = None;
        for s in self.settlements.values() {
            if s.faction != faction || (colonies_only && !s.is_colony()) {
                continue;
            }
            let d = s.coord.distance(from);
            if best.map(|(bd, _)| d < bd).unwrap_or(true) {
                best = Some((d, s.id));
            }
        }
        best.map(|(_, id)| id)
    }

    pub(crate) fn passable(&self, naval: bool, faction: u64, c: Coord) -> bool {
        let Some(tile) = self.tile(c) else {
            return false;
        };
        if naval {
            return tile.terrain.is_water();
        }
        if tile.terrain.is_water() {
            return false;
        }
        // Foreign settlements are closed ground; business with them is done
        // from an adjacent tile.
        match self.settlement_at(c) {
            Some(s) => s.faction == faction,
            None => true,
        }
    }

    /// Breadth-first route from `from` to `to`. Returns the first step and
    /// the total step count; the first step is `None` when `from` already
    /// satisfies the goal. With `adjacent_ok`, stopping next to `to` counts
    /// as arrival (carriers hugging the coast, attackers closing in).
    pub fn route(
        &self,
        from: Coord,
        to: Coord,
        naval: bool,
        faction: u64,
        adjacent_ok: bool,
    ) -> Option<(Option<Coord>, u32)> {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return None;
        }
        let arrived = |c: Coord| c == to || (adjacent_ok && c.is_adjacent(to));
        if arrived(from) {
            return Some((None, 0));
        }
        let mut visited: BTreeSet<Coord> = BTreeSet::new();
        let mut parents: BTreeMap<Coord, Coord> = BTreeMap::new();
        let mut queue: VecDeque<Coord> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            for next in current.neighbors() {
                if visited.contains(&next) || !self.passable(naval, faction, next) {
                    continue;
                }
                visited.insert(next);
                parents.insert(next, current);
                if arrived(next) {
                    // Walk back to find the first step.
                    let mut step = next;
                    let mut count = 1;
                    while parents[&step] != from {
                        step = parents[&step];
                        count += 1;
                    }
                    return Some((Some(step), count));
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// Next tile toward `to` for a unit, or `None` when there is no route.
    pub fn next_step(&self, unit: u64, to: Coord, adjacent_ok: bool) -> Option<Coord> {
        let u = self.live_unit(unit)?;
        let from = self.tile_of(u.location)?;
        let (step, _) = self.route(from, to, u.kind.is_naval(), u.faction, adjacent_ok)?;
        step
    }

    /// Estimated turns for a unit to reach a destination. Units riding a
    /// carrier are estimated with the carrier's legs. A land unit separated
    /// from its goal by water gets `None`: that is what transport demand is
    /// made of.
    pub fn turns_to_reach(&self, unit: u64, dest: Location) -> Option<u32> {
        let u = self.live_unit(unit)?;
        let (from, naval, movement) = match u.location {
            Location::Aboard(carrier) => {
                let c = self.live_unit(carrier)?;
                (self.tile_of(c.location)?, true, c.movement().max(1))
            }
            Location::Homeland => {
                return match dest {
                    Location::Homeland => Some(0),
                    // One crossing plus the leg from the entry tile.
                    _ => {
                        if !u.kind.is_naval() {
                            return None;
                        }
                        let entry = self.faction(u.faction)?.entry?;
                        let to = self.tile_of(dest)?;
                        let (_, steps) = self.route(entry, to, true, u.faction, true)?;
                        Some(1 + steps.div_ceil(u.movement().max(1)))
                    }
                };
            }
            other => (self.tile_of(other)?, u.kind.is_naval(), u.movement().max(1)),
        };
        match dest {
            Location::Homeland => {
                if !naval {
                    return None;
                }
                let to_border = (0..self.width)
                    .flat_map(|x| [Coord::new(x, 0), Coord::new(x, self.height - 1)])
                    .chain((0..self.height).flat_map(|y| {
                        [Coord::new(0, y), Coord::new(self.width - 1, y)]
                    }))
                    .filter(|c| self.passable(true, u.faction, *c))
                    .filter_map(|c| self.route(from, c, true, u.faction, false))
                    .map(|(_, steps)| steps)
                    .min()?;
                Some(1 + to_border.div_ceil(movement))
            }
            other => {
                let to = self.tile_of(other)?;
                let (_, steps) = self.route(from, to, naval, u.faction, naval)?;
                Some(steps.div_ceil(movement))
            }
        }
    }

    /// Start-of-turn upkeep: advance the counter and refresh movement.
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        for unit in self.units.values_mut() {
            if !unit.disposed {
                unit.reset_moves();
            }
        }
    }
}
