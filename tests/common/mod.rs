//! Shared fixture: one colonial power and one native tribe facing each
//! other across a small island.

#![allow(dead_code)]

use frontier_ai::model::UnitKind;
use frontier_ai::scenario::Scenario;
use frontier_ai::{Coord, Location, World};

pub struct Frontier {
    pub world: World,
    pub crown: u64,
    pub colony: u64,
    pub tribe: u64,
    pub camp: u64,
    pub brave: u64,
}

/// A 10x10 island. The Crown holds a landing in the south-west, the
/// Riverfolk keep a camp in the north-east, and four tiles of open plains
/// lie between them.
pub fn open_frontier() -> Frontier {
    let mut s = Scenario::island(10, 10);
    let crown = s.settled_power("Crown", Coord::new(0, 5), Coord::new(3, 3));
    let riverfolk = s.tribe("Riverfolk", Coord::new(7, 7));
    Frontier {
        world: s.finish(),
        crown: crown.faction,
        colony: crown.colony,
        tribe: riverfolk.faction,
        camp: riverfolk.camp,
        brave: riverfolk.brave,
    }
}

impl Frontier {
    /// A fresh colonist standing inside the landing.
    pub fn colonist(&mut self) -> u64 {
        self.world
            .add_unit(self.crown, UnitKind::Colonist, Location::Settlement(self.colony))
    }

    /// A second brave raised at the camp, sharing the fixture brave's home.
    pub fn second_brave(&mut self) -> u64 {
        let id = self
            .world
            .add_unit(self.tribe, UnitKind::Brave, Location::Settlement(self.camp));
        if let Some(u) = self.world.unit_mut(id) {
            u.home = Some(self.camp);
        }
        id
    }
}
