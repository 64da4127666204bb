use serde::{Deserialize, Serialize};

use super::location::Coord;
use super::rules::UnitKind;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKind {
    Colony,
    Camp,
}

/// A standing request for a unit of a given kind to come work or garrison
/// here. Wishes are proposed by the settlement's owner and consumed by the
/// planner when a matching unit takes them on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wish {
    pub id: u64,
    pub kind: UnitKind,
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: u64,
    pub faction: u64,
    pub name: String,
    pub kind: SettlementKind,
    pub coord: Coord,
    /// Garrison size the owner wants kept here.
    pub defenders_wanted: u32,
    /// Working population the owner wants inside.
    pub workers_wanted: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub wishes: Vec<Wish>,
    /// Faction that planted a mission in this camp, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mission: Option<u64>,
    /// Factions whose scouts have spoken with the chief.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scouted_by: Vec<u64>,
    /// Tradeable goods parcels a camp can spare as gifts.
    #[serde(default)]
    pub stock: u32,
}

impl Settlement {
    pub fn new(id: u64, faction: u64, name: String, kind: SettlementKind, coord: Coord) -> Self {
        let (defenders_wanted, workers_wanted, stock) = match kind {
            SettlementKind::Colony => (2, 3, 0),
            SettlementKind::Camp => (1, 0, 2),
        };
        Self {
            id,
            faction,
            name,
            kind,
            coord,
            defenders_wanted,
            workers_wanted,
            wishes: Vec::new(),
            mission: None,
            scouted_by: Vec::new(),
            stock,
        }
    }

    pub fn is_colony(&self) -> bool {
        self.kind == SettlementKind::Colony
    }

    pub fn is_camp(&self) -> bool {
        self.kind == SettlementKind::Camp
    }

    pub fn scouted_by(&self, faction: u64) -> bool {
        self.scouted_by.contains(&faction)
    }

    pub fn wish(&self, wish_id: u64) -> Option<&Wish> {
        self.wishes.iter().find(|w| w.id == wish_id)
    }

    /// Remove and return a wish once a unit has fulfilled it.
    pub fn take_wish(&mut self, wish_id: u64) -> Option<Wish> {
        let idx = self.wishes.iter().position(|w| w.id == wish_id)?;
        Some(self.wishes.remove(idx))
    }
}
