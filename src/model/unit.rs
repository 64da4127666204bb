use serde::{Deserialize, Serialize};

use super::location::Location;
use super::rules::{UnitKind, UnitRole};

/// A mobile world object. Units are never removed from the registry during a
/// turn; disposal is a flag so that stale references held elsewhere resolve
/// to "gone" instead of dangling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: u64,
    pub faction: u64,
    pub kind: UnitKind,
    pub role: UnitRole,
    /// Equipment count for the current role (tool bundles for pioneers).
    pub role_count: u32,
    pub location: Location,
    pub moves_left: u32,
    /// Gold value hauled by a treasure train; zero for everything else.
    pub treasure: u32,
    /// Home settlement for natives raised in a camp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<u64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disposed: bool,
}

impl Unit {
    pub fn new(id: u64, faction: u64, kind: UnitKind, location: Location) -> Self {
        Self {
            id,
            faction,
            kind,
            role: UnitRole::Default,
            role_count: 0,
            location,
            moves_left: kind.movement(),
            treasure: 0,
            home: None,
            disposed: false,
        }
    }

    pub fn movement(&self) -> u32 {
        self.kind.movement() + self.role.movement_bonus()
    }

    pub fn offence(&self) -> u32 {
        self.kind.offence() + self.role.offence_bonus()
    }

    pub fn defence(&self) -> u32 {
        self.kind.defence() + self.role.defence_bonus()
    }

    pub fn is_carrier(&self) -> bool {
        self.kind.is_naval() && self.kind.capacity() > 0
    }

    pub fn has_default_role(&self) -> bool {
        self.role == UnitRole::Default
    }

    pub fn reset_moves(&mut self) {
        self.moves_left = self.movement();
    }
}
