use serde::{Deserialize, Serialize};

use super::force::Force;
use super::location::Coord;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactionKind {
    Colonial,
    Native,
}

/// A player-level actor. Colonial factions hold gold, an off-map homeland
/// they can ship to, and a staged expeditionary force; native factions hold
/// camps and tribute proceeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub id: u64,
    pub kind: FactionKind,
    pub name: String,
    pub gold: u32,
    /// Border ocean tile where ships arriving from the homeland enter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Coord>,
    /// Reinforcement force being mustered in the homeland.
    #[serde(default, skip_serializing_if = "Force::is_empty")]
    pub expedition: Force,
}

impl Faction {
    pub fn new(id: u64, kind: FactionKind, name: String) -> Self {
        Self {
            id,
            kind,
            name,
            gold: 0,
            entry: None,
            expedition: Force::default(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.kind == FactionKind::Native
    }

    pub fn can_afford(&self, price: u32) -> bool {
        self.gold >= price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn affordability() {
        let mut f = Faction::new(1, FactionKind::Colonial, "Crown".to_string());
        assert!(f.can_afford(0));
        assert!(!f.can_afford(1));
        f.gold = 100;
        assert!(f.can_afford(100));
        assert!(!f.can_afford(101));
    }

    #[test]
    fn empty_expedition_is_not_serialized() {
        let f = Faction::new(1, FactionKind::Native, "Lenape".to_string());
        let value = serde_json::to_value(&f).unwrap();
        assert!(value.get("expedition").is_none());
        assert!(value.get("entry").is_none());
    }
}
