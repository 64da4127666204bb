use serde::{Deserialize, Serialize};

use super::location::Location;
use super::rules::GoodsKind;

/// A parcel of goods sitting somewhere in the world. Parcels occupy one
/// carrier hold each regardless of amount and can be earmarked for delivery
/// to a settlement, which makes them transport demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsLot {
    pub id: u64,
    pub faction: u64,
    pub goods: GoodsKind,
    pub amount: u32,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<u64>,
}

impl GoodsLot {
    pub fn new(id: u64, faction: u64, goods: GoodsKind, amount: u32, location: Location) -> Self {
        Self {
            id,
            faction,
            goods,
            amount,
            location,
            destination: None,
        }
    }
}
