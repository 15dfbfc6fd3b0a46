use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::paystation::Coin;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum PayStationEvent {
    CoinInserted { coin: Coin },
    ParkingBought { minutes: u32, amount: u32 },
    /// `refund` maps coin value in cents to the number of coins returned.
    SessionCancelled { refund: BTreeMap<u32, u32> },
    TillEmptied { amount: u32 },
}
