use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::paystation::PayStationError;

/// The coins a pay station accepts.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coin {
    Nickel,
    Dime,
    Quarter,
}

impl Coin {
    pub const ALL: [Coin; 3] = [Coin::Nickel, Coin::Dime, Coin::Quarter];

    /// Value of the coin in cents.
    pub const fn cents(self) -> u32 {
        match self {
            Coin::Nickel => 5,
            Coin::Dime => 10,
            Coin::Quarter => 25,
        }
    }
}

impl TryFrom<u32> for Coin {
    type Error = PayStationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            5 => Ok(Coin::Nickel),
            10 => Ok(Coin::Dime),
            25 => Ok(Coin::Quarter),
            other => Err(PayStationError::InvalidCoin(other)),
        }
    }
}

impl Display for Coin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}c", self.cents())
    }
}
