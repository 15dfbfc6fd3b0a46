use serde::{Deserialize, Serialize};

/// Proof of purchase handed out by [`crate::paystation::PayStation::buy`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Receipt {
    minutes: u32,
}

impl Receipt {
    pub const fn new(minutes: u32) -> Self {
        Self { minutes }
    }

    /// Parking time bought, in minutes.
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }
}
