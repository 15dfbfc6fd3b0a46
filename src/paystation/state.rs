use std::collections::BTreeMap;

use crate::paystation::Coin;

const CENTS_PER_STEP: u32 = 5;
const MINUTES_PER_STEP: u32 = 2;

/// Parking minutes bought with the given amount of cents: 2 minutes every 5 cents, rounding down.
pub const fn minutes_for(cents: u32) -> u32 {
    cents / CENTS_PER_STEP * MINUTES_PER_STEP
}

/// State of a pay station: the running session plus the till.
///
/// `time_bought` is always `minutes_for(inserted_so_far)`, and `coins` always adds up to
/// `inserted_so_far`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayStationState {
    inserted_so_far: u32,
    time_bought: u32,
    total_bought: u32,
    coins: BTreeMap<Coin, u32>,
}

impl PayStationState {
    /// Cents inserted in the current session.
    pub const fn inserted_so_far(&self) -> u32 {
        self.inserted_so_far
    }

    /// Minutes bought so far in the current session.
    pub const fn time_bought(&self) -> u32 {
        self.time_bought
    }

    /// Cents collected by purchases since the till was last emptied.
    pub const fn total_bought(&self) -> u32 {
        self.total_bought
    }

    /// Coins inserted in the current session.
    pub const fn coins(&self) -> &BTreeMap<Coin, u32> {
        &self.coins
    }

    /// Coins to give back if the session is cancelled, keyed by value in cents.
    pub fn refund(&self) -> BTreeMap<u32, u32> {
        self.coins
            .iter()
            .map(|(coin, count)| (coin.cents(), *count))
            .collect()
    }

    pub(crate) fn insert(mut self, coin: Coin) -> Self {
        self.inserted_so_far = self.inserted_so_far.saturating_add(coin.cents());
        self.time_bought = minutes_for(self.inserted_so_far);
        *self.coins.entry(coin).or_insert(0) += 1;
        self
    }

    pub(crate) fn credit(mut self, amount: u32) -> Self {
        self.total_bought = self.total_bought.saturating_add(amount);
        self
    }

    pub(crate) fn reset_session(self) -> Self {
        Self {
            total_bought: self.total_bought,
            ..Self::default()
        }
    }

    pub(crate) fn drain(self) -> Self {
        Self::default()
    }
}
