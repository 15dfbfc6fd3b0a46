//! The parking pay station aggregate.
//!
//! Coins of 5, 10 and 25 cents are accepted; every 5 cents buy 2 minutes of parking. A session
//! ends either with a purchase, crediting the till and issuing a [`Receipt`], or with a
//! cancellation, refunding the exact coins inserted. The till is drained by emptying the station.

pub use aggregate::PayStationAggregate;
pub use coin::Coin;
pub use command::PayStationCommand;
pub use config::PayStationConfig;
pub use error::PayStationError;
pub use event::PayStationEvent;
pub use receipt::Receipt;
pub use report::{SalesReport, SalesSummary};
pub use state::{minutes_for, PayStationState};
pub use station::PayStation;

mod aggregate;
mod coin;
mod command;
mod config;
mod error;
mod event;
mod receipt;
mod report;
mod state;
mod station;
