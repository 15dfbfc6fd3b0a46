//! An event-sourced parking pay station.
//!
//! The station is an [`Aggregate`]: commands (insert a coin, buy, cancel, empty the till) are
//! validated against the current state and turned into events, which are persisted in an
//! [`EventStore`] and folded back into the state. [`paystation::PayStation`] wraps the whole
//! flow behind a small imperative API.
//!
//! ```
//! use paystation::paystation::PayStation;
//! use paystation::store::memory::InMemoryStore;
//!
//! let mut station = PayStation::new(InMemoryStore::default());
//! station.add_payment(25).unwrap();
//! station.add_payment(25).unwrap();
//! assert_eq!(station.read_display(), 20);
//!
//! let receipt = station.buy().unwrap();
//! assert_eq!(receipt.minutes(), 20);
//! assert_eq!(station.empty().unwrap(), 50);
//! ```

pub use crate::aggregate::Aggregate;
pub use crate::handler::EventHandler;
pub use crate::manager::AggregateManager;
pub use crate::state::AggregateState;
pub use crate::store::{EventStore, StoreEvent};

mod aggregate;
mod state;

pub mod event;
pub mod handler;
pub mod manager;
pub mod paystation;
pub mod store;

pub mod types {
    pub type SequenceNumber = i32;
}

pub mod error {
    pub use crate::paystation::PayStationError;
    pub use crate::store::memory::InMemoryStoreError;
}
