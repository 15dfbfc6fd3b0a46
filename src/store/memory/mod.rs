use uuid::Uuid;

pub use builder::*;
pub use event_store::*;

use crate::types::SequenceNumber;

mod builder;
mod event;
mod event_store;
mod lock;

#[derive(thiserror::Error, Debug)]
pub enum InMemoryStoreError {
    /// Serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Another writer persisted events for the same aggregate after the given state was loaded.
    #[error("sequence conflict on aggregate {aggregate_id}: state is at {expected}, store is at {found}")]
    SequenceConflict {
        aggregate_id: Uuid,
        expected: SequenceNumber,
        found: SequenceNumber,
    },
    /// A thread panicked while holding one of the store locks.
    #[error("in-memory store lock poisoned")]
    Poisoned,
}
