use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::event::Event;
use crate::store::StoreEvent;
use crate::types::SequenceNumber;

/// Event representation inside of the in-memory event log.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone)]
pub(super) struct StoredEvent {
    pub id: Uuid,
    pub aggregate_id: Uuid,
    pub payload: Value,
    pub occurred_on: DateTime<Utc>,
    pub sequence_number: SequenceNumber,
}

impl StoredEvent {
    pub fn try_into_store_event<E: Event>(&self) -> Result<StoreEvent<E>, serde_json::Error> {
        Ok(StoreEvent {
            id: self.id,
            aggregate_id: self.aggregate_id,
            payload: serde_json::from_value::<E>(self.payload.clone())?,
            occurred_on: self.occurred_on,
            sequence_number: self.sequence_number,
        })
    }
}
