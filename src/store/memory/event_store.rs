use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::handler::EventHandler;
use crate::store::memory::event::StoredEvent;
use crate::store::memory::lock::AggregateLocks;
use crate::store::memory::{InMemoryStoreBuilder, InMemoryStoreError};
use crate::store::{EventStore, EventStoreLockGuard, StoreEvent};
use crate::types::SequenceNumber;
use crate::{Aggregate, AggregateState};

/// Default in-memory implementation for the [`EventStore`]. Events are kept as JSON values, one log
/// per aggregate id, for as long as the store lives.
///
/// The store is protected by an [`Arc`] that allows it to be cloneable still having the same memory
/// reference: every clone sees the same events, locks and event handlers.
pub struct InMemoryStore<A>
where
    A: Aggregate,
{
    pub(super) inner: Arc<InnerInMemoryStore<A>>,
}

pub(super) struct InnerInMemoryStore<A>
where
    A: Aggregate,
{
    pub(super) events: RwLock<HashMap<Uuid, Vec<StoredEvent>>>,
    pub(super) locks: Arc<AggregateLocks>,
    pub(super) event_handlers: RwLock<Vec<Box<dyn EventHandler<A>>>>,
}

impl<A> InMemoryStore<A>
where
    A: Aggregate,
{
    /// Returns a builder for a new, empty, [`InMemoryStore`].
    pub fn builder() -> InMemoryStoreBuilder<A> {
        InMemoryStoreBuilder::new()
    }

    /// Safely add an event handler to an already built [`InMemoryStore`].
    ///
    /// # Errors
    ///
    /// Will return an `Err` if the event handlers lock has been poisoned.
    pub fn add_event_handler(&self, event_handler: impl EventHandler<A> + 'static) -> Result<(), InMemoryStoreError> {
        let mut guard = self
            .inner
            .event_handlers
            .write()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        guard.push(Box::new(event_handler));
        Ok(())
    }

    /// Returns the number of events stored for the given aggregate.
    ///
    /// # Errors
    ///
    /// Will return an `Err` if the event log lock has been poisoned.
    pub fn count_events(&self, aggregate_id: Uuid) -> Result<usize, InMemoryStoreError> {
        let log = self.inner.events.read().map_err(|_| InMemoryStoreError::Poisoned)?;
        Ok(log.get(&aggregate_id).map_or(0, Vec::len))
    }

    fn run_event_handlers(&self, store_events: &[StoreEvent<A::Event>]) {
        let event_handlers = match self.inner.event_handlers.read() {
            Ok(event_handlers) => event_handlers,
            Err(_) => {
                tracing::error!(aggregate = A::NAME, "event handlers lock poisoned, skipping event handlers");
                return;
            }
        };

        for store_event in store_events {
            for event_handler in event_handlers.iter() {
                let span = tracing::debug_span!(
                    "paystation.event_handler",
                    event_id = %store_event.id,
                    aggregate_id = %store_event.aggregate_id,
                    event_handler = event_handler.name()
                );
                let _e = span.enter();

                event_handler.handle(store_event);
            }
        }
    }
}

impl<A> EventStore for InMemoryStore<A>
where
    A: Aggregate,
{
    type Aggregate = A;
    type Error = InMemoryStoreError;

    fn lock(&self, aggregate_id: Uuid) -> Result<EventStoreLockGuard, Self::Error> {
        AggregateLocks::acquire(&self.inner.locks, aggregate_id)
    }

    fn by_aggregate_id(&self, aggregate_id: Uuid) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        let log = self.inner.events.read().map_err(|_| InMemoryStoreError::Poisoned)?;

        Ok(log
            .get(&aggregate_id)
            .map(|events| {
                events
                    .iter()
                    .map(StoredEvent::try_into_store_event)
                    .collect::<Result<Vec<StoreEvent<A::Event>>, serde_json::Error>>()
            })
            .transpose()?
            .unwrap_or_default())
    }

    #[tracing::instrument(skip_all, fields(aggregate = A::NAME, aggregate_id = %aggregate_state.id()), err)]
    fn persist(
        &self,
        aggregate_state: &mut AggregateState<A::State>,
        events: Vec<A::Event>,
    ) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        if events.is_empty() {
            return Ok(vec![]);
        }

        let aggregate_id: Uuid = *aggregate_state.id();
        let occurred_on: DateTime<Utc> = Utc::now();

        // Serialize everything upfront so that a failure leaves both the log and the state untouched.
        let payloads: Vec<Value> = events
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<Value>, serde_json::Error>>()?;

        let mut store_events: Vec<StoreEvent<A::Event>> = Vec::with_capacity(events.len());

        {
            let mut log = self.inner.events.write().map_err(|_| InMemoryStoreError::Poisoned)?;
            let found: SequenceNumber = log
                .get(&aggregate_id)
                .and_then(|stream| stream.last())
                .map_or(0, |event| event.sequence_number);
            let expected: SequenceNumber = *aggregate_state.sequence_number();

            if found != expected {
                return Err(InMemoryStoreError::SequenceConflict {
                    aggregate_id,
                    expected,
                    found,
                });
            }

            let stream: &mut Vec<StoredEvent> = log.entry(aggregate_id).or_default();

            for (event, payload) in events.into_iter().zip(payloads) {
                let stored_event = StoredEvent {
                    id: Uuid::new_v4(),
                    aggregate_id,
                    payload,
                    occurred_on,
                    sequence_number: aggregate_state.next_sequence_number(),
                };

                store_events.push(StoreEvent {
                    id: stored_event.id,
                    aggregate_id,
                    payload: event,
                    occurred_on,
                    sequence_number: stored_event.sequence_number,
                });
                stream.push(stored_event);
            }
        }

        self.run_event_handlers(&store_events);

        Ok(store_events)
    }

    fn delete(&self, aggregate_id: Uuid) -> Result<(), Self::Error> {
        let _ = self
            .inner
            .events
            .write()
            .map_err(|_| InMemoryStoreError::Poisoned)?
            .remove(&aggregate_id);

        let event_handlers = self
            .inner
            .event_handlers
            .read()
            .map_err(|_| InMemoryStoreError::Poisoned)?;

        for event_handler in event_handlers.iter() {
            event_handler.delete(aggregate_id);
        }

        Ok(())
    }
}

impl<A> Default for InMemoryStore<A>
where
    A: Aggregate,
{
    fn default() -> Self {
        InMemoryStoreBuilder::new().build()
    }
}

/// Debug implementation for [`InMemoryStore`]. It just shows how many aggregates are stored.
impl<A> std::fmt::Debug for InMemoryStore<A>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let aggregates: Option<usize> = self.inner.events.read().ok().map(|log| log.len());

        f.debug_struct("InMemoryStore")
            .field("aggregate", &A::NAME)
            .field("aggregates", &aggregates)
            .finish()
    }
}

impl<A> Clone for InMemoryStore<A>
where
    A: Aggregate,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
