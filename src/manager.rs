use uuid::Uuid;

use crate::store::{EventStore, StoreEvent};
use crate::{Aggregate, AggregateState};

/// The AggregateManager is responsible for coupling the Aggregate with a Store, so that the events
/// can be persisted when handled, and the state can be reconstructed by loading and apply events sequentially.
///
/// The basic APIs are:
/// 1. handle_command
/// 2. load
/// 3. lock_and_load
pub struct AggregateManager<E>
where
    E: EventStore,
{
    event_store: E,
}

impl<E> AggregateManager<E>
where
    E: EventStore,
{
    /// Creates a new instance of an [`AggregateManager`].
    pub fn new(event_store: E) -> Self {
        Self { event_store }
    }

    /// Validates and handles the command onto the given state, and then passes the events to the store.
    ///
    /// Once the store persisted them, the events are applied to `aggregate_state`, which is thus kept
    /// in sync with the event log. If the command is rejected, or the store fails, nothing changes.
    pub fn handle_command<Er>(
        &self,
        aggregate_state: &mut AggregateState<<E::Aggregate as Aggregate>::State>,
        command: <E::Aggregate as Aggregate>::Command,
    ) -> Result<Vec<StoreEvent<<E::Aggregate as Aggregate>::Event>>, Er>
    where
        Er: From<E::Error> + From<<E::Aggregate as Aggregate>::Error> + std::error::Error,
    {
        let events: Vec<<E::Aggregate as Aggregate>::Event> =
            <E::Aggregate as Aggregate>::handle_command(aggregate_state.inner(), command)?;

        let store_events: Vec<StoreEvent<<E::Aggregate as Aggregate>::Event>> =
            self.event_store.persist(aggregate_state, events)?;

        aggregate_state.apply_payloads(
            store_events.iter().map(|store_event| store_event.payload.clone()),
            <E::Aggregate as Aggregate>::apply_event,
        );

        Ok(store_events)
    }

    /// Loads an aggregate instance from the event store, by applying previously persisted events onto
    /// the aggregate state by order of their sequence number.
    pub fn load(
        &self,
        aggregate_id: impl Into<Uuid>,
    ) -> Result<Option<AggregateState<<E::Aggregate as Aggregate>::State>>, E::Error> {
        let aggregate_id: Uuid = aggregate_id.into();

        let mut store_events: Vec<StoreEvent<<E::Aggregate as Aggregate>::Event>> =
            self.event_store.by_aggregate_id(aggregate_id)?;

        Ok(if store_events.is_empty() {
            None
        } else {
            store_events.sort_by_key(|store_event| store_event.sequence_number);
            let aggregate_state = AggregateState::with_id(aggregate_id);
            Some(aggregate_state.apply_store_events(store_events, <E::Aggregate as Aggregate>::apply_event))
        })
    }

    /// Acquires the exclusive lock on this aggregate instance, and only then loads it from the event
    /// store. An aggregate with no events yet comes back as a fresh default state with that id.
    ///
    /// The returned state holds the lock until it is dropped, so every command handled through it
    /// runs without interleaving with other locked loads of the same id.
    pub fn lock_and_load(
        &self,
        aggregate_id: impl Into<Uuid>,
    ) -> Result<AggregateState<<E::Aggregate as Aggregate>::State>, E::Error> {
        let id: Uuid = aggregate_id.into();
        let guard = self.event_store.lock(id)?;

        let mut aggregate_state = self.load(id)?.unwrap_or_else(|| AggregateState::with_id(id));
        aggregate_state.set_lock(guard);

        Ok(aggregate_state)
    }

    /// `delete` should either complete the aggregate instance, along with all its associated events
    /// and read side projections, or fail.
    pub fn delete(&self, aggregate_id: impl Into<Uuid>) -> Result<(), E::Error> {
        self.event_store.delete(aggregate_id.into())
    }

    /// Returns the internal event store
    pub fn event_store(&self) -> &E {
        &self.event_store
    }
}
