use std::fmt::{Debug, Formatter};

use uuid::Uuid;

use crate::store::{EventStoreLockGuard, StoreEvent};
use crate::types::SequenceNumber;

/// The internal state for an Aggregate.
/// It contains:
/// - an id uniquely representing the aggregate,
/// - an incremental sequence number,
/// - a state defined by the user of this library,
/// - an optional lock guard, keeping the aggregate exclusively accessed while held.
pub struct AggregateState<S> {
    id: Uuid,
    sequence_number: SequenceNumber,
    inner: S,
    lock: Option<EventStoreLockGuard>,
}

/// Default implementation for [`AggregateState`]
impl<S: Default> Default for AggregateState<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Default> AggregateState<S> {
    /// Creates a new instance of an [`AggregateState`] with a new unique id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a new instance of an [`AggregateState`] with the given aggregate id.
    ///
    /// This should be used almost exclusively when loading by aggregate id yields nothing, and this
    /// becomes the brand new aggregate state for that id.
    #[must_use]
    pub fn with_id(id: impl Into<Uuid>) -> Self {
        Self {
            id: id.into(),
            sequence_number: 0,
            inner: Default::default(),
            lock: None,
        }
    }

    /// Consumes the aggregate state and generates a new one with the events applied to it,
    /// as described by `function`.
    #[must_use]
    pub fn apply_store_events<T, F>(mut self, store_events: Vec<StoreEvent<T>>, function: F) -> Self
    where
        F: Fn(S, T) -> S,
    {
        for store_event in store_events {
            self.sequence_number = store_event.sequence_number;
            self.apply_payloads(std::iter::once(store_event.payload), &function);
        }
        self
    }

    /// Folds the given payloads onto the inner state, leaving the sequence number untouched.
    pub(crate) fn apply_payloads<T, F>(&mut self, payloads: impl IntoIterator<Item = T>, function: F)
    where
        F: Fn(S, T) -> S,
    {
        let inner: S = std::mem::take(&mut self.inner);
        self.inner = payloads.into_iter().fold(inner, function);
    }
}

impl<S> AggregateState<S> {
    /// Returns an Uuid representing the aggregate id
    pub const fn id(&self) -> &Uuid {
        &self.id
    }

    /// Returns the internal state
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns the internal sequence number incremented by 1.
    pub fn next_sequence_number(&mut self) -> SequenceNumber {
        self.sequence_number += 1;
        self.sequence_number
    }

    /// Returns the internal sequence number
    pub const fn sequence_number(&self) -> &SequenceNumber {
        &self.sequence_number
    }

    /// Inserts the lock guard into self, replacing any current one.
    pub fn set_lock(&mut self, guard: EventStoreLockGuard) {
        self.lock = Some(guard);
    }

    /// Extracts the lock from self, leaving nothing in its place.
    pub fn take_lock(&mut self) -> Option<EventStoreLockGuard> {
        self.lock.take()
    }

    /// Whether this state currently holds the exclusive lock on its aggregate.
    pub const fn is_locked(&self) -> bool {
        self.lock.is_some()
    }
}

impl<S: Debug> Debug for AggregateState<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AggregateState")
            .field("id", &self.id)
            .field("sequence_number", &self.sequence_number)
            .field("inner", &self.inner)
            .field("locked", &self.lock.is_some())
            .finish()
    }
}
