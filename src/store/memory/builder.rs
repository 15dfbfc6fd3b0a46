use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::handler::EventHandler;
use crate::store::memory::event_store::InnerInMemoryStore;
use crate::store::memory::InMemoryStore;
use crate::Aggregate;

/// Struct used to build a brand new [`InMemoryStore`].
pub struct InMemoryStoreBuilder<A>
where
    A: Aggregate,
{
    event_handlers: Vec<Box<dyn EventHandler<A>>>,
}

impl<A> InMemoryStoreBuilder<A>
where
    A: Aggregate,
{
    /// Creates a new instance of an [`InMemoryStoreBuilder`].
    pub fn new() -> Self {
        Self { event_handlers: vec![] }
    }

    /// Set event handlers list
    pub fn with_event_handlers(mut self, event_handlers: Vec<Box<dyn EventHandler<A>>>) -> Self {
        self.event_handlers = event_handlers;
        self
    }

    /// Add a single event handler
    pub fn add_event_handler(mut self, event_handler: impl EventHandler<A> + 'static) -> Self {
        self.event_handlers.push(Box::new(event_handler));
        self
    }

    /// Builds the store. The event log starts empty.
    pub fn build(self) -> InMemoryStore<A> {
        InMemoryStore {
            inner: Arc::new(InnerInMemoryStore {
                events: RwLock::new(HashMap::new()),
                locks: Arc::default(),
                event_handlers: RwLock::new(self.event_handlers),
            }),
        }
    }
}

impl<A> Default for InMemoryStoreBuilder<A>
where
    A: Aggregate,
{
    fn default() -> Self {
        Self::new()
    }
}
