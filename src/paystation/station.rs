use std::collections::BTreeMap;

use uuid::Uuid;

use crate::manager::AggregateManager;
use crate::paystation::{
    PayStationAggregate, PayStationCommand, PayStationConfig, PayStationError, PayStationState, Receipt,
};
use crate::store::memory::InMemoryStore;
use crate::AggregateState;

/// A parking pay station.
///
/// Every operation goes through the [`PayStationAggregate`], so each accepted action is recorded
/// in the event store before the station state changes. Rejected actions leave both untouched.
///
/// Mutating operations take `&mut self`. To share one station id between several handles, open
/// them with [`PayStation::open_locked`]: each handle then owns the station exclusively until it
/// is dropped.
pub struct PayStation {
    name: String,
    manager: AggregateManager<InMemoryStore<PayStationAggregate>>,
    state: AggregateState<PayStationState>,
}

impl PayStation {
    /// Creates a brand new station, with a random id, on top of the given store.
    pub fn new(store: InMemoryStore<PayStationAggregate>) -> Self {
        let config = PayStationConfig::default();

        Self {
            state: AggregateState::with_id(config.id),
            name: config.name,
            manager: AggregateManager::new(store),
        }
    }

    /// Opens the station configured by `config`, replaying its history if the store has any.
    ///
    /// # Errors
    ///
    /// Will return an `Err` if the history cannot be loaded from the store.
    pub fn open(store: InMemoryStore<PayStationAggregate>, config: PayStationConfig) -> Result<Self, PayStationError> {
        let manager = AggregateManager::new(store);
        let state = manager
            .load(config.id)?
            .unwrap_or_else(|| AggregateState::with_id(config.id));

        tracing::debug!(station = %config.name, station_id = %config.id, sequence_number = state.sequence_number(), "pay station opened");

        Ok(Self {
            name: config.name,
            manager,
            state,
        })
    }

    /// Like [`PayStation::open`], but first takes the exclusive lock on the station, waiting for
    /// any other locked handle on the same id to be dropped. The lock is held until this handle is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Will return an `Err` if the lock cannot be acquired or the history cannot be loaded.
    pub fn open_locked(
        store: InMemoryStore<PayStationAggregate>,
        config: PayStationConfig,
    ) -> Result<Self, PayStationError> {
        let manager = AggregateManager::new(store);
        let state = manager.lock_and_load(config.id)?;

        tracing::debug!(station = %config.name, station_id = %config.id, sequence_number = state.sequence_number(), "pay station opened with lock");

        Ok(Self {
            name: config.name,
            manager,
            state,
        })
    }

    pub fn id(&self) -> &Uuid {
        self.state.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current session and till figures.
    pub fn state(&self) -> &PayStationState {
        self.state.inner()
    }

    /// The store this station records its events in.
    pub fn store(&self) -> &InMemoryStore<PayStationAggregate> {
        self.manager.event_store()
    }

    /// Inserts a coin worth `coin_value` cents.
    ///
    /// # Errors
    ///
    /// Returns [`PayStationError::InvalidCoin`] for anything but 5, 10 or 25 cents. The station is
    /// left exactly as it was, so the caller can simply try again with a valid coin.
    pub fn add_payment(&mut self, coin_value: u32) -> Result<(), PayStationError> {
        if let Err(error) = self.execute(PayStationCommand::AddPayment { coin_value }) {
            if let PayStationError::InvalidCoin(_) = error {
                tracing::warn!(station = %self.name, coin_value, "rejected invalid coin");
            }
            return Err(error);
        }

        tracing::trace!(station = %self.name, coin_value, display = self.read_display(), "coin accepted");
        Ok(())
    }

    /// Minutes of parking bought so far in the current session.
    pub fn read_display(&self) -> u32 {
        self.state.inner().time_bought()
    }

    /// Ends the session buying the time shown on the display. The inserted money goes to the till.
    ///
    /// Buying with no money inserted is allowed, and yields a zero-minute receipt.
    ///
    /// # Errors
    ///
    /// Only fails if the store does.
    pub fn buy(&mut self) -> Result<Receipt, PayStationError> {
        let receipt: Receipt = Receipt::new(self.read_display());
        let amount: u32 = self.state.inner().inserted_so_far();

        self.execute(PayStationCommand::Buy)?;

        tracing::info!(station = %self.name, minutes = receipt.minutes(), amount, "parking bought");
        Ok(receipt)
    }

    /// Ends the session without buying, returning the coins inserted as a map from coin value in
    /// cents to number of coins.
    ///
    /// # Errors
    ///
    /// Only fails if the store does.
    pub fn cancel(&mut self) -> Result<BTreeMap<u32, u32>, PayStationError> {
        let refund: BTreeMap<u32, u32> = self.state.inner().refund();

        self.execute(PayStationCommand::Cancel)?;

        tracing::debug!(station = %self.name, refund = ?refund, "session cancelled");
        Ok(refund)
    }

    /// Returns the cents collected by purchases since the last call, and resets that total.
    ///
    /// # Errors
    ///
    /// Only fails if the store does.
    pub fn empty(&mut self) -> Result<u32, PayStationError> {
        let amount: u32 = self.state.inner().total_bought();

        self.execute(PayStationCommand::Empty)?;

        tracing::info!(station = %self.name, amount, "till emptied");
        Ok(amount)
    }

    /// Replays the station history from the store, discarding this handle's view of it.
    ///
    /// Needed after an operation fails with [`InMemoryStoreError::SequenceConflict`]: another
    /// handle recorded events first, and this one keeps failing until it catches up. The failed
    /// operation is not retried. A handle opened with [`PayStation::open_locked`] keeps its lock.
    ///
    /// # Errors
    ///
    /// Will return an `Err` if the history cannot be loaded from the store. The handle is then
    /// left as it was.
    ///
    /// [`InMemoryStoreError::SequenceConflict`]: crate::store::memory::InMemoryStoreError::SequenceConflict
    pub fn reload(&mut self) -> Result<(), PayStationError> {
        let id: Uuid = *self.state.id();
        let mut state = self.manager.load(id)?.unwrap_or_else(|| AggregateState::with_id(id));

        if let Some(lock) = self.state.take_lock() {
            state.set_lock(lock);
        }

        tracing::debug!(station = %self.name, station_id = %id, sequence_number = state.sequence_number(), "pay station reloaded");

        self.state = state;
        Ok(())
    }

    fn execute(&mut self, command: PayStationCommand) -> Result<(), PayStationError> {
        self.manager
            .handle_command::<PayStationError>(&mut self.state, command)
            .map(|_| ())
    }
}

impl std::fmt::Debug for PayStation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayStation")
            .field("name", &self.name)
            .field("state", &self.state)
            .finish()
    }
}
