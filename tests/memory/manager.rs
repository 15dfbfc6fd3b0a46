use std::sync::Arc;
use std::thread;

use uuid::Uuid;

use paystation::error::InMemoryStoreError;
use paystation::store::memory::InMemoryStore;
use paystation::{AggregateManager, AggregateState};

use crate::aggregate::{MeterAggregate, MeterCommand, MeterError, MeterState, MinutesFed};

#[test]
fn handle_command_test() {
    let store: InMemoryStore<MeterAggregate> = InMemoryStore::default();
    let manager = AggregateManager::new(store);

    let mut aggregate_state: AggregateState<MeterState> = AggregateState::new();
    let aggregate_id = *aggregate_state.id();

    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Feed { minutes: 10 })
        .unwrap();
    assert_eq!(aggregate_state.inner().minutes, 10);
    assert_eq!(aggregate_state.sequence_number(), &1);

    let mut aggregate_state = manager.load(aggregate_id).unwrap().unwrap();
    assert_eq!(aggregate_state.inner().minutes, 10);
    assert_eq!(aggregate_state.sequence_number(), &1);

    let store_events = manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::FeedEach(vec![2, 4]))
        .unwrap();
    assert_eq!(store_events.len(), 2);
    assert_eq!(aggregate_state.inner().minutes, 16);
    assert_eq!(aggregate_state.inner().feeds, 3);
    assert_eq!(aggregate_state.sequence_number(), &3);

    let aggregate_state = manager.load(aggregate_id).unwrap().unwrap();
    assert_eq!(aggregate_state.inner().minutes, 16);
    assert_eq!(aggregate_state.sequence_number(), &3);
}

#[test]
fn rejected_command_changes_nothing_test() {
    let manager = AggregateManager::new(InMemoryStore::<MeterAggregate>::default());
    let mut aggregate_state: AggregateState<MeterState> = AggregateState::new();

    let result = manager.handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Expire);
    assert!(matches!(result, Err(MeterError::AlreadyExpired)));

    // A batch with one bad entry is rejected as a whole.
    let result = manager.handle_command::<MeterError>(&mut aggregate_state, MeterCommand::FeedEach(vec![5, 0]));
    assert!(matches!(result, Err(MeterError::NothingFed)));

    assert_eq!(aggregate_state.inner().minutes, 0);
    assert_eq!(aggregate_state.sequence_number(), &0);
    assert!(manager.load(*aggregate_state.id()).unwrap().is_none());
}

#[test]
fn stale_state_conflict_test() {
    let manager = AggregateManager::new(InMemoryStore::<MeterAggregate>::default());
    let id = Uuid::new_v4();

    let mut first: AggregateState<MeterState> = AggregateState::with_id(id);
    let mut second: AggregateState<MeterState> = AggregateState::with_id(id);

    manager
        .handle_command::<MeterError>(&mut first, MeterCommand::Feed { minutes: 4 })
        .unwrap();
    let result = manager.handle_command::<MeterError>(&mut second, MeterCommand::Feed { minutes: 6 });

    assert!(matches!(
        result,
        Err(MeterError::Store(InMemoryStoreError::SequenceConflict { .. }))
    ));
    assert_eq!(second.inner().minutes, 0);
    assert_eq!(manager.load(id).unwrap().unwrap().inner().minutes, 4);
}

#[test]
fn event_handler_test() {
    let handler = MinutesFed::default();
    let store: InMemoryStore<MeterAggregate> = InMemoryStore::builder().add_event_handler(handler.clone()).build();
    let manager = AggregateManager::new(&store);

    let mut aggregate_state: AggregateState<MeterState> = AggregateState::new();
    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::FeedEach(vec![2, 8]))
        .unwrap();
    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Expire)
        .unwrap();
    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Feed { minutes: 6 })
        .unwrap();

    assert_eq!(*handler.total.lock().unwrap(), 16);
    assert_eq!(aggregate_state.inner().minutes, 6);
}

#[test]
fn delete_test() {
    let handler = MinutesFed::default();
    let store: InMemoryStore<MeterAggregate> = InMemoryStore::builder()
        .with_event_handlers(vec![Box::new(handler.clone())])
        .build();
    let manager = AggregateManager::new(store);
    let mut aggregate_state: AggregateState<MeterState> = AggregateState::new();
    let aggregate_id = *aggregate_state.id();

    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Feed { minutes: 30 })
        .unwrap();
    assert!(manager.load(aggregate_id).unwrap().is_some());
    assert_eq!(*handler.total.lock().unwrap(), 30);

    manager.delete(aggregate_id).unwrap();
    assert!(manager.load(aggregate_id).unwrap().is_none());
    assert_eq!(*handler.total.lock().unwrap(), 0);
}

#[test]
fn lock_and_load_test() {
    let store: Arc<InMemoryStore<MeterAggregate>> = Arc::new(InMemoryStore::default());
    let manager = AggregateManager::new(Arc::clone(&store));
    let aggregate_id = Uuid::new_v4();

    let mut aggregate_state = manager.lock_and_load(aggregate_id).unwrap();
    assert!(aggregate_state.is_locked());
    assert_eq!(aggregate_state.id(), &aggregate_id);
    assert_eq!(aggregate_state.sequence_number(), &0);

    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Feed { minutes: 5 })
        .unwrap();

    let contender = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            let manager = AggregateManager::new(store);
            let aggregate_state = manager.lock_and_load(aggregate_id).unwrap();
            assert!(aggregate_state.is_locked());
            (aggregate_state.inner().minutes, *aggregate_state.sequence_number())
        })
    };

    manager
        .handle_command::<MeterError>(&mut aggregate_state, MeterCommand::Feed { minutes: 7 })
        .unwrap();
    drop(aggregate_state);

    // The contender can only load once the first lock is gone, so it sees both commands.
    assert_eq!(contender.join().unwrap(), (12, 2));
}
