use serde::de::DeserializeOwned;
use serde::Serialize;

/// Marker for every type that can be emitted by an [`crate::Aggregate`] and stored in an
/// [`crate::EventStore`].
pub trait Event: Serialize + DeserializeOwned + Clone {}

impl<T> Event for T where T: Serialize + DeserializeOwned + Clone {}
