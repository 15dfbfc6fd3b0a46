use thiserror::Error;

use crate::store::memory::InMemoryStoreError;

#[derive(Debug, Error)]
pub enum PayStationError {
    #[error("Invalid coin: {0}")]
    InvalidCoin(u32),

    #[error(transparent)]
    Store(#[from] InMemoryStoreError),
}
