use std::collections::TryReserveError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    /// Checked access asked for a key the map does not hold.
    #[error("key not found")]
    KeyNotFound,
    /// The arena could not grow to hold another node.
    #[error("failed to allocate a tree node")]
    AllocationFailure(#[from] TryReserveError),
}
