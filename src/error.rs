//! # Error
//! Error types for grid construction and the solvers.

use std::collections::TryReserveError;

#[derive(thiserror::Error, Debug)]
/// Failure to build a [`Net`](crate::grid::Net)
pub enum NetError {
    #[error("a net needs at least one interior row and column, got size {size}")]
    TooSmall { size: usize },
    #[error("a {size}x{size} net does not fit in the address space")]
    TooLarge { size: usize },
    #[error("failed to allocate net storage: {0}")]
    Allocation(#[from] TryReserveError),
}

impl NetError {
    /// True when the net could not be built because storage was unavailable.
    pub fn is_allocation(&self) -> bool {
        matches!(self, NetError::TooLarge { .. } | NetError::Allocation(_))
    }
}

#[derive(thiserror::Error, Debug)]
/// Failure to start a relaxation solve
pub enum SolveError {
    #[error("tolerance must be finite and positive, got {eps}")]
    Tolerance { eps: f64 },
    #[error("block size must be at least 1")]
    BlockSize,
    #[error("at least one worker thread is required")]
    Threads,
    #[error("failed to allocate per-block convergence slots: {0}")]
    Allocation(#[from] TryReserveError),
}

pub(crate) fn check_tolerance(eps: f64) -> Result<(), SolveError> {
    if eps.is_finite() && eps > 0.0 {
        Ok(())
    } else {
        Err(SolveError::Tolerance { eps })
    }
}
