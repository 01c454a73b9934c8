use serde::{Deserialize, Serialize};

use crate::error::{check_tolerance, SolveError};

pub const DEFAULT_EPS: f64 = 0.1;
pub const DEFAULT_BLOCK_SIZE: usize = 64;

/// Knobs shared by the solvers and the benchmark drivers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Convergence tolerance on the largest per-pass change.
    pub eps: f64,
    /// Edge length of a wavefront block.
    pub block_size: usize,
    /// Worker threads for the parallel solvers.
    pub threads: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            eps: DEFAULT_EPS,
            block_size: DEFAULT_BLOCK_SIZE,
            threads: std::thread::available_parallelism().map_or(1, |n| n.get()),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SolveError> {
        check_tolerance(self.eps)?;
        if self.block_size == 0 {
            return Err(SolveError::BlockSize);
        }
        if self.threads == 0 {
            return Err(SolveError::Threads);
        }
        Ok(())
    }
}
