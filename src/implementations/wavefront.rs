//! Block decomposition and anti-diagonal schedule shared by the wavefront solvers.
//!
//! The interior is cut into `blocks_amount x blocks_amount` blocks. Block
//! `(bi, bj)` reads the last row of `(bi - 1, bj)` and the last column of
//! `(bi, bj - 1)`, so it may only run after both. Blocks with the same
//! `bi + bj = k` never read each other's cells and form one stage. The forward
//! sweep covers `k < blocks_amount` (upper-left triangle and the main
//! anti-diagonal), the backward sweep the remaining lower-right triangle.

use std::collections::TryReserveError;
use std::ops::Range;

use crate::error::SolveError;

/// Rows and columns of the grid (border included in the indexing) owned by one block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wavefront {
    interior: usize,
    block_size: usize,
    blocks_amount: usize,
}

impl Wavefront {
    /// A `block_size` wider than the interior is clamped to a single block.
    pub fn new(interior: usize, block_size: usize) -> Result<Self, SolveError> {
        if block_size == 0 {
            return Err(SolveError::BlockSize);
        }
        let block_size = block_size.min(interior.max(1));
        Ok(Wavefront {
            interior,
            block_size,
            blocks_amount: interior.div_ceil(block_size),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn blocks_amount(&self) -> usize {
        self.blocks_amount
    }

    /// Every stage of one pass, in execution order.
    pub fn diagonals(&self) -> Range<usize> {
        0..self
            .blocks_amount
            .saturating_add(self.blocks_amount.saturating_sub(1))
    }

    pub fn forward_sweep(&self) -> Range<usize> {
        0..self.blocks_amount
    }

    pub fn backward_sweep(&self) -> Range<usize> {
        self.blocks_amount..self.diagonals().end
    }

    /// Block rows `bi` taking part in diagonal `k`; the column is `k - bi`.
    pub fn diagonal(&self, k: usize) -> Range<usize> {
        let first = (k + 1).saturating_sub(self.blocks_amount);
        let last = k.min(self.blocks_amount.saturating_sub(1));
        first..last + 1
    }

    /// Node ranges of block `(bi, bj)`, clipped so they never reach the border.
    pub fn block(&self, bi: usize, bj: usize) -> Block {
        let limit = self.interior.saturating_add(1);
        let span = |b: usize| {
            let start = b.saturating_mul(self.block_size).saturating_add(1).min(limit);
            start..start.saturating_add(self.block_size).min(limit)
        };
        Block {
            rows: span(bi),
            cols: span(bj),
        }
    }

    /// One zeroed convergence slot per block row, reserved fallibly.
    pub fn delta_slots(&self) -> Result<Vec<f64>, SolveError> {
        Ok(try_slots(self.blocks_amount, || 0.0)?)
    }
}

pub(crate) fn try_slots<T>(len: usize, init: impl FnMut() -> T) -> Result<Vec<T>, TryReserveError> {
    let mut slots = Vec::new();
    slots.try_reserve_exact(len)?;
    slots.extend(std::iter::repeat_with(init).take(len));
    Ok(slots)
}
