use rayon::prelude::*;
use rayon::ThreadPool;

use crate::error::{check_tolerance, SolveError};
use crate::grid::Net;
use crate::implementations::unsafe_impl::block_kernel::{relax_block, FieldPtr};
use crate::implementations::wavefront::Wavefront;

/*
  Rayon wavefront

  - The interior is split into block_size x block_size blocks (see `Wavefront`)
  - Each anti-diagonal of blocks is one `par_iter_mut` over the per-block-row
    delta slots; `for_each` returning is the stage barrier
  - A diagonal holds at most one block per block row, so every task owns its
    slot outright and the slice split needs no lock
  - Cells are written through `FieldPtr`; blocks of one diagonal never share
    a written cell and only read neighbours finished in an earlier stage
*/

/// Runs one pass of every diagonal; `dm` must hold one slot per block row.
fn sweep_wavefront(net: &mut Net, plan: &Wavefront, dm: &mut [f64]) -> f64 {
    let size = net.size();
    let h2 = net.h() * net.h();
    let (u, f) = net.fields_mut();
    let u = FieldPtr::new(u);

    dm.fill(0.0);
    for k in plan.diagonals() {
        let rows = plan.diagonal(k);
        let first = rows.start;
        dm[rows].par_iter_mut().enumerate().for_each(|(n, slot)| {
            let bi = first + n;
            let block = plan.block(bi, k - bi);
            // SAFETY: blocks of diagonal k are disjoint, their halo cells belong
            // to diagonals k - 1 (joined already) and k + 1 (not started), and
            // `Wavefront::block` keeps every block off the border.
            let d = unsafe { relax_block(u, f, size, h2, &block) };
            *slot = slot.max(d);
        });
    }

    dm.iter().copied().fold(0.0, f64::max)
}

/// Wavefront-blocked Gauss-Seidel on the current rayon pool.
///
/// Returns the number of passes once a pass changes no node by more than
/// `eps`. The convergence slots are reserved before the first node is
/// touched, so an allocation failure leaves `net` unmodified.
#[tracing::instrument(
    name = "Wavefront solve",
    level = "debug",
    skip(net),
    fields(size = net.size(), threads = rayon::current_num_threads())
)]
pub fn solve_parallel(net: &mut Net, block_size: usize, eps: f64) -> Result<usize, SolveError> {
    check_tolerance(eps)?;
    let plan = Wavefront::new(net.interior(), block_size)?;
    // reserved before the first sweep: on failure `net` is still untouched
    let mut dm = plan.delta_slots()?;

    let mut iterations = 0;
    loop {
        iterations += 1;
        let dmax = sweep_wavefront(net, &plan, &mut dm);
        tracing::trace!(iterations, dmax);
        if dmax <= eps {
            break;
        }
    }

    tracing::debug!(
        iterations,
        blocks = plan.blocks_amount(),
        block_size = plan.block_size(),
        "Converged"
    );
    Ok(iterations)
}

/// [`solve_parallel`] inside `pool`, bounding the number of worker threads.
pub fn solve_parallel_in(
    pool: &ThreadPool,
    net: &mut Net,
    block_size: usize,
    eps: f64,
) -> Result<usize, SolveError> {
    pool.install(|| solve_parallel(net, block_size, eps))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::implementations::safe::single::sweep_sequential;

    #[test]
    fn one_block_pass_matches_sequential_pass() {
        // a single block covering the interior is plain row-major Gauss-Seidel
        let seed = |x: f64, y: f64| x * x - y;
        let mut sequential = Net::new(9, seed, |x, _| x).unwrap();
        let mut blocked = sequential.clone();

        let plan = Wavefront::new(blocked.interior(), 7).unwrap();
        let mut dm = plan.delta_slots().unwrap();
        let blocked_delta = sweep_wavefront(&mut blocked, &plan, &mut dm);
        let sequential_delta = sweep_sequential(&mut sequential);

        assert_eq!(blocked_delta, sequential_delta);
        assert_eq!(blocked.u_values(), sequential.u_values());
    }

    #[test]
    fn zero_block_size_is_rejected_before_any_work() {
        let mut net = Net::new(6, |_, _| 1.0, |_, _| 1.0).unwrap();
        let before = net.u_values().to_vec();
        assert!(matches!(
            solve_parallel(&mut net, 0, 1e-6),
            Err(SolveError::BlockSize)
        ));
        assert_eq!(net.u_values(), before.as_slice());
    }

    #[test]
    fn runs_inside_a_bounded_pool() {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap();
        let mut net = Net::new(12, |x, _| x, |_, _| 0.0).unwrap();
        let iterations = solve_parallel_in(&pool, &mut net, 3, 1e-10).unwrap();
        assert!(iterations >= 1);
    }
}
