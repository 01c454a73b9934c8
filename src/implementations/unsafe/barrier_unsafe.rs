use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;

use crate::error::{check_tolerance, SolveError};
use crate::grid::Net;
use crate::implementations::unsafe_impl::block_kernel::{relax_block, FieldPtr};
use crate::implementations::wavefront::{try_slots, Wavefront};

/*
  Barrier wavefront

  Same schedule as the rayon version, on `threads` scoped workers:
  - block n of a diagonal goes to worker n % threads
  - every worker waits on the barrier after each diagonal (stage barrier)
  - per-block-row deltas live in AtomicU64 (f64 bits); a slot is written by
    one worker per stage and the barrier orders stages, so Relaxed suffices
  - after the last diagonal the barrier leader reduces dmax, resets the slots
    and publishes the stop flag; a second wait lets every worker see it
*/

#[tracing::instrument(name = "Barrier wavefront solve", level = "debug", skip(net), fields(size = net.size()))]
pub fn solve_parallel_barrier(
    net: &mut Net,
    threads: usize,
    block_size: usize,
    eps: f64,
) -> Result<usize, SolveError> {
    check_tolerance(eps)?;
    if threads == 0 {
        return Err(SolveError::Threads);
    }
    let plan = Wavefront::new(net.interior(), block_size)?;
    let dm = try_slots(plan.blocks_amount(), || AtomicU64::new(0))?;

    let size = net.size();
    let h2 = net.h() * net.h();
    let (u, f) = net.fields_mut();
    let u = FieldPtr::new(u);

    let barrier = Barrier::new(threads);
    let done = AtomicBool::new(false);
    let iterations = AtomicUsize::new(0);

    thread::scope(|scope| {
        for worker in 0..threads {
            let (plan, dm, barrier, done, iterations) = (&plan, &dm, &barrier, &done, &iterations);
            scope.spawn(move || {
                while !done.load(Ordering::Acquire) {
                    for k in plan.diagonals() {
                        for bi in plan.diagonal(k).skip(worker).step_by(threads) {
                            let block = plan.block(bi, k - bi);
                            // SAFETY: blocks of diagonal k are disjoint and handed to
                            // exactly one worker; halo cells were written before the
                            // previous barrier or belong to a later diagonal.
                            let d = unsafe { relax_block(u, f, size, h2, &block) };
                            let slot = &dm[bi];
                            let prev = f64::from_bits(slot.load(Ordering::Relaxed));
                            slot.store(prev.max(d).to_bits(), Ordering::Relaxed);
                        }

                        let wait = barrier.wait();
                        if wait.is_leader() && k + 1 == plan.diagonals().end {
                            let dmax = dm
                                .iter()
                                .map(|slot| f64::from_bits(slot.swap(0, Ordering::Relaxed)))
                                .fold(0.0, f64::max);
                            let pass = iterations.fetch_add(1, Ordering::Relaxed) + 1;
                            tracing::trace!(iterations = pass, dmax);
                            done.store(dmax <= eps, Ordering::Release);
                        }
                    }
                    // nobody re-checks `done` before the leader has published it
                    barrier.wait();
                }
            });
        }
    });

    let iterations = iterations.into_inner();
    tracing::debug!(iterations, threads, "Converged");
    Ok(iterations)
}
