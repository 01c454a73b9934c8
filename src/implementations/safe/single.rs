use crate::error::{check_tolerance, SolveError};
use crate::grid::Net;
use crate::implementations::stencil::relax;

/// One Gauss-Seidel pass over the interior in row-major order.
///
/// Updates happen in place, so later nodes already see this pass's values
/// for their upper and left neighbours. Returns the largest change.
pub fn sweep_sequential(net: &mut Net) -> f64 {
    let size = net.size();
    let h2 = net.h() * net.h();
    let (u, f) = net.fields_mut();

    let mut dmax = 0.0_f64;
    for i in 1..size - 1 {
        for j in 1..size - 1 {
            let idx = i * size + j;
            let old = u[idx];
            let new = relax(u[idx - size], u[idx + size], u[idx - 1], u[idx + 1], h2, f[idx]);
            u[idx] = new;
            dmax = dmax.max((old - new).abs());
        }
    }
    dmax
}

/// Repeats [`sweep_sequential`] until a pass changes no node by more than `eps`.
///
/// Always runs at least one pass and returns the number of passes.
#[tracing::instrument(name = "Sequential solve", level = "debug", skip(net), fields(size = net.size()))]
pub fn solve_sequential(net: &mut Net, eps: f64) -> Result<usize, SolveError> {
    check_tolerance(eps)?;

    let mut iterations = 0;
    loop {
        iterations += 1;
        let dmax = sweep_sequential(net);
        tracing::trace!(iterations, dmax);
        if dmax <= eps {
            break;
        }
    }

    tracing::debug!(iterations, "Converged");
    Ok(iterations)
}
