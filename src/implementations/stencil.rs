/// Five-point Laplacian solved for the centre node.
///
/// Every solver goes through this so the arithmetic (and its rounding) is identical.
#[inline(always)]
pub fn relax(up: f64, down: f64, left: f64, right: f64, h2: f64, f: f64) -> f64 {
    0.25 * (up + down + left + right - h2 * f)
}
