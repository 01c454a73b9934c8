//! Scalar fields used to seed benchmark nets.
//!
//! Everything here is plain closures handed to [`Net::new`](crate::grid::Net::new);
//! nothing is stored globally.

/// Distance below which a coordinate counts as lying on the unit-square edge.
const EDGE_TOLERANCE: f64 = 1e-12;

fn on_edge(x: f64, y: f64) -> bool {
    x <= EDGE_TOLERANCE
        || y <= EDGE_TOLERANCE
        || x >= 1.0 - EDGE_TOLERANCE
        || y >= 1.0 - EDGE_TOLERANCE
}

/// Restricts `field` to the edge of the unit square and seeds the interior with zero.
pub fn only_borders<F>(field: F) -> impl Fn(f64, f64) -> f64
where
    F: Fn(f64, f64) -> f64,
{
    move |x, y| if on_edge(x, y) { field(x, y) } else { 0.0 }
}

/// `1000 x^3 + 2000 y^3`
pub fn cubic(x: f64, y: f64) -> f64 {
    1000.0 * x.powi(3) + 2000.0 * y.powi(3)
}

/// Laplacian of [`cubic`].
pub fn cubic_laplacian(x: f64, y: f64) -> f64 {
    6000.0 * x + 12000.0 * y
}

pub fn constant(value: f64) -> impl Fn(f64, f64) -> f64 {
    move |_, _| value
}
