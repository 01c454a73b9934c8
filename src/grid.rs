use std::fmt;

use crate::error::NetError;

/// Grid coordinate of a node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Uniform `size x size` discretisation of the unit square.
///
/// `u` holds the current approximation and `f` the source term. Every field is
/// one contiguous row-major buffer, node `(i, j)` lives at `i * size + j`.
/// Border nodes of `u` keep their construction-time value; only the solvers in
/// [`implementations`](crate::implementations) write the interior.
#[derive(Clone, Debug)]
pub struct Net {
    size: usize,
    h: f64,
    points: Vec<Point>,
    u: Vec<f64>,
    f: Vec<f64>,
}

impl Net {
    /// Evaluates `boundary` into `u` and `source` into `f` at every node.
    ///
    /// Storage for all three fields is reserved before either function is
    /// called, so an allocation failure never leaves a partly built net.
    pub fn new<B, S>(size: usize, boundary: B, source: S) -> Result<Self, NetError>
    where
        B: Fn(f64, f64) -> f64,
        S: Fn(f64, f64) -> f64,
    {
        if size < 3 {
            return Err(NetError::TooSmall { size });
        }
        let cells = size
            .checked_mul(size)
            .ok_or(NetError::TooLarge { size })?;

        let mut points = Vec::new();
        points.try_reserve_exact(cells)?;
        let mut u = Vec::new();
        u.try_reserve_exact(cells)?;
        let mut f = Vec::new();
        f.try_reserve_exact(cells)?;

        let h = 1.0 / (size - 1) as f64;
        for i in 0..size {
            for j in 0..size {
                let point = Point {
                    x: i as f64 * h,
                    y: j as f64 * h,
                };
                points.push(point);
                u.push(boundary(point.x, point.y));
                f.push(source(point.x, point.y));
            }
        }

        Ok(Net {
            size,
            h,
            points,
            u,
            f,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    /// Number of interior rows (and columns).
    pub fn interior(&self) -> usize {
        self.size - 2
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.size + j
    }

    pub fn u(&self, i: usize, j: usize) -> f64 {
        self.u[self.index(i, j)]
    }

    pub fn f(&self, i: usize, j: usize) -> f64 {
        self.f[self.index(i, j)]
    }

    pub fn point(&self, i: usize, j: usize) -> Point {
        self.points[self.index(i, j)]
    }

    pub fn u_values(&self) -> &[f64] {
        &self.u
    }

    pub fn f_values(&self) -> &[f64] {
        &self.f
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i == self.size - 1 || j == self.size - 1
    }

    /// Mean absolute deviation of `u` from `exact` over every node.
    pub fn mean_error<E>(&self, exact: E) -> f64
    where
        E: Fn(f64, f64) -> f64,
    {
        let sum: f64 = self
            .points
            .iter()
            .zip(&self.u)
            .map(|(p, u)| (u - exact(p.x, p.y)).abs())
            .sum();
        sum / self.u.len() as f64
    }

    /// Largest absolute difference between the `u` fields of two nets of the same size.
    pub fn max_difference(&self, other: &Net) -> Option<f64> {
        (self.size == other.size).then(|| {
            self.u
                .iter()
                .zip(&other.u)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0, f64::max)
        })
    }

    /// Mutable approximation together with the read-only source term.
    pub(crate) fn fields_mut(&mut self) -> (&mut [f64], &[f64]) {
        (&mut self.u, &self.f)
    }
}

impl fmt::Display for Net {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.u.chunks(self.size) {
            for value in row {
                write!(fmt, "{value:8.2} ")?;
            }
            writeln!(fmt)?;
        }
        Ok(())
    }
}
