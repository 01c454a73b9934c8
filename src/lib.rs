//! Poisson problem on the unit square solved by Gauss-Seidel relaxation,
//! sequentially or with a wavefront-blocked parallel sweep.

pub mod error;
pub mod fields;
pub mod grid;
pub mod implementations;
pub mod settings;
pub mod telemetry;

pub use error::{NetError, SolveError};
pub use grid::{Net, Point};
pub use implementations::safe::single::{solve_sequential, sweep_sequential};
pub use implementations::unsafe_impl::barrier_unsafe::solve_parallel_barrier;
pub use implementations::unsafe_impl::rayon_unsafe::{solve_parallel, solve_parallel_in};
pub use implementations::wavefront::{Block, Wavefront};
pub use settings::Settings;
