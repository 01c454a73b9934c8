pub mod safe;
pub mod stencil;
pub mod wavefront;

#[path = "unsafe"]
pub mod unsafe_impl {
    pub(crate) mod block_kernel;
    pub mod barrier_unsafe;
    pub mod rayon_unsafe;
}
