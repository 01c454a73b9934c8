use std::marker::PhantomData;

use crate::implementations::stencil::relax;
use crate::implementations::wavefront::Block;

/// Shared view of the approximation buffer handed to every wavefront task.
///
/// Tasks of one stage write disjoint blocks and only read cells finished in an
/// earlier stage (or owned by a later one), which is what makes sharing the
/// raw pointer sound. The lifetime ties the view to the borrowed buffer.
#[derive(Clone, Copy)]
pub(crate) struct FieldPtr<'a> {
    data: *mut f64,
    len: usize,
    _buffer: PhantomData<&'a mut [f64]>,
}

unsafe impl Send for FieldPtr<'_> {}
unsafe impl Sync for FieldPtr<'_> {}

impl<'a> FieldPtr<'a> {
    pub(crate) fn new(buffer: &'a mut [f64]) -> Self {
        FieldPtr {
            data: buffer.as_mut_ptr(),
            len: buffer.len(),
            _buffer: PhantomData,
        }
    }

    // Going through a method makes closures capture the whole wrapper rather
    // than the bare `*mut f64` field, which is neither Send nor Sync.
    fn as_ptr(self) -> *mut f64 {
        self.data
    }
}

/// Relaxes one block row-major in place and returns its largest change.
///
/// # Safety
///
/// `block` plus a one-node halo must lie inside the `size x size` buffer, no
/// other thread may write `block` or read it while this runs, and no other
/// thread may write the halo cells.
pub(crate) unsafe fn relax_block(u: FieldPtr<'_>, f: &[f64], size: usize, h2: f64, block: &Block) -> f64 {
    debug_assert!(block.rows.start >= 1 && block.rows.end < size);
    debug_assert!(block.cols.start >= 1 && block.cols.end < size);
    debug_assert_eq!(u.len, f.len());

    let base = u.as_ptr();
    let mut dmax = 0.0_f64;
    for i in block.rows.clone() {
        for j in block.cols.clone() {
            let idx = i * size + j;
            // SAFETY: the caller guarantees idx and its four neighbours are in
            // bounds and that nobody else touches them during this call.
            unsafe {
                let cell = base.add(idx);
                let old = *cell;
                let new = relax(
                    *base.add(idx - size),
                    *base.add(idx + size),
                    *base.add(idx - 1),
                    *base.add(idx + 1),
                    h2,
                    f[idx],
                );
                *cell = new;
                dmax = dmax.max((old - new).abs());
            }
        }
    }
    dmax
}
