//! Parallel-for over the cells of a level.
//!
//! Boxes are processed concurrently on the rayon pool, cells of one box sequentially.
//! Every function returns only after all boxes are done, so the return is the
//! synchronisation point before the next step may read the result.
use crate::AmrGrid::index_box::{IndexBox, IntVect};
use crate::AmrGrid::multifab::{Fab, MultiFab};
use rayon::prelude::*;

/// Calls `kernel(box_no, valid_box, fab)` once per box of `mf`.
pub fn parallel_for_boxes<F>(mf: &mut MultiFab, kernel: F)
where
    F: Fn(usize, &IndexBox, &mut Fab) + Sync + Send,
{
    let MultiFab { boxes, fabs, .. } = mf;
    fabs.par_iter_mut()
        .zip(boxes.par_iter())
        .enumerate()
        .for_each(|(box_no, (fab, bx))| kernel(box_no, bx, fab));
}

/// Calls `kernel(box_no, cell, fab)` for every valid cell of `mf`.
pub fn parallel_for<F>(mf: &mut MultiFab, kernel: F)
where
    F: Fn(usize, IntVect, &mut Fab) + Sync + Send,
{
    parallel_for_boxes(mf, |box_no, bx, fab| {
        for iv in bx.cells() {
            kernel(box_no, iv, fab);
        }
    });
}

/// Deterministic sum of `term(box_no, valid_box, fab)` over the boxes of `mf`.
///
/// Partial sums are computed in parallel and accumulated in box order, so the
/// result does not depend on the scheduling of the pool.
pub fn parallel_sum<F>(mf: &MultiFab, term: F) -> f64
where
    F: Fn(usize, &IndexBox, &Fab) -> f64 + Sync + Send,
{
    let partial: Vec<f64> = mf
        .fabs
        .par_iter()
        .zip(mf.boxes.par_iter())
        .enumerate()
        .map(|(box_no, (fab, bx))| term(box_no, bx, fab))
        .collect();
    partial.iter().sum()
}
