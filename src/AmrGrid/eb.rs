//! Embedded-boundary data of a level as seen by the low-Mach kernels.
//!
//! The geometry itself comes from outside; this module stores the per-cell volume
//! fractions and classifies every box once so kernels can dispatch per box.
use crate::AmrGrid::index_box::{IndexBox, IntVect};
use crate::AmrGrid::multifab::MultiFab;
use crate::AmrGrid::parallel::parallel_for_boxes;

/// Classification of a box against the solid geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxCoverage {
    /// no solid in the box
    Regular,
    /// every cell is solid
    Covered,
    /// cut or covered cells mixed with fluid cells
    Partial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EbFactory {
    vfrac: MultiFab,
    coverage: Vec<BoxCoverage>,
}

impl EbFactory {
    /// `vfrac` is the fluid volume fraction of every valid cell (0 covered, 1 regular)
    pub fn from_volume_fractions(vfrac: MultiFab) -> Self {
        let coverage = (0..vfrac.n_boxes())
            .map(|b| {
                let fab = vfrac.fab(b);
                let cells = vfrac.valid_box(b).cells();
                let (mut all_fluid, mut all_solid) = (true, true);
                for iv in cells {
                    let vf = fab.get(iv, 0);
                    all_fluid &= vf >= 1.0;
                    all_solid &= vf <= 0.0;
                }
                match (all_fluid, all_solid) {
                    (true, _) => BoxCoverage::Regular,
                    (_, true) => BoxCoverage::Covered,
                    _ => BoxCoverage::Partial,
                }
            })
            .collect();
        Self { vfrac, coverage }
    }

    /// staircase geometry: cells for which `is_covered` holds are solid, all others regular
    pub fn from_covered_cells<F>(boxes: &[IndexBox], dim: usize, is_covered: F) -> Self
    where
        F: Fn(IntVect) -> bool + Sync + Send,
    {
        let mut vfrac = MultiFab::new(boxes, 1, 0, dim);
        parallel_for_boxes(&mut vfrac, |_, bx, fab| {
            for iv in bx.cells() {
                fab.set(iv, 0, if is_covered(iv) { 0.0 } else { 1.0 });
            }
        });
        Self::from_volume_fractions(vfrac)
    }

    pub fn coverage(&self, box_no: usize) -> BoxCoverage {
        self.coverage[box_no]
    }
    pub fn vfrac(&self, box_no: usize, iv: IntVect) -> f64 {
        self.vfrac.fab(box_no).get(iv, 0)
    }
    pub fn is_covered(&self, box_no: usize, iv: IntVect) -> bool {
        self.vfrac(box_no, iv) <= 0.0
    }
    pub fn volume_fractions(&self) -> &MultiFab {
        &self.vfrac
    }

    /// sets every component of the covered valid cells of `mf` to `value`
    pub fn set_covered(&self, mf: &mut MultiFab, value: f64) {
        let ncomp = mf.ncomp();
        parallel_for_boxes(mf, |box_no, bx, fab| match self.coverage[box_no] {
            BoxCoverage::Regular => {}
            BoxCoverage::Covered | BoxCoverage::Partial => {
                for iv in bx.cells().filter(|&iv| self.is_covered(box_no, iv)) {
                    for n in 0..ncomp {
                        fab.set(iv, n, value);
                    }
                }
            }
        });
    }
}
