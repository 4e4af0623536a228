//! Consistency of divU between levels: fine data replaces the coarse data underneath,
//! and ghost cells are filled from neighbours and the coarser level.
use crate::AmrGrid::eb::EbFactory;
use crate::AmrGrid::index_box::{IndexBox, coarsen_iv};
use crate::AmrGrid::multifab::MultiFab;
use crate::AmrGrid::parallel::parallel_for_boxes;
use crate::LowMach::collaborators::PatchFiller;
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::state_layout::TimeStamp;
use log::debug;

/// Replaces components `comp..comp + ncomp` of the coarse cells lying under `fine` by the
/// mean of their `ratio^dim` children.
///
/// With EB data on the fine level the mean is weighted by the volume fractions; a coarse
/// cell whose children are all solid gets 0.
pub fn average_down(
    fine: &MultiFab,
    crse: &mut MultiFab,
    fine_eb: Option<&EbFactory>,
    ratio: i32,
    comp: usize,
    ncomp: usize,
) {
    let dim = fine.dim();
    parallel_for_boxes(crse, |_, cbx, cfab| {
        for (fine_no, fbx) in fine.boxes().iter().enumerate() {
            let Some(overlap) = fbx.coarsen(ratio, dim).intersect(cbx) else {
                continue;
            };
            let ffab = fine.fab(fine_no);
            for civ in overlap.cells() {
                let children = IndexBox::new(civ, civ).refine(ratio, dim);
                debug_assert!(children.cells().all(|iv| coarsen_iv(iv, ratio, dim) == civ));
                for n in comp..comp + ncomp {
                    let value = match fine_eb {
                        None => {
                            let sum: f64 = children.cells().map(|iv| ffab.get(iv, n)).sum();
                            sum / children.num_cells() as f64
                        }
                        Some(eb) => {
                            let (vsum, vfsum) = children.cells().fold((0.0, 0.0), |(vs, vfs), iv| {
                                let vf = eb.vfrac(fine_no, iv);
                                (vs + vf * ffab.get(iv, n), vfs + vf)
                            });
                            if vfsum > 0.0 { vsum / vfsum } else { 0.0 }
                        }
                    };
                    cfab.set(civ, n, value);
                }
            }
        }
    });
}

impl LowMachSolver {
    /// Averages divU down from the finest level to level 0, one level pair at a time.
    pub fn average_down_divu(&mut self, time: TimeStamp) {
        let levels = match time {
            TimeStamp::Old => &mut self.leveldata_old,
            TimeStamp::New => &mut self.leveldata_new,
        };
        let finest = self.hierarchy.finest_level();
        for lev in (1..=finest).rev() {
            let ratio = self.hierarchy.ref_ratio(lev - 1);
            let (coarse, fine) = levels.split_at_mut(lev);
            average_down(
                &fine[0].divu,
                &mut coarse[lev - 1].divu,
                self.hierarchy.eb(lev),
                ratio,
                0,
                1,
            );
            debug!("divU ({}) averaged down from level {} to {}", time, lev, lev - 1);
        }
    }

    /// Fills `n_grow_divu` ghost cells of divU on every level at the level time.
    pub fn fill_divu_ghosts(&mut self, time: TimeStamp, filler: &dyn PatchFiller) {
        let ngrow = self.config.n_grow_divu;
        for lev in 0..=self.hierarchy.finest_level() {
            let level_time = self.get_time(lev, time);
            let levels = match time {
                TimeStamp::Old => &mut self.leveldata_old,
                TimeStamp::New => &mut self.leveldata_new,
            };
            let (coarse, rest) = levels.split_at_mut(lev);
            let crse = coarse.last().map(|ld| &ld.divu);
            filler.fill_patch(&self.hierarchy, lev, level_time, &mut rest[0].divu, crse, ngrow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmrGrid::index_box::IntVect;
    use crate::AmrGrid::parallel::parallel_for;

    #[test]
    fn test_average_down_2d() {
        let fine_boxes = [IndexBox::new_2d([4, 4], [7, 7])];
        let mut fine = MultiFab::new(&fine_boxes, 1, 0, 2);
        parallel_for(&mut fine, |_, iv, fab| fab.set(iv, 0, (iv[0] + 10 * iv[1]) as f64));
        let mut crse = MultiFab::new(&[IndexBox::new_2d([0, 0], [7, 7])], 1, 0, 2);
        crse.set_val(-1.0);
        average_down(&fine, &mut crse, None, 2, 0, 1);
        // children of (2, 2): (4..5, 4..5) -> mean 4.5 + 45
        assert_eq!(crse.fab(0).get([2, 2, 0], 0), 49.5);
        assert_eq!(crse.fab(0).get([3, 3, 0], 0), 6.5 + 65.0);
        assert_eq!(crse.fab(0).get([1, 1, 0], 0), -1.0);
    }

    #[test]
    fn test_average_down_3d() {
        let fine_boxes = [IndexBox::new([0, 0, 0], [3, 3, 3])];
        let mut fine = MultiFab::new(&fine_boxes, 2, 0, 3);
        parallel_for(&mut fine, |_, iv: IntVect, fab| {
            fab.set(iv, 1, (iv[0] + iv[1] + iv[2]) as f64);
        });
        let mut crse = MultiFab::new(&[IndexBox::new([0, 0, 0], [3, 3, 3])], 2, 0, 3);
        average_down(&fine, &mut crse, None, 2, 1, 1);
        // eight children of (1, 1, 1) sum their index sums 6..=9 evenly
        assert_eq!(crse.fab(0).get([1, 1, 1], 1), 7.5);
        assert_eq!(crse.fab(0).get([0, 0, 0], 1), 1.5);
    }

    #[test]
    fn test_average_down_with_eb() {
        let fine_boxes = [IndexBox::new_2d([0, 0], [3, 3])];
        let eb = EbFactory::from_covered_cells(&fine_boxes, 2, |iv| iv[0] == 0 || iv[1] >= 2);
        let mut fine = MultiFab::new(&fine_boxes, 1, 0, 2);
        parallel_for(&mut fine, |_, iv, fab| fab.set(iv, 0, iv[0] as f64));
        let mut crse = MultiFab::new(&[IndexBox::new_2d([0, 0], [1, 1])], 1, 0, 2);
        crse.set_val(9.0);
        average_down(&fine, &mut crse, Some(&eb), 2, 0, 1);
        // only the children with i = 1 are fluid
        assert_eq!(crse.fab(0).get([0, 0, 0], 0), 1.0);
        assert_eq!(crse.fab(0).get([1, 0, 0], 0), 2.5);
        // all children solid
        assert_eq!(crse.fab(0).get([0, 1, 0], 0), 0.0);
    }
}
