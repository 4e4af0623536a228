//! Interfaces to the parts of the flow solver this crate does not implement:
//! chemistry, transport and the patch-fill machinery of the mesh.
//!
//! Each trait comes with a minimal implementation so the divergence constraint can be
//! assembled and tested without the full solver.
use crate::AmrGrid::hierarchy::AmrHierarchy;
use crate::AmrGrid::index_box::{IntVect, coarsen_iv};
use crate::AmrGrid::multifab::MultiFab;
use crate::LowMach::level_data::{AdvanceDiffData, LevelData};
use crate::LowMach::state_layout::{StateLayout, TimeStamp};
use crate::Thermodynamics::eos_closure::EosModel;
use rayon::prelude::*;

/// Source of instantaneous species production rates.
pub trait ReactionRateProvider: Sync {
    /// writes the production rates of every species, kg/(m³ s), into the `nspec` components of `out`
    fn instantaneous_rate(
        &self,
        lev: usize,
        time: TimeStamp,
        state: &MultiFab,
        layout: &StateLayout,
        eos: &EosModel,
        out: &mut MultiFab,
    );
}

/// Non-reacting mixture.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReactions;

impl ReactionRateProvider for NoReactions {
    fn instantaneous_rate(
        &self,
        _lev: usize,
        _time: TimeStamp,
        _state: &MultiFab,
        _layout: &StateLayout,
        _eos: &EosModel,
        out: &mut MultiFab,
    ) {
        out.set_val(0.0);
    }
}

/// Transport: diffusivities and the diffusion terms entering the divergence constraint.
pub trait DiffusionProvider {
    fn calc_diffusivity(&mut self, time: TimeStamp, levels: &[LevelData], layout: &StateLayout);
    /// fills the species, Fourier and differential diffusion components of `diff_data` at `time`
    fn compute_differential_diffusion_terms(
        &mut self,
        time: TimeStamp,
        levels: &[LevelData],
        layout: &StateLayout,
        diff_data: &mut AdvanceDiffData,
        is_init: bool,
    );
}

/// Diffusion terms computed elsewhere: the buffers are used as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrozenDiffusion;

impl DiffusionProvider for FrozenDiffusion {
    fn calc_diffusivity(&mut self, _time: TimeStamp, _levels: &[LevelData], _layout: &StateLayout) {}
    fn compute_differential_diffusion_terms(
        &mut self,
        _time: TimeStamp,
        _levels: &[LevelData],
        _layout: &StateLayout,
        _diff_data: &mut AdvanceDiffData,
        _is_init: bool,
    ) {
    }
}

/// Fills the ghost cells of a level field.
pub trait PatchFiller: Sync {
    /// `crse` is the same field on level `lev - 1`, absent on level 0
    fn fill_patch(
        &self,
        hierarchy: &AmrHierarchy,
        lev: usize,
        time: f64,
        mf: &mut MultiFab,
        crse: Option<&MultiFab>,
        ngrow: usize,
    );
}

/// The collaborators needed to assemble the divergence constraint.
pub struct Collaborators<'a> {
    pub reactions: &'a dyn ReactionRateProvider,
    pub diffusion: &'a mut dyn DiffusionProvider,
    pub filler: &'a dyn PatchFiller,
}

impl<'a> Collaborators<'a> {
    pub fn new(
        reactions: &'a dyn ReactionRateProvider,
        diffusion: &'a mut dyn DiffusionProvider,
        filler: &'a dyn PatchFiller,
    ) -> Self {
        Self {
            reactions,
            diffusion,
            filler,
        }
    }
}

/// Ghost cells take the value of the same-level box that owns them, else of the
/// coarse cell below them, else of the nearest valid cell. Cells outside of the
/// domain are first moved to the nearest domain cell (zero-gradient boundary).
#[derive(Debug, Clone, Copy, Default)]
pub struct PiecewiseConstantFiller;

impl PiecewiseConstantFiller {
    fn source_value(
        hierarchy: &AmrHierarchy,
        lev: usize,
        mf: &MultiFab,
        crse: Option<&MultiFab>,
        box_no: usize,
        iv: IntVect,
        n: usize,
    ) -> f64 {
        let domain = hierarchy.geom(lev).domain;
        let iv = domain.clamp(iv);
        if let Some(v) = mf.value_at(iv, n) {
            return v;
        }
        if let (Some(crse), true) = (crse, lev > 0) {
            let civ = coarsen_iv(iv, hierarchy.ref_ratio(lev - 1), hierarchy.dim());
            if let Some(v) = crse.value_at(civ, n) {
                return v;
            }
        }
        let own = mf.valid_box(box_no);
        mf.fab(box_no).get(own.clamp(iv), n)
    }
}

impl PatchFiller for PiecewiseConstantFiller {
    fn fill_patch(
        &self,
        hierarchy: &AmrHierarchy,
        lev: usize,
        _time: f64,
        mf: &mut MultiFab,
        crse: Option<&MultiFab>,
        ngrow: usize,
    ) {
        let ngrow = ngrow.min(mf.n_grow());
        if ngrow == 0 {
            return;
        }
        let dim = mf.dim();
        let ncomp = mf.ncomp();
        // values are gathered from the unmodified field first, then written
        let updates: Vec<Vec<(IntVect, usize, f64)>> = {
            let src: &MultiFab = mf;
            (0..src.n_boxes())
                .into_par_iter()
                .map(|box_no| {
                    let valid = *src.valid_box(box_no);
                    let grown = valid.grow(ngrow as i32, dim);
                    grown
                        .cells()
                        .filter(|&iv| !valid.contains(iv))
                        .flat_map(|iv| {
                            (0..ncomp).map(move |n| {
                                let v =
                                    Self::source_value(hierarchy, lev, src, crse, box_no, iv, n);
                                (iv, n, v)
                            })
                        })
                        .collect()
                })
                .collect()
        };
        for (box_no, cells) in updates.into_iter().enumerate() {
            let fab = mf.fab_mut(box_no);
            for (iv, n, v) in cells {
                fab.set(iv, n, v);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AmrGrid::geometry::Geometry;
    use crate::AmrGrid::hierarchy::AmrLevel;
    use crate::AmrGrid::index_box::IndexBox;
    use crate::AmrGrid::parallel::parallel_for;

    fn two_level() -> AmrHierarchy {
        let geom0 = Geometry::new(
            IndexBox::new_2d([0, 0], [7, 7]),
            [0.0; 3],
            [1.0, 1.0, 0.0],
            2,
        );
        let geom1 = geom0.refine(2);
        let l0 = AmrLevel::new(
            geom0,
            vec![
                IndexBox::new_2d([0, 0], [3, 7]),
                IndexBox::new_2d([4, 0], [7, 7]),
            ],
        );
        let l1 = AmrLevel::new(geom1, vec![IndexBox::new_2d([4, 4], [7, 7])]);
        AmrHierarchy::new(vec![l0, l1], vec![2]).unwrap()
    }

    #[test]
    fn test_ghosts_from_neighbour_box_and_boundary() {
        let h = two_level();
        let mut mf = MultiFab::new(h.grids(0), 1, 1, 2);
        parallel_for(&mut mf, |_, iv, fab| fab.set(iv, 0, iv[0] as f64));
        PiecewiseConstantFiller.fill_patch(&h, 0, 0.0, &mut mf, None, 1);
        // ghost of box 0 at i = 4 lies in box 1
        assert_eq!(mf.fab(0).get([4, 3, 0], 0), 4.0);
        // ghost of box 1 at i = 3 lies in box 0
        assert_eq!(mf.fab(1).get([3, 3, 0], 0), 3.0);
        // outside of the domain: zero-gradient
        assert_eq!(mf.fab(0).get([-1, 3, 0], 0), 0.0);
        assert_eq!(mf.fab(1).get([8, -1, 0], 0), 7.0);
    }

    #[test]
    fn test_ghosts_from_coarse_level() {
        let h = two_level();
        let mut crse = MultiFab::new(h.grids(0), 1, 0, 2);
        parallel_for(&mut crse, |_, iv, fab| fab.set(iv, 0, (10 * iv[0] + iv[1]) as f64));
        let mut fine = MultiFab::new(h.grids(1), 1, 1, 2);
        fine.set_val(-1.0);
        fine.set_val_comp(5.0, 0);
        PiecewiseConstantFiller.fill_patch(&h, 1, 0.0, &mut fine, Some(&crse), 1);
        // fine ghost (3, 5) sits above coarse cell (1, 2)
        assert_eq!(fine.fab(0).get([3, 5, 0], 0), 12.0);
        assert_eq!(fine.fab(0).get([8, 8, 0], 0), 44.0);
        assert_eq!(fine.fab(0).get([5, 5, 0], 0), 5.0);
    }

    #[test]
    fn test_no_reactions_zeroes_rates() {
        use crate::Thermodynamics::eos_closure::EosConfig;
        let h = two_level();
        let eos = EosModel::from_config(&EosConfig::default()).unwrap();
        let layout = StateLayout::new(2, 2);
        let state = MultiFab::new(h.grids(0), layout.nvar(), 0, 2);
        let mut rates = MultiFab::new(h.grids(0), 2, 0, 2);
        rates.set_val(3.0);
        NoReactions.instantaneous_rate(0, TimeStamp::New, &state, &layout, &eos, &mut rates);
        assert_eq!(rates.min_max(1), (0.0, 0.0));
    }
}
