use crate::AmrGrid::hierarchy::AmrHierarchy;
use crate::AmrGrid::index_box::IndexBox;
use crate::AmrGrid::multifab::MultiFab;
use crate::LowMach::state_layout::{StateLayout, TimeStamp};

/// State and divergence constraint of one level at one time.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub state: MultiFab,
    pub divu: MultiFab,
}

impl LevelData {
    pub fn new(grids: &[IndexBox], layout: &StateLayout, n_grow_divu: usize) -> Self {
        Self {
            state: MultiFab::new(grids, layout.nvar(), 0, layout.dim),
            divu: MultiFab::new(grids, 1, n_grow_divu, layout.dim),
        }
    }
}

/// Reaction data kept between steps.
#[derive(Debug, Clone)]
pub struct LevelDataReact {
    /// stored estimate of the species production rates, kg/(m³ s)
    pub i_r: MultiFab,
}

impl LevelDataReact {
    pub fn new(grids: &[IndexBox], layout: &StateLayout) -> Self {
        Self {
            i_r: MultiFab::new(grids, layout.nspec, 0, layout.dim),
        }
    }
}

/// Diffusion terms of the old and new time on every level.
///
/// Components: `[0, nspec)` species diffusion, `nspec` Fourier (thermal) term,
/// `nspec + 1` differential diffusion correction.
#[derive(Debug, Clone)]
pub struct AdvanceDiffData {
    pub diff_old: Vec<MultiFab>,
    pub diff_new: Vec<MultiFab>,
    nspec: usize,
}

impl AdvanceDiffData {
    pub fn new(hierarchy: &AmrHierarchy, nspec: usize) -> Self {
        let make = || -> Vec<MultiFab> {
            (0..hierarchy.num_levels())
                .map(|lev| MultiFab::new(hierarchy.grids(lev), nspec + 2, 0, hierarchy.dim()))
                .collect()
        };
        Self {
            diff_old: make(),
            diff_new: make(),
            nspec,
        }
    }
    pub fn at(&self, time: TimeStamp) -> &[MultiFab] {
        match time {
            TimeStamp::Old => &self.diff_old,
            TimeStamp::New => &self.diff_new,
        }
    }
    pub fn at_mut(&mut self, time: TimeStamp) -> &mut [MultiFab] {
        match time {
            TimeStamp::Old => &mut self.diff_old,
            TimeStamp::New => &mut self.diff_new,
        }
    }
    pub fn nspec(&self) -> usize {
        self.nspec
    }
    pub fn fourier_comp(&self) -> usize {
        self.nspec
    }
    pub fn diffdiff_comp(&self) -> usize {
        self.nspec + 1
    }
}

/// Advection data shared with the projection: the MAC divergence before the closed-chamber correction.
#[derive(Debug, Clone)]
pub struct AdvanceAdvData {
    pub mac_divu: Vec<MultiFab>,
}

impl AdvanceAdvData {
    pub fn new(hierarchy: &AmrHierarchy) -> Self {
        Self {
            mac_divu: (0..hierarchy.num_levels())
                .map(|lev| MultiFab::new(hierarchy.grids(lev), 1, 0, hierarchy.dim()))
                .collect(),
        }
    }
}
