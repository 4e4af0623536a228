//! # Low-Mach solver context
//!
//! ## Purpose
//! Owns everything the thermodynamic and divergence-constraint operations share between
//! calls: the level hierarchy, the Old/New level data, the stored reaction rates, the
//! external sources, the ambient pressure pair, the step size and the boundary flux
//! balance of the projection.
//!
//! ## Usage
//! The time-advance loop builds one [`LowMachSolver`] and passes it by `&mut` to every
//! step; the operations of the sibling modules are methods of this struct.
//!
//! ```rust
//! use ThermoDivU::AmrGrid::geometry::Geometry;
//! use ThermoDivU::AmrGrid::hierarchy::AmrHierarchy;
//! use ThermoDivU::AmrGrid::index_box::IndexBox;
//! use ThermoDivU::LowMach::context::LowMachSolver;
//! use ThermoDivU::settings::SolverConfig;
//!
//! let domain = IndexBox::new_2d([0, 0], [7, 7]);
//! let geom = Geometry::new(domain, [0.0; 3], [1.0, 1.0, 0.0], 2);
//! let hierarchy = AmrHierarchy::single_level(geom, vec![domain]).unwrap();
//! let solver = LowMachSolver::new(SolverConfig::default(), hierarchy).unwrap();
//! assert_eq!(solver.ambient.p_old, 101325.0);
//! ```
use crate::AmrGrid::eb::EbFactory;
use crate::AmrGrid::hierarchy::{AmrHierarchy, GridError};
use crate::AmrGrid::multifab::MultiFab;
use crate::LowMach::errors::LowMachError;
use crate::LowMach::level_data::{LevelData, LevelDataReact};
use crate::LowMach::state_layout::{StateLayout, TimeStamp};
use crate::Thermodynamics::eos_closure::{EosCalculator, EosModel};
use crate::settings::SolverConfig;
use log::{debug, info};

/// Thermodynamic (ambient) pressure of a closed domain, Pa.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientPressure {
    pub p_old: f64,
    pub p_new: f64,
    /// rate of change over the last step, Pa/s
    pub dp0dt: f64,
}

impl AmbientPressure {
    pub fn uniform(p: f64) -> Self {
        Self {
            p_old: p,
            p_new: p,
            dp0dt: 0.0,
        }
    }
}

pub struct LowMachSolver {
    pub config: SolverConfig,
    pub eos: EosModel,
    pub layout: StateLayout,
    pub hierarchy: AmrHierarchy,
    pub leveldata_old: Vec<LevelData>,
    pub leveldata_new: Vec<LevelData>,
    pub leveldata_react: Vec<LevelDataReact>,
    /// external source terms in the state layout
    pub ext_source: Vec<MultiFab>,
    pub ambient: AmbientPressure,
    /// current step size, s
    pub dt: f64,
    /// time of the old data of every level
    pub t_old: Vec<f64>,
    /// time of the new data of every level
    pub t_new: Vec<f64>,
    /// time at which operations without a level-specific time are performed
    pub cur_time: f64,
    /// integral of the MAC velocity over each domain face (x-lo, x-hi, y-lo, y-hi, z-lo, z-hi), m³/s
    pub domain_umac_flux: [f64; 6],
    pub mass_old: f64,
    pub mass_new: f64,
}

impl LowMachSolver {
    pub fn new(config: SolverConfig, hierarchy: AmrHierarchy) -> Result<Self, LowMachError> {
        config.validate()?;
        let eos = EosModel::from_config(&config.eos)?;
        let layout = StateLayout::new(hierarchy.dim(), eos.nspec());
        let nlev = hierarchy.num_levels();
        let make_level = |lev: usize| LevelData::new(hierarchy.grids(lev), &layout, config.n_grow_divu);
        let leveldata_old = (0..nlev).map(make_level).collect();
        let leveldata_new = (0..nlev).map(make_level).collect();
        let leveldata_react = (0..nlev)
            .map(|lev| LevelDataReact::new(hierarchy.grids(lev), &layout))
            .collect();
        let ext_source = (0..nlev)
            .map(|lev| MultiFab::new(hierarchy.grids(lev), layout.nvar(), 0, layout.dim))
            .collect();
        info!(
            "low-Mach context: {} level(s), {} species, uncovered volume {:e} m3",
            nlev,
            layout.nspec,
            hierarchy.uncovered_volume()
        );
        let ambient = AmbientPressure::uniform(config.p_ambient);
        Ok(Self {
            config,
            eos,
            layout,
            hierarchy,
            leveldata_old,
            leveldata_new,
            leveldata_react,
            ext_source,
            ambient,
            dt: 0.0,
            t_old: vec![0.0; nlev],
            t_new: vec![0.0; nlev],
            cur_time: 0.0,
            domain_umac_flux: [0.0; 6],
            mass_old: 0.0,
            mass_new: 0.0,
        })
    }

    pub fn finest_level(&self) -> usize {
        self.hierarchy.finest_level()
    }

    pub fn levels(&self, time: TimeStamp) -> &[LevelData] {
        match time {
            TimeStamp::Old => &self.leveldata_old,
            TimeStamp::New => &self.leveldata_new,
        }
    }

    pub fn levels_mut(&mut self, time: TimeStamp) -> &mut [LevelData] {
        match time {
            TimeStamp::Old => &mut self.leveldata_old,
            TimeStamp::New => &mut self.leveldata_new,
        }
    }

    pub fn level_data(&self, lev: usize, time: TimeStamp) -> &LevelData {
        &self.levels(time)[lev]
    }

    pub fn level_data_mut(&mut self, lev: usize, time: TimeStamp) -> &mut LevelData {
        &mut self.levels_mut(time)[lev]
    }

    /// physical time of the data of `lev` at `time`
    pub fn get_time(&self, lev: usize, time: TimeStamp) -> f64 {
        match time {
            TimeStamp::Old => self.t_old[lev],
            TimeStamp::New => self.t_new[lev],
        }
    }

    /// replaces the EB data of a level; the uncovered volume follows
    pub fn set_eb(&mut self, lev: usize, eb: Option<EbFactory>) -> Result<(), LowMachError> {
        self.hierarchy.set_eb(lev, eb)?;
        debug!("uncovered volume now {:e}", self.uncovered_volume());
        Ok(())
    }

    /// fluid volume of the domain, kept current by the hierarchy whenever its EB data change
    pub fn uncovered_volume(&self) -> f64 {
        self.hierarchy.uncovered_volume()
    }

    /// copies the new data into the old slot at the start of a step
    pub fn copy_new_to_old(&mut self) {
        self.leveldata_old.clone_from(&self.leveldata_new);
        self.t_old.clone_from(&self.t_new);
        self.ambient.p_old = self.ambient.p_new;
        self.mass_old = self.mass_new;
    }

    /// checks that a per-level field list matches the hierarchy level by level
    pub(crate) fn check_layout(&self, fields: &[MultiFab]) -> Result<(), LowMachError> {
        if fields.len() != self.hierarchy.num_levels() {
            return Err(GridError::LevelCountMismatch {
                expected: self.hierarchy.num_levels(),
                got: fields.len(),
            }
            .into());
        }
        match fields
            .iter()
            .enumerate()
            .find(|(lev, mf)| mf.boxes() != self.hierarchy.grids(*lev))
        {
            Some((lev, _)) => Err(LowMachError::LayoutMismatch(lev)),
            None => Ok(()),
        }
    }
}
