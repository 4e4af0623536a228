//! # Divergence constraint
//!
//! Assembles the velocity divergence S = div(U) imposed by the low-Mach model:
//!
//! ```text
//! S = (DiffDiff + Fourier) / (rho cp T)
//!   + sum_k (D_k + r_k + ext_k) (Wbar / (W_k rho) - h_k / (rho cp T))
//!   + ext_h / (rho cp T)
//! ```
//!
//! The per-cell formula lives in [`DivUCell`]; [`LowMachSolver::calc_divu`] applies it to
//! every level, zeroes solid cells, then makes the levels consistent and fills ghost cells.
use crate::AmrGrid::eb::BoxCoverage;
use crate::AmrGrid::index_box::IntVect;
use crate::AmrGrid::multifab::{Fab, MultiFab};
use crate::AmrGrid::parallel::parallel_for_boxes;
use crate::LowMach::collaborators::Collaborators;
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::errors::LowMachError;
use crate::LowMach::level_data::AdvanceDiffData;
use crate::LowMach::state_layout::{StateLayout, TimeStamp};
use crate::Thermodynamics::eos_closure::{EosCalculator, EosModel, units};
use log::debug;

/// Switches of [`LowMachSolver::calc_divu`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivUOptions {
    /// initial iterations: reaction rates come from the stored estimate (or are zero before the first step)
    pub is_init: bool,
    /// recompute the diffusion terms instead of using the buffers as they are
    pub compute_diff: bool,
    /// average the fine levels down onto the coarse ones
    pub do_avg_down: bool,
    /// fill the ghost cells of divU
    pub fill_ghosts: bool,
}

impl Default for DivUOptions {
    fn default() -> Self {
        Self {
            is_init: false,
            compute_diff: false,
            do_avg_down: true,
            fill_ghosts: true,
        }
    }
}

/// Inputs of the divergence constraint in one cell, MKS.
#[derive(Debug, Clone, PartialEq)]
pub struct DivUCell {
    /// species partial densities, kg/m³
    pub rho_y: Vec<f64>,
    /// temperature, K
    pub t: f64,
    /// species diffusion terms, kg/(m³ s)
    pub spec_d: Vec<f64>,
    /// thermal conduction term, W/m³
    pub fourier: f64,
    /// differential diffusion enthalpy term, W/m³
    pub diff_diff: f64,
    /// species production rates, kg/(m³ s)
    pub r: Vec<f64>,
    /// external species sources, kg/(m³ s)
    pub ext_rho_y: Vec<f64>,
    /// external enthalpy source, W/m³
    pub ext_rho_h: f64,
    y: Vec<f64>,
    hi: Vec<f64>,
}

impl DivUCell {
    pub fn new(nspec: usize) -> Self {
        Self {
            rho_y: vec![0.0; nspec],
            t: 0.0,
            spec_d: vec![0.0; nspec],
            fourier: 0.0,
            diff_diff: 0.0,
            r: vec![0.0; nspec],
            ext_rho_y: vec![0.0; nspec],
            ext_rho_h: 0.0,
            y: vec![0.0; nspec],
            hi: vec![0.0; nspec],
        }
    }

    /// gathers the inputs of cell `iv` from the level arrays
    fn load(
        &mut self,
        iv: IntVect,
        layout: &StateLayout,
        state: &Fab,
        diff: &Fab,
        rates: Option<&Fab>,
        ext: &Fab,
    ) {
        let nspec = layout.nspec;
        state.get_components(iv, layout.first_spec(), &mut self.rho_y);
        self.t = state.get(iv, layout.temp());
        diff.get_components(iv, 0, &mut self.spec_d);
        self.fourier = diff.get(iv, nspec);
        self.diff_diff = diff.get(iv, nspec + 1);
        if let Some(rates) = rates {
            rates.get_components(iv, 0, &mut self.r);
        }
        ext.get_components(iv, layout.first_spec(), &mut self.ext_rho_y);
        self.ext_rho_h = ext.get(iv, layout.rhoh());
    }

    /// divergence constraint of the cell, 1/s; `r` is used only when `use_react` holds
    pub fn divu(&mut self, eos: &EosModel, use_react: bool) -> f64 {
        let rho: f64 = self.rho_y.iter().sum();
        let rhoinv = 1.0 / rho;
        for (y, rho_y) in self.y.iter_mut().zip(self.rho_y.iter()) {
            *y = rho_y * rhoinv;
        }
        let wbar = eos.wbar(&self.y);
        let cpmix = eos.ty2cp(self.t, &self.y) * units::ENERGY_CGS_TO_MKS;
        eos.t2hi(self.t, &mut self.hi);
        let denominv = 1.0 / (rho * cpmix * self.t);
        let inv_mw = eos.species().inv_molecular_weights();

        let mut divu = (self.diff_diff + self.fourier) * denominv;
        for k in 0..self.rho_y.len() {
            let hi = self.hi[k] * units::ENERGY_CGS_TO_MKS;
            let source = self.spec_d[k] + if use_react { self.r[k] } else { 0.0 } + self.ext_rho_y[k];
            divu += source * (inv_mw[k] * wbar * rhoinv - hi * denominv);
        }
        divu + self.ext_rho_h * denominv
    }
}

impl LowMachSolver {
    /// Divergence constraint on every level at `time`.
    ///
    /// `diff_data` holds the diffusion terms; it is refreshed through the diffusion
    /// collaborator only when `opts.compute_diff` is set.
    pub fn calc_divu(
        &mut self,
        opts: DivUOptions,
        time: TimeStamp,
        diff_data: &mut AdvanceDiffData,
        collab: &mut Collaborators,
    ) -> Result<(), LowMachError> {
        if diff_data.nspec() != self.layout.nspec {
            return Err(LowMachError::SpeciesCountMismatch {
                expected: self.layout.nspec,
                got: diff_data.nspec(),
            });
        }
        self.check_layout(diff_data.at(time))?;

        if opts.compute_diff {
            let levels = self.levels(time);
            collab.diffusion.calc_diffusivity(time, levels, &self.layout);
            collab.diffusion.compute_differential_diffusion_terms(
                time,
                levels,
                &self.layout,
                diff_data,
                opts.is_init,
            );
        }

        let use_react = self.config.use_reaction_rates();
        let layout = self.layout;
        for lev in 0..=self.finest_level() {
            let rates = if use_react {
                let mut rates = MultiFab::new(self.hierarchy.grids(lev), layout.nspec, 0, layout.dim);
                match (opts.is_init, self.dt > 0.0) {
                    (true, true) => {
                        rates.copy_from(&self.leveldata_react[lev].i_r, 0, 0, layout.nspec)
                    }
                    // pressure iterations before the first step
                    (true, false) => rates.set_val(0.0),
                    (false, _) => collab.reactions.instantaneous_rate(
                        lev,
                        time,
                        &self.level_data(lev, time).state,
                        &layout,
                        &self.eos,
                        &mut rates,
                    ),
                }
                Some(rates)
            } else {
                None
            };

            let eos = &self.eos;
            let eb = self.hierarchy.eb(lev);
            let ext = &self.ext_source[lev];
            let diff = &diff_data.at(time)[lev];
            let ldata = match time {
                TimeStamp::Old => &mut self.leveldata_old[lev],
                TimeStamp::New => &mut self.leveldata_new[lev],
            };
            let state = &ldata.state;
            let rates = rates.as_ref();
            parallel_for_boxes(&mut ldata.divu, |box_no, bx, fab| {
                let mut cell = DivUCell::new(layout.nspec);
                let mut eval = |iv: IntVect, fab: &mut Fab| {
                    cell.load(
                        iv,
                        &layout,
                        state.fab(box_no),
                        diff.fab(box_no),
                        rates.map(|r| r.fab(box_no)),
                        ext.fab(box_no),
                    );
                    fab.set(iv, 0, cell.divu(eos, use_react));
                };
                match eb.map(|eb| (eb, eb.coverage(box_no))) {
                    Some((_, BoxCoverage::Covered)) => {
                        for iv in bx.cells() {
                            fab.set(iv, 0, 0.0);
                        }
                    }
                    Some((eb, BoxCoverage::Partial)) => {
                        for iv in bx.cells() {
                            if eb.is_covered(box_no, iv) {
                                fab.set(iv, 0, 0.0);
                            } else {
                                eval(iv, fab);
                            }
                        }
                    }
                    Some((_, BoxCoverage::Regular)) | None => {
                        for iv in bx.cells() {
                            eval(iv, fab);
                        }
                    }
                }
            });
            let (min, max) = ldata.divu.min_max(0);
            debug!("divU ({}) on level {}: min {:e}, max {:e}", time, lev, min, max);
        }

        if opts.do_avg_down {
            self.average_down_divu(time);
        }
        if opts.fill_ghosts {
            self.fill_divu_ghosts(time, collab.filler);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Thermodynamics::eos_closure::{ConstantCpMix, SpeciesSet};
    use approx::assert_relative_eq;

    /// single species with cp = 1000 J/(kg K) and h = cp T
    fn one_species() -> EosModel {
        let species = SpeciesSet::new(vec!["A".to_string()], vec![29.0]).unwrap();
        EosModel::ConstantCpMix(ConstantCpMix {
            species,
            cp: vec![1000.0 * units::ENERGY_MKS_TO_CGS],
            h_ref: vec![0.0],
            t_ref: 0.0,
        })
    }

    #[test]
    fn test_zero_sources_give_zero() {
        let eos = one_species();
        let mut cell = DivUCell::new(1);
        cell.rho_y[0] = 1.2;
        cell.t = 300.0;
        assert_eq!(cell.divu(&eos, true), 0.0);
    }

    #[test]
    fn test_heat_source() {
        let eos = one_species();
        let mut cell = DivUCell::new(1);
        cell.rho_y[0] = 2.0;
        cell.t = 500.0;
        cell.ext_rho_h = 1.0e6;
        // S = q / (rho cp T)
        assert_relative_eq!(cell.divu(&eos, false), 1.0e6 / (2.0 * 1000.0 * 500.0), epsilon = 1e-12);
        cell.fourier = 1.0e6;
        assert_relative_eq!(cell.divu(&eos, false), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reaction_rates_only_when_requested() {
        // light A and heavy B with equal cp and h = cp T
        let species = SpeciesSet::new(vec!["A".to_string(), "B".to_string()], vec![2.0, 4.0]).unwrap();
        let eos = EosModel::ConstantCpMix(ConstantCpMix {
            species,
            cp: vec![1000.0 * units::ENERGY_MKS_TO_CGS; 2],
            h_ref: vec![0.0; 2],
            t_ref: 0.0,
        });
        let mut cell = DivUCell::new(2);
        cell.rho_y = vec![0.5, 0.5];
        cell.t = 400.0;
        // B -> A raises the number of moles
        cell.r = vec![1.0, -1.0];
        assert_eq!(cell.divu(&eos, false), 0.0);
        assert_relative_eq!(cell.divu(&eos, true), 2.0 / 3.0, epsilon = 1e-12);
    }
}
