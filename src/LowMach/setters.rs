//! Pressure, temperature and density setters: point-wise EOS maps over every valid
//! cell of a level, converting between the MKS state and the CGS equation of state.
use crate::AmrGrid::parallel::parallel_for_boxes;
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::errors::LowMachError;
use crate::LowMach::state_layout::{StateLayout, TimeStamp};
use crate::Thermodynamics::eos_closure::{EosCalculator, units};
use log::debug;

impl LowMachSolver {
    /// thermodynamic pressure RHORT = P(rho, Y, T) on every level
    pub fn set_thermo_press(&mut self, time: TimeStamp) {
        for lev in 0..=self.finest_level() {
            self.set_thermo_press_level(lev, time);
        }
    }

    pub fn set_thermo_press_level(&mut self, lev: usize, time: TimeStamp) {
        let layout = self.layout;
        let eos = &self.eos;
        let state = match time {
            TimeStamp::Old => &mut self.leveldata_old[lev].state,
            TimeStamp::New => &mut self.leveldata_new[lev].state,
        };
        parallel_for_boxes(state, |_, bx, fab| {
            let mut y = vec![0.0; layout.nspec];
            for iv in bx.cells() {
                let rho = fab.get(iv, layout.density());
                fab.get_components(iv, layout.first_spec(), &mut y);
                y.iter_mut().for_each(|v| *v /= rho);
                let t = fab.get(iv, layout.temp());
                let p_cgs = eos.rty2p(rho * units::DENSITY_MKS_TO_CGS, t, &y);
                fab.set(iv, layout.rhort(), p_cgs * units::PRESSURE_CGS_TO_MKS);
            }
        });
    }

    /// temperature from (rho, Y, h) on every level
    pub fn set_temperature(&mut self, time: TimeStamp) {
        for lev in 0..=self.finest_level() {
            self.set_temperature_level(lev, time);
        }
    }

    /// Newton inversion of h(T) started from the temperature currently stored in the state.
    pub fn set_temperature_level(&mut self, lev: usize, time: TimeStamp) {
        let layout = self.layout;
        let eos = &self.eos;
        let state = match time {
            TimeStamp::Old => &mut self.leveldata_old[lev].state,
            TimeStamp::New => &mut self.leveldata_new[lev].state,
        };
        parallel_for_boxes(state, |_, bx, fab| {
            let mut y = vec![0.0; layout.nspec];
            for iv in bx.cells() {
                let rho = fab.get(iv, layout.density());
                let rhoinv = 1.0 / rho;
                fab.get_components(iv, layout.first_spec(), &mut y);
                y.iter_mut().for_each(|v| *v *= rhoinv);
                let h_cgs = fab.get(iv, layout.rhoh()) * rhoinv * units::ENERGY_MKS_TO_CGS;
                let t_guess = fab.get(iv, layout.temp());
                let t = eos.rhy2t(rho * units::DENSITY_MKS_TO_CGS, h_cgs, &y, t_guess);
                fab.set(iv, layout.temp(), t);
            }
        });
    }

    /// DENSITY = sum of the species partial densities
    pub fn set_rho_to_sum_rhoy_level(&mut self, lev: usize, time: TimeStamp) {
        let layout = self.layout;
        let state = &mut self.level_data_mut(lev, time).state;
        parallel_for_boxes(state, |_, bx, fab| {
            for iv in bx.cells() {
                let rho: f64 = (0..layout.nspec)
                    .map(|n| fab.get(iv, layout.first_spec() + n))
                    .sum();
                fab.set(iv, layout.density(), rho);
            }
        });
    }

    pub fn set_rho_to_sum_rhoy(&mut self, time: TimeStamp) {
        for lev in 0..=self.finest_level() {
            self.set_rho_to_sum_rhoy_level(lev, time);
        }
    }

    /// Uniform state on a level from pressure [Pa], mass fractions, temperature [K] and velocity [m/s].
    pub fn init_level_from_pyt(
        &mut self,
        lev: usize,
        time: TimeStamp,
        p: f64,
        y: &[f64],
        t: f64,
        velocity: [f64; 3],
    ) -> Result<(), LowMachError> {
        let layout = self.layout;
        if y.len() != layout.nspec {
            return Err(LowMachError::CompositionLength {
                expected: layout.nspec,
                got: y.len(),
            });
        }
        let rho_cgs = self.eos.pyt2r(p * units::PRESSURE_MKS_TO_CGS, y, t);
        let rho = rho_cgs * units::DENSITY_CGS_TO_MKS;
        let h = self.eos.ty2h(t, y) * units::ENERGY_CGS_TO_MKS;
        debug!(
            "level {} ({}) initialised: rho = {:.6} kg/m3, h = {:.3} J/kg",
            lev, time, rho, h
        );
        let state = &mut self.level_data_mut(lev, time).state;
        parallel_for_boxes(state, |_, bx, fab| {
            for iv in bx.cells() {
                for d in 0..layout.dim {
                    fab.set(iv, StateLayout::VELX + d, velocity[d]);
                }
                fab.set(iv, layout.density(), rho);
                for (n, yk) in y.iter().enumerate() {
                    fab.set(iv, layout.first_spec() + n, rho * yk);
                }
                fab.set(iv, layout.rhoh(), rho * h);
                fab.set(iv, layout.temp(), t);
                fab.set(iv, layout.rhort(), p);
            }
        });
        Ok(())
    }

    /// Total mass in the domain at `time`, kg (m² per unit depth in 2D).
    pub fn total_mass(&self, time: TimeStamp) -> Result<f64, LowMachError> {
        let states: Vec<_> = self.levels(time).iter().map(|ld| &ld.state).collect();
        Ok(self.hierarchy.weighted_sum(&states, self.layout.density())?)
    }

    /// refreshes the old and new mass diagnostics
    pub fn update_mass(&mut self) -> Result<(), LowMachError> {
        self.mass_old = self.total_mass(TimeStamp::Old)?;
        self.mass_new = self.total_mass(TimeStamp::New)?;
        Ok(())
    }
}
