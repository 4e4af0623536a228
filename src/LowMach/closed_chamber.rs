//! # Closed-chamber pressure correction
//!
//! In a domain without an open boundary the ambient pressure can not stay constant: the
//! mean of the divergence constraint has to match the net volume flux through the
//! boundary. The mean part of the MAC divergence is therefore converted into a rise of
//! the ambient pressure, and the remaining field is corrected so that its mean equals the
//! boundary balance.
//!
//! ```text
//! theta  = 1/2 (gamma_inv_old / p_old + gamma_inv_new / p_new)
//! Sbar   = <mac_divu>,  Thetabar = <theta>
//! p_new  = p_old + dt (Sbar - divu_vol) / Thetabar
//! ```
//!
//! where `<.>` is the volume average over the uncovered domain.
use crate::AmrGrid::multifab::{Fab, MultiFab};
use crate::AmrGrid::parallel::parallel_for_boxes;
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::errors::LowMachError;
use crate::Thermodynamics::eos_closure::EosCalculator;
use log::info;
use prettytable::{Table, row};

impl LowMachSolver {
    /// Half-time theta = 1/(gamma P) on every level, zero in solid cells.
    pub fn half_time_theta(&self) -> Vec<MultiFab> {
        let layout = self.layout;
        let (p_old, p_new) = (self.ambient.p_old, self.ambient.p_new);
        (0..self.hierarchy.num_levels())
            .map(|lev| {
                let mut theta = MultiFab::new(self.hierarchy.grids(lev), 1, 0, layout.dim);
                let state_o = &self.leveldata_old[lev].state;
                let state_n = &self.leveldata_new[lev].state;
                let eos = &self.eos;
                parallel_for_boxes(&mut theta, |box_no, bx, fab| {
                    let (so, sn) = (state_o.fab(box_no), state_n.fab(box_no));
                    let mut y = vec![0.0; layout.nspec];
                    let mut gamma_inv = |s: &Fab, iv| {
                        s.get_components(iv, layout.first_spec(), &mut y);
                        let rho: f64 = y.iter().sum();
                        y.iter_mut().for_each(|v| *v /= rho);
                        eos.gamma_inv(s.get(iv, layout.temp()), &y)
                    };
                    for iv in bx.cells() {
                        let g_o = gamma_inv(so, iv);
                        let g_n = gamma_inv(sn, iv);
                        fab.set(iv, 0, 0.5 * (g_o / p_old + g_n / p_new));
                    }
                });
                if let Some(eb) = self.hierarchy.eb(lev) {
                    eb.set_covered(&mut theta, 0.0);
                }
                theta
            })
            .collect()
    }

    /// Advances the ambient pressure of a closed domain and corrects `mac_divu`.
    ///
    /// Returns `Sbar`, the mean of `mac_divu` before the correction; it has to be added
    /// back after the MAC projection.
    pub fn adjust_p_and_divu(&mut self, mac_divu: &mut [MultiFab]) -> Result<f64, LowMachError> {
        let theta = self.half_time_theta();
        self.adjust_p_and_divu_with_theta(mac_divu, theta)
    }

    /// [`LowMachSolver::adjust_p_and_divu`] with a given half-time theta field.
    pub fn adjust_p_and_divu_with_theta(
        &mut self,
        mac_divu: &mut [MultiFab],
        mut theta: Vec<MultiFab>,
    ) -> Result<f64, LowMachError> {
        self.check_layout(mac_divu)?;
        self.check_layout(&theta)?;
        let volume = self.uncovered_volume();
        if !(volume > 0.0) {
            return Err(LowMachError::ZeroUncoveredVolume(volume));
        }

        let divu_refs: Vec<&MultiFab> = mac_divu.iter().collect();
        let sbar = self.hierarchy.weighted_sum(&divu_refs, 0)? / volume;
        let theta_refs: Vec<&MultiFab> = theta.iter().collect();
        let thetabar = self.hierarchy.weighted_sum(&theta_refs, 0)? / volume;
        if thetabar == 0.0 {
            return Err(LowMachError::ZeroMeanTheta);
        }

        // theta and mac_divu become their deviations from the mean
        for (th, divu) in theta.iter_mut().zip(mac_divu.iter_mut()) {
            th.plus(-thetabar, 0);
            divu.plus(-sbar, 0);
        }

        let nfaces = 2 * self.hierarchy.dim();
        let flux_balance: f64 = self.domain_umac_flux[..nfaces].iter().sum();
        let divu_vol = flux_balance / volume;

        self.ambient.dp0dt = (sbar - divu_vol) / thetabar;
        self.ambient.p_new = self.ambient.p_old + self.dt * self.ambient.dp0dt;

        for (th, divu) in theta.iter().zip(mac_divu.iter_mut()) {
            parallel_for_boxes(divu, |box_no, bx, fab| {
                let tfab = th.fab(box_no);
                for iv in bx.cells() {
                    let dtheta = tfab.get(iv, 0);
                    *fab.get_mut(iv, 0) -=
                        dtheta * sbar / thetabar - divu_vol * (1.0 + dtheta / thetabar);
                }
            });
        }

        info!(
            "closed chamber: p_old = {:.6e}, p_new = {:.6e}, dp0dt = {:.6e}",
            self.ambient.p_old, self.ambient.p_new, self.ambient.dp0dt
        );
        if self.config.verbose > 2 {
            let mut table = Table::new();
            table.add_row(row!["Quantity", "Value"]);
            table.add_row(row!["p_old, Pa", format!("{:.6e}", self.ambient.p_old)]);
            table.add_row(row!["p_new, Pa", format!("{:.6e}", self.ambient.p_new)]);
            table.add_row(row!["dp0dt, Pa/s", format!("{:.6e}", self.ambient.dp0dt)]);
            table.add_row(row!["Sbar, 1/s", format!("{:.6e}", sbar)]);
            table.add_row(row!["Thetabar, 1/Pa", format!("{:.6e}", thetabar)]);
            table.add_row(row!["divu_vol, 1/s", format!("{:.6e}", divu_vol)]);
            table.add_row(row!["mass old, kg", format!("{:.6e}", self.mass_old)]);
            table.add_row(row!["mass new, kg", format!("{:.6e}", self.mass_new)]);
            table.printstd();
        }
        Ok(sbar)
    }
}
