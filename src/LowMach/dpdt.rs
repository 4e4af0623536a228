use crate::AmrGrid::multifab::MultiFab;
use crate::AmrGrid::parallel::parallel_for_boxes;
use crate::LowMach::collaborators::PatchFiller;
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::errors::LowMachError;
use crate::LowMach::state_layout::TimeStamp;
use log::warn;

impl LowMachSolver {
    /// Damped relaxation rate of the thermodynamic pressure towards the ambient one:
    /// `(RHORT - p_new) / (dt RHORT) * dpdt_factor`, zero in solid cells.
    ///
    /// Ghost cells are filled at the current time when `dpdt` has any.
    pub fn calc_dpdt(
        &self,
        time: TimeStamp,
        dpdt: &mut [MultiFab],
        filler: &dyn PatchFiller,
    ) -> Result<(), LowMachError> {
        self.check_layout(dpdt)?;
        if self.dt <= 0.0 {
            warn!("dPdt requested with dt = {}", self.dt);
        }
        let rhort = self.layout.rhort();
        let p_amb = self.ambient.p_new;
        let dt = self.dt;
        let dpdt_factor = self.config.dpdt_factor;
        for (lev, field) in dpdt.iter_mut().enumerate() {
            let state = &self.level_data(lev, time).state;
            parallel_for_boxes(field, |box_no, bx, fab| {
                let sfab = state.fab(box_no);
                for iv in bx.cells() {
                    let p = sfab.get(iv, rhort);
                    fab.set(iv, 0, (p - p_amb) / (dt * p) * dpdt_factor);
                }
            });
            if let Some(eb) = self.hierarchy.eb(lev) {
                eb.set_covered(field, 0.0);
            }
        }

        let ngrow = dpdt.first().map_or(0, |mf| mf.n_grow());
        if ngrow > 0 {
            for lev in 0..dpdt.len() {
                let (coarse, rest) = dpdt.split_at_mut(lev);
                filler.fill_patch(
                    &self.hierarchy,
                    lev,
                    self.cur_time,
                    &mut rest[0],
                    coarse.last(),
                    ngrow,
                );
            }
        }
        Ok(())
    }
}
