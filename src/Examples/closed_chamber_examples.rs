use crate::AmrGrid::eb::EbFactory;
use crate::AmrGrid::geometry::Geometry;
use crate::AmrGrid::hierarchy::{AmrHierarchy, AmrLevel};
use crate::AmrGrid::index_box::IndexBox;
use crate::AmrGrid::multifab::MultiFab;
use crate::AmrGrid::parallel::parallel_for;
use crate::LowMach::collaborators::{
    Collaborators, FrozenDiffusion, NoReactions, PiecewiseConstantFiller,
};
use crate::LowMach::context::LowMachSolver;
use crate::LowMach::divu::DivUOptions;
use crate::LowMach::level_data::{AdvanceAdvData, AdvanceDiffData};
use crate::LowMach::state_layout::{StateLayout, TimeStamp};
use crate::Thermodynamics::eos_closure::{EosCalculator, units};
use crate::Utils::logger::init_logger;
use crate::settings::SolverConfig;
use log::info;

/// n x n cells on a square of side `length`, split into four boxes
fn square_level(n: i32, length: f64) -> (Geometry, Vec<IndexBox>) {
    let geom = Geometry::new(
        IndexBox::new_2d([0, 0], [n - 1, n - 1]),
        [0.0; 3],
        [length, length, 0.0],
        2,
    );
    let h = n / 2;
    let grids = vec![
        IndexBox::new_2d([0, 0], [h - 1, h - 1]),
        IndexBox::new_2d([h, 0], [n - 1, h - 1]),
        IndexBox::new_2d([0, h], [h - 1, n - 1]),
        IndexBox::new_2d([h, h], [n - 1, n - 1]),
    ];
    (geom, grids)
}

/// `base` supplies the EOS and the tuning; each task sets its own switches
pub fn closed_chamber_examples(task: usize, base: SolverConfig) {
    match task {
        // vortex enclosed in a cylindrical wall
        0 => {
            let config = SolverConfig {
                verbose: 1,
                closed_chamber: true,
                ..base
            };
            init_logger(config.verbose);
            let length = 0.01;
            let (geom, grids) = square_level(32, length);
            let radius = 0.45 * length;
            let g = geom.clone();
            let eb = EbFactory::from_covered_cells(&grids, 2, move |iv| {
                let x = g.cell_center(iv);
                let (dx, dy) = (x[0] - 0.5 * length, x[1] - 0.5 * length);
                dx * dx + dy * dy > radius * radius
            });
            let level = AmrLevel::new(geom.clone(), grids).with_eb(eb);
            let hierarchy = AmrHierarchy::new(vec![level], vec![]).unwrap();
            let mut solver = LowMachSolver::new(config, hierarchy).unwrap();
            println!(
                "uncovered volume: {:e} m2, circle: {:e} m2",
                solver.uncovered_volume(),
                std::f64::consts::PI * radius * radius
            );
            solver.eos.pretty_print_species(300.0);

            // air with an oxygen-enriched strip, Gaussian vortex in the centre
            let (p, t) = (101325.0, 300.0);
            solver
                .init_level_from_pyt(0, TimeStamp::New, p, &[0.233, 0.767], t, [0.0; 3])
                .unwrap();
            let layout = solver.layout;
            let (r_vort, force_vort) = (0.2 * length, 0.5 * length);
            let rich = [0.283, 0.717];
            let rho_rich = solver.eos.pyt2r(p * units::PRESSURE_MKS_TO_CGS, &rich, t)
                * units::DENSITY_CGS_TO_MKS;
            let h_rich = solver.eos.ty2h(t, &rich) * units::ENERGY_CGS_TO_MKS;
            parallel_for(&mut solver.level_data_mut(0, TimeStamp::New).state, |_, iv, fab| {
                let x = geom.cell_center(iv);
                let (dx, dy) = (x[0] - 0.5 * length, x[1] - 0.5 * length);
                let r_sq = r_vort * r_vort;
                let decay = (-(dx * dx + dy * dy) / r_sq / 2.0).exp();
                fab.set(iv, StateLayout::VELX, -force_vort * dy / r_sq * decay);
                fab.set(iv, StateLayout::VELX + 1, force_vort * dx / r_sq * decay);
                if dx.abs() < 0.1 * length {
                    fab.set(iv, layout.density(), rho_rich);
                    for (n, y) in rich.iter().enumerate() {
                        fab.set(iv, layout.first_spec() + n, rho_rich * y);
                    }
                    fab.set(iv, layout.rhoh(), rho_rich * h_rich);
                }
            });
            solver.set_rho_to_sum_rhoy(TimeStamp::New);
            solver.set_temperature(TimeStamp::New);
            solver.set_thermo_press(TimeStamp::New);

            let mut diff_data = AdvanceDiffData::new(&solver.hierarchy, layout.nspec);
            let mut diffusion = FrozenDiffusion;
            let mut collab =
                Collaborators::new(&NoReactions, &mut diffusion, &PiecewiseConstantFiller);
            let opts = DivUOptions {
                is_init: true,
                ..DivUOptions::default()
            };
            solver
                .calc_divu(opts, TimeStamp::New, &mut diff_data, &mut collab)
                .unwrap();
            let state = &solver.level_data(0, TimeStamp::New).state;
            println!("temperature range: {:?}", state.min_max(layout.temp()));
            println!("pressure range: {:?}", state.min_max(layout.rhort()));
            println!(
                "divU range: {:?}",
                solver.level_data(0, TimeStamp::New).divu.min_max(0)
            );
            println!("mass: {:e} kg/m", solver.total_mass(TimeStamp::New).unwrap());
        }
        // heated closed box with a refined patch around the heat source
        1 => {
            let config = SolverConfig {
                verbose: 3,
                closed_chamber: true,
                ..base
            };
            init_logger(config.verbose);
            let length = 0.01;
            let (geom0, grids0) = square_level(16, length);
            let geom1 = geom0.refine(2);
            let levels = vec![
                AmrLevel::new(geom0, grids0),
                AmrLevel::new(geom1.clone(), vec![IndexBox::new_2d([8, 8], [23, 23])]),
            ];
            let hierarchy = AmrHierarchy::new(levels, vec![2]).unwrap();
            let mut solver = LowMachSolver::new(config, hierarchy).unwrap();
            for lev in 0..=solver.finest_level() {
                for time in [TimeStamp::Old, TimeStamp::New] {
                    solver
                        .init_level_from_pyt(lev, time, 101325.0, &[0.233, 0.767], 300.0, [0.0; 3])
                        .unwrap();
                }
            }
            let layout = solver.layout;
            // 1 MW/m3 in a disc of 1 mm radius
            let q = 1.0e6;
            parallel_for(&mut solver.ext_source[1], |_, iv, fab| {
                let x = geom1.cell_center(iv);
                let (dx, dy) = (x[0] - 0.5 * length, x[1] - 0.5 * length);
                if dx * dx + dy * dy < 1.0e-6 {
                    fab.set(iv, layout.rhoh(), q);
                }
            });

            let mut diff_data = AdvanceDiffData::new(&solver.hierarchy, layout.nspec);
            let mut adv_data = AdvanceAdvData::new(&solver.hierarchy);
            let mut dpdt: Vec<MultiFab> = (0..solver.hierarchy.num_levels())
                .map(|lev| MultiFab::new(solver.hierarchy.grids(lev), 1, 1, 2))
                .collect();
            let mut diffusion = FrozenDiffusion;
            let dt = 1.0e-4;
            for step in 0..5 {
                solver.copy_new_to_old();
                solver.dt = dt;
                for t in solver.t_new.iter_mut() {
                    *t += dt;
                }
                solver.cur_time += dt;

                // constant-volume heating of the new state
                for lev in 0..=solver.finest_level() {
                    let heat = solver.ext_source[lev].clone();
                    parallel_for(&mut solver.level_data_mut(lev, TimeStamp::New).state, |box_no, iv, fab| {
                        let added = dt * heat.fab(box_no).get(iv, layout.rhoh());
                        *fab.get_mut(iv, layout.rhoh()) += added;
                    });
                }
                solver.set_temperature(TimeStamp::New);
                solver.set_thermo_press(TimeStamp::New);

                let mut collab =
                    Collaborators::new(&NoReactions, &mut diffusion, &PiecewiseConstantFiller);
                solver
                    .calc_divu(DivUOptions::default(), TimeStamp::New, &mut diff_data, &mut collab)
                    .unwrap();
                for (lev, mac) in adv_data.mac_divu.iter_mut().enumerate() {
                    mac.copy_from(&solver.level_data(lev, TimeStamp::New).divu, 0, 0, 1);
                }
                solver.update_mass().unwrap();
                let sbar = if solver.config.closed_chamber {
                    solver.adjust_p_and_divu(&mut adv_data.mac_divu).unwrap()
                } else {
                    0.0
                };
                solver
                    .calc_dpdt(TimeStamp::New, &mut dpdt, &PiecewiseConstantFiller)
                    .unwrap();
                info!(
                    "step {}: Sbar = {:.4e} 1/s, p_new = {:.6} Pa, dPdt on level 1 in {:?}",
                    step,
                    sbar,
                    solver.ambient.p_new,
                    dpdt[1].min_max(0)
                );
            }
        }
        _ => {
            println!("no such example");
        }
    }
}
