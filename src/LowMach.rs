/// closed-domain correction of the ambient pressure and of the MAC divergence
pub mod closed_chamber;
/// reaction, diffusion and patch-fill interfaces with minimal implementations
pub mod collaborators;
/// solver context owning the level data and the ambient pressure
pub mod context;
/// assembly of the divergence constraint
/// # Examples
/// ```
/// use ThermoDivU::AmrGrid::geometry::Geometry;
/// use ThermoDivU::AmrGrid::hierarchy::AmrHierarchy;
/// use ThermoDivU::AmrGrid::index_box::IndexBox;
/// use ThermoDivU::LowMach::collaborators::{
///     Collaborators, FrozenDiffusion, NoReactions, PiecewiseConstantFiller,
/// };
/// use ThermoDivU::LowMach::context::LowMachSolver;
/// use ThermoDivU::LowMach::divu::DivUOptions;
/// use ThermoDivU::LowMach::level_data::AdvanceDiffData;
/// use ThermoDivU::LowMach::state_layout::TimeStamp;
/// use ThermoDivU::settings::SolverConfig;
///
/// let domain = IndexBox::new_2d([0, 0], [7, 7]);
/// let geom = Geometry::new(domain, [0.0; 3], [0.01, 0.01, 0.0], 2);
/// let hierarchy = AmrHierarchy::single_level(geom, vec![domain]).unwrap();
/// let mut solver = LowMachSolver::new(SolverConfig::default(), hierarchy).unwrap();
/// solver
///     .init_level_from_pyt(0, TimeStamp::New, 101325.0, &[0.233, 0.767], 300.0, [0.0; 3])
///     .unwrap();
/// let mut diff_data = AdvanceDiffData::new(&solver.hierarchy, solver.layout.nspec);
/// let mut diffusion = FrozenDiffusion;
/// let mut collab = Collaborators::new(&NoReactions, &mut diffusion, &PiecewiseConstantFiller);
/// solver
///     .calc_divu(DivUOptions::default(), TimeStamp::New, &mut diff_data, &mut collab)
///     .unwrap();
/// assert_eq!(solver.level_data(0, TimeStamp::New).divu.min_max(0), (0.0, 0.0));
/// ```
pub mod divu;
/// damped rate of change of the thermodynamic pressure
pub mod dpdt;
pub mod errors;
pub mod level_data;
/// average-down and ghost filling of divU
pub mod multilevel;
/// pressure, temperature and density setters
pub mod setters;
pub mod state_layout;
