use crate::AmrGrid::hierarchy::GridError;
use crate::Thermodynamics::eos_closure::EosError;
use crate::settings::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LowMachError {
    #[error("invalid time stamp {0}: expected 0 (old) or 1 (new)")]
    InvalidTimeStamp(i32),
    #[error("uncovered volume is {0}, closed chamber correction needs a fluid domain")]
    ZeroUncoveredVolume(f64),
    #[error("mean of theta over the domain is zero")]
    ZeroMeanTheta,
    #[error("field on level {0} does not match the grids of the level")]
    LayoutMismatch(usize),
    #[error("state holds {got} species, the equation of state has {expected}")]
    SpeciesCountMismatch { expected: usize, got: usize },
    #[error("mass fractions have {got} entries, the mixture has {expected} species")]
    CompositionLength { expected: usize, got: usize },
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Eos(#[from] EosError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
