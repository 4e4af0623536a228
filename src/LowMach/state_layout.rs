use crate::LowMach::errors::LowMachError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two time-synchronised copies of the level data an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeStamp {
    Old,
    New,
}

impl TryFrom<i32> for TimeStamp {
    type Error = LowMachError;
    /// 0 is the old time, 1 the new time; anything else is rejected
    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(TimeStamp::Old),
            1 => Ok(TimeStamp::New),
            other => Err(LowMachError::InvalidTimeStamp(other)),
        }
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeStamp::Old => write!(f, "old"),
            TimeStamp::New => write!(f, "new"),
        }
    }
}

/// Channel layout of the state:
/// velocity components, density, species partial densities, rho*h, temperature, thermodynamic pressure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateLayout {
    pub dim: usize,
    pub nspec: usize,
}

impl StateLayout {
    pub fn new(dim: usize, nspec: usize) -> Self {
        Self { dim, nspec }
    }
    pub const VELX: usize = 0;
    pub fn density(&self) -> usize {
        self.dim
    }
    pub fn first_spec(&self) -> usize {
        self.dim + 1
    }
    pub fn rhoh(&self) -> usize {
        self.first_spec() + self.nspec
    }
    pub fn temp(&self) -> usize {
        self.rhoh() + 1
    }
    /// thermodynamic pressure, rho*R*T/Wbar
    pub fn rhort(&self) -> usize {
        self.temp() + 1
    }
    pub fn nvar(&self) -> usize {
        self.rhort() + 1
    }
}
