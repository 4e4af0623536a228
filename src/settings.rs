//! # Settings Module
//!
//! ## Purpose
//! Run-time configuration of the low-Mach thermodynamics and divergence-constraint engine:
//! which source terms participate, the damping of the pressure drift, ghost widths,
//! verbosity, the initial ambient pressure and the equation of state of the mixture.
//!
//! ## Key Features
//! - **JSON storage**: configuration is read from and written to a JSON file
//! - **Defaults**: a missing file or missing keys fall back to the defaults below
//! - **Validation**: physically meaningless values are rejected before a run starts
//!
//! ## Configuration Format
//! ```json
//! {
//!   "do_react": true,
//!   "skip_instant_rr": false,
//!   "closed_chamber": true,
//!   "dpdt_factor": 0.5,
//!   "n_grow_divu": 1,
//!   "verbose": 1,
//!   "p_ambient": 101325.0,
//!   "eos": { "model": "constant_cp", "t_ref": 298.15,
//!            "species": [ { "name": "AIR", "molar_mass": 28.96, "cp": 1005.0 } ] }
//! }
//! ```
//!
//! ## Usage Pattern
//! ```rust
//! use ThermoDivU::settings::SolverConfig;
//!
//! let config = SolverConfig::load("thermo_divu.json").unwrap();
//! config.validate().unwrap();
//! ```

use crate::Thermodynamics::eos_closure::EosConfig;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access configuration file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value of '{field}': {reason}")]
    Invalid { field: String, reason: String },
}

/// Configuration of a run.
///
/// # Fields
/// * `do_react` - reaction rates take part in the divergence constraint
/// * `skip_instant_rr` - reactions are integrated inside the state update, so no rate enters divU
/// * `closed_chamber` - the domain has no open boundary and the ambient pressure evolves
/// * `dpdt_factor` - damping of the thermodynamic pressure drift correction, in [0, 1]
/// * `n_grow_divu` - ghost cells of the divU field
/// * `verbose` - 0 quiet, 1 step summaries, 3 closed-chamber tables
/// * `p_ambient` - initial ambient pressure, Pa
/// * `eos` - equation of state of the mixture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub do_react: bool,
    pub skip_instant_rr: bool,
    pub closed_chamber: bool,
    pub dpdt_factor: f64,
    pub n_grow_divu: usize,
    pub verbose: usize,
    pub p_ambient: f64,
    pub eos: EosConfig,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            do_react: true,
            skip_instant_rr: false,
            closed_chamber: false,
            dpdt_factor: 0.5,
            n_grow_divu: 1,
            verbose: 0,
            p_ambient: 101325.0,
            eos: EosConfig::default(),
        }
    }
}

impl SolverConfig {
    /// Loads the configuration from a JSON file; a missing file gives the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: SolverConfig = serde_json::from_str(&content)?;
            info!("configuration loaded from {}", path.display());
            Ok(config)
        } else {
            info!(
                "configuration file {} not found, using defaults",
                path.display()
            );
            Ok(SolverConfig::default())
        }
    }

    /// Writes the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &str, reason: &str| ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.to_string(),
        };
        if !(0.0..=1.0).contains(&self.dpdt_factor) {
            return Err(invalid("dpdt_factor", "must lie in [0, 1]"));
        }
        if !(self.p_ambient > 0.0) {
            return Err(invalid("p_ambient", "must be positive"));
        }
        if self.eos.species.is_empty() {
            return Err(invalid("eos.species", "at least one species is required"));
        }
        Ok(())
    }

    /// reaction rates enter the divergence constraint
    pub fn use_reaction_rates(&self) -> bool {
        self.do_react && !self.skip_instant_rr
    }
}
