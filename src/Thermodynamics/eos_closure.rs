//! # Equation of state closure
//!
//! Point-wise thermodynamic closure of a multicomponent mixture: conversions between
//! mole and mass fractions, density from (P, Y, T), pressure from (ρ, T, Y), enthalpy
//! and heat capacity from (T, Y), and the inverse problem T from (ρ, h, Y).
//!
//! All evaluations are done in CGS units (erg, g, cm, dyn/cm²). The solver state is in
//! MKS; the factors in [`units`] must be applied on every read from and write to the state.
//!
//! Two models are provided behind the [`EosCalculator`] trait:
//! * [`IdealGasMix`] - thermally perfect species described by NASA-7 polynomials
//! * [`ConstantCpMix`] - calorically perfect species with constant heat capacities
use crate::Thermodynamics::NASAdata::NASAdata;
use crate::Thermodynamics::molmass::calculate_molar_mass;
use enum_dispatch::enum_dispatch;
use nalgebra::DVector;
use prettytable::{Table, row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unit system of the closure and the conversion factors to the MKS state.
pub mod units {
    /// universal gas constant, erg/(mol K)
    pub const RU: f64 = 8.31446261815324e7;
    /// Pa -> dyn/cm²
    pub const PRESSURE_MKS_TO_CGS: f64 = 10.0;
    /// dyn/cm² -> Pa
    pub const PRESSURE_CGS_TO_MKS: f64 = 0.1;
    /// kg/m³ -> g/cm³
    pub const DENSITY_MKS_TO_CGS: f64 = 1.0e-3;
    /// g/cm³ -> kg/m³
    pub const DENSITY_CGS_TO_MKS: f64 = 1.0e3;
    /// J/kg -> erg/g (also J/(kg K) -> erg/(g K))
    pub const ENERGY_MKS_TO_CGS: f64 = 1.0e4;
    /// erg/g -> J/kg (also erg/(g K) -> J/(kg K))
    pub const ENERGY_CGS_TO_MKS: f64 = 1.0e-4;
}

const NEWTON_RTOL: f64 = 1.0e-10;
const MAX_NEWTON_ITER: usize = 100;
const DEFAULT_T_GUESS: f64 = 1000.0;

#[derive(Debug, Error)]
pub enum EosError {
    #[error("NASA coefficient vector has {0} numbers, expected 9, 17 or 25")]
    InvalidNasaLength(usize),
    #[error("temperature bounds {0:?} are not ascending")]
    InvalidTemperatureRange(Vec<f64>),
    #[error("cannot parse chemical formula '{0}'")]
    BadFormula(String),
    #[error("formula pattern: {0}")]
    Pattern(regex::Error),
    #[error("unknown element {element} in formula '{formula}'")]
    UnknownElement { element: String, formula: String },
    #[error("species '{0}' has neither a molar mass nor a formula")]
    MissingMolarMass(String),
    #[error("species '{0}' has non-positive molar mass {1}")]
    NonPositiveMolarMass(String, f64),
    #[error("species '{species}' lacks the data required by the {model} model")]
    MissingThermoData { species: String, model: String },
    #[error("mixture has no species")]
    EmptyMixture,
    #[error("{names} species names but {weights} molecular weights")]
    SpeciesDataLength { names: usize, weights: usize },
}

/// Names and molecular weights [g/mol] of the species of the mixture.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesSet {
    names: Vec<String>,
    mw: DVector<f64>,
    inv_mw: DVector<f64>,
}

impl SpeciesSet {
    pub fn new(names: Vec<String>, mw: Vec<f64>) -> Result<Self, EosError> {
        if names.is_empty() {
            return Err(EosError::EmptyMixture);
        }
        if names.len() != mw.len() {
            return Err(EosError::SpeciesDataLength {
                names: names.len(),
                weights: mw.len(),
            });
        }
        if let Some((name, &w)) = names.iter().zip(mw.iter()).find(|(_, w)| **w <= 0.0) {
            return Err(EosError::NonPositiveMolarMass(name.clone(), w));
        }
        let mw = DVector::from_vec(mw);
        let inv_mw = mw.map(|w| 1.0 / w);
        Ok(Self { names, mw, inv_mw })
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn names(&self) -> &[String] {
        &self.names
    }
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
    pub fn molecular_weights(&self) -> &DVector<f64> {
        &self.mw
    }
    pub fn inv_molecular_weights(&self) -> &DVector<f64> {
        &self.inv_mw
    }
}

#[enum_dispatch]
pub trait EosCalculator {
    fn species(&self) -> &SpeciesSet;
    /// enthalpy of species `k` at T, erg/g
    fn hk(&self, k: usize, t: f64) -> f64;
    /// heat capacity at constant pressure of species `k` at T, erg/(g K)
    fn cpk(&self, k: usize, t: f64) -> f64;

    fn nspec(&self) -> usize {
        self.species().len()
    }
    /// species enthalpies at T, erg/g
    fn t2hi(&self, t: f64, hi: &mut [f64]) {
        for (k, h) in hi.iter_mut().enumerate() {
            *h = self.hk(k, t);
        }
    }
    /// mixture molecular weight, g/mol
    fn wbar(&self, y: &[f64]) -> f64 {
        let inv_mw = self.species().inv_molecular_weights();
        let sum: f64 = y.iter().zip(inv_mw.iter()).map(|(y, w)| y * w).sum();
        1.0 / sum
    }
    /// mass fractions -> mole fractions
    fn y2x(&self, y: &[f64], x: &mut [f64]) {
        let wbar = self.wbar(y);
        let inv_mw = self.species().inv_molecular_weights();
        for ((x, y), w) in x.iter_mut().zip(y.iter()).zip(inv_mw.iter()) {
            *x = y * w * wbar;
        }
    }
    /// mole fractions -> mass fractions
    fn x2y(&self, x: &[f64], y: &mut [f64]) {
        let mw = self.species().molecular_weights();
        let xw: f64 = x.iter().zip(mw.iter()).map(|(x, w)| x * w).sum();
        for ((y, x), w) in y.iter_mut().zip(x.iter()).zip(mw.iter()) {
            *y = x * w / xw;
        }
    }
    /// whole-composition variant of [`EosCalculator::y2x`]
    fn mass_to_mole(&self, y: &DVector<f64>) -> DVector<f64> {
        let mut x = DVector::zeros(y.len());
        self.y2x(y.as_slice(), x.as_mut_slice());
        x
    }
    /// whole-composition variant of [`EosCalculator::x2y`]
    fn mole_to_mass(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut y = DVector::zeros(x.len());
        self.x2y(x.as_slice(), y.as_mut_slice());
        y
    }
    /// density from pressure [dyn/cm²], mass fractions and temperature, g/cm³
    fn pyt2r(&self, p: f64, y: &[f64], t: f64) -> f64 {
        p * self.wbar(y) / (units::RU * t)
    }
    /// pressure from density [g/cm³], temperature and mass fractions, dyn/cm²
    fn rty2p(&self, rho: f64, t: f64, y: &[f64]) -> f64 {
        rho * units::RU * t / self.wbar(y)
    }
    /// mixture enthalpy, erg/g
    fn ty2h(&self, t: f64, y: &[f64]) -> f64 {
        y.iter().enumerate().map(|(k, y)| y * self.hk(k, t)).sum()
    }
    /// mixture cp, erg/(g K)
    fn ty2cp(&self, t: f64, y: &[f64]) -> f64 {
        y.iter().enumerate().map(|(k, y)| y * self.cpk(k, t)).sum()
    }
    /// mixture cv, erg/(g K)
    fn ty2cv(&self, t: f64, y: &[f64]) -> f64 {
        self.ty2cp(t, y) - units::RU / self.wbar(y)
    }
    /// inverse of the ratio of specific heats, cv/cp
    fn gamma_inv(&self, t: f64, y: &[f64]) -> f64 {
        self.ty2cv(t, y) / self.ty2cp(t, y)
    }
    /// temperature from density, enthalpy [erg/g] and mass fractions.
    ///
    /// Newton iteration on h(T) - h = 0 started from `t_guess`; returns the last iterate
    /// whether or not the tolerance was met.
    fn rhy2t(&self, _rho: f64, h: f64, y: &[f64], t_guess: f64) -> f64 {
        let mut t = if t_guess > 0.0 {
            t_guess
        } else {
            DEFAULT_T_GUESS
        };
        for _ in 0..MAX_NEWTON_ITER {
            let dt = (self.ty2h(t, y) - h) / self.ty2cp(t, y);
            t -= dt;
            if dt.abs() <= NEWTON_RTOL * t.abs() {
                break;
            }
        }
        t
    }
}

/// Thermally perfect species, NASA-7 polynomials.
#[derive(Debug, Clone, PartialEq)]
pub struct IdealGasMix {
    pub species: SpeciesSet,
    pub nasa: Vec<NASAdata>,
}

impl EosCalculator for IdealGasMix {
    fn species(&self) -> &SpeciesSet {
        &self.species
    }
    fn hk(&self, k: usize, t: f64) -> f64 {
        units::RU * self.species.inv_mw[k] * t * self.nasa[k].h_over_rt(t)
    }
    fn cpk(&self, k: usize, t: f64) -> f64 {
        units::RU * self.species.inv_mw[k] * self.nasa[k].cp_over_r(t)
    }
}

/// Calorically perfect species: h_k = h_ref,k + cp_k (T - T_ref).
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantCpMix {
    pub species: SpeciesSet,
    /// erg/(g K)
    pub cp: Vec<f64>,
    /// erg/g at t_ref
    pub h_ref: Vec<f64>,
    pub t_ref: f64,
}

impl EosCalculator for ConstantCpMix {
    fn species(&self) -> &SpeciesSet {
        &self.species
    }
    fn hk(&self, k: usize, t: f64) -> f64 {
        self.h_ref[k] + self.cp[k] * (t - self.t_ref)
    }
    fn cpk(&self, k: usize, _t: f64) -> f64 {
        self.cp[k]
    }
}

#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch(EosCalculator)]
pub enum EosModel {
    IdealGasMix(IdealGasMix),
    ConstantCpMix(ConstantCpMix),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EosModelKind {
    IdealGas,
    ConstantCp,
}

/// Species entry of the configuration file. Heat capacities and enthalpies are given in MKS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesConfig {
    pub name: String,
    /// used to compute the molar mass when `molar_mass` is absent
    #[serde(default)]
    pub formula: Option<String>,
    /// g/mol
    #[serde(default)]
    pub molar_mass: Option<f64>,
    /// flat NASA-7 vector, required by the ideal gas model
    #[serde(default)]
    pub nasa7: Option<Vec<f64>>,
    /// J/(kg K), required by the constant cp model
    #[serde(default)]
    pub cp: Option<f64>,
    /// J/kg at `t_ref`, defaults to zero
    #[serde(default)]
    pub h_ref: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EosConfig {
    pub model: EosModelKind,
    pub species: Vec<SpeciesConfig>,
    /// reference temperature of the constant cp model, K
    #[serde(default = "default_t_ref")]
    pub t_ref: f64,
}

fn default_t_ref() -> f64 {
    298.15
}

impl Default for EosConfig {
    /// dry air as an O2/N2 mixture with GRI-Mech 3.0 polynomials
    fn default() -> Self {
        use crate::Thermodynamics::NASAdata::gri30;
        let entry = |name: &str, nasa: &[f64]| SpeciesConfig {
            name: name.to_string(),
            formula: Some(name.to_string()),
            molar_mass: None,
            nasa7: Some(nasa.to_vec()),
            cp: None,
            h_ref: None,
        };
        Self {
            model: EosModelKind::IdealGas,
            species: vec![entry("O2", &gri30::O2), entry("N2", &gri30::N2)],
            t_ref: default_t_ref(),
        }
    }
}

impl EosModel {
    /// builds the closure described by the configuration
    pub fn from_config(config: &EosConfig) -> Result<Self, EosError> {
        if config.species.is_empty() {
            return Err(EosError::EmptyMixture);
        }
        let mut names = Vec::with_capacity(config.species.len());
        let mut mw = Vec::with_capacity(config.species.len());
        for s in &config.species {
            let w = match (s.molar_mass, &s.formula) {
                (Some(w), _) => w,
                (None, Some(formula)) => calculate_molar_mass(formula)?,
                (None, None) => return Err(EosError::MissingMolarMass(s.name.clone())),
            };
            names.push(s.name.clone());
            mw.push(w);
        }
        let species = SpeciesSet::new(names, mw)?;
        let missing = |s: &SpeciesConfig, model: &str| EosError::MissingThermoData {
            species: s.name.clone(),
            model: model.to_string(),
        };
        match config.model {
            EosModelKind::IdealGas => {
                let nasa = config
                    .species
                    .iter()
                    .map(|s| {
                        let c = s.nasa7.as_ref().ok_or_else(|| missing(s, "ideal_gas"))?;
                        NASAdata::from_flat(c)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(EosModel::IdealGasMix(IdealGasMix { species, nasa }))
            }
            EosModelKind::ConstantCp => {
                let cp = config
                    .species
                    .iter()
                    .map(|s| {
                        s.cp.map(|cp| cp * units::ENERGY_MKS_TO_CGS)
                            .ok_or_else(|| missing(s, "constant_cp"))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                let h_ref = config
                    .species
                    .iter()
                    .map(|s| s.h_ref.unwrap_or(0.0) * units::ENERGY_MKS_TO_CGS)
                    .collect();
                Ok(EosModel::ConstantCpMix(ConstantCpMix {
                    species,
                    cp,
                    h_ref,
                    t_ref: config.t_ref,
                }))
            }
        }
    }

    /// table of molar mass, cp and h of every species at `t`, MKS
    pub fn pretty_print_species(&self, t: f64) {
        let mut table = Table::new();
        table.add_row(row!["Species", "W, g/mol", "cp, J/(kg K)", "h, J/kg"]);
        for (k, name) in self.species().names().iter().enumerate() {
            table.add_row(row![
                name,
                format!("{:.4}", self.species().molecular_weights()[k]),
                format!("{:.2}", self.cpk(k, t) * units::ENERGY_CGS_TO_MKS),
                format!("{:.4e}", self.hk(k, t) * units::ENERGY_CGS_TO_MKS)
            ]);
        }
        table.printstd();
    }
}
