/// NASA-7 polynomials of species heat capacity, enthalpy and entropy
pub mod NASAdata;
/// equation of state closure of the mixture
/// # Examples
/// ```
/// use ThermoDivU::Thermodynamics::eos_closure::{units, EosCalculator, EosConfig, EosModel};
/// // dry air from the default configuration
/// let eos = EosModel::from_config(&EosConfig::default()).unwrap();
/// let y = [0.233, 0.767];
/// let p_cgs = 101325.0 * units::PRESSURE_MKS_TO_CGS;
/// let rho = eos.pyt2r(p_cgs, &y, 300.0);
/// let h = eos.ty2h(300.0, &y);
/// let t = eos.rhy2t(rho, h, &y, 500.0);
/// assert!((t - 300.0).abs() < 1e-6);
/// println!("density of air: {} kg/m3", rho * units::DENSITY_CGS_TO_MKS);
/// ```
pub mod eos_closure;
/// tests
pub mod eos_closure_tests;
/// Module to calculate the atomic composition and molar mass of a chemical formula
///
///  # Examples
/// ```
/// use ThermoDivU::Thermodynamics::molmass::{calculate_molar_mass, parse_formula};
/// let molar_mass = calculate_molar_mass("C2H4(OH)2").unwrap();
/// println!("Molar mass: {:?} g/mol", molar_mass);
/// let atomic_composition = parse_formula("CH4").unwrap();
/// println!("{:?}", atomic_composition);
/// ```
pub mod molmass;
