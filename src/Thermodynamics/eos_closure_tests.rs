#[cfg(test)]
mod tests {
    use crate::Thermodynamics::eos_closure::{
        EosCalculator, EosConfig, EosError, EosModel, EosModelKind, SpeciesConfig, SpeciesSet,
        units,
    };
    use approx::assert_relative_eq;
    use nalgebra::DVector;

    fn air() -> EosModel {
        EosModel::from_config(&EosConfig::default()).unwrap()
    }

    fn constant_cp() -> EosModel {
        let config = EosConfig {
            model: EosModelKind::ConstantCp,
            species: vec![
                SpeciesConfig {
                    name: "A".to_string(),
                    formula: None,
                    molar_mass: Some(20.0),
                    nasa7: None,
                    cp: Some(1000.0),
                    h_ref: Some(1.0e5),
                },
                SpeciesConfig {
                    name: "B".to_string(),
                    formula: None,
                    molar_mass: Some(40.0),
                    nasa7: None,
                    cp: Some(1500.0),
                    h_ref: None,
                },
            ],
            t_ref: 300.0,
        };
        EosModel::from_config(&config).unwrap()
    }

    #[test]
    fn test_molar_masses_from_formula() {
        let eos = air();
        let mw = eos.species().molecular_weights();
        assert_relative_eq!(mw[0], 31.998, epsilon = 1e-3);
        assert_relative_eq!(mw[1], 28.014, epsilon = 1e-3);
        assert_eq!(eos.species().index_of("N2"), Some(1));
    }

    #[test]
    fn test_mole_mass_conversion() {
        let eos = air();
        let y = DVector::from_vec(vec![0.233, 0.767]);
        let x = eos.mass_to_mole(&y);
        assert_relative_eq!(x.sum(), 1.0, epsilon = 1e-14);
        // O2 is heavier than the mixture so its mole fraction is lower than its mass fraction
        assert!(x[0] < y[0]);
        let y_back = eos.mole_to_mass(&x);
        assert_relative_eq!(y_back, y, epsilon = 1e-14);
    }

    #[test]
    fn test_density_of_air() {
        let eos = air();
        let y = [0.233, 0.767];
        let p_cgs = 101325.0 * units::PRESSURE_MKS_TO_CGS;
        let rho = eos.pyt2r(p_cgs, &y, 300.0) * units::DENSITY_CGS_TO_MKS;
        assert_relative_eq!(rho, 1.172, epsilon = 1e-3);
        // pressure from density gives back the input
        let p = eos.rty2p(rho * units::DENSITY_MKS_TO_CGS, 300.0, &y);
        assert_relative_eq!(p, p_cgs, max_relative = 1e-12);
    }

    #[test]
    fn test_temperature_round_trip_ideal_gas() {
        let eos = air();
        for &(y_o2, t) in &[(0.233, 300.0), (0.5, 900.0), (0.1, 1500.0), (0.9, 2400.0)] {
            let y = [y_o2, 1.0 - y_o2];
            let rho = eos.pyt2r(1.0e6, &y, t);
            let h = eos.ty2h(t, &y);
            // start far from the answer
            let t_back = eos.rhy2t(rho, h, &y, 0.5 * t);
            assert_relative_eq!(t_back, t, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_temperature_round_trip_constant_cp() {
        let eos = constant_cp();
        let y = [0.3, 0.7];
        let t = 1234.5;
        let h = eos.ty2h(t, &y);
        let t_back = eos.rhy2t(1.0e-3, h, &y, -1.0);
        assert_relative_eq!(t_back, t, max_relative = 1e-12);
        // h_ref is given in J/kg and stored in erg/g
        assert_relative_eq!(eos.hk(0, 300.0), 1.0e9, max_relative = 1e-14);
    }

    #[test]
    fn test_gamma_inv() {
        let eos = air();
        let y = [0.233, 0.767];
        let g_inv = eos.gamma_inv(300.0, &y);
        // gamma of air at room temperature is 1.4
        assert_relative_eq!(1.0 / g_inv, 1.4, epsilon = 5e-3);
        let eos = constant_cp();
        let cp = eos.ty2cp(300.0, &y);
        let cv = eos.ty2cv(300.0, &y);
        assert_relative_eq!(cp - cv, units::RU / eos.wbar(&y), max_relative = 1e-12);
        assert_relative_eq!(cv / cp, eos.gamma_inv(300.0, &y), epsilon = 1e-15);
    }

    #[test]
    fn test_config_errors() {
        let mut config = EosConfig::default();
        config.species[0].nasa7 = None;
        assert!(matches!(
            EosModel::from_config(&config),
            Err(EosError::MissingThermoData { .. })
        ));

        let mut config = EosConfig::default();
        config.species[1].formula = None;
        assert!(matches!(
            EosModel::from_config(&config),
            Err(EosError::MissingMolarMass(_))
        ));

        let config = EosConfig {
            model: EosModelKind::IdealGas,
            species: vec![],
            t_ref: 298.15,
        };
        assert!(matches!(
            EosModel::from_config(&config),
            Err(EosError::EmptyMixture)
        ));
    }

    #[test]
    fn test_species_set_needs_one_weight_per_name() {
        let names = vec!["O2".to_string(), "N2".to_string()];
        assert!(matches!(
            SpeciesSet::new(names.clone(), vec![31.998]),
            Err(EosError::SpeciesDataLength {
                names: 2,
                weights: 1
            })
        ));
        assert!(matches!(
            SpeciesSet::new(names.clone(), vec![31.998, 28.014, 4.0]),
            Err(EosError::SpeciesDataLength { .. })
        ));
        let set = SpeciesSet::new(names, vec![31.998, 28.014]).unwrap();
        assert_eq!(set.len(), 2);
        assert_relative_eq!(set.inv_molecular_weights()[1], 1.0 / 28.014);
    }
}
