use crate::Thermodynamics::eos_closure::EosError;
use serde::{Deserialize, Serialize};

/// NASA 7-coefficient polynomial of one species.
///
/// Coefficients are stored in the flat layout used by thermochemistry libraries:
/// temperature bounds first, then 7 coefficients per temperature range.
/// * 9 numbers: `T1 T2 a1..a7`
/// * 17 numbers: `T1 T2 T3 a1..a7 (T1..T2) a1..a7 (T2..T3)`
/// * 25 numbers: `T1 T2 T3 T4` followed by three sets of 7 coefficients
///
/// The polynomials are dimensionless (`cp/R`, `h/RT`); the caller multiplies by the gas constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NASAdata {
    /// temperature bounds of the ranges, ascending
    pub t_bounds: Vec<f64>,
    /// one set of 7 coefficients per range
    pub coeffs: Vec<[f64; 7]>,
}

impl NASAdata {
    /// takes the flat coefficient vector and splits it into ranges
    pub fn from_flat(c_data: &[f64]) -> Result<Self, EosError> {
        let n_ranges = match c_data.len() {
            9 => 1,
            17 => 2,
            25 => 3,
            n => return Err(EosError::InvalidNasaLength(n)),
        };
        let t_bounds = c_data[..n_ranges + 1].to_vec();
        if t_bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(EosError::InvalidTemperatureRange(t_bounds));
        }
        let coeffs = c_data[n_ranges + 1..]
            .chunks_exact(7)
            .map(|c| [c[0], c[1], c[2], c[3], c[4], c[5], c[6]])
            .collect();
        Ok(Self { t_bounds, coeffs })
    }

    /// picks the 7 coefficients valid at `t`; outside of the table the nearest range is used
    fn extract_coefficients(&self, t: f64) -> &[f64; 7] {
        let last = self.coeffs.len() - 1;
        let range = self.t_bounds[1..]
            .iter()
            .position(|&t_hi| t <= t_hi)
            .unwrap_or(last);
        &self.coeffs[range]
    }

    /// dimensionless heat capacity cp/R at T
    pub fn cp_over_r(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, _] = *self.extract_coefficients(t);
        a + b * t + c * t.powi(2) + d * t.powi(3) + e * t.powi(4)
    }

    /// dimensionless enthalpy h/(RT) at T
    pub fn h_over_rt(&self, t: f64) -> f64 {
        let [a, b, c, d, e, f, _] = *self.extract_coefficients(t);
        a + b * t / 2.0 + c * t.powi(2) / 3.0 + d * t.powi(3) / 4.0 + e * t.powi(4) / 5.0 + f / t
    }

    /// dimensionless entropy s/R at T
    pub fn s_over_r(&self, t: f64) -> f64 {
        let [a, b, c, d, e, _, g] = *self.extract_coefficients(t);
        a * t.ln() + b * t + c * t.powi(2) / 2.0 + d * t.powi(3) / 3.0 + e * t.powi(4) / 4.0 + g
    }
}

/// GRI-Mech 3.0 polynomials of the species used by the demos and tests
pub mod gri30 {
    pub const O2: [f64; 17] = [
        200.0,
        1000.0,
        3500.0,
        3.78245636E+00,
        -2.99673416E-03,
        9.84730201E-06,
        -9.68129509E-09,
        3.24372837E-12,
        -1.06394356E+03,
        3.65767573E+00,
        3.28253784E+00,
        1.48308754E-03,
        -7.57966669E-07,
        2.09470555E-10,
        -2.16717794E-14,
        -1.08845772E+03,
        5.45323129E+00,
    ];
    pub const N2: [f64; 17] = [
        300.0,
        1000.0,
        5000.0,
        3.298677E+00,
        1.4082404E-03,
        -3.963222E-06,
        5.641515E-09,
        -2.444854E-12,
        -1.0208999E+03,
        3.950372E+00,
        2.92664E+00,
        1.4879768E-03,
        -5.68476E-07,
        1.0097038E-10,
        -6.753351E-15,
        -9.227977E+02,
        5.980528E+00,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_flat_layouts() {
        let o2 = NASAdata::from_flat(&gri30::O2).unwrap();
        assert_eq!(o2.t_bounds, vec![200.0, 1000.0, 3500.0]);
        assert_eq!(o2.coeffs.len(), 2);

        let single = NASAdata::from_flat(&[300.0, 1000.0, 3.5, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        assert_relative_eq!(single.cp_over_r(500.0), 3.5, epsilon = 1e-14);

        assert!(matches!(
            NASAdata::from_flat(&[1.0, 2.0, 3.0]),
            Err(EosError::InvalidNasaLength(3))
        ));
        let mut reversed = gri30::O2;
        reversed[1] = 100.0;
        assert!(NASAdata::from_flat(&reversed).is_err());
    }

    #[test]
    fn test_range_selection() {
        let o2 = NASAdata::from_flat(&gri30::O2).unwrap();
        // low range below T_mid, high range above
        let [a, ..] = *o2.extract_coefficients(999.0);
        assert_eq!(a, gri30::O2[3]);
        let [a, ..] = *o2.extract_coefficients(1500.0);
        assert_eq!(a, gri30::O2[10]);
        // out of the table falls back to the nearest range
        let [a, ..] = *o2.extract_coefficients(100.0);
        assert_eq!(a, gri30::O2[3]);
        let [a, ..] = *o2.extract_coefficients(8000.0);
        assert_eq!(a, gri30::O2[10]);
    }

    #[test]
    fn test_o2_properties_at_298() {
        let o2 = NASAdata::from_flat(&gri30::O2).unwrap();
        // cp of O2 at 298.15 K is 29.38 J/(mol K)
        assert_relative_eq!(o2.cp_over_r(298.15) * 8.314462618, 29.38, epsilon = 0.05);
        // standard enthalpy of formation of O2 is zero
        assert_relative_eq!(o2.h_over_rt(298.15) * 8.314462618 * 298.15, 0.0, epsilon = 5.0);
        // continuity at T_mid
        assert_relative_eq!(
            o2.coeffs[0][0]
                + o2.coeffs[0][1] * 1000.0
                + o2.coeffs[0][2] * 1e6
                + o2.coeffs[0][3] * 1e9
                + o2.coeffs[0][4] * 1e12,
            o2.cp_over_r(1000.0),
            epsilon = 1e-12
        );
        assert!(o2.s_over_r(298.15) > 0.0);
    }
}
