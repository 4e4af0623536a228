//! Module to calculate the atomic composition and molar mass of a species from its chemical formula.
//! Used to fill in molecular weights of the mixture when the configuration gives only formulas.
use crate::Thermodynamics::eos_closure::EosError;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

// Define a struct to hold element data
pub struct Element {
    name: &'static str,
    atomic_mass: f64,
}

// elements met in combustion mechanisms, atomic masses in g/mol
const ELEMENTS: &[Element] = &[
    Element {
        name: "H",
        atomic_mass: 1.008,
    },
    Element {
        name: "He",
        atomic_mass: 4.0026,
    },
    Element {
        name: "C",
        atomic_mass: 12.011,
    },
    Element {
        name: "N",
        atomic_mass: 14.007,
    },
    Element {
        name: "O",
        atomic_mass: 15.999,
    },
    Element {
        name: "F",
        atomic_mass: 18.998,
    },
    Element {
        name: "Ne",
        atomic_mass: 20.18,
    },
    Element {
        name: "S",
        atomic_mass: 32.065,
    },
    Element {
        name: "Cl",
        atomic_mass: 35.45,
    },
    Element {
        name: "Ar",
        atomic_mass: 39.948,
    },
    Element {
        name: "Kr",
        atomic_mass: 83.798,
    },
];

// a bracketed group with its multiplier, e.g. (OH)2
static BRACKET: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\(([A-Za-z0-9]+)\)(\d*)"));
// an element symbol with its count, e.g. H2
static COUNTED: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"([A-Z][a-z]?)(\d*)"));

fn pattern(re: &'static LazyLock<Result<Regex, regex::Error>>) -> Result<&'static Regex, EosError> {
    Result::as_ref(&**re).map_err(|e| EosError::Pattern(e.clone()))
}

fn atomic_mass(name: &str) -> Option<f64> {
    ELEMENTS.iter().find(|e| e.name == name).map(|e| e.atomic_mass)
}

// species names in mechanisms often carry phase marks like H2O(g) or C(s)
fn filter_phases_marks(formula: &str) -> String {
    let mut formula = formula.replace(' ', "");
    for phase in ["(C)", "(c)", "(L)", "(l)", "(G)", "(g)", "(S)", "(s)"] {
        formula = formula.replace(phase, "");
    }
    formula
}

/// Expands one level of bracketed groups, e.g. `C2H4(OH)2` -> `C2H4O2H2`.
fn expand_brackets(formula: &str) -> Result<String, EosError> {
    let (bracket, counted) = (pattern(&BRACKET)?, pattern(&COUNTED)?);
    let bad = || EosError::BadFormula(formula.to_string());
    let mut expanded = formula.to_string();
    loop {
        let (range, replacement) = match bracket.captures(&expanded) {
            Some(cap) => {
                let multiplier: usize = if cap[2].is_empty() {
                    1
                } else {
                    cap[2].parse().map_err(|_| bad())?
                };
                let mut replacement = String::new();
                for atom in counted.captures_iter(&cap[1]) {
                    let n: usize = if atom[2].is_empty() {
                        1
                    } else {
                        atom[2].parse().map_err(|_| bad())?
                    };
                    replacement.push_str(&format!("{}{}", &atom[1], n * multiplier));
                }
                (cap.get(0).ok_or_else(bad)?.range(), replacement)
            }
            None => break,
        };
        expanded.replace_range(range, &replacement);
    }
    if expanded.contains('(') || expanded.contains(')') {
        return Err(bad());
    }
    Ok(expanded)
}

/// Parses a chemical formula into a map element -> number of atoms.
pub fn parse_formula(formula: &str) -> Result<BTreeMap<String, usize>, EosError> {
    let cleaned = filter_phases_marks(formula);
    let expanded = expand_brackets(&cleaned)?;
    let mut counts = BTreeMap::new();
    let mut consumed = 0;
    for cap in pattern(&COUNTED)?.captures_iter(&expanded) {
        consumed += cap[0].len();
        let n: usize = if cap[2].is_empty() {
            1
        } else {
            cap[2]
                .parse()
                .map_err(|_| EosError::BadFormula(formula.to_string()))?
        };
        *counts.entry(cap[1].to_string()).or_insert(0) += n;
    }
    // anything the element pattern did not match is garbage
    if consumed != expanded.len() || counts.is_empty() {
        return Err(EosError::BadFormula(formula.to_string()));
    }
    debug!("parsed formula {} into {:?}", formula, counts);
    Ok(counts)
}

/// Molar mass [g/mol] of a substance given its chemical formula.
pub fn calculate_molar_mass(formula: &str) -> Result<f64, EosError> {
    let counts = parse_formula(formula)?;
    let mut molar_mass = 0.0;
    for (element, count) in counts {
        let m = atomic_mass(&element).ok_or_else(|| EosError::UnknownElement {
            element: element.clone(),
            formula: formula.to_string(),
        })?;
        molar_mass += m * count as f64;
    }
    Ok(molar_mass)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formula() {
        let expected = BTreeMap::from([("H".to_string(), 2), ("O".to_string(), 1)]);
        assert_eq!(parse_formula("H2O").unwrap(), expected);

        let expected = BTreeMap::from([
            ("C".to_string(), 2),
            ("H".to_string(), 6),
            ("O".to_string(), 2),
        ]);
        assert_eq!(parse_formula("C2H4(OH)2").unwrap(), expected);

        let expected = BTreeMap::from([("H".to_string(), 2), ("O".to_string(), 1)]);
        assert_eq!(parse_formula("H2O(g)").unwrap(), expected);
    }

    #[test]
    fn test_bad_formula() {
        assert!(parse_formula("h2o").is_err());
        assert!(parse_formula("").is_err());
        assert!(matches!(
            calculate_molar_mass("Xx2"),
            Err(EosError::UnknownElement { .. })
        ));
    }

    #[test]
    fn test_calculate_molar_mass() {
        let m = calculate_molar_mass("O2").unwrap();
        assert!((m - 31.998).abs() < 1e-3);
        let m = calculate_molar_mass("N2").unwrap();
        assert!((m - 28.014).abs() < 1e-3);
        let m = calculate_molar_mass("CH4").unwrap();
        assert!((m - 16.043).abs() < 1e-2);
    }

    #[test]
    fn test_patterns_are_compiled_once() {
        let first = pattern(&COUNTED).unwrap() as *const Regex;
        assert!(pattern(&BRACKET).is_ok());
        for formula in ["CH4", "C2H4(OH)2", "H2O(g)", "CO2"] {
            parse_formula(formula).unwrap();
        }
        assert_eq!(pattern(&COUNTED).unwrap() as *const Regex, first);
    }
}
