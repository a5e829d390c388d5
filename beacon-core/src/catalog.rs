//! Named generator functions and named constants.
//!
//! Catalogs are plain values handed to a search or validation run; nothing
//! here is global. `standard()` reproduces the tables the recorded baselines
//! were computed with.

use std::f64::consts::{E, LN_2, LOG10_E, PI, TAU};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Signature of a generator: `(index, constant) -> real`.
pub type GeneratorFn = fn(usize, f64) -> f64;

/// A pure generator function paired with its name.
#[derive(Clone)]
pub struct GeneratorSpec {
    name: String,
    func: GeneratorFn,
}

impl GeneratorSpec {
    pub fn new(name: impl Into<String>, func: GeneratorFn) -> Self {
        GeneratorSpec {
            name: name.into(),
            func,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eval(&self, index: usize, constant: f64) -> f64 {
        (self.func)(index, constant)
    }
}

impl fmt::Debug for GeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSpec")
            .field("name", &self.name)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Standard generators
// ---------------------------------------------------------------------------

fn sq(i: usize) -> f64 {
    let i = i as f64;
    i * i
}

/// 128 + 127·sin(i²·c)
pub fn sin_i2(i: usize, c: f64) -> f64 {
    128.0 + 127.0 * (sq(i) * c).sin()
}

/// 128 + 127·cos(i²·c)
pub fn cos_i2(i: usize, c: f64) -> f64 {
    128.0 + 127.0 * (sq(i) * c).cos()
}

/// 128 + 127·sin(i·c)
pub fn sin_i(i: usize, c: f64) -> f64 {
    128.0 + 127.0 * (i as f64 * c).sin()
}

/// 128 + 127·sin(i³·c)
pub fn sin_i3(i: usize, c: f64) -> f64 {
    let i = i as f64;
    128.0 + 127.0 * (i * i * i * c).sin()
}

/// trunc(i²·c) mod 256
pub fn mod_i2(i: usize, c: f64) -> f64 {
    (sq(i) * c).trunc().rem_euclid(256.0)
}

/// trunc(i·c) mod 256
pub fn mod_i(i: usize, c: f64) -> f64 {
    (i as f64 * c).trunc().rem_euclid(256.0)
}

/// trunc(frac(i²·c)·256)
pub fn frac_i2(i: usize, c: f64) -> f64 {
    ((sq(i) * c).rem_euclid(1.0) * 256.0).trunc()
}

/// trunc(128 + 127·tanh(i²·c/1000))
pub fn tanh_i2(i: usize, c: f64) -> f64 {
    (128.0 + 127.0 * (sq(i) * c * 0.001).tanh()).trunc()
}

/// 128 + 127·sin(ln(i+1)·c)
pub fn sin_log(i: usize, c: f64) -> f64 {
    128.0 + 127.0 * ((i as f64 + 1.0).ln() * c).sin()
}

/// 128 + 127·sin(√i·c)
pub fn sin_sqrt(i: usize, c: f64) -> f64 {
    128.0 + 127.0 * ((i as f64).sqrt() * c).sin()
}

/// Ordered, named collection of generators.
#[derive(Debug, Clone, Default)]
pub struct GeneratorCatalog {
    entries: Vec<GeneratorSpec>,
}

impl GeneratorCatalog {
    pub fn new(entries: Vec<GeneratorSpec>) -> Self {
        GeneratorCatalog { entries }
    }

    /// The ten generators of the original sweep, in sweep order.
    pub fn standard() -> Self {
        GeneratorCatalog::new(vec![
            GeneratorSpec::new("sin_i2", sin_i2),
            GeneratorSpec::new("cos_i2", cos_i2),
            GeneratorSpec::new("sin_i", sin_i),
            GeneratorSpec::new("sin_i3", sin_i3),
            GeneratorSpec::new("mod_i2", mod_i2),
            GeneratorSpec::new("mod_i", mod_i),
            GeneratorSpec::new("frac_i2", frac_i2),
            GeneratorSpec::new("tan_i2", tanh_i2),
            GeneratorSpec::new("sin_log", sin_log),
            GeneratorSpec::new("sin_sqrt", sin_sqrt),
        ])
    }

    pub fn push(&mut self, spec: GeneratorSpec) {
        self.entries.push(spec);
    }

    pub fn get(&self, name: &str) -> Option<&GeneratorSpec> {
        self.entries.iter().find(|g| g.name() == name)
    }

    /// Sub-catalog with the named generators, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<Self, ConfigError> {
        let entries = names
            .iter()
            .map(|&name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownEntry {
                        kind: "generator",
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GeneratorCatalog { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratorSpec> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// A named real-valued constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedConstant {
    pub name: String,
    pub value: f64,
}

impl NamedConstant {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        NamedConstant {
            name: name.into(),
            value,
        }
    }
}

/// Ordered, named collection of constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstantCatalog {
    entries: Vec<NamedConstant>,
}

impl ConstantCatalog {
    pub fn new(entries: Vec<NamedConstant>) -> Self {
        ConstantCatalog { entries }
    }

    /// Algebraic, transcendental and classical constants plus a few
    /// multiples of π and e (21 entries).
    pub fn standard() -> Self {
        let sqrt5 = 5f64.sqrt();
        ConstantCatalog::new(vec![
            NamedConstant::new("sqrt2", 2f64.sqrt()),
            NamedConstant::new("sqrt3", 3f64.sqrt()),
            NamedConstant::new("sqrt5", sqrt5),
            NamedConstant::new("golden_phi", (1.0 + sqrt5) / 2.0),
            NamedConstant::new("silver", 1.0 + 2f64.sqrt()),
            NamedConstant::new("pi", PI),
            NamedConstant::new("e", E),
            NamedConstant::new("tau", TAU),
            NamedConstant::new("ln2", LN_2),
            NamedConstant::new("log10_e", LOG10_E),
            NamedConstant::new("euler_gamma", 0.5772156649),
            NamedConstant::new("apery", 1.2020569),
            NamedConstant::new("catalan", 0.915965594),
            NamedConstant::new("khinchin", 2.6854520010),
            NamedConstant::new("glaisher", 1.2824271291),
            NamedConstant::new("pi_2", PI / 2.0),
            NamedConstant::new("pi_4", PI / 4.0),
            NamedConstant::new("2pi", 2.0 * PI),
            NamedConstant::new("3pi", 3.0 * PI),
            NamedConstant::new("e_2", E / 2.0),
            NamedConstant::new("2e", 2.0 * E),
        ])
    }

    pub fn push(&mut self, constant: NamedConstant) {
        self.entries.push(constant);
    }

    pub fn get(&self, name: &str) -> Option<&NamedConstant> {
        self.entries.iter().find(|c| c.name == name)
    }

    /// Sub-catalog with the named constants, in the order given.
    pub fn select(&self, names: &[&str]) -> Result<Self, ConfigError> {
        let entries = names
            .iter()
            .map(|&name| {
                self.get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownEntry {
                        kind: "constant",
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ConstantCatalog { entries })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedConstant> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_sizes() {
        assert_eq!(GeneratorCatalog::standard().len(), 10);
        assert_eq!(ConstantCatalog::standard().len(), 21);
    }

    #[test]
    fn test_generator_values() {
        assert_eq!(sin_i2(0, PI), 128.0);
        assert_eq!(cos_i2(0, PI), 255.0);
        assert_eq!(mod_i(300, 1.0), 44.0);
        assert_eq!(mod_i2(16, 1.0), 0.0);
        assert_eq!(frac_i2(1, 0.5), 128.0);
        assert_eq!(tanh_i2(0, 1.0), 128.0);
        assert_eq!(sin_log(0, 5.0), 128.0);
        assert_eq!(sin_sqrt(0, 5.0), 128.0);
    }

    #[test]
    fn test_bounded_generators_stay_in_range() {
        let catalog = GeneratorCatalog::standard();
        for spec in catalog.iter() {
            for i in 0..192 {
                let v = spec.eval(i, PI);
                assert!(v.is_finite(), "{} at {} is not finite", spec.name(), i);
                assert!(
                    (0.0..=256.0).contains(&v),
                    "{} at {} = {} out of range",
                    spec.name(),
                    i,
                    v
                );
            }
        }
    }

    #[test]
    fn test_select() {
        let generators = GeneratorCatalog::standard();
        let picked = generators.select(&["sin_i", "sin_i2"]).unwrap();
        let names: Vec<&str> = picked.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["sin_i", "sin_i2"]);

        let err = generators.select(&["nope"]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::UnknownEntry {
                kind: "generator",
                name: "nope".to_string()
            }
        );

        let constants = ConstantCatalog::standard();
        let pi = constants.select(&["pi"]).unwrap();
        assert_eq!(pi.len(), 1);
        assert_eq!(pi.get("pi").unwrap().value, PI);
    }
}
