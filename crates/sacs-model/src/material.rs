//! Material constants applied to every group of a run.

use serde::Serialize;

/// Generic structural steel (ASTM A992, Fy = 50 ksi) used when the material
/// table is absent or incomplete.
pub mod defaults {
    pub const NAME: &str = "A992Fy50";
    /// Young's modulus [Pa]
    pub const ELASTIC_MODULUS: f64 = 1.9994798e11;
    /// Poisson's ratio [-]
    pub const POISSON_RATIO: f64 = 0.30;
    /// Yield strength [Pa]
    pub const YIELD_STRENGTH: f64 = 345e6;
    /// Density [kg/m³]
    pub const DENSITY: f64 = 7850.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialConstants {
    /// Young's modulus (E) [Pa]
    pub elastic_modulus: f64,
    /// Poisson's ratio (ν) [-]
    pub poisson_ratio: f64,
    /// Yield strength (fy) [Pa]
    pub yield_strength: f64,
    /// Density (ρ) [kg/m³]
    pub density: f64,
}

impl Default for MaterialConstants {
    fn default() -> Self {
        Self {
            elastic_modulus: defaults::ELASTIC_MODULUS,
            poisson_ratio: defaults::POISSON_RATIO,
            yield_strength: defaults::YIELD_STRENGTH,
            density: defaults::DENSITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Read,
    Default,
}

impl ValueSource {
    fn of(value: Option<f64>) -> Self {
        if value.is_some() {
            ValueSource::Read
        } else {
            ValueSource::Default
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MaterialProvenance {
    pub elastic_modulus: ValueSource,
    pub poisson_ratio: ValueSource,
    pub yield_strength: ValueSource,
    pub density: ValueSource,
}

impl MaterialProvenance {
    pub fn all_defaulted(&self) -> bool {
        [
            self.elastic_modulus,
            self.poisson_ratio,
            self.yield_strength,
            self.density,
        ]
        .iter()
        .all(|s| *s == ValueSource::Default)
    }
}

/// Values found in the optional material table; `None` falls back to the
/// matching entry of [`defaults`], field by field.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaterialOverrides {
    pub elastic_modulus: Option<f64>,
    pub poisson_ratio: Option<f64>,
    pub yield_strength: Option<f64>,
    pub density: Option<f64>,
}

impl MaterialOverrides {
    pub fn resolve(&self) -> MaterialConstants {
        let d = MaterialConstants::default();
        MaterialConstants {
            elastic_modulus: self.elastic_modulus.unwrap_or(d.elastic_modulus),
            poisson_ratio: self.poisson_ratio.unwrap_or(d.poisson_ratio),
            yield_strength: self.yield_strength.unwrap_or(d.yield_strength),
            density: self.density.unwrap_or(d.density),
        }
    }

    pub fn provenance(&self) -> MaterialProvenance {
        MaterialProvenance {
            elastic_modulus: ValueSource::of(self.elastic_modulus),
            poisson_ratio: ValueSource::of(self.poisson_ratio),
            yield_strength: ValueSource::of(self.yield_strength),
            density: ValueSource::of(self.density),
        }
    }
}
