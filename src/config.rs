use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::fidelity::{LowFidelityFormula, ReferenceLoad};
use crate::grid::SampleGrid;
use crate::noise::NoiseSettings;
use crate::PropLoadError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub grid: SampleGrid,
    pub reference: ReferenceLoad,
    pub low_fidelity_formula: LowFidelityFormula,
    /// Applied to the high-fidelity table only when present.
    pub noise: Option<NoiseSettings>,
    /// Prefix for output files: `{stem}_lf.csv`. Plain `lf.csv` when unset.
    pub output_stem: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid: SampleGrid::default(),
            reference: ReferenceLoad::new(1200.0, 100.0),
            low_fidelity_formula: LowFidelityFormula::Bracket,
            noise: None,
            output_stem: None,
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, PropLoadError> {
        let config: GeneratorConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, PropLoadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn validate(&self) -> Result<(), PropLoadError> {
        self.grid.validate()?;

        let reference = &self.reference;
        if !reference.base_propspeed.is_finite() || reference.base_propspeed == 0.0 {
            return Err(PropLoadError::InvalidConfig(
                "reference.base_propspeed must be finite and non-zero".to_string(),
            ));
        }
        if !reference.load_at_base_propspeed.is_finite() {
            return Err(PropLoadError::InvalidConfig(
                "reference.load_at_base_propspeed must be finite".to_string(),
            ));
        }

        if let Some(stem) = &self.output_stem {
            if stem.trim().is_empty() || stem.contains(['/', '\\']) {
                return Err(PropLoadError::InvalidConfig(
                    "output_stem must be non-empty and contain no path separators".to_string(),
                ));
            }
        }

        if let Some(noise) = &self.noise {
            if !(noise.radius.is_finite() && noise.radius > 0.0) {
                return Err(PropLoadError::InvalidConfig(
                    "noise.radius must be finite and greater than zero".to_string(),
                ));
            }
            if !noise.noise_shift.is_finite() || !noise.axial_noise_adv_rat.is_finite() {
                return Err(PropLoadError::InvalidConfig(
                    "noise.noise_shift and noise.axial_noise_adv_rat must be finite".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Low- and high-fidelity CSV file names.
    pub fn output_files(&self) -> [String; 2] {
        match &self.output_stem {
            Some(stem) => [format!("{stem}_lf.csv"), format!("{stem}_hf.csv")],
            None => ["lf.csv".to_string(), "hf.csv".to_string()],
        }
    }
}
