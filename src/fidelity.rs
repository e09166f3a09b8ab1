//! Closed-form low- and high-fidelity propeller load generators.
//!
//! Both generators share the same reference scaling
//! `load_at_base_propspeed * (propspeed / base_propspeed)^2` and differ in the
//! disc-angle/airspeed correction term. Zero propeller speeds and a zero
//! reference speed are not special-cased; the resulting infinities and NaNs
//! are passed through to the table.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shape::check_independents;
use crate::table::{LoadRow, LoadTable};
use crate::PropLoadError;

/// Reference operating point the load is scaled from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLoad {
    pub base_propspeed: f64,
    pub load_at_base_propspeed: f64,
}

impl ReferenceLoad {
    pub fn new(base_propspeed: f64, load_at_base_propspeed: f64) -> Self {
        Self {
            base_propspeed,
            load_at_base_propspeed,
        }
    }

    fn scaled(&self, propspeed: f64) -> f64 {
        self.load_at_base_propspeed * (propspeed / self.base_propspeed).powi(2)
    }
}

/// Which low-fidelity expression to evaluate.
///
/// `Bracket` is the canonical model. `Additive` reproduces the older
/// dataset lineage and only runs when asked for by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowFidelityFormula {
    #[default]
    Bracket,
    Additive,
}

impl std::str::FromStr for LowFidelityFormula {
    type Err = PropLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bracket" => Ok(Self::Bracket),
            "additive" => Ok(Self::Additive),
            other => Err(PropLoadError::InvalidConfig(format!(
                "unknown low-fidelity formula '{other}', expected 'bracket' or 'additive'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fidelity {
    Low(LowFidelityFormula),
    High,
}

impl Fidelity {
    pub fn label(self) -> &'static str {
        match self {
            Fidelity::Low(_) => "low",
            Fidelity::High => "high",
        }
    }

    /// Load for a single row. `max_propspeed` is the maximum over the batch.
    pub fn load(
        self,
        reference: &ReferenceLoad,
        discangle: f64,
        airspeed: f64,
        propspeed: f64,
        max_propspeed: f64,
    ) -> f64 {
        let sin_disc = discangle.to_radians().sin();
        let scaled = reference.scaled(propspeed);

        match self {
            Fidelity::Low(LowFidelityFormula::Bracket) => {
                let ratio = max_propspeed.powi(2) / propspeed.powi(2);
                scaled * (1.0 + ratio * sin_disc * airspeed / 30.0)
            }
            Fidelity::Low(LowFidelityFormula::Additive) => {
                scaled + 0.25 * sin_disc * (1.0 + airspeed / 20.0)
            }
            Fidelity::High => {
                let ratio = max_propspeed.powi(3) / propspeed.powi(3);
                scaled * (0.95 + ratio * sin_disc * airspeed / 35.0)
            }
        }
    }
}

/// Maximum propeller speed over the batch; any NaN entry makes it NaN.
fn batch_max(propspeed: &[f64]) -> f64 {
    if propspeed.iter().any(|p| p.is_nan()) {
        return f64::NAN;
    }
    propspeed.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Evaluate `fidelity` over validated independent variables.
pub fn generate(
    fidelity: Fidelity,
    discangle: &[f64],
    airspeed: &[f64],
    propspeed: &[f64],
    reference: &ReferenceLoad,
) -> Result<LoadTable, PropLoadError> {
    check_independents(&[&discangle, &airspeed, &propspeed])?;

    if propspeed.is_empty() {
        debug!(fidelity = fidelity.label(), rows = 0, "generated empty load table");
        return Ok(LoadTable::default());
    }
    let max_propspeed = batch_max(propspeed);

    let rows: Vec<LoadRow> = discangle
        .iter()
        .zip(airspeed)
        .zip(propspeed)
        .map(|((&discangle, &airspeed), &propspeed)| LoadRow {
            airspeed,
            discangle,
            propspeed,
            load: fidelity.load(reference, discangle, airspeed, propspeed, max_propspeed),
            load_noise: None,
        })
        .collect();

    debug!(
        fidelity = fidelity.label(),
        rows = rows.len(),
        max_propspeed,
        "generated load table"
    );

    Ok(LoadTable::from_rows(rows))
}

/// Low-fidelity dataset using the canonical bracket formula.
pub fn lf_data(
    discangle: &[f64],
    airspeed: &[f64],
    propspeed: &[f64],
    base_propspeed: f64,
    load_at_base_propspeed: f64,
) -> Result<LoadTable, PropLoadError> {
    lf_data_with(
        discangle,
        airspeed,
        propspeed,
        base_propspeed,
        load_at_base_propspeed,
        LowFidelityFormula::Bracket,
    )
}

pub fn lf_data_with(
    discangle: &[f64],
    airspeed: &[f64],
    propspeed: &[f64],
    base_propspeed: f64,
    load_at_base_propspeed: f64,
    formula: LowFidelityFormula,
) -> Result<LoadTable, PropLoadError> {
    generate(
        Fidelity::Low(formula),
        discangle,
        airspeed,
        propspeed,
        &ReferenceLoad::new(base_propspeed, load_at_base_propspeed),
    )
}

pub fn hf_data(
    discangle: &[f64],
    airspeed: &[f64],
    propspeed: &[f64],
    base_propspeed: f64,
    load_at_base_propspeed: f64,
) -> Result<LoadTable, PropLoadError> {
    generate(
        Fidelity::High,
        discangle,
        airspeed,
        propspeed,
        &ReferenceLoad::new(base_propspeed, load_at_base_propspeed),
    )
}
