//! propload - synthetic propeller load datasets
//!
//! Closed-form low- and high-fidelity load models over disc angle, airspeed
//! and propeller speed, plus deterministic advance-ratio noise. The tables
//! produced here are training targets for multi-fidelity surrogate models.

pub mod config;
pub mod error;
pub mod fidelity;
pub mod grid;
pub mod io;
pub mod logging;
pub mod noise;
pub mod shape;
pub mod table;

pub use config::GeneratorConfig;
pub use error::PropLoadError;
pub use fidelity::{hf_data, lf_data, lf_data_with, Fidelity, LowFidelityFormula, ReferenceLoad};
pub use grid::{Axis, SampleGrid, Samples};
pub use noise::{add_noise_adv_rat, axial_advance_ratio, inject_with_rng, NoiseSettings};
pub use shape::{check_independents, Shape, Shaped};
pub use table::{Column, LoadRow, LoadTable};

/// Low- and high-fidelity tables for one sampled grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Datasets {
    pub low: LoadTable,
    pub high: LoadTable,
}

/// Generate both fidelities for `config`, applying noise to the
/// high-fidelity table when configured.
pub fn generate_datasets(config: &GeneratorConfig) -> Result<Datasets, PropLoadError> {
    config.validate()?;
    let samples = config.grid.samples();
    let reference = &config.reference;

    let low = fidelity::generate(
        Fidelity::Low(config.low_fidelity_formula),
        &samples.discangle,
        &samples.airspeed,
        &samples.propspeed,
        reference,
    )?;
    let mut high = fidelity::generate(
        Fidelity::High,
        &samples.discangle,
        &samples.airspeed,
        &samples.propspeed,
        reference,
    )?;

    if let Some(noise) = &config.noise {
        noise.apply(&mut high);
    }

    Ok(Datasets { low, high })
}
