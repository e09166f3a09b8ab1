//! Heteroscedastic noise keyed on the axial advance ratio.
//!
//! Rows whose axial advance ratio exceeds a threshold get their load scaled
//! by `noise_shift * u` with `u ~ U[0, 1) + 0.5`. One `u` is drawn per row, in
//! row order, whether or not the row ends up perturbed, so the value applied
//! to row `i` depends only on `i` and the seed.
//!
//! The random state is built fresh from the seed on every call instead of
//! living in a process-wide generator. Repeated calls on the same table give
//! bit-identical `load_noise` columns and concurrent callers cannot perturb
//! each other.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::table::LoadTable;

pub const NOISE_SEED: u64 = 0;
pub const DEFAULT_RADIUS: f64 = 1.6;
pub const DEFAULT_NOISE_SHIFT: f64 = 1.0;
pub const NOISE_OFFSET: f64 = 0.5;

/// `(airspeed * sin(discangle)) / (omega * radius)` with `omega` in rad/s
/// derived from `propspeed` in rpm.
pub fn axial_advance_ratio(discangle: f64, airspeed: f64, propspeed: f64, radius: f64) -> f64 {
    (discangle.to_radians().sin() * airspeed) / (propspeed * PI * radius / 30.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseSettings {
    pub axial_noise_adv_rat: f64,
    pub radius: f64,
    pub noise_shift: f64,
    pub seed: u64,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            axial_noise_adv_rat: 0.0,
            radius: DEFAULT_RADIUS,
            noise_shift: DEFAULT_NOISE_SHIFT,
            seed: NOISE_SEED,
        }
    }
}

impl NoiseSettings {
    pub fn with_threshold(axial_noise_adv_rat: f64) -> Self {
        Self {
            axial_noise_adv_rat,
            ..Self::default()
        }
    }

    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// Reseed from `self.seed` and write `load_noise` for every row.
    pub fn apply(&self, table: &mut LoadTable) -> usize {
        let mut rng = self.rng();
        inject_with_rng(table, self, &mut rng)
    }
}

/// Noise multipliers drawn from a freshly seeded stream, one per row.
pub fn noise_sequence(seed: u64, len: usize) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    draw(&mut rng, len)
}

fn draw<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Vec<f64> {
    let unit = Uniform::new(0.0_f64, 1.0);
    (0..len).map(|_| unit.sample(&mut *rng) + NOISE_OFFSET).collect()
}

/// Apply noise using a caller-owned random state. The `seed` field of
/// `settings` is not consulted. Returns the number of perturbed rows.
pub fn inject_with_rng<R: Rng + ?Sized>(
    table: &mut LoadTable,
    settings: &NoiseSettings,
    rng: &mut R,
) -> usize {
    let noise = draw(rng, table.len());
    let mut perturbed = 0usize;

    for (row, u) in table.rows_mut().iter_mut().zip(noise) {
        let adv_rat =
            axial_advance_ratio(row.discangle, row.airspeed, row.propspeed, settings.radius);
        row.load_noise = if adv_rat > settings.axial_noise_adv_rat {
            perturbed += 1;
            Some(settings.noise_shift * row.load * u)
        } else {
            Some(row.load)
        };
    }
    table.mark_noise_applied();

    debug!(
        rows = table.len(),
        perturbed,
        threshold = settings.axial_noise_adv_rat,
        "applied advance-ratio noise"
    );

    perturbed
}

/// Add a `load_noise` column, reseeding with [`NOISE_SEED`] on every call.
pub fn add_noise_adv_rat(
    mut table: LoadTable,
    axial_noise_adv_rat: f64,
    radius: f64,
    noise_shift: f64,
) -> LoadTable {
    let settings = NoiseSettings {
        axial_noise_adv_rat,
        radius,
        noise_shift,
        seed: NOISE_SEED,
    };
    settings.apply(&mut table);
    table
}
