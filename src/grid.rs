//! Full-factorial sampling of the three independent variables.

use serde::{Deserialize, Serialize};

use crate::PropLoadError;

/// Evenly spaced samples over `[min, max]`, both ends included.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl Axis {
    pub fn new(min: f64, max: f64, count: usize) -> Self {
        Self { min, max, count }
    }

    pub fn validate(&self, name: &str) -> Result<(), PropLoadError> {
        if self.count == 0 {
            return Err(PropLoadError::InvalidConfig(format!(
                "{name}.count must be greater than zero"
            )));
        }
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(PropLoadError::InvalidConfig(format!(
                "{name}.min and {name}.max must be finite"
            )));
        }
        if self.max < self.min {
            return Err(PropLoadError::InvalidConfig(format!(
                "{name}.max must be greater than or equal to {name}.min"
            )));
        }
        Ok(())
    }

    pub fn values(&self) -> Vec<f64> {
        if self.count == 1 {
            return vec![self.min];
        }

        let span = self.max - self.min;
        let denom = (self.count - 1) as f64;

        (0..self.count)
            .map(|idx| self.min + span * idx as f64 / denom)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    pub discangle: Axis,
    pub airspeed: Axis,
    pub propspeed: Axis,
}

/// Flattened grid coordinates, all of length `SampleGrid::len`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    pub discangle: Vec<f64>,
    pub airspeed: Vec<f64>,
    pub propspeed: Vec<f64>,
}

impl Default for SampleGrid {
    fn default() -> Self {
        Self {
            discangle: Axis::new(0.0, 90.0, 7),
            airspeed: Axis::new(0.0, 40.0, 5),
            propspeed: Axis::new(800.0, 1600.0, 5),
        }
    }
}

impl SampleGrid {
    pub fn validate(&self) -> Result<(), PropLoadError> {
        self.discangle.validate("discangle")?;
        self.airspeed.validate("airspeed")?;
        self.propspeed.validate("propspeed")?;
        if self.checked_len().is_none() {
            return Err(PropLoadError::InvalidConfig(format!(
                "grid size {} x {} x {} overflows usize",
                self.discangle.count, self.airspeed.count, self.propspeed.count
            )));
        }
        Ok(())
    }

    /// Number of grid points, `None` if the product overflows.
    pub fn checked_len(&self) -> Option<usize> {
        self.discangle
            .count
            .checked_mul(self.airspeed.count)?
            .checked_mul(self.propspeed.count)
    }

    /// Saturates at `usize::MAX`; [`SampleGrid::validate`] rejects such grids.
    pub fn len(&self) -> usize {
        self.checked_len().unwrap_or(usize::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Disc angle varies slowest, propeller speed fastest.
    pub fn samples(&self) -> Samples {
        let discangles = self.discangle.values();
        let airspeeds = self.airspeed.values();
        let propspeeds = self.propspeed.values();

        let n = self.len();
        let mut out = Samples {
            discangle: Vec::with_capacity(n),
            airspeed: Vec::with_capacity(n),
            propspeed: Vec::with_capacity(n),
        };

        for &d in &discangles {
            for &a in &airspeeds {
                for &p in &propspeeds {
                    out.discangle.push(d);
                    out.airspeed.push(a);
                    out.propspeed.push(p);
                }
            }
        }

        out
    }
}
