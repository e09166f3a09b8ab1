//! Row-oriented result table shared by the generators and the noise injector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shape::check_independents;
use crate::PropLoadError;

/// Column names consumed downstream. These must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Airspeed,
    Discangle,
    Propspeed,
    Load,
    LoadNoise,
}

impl Column {
    pub const BASE: [Column; 4] = [
        Column::Airspeed,
        Column::Discangle,
        Column::Propspeed,
        Column::Load,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Airspeed => "airspeed",
            Column::Discangle => "discangle",
            Column::Propspeed => "propspeed",
            Column::Load => "load",
            Column::LoadNoise => "load_noise",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = PropLoadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "airspeed" => Ok(Column::Airspeed),
            "discangle" => Ok(Column::Discangle),
            "propspeed" => Ok(Column::Propspeed),
            "load" => Ok(Column::Load),
            "load_noise" => Ok(Column::LoadNoise),
            other => Err(PropLoadError::InvalidConfig(format!(
                "unknown column '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadRow {
    pub airspeed: f64,
    pub discangle: f64,
    pub propspeed: f64,
    pub load: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_noise: Option<f64>,
}

impl LoadRow {
    pub fn get(&self, column: Column) -> Option<f64> {
        match column {
            Column::Airspeed => Some(self.airspeed),
            Column::Discangle => Some(self.discangle),
            Column::Propspeed => Some(self.propspeed),
            Column::Load => Some(self.load),
            Column::LoadNoise => self.load_noise,
        }
    }
}

/// Generated dataset, one row per input sample in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoadTable {
    rows: Vec<LoadRow>,
    /// Set once a `load_noise` column has been written, even for zero rows.
    #[serde(default)]
    noise_applied: bool,
}

impl LoadTable {
    /// Rows that all carry `load_noise` mark the column as present.
    pub fn from_rows(rows: Vec<LoadRow>) -> Self {
        let noise_applied = !rows.is_empty() && rows.iter().all(|row| row.load_noise.is_some());
        Self {
            rows,
            noise_applied,
        }
    }

    /// Assemble a table from column slices; shapes are validated first.
    pub fn from_columns(
        discangle: &[f64],
        airspeed: &[f64],
        propspeed: &[f64],
        load: &[f64],
    ) -> Result<Self, PropLoadError> {
        check_independents(&[&discangle, &airspeed, &propspeed, &load])?;

        let rows = discangle
            .iter()
            .zip(airspeed)
            .zip(propspeed)
            .zip(load)
            .map(|(((&discangle, &airspeed), &propspeed), &load)| LoadRow {
                airspeed,
                discangle,
                propspeed,
                load,
                load_noise: None,
            })
            .collect();

        Ok(Self {
            rows,
            noise_applied: false,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[LoadRow] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [LoadRow] {
        &mut self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoadRow> {
        self.rows.iter()
    }

    /// True once a `load_noise` column has been added, regardless of row count.
    pub fn has_noise(&self) -> bool {
        self.noise_applied
    }

    /// Record that every row now carries `load_noise`.
    pub fn mark_noise_applied(&mut self) {
        self.noise_applied = true;
    }

    pub fn columns(&self) -> Vec<Column> {
        let mut columns = Column::BASE.to_vec();
        if self.has_noise() {
            columns.push(Column::LoadNoise);
        }
        columns
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns().into_iter().map(Column::name).collect()
    }

    /// Extract one column, `None` if it is not present in this table.
    pub fn column(&self, column: Column) -> Option<Vec<f64>> {
        if column == Column::LoadNoise && !self.has_noise() {
            return None;
        }
        self.rows.iter().map(|row| row.get(column)).collect()
    }

    pub fn column_by_name(&self, name: &str) -> Option<Vec<f64>> {
        name.parse::<Column>().ok().and_then(|c| self.column(c))
    }
}

impl<'a> IntoIterator for &'a LoadTable {
    type Item = &'a LoadRow;
    type IntoIter = std::slice::Iter<'a, LoadRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for LoadTable {
    type Item = LoadRow;
    type IntoIter = std::vec::IntoIter<LoadRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
