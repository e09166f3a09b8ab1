//! Shape checks for the independent-variable arrays.
//!
//! Every generator takes three independent variables which must be
//! one-dimensional and of identical length. Anything that can report its
//! dimensions implements [`Shaped`], so nested (2-D) inputs can be rejected
//! with a readable message instead of being flattened.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PropLoadError;

/// Dimensions of an input array, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape(pub Vec<usize>);

impl Shape {
    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    /// Length along the first axis, `0` for a zero-dimensional shape.
    pub fn len(&self) -> usize {
        self.0.first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [only] => write!(f, "({only},)"),
            dims => {
                let joined = dims
                    .iter()
                    .map(usize::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({joined})")
            }
        }
    }
}

pub trait Shaped {
    fn shape(&self) -> Shape;
}

impl Shaped for [f64] {
    fn shape(&self) -> Shape {
        Shape(vec![self.len()])
    }
}

impl Shaped for Vec<f64> {
    fn shape(&self) -> Shape {
        self.as_slice().shape()
    }
}

impl<const N: usize> Shaped for [f64; N] {
    fn shape(&self) -> Shape {
        Shape(vec![N])
    }
}

impl Shaped for [Vec<f64>] {
    // Ragged rows report the width of the first row.
    fn shape(&self) -> Shape {
        let cols = self.first().map_or(0, Vec::len);
        Shape(vec![self.len(), cols])
    }
}

impl Shaped for Vec<Vec<f64>> {
    fn shape(&self) -> Shape {
        self.as_slice().shape()
    }
}

impl<T: Shaped + ?Sized> Shaped for &T {
    fn shape(&self) -> Shape {
        (**self).shape()
    }
}

/// Verify every input is 1-D and as long as the first one.
///
/// An empty list of inputs is trivially valid.
pub fn check_independents(independents: &[&dyn Shaped]) -> Result<(), PropLoadError> {
    let shapes: Vec<Shape> = independents.iter().map(|x| x.shape()).collect();

    let Some(first) = shapes.first() else {
        return Ok(());
    };
    let expected = first.len();

    let all_1d = shapes.iter().all(|s| s.ndim() == 1);
    let same_len = shapes.iter().all(|s| s.len() == expected);

    if all_1d && same_len {
        Ok(())
    } else {
        Err(PropLoadError::ShapeMismatch { shapes })
    }
}
