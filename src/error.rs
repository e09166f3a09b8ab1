use thiserror::Error;

use crate::shape::Shape;

#[derive(Debug, Error)]
pub enum PropLoadError {
    #[error(
        "mismatch in size of inputs, each variable must be 1D and the same length; \
         input shapes are [{}]",
        format_shapes(.shapes)
    )]
    ShapeMismatch { shapes: Vec<Shape> },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

fn format_shapes(shapes: &[Shape]) -> String {
    shapes
        .iter()
        .map(Shape::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
