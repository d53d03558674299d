//! The error type for dataset generation.

use core::fmt;
use std::io;

/// An error that stops a generator run.
///
/// Problems with individual zones are not errors at this level: those zones
/// are logged and left out of the dataset.
#[derive(Debug)]
pub enum GeneratorError {
    /// The year range is empty.
    InvalidYearRange { start_year: i32, until_year: i32 },
    /// Reading input or writing the document failed.
    Io(io::Error),
    /// The dataset could not be serialized.
    Json(serde_json::Error),
}

pub type GeneratorResult<T> = Result<T, GeneratorError>;

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidYearRange {
                start_year,
                until_year,
            } => write!(
                f,
                "start year {start_year} must be before until year {until_year}"
            ),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for GeneratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidYearRange { .. } => None,
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
        }
    }
}

impl From<io::Error> for GeneratorError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for GeneratorError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
