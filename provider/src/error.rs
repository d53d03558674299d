//! The error type for rules providers.

use core::fmt;
use std::io;

/// An error raised while resolving a zone or querying its rules.
#[derive(Debug)]
pub enum ProviderError {
    /// The identifier does not name a zone known to the provider.
    UnknownIdentifier,
    /// The identifier cannot name a zone (e.g. it looks like a path).
    IllformedIdentifier,
    /// A local date-time field was out of range.
    Range(&'static str),
    /// The zone data could not be read.
    Io(io::Error),
    /// The zone data was read but is not usable.
    Assert(&'static str),
}

impl ProviderError {
    /// Returns `true` when the error means "no such zone" rather than broken data.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownIdentifier | Self::IllformedIdentifier)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier => f.write_str("time zone identifier does not exist"),
            Self::IllformedIdentifier => f.write_str("ill-formed time zone identifier"),
            Self::Range(msg) => write!(f, "range error: {msg}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Assert(msg) => write!(f, "invalid zone data: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ProviderError {
    fn from(value: io::Error) -> Self {
        if value.kind() == io::ErrorKind::NotFound {
            return Self::UnknownIdentifier;
        }
        Self::Io(value)
    }
}
