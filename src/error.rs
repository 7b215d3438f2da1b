//! Error types for reading and grouping validation reports.
//!
//! Only two failure kinds leave the library:
//! - [`ReportError::Parse`] when the document cannot be read or parsed
//! - [`ReportError::Encoding`] when a result field cannot be rendered as text
//!
//! Failures from the RDF parser are translated into [`ParseFailure`] at the
//! single point where parsing happens, so callers never match on parser types.

use oxigraph::io::RdfParseError;
use std::io;
use thiserror::Error;

pub type Result<T, E = ReportError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to parse validation report as '{format}': {source}")]
    Parse {
        format: String,
        #[source]
        source: ParseFailure,
    },

    #[error("{field} of validation result {result} cannot be rendered as text: {reason}")]
    Encoding {
        field: &'static str,
        result: String,
        reason: String,
    },
}

impl ReportError {
    pub(crate) fn parse(format: &str, source: impl Into<ParseFailure>) -> Self {
        ReportError::Parse {
            format: format.to_string(),
            source: source.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, ReportError::Parse { .. })
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, ReportError::Encoding { .. })
    }
}

/// Underlying cause of a [`ReportError::Parse`].
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("unsupported RDF format label '{0}'")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Syntax(#[from] RdfParseError),

    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),
}
