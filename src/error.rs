//! Error types for runfield.
//!
//! All failures that reach generic sort and aggregation code are represented
//! by [`FieldDataError`]. Failures raised by the script collaborator keep
//! their own [`ScriptError`] type until they cross a normalization boundary
//! such as [`IndexFieldData::load`](crate::fielddata::IndexFieldData::load).
//!
//! # Examples
//!
//! ```
//! use runfield::error::{FieldDataError, Result};
//!
//! fn lookup(name: &str) -> Result<()> {
//!     Err(FieldDataError::unknown_field(name))
//! }
//!
//! match lookup("missing") {
//!     Ok(_) => println!("found"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::error::Error as StdError;

use anyhow;
use thiserror::Error;

use crate::script::ScriptError;
use crate::segment::SegmentContext;

/// The unified error type for field data operations.
#[derive(Error, Debug)]
pub enum FieldDataError {
    /// A script failure surfaced while reading values for a document.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Loading a segment failed. The original failure is kept as the source.
    #[error("Failed to load field data for [{field}] on {segment}: {source}")]
    Load {
        field: String,
        segment: SegmentContext,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// No field data is registered under the requested name.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with FieldDataError.
pub type Result<T> = std::result::Result<T, FieldDataError>;

impl FieldDataError {
    /// Normalize a raw segment load failure into the unified type.
    pub fn convert<E>(field: &str, segment: SegmentContext, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        FieldDataError::Load {
            field: field.to_string(),
            segment,
            source: Box::new(source),
        }
    }

    /// Create a new unknown field error.
    pub fn unknown_field<S: Into<String>>(name: S) -> Self {
        FieldDataError::UnknownField(name.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        FieldDataError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        FieldDataError::Other(msg.into())
    }

    /// The raw segment load failure, if it is an `E`.
    pub fn load_cause<E: StdError + 'static>(&self) -> Option<&E> {
        match self {
            FieldDataError::Load { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// The script failure behind this error, if there is one.
    pub fn script_cause(&self) -> Option<&ScriptError> {
        match self {
            FieldDataError::Script(e) => Some(e),
            _ => self.load_cause::<ScriptError>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_error_construction() {
        let error = FieldDataError::unknown_field("price");
        assert_eq!(error.to_string(), "Unknown field: price");

        let error = FieldDataError::config("bad type");
        assert_eq!(error.to_string(), "Configuration error: bad type");
    }

    #[test]
    fn test_convert_keeps_source() {
        let segment = SegmentContext::new(3, 0, 10);
        let error = FieldDataError::convert(
            "computed_score",
            segment,
            ScriptError::resource_exhausted("too many compilations"),
        );

        assert_eq!(
            error.to_string(),
            "Failed to load field data for [computed_score] on segment[3]: \
             Resource exhausted: too many compilations"
        );
        let source = error.source().unwrap();
        assert_eq!(source.to_string(), "Resource exhausted: too many compilations");
        assert!(matches!(
            error.script_cause(),
            Some(ScriptError::ResourceExhausted(_))
        ));
    }

    #[test]
    fn test_convert_accepts_any_error() {
        let segment = SegmentContext::new(0, 0, 1);
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "column file");
        let error = FieldDataError::convert("price", segment, io_error);

        assert!(error.script_cause().is_none());
        let cause = error.load_cause::<std::io::Error>().unwrap();
        assert_eq!(cause.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn test_script_error_is_transparent() {
        let error = FieldDataError::from(ScriptError::evaluation("division by zero"));
        assert_eq!(error.to_string(), "Evaluation error: division by zero");
    }
}
