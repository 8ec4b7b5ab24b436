//! Interfaces of the script execution collaborator.
//!
//! A leaf factory is compiled once per field and hands out one fresh
//! script instance per segment. The instance computes the values of a
//! single document at a time; [`run_for_doc`](DoubleFieldScript::run_for_doc)
//! replaces whatever the previous document produced.

pub mod emit;

use std::io;

use anyhow;
use thiserror::Error;

use crate::segment::{DocId, SegmentContext};

pub use emit::{EmittedValues, MAX_VALUES};

/// Failures raised by the script collaborator.
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script failed while computing values for a document.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// The script emitted more values for one document than allowed.
    #[error(
        "Runtime field [{field}] is emitting [{emitted}] values while the maximum number of values allowed is [{limit}]"
    )]
    TooManyValues {
        field: String,
        emitted: usize,
        limit: usize,
    },

    /// The script engine ran out of a resource.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// The segment could not be read by the script.
    #[error("Malformed segment: {0}")]
    MalformedSegment(String),

    /// I/O errors while reading segment data
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Any other failure from the script engine
    #[error("Error: {0}")]
    Other(#[from] anyhow::Error),
}

/// Result type alias for script operations.
pub type Result<T> = std::result::Result<T, ScriptError>;

impl ScriptError {
    /// Create a new evaluation error.
    pub fn evaluation<S: Into<String>>(msg: S) -> Self {
        ScriptError::Evaluation(msg.into())
    }

    /// Create a new resource exhausted error.
    pub fn resource_exhausted<S: Into<String>>(msg: S) -> Self {
        ScriptError::ResourceExhausted(msg.into())
    }

    /// Create a new malformed segment error.
    pub fn malformed_segment<S: Into<String>>(msg: S) -> Self {
        ScriptError::MalformedSegment(msg.into())
    }
}

/// A per-segment script instance computing `f64` values.
pub trait DoubleFieldScript: Send {
    /// Compute the values of `doc`, discarding those of the previous document.
    fn run_for_doc(&mut self, doc: DocId) -> Result<()>;

    /// Values computed by the last call to `run_for_doc`, in emission order.
    fn values(&self) -> &[f64];

    /// Number of values computed for the current document.
    fn count(&self) -> usize {
        self.values().len()
    }
}

/// A per-segment script instance computing `i64` values.
pub trait LongFieldScript: Send {
    /// Compute the values of `doc`, discarding those of the previous document.
    fn run_for_doc(&mut self, doc: DocId) -> Result<()>;

    /// Values computed by the last call to `run_for_doc`, in emission order.
    fn values(&self) -> &[i64];

    /// Number of values computed for the current document.
    fn count(&self) -> usize {
        self.values().len()
    }
}

/// Creates [`DoubleFieldScript`] instances bound to one segment each.
///
/// Implementations are immutable and shared across threads. Every call to
/// `new_instance` returns independent state.
pub trait DoubleLeafFactory: Send + Sync {
    fn new_instance(&self, segment: &SegmentContext) -> Result<Box<dyn DoubleFieldScript>>;
}

/// Creates [`LongFieldScript`] instances bound to one segment each.
pub trait LongLeafFactory: Send + Sync {
    fn new_instance(&self, segment: &SegmentContext) -> Result<Box<dyn LongFieldScript>>;
}

impl<F> DoubleLeafFactory for F
where
    F: Fn(&SegmentContext) -> Result<Box<dyn DoubleFieldScript>> + Send + Sync,
{
    fn new_instance(&self, segment: &SegmentContext) -> Result<Box<dyn DoubleFieldScript>> {
        self(segment)
    }
}

impl<F> LongLeafFactory for F
where
    F: Fn(&SegmentContext) -> Result<Box<dyn LongFieldScript>> + Send + Sync,
{
    fn new_instance(&self, segment: &SegmentContext) -> Result<Box<dyn LongFieldScript>> {
        self(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Constant(Vec<f64>);

    impl DoubleFieldScript for Constant {
        fn run_for_doc(&mut self, _doc: DocId) -> Result<()> {
            Ok(())
        }

        fn values(&self) -> &[f64] {
            &self.0
        }
    }

    #[test]
    fn test_closure_leaf_factory() {
        let factory = |segment: &SegmentContext| -> Result<Box<dyn DoubleFieldScript>> {
            Ok(Box::new(Constant(vec![segment.ord() as f64])))
        };

        let mut script = factory.new_instance(&SegmentContext::new(4, 0, 1)).unwrap();
        script.run_for_doc(0).unwrap();
        assert_eq!(script.count(), 1);
        assert_eq!(script.values(), &[4.0]);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::UnexpectedEof, "truncated");
        match ScriptError::from(io_error) {
            ScriptError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
