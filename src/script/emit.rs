//! Per-document value buffer shared by script implementations.

use crate::script::{Result, ScriptError};

/// Upper bound on the number of values one document may emit.
pub const MAX_VALUES: usize = 100;

/// Values emitted by a script for the current document.
///
/// The buffer is reused across documents; [`clear`](Self::clear) must be
/// called before computing the next document.
#[derive(Debug, Clone)]
pub struct EmittedValues<T> {
    field: String,
    values: Vec<T>,
}

impl<T: Copy> EmittedValues<T> {
    /// Create an empty buffer for the runtime field `field`.
    pub fn new<S: Into<String>>(field: S) -> Self {
        EmittedValues {
            field: field.into(),
            values: Vec::new(),
        }
    }

    /// Forget the values of the previous document.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Append a value, failing once the document exceeds [`MAX_VALUES`].
    pub fn emit(&mut self, value: T) -> Result<()> {
        if self.values.len() >= MAX_VALUES {
            return Err(ScriptError::TooManyValues {
                field: self.field.clone(),
                emitted: self.values.len() + 1,
                limit: MAX_VALUES,
            });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
