//! Configuration for runtime fields and the field data service.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::fielddata::NumericType;
use crate::search::mode::MultiValueMode;

/// Value type a runtime field's script emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeFieldType {
    Double,
    Long,
}

impl RuntimeFieldType {
    pub fn numeric_type(&self) -> NumericType {
        match self {
            RuntimeFieldType::Double => NumericType::Double,
            RuntimeFieldType::Long => NumericType::Long,
        }
    }
}

/// Declaration of one runtime field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeFieldConfig {
    /// Field name.
    pub name: String,
    /// Script value type.
    #[serde(rename = "type")]
    pub field_type: RuntimeFieldType,
}

impl RuntimeFieldConfig {
    pub fn new<S: Into<String>>(name: S, field_type: RuntimeFieldType) -> Self {
        RuntimeFieldConfig {
            name: name.into(),
            field_type,
        }
    }

    /// Parse a field declaration such as `{"name": "score", "type": "double"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for [`FieldDataService`](crate::fielddata::service::FieldDataService).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDataConfig {
    /// Keep built field data per field instead of rebuilding on every lookup.
    pub cache_field_data: bool,
    /// Mode used for sorting when the request names none.
    /// Falls back to `min` ascending and `max` descending.
    pub default_sort_mode: Option<MultiValueMode>,
}

impl Default for FieldDataConfig {
    fn default() -> Self {
        Self {
            cache_field_data: true,
            default_sort_mode: None,
        }
    }
}

impl FieldDataConfig {
    /// Sort mode to use for the given direction.
    pub fn sort_mode(&self, reverse: bool) -> MultiValueMode {
        self.default_sort_mode
            .unwrap_or_else(|| MultiValueMode::for_order(reverse))
    }
}
