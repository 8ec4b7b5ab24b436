//! Lookup of runtime field data by field name.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use log::debug;
use parking_lot::RwLock;

use crate::config::{FieldDataConfig, RuntimeFieldConfig, RuntimeFieldType};
use crate::error::{FieldDataError, Result};
use crate::fielddata::{
    IndexFieldDataBuilder, IndexNumericFieldData, RuntimeFieldData, ScriptDoubleFieldDataBuilder,
    ScriptLongFieldDataBuilder,
};
use crate::script::{DoubleLeafFactory, LongLeafFactory};
use crate::search::sort::SortField;

/// Compiled script of a runtime field.
#[derive(Clone)]
pub enum LeafFactory {
    Double(Arc<dyn DoubleLeafFactory>),
    Long(Arc<dyn LongLeafFactory>),
}

impl LeafFactory {
    fn field_type(&self) -> RuntimeFieldType {
        match self {
            LeafFactory::Double(_) => RuntimeFieldType::Double,
            LeafFactory::Long(_) => RuntimeFieldType::Long,
        }
    }
}

#[derive(Clone)]
enum RuntimeFieldDataBuilder {
    Double(ScriptDoubleFieldDataBuilder),
    Long(ScriptLongFieldDataBuilder),
}

impl RuntimeFieldDataBuilder {
    fn build(&self) -> RuntimeFieldData {
        match self {
            RuntimeFieldDataBuilder::Double(b) => RuntimeFieldData::Double(Arc::new(b.build())),
            RuntimeFieldDataBuilder::Long(b) => RuntimeFieldData::Long(Arc::new(b.build())),
        }
    }
}

/// Registry of runtime fields and the field data built for them.
///
/// Safe to share between threads; lookups return independent handles that
/// each load their own segment state.
pub struct FieldDataService {
    config: FieldDataConfig,
    builders: RwLock<AHashMap<String, RuntimeFieldDataBuilder>>,
    cache: RwLock<AHashMap<String, RuntimeFieldData>>,
}

impl FieldDataService {
    pub fn new(config: FieldDataConfig) -> Self {
        FieldDataService {
            config,
            builders: RwLock::new(AHashMap::new()),
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// Register a runtime field whose script is `leaf_factory`.
    ///
    /// Fails if the field is already registered or the script type does not
    /// match the declared field type.
    pub fn register(&self, field: &RuntimeFieldConfig, leaf_factory: LeafFactory) -> Result<()> {
        if leaf_factory.field_type() != field.field_type {
            return Err(FieldDataError::config(format!(
                "runtime field [{}] is declared as {:?} but its script emits {:?}",
                field.name,
                field.field_type,
                leaf_factory.field_type()
            )));
        }

        let mut builders = self.builders.write();
        if builders.contains_key(&field.name) {
            return Err(FieldDataError::config(format!(
                "runtime field [{}] is already registered",
                field.name
            )));
        }

        let builder = match leaf_factory {
            LeafFactory::Double(factory) => RuntimeFieldDataBuilder::Double(
                ScriptDoubleFieldDataBuilder::new(field.name.clone(), factory),
            ),
            LeafFactory::Long(factory) => RuntimeFieldDataBuilder::Long(
                ScriptLongFieldDataBuilder::new(field.name.clone(), factory),
            ),
        };
        builders.insert(field.name.clone(), builder);
        debug!("registered runtime field [{}] as {:?}", field.name, field.field_type);
        Ok(())
    }

    /// Field data of the runtime field `name`.
    pub fn get_for_field(&self, name: &str) -> Result<RuntimeFieldData> {
        if self.config.cache_field_data {
            if let Some(field_data) = self.cache.read().get(name) {
                debug!("field data cache hit for [{name}]");
                return Ok(field_data.clone());
            }
        }

        let field_data = self
            .builders
            .read()
            .get(name)
            .map(RuntimeFieldDataBuilder::build)
            .ok_or_else(|| FieldDataError::unknown_field(name))?;

        if self.config.cache_field_data {
            let mut cache = self.cache.write();
            let cached = cache
                .entry(name.to_string())
                .or_insert_with(|| field_data.clone());
            return Ok(cached.clone());
        }
        Ok(field_data)
    }

    /// Sort definition for `name` using the configured default mode.
    pub fn sort_field(&self, name: &str, reverse: bool) -> Result<SortField> {
        let field_data = self.get_for_field(name)?;
        Ok(field_data.sort_field(self.config.sort_mode(reverse), reverse))
    }

    /// Names of all registered fields, sorted.
    pub fn field_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builders.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for FieldDataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDataService")
            .field("config", &self.config)
            .field("fields", &self.field_names())
            .finish()
    }
}
