use jsonschema::{Draft, JSONSchema};
use schemars::{schema::RootSchema, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{error::PlanningError, types::ItineraryPlan};

/// Cached JSON schema handle associated with a response type. The Draft 7
/// validator is compiled on first use and shared by every clone.
#[derive(Clone)]
pub struct SchemaHandle {
    schema_name: &'static str,
    schema_json: Arc<Value>,
    validator: Arc<OnceLock<Result<JSONSchema, String>>>,
}

impl SchemaHandle {
    pub fn from_root_schema(schema_name: &'static str, root: RootSchema) -> Self {
        let schema_json = serde_json::to_value(root).unwrap_or_else(|err| {
            panic!("failed to serialize schema for {}: {}", schema_name, err)
        });

        Self {
            schema_name,
            schema_json: Arc::new(schema_json),
            validator: Arc::new(OnceLock::new()),
        }
    }

    pub fn for_type<T: JsonSchema>(schema_name: &'static str) -> Self {
        Self::from_root_schema(schema_name, schemars::schema_for!(T))
    }

    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    pub fn schema_json(&self) -> &Value {
        self.schema_json.as_ref()
    }

    /// Compiled validator for this schema
    pub fn validator(&self) -> Result<&JSONSchema, PlanningError> {
        self.validator
            .get_or_init(|| {
                JSONSchema::options()
                    .with_draft(Draft::Draft7)
                    .compile(self.schema_json())
                    .map_err(|err| err.to_string())
            })
            .as_ref()
            .map_err(|err| {
                PlanningError::Schema(format!(
                    "failed to prepare `{}` schema for validation: {}",
                    self.schema_name, err
                ))
            })
    }
}

impl fmt::Debug for SchemaHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaHandle")
            .field("schema_name", &self.schema_name)
            .field("compiled", &self.validator.get().is_some())
            .finish()
    }
}

/// A response type the provider is asked to produce.
pub trait CompletionSchema: DeserializeOwned + Send + Sync + 'static {
    fn schema() -> &'static SchemaHandle;
}

impl CompletionSchema for ItineraryPlan {
    fn schema() -> &'static SchemaHandle {
        static HANDLE: OnceLock<SchemaHandle> = OnceLock::new();
        HANDLE.get_or_init(|| SchemaHandle::for_type::<ItineraryPlan>("ItineraryPlan"))
    }
}
