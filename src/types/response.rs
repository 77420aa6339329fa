use serde_json::Value;

use crate::{
    error::{PlanningError, Result},
    types::ItineraryPlan,
};

/// Decode a provider payload into the typed itinerary, reporting the failing field path.
pub fn deserialize_itinerary(payload: &Value) -> Result<ItineraryPlan> {
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlanningError::Schema(format!(
            "failed to deserialize `ItineraryPlan` at {}: {}",
            location,
            err.inner()
        ))
    })
}
