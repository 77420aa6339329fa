use crate::{
    config::ServiceConfig,
    error::Result,
    schemas::{validate_structured_payload, CompletionSchema},
    services::{
        build_trip_prompt,
        planning::{MAX_TOKENS, TEMPERATURE},
        parse_itinerary_response, ChatCompletionRequest, CompletionProvider, SYSTEM_PROMPT,
    },
    types::{ItineraryPlan, TripRequest},
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use super::validator::validate_trip_request;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Runs one planning request: validate, build prompt, complete, parse.
#[derive(Debug, Clone)]
pub struct TripPlanner {
    provider: Arc<dyn CompletionProvider>,
    model: String,
    strict_schema: bool,
}

impl TripPlanner {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            model: DEFAULT_MODEL.to_string(),
            strict_schema: false,
        }
    }

    pub fn from_config(provider: Arc<dyn CompletionProvider>, config: &ServiceConfig) -> Self {
        Self::new(provider)
            .with_model(config.model.clone())
            .with_strict_schema(config.strict_schema)
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Reject completions that do not match the `ItineraryPlan` schema
    pub fn with_strict_schema(mut self, strict_schema: bool) -> Self {
        self.strict_schema = strict_schema;
        self
    }

    /// Build the completion request sent for a validated trip
    pub fn completion_request(&self, request: &TripRequest) -> ChatCompletionRequest {
        ChatCompletionRequest::from_prompts(&self.model, SYSTEM_PROMPT, build_trip_prompt(request))
            .with_temperature(TEMPERATURE)
            .with_max_tokens(Some(MAX_TOKENS))
    }

    /// Generate an itinerary. The provider is called at most once and never
    /// when validation fails.
    pub async fn generate(&self, request: &TripRequest) -> Result<Value> {
        let request = validate_trip_request(request)?;

        info!(
            target: "planning::handler",
            destination = %request.destination,
            duration = request.duration,
            budget = request.budget,
            "generating itinerary"
        );

        let completion = self.completion_request(request);
        let content = self.provider.complete(&completion).await?;
        debug!(target: "planning::handler", chars = content.len(), "completion text received");

        let plan = parse_itinerary_response(&content)?;

        if self.strict_schema {
            validate_structured_payload(ItineraryPlan::schema(), &plan)?;
        }

        Ok(plan)
    }
}
