//! planning-service: AI-generated travel itineraries over HTTP
//!
//! A request (destination, budget, duration, interests) is validated, rendered
//! into a prompt, sent to an OpenAI-compatible chat completion endpoint, and the
//! model's reply is decoded into a day-by-day itinerary.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use planning_service::{OpenAIClient, TripPlanner, TripRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api_key = std::env::var("OPENAI_API_KEY")?;
//!     let planner = TripPlanner::new(Arc::new(OpenAIClient::new(api_key)));
//!
//!     let request = TripRequest::new("Paris", 500, 3, vec!["culture".into(), "food".into()]);
//!     let itinerary = planner.generate(&request).await?;
//!     println!("{}", serde_json::to_string_pretty(&itinerary)?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use config::ServiceConfig;
pub use crate::core::{validate_trip_request, TripPlanner};
pub use error::{PlanningError, Result};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use server::{router, run_server, AppState};
pub use services::{ChatCompletionRequest, CompletionProvider, OpenAIClient};
pub use types::{Activity, ActivityCategory, DayPlan, ItineraryPlan, TripRequest};

#[cfg(feature = "cli")]
pub mod cli;
