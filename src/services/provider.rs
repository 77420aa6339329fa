use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, services::ChatCompletionRequest};

/// A text-completion backend.
///
/// Implementations send one chat completion and return the raw text of the
/// first choice. Failures of any kind (transport, auth, quota, provider fault)
/// are reported as [`PlanningError::Provider`](crate::PlanningError::Provider).
/// Implementations must not retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync + Debug {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String>;
}
