pub mod openai_client;
pub mod planning;
pub mod provider;
pub mod response_parser;

pub use openai_client::{ChatCompletionRequest, OpenAIClient};
pub use planning::{build_trip_prompt, SYSTEM_PROMPT};
pub use provider::CompletionProvider;
pub use response_parser::{parse_itinerary_response, strip_code_fence};
