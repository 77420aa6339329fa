use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use planning_service::{
    router, AppState, ChatCompletionRequest, CompletionProvider, PlanningError, TripPlanner,
    TripRequest,
};
use serde_json::{json, Value};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use tower::ServiceExt;

/// Provider stub returning a canned outcome and recording each call.
#[derive(Debug)]
struct StubProvider {
    outcome: Result<String, String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatCompletionRequest>>,
}

impl StubProvider {
    fn replying(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(text.into()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn failing(message: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(message.into()),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, request: &ChatCompletionRequest) -> planning_service::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.outcome.clone().map_err(PlanningError::Provider)
    }
}

fn paris_itinerary() -> Value {
    json!({
        "destination": "Paris",
        "total_cost": 450,
        "days": [
            {
                "day": 1,
                "title": "Arrival & Exploration",
                "activities": [
                    {"time": "10:00", "name": "Louvre Museum", "type": "culture", "cost": 17, "description": "World-famous art museum"},
                    {"time": "13:00", "name": "Le Comptoir du Relais", "type": "food", "cost": 35, "description": "Classic bistro lunch"}
                ]
            },
            {
                "day": 2,
                "title": "Montmartre",
                "activities": [
                    {"time": "09:30", "name": "Sacré-Cœur", "type": "culture", "cost": 0, "description": "Basilica on the hill"}
                ]
            }
        ]
    })
}

fn paris_request() -> Value {
    json!({
        "destination": "Paris",
        "budget": 500,
        "duration": 3,
        "interests": ["culture", "food"]
    })
}

fn app(provider: Arc<StubProvider>) -> Router {
    router(AppState::new(TripPlanner::new(provider)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_generate(app: Router, body: &Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/planning/generate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

#[tokio::test]
async fn test_root_and_health() {
    let provider = StubProvider::replying("{}");

    let (status, body) = send(
        app(provider.clone()),
        Request::get("/").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "planning-service"}));

    let (status, body) = send(
        app(provider.clone()),
        Request::get("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));

    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_valid_request_returns_itinerary_unchanged() {
    let itinerary = paris_itinerary();
    let provider = StubProvider::replying(serde_json::to_string(&itinerary).unwrap());

    let (status, body) = post_generate(app(provider.clone()), &paris_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_fenced_completion_is_accepted() {
    let itinerary = paris_itinerary();
    let provider = StubProvider::replying(format!(
        "```json\n{}\n```",
        serde_json::to_string_pretty(&itinerary).unwrap()
    ));

    let (status, body) = post_generate(app(provider), &paris_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);
}

#[tokio::test]
async fn test_completion_request_parameters() {
    let provider = StubProvider::replying(paris_itinerary().to_string());
    let planner = TripPlanner::new(provider.clone()).with_model("gpt-4o-mini");

    let request = TripRequest::new(
        "Paris",
        500,
        3,
        vec!["culture".to_string(), "food".to_string()],
    );
    planner.generate(&request).await.unwrap();

    let sent = provider.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(sent.model(), "gpt-4o-mini");
    assert_eq!(sent.temperature(), Some(0.7));
    assert_eq!(sent.max_tokens(), Some(2000));

    let messages = sent.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert!(messages[0]["content"].as_str().unwrap().contains("valid JSON"));
    assert_eq!(messages[1]["role"], "user");
    let prompt = messages[1]["content"].as_str().unwrap();
    assert!(prompt.contains("Paris"));
    assert!(prompt.contains("500€"));
    assert!(prompt.contains("culture, food"));
}

#[tokio::test]
async fn test_duration_out_of_range_skips_provider() {
    let provider = StubProvider::replying(paris_itinerary().to_string());
    let mut request = paris_request();
    request["duration"] = json!(20);

    let (status, body) = post_generate(app(provider.clone()), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Duration must be between 1 and 14 days");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_low_budget_skips_provider() {
    let provider = StubProvider::replying(paris_itinerary().to_string());
    let mut request = paris_request();
    request["budget"] = json!(10);

    let (status, body) = post_generate(app(provider.clone()), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Budget must be at least 50€");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_empty_interests_skips_provider() {
    let provider = StubProvider::replying(paris_itinerary().to_string());
    let mut request = paris_request();
    request["interests"] = json!([]);

    let (status, body) = post_generate(app(provider.clone()), &request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "At least one interest required");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_invalid_json_completion() {
    let provider = StubProvider::replying("```json\n{not valid json\n```");

    let (status, body) = post_generate(app(provider.clone()), &paris_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"error": "Failed to parse AI response", "raw_response": "{not valid json"})
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_is_not_retried() {
    let provider = StubProvider::failing("rate limited");

    let (status, body) = post_generate(app(provider.clone()), &paris_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_failure_can_be_sanitized() {
    let provider = StubProvider::failing("invalid api key sk-live-1234");
    let app = router(
        AppState::new(TripPlanner::new(provider.clone())).with_expose_provider_errors(false),
    );

    let (status, body) = post_generate(app, &paris_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate trip"}));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_unvalidated_json_is_passed_through_by_default() {
    let odd = json!({"destination": "Paris", "total_cost": "lots", "notes": ["not", "a", "plan"]});
    let provider = StubProvider::replying(odd.to_string());

    let (status, body) = post_generate(app(provider), &paris_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, odd);
}

#[tokio::test]
async fn test_strict_schema_rejects_malformed_plan() {
    let odd = json!({"destination": "Paris", "total_cost": "lots"});
    let provider = StubProvider::replying(odd.to_string());
    let app = router(AppState::new(
        TripPlanner::new(provider.clone()).with_strict_schema(true),
    ));

    let (status, body) = post_generate(app, &paris_request()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("AI response does not match itinerary schema"), "{message}");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_strict_schema_accepts_conforming_plan() {
    let itinerary = paris_itinerary();
    let provider = StubProvider::replying(itinerary.to_string());
    let app = router(AppState::new(
        TripPlanner::new(provider).with_strict_schema(true),
    ));

    let (status, body) = post_generate(app, &paris_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);
}

#[tokio::test]
async fn test_malformed_body_is_rejected_before_provider() {
    let provider = StubProvider::replying(paris_itinerary().to_string());

    let (status, body) = post_generate(
        app(provider.clone()),
        &json!({"destination": "Paris", "budget": "five hundred", "duration": 3, "interests": []}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_body_without_content_type_is_accepted() {
    let itinerary = paris_itinerary();
    let provider = StubProvider::replying(itinerary.to_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/planning/generate")
        .body(Body::from(paris_request().to_string()))
        .unwrap();
    let (status, body) = send(app(provider.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_empty_body_is_rejected() {
    let provider = StubProvider::replying(paris_itinerary().to_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/planning/generate")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(provider.clone()), request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_integral_float_budget_is_accepted() {
    let itinerary = paris_itinerary();
    let provider = StubProvider::replying(itinerary.to_string());
    let mut request = paris_request();
    request["budget"] = json!(500.0);
    request["duration"] = json!(3.0);

    let (status, body) = post_generate(app(provider.clone()), &request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, itinerary);

    let sent = provider.last_request.lock().unwrap().clone().unwrap();
    let prompt = sent.messages()[1]["content"].as_str().unwrap().to_string();
    assert!(prompt.contains("500€"), "{prompt}");
}

#[tokio::test]
async fn test_fractional_budget_is_rejected() {
    let provider = StubProvider::replying(paris_itinerary().to_string());
    let mut request = paris_request();
    request["budget"] = json!(500.5);

    let (status, _) = post_generate(app(provider.clone()), &request).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let provider = StubProvider::replying(paris_itinerary().to_string());

    let (status, _) = post_generate(
        app(provider.clone()),
        &json!({"destination": "Paris", "budget": 500, "duration": 3}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(provider.calls(), 0);
}
