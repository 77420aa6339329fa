use crate::types::{ActivityCategory, TripRequest};

/// System instruction sent with every itinerary request
pub const SYSTEM_PROMPT: &str =
    "You are a professional travel planner. Always respond with valid JSON only.";

/// Sampling temperature for itinerary completions
pub const TEMPERATURE: f64 = 0.7;

/// Generation token ceiling for itinerary completions
pub const MAX_TOKENS: u32 = 2000;

/// Generate the itinerary prompt for a validated trip request
pub fn build_trip_prompt(request: &TripRequest) -> String {
    let destination = request.destination.as_str();
    let duration = request.duration;
    let budget = request.budget;
    let interests = request.interests_joined();
    let categories = category_list();

    format!(
        r#"You are an experienced travel planner. Create a detailed {duration}-day itinerary for {destination}.

Budget: {budget}€
Interests: {interests}

Build a day-by-day plan with:
- Activities with exact times (e.g. 09:00, 14:00)
- Realistic sights and venues in {destination}
- Estimated cost per activity in euros
- Focus on the interests: {interests}
- Stay under the budget of {budget}€

Respond ONLY with valid JSON in this format:
{{
  "destination": "{destination}",
  "total_cost": 450,
  "days": [
    {{
      "day": 1,
      "title": "Arrival & Exploration",
      "activities": [
        {{
          "time": "10:00",
          "name": "Specific place or activity",
          "type": "culture",
          "cost": 15,
          "description": "Short description"
        }}
      ]
    }}
  ]
}}

Important:
- Use real places in {destination}
- type can be one of: {categories}
- Costs must be realistic for {destination}
- Do not exceed the total budget
"#
    )
}

fn category_list() -> String {
    ActivityCategory::KNOWN
        .iter()
        .map(ActivityCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
