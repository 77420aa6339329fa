use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured day-by-day itinerary returned by the completion provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ItineraryPlan {
    /// Destination the plan was generated for
    pub destination: String,
    /// Estimated total cost of the trip in euros
    pub total_cost: i64,
    /// Day plans in chronological order
    pub days: Vec<DayPlan>,
}

/// Activities planned for a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DayPlan {
    /// 1-based day counter within the itinerary
    pub day: u32,
    /// Short theme for the day
    pub title: String,
    /// Activities in chronological order
    pub activities: Vec<Activity>,
}

/// A single scheduled activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Activity {
    /// Start time in "HH:MM" form
    pub time: String,
    /// Concrete venue or activity name
    pub name: String,
    /// Advisory category (culture, food, shopping, nature, entertainment, hotel)
    #[serde(rename = "type")]
    pub kind: String,
    /// Estimated cost in euros
    pub cost: i64,
    /// Short description
    pub description: String,
}

/// Known activity categories. The provider is free to return others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityCategory {
    Culture,
    Food,
    Shopping,
    Nature,
    Entertainment,
    Hotel,
    Other,
}

impl ActivityCategory {
    pub const KNOWN: [ActivityCategory; 6] = [
        ActivityCategory::Culture,
        ActivityCategory::Food,
        ActivityCategory::Shopping,
        ActivityCategory::Nature,
        ActivityCategory::Entertainment,
        ActivityCategory::Hotel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::Culture => "culture",
            ActivityCategory::Food => "food",
            ActivityCategory::Shopping => "shopping",
            ActivityCategory::Nature => "nature",
            ActivityCategory::Entertainment => "entertainment",
            ActivityCategory::Hotel => "hotel",
            ActivityCategory::Other => "other",
        }
    }

    /// Case-insensitive lookup; unknown labels map to `Other`
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        Self::KNOWN
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label))
            .unwrap_or(ActivityCategory::Other)
    }
}

impl fmt::Display for ActivityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Activity {
    pub fn category(&self) -> ActivityCategory {
        ActivityCategory::from_label(&self.kind)
    }
}

impl DayPlan {
    pub fn cost(&self) -> i64 {
        self.activities.iter().map(|activity| activity.cost).sum()
    }
}

impl ItineraryPlan {
    /// Sum of all activity costs. Not necessarily equal to `total_cost`.
    pub fn activities_cost(&self) -> i64 {
        self.days.iter().map(DayPlan::cost).sum()
    }

    pub fn activity_count(&self) -> usize {
        self.days.iter().map(|day| day.activities.len()).sum()
    }

    /// Human-readable rendering of the plan
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("=== {} ===", self.destination));
        lines.push(format!(
            "Total cost: {}€ ({}€ itemized across {} activities)",
            self.total_cost,
            self.activities_cost(),
            self.activity_count()
        ));

        for day in &self.days {
            lines.push(String::new());
            lines.push(format!("--- Day {}: {} ---", day.day, day.title));
            for activity in &day.activities {
                lines.push(format!(
                    "{}  {} [{}] {}€",
                    activity.time,
                    activity.name,
                    activity.category(),
                    activity.cost
                ));
                if !activity.description.is_empty() {
                    lines.push(format!("       {}", activity.description));
                }
            }
        }

        lines.join("\n")
    }
}
