use serde::{
    de::{self, Visitor},
    Deserialize, Deserializer, Serialize,
};
use std::fmt;

/// Incoming travel-planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Destination city or region (e.g., "Paris")
    pub destination: String,
    /// Total budget in euros
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub budget: i64,
    /// Trip length in days
    #[serde(deserialize_with = "deserialize_whole_number")]
    pub duration: i64,
    /// Interest tags used to steer the itinerary (e.g., "culture", "food")
    pub interests: Vec<String>,
}

impl TripRequest {
    pub fn new(
        destination: impl Into<String>,
        budget: i64,
        duration: i64,
        interests: Vec<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            budget,
            duration,
            interests,
        }
    }

    /// Interests joined the way they are presented to the model
    pub fn interests_joined(&self) -> String {
        self.interests.join(", ")
    }
}

/// Accepts JSON integers and floats with no fractional part (`500.0`).
fn deserialize_whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumberVisitor;

    impl<'de> Visitor<'de> for WholeNumberVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            // i64::MAX is not exactly representable as f64; stay strictly below 2^63
            if value.is_finite()
                && value.fract() == 0.0
                && value >= i64::MIN as f64
                && value < i64::MAX as f64
            {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumberVisitor)
}
