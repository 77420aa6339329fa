use crate::{
    error::{PlanningError, Result},
    types::TripRequest,
};

pub const MIN_DURATION_DAYS: i64 = 1;
pub const MAX_DURATION_DAYS: i64 = 14;
pub const MIN_BUDGET: i64 = 50;

pub const DURATION_OUT_OF_RANGE: &str = "Duration must be between 1 and 14 days";
pub const BUDGET_TOO_LOW: &str = "Budget must be at least 50€";
pub const INTERESTS_MISSING: &str = "At least one interest required";

/// Check a request against the fixed bounds. The first failing check wins,
/// in the order duration, budget, interests.
pub fn validate_trip_request(request: &TripRequest) -> Result<&TripRequest> {
    if !(MIN_DURATION_DAYS..=MAX_DURATION_DAYS).contains(&request.duration) {
        return Err(PlanningError::Validation(DURATION_OUT_OF_RANGE.to_string()));
    }

    if request.budget < MIN_BUDGET {
        return Err(PlanningError::Validation(BUDGET_TOO_LOW.to_string()));
    }

    if request.interests.is_empty() {
        return Err(PlanningError::Validation(INTERESTS_MISSING.to_string()));
    }

    Ok(request)
}
