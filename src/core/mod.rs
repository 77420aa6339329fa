pub mod planner;
pub mod validator;

pub use planner::TripPlanner;
pub use validator::validate_trip_request;
