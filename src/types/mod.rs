pub mod itinerary;
pub mod response;
pub mod trip;

pub use itinerary::{Activity, ActivityCategory, DayPlan, ItineraryPlan};
pub use response::deserialize_itinerary;
pub use trip::TripRequest;
