pub mod completion;
pub mod query;
pub mod timestamp;
pub mod travel;

pub use completion::{ ChatMessage, CompletionRequest, CompletionResponse, Role };
pub use query::{ EventQuery, FlightQuery };
pub use travel::{ ConferenceEvent, EventDate, FlightItinerary, Location };
