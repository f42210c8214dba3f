use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    pub country: String,
    /// Street address, free text.
    pub full_addr: String,
}

/// A conference date as reported by the model: either an instant or the placeholder it emitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDate {
    Scheduled(DateTime<Utc>),
    Placeholder(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceEvent {
    pub id: String,
    pub name: String,
    pub event_description: String,
    pub venue_address: Location,
    pub event_url: String,
    pub event_start_date: EventDate,
    pub event_end_date: EventDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightItinerary {
    pub id: String,
    pub flight_no: String,
    pub airline: String,
    pub booking_link: String,
    pub depart_address: Location,
    pub arrival_address: Location,
    pub depart_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
}
