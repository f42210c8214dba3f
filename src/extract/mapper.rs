use log::warn;
use serde_json::{ Map, Value as JsonValue };
use uuid::Uuid;

use crate::error::ParseError;
use crate::models::timestamp::parse_iso_timestamp;
use crate::models::{ ConferenceEvent, EventDate, FlightItinerary, Location };

type Item = Map<String, JsonValue>;

/// Marker the model uses for unknown dates ("TBA", "TBD", ...).
const PLACEHOLDER_MARKER: &str = "TB";

pub fn map_events(sanitized: &str) -> Result<Vec<ConferenceEvent>, ParseError> {
    map_items(sanitized, "event", map_event)
}

pub fn map_flights(sanitized: &str) -> Result<Vec<FlightItinerary>, ParseError> {
    map_items(sanitized, "flight", map_flight)
}

/// Whole-input failures are returned; items that fail conversion are logged and dropped.
fn map_items<T>(
    sanitized: &str,
    kind: &str,
    convert: fn(&Item) -> Result<T, ParseError>
) -> Result<Vec<T>, ParseError> {
    let parsed: JsonValue = serde_json::from_str(sanitized)?;
    let items = match parsed {
        JsonValue::Array(items) => items,
        _ => {
            return Err(ParseError::NotAnArray);
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let converted = item
            .as_object()
            .ok_or_else(|| ParseError::InvalidField {
                field: "item",
                reason: "expected a JSON object".to_string(),
            })
            .and_then(convert);

        match converted {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping {} item {}: {}", kind, index, e),
        }
    }
    Ok(records)
}

pub fn map_event(item: &Item) -> Result<ConferenceEvent, ParseError> {
    Ok(ConferenceEvent {
        id: new_id(),
        name: field_str(item, "name")?,
        event_description: field_str(item, "eventDescription")?,
        venue_address: Location {
            city: field_str(item, "venueAddressCity")?,
            country: field_str(item, "venueAddressCountry")?,
            full_addr: field_str(item, "venueAddressStreet")?,
        },
        event_url: field_str(item, "eventUrl")?,
        event_start_date: event_date(item, "eventStartDate")?,
        event_end_date: event_date(item, "eventEndDate")?,
    })
}

pub fn map_flight(item: &Item) -> Result<FlightItinerary, ParseError> {
    Ok(FlightItinerary {
        id: new_id(),
        flight_no: field_str(item, "flightNo")?,
        airline: field_str(item, "airline")?,
        booking_link: field_str(item, "bookingLink")?,
        depart_address: Location {
            city: field_str(item, "deportAddressCity")?,
            country: field_str(item, "deportAddressCountry")?,
            full_addr: field_str(item, "deportAddressStreet")?,
        },
        arrival_address: Location {
            city: field_str(item, "arrivalAddressCity")?,
            country: field_str(item, "arrivalAddressCountry")?,
            full_addr: field_str(item, "arrivalAddressStreet")?,
        },
        depart_time: timestamp(item, "departTime")?,
        arrival_time: timestamp(item, "arrivalTime")?,
    })
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn field_str(item: &Item, field: &'static str) -> Result<String, ParseError> {
    match item.get(field) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        // flight numbers and the like occasionally come back unquoted
        Some(JsonValue::Number(n)) => Ok(n.to_string()),
        None | Some(JsonValue::Null) => Err(ParseError::MissingField { field }),
        Some(other) =>
            Err(ParseError::InvalidField {
                field,
                reason: format!("expected a string, got {}", other),
            }),
    }
}

fn event_date(item: &Item, field: &'static str) -> Result<EventDate, ParseError> {
    let raw = field_str(item, field)?;
    if raw.contains(PLACEHOLDER_MARKER) {
        return Ok(EventDate::Placeholder(raw));
    }
    parse_iso_timestamp(&raw)
        .map(EventDate::Scheduled)
        .map_err(|reason| ParseError::InvalidField { field, reason })
}

fn timestamp(item: &Item, field: &'static str) -> Result<chrono::DateTime<chrono::Utc>, ParseError> {
    let raw = field_str(item, field)?;
    parse_iso_timestamp(&raw).map_err(|reason| ParseError::InvalidField { field, reason })
}
