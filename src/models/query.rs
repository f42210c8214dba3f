use chrono::{ DateTime, Utc };
use serde_json::{ Map, Value as JsonValue };

use crate::error::ValidationError;
use crate::models::timestamp::parse_iso_timestamp;

const MIN_EVENT_TAGS_LEN: usize = 3;

/// Validated body of a `POST /events` call.
#[derive(Clone, Debug, PartialEq)]
pub struct EventQuery {
    pub event_tags: String,
    pub city: String,
    pub country: String,
    pub full_addr: Option<String>,
    pub from_when: Option<DateTime<Utc>>,
}

/// Validated body of a `POST /flights` call.
#[derive(Clone, Debug, PartialEq)]
pub struct FlightQuery {
    pub conference_city: String,
    pub conference_country: String,
    pub depart_city: String,
    pub depart_country: String,
    pub from_when: DateTime<Utc>,
}

impl EventQuery {
    pub fn from_json(payload: &JsonValue) -> Result<Self, ValidationError> {
        let obj = as_object(payload)?;

        let event_tags = required_str(obj, "eventTags")?;
        if event_tags.chars().count() < MIN_EVENT_TAGS_LEN {
            return Err(ValidationError::InvalidField {
                field: "eventTags",
                reason: format!("must be at least {} characters long", MIN_EVENT_TAGS_LEN),
            });
        }

        Ok(Self {
            event_tags,
            city: required_str(obj, "city")?,
            country: required_str(obj, "country")?,
            full_addr: optional_str(obj, "fullAdr")?,
            from_when: optional_str(obj, "fromWhen")?
                .map(|raw| iso_datetime("fromWhen", &raw))
                .transpose()?,
        })
    }
}

impl FlightQuery {
    pub fn from_json(payload: &JsonValue) -> Result<Self, ValidationError> {
        let obj = as_object(payload)?;

        Ok(Self {
            conference_city: required_str(obj, "conferenceCity")?,
            conference_country: required_str(obj, "conferenceCountry")?,
            depart_city: required_str(obj, "departCity")?,
            depart_country: required_str(obj, "departCountry")?,
            from_when: iso_datetime("fromWhen", &required_str(obj, "fromWhen")?)?,
        })
    }
}

fn as_object(payload: &JsonValue) -> Result<&Map<String, JsonValue>, ValidationError> {
    payload.as_object().ok_or(ValidationError::NotAnObject)
}

fn required_str(
    obj: &Map<String, JsonValue>,
    field: &'static str
) -> Result<String, ValidationError> {
    match optional_str(obj, field)? {
        Some(value) if !value.trim().is_empty() => Ok(value),
        Some(_) =>
            Err(ValidationError::InvalidField {
                field,
                reason: "must not be blank".to_string(),
            }),
        None => Err(ValidationError::MissingField(field)),
    }
}

fn optional_str(
    obj: &Map<String, JsonValue>,
    field: &'static str
) -> Result<Option<String>, ValidationError> {
    match obj.get(field) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) =>
            Err(ValidationError::InvalidField {
                field,
                reason: "expected a string".to_string(),
            }),
    }
}

fn iso_datetime(field: &'static str, raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_iso_timestamp(raw).map_err(|reason| ValidationError::InvalidField { field, reason })
}
