use chrono::{ DateTime, SecondsFormat, Utc };
use once_cell::sync::Lazy;

use crate::models::completion::SearchRecency;
use crate::models::{ ChatMessage, CompletionRequest, EventQuery, FlightQuery };

pub const DEFAULT_MODEL: &str = "sonar";
pub const EVENT_ITEM_LIMIT: &str = "5";
pub const FLIGHT_ITEM_LIMIT: &str = "3-5";

pub const SYSTEM_PROMPT: &str =
    "Only output the JSON list data without other messages.
Return as many items as the request asks for and never more than its stated limit. If there is no item, output an empty JSON array.
If you could not find a value for a specific property, say 'TBA'.
Do not format the JSON string. This means never add \"```\" or \"```json\". ";

const EVENT_LIST_TEMPLATE: &str =
    "Create a list of conferences and events regarding {event_tags} or other related topics near {country}, {city} from {start_date} and onwards.

The output should be a JSON array with the following properties per item:
{descriptor}
Limit the output to {limit} items per request.
";

const FLIGHT_OPTIONS_TEMPLATE: &str =
    "I want to travel to {dest_city}, {dest_country} from {depart_city}, {depart_country} on {start_date}.
Search for all flight options departing from {depart_city}, {depart_country} around {start_date} or the closest time to it, including layovers.

The output should be a JSON array with the following properties per item:
{descriptor}
Limit the output to {limit} items per request.
";

/// Field name to description for each event item. Only string-valued properties.
pub const EVENT_FIELDS: [(&str, &str); 8] = [
    ("name", "Name of the event"),
    (
        "eventDescription",
        "A comprehensive description of the event, agenda, the target audience, and what to expect from it",
    ),
    (
        "eventUrl",
        "The URL of the official event page, or a link to where user can read about the event. Never make this a TBA.",
    ),
    ("venueAddressCountry", "Just the name of the country where the conference event is taking place."),
    ("venueAddressCity", "Just the name of the city where the conference event is taking place."),
    ("venueAddressStreet", "Just the street address where the conference event is taking place."),
    ("eventStartDate", "ISO standard time (year, month, day, time) of when the event starts"),
    (
        "eventEndDate",
        "ISO standard time (year, month, day, time) of when the event officially ends. If there is none, just say `TBA`",
    ),
];

pub const FLIGHT_FIELDS: [(&str, &str); 12] = [
    ("name", "The name of the booking website where the user can book this flight"),
    ("flightNo", "The flight number that will be used to search the current flight"),
    ("airline", "The name of the airline company for this flight"),
    (
        "bookingLink",
        "A URL string to the airplane booking site. This can be either the official website or a third-party booking website.",
    ),
    ("deportAddressCountry", "The name of the country where the departing airport is in."),
    ("deportAddressCity", "The name of the city where the departing airport is in."),
    ("deportAddressStreet", "The full street address of the departing airport."),
    ("arrivalAddressCountry", "The name of the country where the arriving airport is in."),
    ("arrivalAddressCity", "The name of the city where the arrival airport is in."),
    ("arrivalAddressStreet", "The full street address of the arriving airport."),
    (
        "departTime",
        "ISO standard time (year, month, day, time) of when the user should depart from the departing country.",
    ),
    (
        "arrivalTime",
        "ISO standard time (year, month, day, time) of when the user will be arriving at the destination airport.",
    ),
];

static EVENT_DESCRIPTOR_JSON: Lazy<String> = Lazy::new(|| render_descriptor(&EVENT_FIELDS));
static FLIGHT_DESCRIPTOR_JSON: Lazy<String> = Lazy::new(|| render_descriptor(&FLIGHT_FIELDS));

/// Renders a JSON object keeping the declaration order of `fields`.
fn render_descriptor(fields: &[(&str, &str)]) -> String {
    let entries: Vec<String> = fields
        .iter()
        .map(|(name, description)| format!("{}:{}", quote(name), quote(description)))
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn quote(text: &str) -> String {
    serde_json::Value::from(text).to_string()
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Fixed tuning parameters shared by every completion request.
#[derive(Debug, Clone)]
pub struct PromptConfig {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    pub search_recency_filter: SearchRecency,
    pub return_images: bool,
    pub return_related_questions: bool,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4000,
            temperature: 0.1,
            top_p: 0.9,
            presence_penalty: 0.0,
            frequency_penalty: 0.1,
            search_recency_filter: SearchRecency::Week,
            return_images: false,
            return_related_questions: false,
        }
    }
}

impl PromptConfig {
    pub fn with_model(model: impl Into<String>) -> Self {
        Self { model: model.into(), ..Self::default() }
    }

    fn request_with(&self, user_prompt: String) -> CompletionRequest {
        CompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user_prompt)],
            max_tokens: Some(self.max_tokens),
            temperature: Some(self.temperature),
            top_p: Some(self.top_p),
            presence_penalty: Some(self.presence_penalty),
            frequency_penalty: Some(self.frequency_penalty),
            search_recency_filter: Some(self.search_recency_filter),
            return_images: Some(self.return_images),
            return_related_questions: Some(self.return_related_questions),
            stream: Some(false),
        }
    }

    /// `from_when` is resolved by the caller so this stays deterministic.
    pub fn event_request(&self, query: &EventQuery, from_when: &DateTime<Utc>) -> CompletionRequest {
        self.request_with(get_event_list_prompt(query, from_when))
    }

    pub fn flight_request(&self, query: &FlightQuery) -> CompletionRequest {
        self.request_with(get_flight_options_prompt(query))
    }
}

pub fn get_event_list_prompt(query: &EventQuery, from_when: &DateTime<Utc>) -> String {
    EVENT_LIST_TEMPLATE.replace("{event_tags}", &query.event_tags)
        .replace("{country}", &query.country)
        .replace("{city}", &query.city)
        .replace("{start_date}", &format_instant(from_when))
        .replace("{descriptor}", &EVENT_DESCRIPTOR_JSON)
        .replace("{limit}", EVENT_ITEM_LIMIT)
}

pub fn get_flight_options_prompt(query: &FlightQuery) -> String {
    FLIGHT_OPTIONS_TEMPLATE.replace("{dest_city}", &query.conference_city)
        .replace("{dest_country}", &query.conference_country)
        .replace("{depart_city}", &query.depart_city)
        .replace("{depart_country}", &query.depart_country)
        .replace("{start_date}", &format_instant(&query.from_when))
        .replace("{descriptor}", &FLIGHT_DESCRIPTOR_JSON)
        .replace("{limit}", FLIGHT_ITEM_LIMIT)
}
