use std::time::Duration;

use chrono::{ TimeZone, Utc };
use conf_travel_fetch::agent::TravelAgent;
use conf_travel_fetch::config::prompt::PromptConfig;
use conf_travel_fetch::error::CompletionError;
use conf_travel_fetch::llm::chat::perplexity::PerplexityChatClient;
use conf_travel_fetch::llm::chat::ChatClient;
use conf_travel_fetch::models::{ EventDate, EventQuery, FlightQuery };
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{ body_partial_json, header, method, path },
    Mock,
    MockServer,
    ResponseTemplate,
};

fn client_for(server: &MockServer, timeout: Duration) -> PerplexityChatClient {
    PerplexityChatClient::new("test-key", Some("sonar".into()), Some(server.uri()), timeout).unwrap()
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "cmpl-123",
        "object": "chat.completion",
        "created": 1735689600,
        "model": "sonar",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": { "role": "assistant", "content": content }
        }],
        "usage": { "prompt_tokens": 512, "completion_tokens": 128, "total_tokens": 640 },
        "citations": ["https://eurorust.eu"]
    })
}

fn event_query() -> EventQuery {
    EventQuery {
        event_tags: "rust".into(),
        city: "Berlin".into(),
        country: "Germany".into(),
        full_addr: None,
        from_when: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
    }
}

fn flight_query() -> FlightQuery {
    FlightQuery {
        conference_city: "Berlin".into(),
        conference_country: "Germany".into(),
        depart_city: "Paris".into(),
        depart_country: "France".into(),
        from_when: Utc.with_ymd_and_hms(2025, 9, 1, 8, 0, 0).unwrap(),
    }
}

#[tokio::test]
async fn posts_bearer_authenticated_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "sonar", "search_recency_filter": "week", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("[]")))
        .expect(1)
        .mount(&server).await;

    let client = client_for(&server, Duration::from_secs(5));
    let request = PromptConfig::default().flight_request(&flight_query());
    let response = client.complete(&request).await.unwrap();

    assert_eq!(response.first_content(), Some("[]"));
    assert_eq!(response.usage.as_ref().unwrap().total_tokens, 640);
    assert_eq!(response.citation_list(), ["https://eurorust.eu"]);
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server).await;

    let client = client_for(&server, Duration::from_secs(5));
    let request = PromptConfig::default().flight_request(&flight_query());

    match client.complete(&request).await {
        Err(CompletionError::Status { status, body }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid api key");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_choices_are_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server).await;

    let client = client_for(&server, Duration::from_secs(5));
    let request = PromptConfig::default().flight_request(&flight_query());

    assert!(matches!(client.complete(&request).await, Err(CompletionError::EmptyResponse)));
}

#[tokio::test]
async fn slow_upstream_times_out_and_pipeline_degrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("[]"))
                .set_delay(Duration::from_millis(500))
        )
        .mount(&server).await;

    let client = client_for(&server, Duration::from_millis(50));
    let request = PromptConfig::default().flight_request(&flight_query());
    assert!(matches!(client.complete(&request).await, Err(CompletionError::Transport(_))));

    let agent = TravelAgent::new(Arc::new(client), PromptConfig::default());
    assert!(agent.fetch_flight_schedule(&flight_query()).await.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_degrades_to_empty() {
    let client = PerplexityChatClient::new(
        "k",
        None,
        Some("http://127.0.0.1:9".into()),
        Duration::from_secs(2)
    ).unwrap();
    let agent = TravelAgent::new(Arc::new(client), PromptConfig::default());

    assert!(agent.fetch_conference_list(&event_query()).await.is_empty());
    assert!(agent.fetch_flight_schedule(&flight_query()).await.is_empty());
}

#[tokio::test]
async fn fenced_reply_maps_into_events() {
    let content = "```json\n[{\"name\":\"EuroRust\",\"eventDescription\":\"Rust in Europe\",\"eventUrl\":\"https://eurorust.eu\",\"venueAddressCountry\":\"Germany\",\"venueAddressCity\":\"Berlin\",\"venueAddressStreet\":\"Alexanderplatz 1\",\"eventStartDate\":\"2025-10-09T09:00:00Z\",\"eventEndDate\":\"TBA\"} // best match\n]\n```";

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server).await;

    let agent = TravelAgent::new(
        Arc::new(client_for(&server, Duration::from_secs(5))),
        PromptConfig::default()
    );
    let events = agent.try_fetch_conference_list(&event_query()).await;

    // the line comment swallows the closing bracket once newlines are flattened
    assert!(events.is_err());

    let clean = content.replace(" // best match", "");
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&clean)))
        .mount(&server).await;

    let agent = TravelAgent::new(
        Arc::new(client_for(&server, Duration::from_secs(5))),
        PromptConfig::default()
    );
    let events = agent.fetch_conference_list(&event_query()).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].venue_address.full_addr, "Alexanderplatz 1");
    assert_eq!(events[0].event_end_date, EventDate::Placeholder("TBA".into()));
}
