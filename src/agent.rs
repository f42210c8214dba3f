use chrono::Utc;
use log::{ debug, error, info };
use std::sync::Arc;

use crate::config::prompt::PromptConfig;
use crate::error::{ CompletionError, PipelineError };
use crate::extract::{ map_events, map_flights, sanitize_completion };
use crate::llm::chat::ChatClient;
use crate::models::{ CompletionRequest, ConferenceEvent, EventQuery, FlightItinerary, FlightQuery };

/// Runs the prompt -> completion -> sanitize -> map pipeline for both query kinds.
#[derive(Clone)]
pub struct TravelAgent {
    chat_client: Arc<dyn ChatClient>,
    prompt_config: Arc<PromptConfig>,
}

impl TravelAgent {
    pub fn new(chat_client: Arc<dyn ChatClient>, prompt_config: PromptConfig) -> Self {
        Self {
            chat_client,
            prompt_config: Arc::new(prompt_config),
        }
    }

    /// Upstream and parse failures are logged and turned into an empty list.
    pub async fn fetch_conference_list(&self, query: &EventQuery) -> Vec<ConferenceEvent> {
        match self.try_fetch_conference_list(query).await {
            Ok(events) => {
                info!("Fetched {} conference event(s) for '{}'", events.len(), query.event_tags);
                events
            }
            Err(e) => {
                error!("Conference lookup failed, answering with no events: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn fetch_flight_schedule(&self, query: &FlightQuery) -> Vec<FlightItinerary> {
        match self.try_fetch_flight_schedule(query).await {
            Ok(flights) => {
                info!(
                    "Fetched {} flight option(s) from {} to {}",
                    flights.len(),
                    query.depart_city,
                    query.conference_city
                );
                flights
            }
            Err(e) => {
                error!("Flight lookup failed, answering with no flights: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn try_fetch_conference_list(
        &self,
        query: &EventQuery
    ) -> Result<Vec<ConferenceEvent>, PipelineError> {
        let from_when = query.from_when.unwrap_or_else(Utc::now);
        let request = self.prompt_config.event_request(query, &from_when);
        let sanitized = self.complete_sanitized(&request).await?;
        Ok(map_events(&sanitized)?)
    }

    pub async fn try_fetch_flight_schedule(
        &self,
        query: &FlightQuery
    ) -> Result<Vec<FlightItinerary>, PipelineError> {
        let request = self.prompt_config.flight_request(query);
        let sanitized = self.complete_sanitized(&request).await?;
        Ok(map_flights(&sanitized)?)
    }

    async fn complete_sanitized(&self, request: &CompletionRequest) -> Result<String, PipelineError> {
        debug!("Sending completion request: {:?}", request);
        let response = self.chat_client.complete(request).await?;
        let content = response.first_content().ok_or(CompletionError::EmptyResponse)?;
        let sanitized = sanitize_completion(content);
        debug!("Sanitized {} to {}", content, sanitized);
        Ok(sanitized)
    }
}
