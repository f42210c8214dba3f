use crate::agent::TravelAgent;
use crate::cli::Args;
use crate::error::{ ConfigurationError, ValidationError };
use crate::models::{ EventQuery, FlightQuery };
use crate::server::cors::CorsConfig;
use crate::server::error::ApiError;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use axum::{
    Router,
    Json,
    body::Bytes,
    extract::State,
    response::{ IntoResponse, Response },
    http::{ Method, StatusCode, Uri },
};
use serde::Serialize;
use serde_json::Value as JsonValue;
use tower_http::set_header::SetResponseHeaderLayer;
use log::{ info, warn, error };

pub const EVENTS_ENDPOINT: &str = "events";
pub const FLIGHTS_ENDPOINT: &str = "flights";

#[derive(Serialize)]
pub struct SuccessResponse<T> {
    pub success: bool,
    pub data: Vec<T>,
}

/// `agent` is `None` when no API key was configured; lookups then fail with a configuration error.
#[derive(Clone)]
pub struct AppState {
    pub agent: Option<Arc<TravelAgent>>,
}

impl AppState {
    fn agent(&self) -> Result<&TravelAgent, ConfigurationError> {
        self.agent.as_deref().ok_or(ConfigurationError::MissingApiKey)
    }
}

pub fn build_router(state: AppState, cors: &CorsConfig) -> Result<Router, ConfigurationError> {
    let mut app = Router::new().fallback(dispatch).with_state(state);
    for (name, value) in cors.response_headers()? {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }
    Ok(app)
}

pub async fn start_http_server(
    state: AppState,
    args: Args,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = build_router(state, &CorsConfig::from_args(&args))?;

    if args.enable_tls {
        let (cert_path, key_path) = match (&args.tls_cert_path, &args.tls_key_path) {
            (Some(cert), Some(key)) => (cert, key),
            _ => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                return Err(ConfigurationError::Tls("TLS enabled without cert/key".into()).into());
            }
        };
        info!("TLS enabled. Loading certificate from '{}' and key from '{}'", cert_path, key_path);

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config)
            .serve(app.into_make_service())
            .await?;
    } else {
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
            e
        })?;

        info!("Starting HTTP server on: http://{}", addr);
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

/// Routes on the last path segment, so the service works under any mount prefix.
fn route_key(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return (StatusCode::OK, "ok").into_response();
    }

    let endpoint = route_key(uri.path()).to_string();
    let result = match endpoint.as_str() {
        EVENTS_ENDPOINT => handle_events(&state, &method, &body).await,
        FLIGHTS_ENDPOINT => handle_flights(&state, &method, &body).await,
        _ => Err(ApiError::UnknownRoute(endpoint.clone())),
    };

    result.unwrap_or_else(|e| {
        match &e {
            ApiError::Validation(_) | ApiError::MethodNotAllowed { .. } => {
                warn!("{} {} rejected: {}", method, uri, e);
            }
            _ => {
                error!("{} {} failed: {}", method, uri, e);
            }
        }
        e.into_response()
    })
}

async fn handle_events(state: &AppState, method: &Method, body: &[u8]) -> Result<Response, ApiError> {
    require_post(method, EVENTS_ENDPOINT)?;
    let agent = state.agent()?;
    let query = EventQuery::from_json(&parse_body(body)?)?;

    info!("Event lookup: tags='{}' near {}, {}", query.event_tags, query.city, query.country);
    let events = agent.fetch_conference_list(&query).await;
    Ok(success(events))
}

async fn handle_flights(state: &AppState, method: &Method, body: &[u8]) -> Result<Response, ApiError> {
    require_post(method, FLIGHTS_ENDPOINT)?;
    let agent = state.agent()?;
    let query = FlightQuery::from_json(&parse_body(body)?)?;

    info!(
        "Flight lookup: {}, {} -> {}, {} on {}",
        query.depart_city,
        query.depart_country,
        query.conference_city,
        query.conference_country,
        query.from_when
    );
    let flights = agent.fetch_flight_schedule(&query).await;
    Ok(success(flights))
}

fn require_post(method: &Method, endpoint: &str) -> Result<(), ApiError> {
    if method == Method::POST {
        Ok(())
    } else {
        Err(ApiError::MethodNotAllowed {
            method: method.clone(),
            endpoint: endpoint.to_string(),
        })
    }
}

fn parse_body(body: &[u8]) -> Result<JsonValue, ValidationError> {
    serde_json::from_slice(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

fn success<T: Serialize>(data: Vec<T>) -> Response {
    (StatusCode::OK, Json(SuccessResponse { success: true, data })).into_response()
}
