use thiserror::Error;

/// Raised when the process is missing something it needs to talk upstream.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Could not find the Perplexity API key!")]
    MissingApiKey,
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("Invalid value for response header '{name}': {reason}")]
    InvalidHeader {
        name: &'static str,
        reason: String,
    },
    #[error("{0}")]
    Tls(String),
}

/// Inbound payload rejected before any prompt is built.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Request body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error("Request body must be a JSON object")]
    NotAnObject,
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),
    #[error("Invalid field '{field}': {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Completion endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Could not decode completion response: {0}")]
    Decode(String),
    #[error("Completion response contained no choices")]
    EmptyResponse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Sanitized completion is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("Expected a JSON array of items")]
    NotAnArray,
    #[error("Item is missing field '{field}'")]
    MissingField { field: &'static str },
    #[error("Item field '{field}' is invalid: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::InvalidJson(err.to_string())
    }
}

/// Failure of one fetch pipeline before degradation is applied.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
