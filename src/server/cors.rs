use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE,
    STRICT_TRANSPORT_SECURITY,
    X_CONTENT_TYPE_OPTIONS,
};
use axum::http::{ HeaderName, HeaderValue };

use crate::cli::Args;
use crate::error::ConfigurationError;

pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const HSTS: &str = "max-age=31536000; includeSubDomains";
pub const NOSNIFF: &str = "nosniff";

/// Headers stamped on every response, built once at startup.
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            max_age_secs: 86400,
        }
    }
}

impl CorsConfig {
    pub fn from_args(args: &Args) -> Self {
        Self {
            allow_origin: args.cors_allow_origin.clone(),
            max_age_secs: args.cors_max_age_secs,
        }
    }

    pub fn response_headers(&self) -> Result<Vec<(HeaderName, HeaderValue)>, ConfigurationError> {
        let allow_origin = HeaderValue::from_str(&self.allow_origin).map_err(|e|
            ConfigurationError::InvalidHeader {
                name: "access-control-allow-origin",
                reason: e.to_string(),
            }
        )?;

        Ok(
            vec![
                (ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin),
                (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
                (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
                (ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age_secs)),
                (STRICT_TRANSPORT_SECURITY, HeaderValue::from_static(HSTS)),
                (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static(NOSNIFF))
            ]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_headers() {
        let headers = CorsConfig::default().response_headers().unwrap();
        assert_eq!(headers.len(), 6);
        assert_eq!(headers[0].1, "*");
        assert_eq!(headers[3].1, "86400");
    }

    #[test]
    fn origin_with_newline_is_rejected() {
        let config = CorsConfig { allow_origin: "https://a.example\n".into(), ..CorsConfig::default() };
        assert!(matches!(config.response_headers(), Err(ConfigurationError::InvalidHeader { .. })));
    }
}
