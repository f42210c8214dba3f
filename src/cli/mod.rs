use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Provider Args ---
    /// API key for the Perplexity completion endpoint. Without it every lookup answers 500.
    #[arg(long, env = "PERPLEXITY_API_KEY", hide_env_values = true)]
    pub perplexity_api_key: Option<String>,

    /// Base URL of the completion API (the client appends /chat/completions)
    #[arg(long, env = "PERPLEXITY_BASE_URL", default_value = "https://api.perplexity.ai")]
    pub perplexity_base_url: String,

    /// Model name sent with every completion request (e.g., sonar, sonar-pro)
    #[arg(long, env = "PERPLEXITY_MODEL", default_value = "sonar")]
    pub perplexity_model: String,

    /// Timeout in seconds for a single completion call.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "60")]
    pub request_timeout_secs: u64,

    // --- HTTP Server Args ---
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:4000")]
    pub server_addr: String,

    /// Value of Access-Control-Allow-Origin on every response.
    #[arg(long, env = "CORS_ALLOW_ORIGIN", default_value = "*")]
    pub cors_allow_origin: String,

    /// How long browsers may cache a preflight answer, in seconds.
    #[arg(long, env = "CORS_MAX_AGE_SECS", default_value = "86400")]
    pub cors_max_age_secs: u64,

    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}
