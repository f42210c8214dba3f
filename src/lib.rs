pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod llm;
pub mod models;
pub mod server;

use agent::TravelAgent;
use cli::Args;
use config::prompt::PromptConfig;
use llm::chat::{ ChatClient, new_client as new_chat_client };
use llm::LlmConfig;
use log::info;
use server::Server;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

pub fn llm_config_from_args(args: &Args) -> LlmConfig {
    LlmConfig {
        api_key: args.perplexity_api_key.clone().filter(|k| !k.trim().is_empty()),
        completion_model: Some(args.perplexity_model.clone()),
        base_url: Some(args.perplexity_base_url.clone()),
        timeout: Duration::from_secs(args.request_timeout_secs),
    }
}

/// Builds the pipeline when a key is configured. A missing key is reported per call, not here.
pub fn build_agent(args: &Args) -> Result<Option<Arc<TravelAgent>>, Box<dyn Error + Send + Sync>> {
    let llm_config = llm_config_from_args(args);
    if llm_config.api_key.is_none() {
        return Ok(None);
    }

    let chat_client = new_chat_client(&llm_config)?;
    info!(
        "Chat client configured: Model={}, BaseURL={}",
        chat_client.get_model(),
        chat_client.get_base_url()
    );
    let prompt_config = PromptConfig::with_model(args.perplexity_model.clone());
    Ok(Some(Arc::new(TravelAgent::new(chat_client, prompt_config))))
}

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Completion Endpoint: {}", args.perplexity_base_url);
    info!("Completion Model: {}", args.perplexity_model);
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("API Key Present: {}", args.perplexity_api_key.is_some());
    info!("CORS Allow Origin: {}", args.cors_allow_origin);
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let agent = build_agent(&args)?;
    let server = Server::new(agent, args);
    server.run().await?;

    Ok(())
}
