pub mod api;
pub mod cors;
pub mod error;

use crate::agent::TravelAgent;
use crate::cli::Args;
use log::{ info, warn };
use std::error::Error;
use std::sync::Arc;

pub struct Server {
    agent: Option<Arc<TravelAgent>>,
    args: Args,
}

impl Server {
    pub fn new(agent: Option<Arc<TravelAgent>>, args: Args) -> Self {
        if agent.is_some() {
            info!("Server configured with a completion client.");
        } else {
            warn!("Server configured WITHOUT a Perplexity API key. Lookups will answer 500.");
        }

        Self { agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let state = api::AppState { agent: self.agent.clone() };
        api::start_http_server(state, self.args.clone()).await
    }
}
