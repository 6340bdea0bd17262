pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, GithubClient, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let gh_config = &config.github_config;
        let github_client = GithubClient::new(
            &gh_config.api_url,
            &gh_config.owner,
            &gh_config.repo,
            &gh_config.file_path,
            gh_config.token.clone(),
            gh_config.timeout(),
        )?;

        let app_state = AppState::new(github_client, config.net_config.enable_cors);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr)
            .await
            .context("failed to bind the app listener")?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

pub struct InternalState {
    pub github_client: GithubClient,
    pub enable_cors: bool,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(github_client: GithubClient, enable_cors: bool) -> Self {
        AppState(Arc::new(InternalState {
            github_client,
            enable_cors,
        }))
    }
}
