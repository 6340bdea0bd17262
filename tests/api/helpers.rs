use std::{net::SocketAddr, sync::OnceLock};

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine};
use listomat::{config::get_or_init_config, App};
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

pub struct TestApp {
    pub addr: SocketAddr,
    /// Stands in for the GitHub contents API.
    pub github_server: MockServer,
    pub http_client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Convenience method for making a `POST /api/subscribe` request.
    pub async fn post_subscribe(&self, body: &serde_json::Value) -> Result<reqwest::Response> {
        let res = self
            .http_client
            .post(self.url("/api/subscribe"))
            .json(body)
            .send()
            .await?;
        Ok(res)
    }
}

/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name]
/// ```
fn init_test_tracing() {
    static TRACING: OnceLock<()> = OnceLock::new();
    TRACING.get_or_init(|| {
        if std::env::var("TEST_LOG").is_ok() {
            listomat::init_dbg_tracing();
        }
    });
}

pub async fn spawn_test_app() -> Result<TestApp> {
    spawn_test_app_with_cors(true).await
}

/// Spawns the app on a random port, pointing its GitHub client at a fresh
/// `MockServer`.
pub async fn spawn_test_app_with_cors(enable_cors: bool) -> Result<TestApp> {
    init_test_tracing();

    let github_server = MockServer::start().await;

    let mut config = get_or_init_config().clone();
    config.net_config.host = [127, 0, 0, 1];
    // Trying to bind port 0 will trigger an OS scan for an available port
    // which will then be bound to the application.
    config.net_config.app_port = 0;
    config.net_config.enable_cors = enable_cors;
    config.github_config.api_url = github_server.uri();

    let app = App::build_from_config(config).await?;
    let addr = app.listener.local_addr()?;

    tokio::spawn(listomat::serve(app));

    Ok(TestApp {
        addr,
        github_server,
        http_client: reqwest::Client::new(),
    })
}

/// The path the app's GitHub client addresses, derived from the same config
/// the app was built from.
pub fn contents_path() -> String {
    let gh_config = &get_or_init_config().github_config;
    format!(
        "/repos/{}/{}/contents/{}",
        gh_config.owner, gh_config.repo, gh_config.file_path
    )
}

/// A contents-endpoint read response for a file holding `content`.
pub fn file_response(content: &str, sha: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "content": STANDARD.encode(content),
        "sha": sha,
    }))
}

/// Matches a contents-endpoint write with exactly this commit message,
/// decoded content and sha field.
pub struct PutFileMatcher {
    pub message: String,
    pub content_b64: String,
    pub sha: Option<String>,
}

impl PutFileMatcher {
    pub fn new(email: &str, content: &str, sha: Option<&str>) -> Self {
        PutFileMatcher {
            message: format!("feat: Add new subscriber {email}"),
            content_b64: STANDARD.encode(content),
            sha: sha.map(ToOwned::to_owned),
        }
    }
}

impl wiremock::Match for PutFileMatcher {
    fn matches(&self, request: &wiremock::Request) -> bool {
        let body: serde_json::Value = match serde_json::from_slice(&request.body) {
            Ok(body) => body,
            Err(_) => return false,
        };

        let message_matches = body.get("message").and_then(|v| v.as_str()) == Some(&self.message);
        let content_matches =
            body.get("content").and_then(|v| v.as_str()) == Some(&self.content_b64);
        // On a create the sha field must be absent, not null.
        let sha_matches = match &self.sha {
            Some(sha) => body.get("sha").and_then(|v| v.as_str()) == Some(sha),
            None => body.get("sha").is_none(),
        };

        message_matches && content_matches && sha_matches
    }
}
