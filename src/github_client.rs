//! Client for the GitHub repository-contents API, which stores the
//! subscriber list as a single text file.

use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{
    header::{ACCEPT, AUTHORIZATION},
    Client, StatusCode,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::error;

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";

/// A file fetched from the contents endpoint, with the transport encoding
/// already stripped. The `sha` has to be passed back on the next write so the
/// API can detect that the file changed in the meantime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub content: String,
    pub sha: String,
}

#[derive(Debug)]
pub struct GithubClient {
    pub http_client: Client,
    contents_url: reqwest::Url,
    token: SecretString,
}

impl GithubClient {
    pub fn new<S: AsRef<str>>(
        api_url: S,
        owner: &str,
        repo: &str,
        file_path: &str,
        token: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let contents_url = format!(
            "{}/repos/{owner}/{repo}/contents/{file_path}",
            api_url.as_ref().trim_end_matches('/')
        );
        let contents_url =
            reqwest::Url::parse(&contents_url).map_err(|e| Error::UrlParsing(e.to_string()))?;

        // GitHub rejects requests without a User-Agent.
        let http_client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;

        Ok(GithubClient {
            http_client,
            contents_url,
            token,
        })
    }

    /// Fetches the current subscriber list.
    /// Returns `Ok(None)` when the file doesn't exist yet, which is the case
    /// until the first subscriber is written.
    pub async fn get_file(&self) -> Result<Option<StoredFile>> {
        let resp = self
            .http_client
            .get(self.contents_url.clone())
            .header(
                AUTHORIZATION,
                format!("token {}", self.token.expose_secret()),
            )
            .header(ACCEPT, GITHUB_ACCEPT)
            .send()
            .await?;

        match resp.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let file: ContentsResponse = resp.json().await?;
                let content = b64_decode_to_string(&file.content)?;
                Ok(Some(StoredFile {
                    content,
                    sha: file.sha,
                }))
            }
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(Error::ReadRejected { status, body })
            }
        }
    }

    /// Creates or updates the subscriber list. `sha` must be the hash observed
    /// by the preceding read, and must be `None` when the file doesn't exist
    /// yet; the API uses it to decide create-vs-update and to reject writes
    /// based on stale content.
    pub async fn put_file(&self, message: &str, content: &str, sha: Option<&str>) -> Result<()> {
        let body = PutFileBody {
            message,
            content: STANDARD.encode(content),
            sha,
        };

        let resp = self
            .http_client
            .put(self.contents_url.clone())
            .header(
                AUTHORIZATION,
                format!("token {}", self.token.expose_secret()),
            )
            .header(ACCEPT, GITHUB_ACCEPT)
            .json(&body)
            .send()
            .await?;

        match resp.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(Error::ShaConflict),
            status => {
                let body = resp.text().await.unwrap_or_default();
                error!("contents API rejected write: {body}");
                Err(Error::WriteRejected { status, body })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    /// Base64, line-wrapped by the API.
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutFileBody<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// The contents endpoint line-wraps base64 payloads, strip the whitespace
/// before decoding.
fn b64_decode_to_string(v: &str) -> Result<String> {
    let compact: String = v.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|er| Error::B64Decode(er.to_string()))?;
    String::from_utf8(bytes).map_err(|er| Error::B64Decode(er.to_string()))
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("base64 decoding error: {0}")]
    B64Decode(String),
    #[error("contents read failed with status {status}")]
    ReadRejected { status: StatusCode, body: String },
    #[error("contents write failed with status {status}")]
    WriteRejected { status: StatusCode, body: String },
    #[error("contents write rejected: the observed sha is stale")]
    ShaConflict,

    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}
