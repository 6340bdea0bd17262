use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::{
    github_client::{Error as GithubError, StoredFile},
    web::{
        data::{SubscribeRequest, ValidEmail},
        WebResult,
    },
    AppState,
};

/// Upper bound on writes per request. A write only gets repeated when it lost
/// the optimistic-concurrency race against another request, see
/// [`append_subscriber`].
const MAX_WRITE_ATTEMPTS: usize = 3;

#[tracing::instrument(
    name = "Adding new subscriber to the list",
    skip(app_state, req),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    State(app_state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> WebResult<(StatusCode, Json<Value>)> {
    let email = ValidEmail::parse(req.email.as_deref().unwrap_or_default())?;
    tracing::Span::current().record("subscriber_email", email.as_ref());

    append_subscriber(&app_state, &email).await?;

    info!("New subscriber succesfully added to the list.");

    Ok((
        StatusCode::OK,
        Json(json!({ "message": "Successfully subscribed!" })),
    ))
}

/// Reads the current list, appends `email` on its own line and writes the
/// result back, passing along the sha observed by the read.
///
/// Two requests arriving close together can observe the same sha; the remote
/// API then rejects whichever write lands second, since accepting it would
/// silently drop the first writer's entry. That rejection restarts the
/// read-append-write sequence here, bounded by [`MAX_WRITE_ATTEMPTS`].
async fn append_subscriber(app_state: &AppState, email: &ValidEmail) -> WebResult<()> {
    let github_client = &app_state.github_client;
    let message = format!("feat: Add new subscriber {email}");

    let mut attempt = 1;
    loop {
        let (current_content, sha) = match github_client.get_file().await? {
            Some(StoredFile { content, sha }) => (content, Some(sha)),
            // First subscriber: the list doesn't exist yet.
            None => (String::new(), None),
        };

        let new_content = append_line(&current_content, email.as_ref());

        match github_client
            .put_file(&message, &new_content, sha.as_deref())
            .await
        {
            Ok(()) => return Ok(()),
            Err(GithubError::ShaConflict) if attempt < MAX_WRITE_ATTEMPTS => {
                warn!("subscriber list changed underneath us, retrying (attempt {attempt})");
                attempt += 1;
            }
            Err(er) => return Err(er.into()),
        }
    }
}

fn append_line(current: &str, email: &str) -> String {
    if current.is_empty() {
        email.to_string()
    } else {
        format!("{current}\n{email}")
    }
}
