use anyhow::Result;
use reqwest::StatusCode;

use crate::helpers::spawn_test_app;

#[tokio::test]
async fn health_check_ok() -> Result<()> {
    let app = spawn_test_app().await?;

    let res = app
        .http_client
        .get(app.url("/health-check"))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.content_length(), Some(0));

    Ok(())
}
