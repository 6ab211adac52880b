use std::path::Path;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::commands::read_body_object;
use crate::output::{self, OutputOptions};

/// Subset of fields forwarded to the API on campaign updates; everything
/// else in the input file is dropped.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CampaignPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end_date: Option<Value>,
}

pub(crate) async fn handle_campaign_list(ctx: &AppContext, out: &OutputOptions) -> CliResult<()> {
    let url = ctx
        .base_url
        .join(&format!("/api/organizations/{}/campaigns", ctx.org_id))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.get(url))
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let campaigns = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse campaign list: {err}")))?;
        tracing::debug!(body = %campaigns, "campaign list received");
        output::emit(&campaigns, out)
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_campaign_create(
    ctx: &AppContext,
    file: Option<&Path>,
    out: &OutputOptions,
) -> CliResult<()> {
    let body = read_body_object(file)?;

    let url = ctx
        .base_url
        .join(&format!("/api/organizations/{}/campaigns", ctx.org_id))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.post(url))
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let campaign = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse created campaign: {err}")))?;
        tracing::debug!(body = %campaign, "campaign created");
        output::emit(&campaign, out)
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_campaign_update(
    ctx: &AppContext,
    campaign_id: Option<u64>,
    file: Option<&Path>,
    out: &OutputOptions,
) -> CliResult<()> {
    let campaign_id = campaign_id
        .ok_or_else(|| CliError::validation("campaign ID is required (--campaign-id)"))?;

    let body = read_body_object(file)?;
    let patch: CampaignPatch = serde_json::from_value(body)
        .map_err(|err| CliError::failure(anyhow!("failed to extract update fields: {err}")))?;

    let url = ctx
        .base_url
        .join(&format!(
            "/api/organizations/{}/campaigns/{campaign_id}",
            ctx.org_id
        ))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.put(url))
        .json(&patch)
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns/{campaign_id} failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let campaign = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse updated campaign: {err}")))?;
        tracing::debug!(body = %campaign, "campaign updated");
        output::emit(&campaign, out)
    } else {
        Err(classify_problem(response).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::PUT;
    use httpmock::prelude::*;
    use reqwest::Client;
    use serde_json::json;
    use std::path::PathBuf;
    use std::{env, fs};
    use uuid::Uuid;

    use crate::cli::OutputFormat;
    use crate::client::{HEADER_APP_KEY, HEADER_USER_KEY};

    fn context_with(server: &MockServer) -> AppContext {
        AppContext {
            client: Client::new(),
            base_url: server.base_url().parse().expect("valid URL"),
            org_id: "77".to_string(),
            app_key: Some("app-key".to_string()),
            user_key: Some("user-key".to_string()),
        }
    }

    fn stdout_json() -> OutputOptions {
        OutputOptions {
            format: OutputFormat::Json,
            path: None,
        }
    }

    fn temp_path(name: &str) -> PathBuf {
        let mut path = env::temp_dir();
        path.push(format!(
            "simplifi-cli-test-{}-{}-{name}",
            std::process::id(),
            Uuid::new_v4()
        ));
        path
    }

    #[tokio::test]
    async fn campaign_list_sends_credential_headers() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/77/campaigns")
                .header(HEADER_APP_KEY, "app-key")
                .header(HEADER_USER_KEY, "user-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"campaigns": []}));
        });

        let ctx = context_with(&server);
        handle_campaign_list(&ctx, &stdout_json())
            .await
            .expect("campaign list should succeed");
        mock.assert();
    }

    #[tokio::test]
    async fn campaign_create_requires_body_file() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server);
        let err = handle_campaign_create(&ctx, None, &stdout_json())
            .await
            .expect_err("missing body file must fail before any request");
        assert!(matches!(err, CliError::Validation(message) if message.contains("--file")));
    }

    #[tokio::test]
    async fn campaign_create_posts_file_payload_unmodified() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/77/campaigns")
                .json_body(json!({
                    "name": "Spring Push",
                    "end_date": "2026-03-01",
                    "daily_budget": 250
                }));
            then.status(201)
                .header("content-type", "application/json")
                .json_body(json!({"id": 42, "name": "Spring Push"}));
        });

        let file = temp_path("create-campaign.json");
        fs::write(
            &file,
            r#"{"name": "Spring Push", "end_date": "2026-03-01", "daily_budget": 250}"#,
        )
        .expect("write body file");

        let ctx = context_with(&server);
        handle_campaign_create(&ctx, Some(&file), &stdout_json())
            .await
            .expect("campaign create should succeed");
        mock.assert();
        let _ = fs::remove_file(file);
    }

    #[tokio::test]
    async fn campaign_update_requires_campaign_id() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server);
        let err = handle_campaign_update(&ctx, None, None, &stdout_json())
            .await
            .expect_err("missing campaign ID must fail before any request");
        assert!(matches!(err, CliError::Validation(message) if message.contains("campaign ID")));
    }

    #[tokio::test]
    async fn campaign_update_requires_body_file() {
        let server = MockServer::start_async().await;
        let ctx = context_with(&server);
        let err = handle_campaign_update(&ctx, Some(42), None, &stdout_json())
            .await
            .expect_err("missing body file must fail before any request");
        assert!(matches!(err, CliError::Validation(message) if message.contains("--file")));
    }

    #[tokio::test]
    async fn campaign_update_narrows_body_to_patch_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/organizations/77/campaigns/42")
                .json_body(json!({
                    "name": "Spring Push",
                    "end_date": "2026-03-01"
                }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"id": 42, "name": "Spring Push"}));
        });

        let file = temp_path("update-campaign.json");
        fs::write(
            &file,
            r#"{"name": "Spring Push", "end_date": "2026-03-01", "daily_budget": 9000, "status": "active"}"#,
        )
        .expect("write body file");

        let ctx = context_with(&server);
        handle_campaign_update(&ctx, Some(42), Some(&file), &stdout_json())
            .await
            .expect("campaign update should succeed");
        mock.assert();
        let _ = fs::remove_file(file);
    }

    #[tokio::test]
    async fn campaign_update_omits_absent_patch_fields() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/organizations/77/campaigns/42")
                .json_body(json!({"name": "Renamed"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"id": 42, "name": "Renamed"}));
        });

        let file = temp_path("rename-campaign.json");
        fs::write(&file, r#"{"name": "Renamed"}"#).expect("write body file");

        let ctx = context_with(&server);
        handle_campaign_update(&ctx, Some(42), Some(&file), &stdout_json())
            .await
            .expect("campaign update should succeed");
        mock.assert();
        let _ = fs::remove_file(file);
    }
}
