use std::path::Path;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{AppContext, CliError, CliResult, classify_problem};
use crate::commands::read_body_object;
use crate::output::{self, OutputOptions};

/// Subset of fields forwarded to the API on ad updates; everything else in
/// the input file is dropped.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AdPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) end_date: Option<Value>,
}

pub(crate) async fn handle_ad_list(
    ctx: &AppContext,
    campaign_id: Option<u64>,
    out: &OutputOptions,
) -> CliResult<()> {
    let campaign_id = campaign_id
        .ok_or_else(|| CliError::validation("campaign ID is required (--campaign-id)"))?;

    let url = ctx
        .base_url
        .join(&format!(
            "/api/organizations/{}/campaigns/{campaign_id}/ads",
            ctx.org_id
        ))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.get(url))
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns/{campaign_id}/ads failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let ads = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse ad list: {err}")))?;
        tracing::debug!(body = %ads, "ad list received");
        output::emit(&ads, out)
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_ad_create(
    ctx: &AppContext,
    campaign_id: Option<u64>,
    file: Option<&Path>,
    out: &OutputOptions,
) -> CliResult<()> {
    let campaign_id = campaign_id
        .ok_or_else(|| CliError::validation("campaign ID is required (--campaign-id)"))?;
    let body = read_body_object(file)?;

    let url = ctx
        .base_url
        .join(&format!(
            "/api/organizations/{}/campaigns/{campaign_id}/ads",
            ctx.org_id
        ))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.post(url))
        .json(&body)
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns/{campaign_id}/ads failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let ad = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse created ad: {err}")))?;
        tracing::debug!(body = %ad, "ad created");
        output::emit(&ad, out)
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_ad_update(
    ctx: &AppContext,
    campaign_id: Option<u64>,
    ad_id: Option<u64>,
    file: Option<&Path>,
    out: &OutputOptions,
) -> CliResult<()> {
    let campaign_id = campaign_id
        .ok_or_else(|| CliError::validation("campaign ID is required (--campaign-id)"))?;
    let ad_id = ad_id.ok_or_else(|| CliError::validation("ad ID is required (--ad-id)"))?;

    let body = read_body_object(file)?;
    let patch: AdPatch = serde_json::from_value(body)
        .map_err(|err| CliError::failure(anyhow!("failed to extract update fields: {err}")))?;

    let url = ctx
        .base_url
        .join(&format!(
            "/api/organizations/{}/campaigns/{campaign_id}/ads/{ad_id}",
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
                "request to /api/organizations/{{org}}/campaigns/{campaign_id}/ads/{ad_id} failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        let ad = response
            .json::<Value>()
            .await
            .map_err(|err| CliError::failure(anyhow!("failed to parse updated ad: {err}")))?;
        tracing::debug!(body = %ad, "ad updated");
        output::emit(&ad, out)
    } else {
        Err(classify_problem(response).await)
    }
}

pub(crate) async fn handle_ad_delete(
    ctx: &AppContext,
    campaign_id: Option<u64>,
    ad_id: Option<u64>,
) -> CliResult<()> {
    let campaign_id = campaign_id
        .ok_or_else(|| CliError::validation("campaign ID is required (--campaign-id)"))?;
    let ad_id = ad_id.ok_or_else(|| CliError::validation("ad ID is required (--ad-id)"))?;

    let url = ctx
        .base_url
        .join(&format!(
            "/api/organizations/{}/campaigns/{campaign_id}/ads/{ad_id}",
            ctx.org_id
        ))
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .authed(ctx.client.delete(url))
        .send()
        .await
        .map_err(|err| {
            CliError::failure(anyhow!(
                "request to /api/organizations/{{org}}/campaigns/{campaign_id}/ads/{ad_id} failed: {err}"
            ))
        })?;

    if response.status().is_success() {
        println!("Ad deletion requested (id: {ad_id})");
        Ok(())
    } else {
        Err(classify_problem(response).await)
    }
}
