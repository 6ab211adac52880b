//! Command handlers grouped by API resource.

pub(crate) mod ads;
pub(crate) mod campaigns;

use std::path::Path;

use anyhow::{Context, anyhow};
use serde_json::Value;

use crate::client::{CliError, CliResult};

/// Read the JSON object backing a body-carrying action.
pub(crate) fn read_body_object(file: Option<&Path>) -> CliResult<Value> {
    let path = file.ok_or_else(|| CliError::validation("a JSON body file is required (--file)"))?;

    let payload = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))
        .map_err(CliError::failure)?;

    let body: Value = serde_json::from_str(&payload)
        .map_err(|err| CliError::failure(anyhow!("body file is not valid JSON: {err}")))?;

    if !body.is_object() {
        return Err(CliError::validation("body file must contain a JSON object"));
    }

    Ok(body)
}
