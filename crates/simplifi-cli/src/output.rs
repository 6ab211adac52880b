//! Console and file output for API results, in JSON or CSV form.

use std::fs;
use std::path::PathBuf;

use anyhow::anyhow;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Where and how a result should be rendered, resolved once from the CLI.
#[derive(Debug, Clone)]
pub(crate) struct OutputOptions {
    pub(crate) format: OutputFormat,
    pub(crate) path: Option<PathBuf>,
}

/// Print the result to stdout, or write it to a file whose extension is
/// derived from the selected format.
///
/// File-write failures are logged and do not fail the invocation.
pub(crate) fn emit(value: &Value, opts: &OutputOptions) -> CliResult<()> {
    let text = render(value, opts.format)?;

    match &opts.path {
        None => match opts.format {
            OutputFormat::Json => println!("{text}"),
            OutputFormat::Csv => print!("{text}"),
        },
        Some(base) => {
            let path = base.with_extension(opts.format.extension());
            match fs::write(&path, &text) {
                Ok(()) => println!("Saved output to {}", path.display()),
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "failed to write output file");
                }
            }
        }
    }

    Ok(())
}

fn render(value: &Value, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}"))),
        OutputFormat::Csv => to_csv(value),
    }
}

/// Render a result as a flat table: a single object becomes a one-row
/// table, a sequence becomes one row per element. The header row is taken
/// from the keys of the first element; keys missing from later elements
/// render as empty cells.
fn to_csv(value: &Value) -> CliResult<String> {
    let rows: &[Value] = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(_) => std::slice::from_ref(value),
        _ => {
            return Err(CliError::failure(anyhow!(
                "cannot render a scalar JSON value as CSV"
            )));
        }
    };

    let Some(first) = rows.first() else {
        return Ok(String::new());
    };
    let first = first
        .as_object()
        .ok_or_else(|| CliError::failure(anyhow!("CSV rows must be JSON objects")))?;
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();

    let mut out = String::new();
    out.push_str(
        &headers
            .iter()
            .map(|header| escape_field((*header).to_string()))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for row in rows {
        let object = row
            .as_object()
            .ok_or_else(|| CliError::failure(anyhow!("CSV rows must be JSON objects")))?;
        let line = headers
            .iter()
            .map(|key| escape_field(cell_text(object.get(*key))))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&line);
        out.push('\n');
    }

    Ok(out)
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Comma-bearing fields are double-quoted with embedded quotes doubled.
/// Newlines and other delimiters are intentionally left unescaped.
fn escape_field(raw: String) -> String {
    if raw.contains(',') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw
    }
}
