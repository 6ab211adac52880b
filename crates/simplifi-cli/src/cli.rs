//! Argument parsing and action dispatch for the Simpli.fi CLI.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::commands::{ads, campaigns};
use crate::output::OutputOptions;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "https://app.simpli.fi";

/// Parses CLI arguments, executes the requested action, and reports the
/// outcome on the console. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if cli.debug || std::env::var_os("RUST_LOG").is_some() {
        init_tracing(cli.debug);
    }

    match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            1
        }
    }
}

fn init_tracing(debug: bool) {
    let default_directives = if debug { "simplifi_cli=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    let _ = fmt::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Validation order: the action listing short-circuits first, then an action
/// must be selected, then the organization id must be present. Per-action
/// requirements (campaign id, ad id, body file) are checked by the handlers
/// before any request is built.
async fn dispatch(cli: Cli) -> CliResult<()> {
    if cli.list_actions {
        println!("Available actions: {}", action_names().join(", "));
        return Ok(());
    }

    let Some(action) = cli.action else {
        return Err(CliError::validation(
            "an action is required (--action <ACTION>, or --list-actions to see them)",
        ));
    };

    let org_id = cli.org_id.clone().ok_or_else(|| {
        CliError::validation("organization ID is required (--org-id or SIMPLIFI_ORG_ID)")
    })?;

    let ctx = AppContext::from_cli(&cli, org_id)?;
    let out = OutputOptions {
        format: cli.format,
        path: cli.save_output.clone(),
    };
    let file = cli.file.as_deref();

    match action {
        Action::ListCampaigns => campaigns::handle_campaign_list(&ctx, &out).await,
        Action::CreateCampaign => campaigns::handle_campaign_create(&ctx, file, &out).await,
        Action::UpdateCampaign => {
            campaigns::handle_campaign_update(&ctx, cli.campaign_id, file, &out).await
        }
        Action::ListAds => ads::handle_ad_list(&ctx, cli.campaign_id, &out).await,
        Action::CreateAd => ads::handle_ad_create(&ctx, cli.campaign_id, file, &out).await,
        Action::UpdateAd => {
            ads::handle_ad_update(&ctx, cli.campaign_id, cli.ad_id, file, &out).await
        }
        Action::DeleteAd => ads::handle_ad_delete(&ctx, cli.campaign_id, cli.ad_id).await,
    }
}

fn action_names() -> Vec<String> {
    Action::value_variants()
        .iter()
        .filter_map(ValueEnum::to_possible_value)
        .map(|value| value.get_name().to_string())
        .collect()
}

#[derive(Parser, Debug)]
#[command(
    name = "simplifi",
    version,
    about = "CLI to interact with the Simpli.fi advertising API"
)]
pub(crate) struct Cli {
    #[arg(short = 'o', long, env = "SIMPLIFI_ORG_ID", help = "Organization ID")]
    pub(crate) org_id: Option<String>,
    #[arg(
        short = 'k',
        long,
        env = "APP_API_TOKEN",
        help = "App API key for Simpli.fi"
    )]
    pub(crate) api_key: Option<String>,
    #[arg(
        short = 'u',
        long,
        env = "USER_API_KEY",
        help = "User API key for Simpli.fi"
    )]
    pub(crate) user_key: Option<String>,
    #[arg(short = 'a', long, value_enum, help = "Action to perform")]
    pub(crate) action: Option<Action>,
    #[arg(short = 'c', long, help = "Campaign ID")]
    pub(crate) campaign_id: Option<u64>,
    #[arg(long, help = "Ad ID (required by update-ad and delete-ad)")]
    pub(crate) ad_id: Option<u64>,
    #[arg(
        short = 'f',
        long,
        help = "JSON file providing the request body for create and update actions"
    )]
    pub(crate) file: Option<PathBuf>,
    #[arg(
        short = 's',
        long,
        help = "Write the result to this path instead of stdout; the extension follows the format"
    )]
    pub(crate) save_output: Option<PathBuf>,
    #[arg(
        long,
        value_enum,
        default_value_t = OutputFormat::Json,
        help = "Select output format for rendered results"
    )]
    pub(crate) format: OutputFormat,
    #[arg(short = 'd', long, help = "Enable debug logging of API traffic")]
    pub(crate) debug: bool,
    #[arg(short = 'l', long, help = "List available actions")]
    pub(crate) list_actions: bool,
    #[arg(
        long,
        env = "SIMPLIFI_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    pub(crate) api_url: Url,
    #[arg(
        long,
        env = "SIMPLIFI_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
}

/// The closed set of operations the CLI can perform against the API.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum Action {
    ListCampaigns,
    CreateCampaign,
    UpdateCampaign,
    ListAds,
    CreateAd,
    UpdateAd,
    DeleteAd,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Csv,
}

impl OutputFormat {
    pub(crate) const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}
