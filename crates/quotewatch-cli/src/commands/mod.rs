mod history;
mod quote;
mod statements;
mod watch;

use std::sync::Arc;

use quotewatch_core::{Config, HttpClient, ReqwestHttpClient};
use tracing::debug;

use crate::cli::{Cli, Command, OutputFormat};
use crate::error::CliError;

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub pretty: bool,
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = resolve_config(Config::from_env()?, cli);
    debug!(?config, "configuration resolved");

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new());
    let render = RenderOptions {
        format: cli.format,
        pretty: cli.pretty,
    };

    match &cli.command {
        Command::Quote(args) => quote::run(args, &config.market_client(http), render).await,
        Command::History(args) => history::run(args, &config.market_client(http), render).await,
        Command::BalanceSheet(args) => {
            statements::run_balance_sheet(args, &config.market_client(http), render).await
        }
        Command::IncomeStatement(args) => {
            statements::run_income_statement(args, &config.market_client(http), render).await
        }
        Command::Watch(args) => watch::run(args, config, http, render).await,
    }
}

/// Flags win over environment, environment over defaults.
fn resolve_config(mut config: Config, cli: &Cli) -> Config {
    if let Some(timeout_ms) = cli.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    config
}
