use quotewatch_core::{MarketDataClient, Symbol};

use crate::cli::SymbolArgs;
use crate::error::CliError;
use crate::output::{self, StatementView};

use super::RenderOptions;

pub async fn run_balance_sheet(
    args: &SymbolArgs,
    market: &MarketDataClient,
    render: RenderOptions,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let annual_reports = market.balance_sheet(&symbol).await?;

    let view = StatementView {
        symbol,
        annual_reports,
    };
    output::render(&view, render.format, render.pretty)
}

pub async fn run_income_statement(
    args: &SymbolArgs,
    market: &MarketDataClient,
    render: RenderOptions,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let annual_reports = market.income_statement(&symbol).await?;

    let view = StatementView {
        symbol,
        annual_reports,
    };
    output::render(&view, render.format, render.pretty)
}
