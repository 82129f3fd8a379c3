use quotewatch_core::{MarketDataClient, Symbol};

use crate::cli::SymbolArgs;
use crate::error::CliError;
use crate::output;

use super::RenderOptions;

pub async fn run(
    args: &SymbolArgs,
    market: &MarketDataClient,
    render: RenderOptions,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let quote = market.quote(&symbol).await?;
    output::render(&quote, render.format, render.pretty)
}
