use quotewatch_core::{MarketDataClient, Symbol};

use crate::cli::HistoryArgs;
use crate::error::CliError;
use crate::output::{self, HistoryView};

use super::RenderOptions;

pub async fn run(
    args: &HistoryArgs,
    market: &MarketDataClient,
    render: RenderOptions,
) -> Result<(), CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = market.history(&symbol).await?;

    let bars = if args.chronological {
        series.chronological()
    } else {
        series.into_bars()
    };

    output::render(&HistoryView { symbol, bars }, render.format, render.pretty)
}
