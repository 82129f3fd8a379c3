use std::io::{self, Write};

use quotewatch_core::display::{
    format_currency, format_eps, format_implied_volatility, format_percent, format_price,
    format_volume,
};
use quotewatch_core::{
    BalanceSheetPeriod, CalendarDate, DashboardState, HistoricalBar, IncomeStatementPeriod, Quote,
    Symbol,
};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Plain-text rendering for `--format table`.
pub trait TableView {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()>;
}

pub fn render<T>(value: &T, format: OutputFormat, pretty: bool) -> Result<(), CliError>
where
    T: Serialize + TableView,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(value)?
            } else {
                serde_json::to_string(value)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => value.write_table(&mut out)?,
    }

    out.flush()?;
    Ok(())
}

/// Daily bars in the order the user asked for.
#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub symbol: Symbol,
    pub bars: Vec<HistoricalBar>,
}

/// Annual reports for one symbol.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementView<T> {
    pub symbol: Symbol,
    pub annual_reports: Vec<T>,
}

impl TableView for Quote {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        write_quote_header(out)?;
        write_quote_row(out, self, false)
    }
}

impl TableView for HistoryView {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} daily history ({} bars)", self.symbol, self.bars.len())?;
        write_bars(out, &self.bars)
    }
}

impl TableView for StatementView<BalanceSheetPeriod> {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} balance sheet", self.symbol)?;
        write_balance_sheet(out, &self.annual_reports)
    }
}

impl TableView for StatementView<IncomeStatementPeriod> {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "{} income statement", self.symbol)?;
        write_income_statement(out, &self.annual_reports)
    }
}

impl TableView for DashboardState {
    fn write_table(&self, out: &mut dyn Write) -> io::Result<()> {
        if let Some(error) = &self.error {
            writeln!(out, "! {error}")?;
        }

        write_quote_header(out)?;
        for quote in &self.quotes {
            write_quote_row(out, quote, self.is_selected(&quote.symbol))?;
        }

        let Some(selected) = &self.selected else {
            return Ok(());
        };

        if !self.history.is_empty() {
            writeln!(out)?;
            writeln!(out, "{selected} daily history")?;
            write_bars(out, &self.history)?;
        }
        if !self.balance_sheet.is_empty() {
            writeln!(out)?;
            writeln!(out, "{selected} balance sheet")?;
            write_balance_sheet(out, &self.balance_sheet)?;
        }
        if !self.income_statement.is_empty() {
            writeln!(out)?;
            writeln!(out, "{selected} income statement")?;
            write_income_statement(out, &self.income_statement)?;
        }
        writeln!(out)
    }
}

fn write_quote_header(out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "  {:<8} {:>12} {:>10} {:>9} {:>15} {:>8}",
        "SYMBOL", "PRICE", "CHANGE", "CHANGE%", "VOLUME", "IV"
    )
}

fn write_quote_row(out: &mut dyn Write, quote: &Quote, selected: bool) -> io::Result<()> {
    writeln!(
        out,
        "{} {:<8} {:>12} {:>10.2} {:>9} {:>15} {:>8}",
        if selected { '>' } else { ' ' },
        quote.symbol.as_str(),
        format_price(quote.price),
        quote.change,
        format_percent(quote.change_percent),
        format_volume(quote.volume),
        format_implied_volatility(quote.implied_volatility),
    )
}

fn write_bars(out: &mut dyn Write, bars: &[HistoricalBar]) -> io::Result<()> {
    writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>15}",
        "DATE", "OPEN", "HIGH", "LOW", "CLOSE", "VOLUME"
    )?;
    for bar in bars {
        writeln!(
            out,
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>15}",
            bar.date.to_string(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            format_volume(bar.volume),
        )?;
    }
    Ok(())
}

type Metric<'a> = (&'a str, Vec<String>);

fn metric_row<T>(periods: &[T], value: fn(&T) -> &str, format: fn(&str) -> String) -> Vec<String> {
    periods.iter().map(|period| format(value(period))).collect()
}

fn write_balance_sheet(out: &mut dyn Write, periods: &[BalanceSheetPeriod]) -> io::Result<()> {
    let metrics: Vec<Metric<'_>> = vec![
        ("Total Assets", metric_row(periods, |p| p.total_assets.as_str(), format_currency)),
        (
            "Current Assets",
            metric_row(periods, |p| p.total_current_assets.as_str(), format_currency),
        ),
        (
            "Cash & Equivalents",
            metric_row(periods, |p| p.cash_and_cash_equivalents.as_str(), format_currency),
        ),
        (
            "Total Liabilities",
            metric_row(periods, |p| p.total_liabilities.as_str(), format_currency),
        ),
        (
            "Current Liabilities",
            metric_row(periods, |p| p.total_current_liabilities.as_str(), format_currency),
        ),
        ("Long-Term Debt", metric_row(periods, |p| p.long_term_debt.as_str(), format_currency)),
        (
            "Shareholder Equity",
            metric_row(periods, |p| p.total_shareholder_equity.as_str(), format_currency),
        ),
    ];
    let dates = periods
        .iter()
        .map(|period| period.fiscal_date_ending)
        .collect::<Vec<_>>();
    write_statement(out, &dates, &metrics)
}

fn write_income_statement(
    out: &mut dyn Write,
    periods: &[IncomeStatementPeriod],
) -> io::Result<()> {
    let metrics: Vec<Metric<'_>> = vec![
        ("Revenue", metric_row(periods, |p| p.total_revenue.as_str(), format_currency)),
        ("Gross Profit", metric_row(periods, |p| p.gross_profit.as_str(), format_currency)),
        (
            "Operating Income",
            metric_row(periods, |p| p.operating_income.as_str(), format_currency),
        ),
        ("Net Income", metric_row(periods, |p| p.net_income.as_str(), format_currency)),
        ("EBITDA", metric_row(periods, |p| p.ebitda.as_str(), format_currency)),
        ("EPS", metric_row(periods, |p| p.eps.as_str(), format_eps)),
    ];
    let dates = periods
        .iter()
        .map(|period| period.fiscal_date_ending)
        .collect::<Vec<_>>();
    write_statement(out, &dates, &metrics)
}

/// Metrics as rows, fiscal periods as columns.
fn write_statement(
    out: &mut dyn Write,
    dates: &[CalendarDate],
    metrics: &[Metric<'_>],
) -> io::Result<()> {
    write!(out, "{:<20}", "")?;
    for date in dates {
        write!(out, " {:>12}", date.to_string())?;
    }
    writeln!(out)?;

    for (label, values) in metrics {
        write!(out, "{label:<20}")?;
        for value in values {
            write!(out, " {value:>12}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
