//! Dashboard state and its transitions.
//!
//! Views read [`DashboardState`] snapshots or subscribe to changes; only the
//! controller dispatches [`Action`]s.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::{
    BalanceSheetPeriod, HistoricalBar, IncomeStatementPeriod, Quote, Symbol, SymbolDetails,
};

/// Everything a view needs to render the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    /// Watch-list in insertion order; a refreshed symbol moves to the end.
    pub quotes: Vec<Quote>,
    pub selected: Option<Symbol>,
    /// Newest first, as delivered.
    pub history: Vec<HistoricalBar>,
    pub balance_sheet: Vec<BalanceSheetPeriod>,
    pub income_statement: Vec<IncomeStatementPeriod>,
    pub error: Option<String>,
    #[serde(rename = "loading", serialize_with = "serialize_loading")]
    in_flight: usize,
}

fn serialize_loading<S>(in_flight: &usize, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_bool(*in_flight > 0)
}

/// State transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchStarted,
    FetchFinished,
    QuoteLoaded(Quote),
    /// Replace-only: ignored once the symbol has left the watch-list.
    QuoteRefreshed(Quote),
    RefreshFailed { symbol: Symbol, message: String },
    Select(Symbol),
    DetailsLoaded { symbol: Symbol, details: SymbolDetails },
    DetailsFailed { symbol: Symbol, message: String },
    Failed(String),
    ClearError,
    Remove(Symbol),
}

impl DashboardState {
    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn quote(&self, symbol: &Symbol) -> Option<&Quote> {
        self.quotes.iter().find(|quote| &quote.symbol == symbol)
    }

    pub fn symbols(&self) -> Vec<Symbol> {
        self.quotes.iter().map(|quote| quote.symbol.clone()).collect()
    }

    pub fn is_selected(&self, symbol: &Symbol) -> bool {
        self.selected.as_ref() == Some(symbol)
    }

    /// Apply one transition. Returns whether anything changed.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::FetchStarted => {
                self.in_flight += 1;
                true
            }
            Action::FetchFinished => {
                let before = self.in_flight;
                self.in_flight = self.in_flight.saturating_sub(1);
                before != self.in_flight
            }
            Action::QuoteLoaded(quote) => {
                self.quotes.retain(|existing| existing.symbol != quote.symbol);
                self.quotes.push(quote);
                true
            }
            Action::QuoteRefreshed(quote) => {
                if self.quote(&quote.symbol).is_none() {
                    return false;
                }
                self.apply(Action::QuoteLoaded(quote))
            }
            Action::RefreshFailed { symbol, message } => {
                if self.quote(&symbol).is_none() {
                    return false;
                }
                self.error = Some(message);
                true
            }
            Action::Select(symbol) => {
                self.selected = Some(symbol);
                self.error = None;
                self.clear_details();
                true
            }
            Action::DetailsLoaded { symbol, details } => {
                if !self.is_selected(&symbol) {
                    return false;
                }
                self.history = details.history.into_bars();
                self.balance_sheet = details.balance_sheet;
                self.income_statement = details.income_statement;
                true
            }
            Action::DetailsFailed { symbol, message } => {
                if !self.is_selected(&symbol) {
                    return false;
                }
                self.error = Some(message);
                true
            }
            Action::Failed(message) => {
                self.error = Some(message);
                true
            }
            Action::ClearError => self.error.take().is_some(),
            Action::Remove(symbol) => {
                let before = self.quotes.len();
                self.quotes.retain(|quote| quote.symbol != symbol);
                let mut changed = before != self.quotes.len();
                if self.is_selected(&symbol) {
                    self.selected = None;
                    self.clear_details();
                    changed = true;
                }
                changed
            }
        }
    }

    fn clear_details(&mut self) {
        self.history.clear();
        self.balance_sheet.clear();
        self.income_statement.clear();
    }
}

/// Shared state container backed by a `watch` channel.
#[derive(Clone)]
pub struct Store {
    sender: Arc<watch::Sender<DashboardState>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DashboardState::default());
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Apply `action`; subscribers are notified only if the state changed.
    pub fn dispatch(&self, action: Action) -> bool {
        self.sender.send_if_modified(|state| state.apply(action))
    }

    /// Select `symbol` only when nothing is selected yet.
    pub fn select_if_unset(&self, symbol: &Symbol) -> bool {
        self.sender.send_if_modified(|state| {
            state.selected.is_none() && state.apply(Action::Select(symbol.clone()))
        })
    }

    pub fn snapshot(&self) -> DashboardState {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HistorySeries;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    fn quote(raw: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol(raw),
            price,
            volume: 0,
            change: 0.0,
            change_percent: 0.0,
            implied_volatility: None,
        }
    }

    fn details(raw: &str) -> SymbolDetails {
        SymbolDetails {
            history: HistorySeries::new(symbol(raw), Vec::new()),
            balance_sheet: Vec::new(),
            income_statement: Vec::new(),
        }
    }

    #[test]
    fn refreshed_quote_replaces_and_moves_to_end() {
        let mut state = DashboardState::default();
        state.apply(Action::QuoteLoaded(quote("TSLA", 1.0)));
        state.apply(Action::QuoteLoaded(quote("GME", 2.0)));
        state.apply(Action::QuoteLoaded(quote("TSLA", 3.0)));

        let symbols = state.symbols();
        assert_eq!(symbols, vec![symbol("GME"), symbol("TSLA")]);
        assert_eq!(state.quote(&symbol("TSLA")).map(|q| q.price), Some(3.0));
    }

    #[test]
    fn refresh_results_never_re_add_a_removed_symbol() {
        let mut state = DashboardState::default();
        state.apply(Action::QuoteLoaded(quote("TSLA", 1.0)));
        state.apply(Action::QuoteLoaded(quote("GME", 2.0)));
        state.apply(Action::Remove(symbol("GME")));

        assert!(!state.apply(Action::QuoteRefreshed(quote("GME", 5.0))));
        assert!(!state.apply(Action::RefreshFailed {
            symbol: symbol("GME"),
            message: String::from("Failed to fetch data for GME: late"),
        }));
        assert_eq!(state.symbols(), vec![symbol("TSLA")]);
        assert!(state.error.is_none());

        assert!(state.apply(Action::QuoteRefreshed(quote("TSLA", 4.0))));
        assert_eq!(state.quote(&symbol("TSLA")).map(|q| q.price), Some(4.0));
    }

    #[test]
    fn loading_tracks_overlapping_fetches() {
        let mut state = DashboardState::default();
        state.apply(Action::FetchStarted);
        state.apply(Action::FetchStarted);
        state.apply(Action::FetchFinished);
        assert!(state.loading());

        state.apply(Action::FetchFinished);
        assert!(!state.loading());
        assert!(!state.apply(Action::FetchFinished));
    }

    #[test]
    fn selecting_clears_error_and_previous_details() {
        let mut state = DashboardState::default();
        state.apply(Action::Select(symbol("AAPL")));
        state.apply(Action::DetailsLoaded {
            symbol: symbol("AAPL"),
            details: SymbolDetails {
                history: HistorySeries::new(
                    symbol("AAPL"),
                    vec![HistoricalBar {
                        date: crate::CalendarDate::parse("2024-01-02").expect("date"),
                        open: 1.0,
                        high: 1.0,
                        low: 1.0,
                        close: 1.0,
                        volume: 1,
                    }],
                ),
                balance_sheet: Vec::new(),
                income_statement: Vec::new(),
            },
        });
        state.apply(Action::Failed(String::from("boom")));
        assert_eq!(state.history.len(), 1);

        state.apply(Action::Select(symbol("INTC")));
        assert!(state.error.is_none());
        assert!(state.history.is_empty());
    }

    #[test]
    fn stale_details_are_discarded() {
        let mut state = DashboardState::default();
        state.apply(Action::Select(symbol("INTC")));

        assert!(!state.apply(Action::DetailsLoaded {
            symbol: symbol("AAPL"),
            details: details("AAPL"),
        }));
        assert!(!state.apply(Action::DetailsFailed {
            symbol: symbol("AAPL"),
            message: String::from("late failure"),
        }));
        assert!(state.error.is_none());
    }

    #[test]
    fn removing_selected_symbol_clears_selection() {
        let mut state = DashboardState::default();
        state.apply(Action::QuoteLoaded(quote("GME", 1.0)));
        state.apply(Action::Select(symbol("GME")));

        assert!(state.apply(Action::Remove(symbol("GME"))));
        assert!(state.quotes.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn store_selects_only_when_unset() {
        let store = Store::new();

        assert!(store.select_if_unset(&symbol("TSLA")));
        assert!(!store.select_if_unset(&symbol("GME")));
        assert_eq!(store.snapshot().selected, Some(symbol("TSLA")));
    }

    #[tokio::test]
    async fn subscribers_see_dispatched_changes() {
        let store = Store::new();
        let mut receiver = store.subscribe();

        store.dispatch(Action::Failed(String::from("rate limited")));
        receiver.changed().await.expect("sender alive");
        assert_eq!(
            receiver.borrow_and_update().error.as_deref(),
            Some("rate limited")
        );

        assert!(!store.dispatch(Action::Remove(symbol("NONE"))));
        assert!(!receiver.has_changed().expect("sender alive"));
    }

    #[test]
    fn serialized_state_exposes_loading_flag() {
        let mut state = DashboardState::default();
        state.apply(Action::FetchStarted);

        let json = serde_json::to_value(&state).expect("serializable");
        assert_eq!(json["loading"], serde_json::json!(true));
        assert_eq!(json["error"], serde_json::Value::Null);
    }
}
