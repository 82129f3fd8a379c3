//! Polling controller: keeps the watch-list fresh and loads details for the
//! selected symbol.
//!
//! | Phase | Behaviour |
//! |-------|-----------|
//! | Initial load | Default symbols one at a time, paced by a [`Pacer`] |
//! | Refresh | Every tracked quote re-fetched in parallel on a fixed interval |
//! | Selection | History + both statements fetched concurrently |
//! | Retry | Error cleared first, then the initial load runs again |
//!
//! Errors are caught per symbol and written to the dashboard state; the last
//! one wins.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::market::MarketDataClient;
use crate::pacing::{Pacer, PacingMode};
use crate::state::{Action, DashboardState, Store};
use crate::{FetchError, Quote, Symbol};

pub const DEFAULT_SYMBOLS: [&str; 4] = ["TSLA", "GME", "INTC", "AAPL"];
pub const DEFAULT_INITIAL_LOAD_SPACING: Duration = Duration::from_millis(1_000);
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(60_000);

/// Controller timings and the symbols loaded on start.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerSettings {
    pub default_symbols: Vec<Symbol>,
    pub initial_load_spacing: Duration,
    pub pacing: PacingMode,
    pub refresh_interval: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            default_symbols: default_symbols(),
            initial_load_spacing: DEFAULT_INITIAL_LOAD_SPACING,
            pacing: PacingMode::default(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

pub fn default_symbols() -> Vec<Symbol> {
    DEFAULT_SYMBOLS
        .iter()
        .filter_map(|raw| Symbol::parse(raw).ok())
        .collect()
}

/// Owned background task, aborted on [`stop`](Self::stop) or drop.
#[derive(Debug)]
pub struct TaskHandle {
    handle: JoinHandle<()>,
}

impl TaskHandle {
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
        }
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives fetches and publishes results through a [`Store`].
pub struct PollingController {
    shared: Arc<Shared>,
    background: Mutex<Vec<TaskHandle>>,
}

struct Shared {
    market: MarketDataClient,
    store: Store,
    pacer: Arc<dyn Pacer>,
    settings: ControllerSettings,
    selection: Mutex<Option<TaskHandle>>,
}

/// Marks one fetch in flight for the lifetime of the guard, including when
/// the owning task is aborted.
struct InFlight<'a> {
    store: &'a Store,
}

impl<'a> InFlight<'a> {
    fn begin(store: &'a Store) -> Self {
        store.dispatch(Action::FetchStarted);
        Self { store }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.store.dispatch(Action::FetchFinished);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PollingController {
    /// Controller pacing the initial load as `settings.pacing` selects.
    pub fn new(market: MarketDataClient, settings: ControllerSettings) -> Self {
        let pacer = settings.pacing.pacer(settings.initial_load_spacing);
        Self::with_pacer(market, settings, pacer)
    }

    pub fn with_pacer(
        market: MarketDataClient,
        settings: ControllerSettings,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                market,
                store: Store::new(),
                pacer,
                settings,
                selection: Mutex::new(None),
            }),
            background: Mutex::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &Store {
        &self.shared.store
    }

    pub fn snapshot(&self) -> DashboardState {
        self.shared.store.snapshot()
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.shared.settings
    }

    /// Spawn the initial load and the periodic refresh.
    ///
    /// Calling `start` on a running controller restarts both tasks.
    pub fn start(&self) {
        let mut background = lock(&self.background);
        for task in background.drain(..) {
            task.stop();
        }

        let shared = Arc::clone(&self.shared);
        background.push(TaskHandle::spawn(async move {
            shared.load_defaults().await;
        }));

        let shared = Arc::clone(&self.shared);
        background.push(TaskHandle::spawn(async move {
            shared.run_refresh().await;
        }));
        info!(
            symbols = self.shared.settings.default_symbols.len(),
            refresh_ms = self.shared.settings.refresh_interval.as_millis() as u64,
            "polling controller started"
        );
    }

    pub fn is_running(&self) -> bool {
        lock(&self.background).iter().any(|task| !task.is_finished())
    }

    /// Stop the refresh timer, the initial load, and any detail fetch.
    pub fn shutdown(&self) {
        let mut background = lock(&self.background);
        for task in background.drain(..) {
            task.stop();
        }
        if let Some(task) = lock(&self.shared.selection).take() {
            task.stop();
        }
        debug!("polling controller stopped");
    }

    /// Fetch the default symbols sequentially, pacing between them.
    ///
    /// Spacing is measured between request starts, so a symbol slower than
    /// the interval is followed by the next one without further waiting.
    pub async fn load_defaults(&self) {
        self.shared.load_defaults().await;
    }

    /// Fetch one quote and insert or replace it in the watch-list.
    ///
    /// The first symbol that loads becomes the selection if none is set.
    pub async fn add_symbol(&self, symbol: Symbol) -> Result<Quote, FetchError> {
        self.shared.add_symbol(symbol).await
    }

    /// Re-fetch every tracked quote in parallel. Results for symbols removed
    /// meanwhile are dropped.
    pub async fn refresh_all(&self) {
        self.shared.refresh_all().await;
    }

    /// Make `symbol` the selection and fetch its details in the background,
    /// aborting any detail fetch for the previous selection.
    pub fn select(&self, symbol: Symbol) {
        self.shared.select(symbol);
    }

    pub fn remove_symbol(&self, symbol: &Symbol) {
        if self.shared.store.snapshot().is_selected(symbol) {
            if let Some(task) = lock(&self.shared.selection).take() {
                task.stop();
            }
        }
        self.shared.store.dispatch(Action::Remove(symbol.clone()));
    }

    /// Clear the error banner, then re-run the default-list load.
    pub async fn retry(&self) {
        self.shared.store.dispatch(Action::ClearError);
        self.shared.load_defaults().await;
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Shared {
    async fn load_defaults(self: &Arc<Self>) {
        info!(symbols = self.settings.default_symbols.len(), "loading default symbols");
        for symbol in self.settings.default_symbols.clone() {
            self.pacer.ready().await;
            // Failures are already recorded in the store.
            let _ = self.add_symbol(symbol).await;
        }
    }

    async fn add_symbol(self: &Arc<Self>, symbol: Symbol) -> Result<Quote, FetchError> {
        let _in_flight = InFlight::begin(&self.store);

        match self.market.quote(&symbol).await {
            Ok(quote) => {
                self.store.dispatch(Action::QuoteLoaded(quote.clone()));
                if self.store.select_if_unset(&symbol) {
                    self.spawn_details(symbol);
                }
                Ok(quote)
            }
            Err(error) => {
                warn!(%symbol, code = error.code(), "quote fetch failed: {error}");
                self.store.dispatch(Action::Failed(format!(
                    "Failed to fetch data for {symbol}: {error}"
                )));
                Err(error)
            }
        }
    }

    async fn refresh_all(self: &Arc<Self>) {
        let symbols = self.store.snapshot().symbols();
        debug!(count = symbols.len(), "refreshing quotes");

        let mut tasks = JoinSet::new();
        for symbol in symbols {
            let shared = Arc::clone(self);
            tasks.spawn(async move {
                shared.refresh_symbol(symbol).await;
            });
        }
        while tasks.join_next().await.is_some() {}
    }

    /// Like `add_symbol`, but a symbol removed while its fetch was in flight
    /// stays removed.
    async fn refresh_symbol(&self, symbol: Symbol) {
        let _in_flight = InFlight::begin(&self.store);

        match self.market.quote(&symbol).await {
            Ok(quote) => {
                if !self.store.dispatch(Action::QuoteRefreshed(quote)) {
                    debug!(%symbol, "dropping refresh for untracked symbol");
                }
            }
            Err(error) => {
                warn!(%symbol, code = error.code(), "quote refresh failed: {error}");
                let message = format!("Failed to fetch data for {symbol}: {error}");
                self.store.dispatch(Action::RefreshFailed { symbol, message });
            }
        }
    }

    async fn run_refresh(self: Arc<Self>) {
        let period = self.settings.refresh_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.refresh_all().await;
        }
    }

    fn select(self: &Arc<Self>, symbol: Symbol) {
        self.store.dispatch(Action::Select(symbol.clone()));
        self.spawn_details(symbol);
    }

    fn spawn_details(self: &Arc<Self>, symbol: Symbol) {
        let shared = Arc::clone(self);
        let task = TaskHandle::spawn(async move {
            shared.load_details(symbol).await;
        });

        if let Some(previous) = lock(&self.selection).replace(task) {
            previous.stop();
        }
    }

    async fn load_details(&self, symbol: Symbol) {
        let _in_flight = InFlight::begin(&self.store);

        match self.market.details(&symbol).await {
            Ok(details) => {
                debug!(%symbol, bars = details.history.len(), "details loaded");
                self.store.dispatch(Action::DetailsLoaded { symbol, details });
            }
            Err(error) => {
                warn!(%symbol, code = error.code(), "detail fetch failed: {error}");
                let message = format!("Failed to fetch detailed data for {symbol}: {error}");
                self.store.dispatch(Action::DetailsFailed { symbol, message });
            }
        }
    }
}
