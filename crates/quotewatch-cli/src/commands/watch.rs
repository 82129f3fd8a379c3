use std::sync::Arc;
use std::time::Duration;

use quotewatch_core::{Config, DashboardState, HttpClient, PollingController, Symbol};
use tracing::info;

use crate::cli::WatchArgs;
use crate::error::CliError;
use crate::output;

use super::RenderOptions;

/// Run the polling controller until Ctrl-C, rendering each settled state.
pub async fn run(
    args: &WatchArgs,
    config: Config,
    http: Arc<dyn HttpClient>,
    render: RenderOptions,
) -> Result<(), CliError> {
    let config = apply_args(config, args)?;
    let controller = config.controller(http);
    let mut updates = controller.store().subscribe();

    controller.start();

    let interrupt = tokio::signal::ctrl_c();
    tokio::pin!(interrupt);
    let mut last_rendered: Option<DashboardState> = None;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                if should_render(&state, last_rendered.as_ref()) {
                    output::render(&state, render.format, render.pretty)?;
                    last_rendered = Some(state);
                }
            }
            signal = &mut interrupt => {
                signal?;
                info!("interrupt received; stopping");
                break;
            }
        }
    }

    shutdown(&controller);
    Ok(())
}

fn apply_args(mut config: Config, args: &WatchArgs) -> Result<Config, CliError> {
    if !args.symbols.is_empty() {
        config.controller.default_symbols = Symbol::parse_all(&args.symbols)?;
    }
    if let Some(seconds) = args.refresh_secs {
        config.controller.refresh_interval = Duration::from_secs(seconds);
    }
    Ok(config)
}

/// Settled and different from what is already on screen.
fn should_render(state: &DashboardState, last: Option<&DashboardState>) -> bool {
    !state.loading() && last != Some(state)
}

fn shutdown(controller: &PollingController) {
    controller.shutdown();
    info!(tracked = controller.snapshot().quotes.len(), "watch stopped");
}
