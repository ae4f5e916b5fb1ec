//! Ticker Client: a console front end for the ticker state controller.
//!
//! It polls a ticker source (the Bitfinex public API by default, or a local
//! random-walk simulation), follows network reachability with a TCP probe, and
//! renders every published snapshot to the console. Search, sort, selection and
//! refresh are driven by commands typed on stdin (see `command`).
//!
//! Usage example (CLI):
//! ```bash
//! ticker_client --query coin --sort price-asc
//! ticker_client --source simulated --interval-ms 1000 --json
//! ```
#![warn(missing_docs)]
mod args;
mod command;
mod presenter;
mod probe;
mod simulator;
mod source;

use crate::args::{Args, SourceKind};
use crate::command::{ConsoleCommand, USAGE, spawn_stdin_reader};
use crate::presenter::ConsolePresenter;
use crate::probe::{ProbeMonitor, always_available};
use crate::simulator::SimulatedSource;
use crate::source::BitfinexSource;
use clap::Parser;
use crossbeam_channel::{Receiver, never, select};
use log::{error, info, warn};
use std::sync::Arc;
use std::time::Duration;
use ticker_common::{ConnectivityStatus, Result, TickerError};
use ticker_core::{
    CancellationToken, ConnectivityMonitor, ControllerConfig, TickerSource,
    TickerStateController,
};

/// Delay of a simulated fetch.
const SIMULATED_LATENCY_MS: u64 = 150;

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            shutdown.cancel();
        })
        .map_err(|e| TickerError::Format(format!("Error setting Ctrl+C handler: {}", e)))?;
    }

    let (source, statuses) = build_source(&args, &shutdown)?;
    let config =
        ControllerConfig::default().with_poll_interval(Duration::from_millis(args.interval_ms));
    let mut controller = TickerStateController::new(source, statuses, config)?;
    controller.set_search_query(args.query.trim());
    controller.set_sort_option(args.sort);

    info!(
        "Client is running ({} source). Type 'help' for commands, Ctrl+C to exit.",
        args.source
    );
    let result = run(&controller, &ConsolePresenter::new(args.json), &shutdown);

    controller.shutdown();
    shutdown.cancel();
    info!("Client stopped");
    result
}

/// Picks the ticker source and the connectivity statuses that gate it.
fn build_source(
    args: &Args,
    shutdown: &CancellationToken,
) -> Result<(Arc<dyn TickerSource>, Receiver<ConnectivityStatus>)> {
    match args.source {
        SourceKind::Bitfinex => {
            let source = BitfinexSource::new(Duration::from_secs(args.timeout_secs))?;
            info!("Polling {}", source.url());
            let monitor = ProbeMonitor::new(
                &args.probe_host,
                args.probe_port,
                Duration::from_millis(args.probe_interval_ms),
                args.lost_after,
                shutdown.clone(),
            );
            let source: Arc<dyn TickerSource> = Arc::new(source);
            Ok((source, monitor.into_statuses()))
        }
        SourceKind::Simulated => {
            let source: Arc<dyn TickerSource> = Arc::new(SimulatedSource::new(
                Duration::from_millis(SIMULATED_LATENCY_MS),
            ));
            Ok((source, always_available()))
        }
    }
}

/// Renders snapshots and events and applies console commands until shutdown.
fn run(
    controller: &TickerStateController,
    presenter: &ConsolePresenter,
    shutdown: &CancellationToken,
) -> Result<()> {
    let snapshots = controller.subscribe();
    let events = controller.events();
    let mut commands = spawn_stdin_reader()?;
    let cancelled = shutdown.cancelled();

    loop {
        // Console input may end long before the client does.
        let command_rx = commands.clone();
        select! {
            recv(cancelled) -> _ => break,
            recv(snapshots) -> msg => match msg {
                Ok(state) => presenter.render(&state)?,
                Err(_) => {
                    warn!("Snapshot stream closed");
                    break;
                }
            },
            recv(events) -> msg => match msg {
                Ok(event) => presenter.on_event(&event)?,
                Err(_) => break,
            },
            recv(command_rx) -> msg => match msg {
                Ok(ConsoleCommand::Quit) => break,
                Ok(command) => apply(command, controller),
                Err(_) => commands = never(),
            },
        }
    }
    Ok(())
}

fn apply(command: ConsoleCommand, controller: &TickerStateController) {
    match command {
        ConsoleCommand::Search(query) => controller.set_search_query(query),
        ConsoleCommand::Sort(sort) => controller.set_sort_option(sort),
        ConsoleCommand::Refresh => {
            if let Err(e) = controller.refresh() {
                error!("Refresh failed: {}", e);
            }
        }
        ConsoleCommand::Select(symbol) => {
            let state = controller.current_state();
            match state
                .filtered_tickers()
                .iter()
                .find(|t| t.symbol().eq_ignore_ascii_case(&symbol))
            {
                Some(ticker) => controller.on_ticker_selected(ticker.clone()),
                None => warn!("No visible ticker '{}'", symbol),
            }
        }
        ConsoleCommand::Help => {
            for line in USAGE {
                info!("{}", line);
            }
        }
        ConsoleCommand::Quit => {}
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
