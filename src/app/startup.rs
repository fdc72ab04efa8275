//! Process entry points for both binaries
//!
//! Each returns the process exit code. Configuration problems are reported
//! on stderr before logging exists; everything after that goes through the
//! logger.

use crate::app::cli::{parse_styled, Args, CollectorArgs};
use crate::app::error::AppResult;
use crate::app::settings::Settings;
use crate::app::simulation;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::shutdown::{restore_default_sigpipe, ShutdownCoordinator};
use crate::core::version::banner;
use crate::telemetry::{render, Collector, CollectorEvent, CollectorReport, OutputFormat};
use std::io::Write;
use tokio::sync::broadcast;

/// Run the simulator
pub fn startup() -> i32 {
    let mut args: Args = parse_styled(std::env::args().collect());

    if let Err(e) = args.load_config_file() {
        eprintln!("Error: {}", e);
        return 1;
    }

    if let Err(e) = init_logging(
        args.effective_log_level(),
        args.log_format.as_deref(),
        args.effective_log_file(),
        args.use_color(),
    ) {
        eprintln!("Error: Failed to initialize logging: {}", e);
        return 1;
    }

    log::info!("{}", banner("queuemon"));
    log::debug!("Arguments: {:?}", args);

    let settings = match Settings::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Resolving settings");
            return 1;
        }
    };
    log::debug!("Settings: {:?}", settings);

    match simulation::run(&settings) {
        Ok(_) => 0,
        Err(e) => {
            log_error_with_context(&e, "Running simulation");
            1
        }
    }
}

/// Run the telemetry collector until interrupted
pub async fn collector_startup() -> i32 {
    restore_default_sigpipe();

    let mut args: CollectorArgs = parse_styled(std::env::args().collect());

    if let Err(e) = args.load_config_file() {
        eprintln!("Error: {}", e);
        return 1;
    }

    if let Err(e) = init_logging(
        args.effective_log_level(),
        args.log_format.as_deref(),
        args.effective_log_file(),
        args.use_color(),
    ) {
        eprintln!("Error: Failed to initialize logging: {}", e);
        return 1;
    }

    log::info!("{}", banner("queuemon-collector"));

    let color = !args.no_color
        && (args.color || std::io::IsTerminal::is_terminal(&std::io::stdout()));

    match ShutdownCoordinator::guard(|shutdown_rx| serve(&args, color, shutdown_rx)).await {
        Ok(_) => 0,
        Err(e) => {
            log_error_with_context(&e, "Running collector");
            1
        }
    }
}

async fn serve(
    args: &CollectorArgs,
    color: bool,
    shutdown_rx: broadcast::Receiver<()>,
) -> AppResult<CollectorReport> {
    let collector = Collector::bind(&args.listen_address()).await?;
    let format = args.format;

    let report = collector
        .run(shutdown_rx, |event| print_event(event, format, color))
        .await?;
    Ok(report)
}

fn print_event(event: CollectorEvent, format: OutputFormat, color: bool) {
    match event {
        CollectorEvent::Connected { peer, consumers } => {
            log::info!("{} announced {} consumers", peer, consumers);
        }
        CollectorEvent::Frame { frame, .. } => {
            let mut out = std::io::stdout().lock();
            if let Err(e) = writeln!(out, "{}", render(&frame, format, color)) {
                log::warn!("Failed to write frame: {}", e);
            }
        }
        CollectorEvent::Closed(summary) => {
            log::debug!("Connection summary: {:?}", summary);
        }
    }
}

