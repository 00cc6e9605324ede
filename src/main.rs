use clap::Parser;
use loggen::config::Config;
use loggen::generator::Emitter;
use loggen::server::ProbeServer;
use loggen::shutdown::{shutdown_channel, wait_for_signal};
use std::time::Duration;
use tracing::{error, info};

/// Bounded window for the probe server's connection drain.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::parse();

    // Production JSON logs; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logger: {e}"))?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        max_number = cfg.max_number,
        num_strings = cfg.num_strings,
        sleep_duration = ?cfg.sleep_duration,
        health_port = cfg.health_port,
        "loggen starting"
    );

    // One cancellation signal for every component
    let (shutdown_controller, shutdown_signal) = shutdown_channel();

    // Probe server task
    let probe = ProbeServer::new(cfg.health_port);
    let server = probe.clone();
    let server_cancel = shutdown_signal.clone();
    let mut server_handle = tokio::spawn(async move { server.start(server_cancel).await });

    // Emission loop task
    let mut emitter = Emitter::new(cfg);
    let emitter_cancel = shutdown_signal.clone();
    let emitter_handle = tokio::spawn(async move { emitter.run(emitter_cancel).await });

    // Block until an OS signal arrives or the probe server dies; a
    // bind/serve failure is fatal and takes the same shutdown path.
    tokio::select! {
        signal = wait_for_signal() => {
            info!(signal = signal, "initiating graceful shutdown");
        }
        result = &mut server_handle => {
            match result {
                Ok(Err(e)) => error!(error = %e, "probe server failed"),
                Ok(Ok(())) => info!("probe server exited"),
                Err(e) => error!(error = %e, "probe server task panicked"),
            }
        }
    }

    shutdown_controller.shutdown();

    // Drain probe connections; a timeout is logged, never escalated
    if let Err(e) = probe.shutdown(SHUTDOWN_TIMEOUT).await {
        error!(error = %e, "probe server shutdown failed");
    }

    // The loop exits within one tick period of the signal
    let _ = emitter_handle.await;

    info!("loggen stopped");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
