//! Coordinated cancellation for the emitter loop and probe server.
//!
//! One broadcastable signal, observed cooperatively: triggering is
//! idempotent and wakes every observer. Also hosts the OS termination
//! signal wait (SIGTERM/SIGINT) the supervisor blocks on.

use tokio::sync::watch;
use tracing::info;

/// Receiving half of the cancellation signal.
///
/// Cheap to clone; every clone observes the same trigger.
#[derive(Clone)]
pub struct ShutdownSignal {
    receiver: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Waits until shutdown is triggered.
    ///
    /// A dropped controller counts as shutdown, so tasks never wait on a
    /// signal nobody can fire.
    pub async fn wait(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                break;
            }
        }
    }

    /// Whether shutdown has been triggered (non-blocking).
    pub fn is_shutdown(&self) -> bool {
        *self.receiver.borrow()
    }
}

/// Triggering half of the cancellation signal.
pub struct ShutdownController {
    sender: watch::Sender<bool>,
}

impl ShutdownController {
    /// Triggers shutdown. Idempotent; wakes all signal holders.
    pub fn shutdown(&self) {
        let _ = self.sender.send(true);
    }
}

/// Creates a cancellation signal pair: the controller triggers, cloned
/// signals are handed to each component that must observe it.
pub fn shutdown_channel() -> (ShutdownController, ShutdownSignal) {
    let (sender, receiver) = watch::channel(false);
    (ShutdownController { sender }, ShutdownSignal { receiver })
}

/// Waits for SIGTERM or SIGINT and returns the signal name.
///
/// # Panics
/// Panics if the OS refuses handler registration (resource exhaustion);
/// the process cannot shut down cleanly without them.
#[cfg(unix)]
pub async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())
        .unwrap_or_else(|e| panic!("cannot register SIGTERM handler: {e}"));
    let mut sigint = signal(SignalKind::interrupt())
        .unwrap_or_else(|e| panic!("cannot register SIGINT handler: {e}"));

    tokio::select! {
        _ = sigterm.recv() => {
            info!("received SIGTERM");
            "SIGTERM"
        }
        _ = sigint.recv() => {
            info!("received SIGINT");
            "SIGINT"
        }
    }
}

/// Waits for Ctrl+C (non-unix platforms).
///
/// # Panics
/// Panics if the Ctrl+C handler cannot be registered.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        panic!("cannot wait for Ctrl+C: {e}");
    }
    info!("received Ctrl+C");
    "CTRL_C"
}

#[cfg(test)]
#[path = "shutdown_test.rs"]
mod shutdown_tests;
