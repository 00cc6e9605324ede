//! Liveness and readiness probe endpoints.

use crate::shutdown::{shutdown_channel, ShutdownController, ShutdownSignal};
use axum::{extract::State, http::StatusCode, routing::get, Router};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

/// Readiness flag shared between the supervisor and request handlers.
///
/// Defaults to ready. The supervisor flips it off at the start of
/// shutdown so orchestrators stop routing traffic before the listener
/// closes. Reads and writes are atomic but unordered relative to request
/// handling; a probe racing a toggle may see either value.
#[derive(Debug, Clone)]
pub struct ReadinessState {
    ready: Arc<AtomicBool>,
}

impl ReadinessState {
    /// Creates a readiness state (initially ready).
    pub fn new() -> Self {
        Self {
            ready: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Marks the process ready to receive traffic.
    pub fn set_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    /// Marks the process not ready; the readiness probe returns 503.
    pub fn set_not_ready(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    /// Current readiness.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

impl Default for ReadinessState {
    fn default() -> Self {
        Self::new()
    }
}

/// Connection drain did not finish within the shutdown window.
#[derive(Debug, Error)]
#[error("probe server drain timed out after {0:?}")]
pub struct DrainTimeout(pub Duration);

/// Liveness probe handler. If this responds at all, the process is alive.
async fn health() -> &'static str {
    "ok"
}

/// Readiness probe handler: 200 when ready, 503 otherwise.
async fn ready(State(state): State<ReadinessState>) -> (StatusCode, &'static str) {
    if state.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not ready")
    }
}

/// Builds the probe router.
///
/// `get` also matches HEAD (the body is suppressed on the wire), and the
/// method router answers 405 for everything else, which is exactly the
/// probe contract.
fn build_router(readiness: ReadinessState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
        .with_state(readiness)
}

/// HTTP server answering liveness and readiness probes.
///
/// Cheap to clone; clones share the readiness flag and lifecycle state,
/// so the supervisor can hold one handle while a spawned task runs
/// [`ProbeServer::start`] on another.
#[derive(Clone)]
pub struct ProbeServer {
    inner: Arc<Inner>,
}

struct Inner {
    port: u16,
    readiness: ReadinessState,
    started: AtomicBool,
    drain: ShutdownController,
    drain_signal: ShutdownSignal,
    done: ShutdownController,
    done_signal: ShutdownSignal,
}

impl ProbeServer {
    /// Creates a probe server for `port`. Nothing is bound until
    /// [`ProbeServer::start`].
    pub fn new(port: u16) -> Self {
        let (drain, drain_signal) = shutdown_channel();
        let (done, done_signal) = shutdown_channel();
        Self {
            inner: Arc::new(Inner {
                port,
                readiness: ReadinessState::new(),
                started: AtomicBool::new(false),
                drain,
                drain_signal,
                done,
                done_signal,
            }),
        }
    }

    /// The configured listening port.
    pub fn port(&self) -> u16 {
        self.inner.port
    }

    /// A handle to the shared readiness flag.
    pub fn readiness(&self) -> ReadinessState {
        self.inner.readiness.clone()
    }

    /// Updates the readiness flag. Safe to call concurrently with
    /// request handling.
    pub fn set_ready(&self, ready: bool) {
        if ready {
            self.inner.readiness.set_ready();
        } else {
            self.inner.readiness.set_not_ready();
        }
    }

    /// Current readiness.
    pub fn is_ready(&self) -> bool {
        self.inner.readiness.is_ready()
    }

    /// Binds the probe port and serves until cancelled or drained.
    ///
    /// Blocks for the lifetime of the server. A bind failure is returned
    /// to the caller, which treats it as fatal. Once `cancel` (or an
    /// internal drain request from [`ProbeServer::shutdown`]) fires, the
    /// listener stops accepting and in-flight connections drain; the
    /// completion is recorded so `shutdown` can observe it.
    pub async fn start(&self, cancel: ShutdownSignal) -> std::io::Result<()> {
        let app = build_router(self.inner.readiness.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.inner.port));
        let listener = TcpListener::bind(addr).await?;
        self.inner.started.store(true, Ordering::SeqCst);
        // Log after successful bind - the server is actually listening
        info!(port = self.inner.port, "probe server listening");

        let drain = self.inner.drain_signal.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let mut cancel = cancel;
                let mut drain = drain;
                tokio::select! {
                    _ = cancel.wait() => {}
                    _ = drain.wait() => {}
                }
            })
            .await;

        self.inner.done.shutdown();
        info!("probe server stopped");
        result
    }

    /// Stops accepting traffic and drains connections within `timeout`.
    ///
    /// Marks the process not ready first. Calling this on a server that
    /// never started is a successful no-op. A drain that outlives the
    /// window yields [`DrainTimeout`]; the server is not waited on
    /// further.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), DrainTimeout> {
        self.inner.readiness.set_not_ready();

        if !self.inner.started.load(Ordering::SeqCst) {
            return Ok(());
        }

        self.inner.drain.shutdown();

        let mut done = self.inner.done_signal.clone();
        tokio::time::timeout(timeout, done.wait())
            .await
            .map_err(|_| DrainTimeout(timeout))
    }
}
