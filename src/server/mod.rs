//! HTTP server for orchestrator probes
//!
//! - `/health` - Liveness: is the process alive?
//! - `/ready` - Readiness: should the process receive traffic?
//!
//! Both answer GET and HEAD with plain text; anything else gets a 405.

mod probe;

pub use probe::{DrainTimeout, ProbeServer, ReadinessState};

#[cfg(test)]
#[path = "probe_test.rs"]
mod probe_tests;
