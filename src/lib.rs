//! loggen generates structured JSON log records with random data for
//! log-ingestion pipeline demos.
//!
//! The crate is organized around three long-running concerns wired together
//! by the binary:
//! - [`generator`] - the periodic emission loop and its pure sampling
//!   primitives
//! - [`server`] - HTTP liveness/readiness probes for orchestrators
//! - [`shutdown`] - the cancellation signal shared by all components
//!
//! [`config`] holds the flag/env configuration surface consumed by the rest.

pub mod config;
pub mod generator;
pub mod server;
pub mod shutdown;
