//! WebSocket client for the simulation backend.
//!
//! Owns the single logical channel to the backend: establishment,
//! inbound message pumping, outbound command transmission, and the
//! fixed-delay reconnect loop. Decoded telemetry is delivered to a
//! [`TelemetrySink`] supplied by the presentation layer.

pub mod config;
pub mod manager;
pub mod sink;

pub use config::ClientConfig;
pub use manager::{ClientError, ConnectionManager, ConnectionState};
pub use sink::TelemetrySink;
