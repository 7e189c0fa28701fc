//! Wire protocol for the simulation backend.
//!
//! Everything in this crate is pure: commands are encoded into the
//! backend's JSON command envelope, and inbound telemetry payloads are
//! decoded into semantic events. Connection handling lives in
//! `forgeview-client`.

pub mod command;
pub mod telemetry;

pub use command::{encode_command, Command, CommandEnvelope};
pub use telemetry::{dispatch, KpiPoint, ProtocolError, Telemetry, TelemetryEvent};
