//! Presentation layer for the forgeview console.
//!
//! [`ConsoleSink`] consumes the client's telemetry events and keeps the
//! displayed simulation snapshot, the KPI series, and the latest
//! statistics report. [`input`] maps interactive command lines onto
//! protocol commands.

pub mod input;
pub mod sink;

pub use input::{parse_line, ConsoleInput, InputError};
pub use sink::{ConsoleSink, SimulationSnapshot};
