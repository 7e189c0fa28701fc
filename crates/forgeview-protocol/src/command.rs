//! Command types for client-to-backend communication.

use serde::{Deserialize, Serialize};

/// Commands the console can issue to the simulation backend.
///
/// Serializes to the backend's tagged form, e.g.
/// `{"type":"speed","value":5}`. Logging levels and channel names are
/// opaque strings; the backend owns their semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Restart the simulation from its initial time.
    Start,
    /// Stop the simulation.
    Stop,
    /// Pause the simulation clock.
    Pause,
    /// Resume a paused simulation.
    Resume,
    /// Change the simulation speed (simulated seconds per wall-clock second).
    Speed {
        /// New speed value.
        value: u32,
    },
    /// Request an operation statistics report.
    GetStatistics,
    /// Reset the backend's operation statistics counters.
    ResetStatistics,
    /// Change the backend's global logging level.
    GlobalLoggingLevel {
        /// Level name, passed through verbatim.
        level: String,
    },
    /// Change the logging level of a single backend channel.
    ChannelLoggingLevel {
        /// Channel name, passed through verbatim.
        channel: String,
        /// Level name, passed through verbatim.
        level: String,
    },
}

/// Outbound wire envelope: `{ "command": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// The wrapped command.
    pub command: Command,
}

/// Encode a command into its wire form.
///
/// Commands are tagged maps of strings and integers, so serialization
/// cannot fail; the fallback empty envelope is unreachable.
pub fn encode_command(command: &Command) -> String {
    #[derive(Serialize)]
    struct Envelope<'a> {
        command: &'a Command,
    }

    serde_json::to_string(&Envelope { command }).unwrap_or_else(|_| "{}".to_string())
}
