//! Inbound telemetry decoding.
//!
//! The backend pushes sparse JSON objects: any subset of the recognized
//! fields may be present in a single message, and unknown fields (the
//! backend stamps extras such as `calc_id`) are ignored. Decoding a
//! message yields zero or more [`TelemetryEvent`]s in a fixed order.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One time-stamped KPI value.
///
/// `time` is a Unix epoch value in seconds; conversion to milliseconds
/// for display happens once, at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiPoint {
    /// Sample time, Unix epoch seconds.
    pub time: i64,
    /// KPI value (kWh/kg).
    pub value: f64,
}

/// A decoded inbound telemetry message.
///
/// All fields are optional and independent; a message carrying none of
/// them is valid and produces no events.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Telemetry {
    /// Current simulation time, Unix epoch seconds.
    pub sim_time: Option<i64>,
    /// Simulation status, raw backend string (`running`, `paused`, `stopped`).
    pub sim_status: Option<String>,
    /// Simulation speed.
    pub sim_speed: Option<u32>,
    /// Newest point of the daily KPI series.
    pub kpi_daily: Option<KpiPoint>,
    /// Newest point of the weekly KPI series.
    pub kpi_weekly: Option<KpiPoint>,
    /// Operation statistics report, kept opaque.
    pub operation_statistics: Option<serde_json::Value>,
}

/// Semantic event decoded from one telemetry field.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryEvent {
    /// Simulation time advanced, Unix epoch seconds.
    SimTime(i64),
    /// Simulation status changed; the string is the raw backend value.
    /// Case normalization for display is a presentation concern.
    SimStatus(String),
    /// Simulation speed changed.
    SimSpeed(u32),
    /// A daily KPI point arrived.
    KpiDaily(KpiPoint),
    /// A weekly KPI point arrived.
    KpiWeekly(KpiPoint),
    /// An operation statistics report arrived.
    Statistics(serde_json::Value),
}

/// Errors produced while decoding inbound messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The payload was not valid JSON, or a recognized field had the
    /// wrong shape. The message is discarded; the channel stays usable.
    #[error("malformed inbound message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}

/// Decode one raw inbound message into semantic events.
///
/// Fields are evaluated independently and unconditionally, in the fixed
/// order `sim_time`, `sim_status`, `sim_speed`, `kpi_daily`,
/// `kpi_weekly`, `operation_statistics`. Consumers may rely on this
/// order for consistent snapshot updates within one message.
pub fn dispatch(raw: &str) -> Result<Vec<TelemetryEvent>, ProtocolError> {
    let telemetry: Telemetry = serde_json::from_str(raw)?;
    Ok(telemetry.into_events())
}

impl Telemetry {
    /// Convert the sparse message into events, preserving the fixed
    /// field order.
    pub fn into_events(self) -> Vec<TelemetryEvent> {
        let mut events = Vec::new();
        if let Some(time) = self.sim_time {
            events.push(TelemetryEvent::SimTime(time));
        }
        if let Some(status) = self.sim_status {
            events.push(TelemetryEvent::SimStatus(status));
        }
        if let Some(speed) = self.sim_speed {
            events.push(TelemetryEvent::SimSpeed(speed));
        }
        if let Some(point) = self.kpi_daily {
            events.push(TelemetryEvent::KpiDaily(point));
        }
        if let Some(point) = self.kpi_weekly {
            events.push(TelemetryEvent::KpiWeekly(point));
        }
        if let Some(statistics) = self.operation_statistics {
            events.push(TelemetryEvent::Statistics(statistics));
        }
        events
    }
}
