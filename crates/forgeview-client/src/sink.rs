//! Presentation sink boundary.

use forgeview_protocol::KpiPoint;

/// Consumer of connection lifecycle and telemetry events.
///
/// The connection task applies one inbound message fully, in the
/// dispatcher's fixed field order, before starting the next, so
/// implementations see a consistent update sequence. All presentation
/// state (snapshot, series, status text) belongs to the implementation;
/// the client never mutates it directly.
pub trait TelemetrySink: Send + Sync {
    /// Connection status text changed (`connecting`, `connected`,
    /// `closed - code <n>`, `error - <reason>`).
    fn on_connection_status(&self, status: &str);

    /// Simulation time update, Unix epoch seconds. `None` means the
    /// time is unknown.
    fn on_sim_time(&self, epoch_seconds: Option<i64>);

    /// Simulation status update. The string keeps the backend's raw
    /// casing; display normalization is the sink's concern.
    fn on_sim_status(&self, status: &str);

    /// Simulation speed update.
    fn on_sim_speed(&self, speed: u32);

    /// New point for the daily KPI series.
    fn on_kpi_daily(&self, point: KpiPoint);

    /// New point for the weekly KPI series.
    fn on_kpi_weekly(&self, point: KpiPoint);

    /// Operation statistics report, kept opaque.
    fn on_statistics(&self, statistics: serde_json::Value);
}
