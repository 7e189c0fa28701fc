//! Console sink: snapshot, KPI series, and display formatting.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use forgeview_client::TelemetrySink;
use forgeview_protocol::KpiPoint;
use parking_lot::Mutex;
use tracing::debug;

/// Last-known-good simulation values, updated sparsely: each field
/// changes only when the corresponding inbound field was present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationSnapshot {
    /// Simulation time, Unix epoch seconds.
    pub sim_time: Option<i64>,
    /// Simulation status, raw backend string. `None` while unknown.
    pub status: Option<String>,
    /// Simulation speed.
    pub speed: Option<u32>,
}

#[derive(Default)]
struct ConsoleState {
    connection_status: String,
    snapshot: SimulationSnapshot,
    /// Append-only, arrival order, timestamps in epoch milliseconds.
    kpi_daily: Vec<(i64, f64)>,
    kpi_weekly: Vec<(i64, f64)>,
    statistics: Option<serde_json::Value>,
}

/// Terminal implementation of [`TelemetrySink`].
///
/// Prints noteworthy updates as they arrive and keeps everything for
/// the `status` command. Clones share the same state, so the command
/// loop and the connection task can both hold one.
#[derive(Clone, Default)]
pub struct ConsoleSink {
    state: Arc<Mutex<ConsoleState>>,
}

impl ConsoleSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulation snapshot.
    pub fn snapshot(&self) -> SimulationSnapshot {
        self.state.lock().snapshot.clone()
    }

    /// Points of the daily KPI series, arrival order, epoch milliseconds.
    pub fn kpi_daily(&self) -> Vec<(i64, f64)> {
        self.state.lock().kpi_daily.clone()
    }

    /// Points of the weekly KPI series, arrival order, epoch milliseconds.
    pub fn kpi_weekly(&self) -> Vec<(i64, f64)> {
        self.state.lock().kpi_weekly.clone()
    }

    /// Drop both KPI series. Called before a `start` command so the
    /// display begins the new run empty, matching the backend's fresh
    /// calculation.
    pub fn clear_kpi_series(&self) {
        let mut state = self.state.lock();
        state.kpi_daily.clear();
        state.kpi_weekly.clear();
    }

    /// Multi-line report of everything the console knows.
    pub fn status_report(&self) -> String {
        let state = self.state.lock();
        let mut report = String::new();
        report.push_str(&format!("connection : {}\n", state.connection_status));
        report.push_str(&format!(
            "sim time   : {}\n",
            format_epoch_seconds(state.snapshot.sim_time)
        ));
        report.push_str(&format!(
            "sim status : {}\n",
            display_status(state.snapshot.status.as_deref())
        ));
        report.push_str(&format!(
            "sim speed  : {}\n",
            state
                .snapshot
                .speed
                .map_or_else(|| "-".to_string(), |speed| speed.to_string())
        ));
        report.push_str(&format!(
            "kpi points : {} daily, {} weekly",
            state.kpi_daily.len(),
            state.kpi_weekly.len()
        ));
        if let Some(statistics) = &state.statistics {
            report.push_str(&format!(
                "\nstatistics :\n{}",
                serde_json::to_string_pretty(statistics)
                    .unwrap_or_else(|_| "<unprintable>".to_string())
            ));
        }
        report
    }
}

impl TelemetrySink for ConsoleSink {
    fn on_connection_status(&self, status: &str) {
        self.state.lock().connection_status = status.to_string();
        println!("connection : {status}");
    }

    fn on_sim_time(&self, epoch_seconds: Option<i64>) {
        // Arrives once per simulation ping; updated silently.
        self.state.lock().snapshot.sim_time = epoch_seconds;
    }

    fn on_sim_status(&self, status: &str) {
        // "-" is the unknown marker used while disconnected.
        self.state.lock().snapshot.status = if status == "-" {
            None
        } else {
            Some(status.to_string())
        };
        println!("sim status : {}", display_status(Some(status)));
    }

    fn on_sim_speed(&self, speed: u32) {
        self.state.lock().snapshot.speed = Some(speed);
        debug!(speed, "simulation speed updated");
    }

    fn on_kpi_daily(&self, point: KpiPoint) {
        self.state
            .lock()
            .kpi_daily
            .push((to_epoch_millis(point.time), point.value));
        println!(
            "kpi daily  : {:.3} at {}",
            point.value,
            format_epoch_seconds(Some(point.time))
        );
    }

    fn on_kpi_weekly(&self, point: KpiPoint) {
        self.state
            .lock()
            .kpi_weekly
            .push((to_epoch_millis(point.time), point.value));
        println!(
            "kpi weekly : {:.3} at {}",
            point.value,
            format_epoch_seconds(Some(point.time))
        );
    }

    fn on_statistics(&self, statistics: serde_json::Value) {
        println!(
            "statistics :\n{}",
            serde_json::to_string_pretty(&statistics)
                .unwrap_or_else(|_| "<unprintable>".to_string())
        );
        self.state.lock().statistics = Some(statistics);
    }
}

/// The event contract keeps timestamps in epoch seconds; the series
/// view wants milliseconds. This is the single conversion point.
fn to_epoch_millis(epoch_seconds: i64) -> i64 {
    epoch_seconds * 1000
}

/// Render an epoch-seconds time as a UTC date plus the raw unixtime,
/// or `-` while unknown.
pub fn format_epoch_seconds(epoch_seconds: Option<i64>) -> String {
    match epoch_seconds.and_then(|secs| Utc.timestamp_opt(secs, 0).single()) {
        Some(datetime) => format!(
            "{} ({})",
            datetime.to_rfc2822(),
            datetime.timestamp()
        ),
        None => "-".to_string(),
    }
}

/// Status display is uppercase; the raw value stays in the snapshot.
fn display_status(status: Option<&str>) -> String {
    status.unwrap_or("-").to_uppercase()
}
