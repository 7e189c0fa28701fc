//! WebSocket connection lifecycle management.
//!
//! One background task owns the socket exclusively: it establishes the
//! connection, pumps inbound frames through the dispatcher into the
//! sink, forwards queued outbound commands, and re-establishes the
//! channel after every close or error on a fixed delay. Channel-level
//! failures never escape the task, and the retry sleep inside the task
//! loop is the only place a reconnect can be scheduled, so at most one
//! reconnect is ever pending.

use std::sync::Arc;

use forgeview_protocol::{dispatch, encode_command, Command, TelemetryEvent};
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::sink::TelemetrySink;

/// Close code reported when the channel dies without a close frame.
const ABNORMAL_CLOSURE: u16 = 1006;
/// Close code reported when the peer's close frame carried no code.
const NO_STATUS_RECEIVED: u16 = 1005;
/// Close code reported for a locally initiated clean close.
const NORMAL_CLOSURE: u16 = 1000;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle state of the single logical channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt has been made yet.
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// The channel is live; commands may be sent.
    Open,
    /// The peer initiated a close handshake.
    Closing,
    /// The channel closed with the given code.
    Closed(u16),
    /// Establishment or channel runtime failure.
    Error(String),
}

/// Errors surfaced to command senders.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A command was issued while the channel was not open. Commands
    /// are not queued; the caller decides whether to retry once the
    /// channel is back.
    #[error("websocket is not open")]
    NotConnected,
    /// The background connection task is gone.
    #[error("connection task terminated")]
    TaskTerminated,
}

/// Everything the connection task takes ownership of on startup.
struct Starter {
    config: ClientConfig,
    sink: Box<dyn TelemetrySink>,
    command_rx: mpsc::UnboundedReceiver<Command>,
}

/// Handle to the single logical channel.
///
/// The channel itself lives in a background task spawned by
/// [`connect`](Self::connect); this handle only checks state and queues
/// commands.
pub struct ConnectionManager {
    state: Arc<Mutex<ConnectionState>>,
    command_tx: mpsc::UnboundedSender<Command>,
    starter: Mutex<Option<Starter>>,
}

impl ConnectionManager {
    /// Create a manager in [`ConnectionState::Idle`]. Nothing happens
    /// until [`connect`](Self::connect) is called.
    pub fn new<S>(config: ClientConfig, sink: S) -> Self
    where
        S: TelemetrySink + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        Self {
            state: Arc::new(Mutex::new(ConnectionState::Idle)),
            command_tx,
            starter: Mutex::new(Some(Starter {
                config,
                sink: Box::new(sink),
                command_rx,
            })),
        }
    }

    /// Start the connection task. Must be called inside a Tokio runtime.
    ///
    /// Suppressed once the task is running: while an attempt is in
    /// flight, while the channel is open, and while a reconnect is
    /// pending, further `connect` calls are ignored. The task retries
    /// on its own, so at most one live or attempting channel ever
    /// exists.
    pub fn connect(&self) {
        let Some(starter) = self.starter.lock().take() else {
            debug!("websocket already connected or connecting, ignoring connect request");
            return;
        };
        let state = Arc::clone(&self.state);
        tokio::spawn(run(starter.config, starter.sink, state, starter.command_rx));
    }

    /// Current channel state.
    pub fn state(&self) -> ConnectionState {
        self.state.lock().clone()
    }

    /// Queue a command for transmission.
    ///
    /// Fails with [`ClientError::NotConnected`] unless the channel is
    /// open. Transmission is fire-and-forget: no acknowledgement is
    /// tracked, and a command racing a concurrent close is dropped with
    /// a log line rather than replayed on the next connection.
    pub fn send(&self, command: Command) -> Result<(), ClientError> {
        if *self.state.lock() != ConnectionState::Open {
            return Err(ClientError::NotConnected);
        }
        self.command_tx
            .send(command)
            .map_err(|_| ClientError::TaskTerminated)
    }
}

/// Why an established connection ended.
enum Disconnect {
    /// Close handshake completed, or the stream ended.
    Closed(u16),
    /// The socket failed mid-conversation.
    RuntimeError(tungstenite::Error),
    /// Every [`ConnectionManager`] handle was dropped.
    HandleDropped,
}

/// Connection task body: connect, pump, report, sleep, repeat forever.
async fn run(
    config: ClientConfig,
    sink: Box<dyn TelemetrySink>,
    state: Arc<Mutex<ConnectionState>>,
    mut command_rx: mpsc::UnboundedReceiver<Command>,
) {
    loop {
        *state.lock() = ConnectionState::Connecting;
        sink.on_connection_status("connecting");
        info!(endpoint = %config.endpoint, "connecting to backend");

        match connect_async(config.endpoint.as_str()).await {
            Ok((ws, _response)) => {
                // Commands that raced in while the channel was down are
                // dropped, not replayed on the fresh connection.
                let mut stale = 0usize;
                while command_rx.try_recv().is_ok() {
                    stale += 1;
                }
                if stale > 0 {
                    warn!(count = stale, "dropped commands issued while disconnected");
                }

                *state.lock() = ConnectionState::Open;
                sink.on_connection_status("connected");
                info!("websocket connected");

                let code = match pump(ws, sink.as_ref(), &state, &mut command_rx).await {
                    Disconnect::Closed(code) => code,
                    Disconnect::RuntimeError(error) => {
                        warn!(%error, "websocket runtime error");
                        sink.on_connection_status(&format!("error - {error}"));
                        ABNORMAL_CLOSURE
                    }
                    Disconnect::HandleDropped => {
                        *state.lock() = ConnectionState::Closed(NORMAL_CLOSURE);
                        info!("connection manager dropped, stopping connection task");
                        return;
                    }
                };

                *state.lock() = ConnectionState::Closed(code);
                sink.on_connection_status(&format!("closed - code {code}"));
                // The simulation state is unknown while disconnected.
                sink.on_sim_status("-");
                info!(code, "websocket closed");
            }
            Err(error) => {
                warn!(%error, "websocket connect failed");
                *state.lock() = ConnectionState::Error(error.to_string());
                sink.on_connection_status(&format!("error - {error}"));
            }
        }

        if !wait_for_retry(&config, &mut command_rx).await {
            return;
        }
    }
}

/// Sleep out the fixed retry delay.
///
/// Commands arriving during the delay lost the race against the close
/// and are dropped. Returns `false` when every manager handle is gone,
/// which ends the task instead of retrying for a client that no longer
/// exists.
async fn wait_for_retry(
    config: &ClientConfig,
    command_rx: &mut mpsc::UnboundedReceiver<Command>,
) -> bool {
    let retry = sleep(config.retry_delay);
    tokio::pin!(retry);
    loop {
        tokio::select! {
            _ = &mut retry => return true,
            command = command_rx.recv() => match command {
                Some(command) => {
                    warn!(?command, "dropping command issued while disconnected")
                }
                None => {
                    info!("connection manager dropped, stopping connection task");
                    return false;
                }
            },
        }
    }
}

/// Pump one established connection until it ends.
///
/// Inbound frames are processed strictly in arrival order, each one
/// fully applied to the sink before the next is read. Outbound
/// commands interleave through the same loop, so the socket has exactly
/// one owner.
async fn pump(
    mut ws: WsStream,
    sink: &dyn TelemetrySink,
    state: &Mutex<ConnectionState>,
    command_rx: &mut mpsc::UnboundedReceiver<Command>,
) -> Disconnect {
    loop {
        tokio::select! {
            command = command_rx.recv() => {
                let Some(command) = command else {
                    let _ = ws.close(None).await;
                    return Disconnect::HandleDropped;
                };
                let raw = encode_command(&command);
                debug!(%raw, "sending command");
                if let Err(error) = ws.send(Message::Text(raw)).await {
                    return Disconnect::RuntimeError(error);
                }
            }
            message = ws.next() => {
                match message {
                    Some(Ok(Message::Text(text))) => handle_text(sink, &text),
                    Some(Ok(Message::Binary(data))) => {
                        warn!(bytes = data.len(), "ignoring unexpected binary message");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(error) = ws.send(Message::Pong(data)).await {
                            return Disconnect::RuntimeError(error);
                        }
                    }
                    Some(Ok(Message::Pong(_))) => {}
                    Some(Ok(Message::Close(frame))) => {
                        *state.lock() = ConnectionState::Closing;
                        let code = frame
                            .map(|frame| u16::from(frame.code))
                            .unwrap_or(NO_STATUS_RECEIVED);
                        // Drive the close handshake to completion.
                        while let Some(message) = ws.next().await {
                            if message.is_err() {
                                break;
                            }
                        }
                        return Disconnect::Closed(code);
                    }
                    Some(Ok(Message::Frame(_))) => {}
                    Some(Err(error)) => return Disconnect::RuntimeError(error),
                    None => return Disconnect::Closed(ABNORMAL_CLOSURE),
                }
            }
        }
    }
}

/// Decode one inbound payload and apply its events to the sink.
///
/// A malformed payload is logged and discarded; the channel stays open.
fn handle_text(sink: &dyn TelemetrySink, text: &str) {
    match dispatch(text) {
        Ok(events) => {
            for event in events {
                apply_event(sink, event);
            }
        }
        Err(error) => warn!(%error, payload = text, "discarding malformed message"),
    }
}

fn apply_event(sink: &dyn TelemetrySink, event: TelemetryEvent) {
    match event {
        TelemetryEvent::SimTime(time) => sink.on_sim_time(Some(time)),
        TelemetryEvent::SimStatus(status) => sink.on_sim_status(&status),
        TelemetryEvent::SimSpeed(speed) => sink.on_sim_speed(speed),
        TelemetryEvent::KpiDaily(point) => sink.on_kpi_daily(point),
        TelemetryEvent::KpiWeekly(point) => sink.on_kpi_weekly(point),
        TelemetryEvent::Statistics(statistics) => sink.on_statistics(statistics),
    }
}
