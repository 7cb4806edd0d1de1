use crate::connection::dispatch::Dispatcher;
use crate::connection::{ConnectionState, ReconnectPolicy, SendError};
use crate::message::Envelope;
use futures::{SinkExt, StreamExt};
use serde::Serialize;
use std::pin::Pin;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::time::{sleep, Sleep};
use tokio_tungstenite::tungstenite::{self, protocol::Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Commands from the public handle to the supervisor task
#[derive(Debug)]
enum Command {
    Connect { url: Option<String> },
    Send {
        text: String,
        reply: oneshot::Sender<Result<(), SendError>>,
    },
    Disconnect,
}

/// Owns the single realtime WebSocket connection to the backend.
///
/// All transport state lives in a supervisor task; this handle sends it
/// commands and observes state through a watch channel. Unexpected closes
/// drive a bounded fixed-delay reconnect loop; a deliberate `disconnect`
/// or retry exhaustion stops it until the next explicit `connect`.
pub struct ConnectionManager {
    command_tx: mpsc::Sender<Command>,
    state_rx: watch::Receiver<ConnectionState>,
    attempts: Arc<AtomicU32>,
    dispatcher: Dispatcher,
}

impl ConnectionManager {
    /// Create a manager for `default_url` and spawn its supervisor task.
    ///
    /// No connection is opened until `connect` is called.
    pub fn new(default_url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(ConnectionState::Idle);
        let attempts = Arc::new(AtomicU32::new(0));
        let dispatcher = Dispatcher::new();

        let supervisor = Supervisor {
            target: default_url.into(),
            policy,
            state_tx,
            attempts: Arc::clone(&attempts),
            dispatcher: dispatcher.clone(),
            socket: None,
            reconnect: None,
        };
        tokio::spawn(supervisor.run(command_rx));

        Self {
            command_tx,
            state_rx,
            attempts,
            dispatcher,
        }
    }

    /// Open the transport, replacing any current one.
    ///
    /// `url` overrides the configured default for this and subsequent
    /// reconnects. Cancels a pending reconnect timer. Outcome is observed
    /// through `state` / `watch_state`.
    pub async fn connect(&self, url: Option<String>) {
        if self.command_tx.send(Command::Connect { url }).await.is_err() {
            error!("Connection manager task is gone, connect ignored");
        }
    }

    /// Serialize `message` and transmit it on the open transport.
    ///
    /// When the transport is not open the message is dropped, never queued.
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<(), SendError> {
        let text =
            serde_json::to_string(message).map_err(|e| SendError::Encode(e.to_string()))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Send {
                text,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SendError::Shutdown)?;
        reply_rx.await.unwrap_or(Err(SendError::Shutdown))
    }

    /// Close the transport deliberately and suppress automatic reconnects
    /// until `connect` is called again.
    pub async fn disconnect(&self) {
        if self.command_tx.send(Command::Disconnect).await.is_err() {
            error!("Connection manager task is gone, disconnect ignored");
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Watch channel for observing state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Consecutive automatic reconnect attempts since the last successful
    /// open. Resets to 0 only when a transport opens successfully.
    pub fn retry_attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Listen for `realtime_data` envelopes.
    pub fn subscribe_realtime(&self) -> broadcast::Receiver<Envelope> {
        self.dispatcher.subscribe_realtime()
    }

    /// Listen for `system_alert` envelopes.
    pub fn subscribe_alerts(&self) -> broadcast::Receiver<Envelope> {
        self.dispatcher.subscribe_alerts()
    }

    /// Listen for `simulation_status` envelopes.
    pub fn subscribe_simulation_status(&self) -> broadcast::Receiver<Envelope> {
        self.dispatcher.subscribe_simulation_status()
    }

    /// Listen for `parameter_update` envelopes.
    pub fn subscribe_parameter_updates(&self) -> broadcast::Receiver<Envelope> {
        self.dispatcher.subscribe_parameter_updates()
    }
}

// The supervisor owns the transport exclusively. One select loop over
// commands, inbound frames, and the single pending reconnect timer.
struct Supervisor {
    target: String,
    policy: ReconnectPolicy,
    state_tx: watch::Sender<ConnectionState>,
    attempts: Arc<AtomicU32>,
    dispatcher: Dispatcher,
    socket: Option<WsStream>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

// One loop iteration's wakeup reason
enum Wakeup {
    Command(Option<Command>),
    Frame(Option<Result<Message, tungstenite::Error>>),
    RetryDue,
}

impl Supervisor {
    async fn run(mut self, mut command_rx: mpsc::Receiver<Command>) {
        loop {
            let wakeup = tokio::select! {
                cmd = command_rx.recv() => Wakeup::Command(cmd),
                frame = next_frame(&mut self.socket), if self.socket.is_some() => {
                    Wakeup::Frame(frame)
                }
                _ = reconnect_due(&mut self.reconnect), if self.reconnect.is_some() => {
                    Wakeup::RetryDue
                }
            };

            match wakeup {
                Wakeup::Command(None) => break,
                Wakeup::Command(Some(Command::Connect { url })) => {
                    // Manual connect invalidates the pending retry timer
                    self.reconnect = None;
                    if let Some(url) = url {
                        self.target = url;
                    }
                    self.shutdown_socket().await;
                    self.open().await;
                }
                Wakeup::Command(Some(Command::Send { text, reply })) => {
                    let result = self.transmit(text).await;
                    let _ = reply.send(result);
                }
                Wakeup::Command(Some(Command::Disconnect)) => {
                    self.reconnect = None;
                    self.shutdown_socket().await;
                    self.set_state(ConnectionState::Closed);
                    info!("Realtime connection closed by request");
                }
                Wakeup::Frame(frame) => self.handle_frame(frame).await,
                Wakeup::RetryDue => {
                    self.reconnect = None;
                    debug!(
                        attempt = self.attempts.load(Ordering::SeqCst),
                        "Reconnect timer fired"
                    );
                    self.open().await;
                }
            }
        }

        debug!("Connection manager task exiting");
    }

    /// Attempt to open the transport. Resets the retry counter only on
    /// success; a failed attempt goes through the unexpected-close path.
    async fn open(&mut self) {
        self.set_state(ConnectionState::Connecting);
        let conn_id = Uuid::new_v4();
        info!(%conn_id, url = %self.target, "Opening realtime connection");

        match connect_async(self.target.as_str()).await {
            Ok((socket, _response)) => {
                self.socket = Some(socket);
                self.attempts.store(0, Ordering::SeqCst);
                self.set_state(ConnectionState::Open);
                info!(%conn_id, "Realtime connection established");
            }
            Err(e) => {
                warn!(%conn_id, error = %e, "Realtime connection attempt failed");
                self.socket = None;
                self.handle_unexpected_close();
            }
        }
    }

    async fn handle_frame(&mut self, frame: Option<Result<Message, tungstenite::Error>>) {
        match frame {
            Some(Ok(Message::Text(text))) => self.handle_text(text.as_str()),
            Some(Ok(Message::Ping(data))) => {
                if let Some(socket) = self.socket.as_mut() {
                    if let Err(e) = socket.send(Message::Pong(data)).await {
                        warn!(error = %e, "Failed to answer ping");
                        self.handle_unexpected_close();
                    }
                }
            }
            Some(Ok(Message::Close(_))) => {
                info!("Server closed realtime connection");
                self.handle_unexpected_close();
            }
            Some(Ok(_)) => {
                // Binary and pong frames carry nothing for us
            }
            Some(Err(e)) => {
                warn!(error = %e, "Realtime transport error");
                self.handle_unexpected_close();
            }
            None => {
                info!("Realtime stream ended");
                self.handle_unexpected_close();
            }
        }
    }

    /// Decode and dispatch one text frame. A malformed frame is logged and
    /// discarded; it never affects connection state.
    fn handle_text(&self, raw: &str) {
        match Envelope::decode(raw) {
            Ok(envelope) => self.dispatcher.dispatch(envelope),
            Err(e) => warn!(error = %e, "Discarding undecodable realtime frame"),
        }
    }

    /// Unexpected close: schedule the single reconnect timer if the retry
    /// budget allows, otherwise enter the terminal `Failed` state.
    fn handle_unexpected_close(&mut self) {
        self.socket = None;
        self.set_state(ConnectionState::Closed);

        let attempts = self.attempts.load(Ordering::SeqCst);
        if attempts < self.policy.max_attempts {
            let attempt = attempts + 1;
            self.attempts.store(attempt, Ordering::SeqCst);
            info!(
                attempt,
                max = self.policy.max_attempts,
                delay_ms = self.policy.delay.as_millis() as u64,
                "Scheduling reconnect"
            );
            self.reconnect = Some(Box::pin(sleep(self.policy.delay)));
        } else {
            error!(
                max = self.policy.max_attempts,
                "Reconnect attempts exhausted, giving up until explicit connect"
            );
            self.set_state(ConnectionState::Failed);
        }
    }

    async fn transmit(&mut self, text: String) -> Result<(), SendError> {
        let Some(socket) = self.socket.as_mut() else {
            warn!("Dropping outbound message, realtime connection not open");
            return Err(SendError::NotConnected);
        };

        if let Err(e) = socket.send(Message::text(text)).await {
            warn!(error = %e, "Outbound send failed");
            self.handle_unexpected_close();
            return Err(SendError::NotConnected);
        }
        Ok(())
    }

    /// Tear down the current transport without touching the state machine.
    async fn shutdown_socket(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None).await;
        }
    }

    fn set_state(&self, state: ConnectionState) {
        self.state_tx.send_replace(state);
    }
}

// Select helpers: inactive arms park on a pending future so the guard
// conditions above are the single source of truth for readiness.

async fn next_frame(
    socket: &mut Option<WsStream>,
) -> Option<Result<Message, tungstenite::Error>> {
    match socket.as_mut() {
        Some(ws) => ws.next().await,
        None => std::future::pending().await,
    }
}

async fn reconnect_due(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer.as_mut() {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
