use crate::message::{Envelope, MessageKind};
use tokio::sync::broadcast;
use tracing::warn;

/// Fans decoded envelopes out to registered listeners, one broadcast channel
/// per message kind. Listeners observe only their own category.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    realtime_tx: broadcast::Sender<Envelope>,
    alert_tx: broadcast::Sender<Envelope>,
    status_tx: broadcast::Sender<Envelope>,
    parameter_tx: broadcast::Sender<Envelope>,
}

impl Dispatcher {
    pub(crate) fn new() -> Self {
        // Realtime data is the high-volume stream; the rest are sparse
        let (realtime_tx, _) = broadcast::channel(256);
        let (alert_tx, _) = broadcast::channel(64);
        let (status_tx, _) = broadcast::channel(64);
        let (parameter_tx, _) = broadcast::channel(64);

        Self {
            realtime_tx,
            alert_tx,
            status_tx,
            parameter_tx,
        }
    }

    pub(crate) fn subscribe_realtime(&self) -> broadcast::Receiver<Envelope> {
        self.realtime_tx.subscribe()
    }

    pub(crate) fn subscribe_alerts(&self) -> broadcast::Receiver<Envelope> {
        self.alert_tx.subscribe()
    }

    pub(crate) fn subscribe_simulation_status(&self) -> broadcast::Receiver<Envelope> {
        self.status_tx.subscribe()
    }

    pub(crate) fn subscribe_parameter_updates(&self) -> broadcast::Receiver<Envelope> {
        self.parameter_tx.subscribe()
    }

    /// Route one decoded envelope to its listener category.
    ///
    /// Unrecognized kinds are logged and discarded so that new server message
    /// types never fail the connection. A send error only means no listener
    /// is currently registered.
    pub(crate) fn dispatch(&self, envelope: Envelope) {
        match envelope.kind {
            MessageKind::RealtimeData => {
                let _ = self.realtime_tx.send(envelope);
            }
            MessageKind::SystemAlert => {
                let _ = self.alert_tx.send(envelope);
            }
            MessageKind::SimulationStatus => {
                let _ = self.status_tx.send(envelope);
            }
            MessageKind::ParameterUpdate => {
                let _ = self.parameter_tx.send(envelope);
            }
            MessageKind::Unknown => {
                warn!(
                    source = envelope.source.as_deref().unwrap_or("unknown"),
                    "Discarding realtime message of unrecognized kind"
                );
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
