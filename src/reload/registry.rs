// src/reload/registry.rs

use std::io;
use std::net::TcpStream;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::reload::message::ReloadMessage;

/// One connected session's outbound half.
///
/// Production sessions are tungstenite WebSockets; tests plug in recording
/// sinks.
pub trait ReloadSink: Send {
    fn send_text(&mut self, payload: &str) -> io::Result<()>;
}

impl ReloadSink for tungstenite::WebSocket<TcpStream> {
    fn send_text(&mut self, payload: &str) -> io::Result<()> {
        self.send(tungstenite::Message::text(payload))
            .map_err(|e| match e {
                tungstenite::Error::Io(io_err) => io_err,
                other => io::Error::other(other),
            })
    }
}

/// Registry of connected client sessions.
///
/// Append/remove-only and safe for concurrent notification and
/// (dis)connection. Sessions hold no task state; they are pure notification
/// sinks.
#[derive(Default)]
pub struct ClientRegistry {
    clients: Mutex<Vec<Box<dyn ReloadSink>>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a session. The session ends when its sink errors during a
    /// notify or the server shuts down.
    pub fn register(&self, sink: Box<dyn ReloadSink>) {
        match self.clients.lock() {
            Ok(mut clients) => {
                clients.push(sink);
                debug!(sessions = clients.len(), "live reload client connected");
            }
            Err(_) => warn!("client registry mutex poisoned; dropping new session"),
        }
    }

    pub fn session_count(&self) -> usize {
        self.clients.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Push `message` to every session, silently dropping the ones whose
    /// connection is gone. Never blocks on build state and never fails the
    /// caller.
    pub fn notify(&self, message: &ReloadMessage) {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("failed to encode reload message: {e}");
                return;
            }
        };

        let mut clients = match self.clients.lock() {
            Ok(clients) => clients,
            Err(_) => {
                warn!("client registry mutex poisoned; skipping notify");
                return;
            }
        };

        let before = clients.len();
        clients.retain_mut(|sink| match sink.send_text(&payload) {
            Ok(()) => true,
            Err(e) => {
                debug!("dropping disconnected live reload session: {e}");
                false
            }
        });

        debug!(
            kind = ?message.kind,
            delivered = clients.len(),
            dropped = before - clients.len(),
            "notified live reload sessions"
        );
    }
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("sessions", &self.session_count())
            .finish()
    }
}
