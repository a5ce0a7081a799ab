use tokio::sync::mpsc;

use crate::engine::directory::FetchTicket;
use crate::engine::process::ProcessEntry;
use crate::error::FetchError;

/// What the push channel reports about its connection.
#[derive(Debug, Clone, PartialEq)]
pub enum PushMessage {
    Opened,
    Payload(String),
    Closed(Option<String>),
}

/// User intents accepted from the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetFilter(String),
    Kill(u32),
    Refresh,
    Quit,
}

#[derive(Debug)]
pub enum ControlEvent {
    Push(PushMessage),
    PollTick,
    Intent(Intent),
    SnapshotFetched {
        ticket: FetchTicket,
        result: Result<Vec<ProcessEntry>, FetchError>,
    },
    KillFinished {
        pid: u32,
        result: Result<(), FetchError>,
    },
}

/// Handed to a push channel; forwards its messages into the controller queue.
#[derive(Debug, Clone)]
pub struct PushSink {
    tx: mpsc::UnboundedSender<ControlEvent>,
}

impl PushSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ControlEvent>) -> Self {
        Self { tx }
    }

    /// Returns false once the controller is gone.
    pub fn deliver(&self, message: PushMessage) -> bool {
        self.tx.send(ControlEvent::Push(message)).is_ok()
    }
}

#[derive(Debug, Clone)]
pub struct IntentSender {
    tx: mpsc::UnboundedSender<ControlEvent>,
}

impl IntentSender {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ControlEvent>) -> Self {
        Self { tx }
    }

    pub fn set_filter(&self, term: impl Into<String>) {
        self.send(Intent::SetFilter(term.into()));
    }

    /// Confirmation is the caller's job; this sends the kill unconditionally.
    pub fn request_kill(&self, pid: u32) {
        self.send(Intent::Kill(pid));
    }

    pub fn refresh(&self) {
        self.send(Intent::Refresh);
    }

    pub fn quit(&self) {
        self.send(Intent::Quit);
    }

    fn send(&self, intent: Intent) {
        if self.tx.send(ControlEvent::Intent(intent)).is_err() {
            tracing::debug!("controller stopped, intent dropped");
        }
    }
}
