#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gaze::controller::event::{ControlEvent, PushMessage, PushSink};
use gaze::controller::{EngineSettings, SyncController};
use gaze::engine::{HostService, ProcessEntry};
use gaze::error::FetchError;
use gaze::remote::PushChannel;
use tokio::sync::oneshot;

type FetchResult = Result<Vec<ProcessEntry>, FetchError>;

pub fn entry(pid: u32, name: &str) -> ProcessEntry {
    ProcessEntry::new(pid, Some(name), 1.0)
}

pub fn names(entries: &[ProcessEntry]) -> Vec<String> {
    entries.iter().map(|e| e.display_name().to_string()).collect()
}

pub fn settings(window_size: usize, cpu_threshold: f64) -> EngineSettings {
    EngineSettings {
        window_size,
        cpu_threshold,
        poll_interval: Duration::from_secs(10),
    }
}

/// Host whose fetches can be held open and released in any order.
/// Fetches without a pending gate answer with the current listing.
pub struct GatedHost {
    gates: Mutex<VecDeque<oneshot::Receiver<FetchResult>>>,
    listing: Mutex<Vec<ProcessEntry>>,
    kill_error: Mutex<Option<FetchError>>,
    fetches: AtomicUsize,
    kills: Mutex<Vec<u32>>,
}

impl GatedHost {
    pub fn new(listing: Vec<ProcessEntry>) -> Self {
        Self {
            gates: Mutex::new(VecDeque::new()),
            listing: Mutex::new(listing),
            kill_error: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            kills: Mutex::new(Vec::new()),
        }
    }

    /// The next fetch waits until the returned sender fires.
    pub fn gate(&self) -> oneshot::Sender<FetchResult> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    pub fn fail_kills(&self, err: FetchError) {
        *self.kill_error.lock().unwrap() = Some(err);
    }

    pub fn set_listing(&self, listing: Vec<ProcessEntry>) {
        *self.listing.lock().unwrap() = listing;
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn kills(&self) -> Vec<u32> {
        self.kills.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostService for GatedHost {
    async fn fetch_processes(&self) -> FetchResult {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(FetchError::Transport {
                    endpoint: "gate".into(),
                    message: "gate dropped".into(),
                })
            }),
            None => Ok(self.listing.lock().unwrap().clone()),
        }
    }

    async fn kill(&self, pid: u32) -> Result<(), FetchError> {
        self.kills.lock().unwrap().push(pid);
        let failure = self.kill_error.lock().unwrap().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        self.listing.lock().unwrap().retain(|p| p.pid != pid);
        Ok(())
    }
}

/// Delivers a fixed list of messages, then idles until shutdown.
pub struct ScriptedPush {
    messages: Vec<PushMessage>,
}

impl ScriptedPush {
    pub fn new(messages: Vec<PushMessage>) -> Box<Self> {
        Box::new(Self { messages })
    }

    pub fn silent() -> Box<Self> {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl PushChannel for ScriptedPush {
    async fn pump(self: Box<Self>, sink: PushSink, shutdown: oneshot::Receiver<()>) {
        for message in self.messages {
            sink.deliver(message);
        }
        let _ = shutdown.await;
    }
}

pub fn payload(cpu: f64, ram: f64) -> ControlEvent {
    ControlEvent::Push(PushMessage::Payload(format!(
        r#"{{"cpu": {cpu}, "ram": {ram}}}"#
    )))
}

/// Handle queued events until `done` holds.
pub async fn pump_until<F>(controller: &mut SyncController, mut done: F)
where
    F: FnMut(&SyncController) -> bool,
{
    for _ in 0..200 {
        if done(controller) {
            return;
        }
        let event = controller.next_event().await.expect("event queue closed");
        controller.handle(event);
    }
    panic!("condition not reached after 200 events");
}

/// Handle exactly one queued event.
pub async fn step(controller: &mut SyncController) {
    let event = controller.next_event().await.expect("event queue closed");
    controller.handle(event);
}

/// Reports through `seen` once it observes the shutdown signal.
pub struct ShutdownWitness {
    seen: oneshot::Sender<()>,
}

impl ShutdownWitness {
    pub fn new() -> (Box<Self>, oneshot::Receiver<()>) {
        let (seen, rx) = oneshot::channel();
        (Box::new(Self { seen }), rx)
    }
}

#[async_trait]
impl PushChannel for ShutdownWitness {
    async fn pump(self: Box<Self>, sink: PushSink, shutdown: oneshot::Receiver<()>) {
        sink.deliver(PushMessage::Opened);
        if shutdown.await.is_ok() {
            let _ = self.seen.send(());
        }
    }
}
