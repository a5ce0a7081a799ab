//! Orchestration of the push stream, the poll timer and user intents.
//!
//! Every state change happens in [`SyncController::handle`], one event at a
//! time. Network round trips run as spawned tasks that report back through
//! the same queue, so a pending fetch never blocks sample ingestion.

pub mod event;
mod task;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{
    AlertEvaluator, HostService, Notice, ProcessDirectory, SampleBuffer, ViewModel,
};
use crate::error::EngineError;
use crate::remote::PushChannel;
use crate::remote::wire::decode_sample;
use event::{ControlEvent, Intent, IntentSender, PushMessage, PushSink};
use task::TaskGuard;

const PUSH_CLOSE_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub struct EngineSettings {
    pub window_size: usize,
    pub cpu_threshold: f64,
    pub poll_interval: Duration,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            window_size: config.general.window_size,
            cpu_threshold: config.alert.cpu_threshold,
            poll_interval: Duration::from_millis(config.general.poll_interval_ms.max(1)),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

pub struct SyncController {
    host: Arc<dyn HostService>,
    buffer: SampleBuffer,
    evaluator: AlertEvaluator,
    directory: ProcessDirectory,
    link: LinkState,
    notice: Option<Notice>,
    notice_serial: u64,
    poll_interval: Duration,
    events_tx: mpsc::UnboundedSender<ControlEvent>,
    events_rx: mpsc::UnboundedReceiver<ControlEvent>,
    view_tx: watch::Sender<ViewModel>,
    poll_task: Option<TaskGuard>,
    push_task: Option<TaskGuard>,
    push_shutdown: Option<oneshot::Sender<()>>,
    running: bool,
    disposed: bool,
}

impl SyncController {
    pub fn new(settings: EngineSettings, host: Arc<dyn HostService>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(ViewModel::default());
        Self {
            host,
            buffer: SampleBuffer::new(settings.window_size),
            evaluator: AlertEvaluator::new(settings.cpu_threshold),
            directory: ProcessDirectory::new(),
            link: LinkState::Connecting,
            notice: None,
            notice_serial: 0,
            poll_interval: settings.poll_interval,
            events_tx,
            events_rx,
            view_tx,
            poll_task: None,
            push_task: None,
            push_shutdown: None,
            running: true,
            disposed: false,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewModel> {
        self.view_tx.subscribe()
    }

    pub fn intents(&self) -> IntentSender {
        IntentSender::new(self.events_tx.clone())
    }

    pub fn view(&self) -> ViewModel {
        self.view_tx.borrow().clone()
    }

    pub fn link_state(&self) -> LinkState {
        self.link
    }

    pub fn directory(&self) -> &ProcessDirectory {
        &self.directory
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.disposed
    }

    /// Connect the push channel and arm the poll timer. The timer's first
    /// tick fires immediately, which is the eager startup refresh.
    pub fn start(&mut self, push: Box<dyn PushChannel>) {
        if self.disposed || self.poll_task.is_some() {
            return;
        }
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let sink = PushSink::new(self.events_tx.clone());
        self.push_shutdown = Some(shutdown_tx);
        self.push_task = Some(TaskGuard::spawn(push.pump(sink, shutdown_rx)));

        let tx = self.events_tx.clone();
        let period = self.poll_interval;
        self.poll_task = Some(TaskGuard::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if tx.send(ControlEvent::PollTick).is_err() {
                    break;
                }
            }
        }));
        self.publish();
    }

    pub async fn next_event(&mut self) -> Option<ControlEvent> {
        self.events_rx.recv().await
    }

    pub fn try_next_event(&mut self) -> Option<ControlEvent> {
        self.events_rx.try_recv().ok()
    }

    pub fn handle(&mut self, event: ControlEvent) {
        if self.disposed {
            debug!(?event, "controller disposed, event discarded");
            return;
        }
        match event {
            ControlEvent::Push(message) => self.on_push(message),
            ControlEvent::PollTick => self.spawn_refresh(),
            ControlEvent::Intent(intent) => self.on_intent(intent),
            ControlEvent::SnapshotFetched { ticket, result } => {
                match self.directory.complete_refresh(ticket, result) {
                    Ok(()) => {}
                    Err(err @ EngineError::Stale { .. }) => {
                        debug!("discarding stale snapshot: {err}");
                        return;
                    }
                    Err(err) => {
                        warn!("process refresh failed: {err}");
                        self.set_notice(Notice::error(err.to_string()));
                    }
                }
                self.publish();
            }
            ControlEvent::KillFinished { pid, result } => {
                match result {
                    Ok(()) => {
                        info!(pid, "kill acknowledged");
                        self.set_notice(Notice::info(format!("Sent kill to PID {pid}")));
                        self.spawn_refresh();
                    }
                    Err(err) => {
                        warn!(pid, "kill failed: {err}");
                        self.set_notice(Notice::error(err.to_string()));
                    }
                }
                self.publish();
            }
        }
    }

    fn on_push(&mut self, message: PushMessage) {
        match message {
            PushMessage::Opened => {
                if self.link == LinkState::Connecting {
                    info!("metric stream open");
                    self.link = LinkState::Open;
                }
            }
            PushMessage::Payload(text) => {
                if self.link == LinkState::Closed {
                    return;
                }
                match decode_sample(&text, Utc::now()) {
                    Ok(sample) => {
                        self.buffer.append(sample);
                        self.publish();
                    }
                    Err(err) => debug!("dropping push message: {err}"),
                }
            }
            PushMessage::Closed(reason) => {
                if self.link != LinkState::Closed {
                    info!(reason = reason.as_deref().unwrap_or("none"), "metric stream closed");
                    self.link = LinkState::Closed;
                }
            }
        }
    }

    fn on_intent(&mut self, intent: Intent) {
        match intent {
            Intent::SetFilter(term) => {
                self.directory.set_filter(term);
                self.publish();
            }
            Intent::Kill(pid) => self.spawn_kill(pid),
            Intent::Refresh => self.spawn_refresh(),
            Intent::Quit => self.running = false,
        }
    }

    fn spawn_refresh(&mut self) {
        let ticket = self.directory.begin_refresh();
        let host = Arc::clone(&self.host);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = host.fetch_processes().await;
            let _ = tx.send(ControlEvent::SnapshotFetched { ticket, result });
        });
    }

    fn spawn_kill(&mut self, pid: u32) {
        let host = Arc::clone(&self.host);
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = host.kill(pid).await;
            let _ = tx.send(ControlEvent::KillFinished { pid, result });
        });
    }

    fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
        self.notice_serial += 1;
    }

    fn publish(&self) {
        let latest = self.buffer.current();
        let alert = self.evaluator.evaluate(&latest);
        let was_active = self.view_tx.borrow().alert.active;
        if alert.active != was_active {
            info!(
                reason = alert.reason.label(),
                cpu = latest.cpu_percent,
                threshold = self.evaluator.threshold(),
                "alert state changed"
            );
        }
        let view = ViewModel {
            history: self.buffer.snapshot(),
            latest,
            alert,
            visible_processes: self.directory.visible(),
            filter: self.directory.filter().to_string(),
            total_processes: self.directory.len(),
            notice: self.notice.clone(),
            notice_serial: self.notice_serial,
        };
        self.view_tx.send_replace(view);
    }

    /// Process events until a quit intent, then shut down.
    pub async fn run(mut self) {
        while self.is_running() {
            match self.next_event().await {
                Some(event) => self.handle(event),
                None => break,
            }
        }
        self.shutdown().await;
    }

    /// Close the push connection gracefully and stop the timer.
    pub async fn shutdown(&mut self) {
        let push = self.push_task.take();
        self.dispose();
        if let Some(push) = push {
            push.finish_within(PUSH_CLOSE_GRACE).await;
        }
    }

    /// Stop the poll timer and tell the push channel to close. The push task
    /// is detached so it can close its connection on its own. Fetches
    /// already in flight are left alone; their results are discarded.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(shutdown) = self.push_shutdown.take() {
            let _ = shutdown.send(());
        }
        self.poll_task = None;
        if let Some(push) = self.push_task.take() {
            push.detach();
        }
        debug!("controller disposed");
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.dispose();
    }
}
