//! In-process host backed by `sysinfo`, for running without the metrics
//! service. Produces the same payloads the service would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};
use tokio::sync::oneshot;
use tokio::time::{Instant, interval_at};

use super::PushChannel;
use super::wire::encode_sample;
use crate::controller::event::{PushMessage, PushSink};
use crate::engine::host::HostService;
use crate::engine::process::ProcessEntry;
use crate::error::FetchError;

const ENDPOINT: &str = "local";

pub struct LocalHost {
    sys: Arc<Mutex<System>>,
    max_processes: usize,
}

impl LocalHost {
    pub fn new(max_processes: usize) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing().with_memory().with_cpu(),
        );
        Self {
            sys: Arc::new(Mutex::new(sys)),
            max_processes,
        }
    }

    async fn with_system<T, F>(&self, f: F) -> Result<T, FetchError>
    where
        T: Send + 'static,
        F: FnOnce(&mut System) -> Result<T, FetchError> + Send + 'static,
    {
        let sys = Arc::clone(&self.sys);
        tokio::task::spawn_blocking(move || {
            let mut guard = sys.lock().map_err(|_| FetchError::Transport {
                endpoint: ENDPOINT.to_string(),
                message: "system handle poisoned".to_string(),
            })?;
            f(&mut guard)
        })
        .await
        .map_err(|e| FetchError::Transport {
            endpoint: ENDPOINT.to_string(),
            message: e.to_string(),
        })?
    }
}

fn memory_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Lowest pids first, unnamed processes skipped, at most `limit` entries.
fn list_processes(sys: &mut System, limit: usize) -> Vec<ProcessEntry> {
    sys.refresh_memory();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing().with_memory().with_cpu(),
    );
    let total = sys.total_memory();

    let mut entries: Vec<ProcessEntry> = sys
        .processes()
        .iter()
        .filter_map(|(pid, process)| {
            let name = process.name().to_string_lossy().to_string();
            if name.is_empty() {
                return None;
            }
            Some(ProcessEntry {
                pid: pid.as_u32(),
                name: Some(name),
                cpu_percent: f64::from(process.cpu_usage()),
                memory_percent: Some(memory_percent(process.memory(), total)),
            })
        })
        .collect();
    entries.sort_unstable_by_key(|e| e.pid);
    entries.truncate(limit);
    entries
}

fn kill_pid(sys: &mut System, pid: u32) -> Result<(), FetchError> {
    let sys_pid = Pid::from_u32(pid);
    sys.refresh_processes(ProcessesToUpdate::Some(&[sys_pid]), true);
    let rejected = |message: &str| FetchError::Rejected {
        pid,
        message: message.to_string(),
    };
    let Some(process) = sys.process(sys_pid) else {
        return Err(rejected("process not found"));
    };
    match process.kill_with(Signal::Term) {
        Some(true) => Ok(()),
        Some(false) => Err(rejected("failed to send SIGTERM")),
        // Signal not supported on this platform, fall back to kill()
        None if process.kill() => Ok(()),
        None => Err(rejected("signal not delivered")),
    }
}

#[async_trait]
impl HostService for LocalHost {
    async fn fetch_processes(&self) -> Result<Vec<ProcessEntry>, FetchError> {
        let limit = self.max_processes;
        self.with_system(move |sys| Ok(list_processes(sys, limit)))
            .await
    }

    async fn kill(&self, pid: u32) -> Result<(), FetchError> {
        self.with_system(move |sys| kill_pid(sys, pid)).await
    }
}

/// Samples global CPU and memory on a fixed interval.
pub struct LocalPushChannel {
    period: Duration,
}

impl LocalPushChannel {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(100)),
        }
    }
}

#[async_trait]
impl PushChannel for LocalPushChannel {
    async fn pump(self: Box<Self>, sink: PushSink, mut shutdown: oneshot::Receiver<()>) {
        let mut sys = System::new();
        sys.refresh_cpu_usage();
        sys.refresh_memory();
        if !sink.deliver(PushMessage::Opened) {
            return;
        }

        // CPU usage needs two refreshes, so the first reading waits a period.
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    sys.refresh_cpu_usage();
                    sys.refresh_memory();
                    let payload = encode_sample(
                        f64::from(sys.global_cpu_usage()),
                        memory_percent(sys.used_memory(), sys.total_memory()),
                    );
                    if !sink.deliver(PushMessage::Payload(payload)) {
                        return;
                    }
                }
            }
        }
        sink.deliver(PushMessage::Closed(None));
    }
}
