//! JSON shapes exchanged with the host-metrics service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::process::{ProcessEntry, dedup_by_pid};
use crate::engine::sample::Sample;
use crate::error::DecodeError;

/// One push message: `{"cpu": 12.5, "ram": 40.1}`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StatsPayload {
    pub cpu: f64,
    pub ram: f64,
}

#[derive(Debug, Deserialize)]
struct ProcessPayload {
    pid: u32,
    #[serde(default)]
    name: Option<String>,
    cpu: f64,
    #[serde(default)]
    memory: Option<f64>,
}

impl From<ProcessPayload> for ProcessEntry {
    fn from(p: ProcessPayload) -> Self {
        ProcessEntry {
            pid: p.pid,
            name: p.name,
            cpu_percent: p.cpu,
            memory_percent: p.memory,
        }
    }
}

/// Values are taken as-is, including readings outside 0..=100.
pub fn decode_sample(text: &str, captured_at: DateTime<Utc>) -> Result<Sample, DecodeError> {
    let payload: StatsPayload = serde_json::from_str(text)?;
    Ok(Sample::new(captured_at, payload.cpu, payload.ram))
}

pub fn encode_sample(cpu: f64, ram: f64) -> String {
    serde_json::to_string(&StatsPayload { cpu, ram }).unwrap_or_else(|_| "{}".to_string())
}

/// Decode a `/processes` body. `null` is what the service sends for an
/// empty listing and decodes to an empty snapshot.
pub fn decode_processes(body: &[u8]) -> Result<Vec<ProcessEntry>, serde_json::Error> {
    let payload: Option<Vec<ProcessPayload>> = serde_json::from_slice(body)?;
    let entries = payload
        .unwrap_or_default()
        .into_iter()
        .map(ProcessEntry::from)
        .collect();
    Ok(dedup_by_pid(entries))
}
