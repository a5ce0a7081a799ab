use std::collections::HashSet;

#[derive(Clone, Debug, PartialEq)]
pub struct ProcessEntry {
    pub pid: u32,
    pub name: Option<String>,
    pub cpu_percent: f64,
    pub memory_percent: Option<f64>,
}

impl ProcessEntry {
    pub fn new(pid: u32, name: Option<&str>, cpu_percent: f64) -> Self {
        Self {
            pid,
            name: name.map(str::to_string),
            cpu_percent,
            memory_percent: None,
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }

    /// Case-insensitive substring match against an already lowercased needle.
    pub(crate) fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        match &self.name {
            Some(name) => name.to_lowercase().contains(needle),
            None => false,
        }
    }
}

/// Drop repeated pids, keeping the first occurrence and the original order.
pub fn dedup_by_pid(entries: Vec<ProcessEntry>) -> Vec<ProcessEntry> {
    let mut seen = HashSet::with_capacity(entries.len());
    let before = entries.len();
    let unique: Vec<ProcessEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert(entry.pid))
        .collect();
    if unique.len() != before {
        tracing::debug!(
            dropped = before - unique.len(),
            "snapshot contained duplicate pids"
        );
    }
    unique
}
