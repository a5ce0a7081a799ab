use std::collections::VecDeque;

use chrono::{DateTime, Utc};

pub const DEFAULT_WINDOW_SIZE: usize = 20;

/// One utilization reading taken from the push channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub captured_at: DateTime<Utc>,
    pub cpu_percent: f64,
    pub ram_percent: f64,
}

impl Sample {
    pub fn new(captured_at: DateTime<Utc>, cpu_percent: f64, ram_percent: f64) -> Self {
        Self {
            captured_at,
            cpu_percent,
            ram_percent,
        }
    }
}

impl Default for Sample {
    fn default() -> Self {
        Self {
            captured_at: DateTime::<Utc>::UNIX_EPOCH,
            cpu_percent: 0.0,
            ram_percent: 0.0,
        }
    }
}

/// Fixed-capacity FIFO window of the most recent samples.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, sample: Sample) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Most recent sample, or the zero sample before anything arrived.
    pub fn current(&self) -> Sample {
        self.samples.back().copied().unwrap_or_default()
    }

    pub fn snapshot(&self) -> Vec<Sample> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SIZE)
    }
}
