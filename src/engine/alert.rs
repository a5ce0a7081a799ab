use super::sample::Sample;

pub const DEFAULT_CPU_THRESHOLD: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertReason {
    #[default]
    None,
    HighCpu,
}

impl AlertReason {
    pub fn label(self) -> &'static str {
        match self {
            AlertReason::None => "none",
            AlertReason::HighCpu => "high_cpu",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlertState {
    pub active: bool,
    pub reason: AlertReason,
}

/// Stateless CPU alert rule. Every sample is judged on its own, so the
/// alert flickers when readings hover around the threshold.
#[derive(Debug, Clone, Copy)]
pub struct AlertEvaluator {
    cpu_threshold: f64,
}

impl AlertEvaluator {
    pub fn new(cpu_threshold: f64) -> Self {
        Self { cpu_threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.cpu_threshold
    }

    pub fn evaluate(&self, sample: &Sample) -> AlertState {
        if sample.cpu_percent > self.cpu_threshold {
            AlertState {
                active: true,
                reason: AlertReason::HighCpu,
            }
        } else {
            AlertState::default()
        }
    }
}

impl Default for AlertEvaluator {
    fn default() -> Self {
        Self::new(DEFAULT_CPU_THRESHOLD)
    }
}
