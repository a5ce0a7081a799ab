use super::alert::AlertState;
use super::process::ProcessEntry;
use super::sample::Sample;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Last user-relevant outcome (kill acknowledged, fetch failed).
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything the renderer needs for one frame. Rebuilt on every state change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewModel {
    pub history: Vec<Sample>,
    pub latest: Sample,
    pub alert: AlertState,
    pub visible_processes: Vec<ProcessEntry>,
    pub filter: String,
    pub total_processes: usize,
    pub notice: Option<Notice>,
    /// Bumped every time a notice is raised, even when its text repeats.
    pub notice_serial: u64,
}
