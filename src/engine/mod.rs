//! Transport-free dashboard state: sample window, alert rule, process
//! directory and the derived view model.

pub mod alert;
pub mod directory;
pub mod host;
pub mod process;
pub mod sample;
pub mod view;

pub use alert::{AlertEvaluator, AlertReason, AlertState};
pub use directory::{FetchTicket, ProcessDirectory};
pub use host::HostService;
pub use process::ProcessEntry;
pub use sample::{Sample, SampleBuffer};
pub use view::{Notice, NoticeLevel, ViewModel};
