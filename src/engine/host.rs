use async_trait::async_trait;

use super::process::ProcessEntry;
use crate::error::FetchError;

/// Pull side of the host-metrics service.
#[async_trait]
pub trait HostService: Send + Sync {
    /// One complete process snapshot. An empty list is a valid snapshot.
    async fn fetch_processes(&self) -> Result<Vec<ProcessEntry>, FetchError>;

    /// Ask the host to terminate `pid`. `Ok` means the command was
    /// acknowledged, not that the process has exited.
    async fn kill(&self, pid: u32) -> Result<(), FetchError>;
}
