use std::sync::Arc;

use super::host::HostService;
use super::process::{ProcessEntry, dedup_by_pid};
use crate::error::{EngineError, FetchError, Result};

/// Handle for one issued fetch. Results are only applied when their
/// ticket is newer than the last applied one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

#[derive(Debug, Default)]
pub struct ProcessDirectory {
    snapshot: Arc<Vec<ProcessEntry>>,
    filter: String,
    needle: String,
    issued_seq: u64,
    applied_seq: u64,
}

impl ProcessDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_refresh(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        FetchTicket {
            seq: self.issued_seq,
        }
    }

    /// Apply the outcome of the fetch behind `ticket`.
    ///
    /// A success replaces the stored snapshot in one swap. A failure leaves
    /// it untouched and is handed back. Either outcome is reported as
    /// [`EngineError::Stale`] instead when a newer fetch was already applied.
    pub fn complete_refresh(
        &mut self,
        ticket: FetchTicket,
        result: std::result::Result<Vec<ProcessEntry>, FetchError>,
    ) -> Result<()> {
        if ticket.seq <= self.applied_seq {
            return Err(EngineError::Stale {
                seq: ticket.seq,
                applied: self.applied_seq,
            });
        }
        let entries = result?;
        self.snapshot = Arc::new(dedup_by_pid(entries));
        self.applied_seq = ticket.seq;
        Ok(())
    }

    pub async fn refresh<H>(&mut self, host: &H) -> Result<()>
    where
        H: HostService + ?Sized,
    {
        let ticket = self.begin_refresh();
        let result = host.fetch_processes().await;
        self.complete_refresh(ticket, result)
    }

    /// Send a termination command, then refresh once if it was acknowledged.
    pub async fn kill<H>(&mut self, host: &H, pid: u32) -> Result<()>
    where
        H: HostService + ?Sized,
    {
        host.kill(pid).await?;
        self.refresh(host).await
    }

    pub fn set_filter(&mut self, term: impl Into<String>) {
        self.filter = term.into();
        self.needle = self.filter.to_lowercase();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn visible(&self) -> Vec<ProcessEntry> {
        self.snapshot
            .iter()
            .filter(|entry| entry.matches(&self.needle))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.snapshot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(pid: u32, name: Option<&str>) -> ProcessEntry {
        ProcessEntry::new(pid, name, 1.0)
    }

    fn names(entries: &[ProcessEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.display_name()).collect()
    }

    struct FakeHost {
        processes: Mutex<Vec<ProcessEntry>>,
        kill_ok: bool,
        fetches: AtomicUsize,
    }

    impl FakeHost {
        fn new(processes: Vec<ProcessEntry>, kill_ok: bool) -> Self {
            Self {
                processes: Mutex::new(processes),
                kill_ok,
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl HostService for FakeHost {
        async fn fetch_processes(&self) -> std::result::Result<Vec<ProcessEntry>, FetchError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.processes.lock().unwrap().clone())
        }

        async fn kill(&self, pid: u32) -> std::result::Result<(), FetchError> {
            if self.kill_ok {
                self.processes.lock().unwrap().retain(|p| p.pid != pid);
                Ok(())
            } else {
                Err(FetchError::Status {
                    endpoint: "/kill".into(),
                    status: 500,
                })
            }
        }
    }

    fn loaded(entries: Vec<ProcessEntry>) -> ProcessDirectory {
        let mut directory = ProcessDirectory::new();
        let ticket = directory.begin_refresh();
        directory.complete_refresh(ticket, Ok(entries)).unwrap();
        directory
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut directory = loaded(vec![entry(1, Some("Chrome")), entry(2, Some("systemd"))]);
        directory.set_filter("chr");
        assert_eq!(names(&directory.visible()), vec!["Chrome"]);

        directory.set_filter("SYS");
        assert_eq!(names(&directory.visible()), vec!["systemd"]);
    }

    #[test]
    fn unnamed_entries_only_visible_without_filter() {
        let mut directory = loaded(vec![entry(1, None), entry(2, Some("bash"))]);
        assert_eq!(directory.visible().len(), 2);

        directory.set_filter("a");
        assert_eq!(names(&directory.visible()), vec!["bash"]);
    }

    #[test]
    fn set_filter_does_not_issue_fetch() {
        let mut directory = ProcessDirectory::new();
        directory.set_filter("x");
        let ticket = directory.begin_refresh();
        assert_eq!(ticket.seq(), 1);
        assert_eq!(directory.filter(), "x");
    }

    #[test]
    fn failed_refresh_keeps_snapshot() {
        let mut directory = loaded(vec![entry(1, Some("init"))]);
        let ticket = directory.begin_refresh();
        let err = directory
            .complete_refresh(
                ticket,
                Err(FetchError::Transport {
                    endpoint: "/processes".into(),
                    message: "connection refused".into(),
                }),
            )
            .unwrap_err();
        assert!(matches!(err, EngineError::Fetch(_)));
        assert_eq!(names(&directory.visible()), vec!["init"]);
    }

    #[test]
    fn later_issued_fetch_wins_when_it_completes_first() {
        let mut directory = ProcessDirectory::new();
        let a = directory.begin_refresh();
        let b = directory.begin_refresh();

        directory
            .complete_refresh(b, Ok(vec![entry(2, Some("from_b"))]))
            .unwrap();
        let err = directory
            .complete_refresh(a, Ok(vec![entry(1, Some("from_a"))]))
            .unwrap_err();

        assert!(err.is_stale());
        assert_eq!(names(&directory.visible()), vec!["from_b"]);
    }

    #[test]
    fn failed_newer_fetch_lets_older_success_apply() {
        let mut directory = ProcessDirectory::new();
        let a = directory.begin_refresh();
        let b = directory.begin_refresh();

        let err = directory
            .complete_refresh(
                b,
                Err(FetchError::Status {
                    endpoint: "/processes".into(),
                    status: 503,
                }),
            )
            .unwrap_err();
        assert!(!err.is_stale());

        directory
            .complete_refresh(a, Ok(vec![entry(1, Some("older"))]))
            .unwrap();
        assert_eq!(names(&directory.visible()), vec!["older"]);
    }

    #[test]
    fn in_order_completions_both_apply() {
        let mut directory = ProcessDirectory::new();
        let a = directory.begin_refresh();
        let b = directory.begin_refresh();
        directory.complete_refresh(a, Ok(vec![entry(1, Some("from_a"))])).unwrap();
        directory.complete_refresh(b, Ok(vec![entry(2, Some("from_b"))])).unwrap();
        assert_eq!(names(&directory.visible()), vec!["from_b"]);
    }

    #[test]
    fn empty_snapshot_is_valid() {
        let mut directory = loaded(vec![entry(1, Some("init"))]);
        let ticket = directory.begin_refresh();
        directory.complete_refresh(ticket, Ok(Vec::new())).unwrap();
        assert!(directory.is_empty());
        assert!(directory.visible().is_empty());
    }

    #[tokio::test]
    async fn refresh_twice_is_idempotent() {
        let host = FakeHost::new(vec![entry(1, Some("a")), entry(2, Some("b"))], true);
        let mut directory = ProcessDirectory::new();
        directory.refresh(&host).await.unwrap();
        let first = directory.visible();
        directory.refresh(&host).await.unwrap();
        assert_eq!(first, directory.visible());
    }

    #[tokio::test]
    async fn acknowledged_kill_refreshes_exactly_once() {
        let host = FakeHost::new(vec![entry(42, Some("victim")), entry(7, Some("keep"))], true);
        let mut directory = ProcessDirectory::new();
        directory.refresh(&host).await.unwrap();
        let before = host.fetches.load(Ordering::SeqCst);

        directory.kill(&host, 42).await.unwrap();

        assert_eq!(host.fetches.load(Ordering::SeqCst), before + 1);
        assert_eq!(names(&directory.visible()), vec!["keep"]);
    }

    #[tokio::test]
    async fn rejected_kill_does_not_refresh() {
        let host = FakeHost::new(vec![entry(42, Some("victim"))], false);
        let mut directory = ProcessDirectory::new();
        directory.refresh(&host).await.unwrap();
        let before = directory.visible();

        let err = directory.kill(&host, 42).await.unwrap_err();

        assert!(matches!(err, EngineError::Fetch(FetchError::Status { status: 500, .. })));
        assert_eq!(host.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(directory.visible(), before);
    }
}
