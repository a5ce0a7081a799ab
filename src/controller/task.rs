use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

/// Owns a spawned task and aborts it when dropped.
#[derive(Debug)]
pub(crate) struct TaskGuard {
    handle: Option<JoinHandle<()>>,
}

impl TaskGuard {
    pub(crate) fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            handle: Some(tokio::spawn(future)),
        }
    }

    /// Let the task finish on its own for up to `grace`, then abort it.
    pub(crate) async fn finish_within(mut self, grace: Duration) {
        if let Some(mut handle) = self.handle.take()
            && tokio::time::timeout(grace, &mut handle).await.is_err()
        {
            handle.abort();
        }
    }
}

impl TaskGuard {
    /// Release the task without aborting it; it runs to completion on its own.
    pub(crate) fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
