//! Process-wide entry point for sync runs, shared by the HTTP endpoint and
//! the scheduler. At most one run is in flight at a time.

use std::sync::Arc;

use dharma_sync::{
    run_sync_command, CatalogSource, CatalogStore, SyncCommand, SyncOptions, SyncReport,
};
use tokio::{sync::Mutex, task::JoinError};

#[derive(Clone)]
pub struct SyncRunner {
    source: Arc<dyn CatalogSource>,
    store: Arc<dyn CatalogStore>,
    options: SyncOptions,
    pub(crate) guard: Arc<Mutex<()>>,
}

impl SyncRunner {
    pub fn new(
        source: Arc<dyn CatalogSource>,
        store: Arc<dyn CatalogStore>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            store,
            options,
            guard: Arc::new(Mutex::new(())),
        }
    }

    /// Runs `command` unless another run holds the guard, in which case
    /// `Ok(None)` is returned immediately.
    ///
    /// The run executes on its own task and holds the guard until it
    /// finishes, so dropping the returned future does not stop it.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError`] if the sync task panicked.
    pub async fn try_run(
        &self,
        command: SyncCommand,
        skip_processing: bool,
        max_pages: Option<u32>,
    ) -> Result<Option<SyncReport>, JoinError> {
        let Ok(running) = Arc::clone(&self.guard).try_lock_owned() else {
            tracing::warn!(%command, "sync already in progress");
            return Ok(None);
        };

        let source = Arc::clone(&self.source);
        let store = Arc::clone(&self.store);
        let options = self
            .options
            .clone()
            .with_skip_processing(skip_processing)
            .with_max_pages(max_pages);

        let handle = tokio::spawn(async move {
            let report =
                run_sync_command(command, source.as_ref(), store.as_ref(), &options).await;
            drop(running);
            report
        });

        handle.await.map(Some)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.guard.try_lock().is_err()
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
