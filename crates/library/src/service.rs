use crate::error::{ErrorKind, Result};
use crate::scan::{ScanEvent, reconcile};
use crate::tracker::{Outcome, ProcessingSet, Tracker, WatchedItem};
use crate::watch::Watcher;
use crate::Context;
use exn::ResultExt;
use futures::TryStreamExt;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

/// The long-running shelving service.
///
/// Every arrival runs as its own task, so one item's stabilization delay or
/// classifier call never holds up another.
pub struct Service {
    tracker: Tracker,
}
impl Service {
    pub fn new(ctx: Context) -> Self {
        Self::with_processing(ctx, ProcessingSet::new())
    }

    /// Use an existing processing set, e.g. to inspect it from outside.
    pub fn with_processing(ctx: Context, processing: ProcessingSet) -> Self {
        Self { tracker: Tracker::new(Arc::new(ctx), processing) }
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Reconciles the inbox, then shelves new arrivals until `shutdown`
    /// resolves.
    ///
    /// The watch is registered before reconciling, so nothing landing during
    /// the scan is missed; an item reported by both is absorbed by the
    /// processing set or found to have vanished. Items still in flight at
    /// shutdown are abandoned.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<()> {
        self.prepare().await?;
        let ctx = self.tracker.context();
        let mut watcher = Watcher::new(&ctx.inbox, ctx.folders.enabled)?;
        let mut tasks = JoinSet::new();
        self.reconcile_into(&mut tasks).await?;

        let mut shutdown = pin!(shutdown);
        loop {
            tokio::select! {
                () = &mut shutdown => break,
                item = watcher.next() => match item {
                    Some(item) => self.spawn(&mut tasks, item),
                    None => exn::bail!(ErrorKind::Watch),
                },
                Some(result) = tasks.join_next() => {
                    finished(result);
                },
            }
        }
        tracing::info!(in_flight = tasks.len(), "Shutting down");
        Ok(())
    }

    /// Reconciles the inbox and waits for every existing arrival to finish.
    pub async fn run_once(&self) -> Result<Vec<Outcome>> {
        self.prepare().await?;
        let mut tasks = JoinSet::new();
        self.reconcile_into(&mut tasks).await?;
        let mut outcomes = Vec::with_capacity(tasks.len());
        while let Some(result) = tasks.join_next().await {
            outcomes.extend(finished(result));
        }
        Ok(outcomes)
    }

    async fn prepare(&self) -> Result<()> {
        let ctx = self.tracker.context();
        for directory in [&ctx.inbox, &ctx.library] {
            ctx.backend.create_dir_all(directory).await.or_raise(|| ErrorKind::Storage)?;
        }
        tracing::info!(
            inbox = %ctx.inbox.display(),
            library = %ctx.library.display(),
            delay_secs = ctx.delay.as_secs(),
            min_size = ctx.min_size,
            classifier = ctx.classifier.name(),
            storage = ctx.backend.name(),
            "Shelver started"
        );
        Ok(())
    }

    async fn reconcile_into(&self, tasks: &mut JoinSet<Outcome>) -> Result<()> {
        let mut events = pin!(reconcile(self.tracker.context()));
        while let Some(event) = events.try_next().await? {
            match event {
                ScanEvent::Discovered(item) => self.spawn(tasks, item),
                ScanEvent::DiscoveryComplete(count) => tracing::info!(count, "Startup reconciliation complete"),
                ScanEvent::Started | ScanEvent::Complete => {},
            }
        }
        Ok(())
    }

    fn spawn(&self, tasks: &mut JoinSet<Outcome>, item: WatchedItem) {
        let tracker = self.tracker.clone();
        tasks.spawn(async move { tracker.handle(item).await });
    }
}

fn finished(result: std::result::Result<Outcome, JoinError>) -> Option<Outcome> {
    match result {
        Ok(outcome) => {
            tracing::debug!(?outcome, "Arrival finished");
            Some(outcome)
        },
        Err(error) => {
            tracing::error!(error = %error, "Arrival task panicked");
            None
        },
    }
}
