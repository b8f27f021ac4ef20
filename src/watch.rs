//! Watch mode.
//!
//! Subscribes to recursive filesystem events under the project root and
//! re-copies each changed README in its own spawned task. There is no
//! debouncing and no ordering between tasks. Indexes, assets and
//! passthrough content are only refreshed by a full run.

use crate::collect::Collector;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// Events buffered between the notify thread and the async loop.
const EVENT_BUFFER: usize = 256;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("File watcher error: {0}")]
    Notify(#[from] notify::Error),
    #[error("File watcher stopped delivering events")]
    Closed,
}

/// Root-relative READMEs an event asks to re-copy.
///
/// Only create and modify events count; removals and access are ignored.
pub fn event_targets(collector: &Collector, event: &Event) -> Vec<String> {
    if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
        return Vec::new();
    }
    event
        .paths
        .iter()
        .filter_map(|path| collector.watch_target(path))
        .collect()
}

/// Watch the collector's root until the process is terminated.
///
/// Expects a full run to have happened already.
pub async fn watch(collector: Arc<Collector>) -> Result<(), WatchError> {
    let (tx, mut rx) = mpsc::channel::<Event>(EVENT_BUFFER);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                let _ = tx.blocking_send(event);
            }
            Err(e) => error!(error = %e, "file watcher error"),
        },
        notify::Config::default(),
    )?;
    watcher.watch(collector.root(), RecursiveMode::Recursive)?;
    info!(root = %collector.root().display(), "watching for changes");

    while let Some(event) = rx.recv().await {
        for rel in event_targets(&collector, &event) {
            info!(source = %rel, "change detected");
            let collector = Arc::clone(&collector);
            tokio::spawn(async move {
                match collector.copy_file(&rel).await {
                    Ok(record) => debug!(destination = %record.destination, "re-copied"),
                    Err(e) if e.is_not_found() => info!(source = %rel, "file vanished before copy"),
                    Err(e) => error!(source = %rel, error = %e, "failed to copy changed file"),
                }
            });
        }
    }

    // The sender lives in the watcher callback; keep the watcher alive until here.
    drop(watcher);
    Err(WatchError::Closed)
}
