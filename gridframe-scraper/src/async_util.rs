//! Drive an async task while draining its event channel.

use std::future::Future;

use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};

/// Maximum time to drain remaining events after the task completes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Run `task` to completion, calling `on_event` for every event received on
/// `event_rx`. Events still queued when the task finishes are delivered
/// before returning, bounded by a drain timeout in case a sender leaked.
pub async fn run_with_events<F, E, R>(
    task: F,
    mut event_rx: mpsc::UnboundedReceiver<E>,
    mut on_event: impl FnMut(E),
) -> R
where
    F: Future<Output = R>,
{
    tokio::pin!(task);

    let result = loop {
        tokio::select! {
            r = &mut task => break Some(r),
            event = event_rx.recv() => match event {
                Some(e) => on_event(e),
                None => break None,
            },
        }
    };

    match result {
        Some(r) => {
            let deadline = Instant::now() + DRAIN_TIMEOUT;
            loop {
                match tokio::time::timeout_at(deadline, event_rx.recv()).await {
                    Ok(Some(e)) => on_event(e),
                    Ok(None) => break,
                    Err(_) => {
                        log::warn!(
                            "run_with_events: drain timed out after {}s",
                            DRAIN_TIMEOUT.as_secs()
                        );
                        break;
                    }
                }
            }
            r
        }
        // Channel closed first: nothing more to deliver
        None => task.await,
    }
}
