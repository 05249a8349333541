//! Fixed-rate background task logging the book count.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use bookshelf_db::Store;
use bookshelf_kernel::settings::SchedulerSettings;

/// Spawn the count logger: first tick after `initial_delay_ms`, then every
/// `interval_ms`. A failed tick is logged and swallowed; the loop must
/// never take the process down.
pub fn spawn(store: Arc<Store>, settings: &SchedulerSettings) -> JoinHandle<()> {
    let start = Instant::now() + Duration::from_millis(settings.initial_delay_ms);
    let period = Duration::from_millis(settings.interval_ms);

    tokio::spawn(async move {
        let mut ticker = interval_at(start, period);
        loop {
            ticker.tick().await;
            match store.count_books().await {
                Ok(count) => tracing::info!(count, "number of books"),
                Err(error) => tracing::error!(%error, "book count query failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn task_keeps_running_across_ticks() {
        let store = Arc::new(Store::connect("sqlite::memory:").await.expect("store"));
        let handle = spawn(
            store,
            &SchedulerSettings {
                initial_delay_ms: 1,
                interval_ms: 2,
            },
        );

        tokio::time::sleep(Duration::from_millis(25)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
