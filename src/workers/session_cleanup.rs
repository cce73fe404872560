use crate::srs::clock;
use crate::store::Store;

pub async fn run(store: &Store) {
    let today = clock::today();
    tracing::debug!(today = %today, "session_cleanup: start");
    match store.cleanup_stale_sessions(today) {
        Ok(count) => tracing::info!(cleaned = count, "session_cleanup: done"),
        Err(e) => tracing::error!(error = %e, "session_cleanup failed"),
    }
}
