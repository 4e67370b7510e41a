use super::error::ScheduleError;
use super::indexer::HandIndexer;
use super::schedule::Schedule;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::OnceLock;

type Cell = Arc<OnceLock<Result<Arc<HandIndexer>, ScheduleError>>>;

static INDEXERS: std::sync::LazyLock<Mutex<HashMap<Schedule, Cell>>> =
    std::sync::LazyLock::new(|| Mutex::new(HashMap::new()));

/// Process-wide indexer for a schedule, built at most once.
///
/// Concurrent first callers for the same schedule block on a single build;
/// callers for other schedules are not held up by it, since the map lock is
/// released before building. Failed builds are remembered and replayed.
pub fn indexer(schedule: &Schedule) -> Result<Arc<HandIndexer>, ScheduleError> {
    let cell = INDEXERS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .entry(schedule.clone())
        .or_default()
        .clone();
    cell.get_or_init(|| {
        log::info!("building hand indexer {}", schedule);
        HandIndexer::try_from(schedule.clone()).map(Arc::new)
    })
    .clone()
}

/// Number of schedules requested so far.
pub fn cached() -> usize {
    INDEXERS
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .len()
}
