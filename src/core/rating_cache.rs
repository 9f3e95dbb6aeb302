use crate::domain::model::{Course, CourseId, RatingSummary};
use crate::domain::ports::CourseStore;
use futures::stream::{self, StreamExt};
use std::borrow::Borrow;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CourseId, RatingSummary>,
    in_flight: HashSet<CourseId>,
}

/// Process-local `course id -> rating` map. Entries are only ever added;
/// clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct RatingCache {
    inner: Arc<Mutex<CacheState>>,
}

impl RatingCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        // 沒有任何操作會在持鎖時 panic 後留下不一致的狀態
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, id: &CourseId) -> Option<RatingSummary> {
        self.state().entries.get(id).copied()
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.state().entries.contains_key(id)
    }

    #[cfg(test)]
    pub(crate) fn is_in_flight(&self, id: &CourseId) -> bool {
        self.state().in_flight.contains(id)
    }

    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> HashMap<CourseId, RatingSummary> {
        self.state().entries.clone()
    }

    /// Reserves `id` for a fetch. Returns false when the id is already cached
    /// or another pass is fetching it.
    pub fn try_claim(&self, id: &CourseId) -> bool {
        let mut state = self.state();
        if state.entries.contains_key(id) || state.in_flight.contains(id) {
            return false;
        }
        state.in_flight.insert(id.clone())
    }

    /// Stores a finished lookup and drops its claim. An existing entry wins,
    /// so merging completions in any order gives the same map.
    pub fn complete(&self, id: CourseId, summary: RatingSummary) -> bool {
        let mut state = self.state();
        state.in_flight.remove(&id);
        match state.entries.entry(id) {
            std::collections::hash_map::Entry::Occupied(_) => false,
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(summary);
                true
            }
        }
    }

    /// Drops a claim without storing anything, letting a later pass retry.
    pub fn release(&self, id: &CourseId) {
        self.state().in_flight.remove(id);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub requested: usize,
    pub fetched: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Claimed lookups abandoned because the owner was torn down.
    pub discarded: usize,
}

/// Fetches the rating of every course in `courses` that has no cache entry,
/// at most `concurrency` at a time.
///
/// A failed lookup is logged and cached as [`RatingSummary::ZERO`]; it never
/// stops sibling lookups. Once `liveness` is cancelled nothing more is
/// written to the cache and outstanding claims are released.
pub async fn populate_ratings<S, C>(
    store: &S,
    cache: &RatingCache,
    courses: &[C],
    concurrency: usize,
    liveness: &CancellationToken,
) -> PopulateReport
where
    S: CourseStore + ?Sized,
    C: Borrow<Course>,
{
    let mut report = PopulateReport {
        requested: courses.len(),
        ..PopulateReport::default()
    };

    let mut claimed = Vec::new();
    for course in courses {
        let id = &course.borrow().id;
        if cache.try_claim(id) {
            claimed.push(id.clone());
        } else {
            report.skipped += 1;
        }
    }

    if claimed.is_empty() {
        tracing::debug!("All {} ratings already cached", report.requested);
        return report;
    }

    tracing::debug!(
        "Fetching {} ratings ({} skipped, concurrency {})",
        claimed.len(),
        report.skipped,
        concurrency
    );

    let mut pending: HashSet<CourseId> = claimed.iter().cloned().collect();
    let mut lookups = stream::iter(claimed)
        .map(|id| async move {
            let outcome = store.get_average_rating(&id).await;
            (id, outcome)
        })
        .buffer_unordered(concurrency.max(1));

    loop {
        tokio::select! {
            biased;
            _ = liveness.cancelled() => {
                tracing::debug!("Rating population abandoned after teardown");
                break;
            }
            next = lookups.next() => {
                let Some((id, outcome)) = next else { break };
                pending.remove(&id);
                let summary = match outcome {
                    Ok(summary) => {
                        report.fetched += 1;
                        summary
                    }
                    Err(e) => {
                        tracing::warn!("⚠️ Error fetching rating for course {}: {}", id, e);
                        report.failed += 1;
                        RatingSummary::ZERO
                    }
                };
                cache.complete(id, summary);
            }
        }
    }

    report.discarded = pending.len();
    for id in &pending {
        cache.release(id);
    }

    report
}
