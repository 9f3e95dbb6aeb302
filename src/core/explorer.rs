use crate::core::filter::filter_courses;
use crate::core::rating_cache::{populate_ratings, PopulateReport, RatingCache};
use crate::domain::model::{
    CategoryFilter, Course, CourseId, FilterCriteria, PriceCap, RatingSummary,
};
use crate::domain::ports::{ConfigProvider, CourseStore};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct ExplorerOptions {
    pub concurrent_requests: usize,
    pub fetch_ratings: bool,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            concurrent_requests: 5,
            fetch_ratings: true,
        }
    }
}

impl ExplorerOptions {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            concurrent_requests: config.concurrent_requests(),
            fetch_ratings: config.ratings_enabled(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    /// The fetch failed and the list was treated as empty.
    Failed,
    /// The explorer was torn down before the fetch resolved.
    Discarded,
    AlreadyLoaded,
}

#[derive(Debug, Clone)]
pub struct CourseCard {
    pub course: Arc<Course>,
    pub rating: Option<RatingSummary>,
}

/// Everything the view needs to draw one frame.
#[derive(Debug, Clone)]
pub struct ExplorerView {
    pub loading: bool,
    pub criteria: FilterCriteria,
    pub total_courses: usize,
    pub cards: Vec<CourseCard>,
}

/// Owns the explorer state: the fetched list, the active criteria, the
/// filtered list derived from both, and the rating cache.
///
/// The filtered list is recomputed synchronously on every change to the
/// list or the criteria. After each await the liveness token is checked
/// before any state is touched; [`CourseExplorer::teardown`] (or dropping
/// the explorer) cancels it.
pub struct CourseExplorer<S: CourseStore> {
    store: S,
    options: ExplorerOptions,
    liveness: CancellationToken,
    ratings: RatingCache,
    all_courses: Vec<Arc<Course>>,
    filtered: Vec<Arc<Course>>,
    criteria: FilterCriteria,
    loading: bool,
    list_requested: bool,
}

impl<S: CourseStore> CourseExplorer<S> {
    pub fn new(store: S, options: ExplorerOptions) -> Self {
        Self {
            store,
            options,
            liveness: CancellationToken::new(),
            ratings: RatingCache::new(),
            all_courses: Vec::new(),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            loading: false,
            list_requested: false,
        }
    }

    pub fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.set_criteria(criteria);
        self
    }

    /// Handle that tears the explorer down when cancelled.
    pub fn liveness_token(&self) -> CancellationToken {
        self.liveness.clone()
    }

    pub fn teardown(&self) {
        self.liveness.cancel();
    }

    pub fn is_active(&self) -> bool {
        !self.liveness.is_cancelled()
    }

    /// Loads the course list, then fills the rating cache when enabled.
    pub async fn mount(&mut self) -> (LoadOutcome, PopulateReport) {
        let outcome = self.load().await;
        let report = if self.options.fetch_ratings && !self.all_courses.is_empty() {
            self.populate_ratings().await
        } else {
            PopulateReport::default()
        };
        (outcome, report)
    }

    /// Fetches the course list. Only the first call reaches the store.
    pub async fn load(&mut self) -> LoadOutcome {
        if self.list_requested {
            return LoadOutcome::AlreadyLoaded;
        }
        if !self.is_active() {
            return LoadOutcome::Discarded;
        }
        self.list_requested = true;
        self.loading = true;

        tracing::info!("📚 Fetching course list");
        let fetched = tokio::select! {
            biased;
            _ = self.liveness.cancelled() => None,
            result = self.store.list_courses() => Some(result),
        };

        let result = match fetched {
            Some(result) if self.is_active() => result,
            _ => {
                tracing::debug!("Explorer torn down, discarding course list");
                return LoadOutcome::Discarded;
            }
        };

        let outcome = match result {
            Ok(courses) => {
                tracing::info!("✅ Loaded {} courses", courses.len());
                let count = courses.len();
                self.replace_courses(courses);
                LoadOutcome::Loaded(count)
            }
            Err(e) => {
                tracing::error!("❌ Error fetching courses: {}", e);
                self.replace_courses(Vec::new());
                LoadOutcome::Failed
            }
        };
        self.loading = false;
        outcome
    }

    /// Looks up ratings for courses not yet in the cache.
    pub async fn populate_ratings(&self) -> PopulateReport {
        let report = populate_ratings(
            &self.store,
            &self.ratings,
            &self.all_courses,
            self.options.concurrent_requests,
            &self.liveness,
        )
        .await;
        tracing::info!(
            "⭐ Ratings: {} fetched, {} failed, {} already cached",
            report.fetched,
            report.failed,
            report.skipped
        );
        report
    }

    /// Swaps in a new base list and re-filters it.
    ///
    /// Ratings for new ids are not looked up here; call
    /// [`CourseExplorer::populate_ratings`] afterwards, or use
    /// [`CourseExplorer::replace_courses_and_rate`].
    pub fn replace_courses(&mut self, courses: Vec<Course>) {
        self.all_courses = courses.into_iter().map(Arc::new).collect();
        self.refilter();
    }

    /// Swaps in a new base list, then looks up ratings for any id not yet
    /// cached when rating lookups are enabled.
    pub async fn replace_courses_and_rate(&mut self, courses: Vec<Course>) -> PopulateReport {
        self.replace_courses(courses);
        if self.options.fetch_ratings && !self.all_courses.is_empty() {
            self.populate_ratings().await
        } else {
            PopulateReport::default()
        }
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.criteria.search_term = term.into();
        self.refilter();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.criteria.category = category;
        self.refilter();
    }

    pub fn set_max_price(&mut self, max_price: PriceCap) {
        self.criteria.max_price = max_price;
        self.refilter();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refilter();
    }

    fn refilter(&mut self) {
        self.filtered = filter_courses(&self.all_courses, &self.criteria);
        tracing::debug!(
            "Filtered {} of {} courses",
            self.filtered.len(),
            self.all_courses.len()
        );
    }

    pub fn all_courses(&self) -> &[Arc<Course>] {
        &self.all_courses
    }

    pub fn filtered_courses(&self) -> &[Arc<Course>] {
        &self.filtered
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn rating(&self, id: &CourseId) -> Option<RatingSummary> {
        self.ratings.get(id)
    }

    pub fn ratings(&self) -> &RatingCache {
        &self.ratings
    }

    pub fn view(&self) -> ExplorerView {
        ExplorerView {
            loading: self.loading,
            criteria: self.criteria.clone(),
            total_courses: self.all_courses.len(),
            cards: self
                .filtered
                .iter()
                .map(|course| CourseCard {
                    course: Arc::clone(course),
                    rating: self.ratings.get(&course.id),
                })
                .collect(),
        }
    }
}

impl<S: CourseStore> Drop for CourseExplorer<S> {
    fn drop(&mut self) {
        self.liveness.cancel();
    }
}
