//! In-memory `CourseStore` used by the unit tests.

use crate::domain::model::{Course, CourseId, RatingSummary};
use crate::domain::ports::CourseStore;
use crate::utils::error::{ExplorerError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

pub(crate) fn course(id: u64, name: &str, category: &str, price: f64) -> Course {
    Course {
        id: CourseId::from(id),
        name: name.to_string(),
        description: format!("About {}", name),
        category: category.to_string(),
        price,
        duration: 8.0,
        instructor: None,
    }
}

pub(crate) struct FakeStore {
    courses: Vec<Course>,
    list_fails: bool,
    ratings: HashMap<CourseId, RatingSummary>,
    failing: HashSet<CourseId>,
    list_gate: Mutex<Option<oneshot::Receiver<()>>>,
    rating_gates: Mutex<HashMap<CourseId, oneshot::Receiver<()>>>,
    list_calls: AtomicUsize,
    rating_calls: Mutex<HashMap<CourseId, usize>>,
}

impl FakeStore {
    pub(crate) fn new(courses: Vec<Course>) -> Self {
        Self {
            courses,
            list_fails: false,
            ratings: HashMap::new(),
            failing: HashSet::new(),
            list_gate: Mutex::new(None),
            rating_gates: Mutex::new(HashMap::new()),
            list_calls: AtomicUsize::new(0),
            rating_calls: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn failing_list() -> Self {
        let mut store = Self::new(Vec::new());
        store.list_fails = true;
        store
    }

    pub(crate) fn with_rating(mut self, id: u64, summary: RatingSummary) -> Self {
        self.ratings.insert(CourseId::from(id), summary);
        self
    }

    pub(crate) fn failing_rating(mut self, id: u64) -> Self {
        self.failing.insert(CourseId::from(id));
        self
    }

    /// `list_courses` waits until the returned sender fires or is dropped.
    pub(crate) fn gate_list(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.list_gate.lock().unwrap() = Some(rx);
        tx
    }

    /// The first rating lookup for `id` waits until the returned sender
    /// fires or is dropped.
    pub(crate) fn gate_rating(&self, id: u64) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.rating_gates
            .lock()
            .unwrap()
            .insert(CourseId::from(id), rx);
        tx
    }

    pub(crate) fn courses(&self) -> Vec<Course> {
        self.courses.clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn rating_calls(&self, id: &CourseId) -> usize {
        self.rating_calls
            .lock()
            .unwrap()
            .get(id)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl CourseStore for FakeStore {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.list_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.list_fails {
            return Err(ExplorerError::HttpStatusError {
                status: 500,
                url: "fake://courses".to_string(),
            });
        }
        Ok(self.courses.clone())
    }

    async fn get_average_rating(&self, course_id: &CourseId) -> Result<RatingSummary> {
        *self
            .rating_calls
            .lock()
            .unwrap()
            .entry(course_id.clone())
            .or_insert(0) += 1;
        let gate = self.rating_gates.lock().unwrap().remove(course_id);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if self.failing.contains(course_id) {
            return Err(ExplorerError::HttpStatusError {
                status: 503,
                url: format!("fake://courses/{}/ratings", course_id),
            });
        }
        Ok(self
            .ratings
            .get(course_id)
            .copied()
            .unwrap_or(RatingSummary::new(3.0, 1)))
    }
}
