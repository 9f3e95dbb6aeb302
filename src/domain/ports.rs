use crate::domain::model::{Course, CourseId, RatingSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Source of course listings and their rating aggregates.
#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>>;
    async fn get_average_rating(&self, course_id: &CourseId) -> Result<RatingSummary>;
}

/// Connection and tuning settings, however they were resolved.
pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn courses_path(&self) -> &str;
    /// Route template containing an `{id}` placeholder.
    fn rating_path(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn headers(&self) -> HashMap<String, String>;
    /// Upper bound on rating lookups in flight at once.
    fn concurrent_requests(&self) -> usize;
    fn ratings_enabled(&self) -> bool;
}
