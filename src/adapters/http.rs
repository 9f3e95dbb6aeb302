use crate::domain::model::{Course, CourseId, RatingSummary};
use crate::domain::ports::{ConfigProvider, CourseStore};
use crate::utils::error::{ExplorerError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use url::Url;

pub const DEFAULT_COURSES_PATH: &str = "/courses";
pub const DEFAULT_RATING_PATH: &str = "/courses/{id}/ratings";

/// `CourseStore` backed by the marketplace REST API.
#[derive(Debug, Clone)]
pub struct HttpCourseStore {
    client: Client,
    base_url: String,
    courses_path: String,
    rating_path: String,
    headers: HashMap<String, String>,
}

impl HttpCourseStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            courses_path: DEFAULT_COURSES_PATH.to_string(),
            rating_path: DEFAULT_RATING_PATH.to_string(),
            headers: HashMap::new(),
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let mut store = Self::with_client(client, config.api_base_url())
            .with_paths(config.courses_path(), config.rating_path());
        store.headers = config.headers();
        Ok(store)
    }

    pub fn with_paths(mut self, courses_path: &str, rating_path: &str) -> Self {
        self.courses_path = courses_path.to_string();
        self.rating_path = rating_path.to_string();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn courses_url(&self) -> String {
        format!("{}{}", self.base_url, self.courses_path)
    }

    /// Expands the rating route for `course_id`. The id is percent-encoded
    /// as a single path segment, so `/`, `?` and `#` cannot change the route.
    pub fn rating_url(&self, course_id: &CourseId) -> Result<String> {
        let invalid_base = |reason: String| ExplorerError::InvalidConfigValueError {
            field: "api_base_url".to_string(),
            value: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid_base(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid_base("URL cannot carry a path".to_string()))?;
            segments.pop_if_empty();
            for segment in self.rating_path.split('/').filter(|s| !s.is_empty()) {
                segments.push(&segment.replace("{id}", course_id.as_str()));
            }
        }
        Ok(url.to_string())
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut request = self.client.get(url);

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        tracing::debug!("Making API request to: {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(ExplorerError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl CourseStore for HttpCourseStore {
    async fn list_courses(&self) -> Result<Vec<Course>> {
        // null 視為空列表
        let courses: Option<Vec<Course>> = self.get_json(&self.courses_url()).await?;
        Ok(courses.unwrap_or_default())
    }

    async fn get_average_rating(&self, course_id: &CourseId) -> Result<RatingSummary> {
        let url = self.rating_url(course_id)?;
        self.get_json(&url).await
    }
}
