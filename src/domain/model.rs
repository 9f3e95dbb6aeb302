use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ExplorerError;

/// Backend identifier of a course. Accepts either a string or an integer on
/// the wire and is normalised to its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CourseId(String);

impl CourseId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CourseId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for CourseId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for CourseId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => CourseId(s),
            RawId::Unsigned(n) => CourseId(n.to_string()),
            RawId::Signed(n) => CourseId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    #[serde(rename(serialize = "id", deserialize = "_id"), alias = "id")]
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    /// Hours.
    #[serde(default)]
    pub duration: f64,
    #[serde(default, deserialize_with = "lenient_instructor")]
    pub instructor: Option<Instructor>,
}

// An unpopulated reference (bare id string) counts as no instructor.
fn lenient_instructor<'de, D>(deserializer: D) -> Result<Option<Instructor>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Aggregate rating of one course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RatingPayload")]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: u64,
}

impl RatingSummary {
    pub const MAX_RATING: f64 = 5.0;

    pub const ZERO: RatingSummary = RatingSummary {
        average_rating: 0.0,
        review_count: 0,
    };

    pub fn new(average_rating: f64, review_count: u64) -> Self {
        let average_rating = if average_rating.is_finite() {
            average_rating.clamp(0.0, Self::MAX_RATING)
        } else {
            0.0
        };
        Self {
            average_rating,
            review_count,
        }
    }
}

/// Wire shape of the ratings endpoint; absent or null fields read as zero.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingPayload {
    #[serde(default)]
    average_rating: Option<f64>,
    #[serde(default)]
    review_count: Option<u64>,
}

impl From<RatingPayload> for RatingSummary {
    fn from(payload: RatingPayload) -> Self {
        RatingSummary::new(
            payload.average_rating.unwrap_or(0.0),
            payload.review_count.unwrap_or(0),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    WebDevelopment,
    MobileDevelopment,
    DataScience,
    MachineLearning,
    UiUxDesign,
    DigitalMarketing,
    Business,
    Language,
    Music,
    Photography,
    Other,
}

impl Category {
    /// Label of the "no category filter" choice.
    pub const ALL_LABEL: &'static str = "All Categories";

    pub const ALL: [Category; 11] = [
        Category::WebDevelopment,
        Category::MobileDevelopment,
        Category::DataScience,
        Category::MachineLearning,
        Category::UiUxDesign,
        Category::DigitalMarketing,
        Category::Business,
        Category::Language,
        Category::Music,
        Category::Photography,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::WebDevelopment => "Web Development",
            Category::MobileDevelopment => "Mobile Development",
            Category::DataScience => "Data Science",
            Category::MachineLearning => "Machine Learning",
            Category::UiUxDesign => "UI/UX Design",
            Category::DigitalMarketing => "Digital Marketing",
            Category::Business => "Business",
            Category::Language => "Language",
            Category::Music => "Music",
            Category::Photography => "Photography",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ExplorerError::UnknownCategoryError {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => Category::ALL_LABEL,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(Category::ALL_LABEL) {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Upper end of the price selector; selecting it means "any price".
pub const PRICE_RANGE_MAX: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PriceCap {
    #[default]
    Unbounded,
    AtMost(f64),
}

impl PriceCap {
    /// Maps a selector value onto a cap; the top of the range lifts the cap.
    pub fn from_max_price(value: f64) -> Self {
        if value >= PRICE_RANGE_MAX {
            PriceCap::Unbounded
        } else {
            PriceCap::AtMost(value)
        }
    }

    pub fn label(&self) -> String {
        match self {
            PriceCap::Unbounded => "All Courses".to_string(),
            PriceCap::AtMost(cap) => format!("₹{}", cap),
        }
    }
}

/// Snapshot of the active filters. Replaced wholesale on every input change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: CategoryFilter,
    pub max_price: PriceCap,
}

impl FilterCriteria {
    pub fn with_search_term(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    pub fn with_max_price(mut self, max_price: PriceCap) -> Self {
        self.max_price = max_price;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_from_backend_json() {
        let course: Course = serde_json::from_value(serde_json::json!({
            "_id": "65f1c0ffee",
            "name": "Python Basics",
            "description": "Learn Python",
            "category": "Data Science",
            "price": 500,
            "duration": 12,
            "instructor": {"name": "Asha", "email": "asha@example.com"}
        }))
        .unwrap();

        assert_eq!(course.id.as_str(), "65f1c0ffee");
        assert_eq!(course.price, 500.0);
        assert_eq!(course.instructor.unwrap().name, "Asha");
    }

    #[test]
    fn test_course_numeric_id_and_unpopulated_instructor() {
        let course: Course = serde_json::from_value(serde_json::json!({
            "id": 1,
            "name": "Guitar 101",
            "category": "Music",
            "price": 1500.5,
            "instructor": "65f1c0ffee"
        }))
        .unwrap();

        assert_eq!(course.id, CourseId::from(1));
        assert_eq!(course.description, "");
        assert!(course.instructor.is_none());
    }

    #[test]
    fn test_rating_defaults_missing_fields_to_zero() {
        let rating: RatingSummary =
            serde_json::from_value(serde_json::json!({"averageRating": null})).unwrap();
        assert_eq!(rating, RatingSummary::ZERO);

        let rating: RatingSummary =
            serde_json::from_value(serde_json::json!({"averageRating": 4.5, "reviewCount": 8}))
                .unwrap();
        assert_eq!(rating, RatingSummary::new(4.5, 8));
    }

    #[test]
    fn test_rating_is_clamped() {
        assert_eq!(RatingSummary::new(7.0, 1).average_rating, 5.0);
        assert_eq!(RatingSummary::new(-1.0, 1).average_rating, 0.0);
        assert_eq!(RatingSummary::new(f64::NAN, 1).average_rating, 0.0);
    }

    #[test]
    fn test_category_filter_parsing() {
        assert_eq!(
            "All Categories".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::All
        );
        assert_eq!(
            "ui/ux design".parse::<CategoryFilter>().unwrap(),
            CategoryFilter::Only(Category::UiUxDesign)
        );
        assert!("Cooking".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_price_cap_from_max_price() {
        assert_eq!(PriceCap::from_max_price(10_000.0), PriceCap::Unbounded);
        assert_eq!(PriceCap::from_max_price(9_900.0), PriceCap::AtMost(9_900.0));
        assert_eq!(PriceCap::Unbounded.label(), "All Courses");
        assert_eq!(PriceCap::AtMost(1000.0).label(), "₹1000");
    }
}
