pub mod explorer;
pub mod filter;
pub mod rating_cache;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{Course, CourseId, FilterCriteria, RatingSummary};
pub use crate::domain::ports::{ConfigProvider, CourseStore};
pub use crate::utils::error::Result;
