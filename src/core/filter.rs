use crate::domain::model::{Course, CategoryFilter, FilterCriteria, PriceCap};
use std::borrow::Borrow;

/// Stable filter over `courses`: keeps every course passing the search,
/// category and price predicates, in input order.
///
/// Generic over the element handle so callers holding `&Course` or
/// `Arc<Course>` get references back instead of copies.
pub fn filter_courses<C>(courses: &[C], criteria: &FilterCriteria) -> Vec<C>
where
    C: Borrow<Course> + Clone,
{
    let needle = criteria.search_term.to_lowercase();
    courses
        .iter()
        .filter(|course| passes(Borrow::<Course>::borrow(*course), &needle, criteria))
        .cloned()
        .collect()
}

fn passes(course: &Course, needle: &str, criteria: &FilterCriteria) -> bool {
    matches_search(course, needle)
        && matches_category(course, &criteria.category)
        && matches_price(course, &criteria.max_price)
}

// `needle` is already lowercased
fn matches_search(course: &Course, needle: &str) -> bool {
    needle.is_empty()
        || course.name.to_lowercase().contains(needle)
        || course.description.to_lowercase().contains(needle)
}

fn matches_category(course: &Course, category: &CategoryFilter) -> bool {
    match category {
        CategoryFilter::All => true,
        CategoryFilter::Only(wanted) => course.category == wanted.as_str(),
    }
}

fn matches_price(course: &Course, max_price: &PriceCap) -> bool {
    match max_price {
        PriceCap::Unbounded => true,
        PriceCap::AtMost(cap) => course.price <= *cap,
    }
}
