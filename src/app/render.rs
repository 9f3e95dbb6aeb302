use crate::core::explorer::{CourseCard, ExplorerView};
use crate::domain::model::{Course, RatingSummary};
use crate::utils::error::{ExplorerError, Result};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Cards,
    Json,
    Csv,
}

pub fn render(view: &ExplorerView, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Cards => Ok(render_cards(view)),
        OutputFormat::Json => render_json(view),
        OutputFormat::Csv => render_csv(view),
    }
}

/// Five stars; star `n` is filled when `n <= average`.
pub fn render_stars(average_rating: f64) -> String {
    (1..=5)
        .map(|star| if f64::from(star) <= average_rating { '★' } else { '☆' })
        .collect()
}

pub fn review_label(review_count: u64) -> String {
    if review_count == 1 {
        "1 review".to_string()
    } else {
        format!("{} reviews", review_count)
    }
}

fn instructor_name(course: &Course) -> &str {
    course
        .instructor
        .as_ref()
        .map(|i| i.name.as_str())
        .unwrap_or("Unknown Instructor")
}

fn render_rating(rating: &RatingSummary) -> String {
    format!(
        "{} {:.1} ({})",
        render_stars(rating.average_rating),
        rating.average_rating,
        review_label(rating.review_count)
    )
}

fn render_card(out: &mut String, card: &CourseCard) {
    let course = &card.course;
    let _ = writeln!(out, "{}", course.name);
    let _ = writeln!(out, "  {}", course.category);
    if !course.description.is_empty() {
        let _ = writeln!(out, "  {}", course.description);
    }
    let _ = writeln!(out, "  Instructor: {}", instructor_name(course));
    let _ = writeln!(out, "  Duration:   {} hours", course.duration);
    let _ = writeln!(out, "  Price:      ₹{:.2}", course.price);
    if let Some(rating) = &card.rating {
        let _ = writeln!(out, "  Rating:     {}", render_rating(rating));
    }
}

pub fn render_cards(view: &ExplorerView) -> String {
    let mut out = String::new();

    if view.loading {
        out.push_str("Loading courses...\n");
        return out;
    }

    let _ = writeln!(
        out,
        "Explore Skills: {} of {} courses | Category: {} | Max Price: {}",
        view.cards.len(),
        view.total_courses,
        view.criteria.category.label(),
        view.criteria.max_price.label()
    );
    if !view.criteria.search_term.is_empty() {
        let _ = writeln!(out, "Search: \"{}\"", view.criteria.search_term);
    }
    out.push('\n');

    if view.cards.is_empty() {
        out.push_str("No courses found\n");
        out.push_str("Try adjusting your search or filter criteria.\n");
        return out;
    }

    for (index, card) in view.cards.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        render_card(&mut out, card);
    }
    out
}

#[derive(Serialize)]
struct JsonCard<'a> {
    course: &'a Course,
    rating: Option<RatingSummary>,
}

pub fn render_json(view: &ExplorerView) -> Result<String> {
    let cards: Vec<JsonCard<'_>> = view
        .cards
        .iter()
        .map(|card| JsonCard {
            course: &card.course,
            rating: card.rating,
        })
        .collect();
    Ok(serde_json::to_string_pretty(&cards)? + "\n")
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    category: &'a str,
    price: f64,
    duration: f64,
    instructor: &'a str,
    average_rating: Option<f64>,
    review_count: Option<u64>,
}

pub fn render_csv(view: &ExplorerView) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if view.cards.is_empty() {
        writer.write_record([
            "id",
            "name",
            "category",
            "price",
            "duration",
            "instructor",
            "average_rating",
            "review_count",
        ])?;
    }
    for card in &view.cards {
        let course = &card.course;
        writer.serialize(CsvRow {
            id: course.id.as_str(),
            name: &course.name,
            category: &course.category,
            price: course.price,
            duration: course.duration,
            instructor: instructor_name(course),
            average_rating: card.rating.map(|r| r.average_rating),
            review_count: card.rating.map(|r| r.review_count),
        })?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExplorerError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| {
        ExplorerError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Category, CategoryFilter, CourseId, FilterCriteria, Instructor, PriceCap,
    };
    use std::sync::Arc;

    fn card(
        id: u64,
        name: &str,
        instructor: Option<&str>,
        rating: Option<RatingSummary>,
    ) -> CourseCard {
        CourseCard {
            course: Arc::new(Course {
                id: CourseId::from(id),
                name: name.to_string(),
                description: "Hands-on lessons".to_string(),
                category: "Music".to_string(),
                price: 1500.0,
                duration: 6.5,
                instructor: instructor.map(|name| Instructor {
                    name: name.to_string(),
                }),
            }),
            rating,
        }
    }

    fn view(cards: Vec<CourseCard>) -> ExplorerView {
        ExplorerView {
            loading: false,
            criteria: FilterCriteria::default()
                .with_category(CategoryFilter::Only(Category::Music))
                .with_max_price(PriceCap::AtMost(2000.0)),
            total_courses: 4,
            cards,
        }
    }

    #[test]
    fn test_stars_fill_up_to_average() {
        assert_eq!(render_stars(0.0), "☆☆☆☆☆");
        assert_eq!(render_stars(3.7), "★★★☆☆");
        assert_eq!(render_stars(4.0), "★★★★☆");
        assert_eq!(render_stars(5.0), "★★★★★");
    }

    #[test]
    fn test_review_label_pluralises() {
        assert_eq!(review_label(0), "0 reviews");
        assert_eq!(review_label(1), "1 review");
        assert_eq!(review_label(12), "12 reviews");
    }

    #[test]
    fn test_cards_show_course_details() {
        let out = render_cards(&view(vec![
            card(1, "Guitar 101", Some("Ravi"), Some(RatingSummary::new(4.0, 1))),
            card(2, "Piano Pieces", None, None),
        ]));

        assert!(out.contains("2 of 4 courses"));
        assert!(out.contains("Category: Music"));
        assert!(out.contains("Max Price: ₹2000"));
        assert!(out.contains("Instructor: Ravi"));
        assert!(out.contains("Instructor: Unknown Instructor"));
        assert!(out.contains("Duration:   6.5 hours"));
        assert!(out.contains("Price:      ₹1500.00"));
        assert!(out.contains("★★★★☆ 4.0 (1 review)"));
        assert_eq!(out.matches("Rating:").count(), 1);
    }

    #[test]
    fn test_empty_and_loading_states() {
        let out = render_cards(&view(Vec::new()));
        assert!(out.contains("No courses found"));
        assert!(out.contains("Try adjusting your search or filter criteria."));

        let mut loading = view(Vec::new());
        loading.loading = true;
        assert_eq!(render_cards(&loading), "Loading courses...\n");
    }

    #[test]
    fn test_json_output() {
        let out = render_json(&view(vec![card(
            1,
            "Guitar 101",
            Some("Ravi"),
            Some(RatingSummary::new(4.5, 2)),
        )]))
        .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["course"]["id"], "1");
        assert_eq!(parsed[0]["course"]["instructor"]["name"], "Ravi");
        assert_eq!(parsed[0]["rating"]["averageRating"], 4.5);
        assert_eq!(parsed[0]["rating"]["reviewCount"], 2);
    }

    #[test]
    fn test_csv_output() {
        let out = render_csv(&view(vec![
            card(1, "Guitar 101", Some("Ravi"), Some(RatingSummary::new(4.5, 2))),
            card(2, "Piano, Advanced", None, None),
        ]))
        .unwrap();

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "id,name,category,price,duration,instructor,average_rating,review_count"
        );
        assert_eq!(lines[1], "1,Guitar 101,Music,1500.0,6.5,Ravi,4.5,2");
        assert_eq!(
            lines[2],
            "2,\"Piano, Advanced\",Music,1500.0,6.5,Unknown Instructor,,"
        );
    }

    #[test]
    fn test_csv_header_without_rows() {
        let out = render_csv(&view(Vec::new())).unwrap();
        assert_eq!(
            out.trim_end(),
            "id,name,category,price,duration,instructor,average_rating,review_count"
        );
    }
}
