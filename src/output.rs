//! CLI output formatting.
//!
//! Output is information-first: every record leads with its positional index
//! and display name, with identifiers and details as indented context lines.
//!
//! ```text
//! Foods (2)
//! 001 Shark [avoid]
//!     Id: shark
//!     Category: Seafood
//!     Large predatory fish with very high mercury levels.
//! 002 Swordfish [avoid]
//!     ...
//! ```
//!
//! Each `format_*` function is pure and returns `Vec<String>`;
//! [`print_lines`] writes them to stdout.

use crate::catalog::{Catalog, Issue, Severity};
use crate::filter::ALL_CATEGORIES;
use crate::generate::GenerateReport;
use crate::naming::{display_label, truncate_chars};
use crate::types::{BlogPost, FoodItem};

/// Descriptions in listings are cut to this many characters.
const DESCRIPTION_PREVIEW: usize = 72;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn list_section(title: &str, items: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(first) = items.first() {
        lines.push(format!("{}{}: {}", indent(1), title, first));
        for item in &items[1..] {
            lines.push(format!("{}{}", indent(2), item));
        }
    }
    lines
}

pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Foods
// ============================================================================

pub fn format_food_results(foods: &[&FoodItem]) -> Vec<String> {
    let mut lines = vec![format!("Foods ({})", foods.len())];
    if foods.is_empty() {
        lines.push(format!("{}No foods match.", indent(1)));
        return lines;
    }
    for (i, food) in foods.iter().enumerate() {
        lines.push(format!(
            "{} {} [{}]",
            format_index(i + 1),
            food.name,
            food.safety_level
        ));
        lines.push(format!("{}Id: {}", indent(1), food.id));
        lines.push(format!(
            "{}Category: {}",
            indent(1),
            display_label(food.category.as_str())
        ));
        let preview = truncate_chars(&food.description, DESCRIPTION_PREVIEW);
        if !preview.is_empty() {
            lines.push(format!("{}{}", indent(1), preview));
        }
    }
    lines
}

pub fn format_food_detail(food: &FoodItem) -> Vec<String> {
    let mut lines = vec![
        format!("{} [{}]", food.name, food.safety_level),
        format!("{}Id: {}", indent(1), food.id),
        format!(
            "{}Category: {}",
            indent(1),
            display_label(food.category.as_str())
        ),
    ];
    if let Some(trimester) = food.trimester {
        lines.push(format!(
            "{}Trimester: {}",
            indent(1),
            display_label(trimester.as_str())
        ));
    }
    lines.push(format!("{}{}", indent(1), food.description));
    for (title, items) in [
        ("Benefits", &food.benefits),
        ("Risks", &food.risks),
        ("Alternatives", &food.alternatives),
        ("Nutrients", &food.nutrients),
    ] {
        if let Some(items) = items {
            lines.extend(list_section(title, items));
        }
    }
    lines.push(format!("{}Recommendations: {}", indent(1), food.recommendations));
    if let Some(serving) = &food.serving_size {
        lines.push(format!("{}Serving size: {}", indent(1), serving));
    }
    if let Some(max) = food.max_per_week {
        lines.push(format!("{}Max per week: {}", indent(1), max));
    }
    lines
}

// ============================================================================
// Posts
// ============================================================================

pub fn format_post_results(posts: &[&BlogPost]) -> Vec<String> {
    let mut lines = vec![format!("Posts ({})", posts.len())];
    if posts.is_empty() {
        lines.push(format!("{}No posts match.", indent(1)));
        return lines;
    }
    for (i, post) in posts.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!("{}Slug: {}", indent(1), post.slug));
        lines.push(format!(
            "{}{} · {} · {} min read",
            indent(1),
            post.category,
            post.published_at,
            post.read_time
        ));
    }
    lines
}

pub fn format_post_detail(post: &BlogPost) -> Vec<String> {
    let mut lines = vec![
        post.title.clone(),
        format!("{}Slug: {}", indent(1), post.slug),
        format!("{}Category: {}", indent(1), post.category),
        format!(
            "{}By {} · {} · {} min read",
            indent(1),
            post.author,
            post.published_at,
            post.read_time
        ),
    ];
    if !post.tags.is_empty() {
        lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
    }
    lines.push(String::new());
    lines.extend(post.content.lines().map(str::to_string));
    lines
}

// ============================================================================
// Catalog overview
// ============================================================================

/// Category pickers as the listing pages show them: `All` first.
pub fn format_categories(catalog: &Catalog) -> Vec<String> {
    let mut lines = vec!["Blog categories".to_string()];
    lines.push(format!("{}{}", indent(1), ALL_CATEGORIES));
    for category in catalog.post_categories() {
        let count = catalog.posts_by_category(category).len();
        lines.push(format!("{}{} ({})", indent(1), category, count));
    }

    lines.push(String::new());
    lines.push("Food categories".to_string());
    lines.push(format!("{}{}", indent(1), ALL_CATEGORIES));
    for category in catalog.food_categories() {
        let count = catalog.foods_by_category(category).len();
        lines.push(format!(
            "{}{} [{}] ({})",
            indent(1),
            display_label(category),
            category,
            count
        ));
    }
    lines
}

pub fn format_check_output(catalog: &Catalog, issues: &[Issue]) -> Vec<String> {
    let mut lines = vec![
        "Content".to_string(),
        format!("{}{} blog posts", indent(1), catalog.posts().len()),
        format!("{}{} foods", indent(1), catalog.foods().len()),
    ];
    for (level, count) in catalog.safety_counts() {
        lines.push(format!("{}{}: {}", indent(2), level, count));
    }

    lines.push(String::new());
    if issues.is_empty() {
        lines.push("No issues found".to_string());
    } else {
        let errors = issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
            .count();
        lines.push(format!(
            "Issues ({}): {} errors, {} warnings",
            issues.len(),
            errors,
            issues.len() - errors
        ));
        for (i, issue) in issues.iter().enumerate() {
            lines.push(format!(
                "{}{} {}: {}",
                indent(1),
                format_index(i + 1),
                issue.severity(),
                issue
            ));
        }
    }
    lines
}

// ============================================================================
// Build
// ============================================================================

pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| format!("{} \u{2192} {}", page.title, page.path))
        .collect();

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push(format!("Skipped ({})", report.skipped.len()));
        for skipped in &report.skipped {
            lines.push(format!("{}{}", indent(1), skipped));
        }
    }

    lines.push(format!("Generated {} pages", report.pages.len()));
    lines
}
