//! Shared test utilities: catalog fixtures, record builders and extractors.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let catalog = builtin();
//! let shark = find_food(&catalog, "Shark");
//! assert_eq!(food_names(&catalog.search_foods("mercury")), vec!["Shark", "Swordfish"]);
//! ```

use crate::catalog::Catalog;
use crate::types::{BlogPost, FoodCategory, FoodItem, SafetyLevel};

// =========================================================================
// Fixtures
// =========================================================================

/// The built-in catalog. Panics if the embedded content is invalid.
pub fn builtin() -> Catalog {
    Catalog::builtin().unwrap()
}

/// A minimal post with the given identity and category.
pub fn post(id: &str, slug: &str, category: &str) -> BlogPost {
    BlogPost {
        id: id.to_string(),
        title: format!("Post {id}"),
        slug: slug.to_string(),
        excerpt: String::new(),
        content: format!("# Post {id}\n\nBody."),
        author: "Test Author".to_string(),
        published_at: "2024-01-01".to_string(),
        updated_at: "2024-01-01".to_string(),
        read_time: 3,
        category: category.to_string(),
        tags: Vec::new(),
        featured_image: String::new(),
        seo_title: String::new(),
        seo_description: String::new(),
        seo_keywords: Vec::new(),
    }
}

/// A minimal safe fruit with no optional fields.
pub fn food(id: &str, name: &str) -> FoodItem {
    FoodItem {
        id: id.to_string(),
        name: name.to_string(),
        category: FoodCategory::Fruits,
        safety_level: SafetyLevel::Safe,
        trimester: None,
        description: String::new(),
        benefits: None,
        risks: None,
        alternatives: None,
        nutrients: None,
        recommendations: String::new(),
        serving_size: None,
        max_per_week: None,
    }
}

// =========================================================================
// Lookups — panics with a clear message on miss
// =========================================================================

/// Find a food by display name. Panics if not found.
pub fn find_food<'a>(catalog: &'a Catalog, name: &str) -> &'a FoodItem {
    catalog
        .foods()
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = catalog.foods().iter().map(|f| f.name.as_str()).collect();
            panic!("food '{name}' not found. Available: {names:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn food_names<'a>(foods: &[&'a FoodItem]) -> Vec<&'a str> {
    foods.iter().map(|f| f.name.as_str()).collect()
}

pub fn food_ids<'a>(foods: &[&'a FoodItem]) -> Vec<&'a str> {
    foods.iter().map(|f| f.id.as_str()).collect()
}

pub fn post_titles<'a>(posts: &[&'a BlogPost]) -> Vec<&'a str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}
