//! Composite filters used by listing pages and the CLI.
//!
//! A filter is a conjunction of independent clauses over the catalog
//! primitives: the search text, the category selection and (for foods) the
//! safety level and trimester. An unset clause accepts everything, and the
//! category selection has an `All` sentinel that does the same.

use crate::catalog::Catalog;
use crate::types::{BlogPost, FoodItem};

/// Label of the sentinel entry shown first in category pickers.
pub const ALL_CATEGORIES: &str = "All";

/// A category picker selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Map a picker label to a selection: `"All"` is the sentinel, anything
    /// else must equal a category exactly.
    pub fn from_selection(selection: &str) -> Self {
        if selection == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(selection.to_string())
        }
    }

    pub fn accepts(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Search panel state for the safety guide.
#[derive(Debug, Clone, Default)]
pub struct FoodFilter {
    pub query: String,
    pub category: CategoryFilter,
    /// `safe`, `caution` or `avoid`. Other values match nothing.
    pub safety_level: Option<String>,
    /// `first`, `second` or `third`.
    pub trimester: Option<String>,
}

impl FoodFilter {
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a FoodItem> {
        catalog
            .search_foods(&self.query)
            .into_iter()
            .filter(|food| self.accepts(food))
            .collect()
    }

    /// Every clause except the search text.
    fn accepts(&self, food: &FoodItem) -> bool {
        self.category.accepts(food.category.as_str())
            && self
                .safety_level
                .as_deref()
                .is_none_or(|level| food.safety_level.as_str() == level)
            && self
                .trimester
                .as_deref()
                .is_none_or(|stage| food.trimester.is_some_and(|t| t.covers(stage)))
    }
}

/// Search panel state for the blog index.
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl PostFilter {
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a BlogPost> {
        catalog
            .search_posts(&self.query)
            .into_iter()
            .filter(|post| self.category.accepts(&post.category))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[test]
    fn default_filter_returns_everything() {
        let catalog = builtin();
        assert_eq!(FoodFilter::default().apply(&catalog).len(), catalog.foods().len());
        assert_eq!(PostFilter::default().apply(&catalog).len(), catalog.posts().len());
    }

    #[test]
    fn all_sentinel_maps_to_all() {
        assert_eq!(CategoryFilter::from_selection("All"), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_selection("all"),
            CategoryFilter::Only("all".to_string())
        );
    }

    #[test]
    fn food_filter_is_conjunction_of_primitives() {
        let catalog = builtin();
        let filter = FoodFilter {
            query: "fish".to_string(),
            category: CategoryFilter::Only("seafood".to_string()),
            safety_level: Some("avoid".to_string()),
            trimester: None,
        };
        let results = food_ids(&filter.apply(&catalog));

        let searched = food_ids(&catalog.search_foods("fish"));
        let seafood = food_ids(&catalog.foods_by_category("seafood"));
        let avoid = food_ids(&catalog.foods_by_safety_level("avoid"));
        let expected: Vec<&str> = catalog
            .foods()
            .iter()
            .map(|f| f.id.as_str())
            .filter(|id| searched.contains(id) && seafood.contains(id) && avoid.contains(id))
            .collect();

        assert_eq!(results, expected);
        assert!(results.contains(&"shark"));
        assert!(!results.contains(&"salmon-cooked"));
    }

    #[test]
    fn food_filter_trimester_clause() {
        let catalog = builtin();
        let filter = FoodFilter {
            trimester: Some("third".to_string()),
            category: CategoryFilter::Only("herbs_spices".to_string()),
            ..FoodFilter::default()
        };
        let results = filter.apply(&catalog);
        assert_eq!(food_names(&results), vec!["Licorice Root"]);
        assert_eq!(results[0], find_food(&catalog, "Licorice Root"));
    }

    #[test]
    fn food_filter_trimester_is_a_stage_not_a_range() {
        let catalog = builtin();
        let all = FoodFilter {
            trimester: Some("all".to_string()),
            ..FoodFilter::default()
        };
        assert!(all.apply(&catalog).is_empty());

        let first = FoodFilter {
            trimester: Some("first".to_string()),
            ..FoodFilter::default()
        };
        let names = food_names(&first.apply(&catalog));
        assert!(names.contains(&"Apples"));
        assert!(names.contains(&"Ginger"));
        assert!(!names.contains(&"Brie (Unpasteurized)"));
    }

    #[test]
    fn filters_are_idempotent() {
        let catalog = builtin();
        let foods = FoodFilter {
            query: "a".to_string(),
            category: CategoryFilter::Only("fruits".to_string()),
            safety_level: Some("safe".to_string()),
            trimester: Some("second".to_string()),
        };
        assert_eq!(foods.apply(&catalog), foods.apply(&catalog));

        let posts = PostFilter {
            query: "safety".to_string(),
            category: CategoryFilter::Only("Food Safety".to_string()),
        };
        assert_eq!(posts.apply(&catalog), posts.apply(&catalog));
    }

    #[test]
    fn food_filter_invalid_safety_level_matches_nothing() {
        let catalog = builtin();
        let filter = FoodFilter {
            safety_level: Some("risky".to_string()),
            ..FoodFilter::default()
        };
        assert!(filter.apply(&catalog).is_empty());
    }

    #[test]
    fn post_filter_combines_query_and_category() {
        let catalog = builtin();
        let filter = PostFilter {
            query: "trimester".to_string(),
            category: CategoryFilter::Only("Nutrition".to_string()),
        };
        assert_eq!(
            post_titles(&filter.apply(&catalog)),
            vec!["Third Trimester Meal Planning: Energy for the Final Stretch"]
        );
    }

    #[test]
    fn post_filter_unknown_category_is_empty() {
        let catalog = builtin();
        let filter = PostFilter {
            category: CategoryFilter::from_selection("Recipes"),
            ..PostFilter::default()
        };
        assert!(filter.apply(&catalog).is_empty());
    }
}
