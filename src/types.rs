//! Record schemas shared by the catalog, the CLI and the site generator.
//!
//! Both record types deserialize from the embedded JSON content files, which
//! use camelCase field names and snake_case enum values:
//!
//! ```json
//! { "id": "shark", "name": "Shark", "category": "seafood", "safetyLevel": "avoid", ... }
//! ```
//!
//! Optional fields are `Option<_>` so "absent" never collapses into an empty
//! list or a zero.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// URL segment and lookup key. Expected unique; first match wins otherwise.
    pub slug: String,
    pub excerpt: String,
    /// Markdown body.
    pub content: String,
    pub author: String,
    /// ISO date, e.g. `2024-01-15`.
    pub published_at: String,
    pub updated_at: String,
    /// Estimated reading time in minutes.
    pub read_time: u32,
    /// Free-form category label, e.g. "Nutrition".
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: String,
    pub seo_title: String,
    pub seo_description: String,
    pub seo_keywords: Vec<String>,
}

/// An entry in the food-safety database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FoodItem {
    pub id: String,
    pub name: String,
    pub category: FoodCategory,
    pub safety_level: SafetyLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trimester: Option<Trimester>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefits: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrients: Option<Vec<String>>,
    pub recommendations: String,
    /// Free text; the literal `"AVOID"` for foods with no safe serving.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_per_week: Option<u32>,
}

/// Food database category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    Proteins,
    Dairy,
    Grains,
    Seafood,
    Beverages,
    HerbsSpices,
    Processed,
}

impl FoodCategory {
    pub const ALL: [FoodCategory; 9] = [
        FoodCategory::Fruits,
        FoodCategory::Vegetables,
        FoodCategory::Proteins,
        FoodCategory::Dairy,
        FoodCategory::Grains,
        FoodCategory::Seafood,
        FoodCategory::Beverages,
        FoodCategory::HerbsSpices,
        FoodCategory::Processed,
    ];

    /// The serialized value, which is also what category filters compare against.
    pub fn as_str(self) -> &'static str {
        match self {
            FoodCategory::Fruits => "fruits",
            FoodCategory::Vegetables => "vegetables",
            FoodCategory::Proteins => "proteins",
            FoodCategory::Dairy => "dairy",
            FoodCategory::Grains => "grains",
            FoodCategory::Seafood => "seafood",
            FoodCategory::Beverages => "beverages",
            FoodCategory::HerbsSpices => "herbs_spices",
            FoodCategory::Processed => "processed",
        }
    }
}

impl fmt::Display for FoodCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-valued safety classification. Every food has exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyLevel {
    Safe,
    Caution,
    Avoid,
}

impl SafetyLevel {
    pub const ALL: [SafetyLevel; 3] = [SafetyLevel::Safe, SafetyLevel::Caution, SafetyLevel::Avoid];

    pub fn as_str(self) -> &'static str {
        match self {
            SafetyLevel::Safe => "safe",
            SafetyLevel::Caution => "caution",
            SafetyLevel::Avoid => "avoid",
        }
    }

    /// Heading used by the safety guide.
    pub fn label(self) -> &'static str {
        match self {
            SafetyLevel::Safe => "Safe to eat",
            SafetyLevel::Caution => "Eat with caution",
            SafetyLevel::Avoid => "Avoid during pregnancy",
        }
    }
}

impl fmt::Display for SafetyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which part of the pregnancy a food entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trimester {
    All,
    First,
    Second,
    Third,
    FirstSecond,
    SecondThird,
}

impl Trimester {
    pub fn as_str(self) -> &'static str {
        match self {
            Trimester::All => "all",
            Trimester::First => "first",
            Trimester::Second => "second",
            Trimester::Third => "third",
            Trimester::FirstSecond => "first_second",
            Trimester::SecondThird => "second_third",
        }
    }

    /// Whether this range includes `stage` (`"first"`, `"second"` or `"third"`).
    ///
    /// Unknown stages are never covered, not even by `All`.
    pub fn covers(self, stage: &str) -> bool {
        match (self, stage) {
            (Trimester::All, "first" | "second" | "third") => true,
            (Trimester::First, "first") => true,
            (Trimester::Second, "second") => true,
            (Trimester::Third, "third") => true,
            (Trimester::FirstSecond, "first" | "second") => true,
            (Trimester::SecondThird, "second" | "third") => true,
            _ => false,
        }
    }
}

impl fmt::Display for Trimester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
