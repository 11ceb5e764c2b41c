//! The content catalog: read-only collections of blog posts and food items.
//!
//! Every lookup, filter and search here is a pure function of the catalog and
//! its arguments. Inputs are never validated: an unknown id yields `None`, an
//! unknown category or safety level yields an empty `Vec`. Results borrow from
//! the catalog and always keep collection order.
//!
//! ## Search
//!
//! A query is lower-cased once and tested as a substring of each record's
//! searchable fields (also lower-cased). A record matches when *any* field
//! contains the query, so the empty query matches everything.
//!
//! | Record | Searched fields |
//! |--------|-----------------|
//! | [`BlogPost`] | `title`, `excerpt`, every tag |
//! | [`FoodItem`] | `name`, `description`, `category` |
//!
//! ## Construction
//!
//! The built-in content is embedded at compile time from `content/*.json` and
//! parsed by [`Catalog::builtin`]. Callers build one `Catalog` and pass it by
//! reference to whatever needs it; there is no global instance.

use crate::types::{BlogPost, FoodItem, SafetyLevel};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

pub const BLOG_FILE: &str = "blog.json";
pub const FOODS_FILE: &str = "foods.json";

const BUILTIN_BLOG: &str = include_str!("../content/blog.json");
const BUILTIN_FOODS: &str = include_str!("../content/foods.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid content in {file}: {source}")]
    Content {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

// ============================================================================
// Generic collection
// ============================================================================

/// What the generic collection operations need to know about a record.
pub trait Record {
    fn id(&self) -> &str;
    fn category(&self) -> &str;
    /// `needle` is already lower-cased.
    fn matches(&self, needle: &str) -> bool;
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl Record for BlogPost {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.title, needle)
            || contains_folded(&self.excerpt, needle)
            || self.tags.iter().any(|tag| contains_folded(tag, needle))
    }
}

impl Record for FoodItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        self.category.as_str()
    }

    fn matches(&self, needle: &str) -> bool {
        contains_folded(&self.name, needle)
            || contains_folded(&self.description, needle)
            || contains_folded(self.category.as_str(), needle)
    }
}

/// An ordered, immutable list of records.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First record whose id equals `id` exactly.
    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Records whose category equals `category` exactly (case-sensitive).
    pub fn by_category(&self, category: &str) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| item.category() == category)
            .collect()
    }

    /// Case-insensitive substring search over the record's searchable fields.
    pub fn search(&self, query: &str) -> Vec<&T> {
        let needle = query.to_lowercase();
        self.items.iter().filter(|item| item.matches(&needle)).collect()
    }

    /// The first `limit` records.
    pub fn prefix(&self, limit: usize) -> Vec<&T> {
        self.items.iter().take(limit).collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for item in &self.items {
            let category = item.category();
            if !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Both content collections.
#[derive(Debug, Clone)]
pub struct Catalog {
    posts: Collection<BlogPost>,
    foods: Collection<FoodItem>,
}

impl Catalog {
    pub fn new(posts: Vec<BlogPost>, foods: Vec<FoodItem>) -> Self {
        Self {
            posts: Collection::new(posts),
            foods: Collection::new(foods),
        }
    }

    /// The content shipped with the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_BLOG, BUILTIN_FOODS)
    }

    /// Parse both collections from JSON arrays.
    pub fn from_json(blog_json: &str, foods_json: &str) -> Result<Self, CatalogError> {
        let posts = parse_records(blog_json, BLOG_FILE)?;
        let foods = parse_records(foods_json, FOODS_FILE)?;
        Ok(Self::new(posts, foods))
    }

    /// Load `blog.json` and `foods.json` from `dir`.
    ///
    /// Each file falls back to the built-in content when it does not exist,
    /// so a directory can override just one collection.
    pub fn load(dir: &Path) -> Result<Self, CatalogError> {
        let blog = read_or_builtin(dir, BLOG_FILE, BUILTIN_BLOG)?;
        let foods = read_or_builtin(dir, FOODS_FILE, BUILTIN_FOODS)?;
        let catalog = Self::from_json(&blog, &foods)?;
        info!(
            posts = catalog.posts.len(),
            foods = catalog.foods.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn posts(&self) -> &[BlogPost] {
        self.posts.items()
    }

    pub fn foods(&self) -> &[FoodItem] {
        self.foods.items()
    }

    // ------------------------------------------------------------------------
    // Blog posts
    // ------------------------------------------------------------------------

    pub fn post_by_id(&self, id: &str) -> Option<&BlogPost> {
        self.posts.get(id)
    }

    /// First post with this slug. Later posts sharing the slug are unreachable.
    pub fn post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.items().iter().find(|post| post.slug == slug)
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<&BlogPost> {
        self.posts.by_category(category)
    }

    pub fn search_posts(&self, query: &str) -> Vec<&BlogPost> {
        self.posts.search(query)
    }

    /// The first `limit` posts in declared order.
    pub fn featured_posts(&self, limit: usize) -> Vec<&BlogPost> {
        self.posts.prefix(limit)
    }

    pub fn post_categories(&self) -> Vec<&str> {
        self.posts.categories()
    }

    /// Other posts in the same category as the post at `slug`.
    pub fn related_posts(&self, slug: &str, limit: usize) -> Vec<&BlogPost> {
        let Some(post) = self.post_by_slug(slug) else {
            return Vec::new();
        };
        self.posts
            .by_category(&post.category)
            .into_iter()
            .filter(|other| other.slug != post.slug)
            .take(limit)
            .collect()
    }

    // ------------------------------------------------------------------------
    // Food items
    // ------------------------------------------------------------------------

    pub fn food_by_id(&self, id: &str) -> Option<&FoodItem> {
        self.foods.get(id)
    }

    pub fn foods_by_category(&self, category: &str) -> Vec<&FoodItem> {
        self.foods.by_category(category)
    }

    /// Foods at `level` (`"safe"`, `"caution"` or `"avoid"`). Any other value
    /// matches nothing.
    pub fn foods_by_safety_level(&self, level: &str) -> Vec<&FoodItem> {
        self.foods
            .items()
            .iter()
            .filter(|food| food.safety_level.as_str() == level)
            .collect()
    }

    pub fn search_foods(&self, query: &str) -> Vec<&FoodItem> {
        self.foods.search(query)
    }

    /// Foods whose trimester range covers `stage`. Foods without a trimester
    /// are left out.
    pub fn foods_for_trimester(&self, stage: &str) -> Vec<&FoodItem> {
        self.foods
            .items()
            .iter()
            .filter(|food| food.trimester.is_some_and(|t| t.covers(stage)))
            .collect()
    }

    pub fn food_categories(&self) -> Vec<&str> {
        self.foods.categories()
    }

    /// Number of foods at each safety level, in `SafetyLevel::ALL` order.
    pub fn safety_counts(&self) -> [(SafetyLevel, usize); 3] {
        SafetyLevel::ALL.map(|level| {
            let count = self
                .foods
                .items()
                .iter()
                .filter(|food| food.safety_level == level)
                .count();
            (level, count)
        })
    }

    // ------------------------------------------------------------------------
    // Integrity
    // ------------------------------------------------------------------------

    /// Report content problems. The catalog stays usable either way: lookups
    /// resolve duplicates to the first record.
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        for id in duplicates(self.posts().iter().map(|p| p.id.as_str())) {
            issues.push(Issue::DuplicatePostId { id: id.to_string() });
        }

        for slug in duplicates(self.posts().iter().map(|p| p.slug.as_str())) {
            let ids = self
                .posts()
                .iter()
                .filter(|p| p.slug == slug)
                .map(|p| p.id.clone())
                .collect();
            issues.push(Issue::DuplicateSlug {
                slug: slug.to_string(),
                ids,
            });
        }

        for id in duplicates(self.foods().iter().map(|f| f.id.as_str())) {
            issues.push(Issue::DuplicateFoodId { id: id.to_string() });
        }

        for post in self.posts().iter().filter(|p| p.read_time == 0) {
            issues.push(Issue::ZeroReadTime {
                id: post.id.clone(),
            });
        }

        debug!(issues = issues.len(), "catalog validated");
        issues
    }
}

/// A content problem found by [`Catalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    DuplicatePostId { id: String },
    DuplicateSlug { slug: String, ids: Vec<String> },
    DuplicateFoodId { id: String },
    ZeroReadTime { id: String },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DuplicatePostId { id } => write!(f, "duplicate blog post id '{id}'"),
            Issue::DuplicateSlug { slug, ids } => write!(
                f,
                "duplicate slug '{slug}' on posts {}; only post {} is reachable",
                ids.join(", "),
                ids.first().map(String::as_str).unwrap_or("?")
            ),
            Issue::DuplicateFoodId { id } => write!(f, "duplicate food id '{id}'"),
            Issue::ZeroReadTime { id } => write!(f, "blog post '{id}' has a read time of 0"),
        }
    }
}

/// How [`Issue`]s affect `check`: errors fail it, warnings are only printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Issue {
    /// Duplicate ids are errors. A shadowed slug still leaves every post
    /// reachable by id, so it and a zero read time are warnings.
    pub fn severity(&self) -> Severity {
        match self {
            Issue::DuplicatePostId { .. } | Issue::DuplicateFoodId { .. } => Severity::Error,
            Issue::DuplicateSlug { .. } | Issue::ZeroReadTime { .. } => Severity::Warning,
        }
    }
}

/// Values that occur more than once, in order of first occurrence.
fn duplicates<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order = Vec::new();
    for value in values {
        let count = counts.entry(value).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }
    order.into_iter().filter(|v| counts[v] > 1).collect()
}

fn parse_records<T: serde::de::DeserializeOwned>(
    json: &str,
    file: &str,
) -> Result<Vec<T>, CatalogError> {
    serde_json::from_str(json).map_err(|source| CatalogError::Content {
        file: file.to_string(),
        source,
    })
}

fn read_or_builtin(
    dir: &Path,
    file: &str,
    builtin: &'static str,
) -> Result<Cow<'static, str>, CatalogError> {
    let path = dir.join(file);
    if path.exists() {
        debug!(path = %path.display(), "reading content file");
        Ok(Cow::Owned(fs::read_to_string(&path)?))
    } else {
        debug!(file, "using built-in content");
        Ok(Cow::Borrowed(builtin))
    }
}

// ============================================================================
// Tests
// ============================================================================
