//! Static HTML site generation.
//!
//! Renders a [`Catalog`] into a directory of plain HTML pages. The catalog is
//! only read, so pages are rendered in parallel on the rayon pool and then
//! written out.
//!
//! ## Generated Pages
//!
//! - **Home** (`/index.html`): hero, app store links, safety stats, featured posts
//! - **Blog index** (`/blog/index.html`): every post plus the category picker
//! - **Blog category** (`/blog/category/{category}/index.html`)
//! - **Post** (`/blog/{slug}/index.html`): markdown body, tags, related posts
//! - **Safety guide** (`/foods/index.html`): foods grouped by safety level
//! - **Food category** (`/foods/category/{category}/index.html`)
//! - **Food** (`/foods/{id}/index.html`): full safety entry
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── blog/
//! │   ├── index.html
//! │   ├── category/food-safety/index.html
//! │   └── first-trimester-food-safety/index.html
//! └── foods/
//!     ├── index.html
//!     ├── category/seafood/index.html
//!     └── shark/index.html
//! ```
//!
//! Every page gets a unique path. Records are planned in the order above and
//! the first record to claim a path keeps it, so of two posts sharing a slug
//! (or two slugs that slugify alike) only the first is rendered. A record whose
//! slug has no URL-safe characters gets no page. Both cases are listed in
//! [`GenerateReport::skipped`], and listings show those records without a link.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating
//! with automatic escaping. Post bodies are converted with `pulldown-cmark`.
//! CSS is embedded from `static/site.css`, prefixed with the configured colors.

use crate::catalog::Catalog;
use crate::config::{self, SiteConfig};
use crate::filter::ALL_CATEGORIES;
use crate::naming::{display_label, slugify, truncate_chars};
use crate::types::{BlogPost, FoodItem, SafetyLevel};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CSS_STATIC: &str = include_str!("../static/site.css");

/// Related posts shown under an article.
const RELATED_LIMIT: usize = 3;

/// One written HTML file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPage {
    pub title: String,
    /// Relative to the output directory, e.g. `blog/x/index.html`.
    pub path: String,
}

/// Which kind of record a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Post,
    BlogCategory,
    Food,
    FoodCategory,
}

impl PageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Post => "post",
            PageKind::BlogCategory => "blog category",
            PageKind::Food => "food",
            PageKind::FoodCategory => "food category",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record that did not get a page of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedPage {
    pub kind: PageKind,
    /// Post or food id, or the category value.
    pub key: String,
    /// Path already owned by an earlier page. `None` when the record has no
    /// characters usable in a URL.
    pub taken: Option<String>,
}

impl fmt::Display for SkippedPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.taken {
            Some(path) => write!(f, "{} '{}': {} already written", self.kind, self.key, path),
            None => write!(f, "{} '{}': no URL-safe characters", self.kind, self.key),
        }
    }
}

/// What [`generate`] wrote.
#[derive(Debug, Default, Serialize)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    /// Records left out, in planning order. Listings show them unlinked.
    pub skipped: Vec<SkippedPage>,
}

struct RenderedPage {
    page: GeneratedPage,
    html: String,
}

/// Page URLs per record kind, keyed by id or category value.
type Links = HashMap<PageKind, HashMap<String, String>>;

/// Everything page renderers share.
struct Site<'a> {
    catalog: &'a Catalog,
    config: &'a SiteConfig,
    css: String,
    base: String,
    links: Links,
}

impl Site<'_> {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Absolute link to the page planned for a record, if it got one.
    fn link(&self, kind: PageKind, key: &str) -> Option<String> {
        self.links
            .get(&kind)
            .and_then(|pages| pages.get(key))
            .map(|path| self.url(path))
    }
}

/// Which page to render. Built up front so rendering can fan out.
enum PageJob<'a> {
    Home,
    BlogIndex,
    BlogCategory(&'a str),
    Post(&'a BlogPost),
    SafetyGuide,
    FoodCategory(&'a str),
    Food(&'a FoodItem),
}

impl PageJob<'_> {
    fn record(&self) -> Option<(PageKind, &str)> {
        match self {
            PageJob::BlogCategory(category) => Some((PageKind::BlogCategory, *category)),
            PageJob::Post(post) => Some((PageKind::Post, post.id.as_str())),
            PageJob::FoodCategory(category) => Some((PageKind::FoodCategory, *category)),
            PageJob::Food(food) => Some((PageKind::Food, food.id.as_str())),
            PageJob::Home | PageJob::BlogIndex | PageJob::SafetyGuide => None,
        }
    }
}

struct PlannedPage<'a> {
    job: PageJob<'a>,
    /// Relative to the site base, directory style.
    url: String,
}

/// Output paths handed out in planning order. The first claim on a path wins.
#[derive(Default)]
struct Plan<'a> {
    pages: Vec<PlannedPage<'a>>,
    paths: HashSet<String>,
    skipped: Vec<SkippedPage>,
}

impl<'a> Plan<'a> {
    fn fixed(&mut self, job: PageJob<'a>, url: &str) {
        self.paths.insert(url.to_string());
        self.pages.push(PlannedPage {
            job,
            url: url.to_string(),
        });
    }

    fn claim(&mut self, job: PageJob<'a>, url: Option<String>) {
        let taken = match url {
            Some(url) if !self.paths.contains(&url) => {
                self.paths.insert(url.clone());
                self.pages.push(PlannedPage { job, url });
                return;
            }
            Some(url) => Some(format!("{url}index.html")),
            None => None,
        };
        if let Some((kind, key)) = job.record() {
            self.skipped.push(SkippedPage {
                kind,
                key: key.to_string(),
                taken,
            });
        }
    }

    fn links(&self) -> Links {
        let mut links = Links::new();
        for page in &self.pages {
            if let Some((kind, key)) = page.job.record() {
                links
                    .entry(kind)
                    .or_default()
                    .entry(key.to_string())
                    .or_insert_with(|| page.url.clone());
            }
        }
        links
    }
}

pub fn generate(
    catalog: &Catalog,
    config: &SiteConfig,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let plan = plan_pages(catalog);
    for skipped in &plan.skipped {
        warn!("skipping {skipped}");
    }

    let site = Site {
        catalog,
        config,
        css: format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC),
        base: config.base_url(),
        links: plan.links(),
    };

    let rendered: Vec<RenderedPage> = plan
        .pages
        .par_iter()
        .map(|planned| render_job(&site, planned))
        .collect();

    fs::create_dir_all(output_dir)?;
    rendered
        .par_iter()
        .try_for_each(|page| write_page(output_dir, page))?;

    let report = GenerateReport {
        pages: rendered.into_iter().map(|r| r.page).collect(),
        skipped: plan.skipped,
    };
    info!(
        pages = report.pages.len(),
        skipped = report.skipped.len(),
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

fn plan_pages(catalog: &Catalog) -> Plan<'_> {
    let mut plan = Plan::default();
    plan.fixed(PageJob::Home, "");
    plan.fixed(PageJob::BlogIndex, "blog/");
    plan.fixed(PageJob::SafetyGuide, "foods/");

    for category in catalog.post_categories() {
        plan.claim(PageJob::BlogCategory(category), blog_category_url(category));
    }
    for post in catalog.posts() {
        plan.claim(PageJob::Post(post), post_url(post));
    }
    for category in catalog.food_categories() {
        plan.claim(PageJob::FoodCategory(category), food_category_url(category));
    }
    for food in catalog.foods() {
        plan.claim(PageJob::Food(food), food_url(food));
    }
    plan
}

fn render_job(site: &Site, planned: &PlannedPage) -> RenderedPage {
    let (title, markup) = match &planned.job {
        PageJob::Home => (site.config.site.title.clone(), render_home(site)),
        PageJob::BlogIndex => ("Blog".to_string(), render_blog_index(site)),
        PageJob::BlogCategory(category) => {
            (category.to_string(), render_blog_category(site, category))
        }
        PageJob::Post(post) => (post.title.clone(), render_post(site, post)),
        PageJob::SafetyGuide => ("Food Safety Guide".to_string(), render_safety_guide(site)),
        PageJob::FoodCategory(category) => {
            (display_label(category), render_food_category(site, category))
        }
        PageJob::Food(food) => (food.name.clone(), render_food(site, food)),
    };
    debug!(page = %planned.url, "rendered");
    RenderedPage {
        page: GeneratedPage {
            title,
            path: format!("{}index.html", planned.url),
        },
        html: markup.into_string(),
    }
}

fn write_page(output_dir: &Path, page: &RenderedPage) -> std::io::Result<()> {
    let path = output_dir.join(&page.page.path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &page.html)
}

// ============================================================================
// URLs (relative to base_url, directory style)
// ============================================================================

/// Slugged URL segment, or `None` when nothing URL-safe is left.
fn segment(value: &str) -> Option<String> {
    let slug = slugify(value);
    (!slug.is_empty()).then_some(slug)
}

pub fn post_url(post: &BlogPost) -> Option<String> {
    segment(&post.slug).map(|slug| format!("blog/{slug}/"))
}

pub fn blog_category_url(category: &str) -> Option<String> {
    segment(category).map(|slug| format!("blog/category/{slug}/"))
}

pub fn food_url(food: &FoodItem) -> Option<String> {
    segment(&food.id).map(|slug| format!("foods/{slug}/"))
}

pub fn food_category_url(category: &str) -> Option<String> {
    segment(category).map(|slug| format!("foods/category/{slug}/"))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Page-level metadata for `<head>`.
struct Meta<'a> {
    title: String,
    description: &'a str,
    keywords: &'a [String],
}

fn base_document(site: &Site, meta: Meta, current: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (meta.title) }
                @if !meta.description.is_empty() {
                    meta name="description" content=(meta.description);
                }
                @if !meta.keywords.is_empty() {
                    meta name="keywords" content=(meta.keywords.join(", "));
                }
                style { (PreEscaped(&site.css)) }
            }
            body {
                (site_header(site, current))
                (content)
                (site_footer(site))
            }
        }
    }
}

fn page_title(site: &Site, title: &str) -> String {
    format!("{} | {}", title, site.config.site.title)
}

/// Brand link plus top navigation. `current` is the active section.
fn site_header(site: &Site, current: &str) -> Markup {
    let sections = [("", "Home"), ("foods/", "Safety Guide"), ("blog/", "Blog")];
    html! {
        header.site-header {
            a.brand href=(site.url("")) { (site.config.site.title) }
            nav.site-nav {
                ul {
                    @for (path, label) in sections {
                        li class=[(path == current).then_some("current")] {
                            a href=(site.url(path)) { (label) }
                        }
                    }
                }
            }
        }
    }
}

fn store_links(site: &Site) -> Markup {
    html! {
        div.store-links {
            a href=(site.config.links.app_store) target="_blank" rel="noopener" { "Download on the App Store" }
            a href=(site.config.links.play_store) target="_blank" rel="noopener" { "Get it on Google Play" }
        }
    }
}

fn site_footer(site: &Site) -> Markup {
    html! {
        footer.site-footer {
            p {
                "Information on this site is educational and does not replace advice from your healthcare provider."
            }
            p {
                a href={ "mailto:" (site.config.links.support_email) } { (site.config.links.support_email) }
            }
        }
    }
}

fn safety_badge(level: SafetyLevel) -> Markup {
    html! {
        span class={ "badge " (level.as_str()) } { (level.as_str()) }
    }
}

fn post_list(site: &Site, posts: &[&BlogPost]) -> Markup {
    html! {
        ul.post-list {
            @for post in posts {
                li {
                    h3 {
                        @if let Some(href) = site.link(PageKind::Post, &post.id) {
                            a href=(href) { (post.title) }
                        } @else {
                            (post.title)
                        }
                    }
                    p.meta { (post.author) " · " (post.published_at) " · " (post.read_time) " min read" }
                    p { (post.excerpt) }
                }
            }
        }
    }
}

fn food_list(site: &Site, foods: &[&FoodItem]) -> Markup {
    let max = site.config.listing.excerpt_length;
    html! {
        ul.food-list {
            @for food in foods {
                li {
                    @if let Some(href) = site.link(PageKind::Food, &food.id) {
                        a href=(href) { (food.name) }
                    } @else {
                        (food.name)
                    }
                    " "
                    (safety_badge(food.safety_level))
                    p.meta { (truncate_chars(&food.description, max)) }
                }
            }
        }
    }
}

/// Category picker: the "All" sentinel first, then each category with a page.
fn category_picker(site: &Site, all_url: &str, entries: &[(String, String)]) -> Markup {
    html! {
        ul.category-list {
            li { a href=(site.url(all_url)) { (ALL_CATEGORIES) } }
            @for (label, href) in entries {
                li { a href=(href) { (label) } }
            }
        }
    }
}

fn blog_picker(site: &Site) -> Markup {
    let entries: Vec<(String, String)> = site
        .catalog
        .post_categories()
        .into_iter()
        .filter_map(|c| Some((c.to_string(), site.link(PageKind::BlogCategory, c)?)))
        .collect();
    category_picker(site, "blog/", &entries)
}

fn food_picker(site: &Site) -> Markup {
    let entries: Vec<(String, String)> = site
        .catalog
        .food_categories()
        .into_iter()
        .filter_map(|c| Some((display_label(c), site.link(PageKind::FoodCategory, c)?)))
        .collect();
    category_picker(site, "foods/", &entries)
}

fn render_markdown(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::ENABLE_TABLES);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);
    body_html
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_home(site: &Site) -> Markup {
    let catalog = site.catalog;
    let featured = catalog.featured_posts(site.config.home.featured_posts);

    let content = html! {
        main.home-page {
            section.hero {
                h1 { (site.config.site.title) }
                p.tagline { (site.config.site.tagline) }
                (store_links(site))
            }
            section.stats {
                @for (level, count) in catalog.safety_counts() {
                    a.stat href=(site.url("foods/")) {
                        span.count { (count) }
                        (safety_badge(level))
                    }
                }
            }
            @if !featured.is_empty() {
                section.featured {
                    h2 { "From the blog" }
                    (post_list(site, &featured))
                }
            }
        }
    };

    let meta = Meta {
        title: site.config.site.title.clone(),
        description: &site.config.site.tagline,
        keywords: &[],
    };
    base_document(site, meta, "", content)
}

fn render_blog_index(site: &Site) -> Markup {
    let posts: Vec<&BlogPost> = site.catalog.posts().iter().collect();
    let content = html! {
        main.blog-page {
            h1 { "Blog" }
            (blog_picker(site))
            (post_list(site, &posts))
        }
    };
    let meta = Meta {
        title: page_title(site, "Blog"),
        description: "",
        keywords: &[],
    };
    base_document(site, meta, "blog/", content)
}

fn render_blog_category(site: &Site, category: &str) -> Markup {
    let posts = site.catalog.posts_by_category(category);
    let content = html! {
        main.blog-page {
            h1 { (category) }
            (blog_picker(site))
            (post_list(site, &posts))
        }
    };
    let meta = Meta {
        title: page_title(site, category),
        description: "",
        keywords: &[],
    };
    base_document(site, meta, "blog/", content)
}

fn render_post(site: &Site, post: &BlogPost) -> Markup {
    let related = site.catalog.related_posts(&post.slug, RELATED_LIMIT);
    let body_html = render_markdown(&post.content);

    let content = html! {
        main.post-page {
            article.post {
                p.meta {
                    @if let Some(href) = site.link(PageKind::BlogCategory, &post.category) {
                        a href=(href) { (post.category) }
                    } @else {
                        (post.category)
                    }
                }
                @if !post.featured_image.is_empty() {
                    img src=(post.featured_image) alt=(post.title);
                }
                p.meta {
                    (post.author) " · " (post.published_at)
                    @if post.updated_at != post.published_at {
                        " (updated " (post.updated_at) ")"
                    }
                    " · " (post.read_time) " min read"
                }
                (PreEscaped(body_html))
                @if !post.tags.is_empty() {
                    ul.tags {
                        @for tag in &post.tags {
                            li { (tag) }
                        }
                    }
                }
            }
            @if !related.is_empty() {
                section.related {
                    h2 { "Related articles" }
                    (post_list(site, &related))
                }
            }
        }
    };

    let meta = Meta {
        title: if post.seo_title.is_empty() {
            page_title(site, &post.title)
        } else {
            post.seo_title.clone()
        },
        description: &post.seo_description,
        keywords: &post.seo_keywords,
    };
    base_document(site, meta, "blog/", content)
}

fn render_safety_guide(site: &Site) -> Markup {
    let content = html! {
        main.guide-page {
            h1 { "Food Safety Guide" }
            (food_picker(site))
            @for level in SafetyLevel::ALL {
                @let foods = site.catalog.foods_by_safety_level(level.as_str());
                @if !foods.is_empty() {
                    section id=(level.as_str()) {
                        h2 { (level.label()) " (" (foods.len()) ")" }
                        (food_list(site, &foods))
                    }
                }
            }
        }
    };
    let meta = Meta {
        title: page_title(site, "Food Safety Guide"),
        description: "Which foods are safe, which need caution and which to avoid during pregnancy.",
        keywords: &[],
    };
    base_document(site, meta, "foods/", content)
}

fn render_food_category(site: &Site, category: &str) -> Markup {
    let foods = site.catalog.foods_by_category(category);
    let label = display_label(category);
    let content = html! {
        main.guide-page {
            h1 { (label) }
            (food_picker(site))
            (food_list(site, &foods))
        }
    };
    let meta = Meta {
        title: page_title(site, &label),
        description: "",
        keywords: &[],
    };
    base_document(site, meta, "foods/", content)
}

fn fact_list(title: &str, items: Option<&[String]>) -> Markup {
    html! {
        @if let Some(items) = items.filter(|items| !items.is_empty()) {
            dt { (title) }
            dd {
                ul {
                    @for item in items {
                        li { (item) }
                    }
                }
            }
        }
    }
}

fn render_food(site: &Site, food: &FoodItem) -> Markup {
    let content = html! {
        main.food-page {
            p.meta {
                @if let Some(href) = site.link(PageKind::FoodCategory, food.category.as_str()) {
                    a href=(href) { (display_label(food.category.as_str())) }
                } @else {
                    (display_label(food.category.as_str()))
                }
            }
            h1 { (food.name) " " (safety_badge(food.safety_level)) }
            p { (food.description) }
            dl.food-facts {
                @if let Some(trimester) = food.trimester {
                    dt { "Trimester" }
                    dd { (display_label(trimester.as_str())) }
                }
                (fact_list("Benefits", food.benefits.as_deref()))
                (fact_list("Risks", food.risks.as_deref()))
                (fact_list("Safer alternatives", food.alternatives.as_deref()))
                (fact_list("Key nutrients", food.nutrients.as_deref()))
                dt { "Recommendations" }
                dd { (food.recommendations) }
                @if let Some(serving) = &food.serving_size {
                    dt { "Serving size" }
                    dd { (serving) }
                }
                @if let Some(max) = food.max_per_week {
                    dt { "Maximum per week" }
                    dd { (max) " servings" }
                }
            }
        }
    };
    let meta = Meta {
        title: page_title(site, &format!("Is {} safe during pregnancy?", food.name)),
        description: &food.description,
        keywords: &[],
    };
    base_document(site, meta, "foods/", content)
}

// ============================================================================
// Tests
// ============================================================================
