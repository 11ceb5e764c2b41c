//! # Bump Guide
//!
//! Content core of a pregnancy food safety guide: a catalog of blog posts and
//! food entries with lookup, filtering and search, plus a static site
//! generator and a CLI over both.
//!
//! # Data Flow
//!
//! ```text
//! content/blog.json  ┐
//!                    ├─→  Catalog  ─→  filter / lookup  ─→  CLI output (text or JSON)
//! content/foods.json ┘        │
//!                             └────→  generate  ─→  dist/  (HTML site)
//! content/config.toml ──→  SiteConfig ──┘
//! ```
//!
//! Both JSON files are embedded in the binary; a content directory only
//! needs the files it wants to replace.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`types`] | Content records (`BlogPost`, `FoodItem`) and their enums |
//! | [`catalog`] | Loads content and answers every query: by id, slug, category, safety level, text, trimester |
//! | [`filter`] | Search panel state combining several catalog queries |
//! | [`generate`] | Renders the HTML site with Maud, pages in parallel |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`naming`] | URL segments and display labels derived from content values |
//! | [`output`] | CLI output formatting |
//!
//! # Query Semantics
//!
//! Queries never fail. A lookup that finds nothing returns `None`, a filter
//! that matches nothing returns an empty list, and results always keep the
//! order of the source data. Text search is a case-insensitive substring
//! match; the empty query matches everything.
//!
//! Category and safety values are compared as plain strings, so a value that
//! names no known category simply matches nothing.
//!
//! When two posts share a slug, the earlier post wins slug lookups and the
//! later one is unreachable by slug. `Catalog::validate` reports this and the
//! site generator skips the later post.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod generate;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
