//! Site configuration module.
//!
//! Loads `config.toml` from the source directory, merges it on top of the
//! stock defaults and validates the result.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "BumpSafe"
//! tagline = "Know what's safe to eat during pregnancy"
//! base_url = "/"
//!
//! [links]
//! app_store = "https://apps.apple.com/app/bumpsafe/id0000000000"
//! play_store = "https://play.google.com/store/apps/details?id=app.bumpsafe"
//! support_email = "hello@bumpsafe.app"
//!
//! [home]
//! featured_posts = 3        # Posts shown on the home page (first N)
//!
//! [listing]
//! excerpt_length = 160      # Characters of description shown in lists
//!
//! [colors.light]
//! background = "#fffaf7"
//! text = "#2b2220"
//! text_muted = "#7a6a66"
//! border = "#f0e2dc"
//! link = "#c2185b"
//! link_hover = "#880e4f"
//!
//! [colors.dark]
//! background = "#1a1416"
//! text = "#f3eae7"
//! text_muted = "#b3a19c"
//! border = "#3a2e30"
//! link = "#f48fb1"
//! link_hover = "#f8bbd0"
//!
//! [colors.safety]
//! safe = "#2e7d32"
//! caution = "#ef8f00"
//! avoid = "#c62828"
//!
//! [processing]
//! max_processes = 4         # Max parallel page renderers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! [home]
//! featured_posts = 6
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::types::SafetyLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding shown in page titles and the header.
    pub site: SiteInfo,
    /// Outbound links (app stores, support mail).
    pub links: LinksConfig,
    /// Home page settings.
    pub home: HomeConfig,
    /// Listing page settings.
    pub listing: ListingConfig,
    /// Color schemes and safety badge colors.
    pub colors: ColorConfig,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if !self.site.base_url.starts_with('/') && !self.site.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "site.base_url must be an absolute path or an http(s) URL".into(),
            ));
        }
        if self.listing.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "listing.excerpt_length must be greater than 0".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// `base_url` with exactly one trailing slash, for joining page paths.
    pub fn base_url(&self) -> String {
        format!("{}/", self.site.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    pub title: String,
    pub tagline: String,
    /// Prefix for every generated link, e.g. `"/"` or `"https://bumpsafe.app/"`.
    pub base_url: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "BumpSafe".to_string(),
            tagline: "Know what's safe to eat during pregnancy".to_string(),
            base_url: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinksConfig {
    pub app_store: String,
    pub play_store: String,
    pub support_email: String,
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            app_store: "https://apps.apple.com/app/bumpsafe/id0000000000".to_string(),
            play_store: "https://play.google.com/store/apps/details?id=app.bumpsafe".to_string(),
            support_email: "hello@bumpsafe.app".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomeConfig {
    /// How many posts (from the top of the blog) the home page features.
    pub featured_posts: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { featured_posts: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingConfig {
    /// Maximum characters of a description shown on listing pages.
    pub excerpt_length: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            excerpt_length: 160,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page renderers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Color configuration for light and dark modes plus safety badges.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
    pub safety: SafetyColors,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
            safety: SafetyColors::default(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Used for bylines, dates and captions.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#fffaf7".to_string(),
            text: "#2b2220".to_string(),
            text_muted: "#7a6a66".to_string(),
            border: "#f0e2dc".to_string(),
            link: "#c2185b".to_string(),
            link_hover: "#880e4f".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#1a1416".to_string(),
            text: "#f3eae7".to_string(),
            text_muted: "#b3a19c".to_string(),
            border: "#3a2e30".to_string(),
            link: "#f48fb1".to_string(),
            link_hover: "#f8bbd0".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Badge colors per safety level. Shared by both color schemes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SafetyColors {
    pub safe: String,
    pub caution: String,
    pub avoid: String,
}

impl SafetyColors {
    pub fn for_level(&self, level: SafetyLevel) -> &str {
        match level {
            SafetyLevel::Safe => &self.safe,
            SafetyLevel::Caution => &self.caution,
            SafetyLevel::Avoid => &self.avoid,
        }
    }
}

impl Default for SafetyColors {
    fn default() -> Self {
        Self {
            safe: "#2e7d32".to_string(),
            caution: "#ef8f00".to_string(),
            avoid: "#c62828".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory, falling back to
/// stock defaults for everything it does not set.
pub fn load_config(dir: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# bump-guide configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file next to blog.json / foods.json in the source directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
title = "BumpSafe"
tagline = "Know what's safe to eat during pregnancy"

# Prefix for every generated link: "/" for root hosting, or a full URL.
base_url = "/"

# ---------------------------------------------------------------------------
# Outbound links
# ---------------------------------------------------------------------------
[links]
app_store = "https://apps.apple.com/app/bumpsafe/id0000000000"
play_store = "https://play.google.com/store/apps/details?id=app.bumpsafe"
support_email = "hello@bumpsafe.app"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[home]
# Number of posts featured on the home page, taken from the top of the blog.
featured_posts = 3

# ---------------------------------------------------------------------------
# Listings
# ---------------------------------------------------------------------------
[listing]
# Maximum characters of a food description shown in lists.
excerpt_length = 160

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#fffaf7"
text = "#2b2220"
text_muted = "#7a6a66"    # Bylines, dates, captions
border = "#f0e2dc"
link = "#c2185b"
link_hover = "#880e4f"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#1a1416"
text = "#f3eae7"
text_muted = "#b3a19c"
border = "#3a2e30"
link = "#f48fb1"
link_hover = "#f8bbd0"

# ---------------------------------------------------------------------------
# Safety badge colors
# ---------------------------------------------------------------------------
[colors.safety]
safe = "#2e7d32"
caution = "#ef8f00"
avoid = "#c62828"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page renderers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
    --color-safe: {safe};
    --color-caution: {caution};
    --color-avoid: {avoid};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        safe = colors.safety.for_level(SafetyLevel::Safe),
        caution = colors.safety.for_level(SafetyLevel::Caution),
        avoid = colors.safety.for_level(SafetyLevel::Avoid),
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SiteConfig::default();
        assert_eq!(config.site.title, "BumpSafe");
        assert_eq!(config.home.featured_posts, 3);
        assert_eq!(config.listing.excerpt_length, 160);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[home]
featured_posts = 6
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.home.featured_posts, 6);
        // Defaults preserved
        assert_eq!(config.site.title, "BumpSafe");
        assert_eq!(config.colors.safety.avoid, "#c62828");
    }

    #[test]
    fn base_url_normalized() {
        let mut config = SiteConfig::default();
        assert_eq!(config.base_url(), "/");

        config.site.base_url = "https://bumpsafe.app".to_string();
        assert_eq!(config.base_url(), "https://bumpsafe.app/");

        config.site.base_url = "/guide//".to_string();
        assert_eq!(config.base_url(), "/guide/");
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "BumpSafe");
        assert_eq!(config.colors.light.background, "#fffaf7");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r##"
[site]
title = "Safe Bites"

[colors.safety]
caution = "#ffb300"
"##,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "Safe Bites");
        assert_eq!(config.colors.safety.caution, "#ffb300");
        // Siblings keep defaults
        assert_eq!(config.site.base_url, "/");
        assert_eq!(config.colors.safety.safe, "#2e7d32");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "this is not valid toml [[[").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[home]
featured = 4
"#,
        )
        .unwrap();

        let err = load_config(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[homepage]\nfeatured_posts = 2\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_featured_posts_allowed() {
        let mut config = SiteConfig::default();
        config.home.featured_posts = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_excerpt_length_zero() {
        let mut config = SiteConfig::default();
        config.listing.excerpt_length = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("excerpt_length"));
    }

    #[test]
    fn validate_base_url() {
        let mut config = SiteConfig::default();
        config.site.base_url = "bumpsafe.app".to_string();
        assert!(config.validate().is_err());

        config.site.base_url = "https://bumpsafe.app/".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_empty_title() {
        let mut config = SiteConfig::default();
        config.site.title = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = SiteConfig::default();
        config.processing.max_processes = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[listing]
excerpt_length = 0
"#,
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[site]
title = "A"
tagline = "B"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[site]
title = "C"
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let site = merged.get("site").unwrap();
        assert_eq!(site.get("title").unwrap().as_str(), Some("C"));
        assert_eq!(site.get("tagline").unwrap().as_str(), Some("B"));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1\n").unwrap();
        let overlay: toml::Value = toml::from_str("a = 2\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(2));
    }

    // =========================================================================
    // Processing config tests
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let config = ProcessingConfig {
            max_processes: Some(99999),
        };
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&config), cores);
    }

    // =========================================================================
    // stock_config_toml / CSS tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.site.title, defaults.site.title);
        assert_eq!(config.links.play_store, defaults.links.play_store);
        assert_eq!(config.home.featured_posts, defaults.home.featured_posts);
        assert_eq!(config.colors.dark.link, defaults.colors.dark.link);
        assert_eq!(config.colors.safety.caution, defaults.colors.safety.caution);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for section in ["site", "links", "home", "listing", "colors", "processing"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }

    #[test]
    fn color_css_includes_safety_variables() {
        let css = generate_color_css(&ColorConfig::default());
        assert!(css.contains("--color-safe: #2e7d32"));
        assert!(css.contains("--color-avoid: #c62828"));
        assert!(css.contains("@media (prefers-color-scheme: dark)"));
    }
}
