//! URL segments and display labels derived from content values.
//!
//! Blog categories are free-form ("Food Safety"), food categories and
//! trimesters are snake_case enum values ("herbs_spices"). Pages need both a
//! stable URL segment and a human label for each:
//!
//! - `"Food Safety"` → segment `food-safety`
//! - `"herbs_spices"` → label "Herbs & Spices", segment `herbs-spices`
//! - `"first_second"` → label "First & Second"
//!
//! Listing pages also shorten descriptions with [`truncate_chars`].

/// Lower-case ASCII slug: runs of non-alphanumerics collapse to one dash.
///
/// - `"Food Safety"` → `"food-safety"`
/// - `"Pregnancy Apps!"` → `"pregnancy-apps"`
/// - `"herbs_spices"` → `"herbs-spices"`
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last_dash = false;
    for ch in value.chars() {
        let lc = ch.to_ascii_lowercase();
        if lc.is_ascii_alphanumeric() {
            out.push(lc);
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    out.trim_matches('-').to_string()
}

/// Display label for a snake_case enum value: words capitalized, joined
/// with " & ".
///
/// - `"seafood"` → "Seafood"
/// - `"herbs_spices"` → "Herbs & Spices"
/// - `"second_third"` → "Second & Third"
pub fn display_label(value: &str) -> String {
    value
        .split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" & ")
}

/// Cut `text` to at most `max` characters, appending `…` when shortened.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", text[..idx].trim_end()),
        None => text.to_string(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
