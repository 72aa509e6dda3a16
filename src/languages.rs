//! Extension-to-language classification table.
//!
//! The mapping lives in `data/languages.toml` and is embedded at compile
//! time, parsed once on first use, and queried read-only afterwards.
//! Extending coverage is a data change, not a code change.

use std::collections::HashMap;
use std::sync::OnceLock;

static TABLE: OnceLock<HashMap<String, String>> = OnceLock::new();

const LANGUAGES_TOML: &str = include_str!("../data/languages.toml");

fn table() -> &'static HashMap<String, String> {
    TABLE.get_or_init(|| {
        toml::from_str(LANGUAGES_TOML).expect("embedded language table is valid TOML")
    })
}

/// Look up the canonical language label for a file extension.
/// Matching is case-insensitive; unknown extensions return None.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    table().get(&ext.to_ascii_lowercase()).map(String::as_str)
}

/// Extract a usable extension from a file path. Extensions longer than
/// 12 characters or containing non-alphanumeric characters are rejected,
/// which filters out timestamps and hashes masquerading as extensions.
pub fn extension_of(file_path: &str) -> Option<String> {
    let filename = file_path.rsplit(['/', '\\']).next()?;
    let (_, ext) = filename.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    if ext.is_empty() || ext.len() > 12 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// Convenience: path straight to language label.
pub fn language_for_path(file_path: &str) -> Option<&'static str> {
    language_for_extension(&extension_of(file_path)?)
}
