//! Source-path to output-file-name mapping.

use std::collections::BTreeMap;
use std::path::Path;

/// Map a page source path to its output file name: last path segment,
/// truncated at the first `.`, with `.html` appended.
///
/// Truncating at the first dot (not the last) means `about.en.md` and
/// `about.md` both map to `about.html`. Pages sharing a prefix before their
/// first dot therefore collide, and the later buildlist entry wins.
pub fn output_file_name(source: &str) -> String {
    let file_name = Path::new(source)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(source);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    format!("{stem}.html")
}

/// Build the page → output-file-name table for a buildlist. The table is
/// injected into every render as `ANVIL_FILENAME_MAPPINGS` so templates can
/// cross-link pages.
pub fn filename_mappings(buildlist: &[String]) -> BTreeMap<String, String> {
    buildlist
        .iter()
        .map(|source| (source.clone(), output_file_name(source)))
        .collect()
}
