//! Restaurant name normalization

use crate::address::title_case_token;

/// Prefixes that carry no identity signal
const PREFIXES: [&str; 3] = ["the ", "hotel ", "new "];

/// Suffixes that carry no identity signal
const SUFFIXES: [&str; 3] = [" restaurant", " hotel", " dhaba"];

/// Normalize a restaurant name
///
/// Trims, strips low-signal prefixes/suffixes to a fixpoint, collapses
/// whitespace, and title-cases. Stripping never empties the name: the last
/// non-empty form is kept.
pub fn normalize_name(raw: &str) -> String {
    let mut name = collapse(raw);

    loop {
        let stripped = strip_affixes(&name);
        if stripped == name || stripped.is_empty() {
            break;
        }
        name = stripped;
    }

    name.split_whitespace()
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_affixes(name: &str) -> String {
    let lower = name.to_lowercase();
    let mut start = 0;
    let mut end = name.len();

    for prefix in PREFIXES {
        if lower.starts_with(prefix) {
            start = prefix.len();
            break;
        }
    }

    for suffix in SUFFIXES {
        if lower.ends_with(suffix) && end - start > suffix.len() {
            end -= suffix.len();
            break;
        }
    }

    if start >= end {
        return String::new();
    }
    match name.get(start..end) {
        Some(inner) => collapse(inner),
        // Lowercasing shifted byte offsets (non-ASCII edge); keep the name
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_cleanup() {
        assert_eq!(normalize_name("  mavalli   tiffin room "), "Mavalli Tiffin Room");
    }

    #[test]
    fn test_prefix_and_suffix_removal() {
        assert_eq!(normalize_name("The Empire Restaurant"), "Empire");
        assert_eq!(normalize_name("hotel saravana bhavan"), "Saravana Bhavan");
        assert_eq!(normalize_name("Sharma dhaba"), "Sharma");
    }

    #[test]
    fn test_stacked_affixes_reach_fixpoint() {
        // "the hotel X" sheds both prefixes
        assert_eq!(normalize_name("the hotel Tunday Kababi"), "Tunday Kababi");
    }

    #[test]
    fn test_stripping_never_empties() {
        // The whole name is an affix word; keep it rather than emit nothing
        assert_eq!(normalize_name("Hotel"), "Hotel");
    }

    #[test]
    fn test_acronyms_title_cased() {
        assert_eq!(normalize_name("MTR"), "Mtr");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["The Empire Restaurant", "MTR", "hotel saravana bhavan", "Hotel"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "input {:?}", raw);
        }
    }
}
