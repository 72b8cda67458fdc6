//! Address normalization - best effort, never fails

/// Normalize an address string
///
/// Trims, collapses repeated whitespace and separators, and title-cases
/// tokens. Always produces a value; an empty input yields an empty string.
pub fn normalize_address(raw: &str) -> String {
    let mut tokens: Vec<String> = Vec::new();

    for comma_part in raw.split(',') {
        let part = part_title_case(comma_part);
        if part.is_empty() {
            // Collapse repeated commas
            continue;
        }
        tokens.push(part);
    }

    tokens.join(", ")
}

fn part_title_case(part: &str) -> String {
    part.split_whitespace()
        .map(title_case_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Title-case a single token; digits and punctuation are left in place
pub(crate) fn title_case_token(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_separators() {
        assert_eq!(
            normalize_address(" 14,, lalbagh  road ,bengaluru "),
            "14, Lalbagh Road, Bengaluru"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(
            normalize_address("NEAR city MARKET, bengaluru"),
            "Near City Market, Bengaluru"
        );
    }

    #[test]
    fn test_never_fails() {
        assert_eq!(normalize_address(""), "");
        assert_eq!(normalize_address(",,,"), "");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_address(" 14,, lalbagh  road ,bengaluru ");
        assert_eq!(normalize_address(&once), once);
    }
}
