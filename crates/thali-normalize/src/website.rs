//! Website URL normalization

use crate::error::NormalizeError;

/// Normalize a website URL
///
/// Trims and prepends `https://` when no scheme is present. A value too short
/// to be a URL, or with no dot in it, is a hard failure.
pub fn normalize_website(raw: &str) -> Result<String, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::InvalidWebsite(String::new()));
    }

    let url = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    if url.len() < 10 || !url.contains('.') {
        return Err(NormalizeError::InvalidWebsite(trimmed.to_string()));
    }

    Ok(url)
}

/// Domain-normalized comparison key: the bare host, with scheme, `www.`,
/// path and case stripped
///
/// Two records whose websites share a key are treated as an exact match
/// signal by the similarity scorer.
pub fn domain_key(url: &str) -> String {
    let mut key = url.trim().to_lowercase();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = key.strip_prefix(prefix) {
            key = rest.to_string();
            break;
        }
    }
    if let Some(rest) = key.strip_prefix("www.") {
        key = rest.to_string();
    }
    key.split('/').next().unwrap_or("").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_added() {
        assert_eq!(normalize_website("mtr.in/menu").unwrap(), "https://mtr.in/menu");
    }

    #[test]
    fn test_existing_scheme_kept() {
        assert_eq!(
            normalize_website("http://empire.in").unwrap(),
            "http://empire.in"
        );
    }

    #[test]
    fn test_rejects_non_urls() {
        assert!(normalize_website("").is_err());
        assert!(normalize_website("n/a").is_err());
    }

    #[test]
    fn test_short_bare_domain_passes_with_scheme() {
        // The length floor applies after the scheme is prepended
        assert_eq!(normalize_website("x.y").unwrap(), "https://x.y");
    }

    #[test]
    fn test_domain_key() {
        assert_eq!(domain_key("https://www.MTR.in/"), "mtr.in");
        assert_eq!(domain_key("http://mtr.in"), "mtr.in");
        assert_eq!(domain_key("mtr.in"), "mtr.in");
        assert_eq!(domain_key("https://www.mtr.in/menu/today"), "mtr.in");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_website("mtr.in/menu").unwrap();
        assert_eq!(normalize_website(&once).unwrap(), once);
    }
}
