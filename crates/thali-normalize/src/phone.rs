//! Phone number normalization to +91 format

use crate::error::NormalizeError;

/// Normalize a phone number to `+91XXXXXXXXXX`
///
/// Accepts a bare 10-digit mobile (leading digit 6-9), a `91`-prefixed form
/// of 12 or more digits (the trailing 10 are the subscriber number), or any
/// other long digit string with an embedded 10-digit mobile. A string with
/// at least 10 digits but no recognizable mobile is kept as-is (landline
/// passthrough); the validator flags it later. Fewer than 10 digits is a
/// hard failure.
pub fn normalize_phone(raw: &str) -> Result<String, NormalizeError> {
    let mut digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();

    // A single leading zero is a trunk prefix, not part of the number
    if digits.len() >= 11 && digits.starts_with('0') && !digits[1..].starts_with('0') {
        digits.remove(0);
    }

    if digits.len() < 10 {
        return Err(NormalizeError::InvalidPhone(raw.trim().to_string()));
    }

    if digits.len() == 10 && is_mobile_lead(digits.as_bytes()[0]) {
        return Ok(format!("+91{}", digits));
    }

    // Country-code prefixed: the subscriber number is the trailing 10
    // digits, mobile or landline alike
    if digits.len() >= 12 && digits.starts_with("91") {
        return Ok(format!("+91{}", &digits[digits.len() - 10..]));
    }

    // Scan for an embedded 10-digit mobile
    for start in 0..=(digits.len() - 10) {
        let candidate = &digits[start..start + 10];
        if is_mobile_lead(candidate.as_bytes()[0]) {
            return Ok(format!("+91{}", candidate));
        }
    }

    // Looks like a landline; keep it for the validator to flag
    Ok(raw.trim().to_string())
}

fn is_mobile_lead(digit: u8) -> bool {
    matches!(digit, b'6'..=b'9')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_mobile() {
        assert_eq!(normalize_phone("9876543210").unwrap(), "+919876543210");
    }

    #[test]
    fn test_formatted_mobile() {
        assert_eq!(normalize_phone("080-2222-0022").unwrap(), "+918022220022");
        assert_eq!(normalize_phone("+91 98765 43210").unwrap(), "+919876543210");
    }

    #[test]
    fn test_prefixed_forms() {
        assert_eq!(normalize_phone("919876543210").unwrap(), "+919876543210");
        assert_eq!(normalize_phone("0919876543210").unwrap(), "+919876543210");
    }

    #[test]
    fn test_prefixed_landline_keeps_trailing_ten() {
        // The 91 prefix marks the trailing 10 digits as the subscriber
        // number even when the lead digit is not a mobile one
        assert_eq!(normalize_phone("+914423456789").unwrap(), "+914423456789");
        assert_eq!(normalize_phone("914423456789").unwrap(), "+914423456789");
    }

    #[test]
    fn test_too_few_digits() {
        assert!(matches!(
            normalize_phone("12345"),
            Err(NormalizeError::InvalidPhone(_))
        ));
        assert!(normalize_phone("").is_err());
    }

    #[test]
    fn test_landline_passthrough() {
        // 10+ digits, no embedded mobile: kept as-is for validation to flag
        assert_eq!(normalize_phone("0112345123401").unwrap(), "0112345123401");
    }

    #[test]
    fn test_idempotent() {
        let once = normalize_phone("080-2222-0022").unwrap();
        assert_eq!(normalize_phone(&once).unwrap(), once);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: normalization is idempotent for any input it accepts
        #[test]
        fn test_phone_idempotent(raw in "[0-9 +()-]{0,20}") {
            if let Ok(once) = normalize_phone(&raw) {
                prop_assert_eq!(normalize_phone(&once).unwrap(), once);
            }
        }

        /// Property: a successful mobile normalization is always +91 and 10
        /// digits
        #[test]
        fn test_mobile_shape(body in "[6-9][0-9]{9}") {
            let normalized = normalize_phone(&body).unwrap();
            prop_assert_eq!(normalized.len(), 13);
            prop_assert!(normalized.starts_with("+91"));
        }
    }
}
