//! Opening hours normalization

use crate::error::NormalizeError;
use crate::Normalized;
use serde_json::Value;
use thali_domain::{
    FieldKind, FieldValue, HoursSegment, TimeOfDay, ValidationIssue, Weekday, WeeklyHours,
};
use tracing::debug;

/// Normalize an hours payload into the 7-day segment structure
///
/// Expects `{"monday": [{"open": "HH:MM", "close": "HH:MM"}], ...}`. A
/// malformed day entry is recorded as closed with an issue; it never fails
/// the whole value. Keys that are not day names (stray `confidence` floats
/// from upstream extractors) are ignored.
pub fn normalize_hours(raw: &Value) -> Result<Normalized, NormalizeError> {
    let map = raw.as_object().ok_or_else(|| NormalizeError::UnexpectedShape {
        field: FieldKind::Hours,
        detail: format!("expected an object keyed by day, got {}", raw),
    })?;

    let mut hours = WeeklyHours::new();
    let mut issues = Vec::new();

    for day in Weekday::ALL {
        let Some(entry) = map.get(day.as_str()) else {
            continue;
        };

        match day_segments(entry) {
            Some(segments) => hours.set_day(day, segments),
            None => {
                debug!(day = %day, "malformed hours entry recorded as closed");
                hours.set_day(day, Vec::new());
                issues.push(
                    ValidationIssue::warning(
                        "invalid_hours",
                        format!("malformed hours for {}; recorded as closed", day),
                    )
                    .with_field(FieldKind::Hours),
                );
            }
        }
    }

    Ok(Normalized {
        value: if hours.is_empty() && !issues.is_empty() {
            // Nothing usable survived
            None
        } else {
            Some(FieldValue::Hours(hours))
        },
        issues,
    })
}

/// Parse one day's segment list; None when the entry is malformed
fn day_segments(entry: &Value) -> Option<Vec<HoursSegment>> {
    let items = entry.as_array()?;
    let mut segments = Vec::with_capacity(items.len());

    for item in items {
        let map = item.as_object()?;
        let open = TimeOfDay::parse(map.get("open")?.as_str()?)?;
        let close = TimeOfDay::parse(map.get("close")?.as_str()?)?;
        let segment = HoursSegment { open, close };
        if !segment.is_valid() {
            return None;
        }
        segments.push(segment);
    }

    Some(segments)
}
