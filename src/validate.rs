use crate::formats::{ScreeningRecord, Validation};

/// Check an extracted record before notification. Any missing required
/// field makes it invalid; warnings are advisory and never block.
pub fn validate(record: &ScreeningRecord) -> Validation {
    let mut result = Validation {
        is_valid: true,
        ..Validation::default()
    };

    let required: [(&'static str, Option<&str>); 4] = [
        ("title", record.title.as_deref()),
        ("screening_datetime", record.screening_datetime.as_deref()),
        ("location", record.location.as_deref()),
        ("booking_url", record.booking_url.as_deref()),
    ];
    for (name, value) in required {
        if value.is_none_or(str::is_empty) {
            result.missing_fields.push(name);
            result.is_valid = false;
        }
    }

    if let Some(title) = record.title.as_deref() {
        if title.chars().count() < 2 {
            result.warnings.push("title seems too short".to_owned());
        }
    }
    if let Some(booking_url) = record.booking_url.as_deref() {
        if !booking_url.starts_with("http://") && !booking_url.starts_with("https://") {
            result.warnings.push("booking URL may be malformed".to_owned());
        }
    }

    result
}
