/// Decide whether the page content changed since the last run.
///
/// True when there is no stored marker yet (first run), or when the site
/// marker is present and lexically greater than the stored one. Both
/// markers are same-format ISO-8601 strings from the site's "last
/// updated" element, so lexical order is chronological order.
///
/// A missing site marker stays missing. An earlier generation of this
/// tool substituted the current wall-clock time here, which made every
/// run look like a change and defeated de-duplication; that fallback is
/// deliberately not reproduced.
pub fn should_extract(site_marker: Option<&str>, stored_marker: Option<&str>) -> bool {
    match (site_marker, stored_marker) {
        (_, None) => true,
        (Some(site), Some(stored)) => site > stored,
        (None, Some(_)) => {
            tracing::warn!("site last-changed marker not found; treating as unchanged");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_always_extracts() {
        assert!(should_extract(None, None));
        assert!(should_extract(Some("2026-02-20T10:00:00"), None));
    }

    #[test]
    fn newer_site_marker_extracts() {
        assert!(should_extract(
            Some("2026-02-20T10:00:00"),
            Some("2026-01-15T08:30:00")
        ));
    }

    #[test]
    fn equal_or_older_site_marker_is_a_no_op() {
        assert!(!should_extract(
            Some("2026-02-20T10:00:00"),
            Some("2026-02-20T10:00:00")
        ));
        assert!(!should_extract(
            Some("2025-12-01T00:00:00"),
            Some("2026-02-20T10:00:00")
        ));
    }

    #[test]
    fn missing_site_marker_with_prior_state_is_a_no_op() {
        assert!(!should_extract(None, Some("2026-02-20T10:00:00")));
    }
}
