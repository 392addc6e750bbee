use serde::{Deserialize, Serialize};

/// One extracted screening announcement. Any subset of fields may be
/// missing; a record is complete when title, datetime, location and
/// booking URL are all present. Completeness gates notification only,
/// partial records are still persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub title: Option<String>,
    pub screening_datetime: Option<String>,
    pub location: Option<String>,
    pub booking_url: Option<String>,
    pub movie_url: Option<String>,
}

impl ScreeningRecord {
    pub fn is_complete(&self) -> bool {
        self.complete_fields().is_some()
    }

    /// The four required fields, if all are present.
    pub fn complete_fields(&self) -> Option<(&str, &str, &str, &str)> {
        Some((
            self.title.as_deref()?,
            self.screening_datetime.as_deref()?,
            self.location.as_deref()?,
            self.booking_url.as_deref()?,
        ))
    }
}

/// On-disk last-seen state. Field names match the JSON file written by
/// earlier generations of this tool, so an existing state file keeps
/// working.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub last_changed_date: Option<String>,
    #[serde(default)]
    pub latest_movie_data: Option<ScreeningRecord>,
}

/// Result of the consent-dialog dismissal step.
#[derive(Debug, Clone, Default)]
pub struct ConsentOutcome {
    pub success: bool,
    pub dialog_detected: bool,
    pub method_used: Option<String>,
    pub error_message: Option<String>,
    pub debug_dump: Option<std::path::PathBuf>,
}

/// Outcome of validating an extracted record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Validation {
    pub is_valid: bool,
    pub missing_fields: Vec<&'static str>,
    pub warnings: Vec<String>,
}
