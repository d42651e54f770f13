use serde::Serialize;

use crate::scan::{Finding, SkippedFile};

/// How a run ended, as far as the reader of the report is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    NoMarkupFiles,
    NotFound,
    Found,
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::NoMarkupFiles => write!(f, "NO MARKUP FILES"),
            ReportStatus::NotFound => write!(f, "NOT FOUND"),
            ReportStatus::Found => write!(f, "FOUND"),
        }
    }
}

/// Final report for one scan.
#[derive(Debug, Serialize)]
pub struct Report {
    /// "owner/name"
    pub repository: String,
    /// Contents endpoint that was listed
    pub api_url: String,
    pub search: String,
    pub status: ReportStatus,
    /// Markup files selected from the root listing
    pub markup_files: usize,
    /// Findings in listing order, then line order
    pub findings: Vec<Finding>,
    /// Files whose content could not be fetched
    pub skipped: Vec<SkippedFile>,
}

impl Report {
    pub fn occurrences(&self) -> usize {
        self.findings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_display() {
        assert_eq!(ReportStatus::NoMarkupFiles.to_string(), "NO MARKUP FILES");
        assert_eq!(ReportStatus::NotFound.to_string(), "NOT FOUND");
        assert_eq!(ReportStatus::Found.to_string(), "FOUND");
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&ReportStatus::NoMarkupFiles).unwrap();
        assert_eq!(json, "\"no_markup_files\"");
    }
}
