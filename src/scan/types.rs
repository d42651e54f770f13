use serde::Serialize;

/// One line of a markup file that contains the search string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file_name: String,
    /// 1-based line number
    pub line_number: usize,
    /// Matched line with surrounding whitespace trimmed
    pub line_text: String,
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "File: {}, Line {}: {}", self.file_name, self.line_number, self.line_text)
    }
}

/// Result of scanning a single file.
#[derive(Debug, Clone)]
pub struct FileScan {
    pub file_name: String,
    pub findings: Vec<Finding>,
}

impl FileScan {
    pub fn found(&self) -> bool {
        !self.findings.is_empty()
    }
}

/// A file left out of the results because its content could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub file_name: String,
    pub reason: String,
}

/// Everything a completed scan produced, in listing order.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    /// "owner/name"
    pub repository: String,
    pub api_url: String,
    pub search: String,
    /// Markup files selected from the listing
    pub markup_files: usize,
    pub findings: Vec<Finding>,
    pub skipped: Vec<SkippedFile>,
}

#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// The root directory holds no markup files; nothing was downloaded.
    NoMarkupFiles {
        repository: String,
        api_url: String,
        search: String,
    },
    Completed(ScanSummary),
}
