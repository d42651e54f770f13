pub mod filter;
pub mod github;
pub mod types;

pub use filter::{filter_markup_files, parse_listing};
pub use github::GitHubClient;
pub use types::{FileEntry, RepositoryRef};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Invalid GitHub repository URL '{0}'. Expected: https://github.com/owner/repo")]
    InvalidUrl(String),

    #[error("Failed to fetch repository contents from {url}: {reason}. Check if the repository exists and is public.")]
    ListingFetch { url: String, reason: String },

    #[error("Failed to parse repository contents: {0}")]
    ListingParse(String),

    #[error("Failed to fetch {file}: {reason}")]
    FileFetch { file: String, reason: String },

    #[error("HTTP request failed: {0}")]
    Client(#[from] reqwest::Error),
}

/// Access to a repository's root listing and raw file contents.
///
/// Implementations return bodies untouched; parsing and filtering happen
/// in [`filter`] so they can be exercised without a network.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// URL of the root contents endpoint for `repo`, used in log lines and reports.
    fn contents_url(&self, repo: &RepositoryRef) -> String;

    /// Fetch the JSON body of the root contents listing.
    async fn list_root(&self, repo: &RepositoryRef) -> Result<String, RepoError>;

    /// Fetch the raw text of one file.
    async fn fetch_raw(&self, file: &FileEntry) -> Result<String, RepoError>;
}

/// Parse a GitHub repository URL into owner and repository name.
///
/// Accepts `https://github.com/{owner}/{repo}` with an optional trailing
/// slash. Owner and name are returned exactly as written: no percent
/// decoding, and a `.git` suffix stays part of the name.
pub fn parse_repo_url(url: &str) -> Result<RepositoryRef, RepoError> {
    let invalid = || RepoError::InvalidUrl(url.to_string());

    // Matched on the raw text; host case, ports and userinfo all fail here.
    let path = url.strip_prefix(GITHUB_PREFIX).ok_or_else(invalid)?;
    if path.contains(&['?', '#'][..]) {
        return Err(invalid());
    }
    let path = path.strip_suffix('/').unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        [owner, name] if is_path_segment(owner) && is_path_segment(name) => Ok(RepositoryRef {
            owner: owner.to_string(),
            name: name.to_string(),
        }),
        _ => Err(invalid()),
    }
}

const GITHUB_PREFIX: &str = "https://github.com/";

fn is_path_segment(segment: &str) -> bool {
    !segment.is_empty() && segment != "." && segment != ".."
}
