use serde::Deserialize;

/// Owner and name of a GitHub repository, as written in its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A markup file candidate taken from the root listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// File name (e.g., "README.md")
    pub name: String,
    /// Raw download URL served by GitHub
    pub download_url: String,
}

/// One element of the JSON array returned by the contents endpoint.
/// Only the fields the scanner needs are deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    /// "file", "dir", "symlink" or "submodule"
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    /// Null for directories and submodules
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ContentEntry {
    pub fn is_file(&self) -> bool {
        self.kind == "file"
    }
}
