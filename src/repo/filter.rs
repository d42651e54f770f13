use super::types::{ContentEntry, FileEntry};
use super::RepoError;

/// Documentation-oriented extensions recognised as markup files.
pub const MARKUP_EXTENSIONS: [&str; 20] = [
    ".md", ".markdown", ".mdown", ".mkdn", ".mkd", ".mdwn", ".mdtxt", ".mdtext",
    ".rst", ".txt", ".asciidoc", ".adoc", ".asc", ".textile", ".rdoc", ".org",
    ".creole", ".mediawiki", ".wiki", ".pod",
];

/// Parse the JSON body of the contents endpoint.
///
/// The body must be an array of objects carrying `type` and `name`.
pub fn parse_listing(body: &str) -> Result<Vec<ContentEntry>, RepoError> {
    serde_json::from_str(body).map_err(|e| RepoError::ListingParse(e.to_string()))
}

/// Whether a file name ends with a markup extension, ignoring ASCII case.
pub fn is_markup_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MARKUP_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Keep the `"file"` entries whose names carry a markup extension,
/// preserving listing order.
pub fn filter_markup_files(entries: Vec<ContentEntry>) -> Result<Vec<FileEntry>, RepoError> {
    let mut files = Vec::new();
    for entry in entries {
        if !entry.is_file() || !is_markup_file(&entry.name) {
            continue;
        }
        let download_url = entry.download_url.ok_or_else(|| {
            RepoError::ListingParse(format!("file entry '{}' has no download_url", entry.name))
        })?;
        files.push(FileEntry {
            name: entry.name,
            download_url,
        });
    }
    Ok(files)
}
