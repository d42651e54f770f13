pub mod types;

pub use types::{FileScan, Finding, ScanOutcome, ScanSummary, SkippedFile};

use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

use crate::config::ScanConfig;
use crate::repo::{self, FileEntry, RepoError, RepoSource};

/// Collect every line of `content` that contains `search`.
///
/// Lines are split on `\n` / `\r\n` and numbered from 1; a lone `\r` stays
/// inside its line. Matching is an exact, case-sensitive substring test; an
/// empty `search` matches every line.
pub fn scan_content(file_name: &str, content: &str, search: &str) -> Vec<Finding> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(search))
        .map(|(i, line)| Finding {
            file_name: file_name.to_string(),
            line_number: i + 1,
            line_text: line.trim().to_string(),
        })
        .collect()
}

/// Download one file and scan it.
pub async fn scan_file(
    source: &dyn RepoSource,
    file: &FileEntry,
    search: &str,
) -> Result<FileScan, RepoError> {
    info!("Scanning: {}", file.name);
    let content = source.fetch_raw(file).await?;
    let findings = scan_content(&file.name, &content, search);
    debug!(file = %file.name, lines = content.lines().count(), matches = findings.len(), "scanned file");

    Ok(FileScan {
        file_name: file.name.clone(),
        findings,
    })
}

/// Resolve `repo_url`, list and filter its root directory, then scan each
/// markup file for `search`.
///
/// Up to `options.concurrency` downloads run at once, but results are
/// consumed in listing order so findings keep that order. A file that
/// cannot be fetched aborts the run when `options.fail_fast` is set and is
/// recorded as skipped otherwise.
#[instrument(skip(source, options), fields(concurrency = options.concurrency, fail_fast = options.fail_fast))]
pub async fn scan_repository(
    source: &dyn RepoSource,
    repo_url: &str,
    search: &str,
    options: &ScanConfig,
) -> Result<ScanOutcome, RepoError> {
    let repository = repo::parse_repo_url(repo_url)?;
    debug!(owner = %repository.owner, name = %repository.name, "parsed repository URL");

    let api_url = source.contents_url(&repository);
    let body = source.list_root(&repository).await?;
    let entries = repo::parse_listing(&body)?;
    let listed = entries.len();
    let files = repo::filter_markup_files(entries)?;
    debug!(listed, markup_files = files.len(), "filtered root listing");

    if files.is_empty() {
        info!("No markup files found in the root directory.");
        return Ok(ScanOutcome::NoMarkupFiles {
            repository: repository.to_string(),
            api_url,
            search: search.to_string(),
        });
    }

    info!("Scanning {} markup files in {} for '{}':", files.len(), api_url, search);

    let mut results = stream::iter(files.iter())
        .map(move |file| async move { (file, scan_file(source, file, search).await) })
        .buffered(options.concurrency.max(1));

    let mut findings = Vec::new();
    let mut skipped = Vec::new();
    while let Some((file, result)) = results.next().await {
        match result {
            Ok(scan) => {
                if !scan.found() {
                    info!("No occurrences of '{}' found in {}", search, scan.file_name);
                }
                findings.extend(scan.findings);
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                warn!(file = %file.name, error = %e, "skipping file");
                skipped.push(SkippedFile {
                    file_name: file.name.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(ScanOutcome::Completed(ScanSummary {
        repository: repository.to_string(),
        api_url,
        search: search.to_string(),
        markup_files: files.len(),
        findings,
        skipped,
    }))
}
