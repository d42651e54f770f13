mod config;
mod report;
mod repo;
mod scan;

use clap::builder::{NonEmptyStringValueParser, RangedU64ValueParser};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, info_span, warn};
use tracing_subscriber::EnvFilter;

/// Markup Scanner: CLI tool that lists the root directory of a public
/// GitHub repository and reports every line of its markup files that
/// contains a search string.
#[derive(Parser, Debug)]
#[command(name = "markup-scanner", version, about)]
struct Cli {
    /// GitHub repository URL (e.g., https://github.com/org/repo)
    ///
    /// When both REPO_URL and SEARCH are omitted, the [defaults] pair from
    /// the config file is used.
    repo_url: Option<String>,

    /// Case-sensitive substring to search for
    #[arg(value_parser = NonEmptyStringValueParser::new())]
    search: Option<String>,

    /// Config file (defaults to .markup-scanner.toml in the current directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Optional output file path for a markdown report
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// HTTP timeout in seconds, overriding http.timeout_secs
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Number of files downloaded at once, overriding scan.concurrency
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    concurrency: Option<usize>,

    /// Abort on the first file that cannot be fetched instead of skipping it
    #[arg(long)]
    fail_fast: bool,
}

/// Pick the repository URL and search string for this run.
///
/// Both given: use them. Neither given: fall back to the configured
/// defaults. Only one given: `None`, which the caller reports as a usage error.
fn resolve_targets(cli: &Cli, defaults: &config::DefaultsConfig) -> Option<(String, String)> {
    match (&cli.repo_url, &cli.search) {
        (Some(url), Some(search)) => Some((url.clone(), search.clone())),
        (None, None) => {
            warn!(
                repo_url = %defaults.repo_url,
                search = %defaults.search,
                "no repository URL or search string given, using configured defaults"
            );
            Some((defaults.repo_url.clone(), defaults.search.clone()))
        }
        _ => None,
    }
}

fn apply_overrides(cli: &Cli, config: &mut config::Config) {
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }
    if let Some(concurrency) = cli.concurrency {
        config.scan.concurrency = concurrency;
    }
    if cli.fail_fast {
        config.scan.fail_fast = true;
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "scan failed");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    info!("loading configuration");
    let mut config = config::Config::load(cli.config.as_deref())?;
    apply_overrides(&cli, &mut config);
    debug!(?config, "resolved configuration");

    let Some((repo_url, search)) = resolve_targets(&cli, &config.defaults) else {
        Cli::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "both REPO_URL and SEARCH are required (or neither, to use the configured defaults)",
            )
            .exit();
    };

    let _main_span = info_span!("markup_scan", repo_url = %repo_url).entered();

    let client = repo::GitHubClient::new(&config.http)?;
    let outcome = scan::scan_repository(&client, &repo_url, &search, &config.scan).await?;

    let built_report = report::build(outcome);
    report::output(&built_report, cli.output.as_deref(), cli.json)?;
    info!(status = %built_report.status, occurrences = built_report.occurrences(), "done");

    if built_report.skipped.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}
