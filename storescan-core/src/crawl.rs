use crate::session::{self, SessionConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use storescan_walker::{Endpoints, Fetcher, Ledger, ProgressCallback, RetryPolicy, WalkSummary, Walker};
use tracing::info;

/// Options for one crawl run.
pub struct CrawlOptions {
    pub language: String,
    pub country: String,
    pub output_dir: PathBuf,
    pub page_size: usize,
    pub retry: RetryPolicy,
    pub session: SessionConfig,
}

impl CrawlOptions {
    pub fn new(
        language: impl Into<String>,
        country: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            language: language.into(),
            country: country.into(),
            output_dir: output_dir.into(),
            page_size: 250,
            retry: RetryPolicy::default(),
            session: SessionConfig::default(),
        }
    }
}

/// The output sink is keyed by region: one file per `{language}-{country}`.
pub fn output_path(dir: &Path, language: &str, country: &str) -> PathBuf {
    dir.join(format!("{language}-{country}.txt"))
}

/// Execute a crawl with the given options. Opens the sink before anything
/// touches the network, so filesystem problems surface before the first
/// request; then bootstraps the session and drains the catalog walk.
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<ProgressCallback>,
) -> Result<WalkSummary> {
    let client = session::build_client()?;

    let sink = output_path(&options.output_dir, &options.language, &options.country);
    let ledger = Ledger::open(&sink)
        .with_context(|| format!("failed to open output sink {}", sink.display()))?;
    if ledger.seeded() > 0 {
        info!("resuming with {} previously recorded entries", ledger.seeded());
    }

    let session = session::bootstrap(&client, &options.session, &options.language, &options.country)
        .await
        .context("session bootstrap failed")?;
    info!("catalog base URL: {}", session.base_url);

    let mut walker = Walker::new(
        Fetcher::new(client).with_retry_policy(options.retry),
        Endpoints::new(session.base_url),
        ledger,
    )
    .with_page_size(options.page_size);
    if let Some(callback) = progress_callback {
        walker = walker.with_progress_callback(callback);
    }

    let summary = walker
        .run(&session.root_storefront)
        .await
        .context("catalog traversal failed")?;
    Ok(summary)
}

/// Generate a crawl report from a run summary
pub fn generate_crawl_report(summary: &WalkSummary) -> String {
    let mut report = String::new();
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
    report.push_str("# Summary:\n");
    report.push_str(&format!(
        "  Storefronts walked: {}\n",
        summary.storefronts_walked
    ));
    report.push_str(&format!(
        "  Containers walked: {}\n",
        summary.containers_walked
    ));
    report.push_str(&format!("  New products recorded: {}\n", summary.new_products));
    report.push_str(&format!(
        "  Total products on file: {}\n",
        summary.total_products
    ));
    if summary.fetch_failures > 0 {
        report.push_str(&format!(
            "  Nodes abandoned after retries: {}\n",
            summary.fetch_failures
        ));
    }
    report.push_str("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report
}
