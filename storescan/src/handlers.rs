use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use storescan_core::crawl::{CrawlOptions, execute_crawl, generate_crawl_report, output_path};
use storescan_walker::ProgressCallback;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Expand and validate the output directory argument. A path that does not
/// name an existing directory is fatal before the traversal begins.
pub fn resolve_output_directory(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(raw);
    let path = PathBuf::from(expanded.as_ref());
    if !path.is_dir() {
        bail!("the path `{}` is not a directory", path.display());
    }
    Ok(path)
}

/// Wire up the subscriber from the CLI flags: INFO by default, DEBUG under
/// `--verbose`, an optional plain-text file sink, and stdout unless
/// `--no-stdout` was given.
pub fn init_logging(verbose: bool, no_stdout: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stdout_layer = (!no_stdout).then(|| fmt::layer().with_writer(std::io::stdout));
    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Arc::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(level)
        .with(stdout_layer)
        .with(file_layer)
        .init();
    Ok(())
}

pub fn format_elapsed(elapsed: chrono::Duration) -> String {
    let total = elapsed.num_seconds().max(0);
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}h {minutes}m {seconds}s")
    } else if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

pub async fn handle_crawl(matches: &ArgMatches) -> Result<()> {
    let language = matches.get_one::<String>("region_language").unwrap().clone();
    let country = matches.get_one::<String>("region_country").unwrap().clone();
    let no_stdout = matches.get_flag("no-stdout");

    let raw_dir = matches.get_one::<String>("output_file_directory").unwrap();
    let output_dir = resolve_output_directory(raw_dir)?;
    let sink = output_path(&output_dir, &language, &country);

    let started = Utc::now();
    info!("language code `{language}`, country code `{country}`");
    info!("starting at `{}`", started.to_rfc3339());

    let spinner = (!no_stdout).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Starting crawl...");
        pb
    });

    let progress_callback: Option<ProgressCallback> = spinner.as_ref().map(|pb| {
        let pb = pb.clone();
        Arc::new(move |count: usize, label: String| {
            pb.set_message(format!("{count} products, walking {label}"));
        }) as ProgressCallback
    });

    let options = CrawlOptions::new(language, country, output_dir);
    let result = execute_crawl(options, progress_callback).await;

    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let summary = result?;

    let finished = Utc::now();
    let elapsed = format_elapsed(finished - started);
    info!("finished at `{}`", finished.to_rfc3339());
    info!("elapsed time: `{elapsed}`");

    if !no_stdout {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
        print!("{}", generate_crawl_report(&summary));
        println!(
            "\n{} Output file: {}",
            "✓".green().bold(),
            sink.display().to_string().bright_white()
        );
        println!("{} Elapsed: {}", "✓".green().bold(), elapsed.cyan());
    }
    Ok(())
}
