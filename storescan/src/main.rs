use clap;
use commands::command_argument_builder;
use std::path::PathBuf;
use storescan::handlers;
use tracing::error;

mod commands;

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let matches = cmd.get_matches();

    let verbose = matches.get_flag("verbose");
    let no_stdout = matches.get_flag("no-stdout");
    let log_to_file = matches.get_one::<PathBuf>("log-to-file-path").cloned();

    if let Err(e) = handlers::init_logging(verbose, no_stdout, log_to_file.as_deref()) {
        eprintln!("failed to initialize logging: {e:#}");
        std::process::exit(1);
    }

    if let Err(e) = handlers::handle_crawl(&matches).await {
        error!("something went wrong: {e:#}");
        std::process::exit(1);
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
