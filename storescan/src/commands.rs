use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("storescan")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("storescan")
        .styles(CLAP_STYLING)
        .about(
            "Crawls a storefront catalog region and records every product \
            identifier it can reach, one per line. Re-running against the same \
            output directory resumes where the last run left off.",
        )
        .arg(arg!(<region_language> "The region language, aka the `en` in `en-US`"))
        .arg(arg!(<region_country> "The region country, aka the `US` in `en-US`"))
        .arg(
            arg!(--"output_file_directory" <DIR>)
                .required(false)
                .help("Where to write the resulting file to, defaults to the current directory")
                .default_value("."),
        )
        .arg(
            arg!(--"log-to-file-path" <PATH>)
                .required(false)
                .help("Log to the specified file")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            arg!(--"verbose")
                .required(false)
                .help("Increase logging verbosity")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"no-stdout")
                .required(false)
                .help("If set, will not log to stdout")
                .action(clap::ArgAction::SetTrue),
        )
}
