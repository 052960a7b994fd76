// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{format_elapsed, init_logging, resolve_output_directory};

// Re-export crawl functionality from storescan-core
pub use storescan_core::crawl::{CrawlOptions, execute_crawl, generate_crawl_report, output_path};
