pub mod crawl;
pub mod session;

pub use crawl::{CrawlOptions, execute_crawl, generate_crawl_report, output_path};
pub use session::{Session, SessionConfig, bootstrap, build_client};
