pub mod error;
pub mod fetch;
pub mod ledger;
pub mod node;
pub mod walker;

pub use error::WalkError;
pub use fetch::{Fetcher, RetryPolicy};
pub use ledger::Ledger;
pub use node::{CatalogPage, ChildRef, NodeKind};
pub use walker::{Endpoints, ProgressCallback, WalkSummary, Walker};
