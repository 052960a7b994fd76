use crate::error::Result;
use crate::fetch::Fetcher;
use crate::ledger::Ledger;
use crate::node::{CatalogPage, ChildRef, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Reports (products recorded so far, label of the node being walked).
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

const DEFAULT_PAGE_SIZE: usize = 250;

/// Builds the wire-exact request targets consumed by the fetcher.
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn storefront(&self, id: &str) -> String {
        format!("{}/storefront/{}", self.base, id)
    }

    pub fn container(&self, id: &str, size: usize, start: usize) -> String {
        format!("{}/container/{}?size={}&start={}", self.base, id, size, start)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WalkSummary {
    pub storefronts_walked: usize,
    pub containers_walked: usize,
    pub new_products: usize,
    pub total_products: usize,
    pub fetch_failures: usize,
}

enum Work {
    Storefront { id: String },
    Container { id: String, product_context: bool },
}

/// Sequential catalog traversal. Owns every piece of mutable state for one
/// run: the fetcher, the visited/recorded ledger, and an explicit FIFO work
/// queue in place of call-stack recursion, so stack usage stays bounded no
/// matter how deep the catalog nests.
pub struct Walker {
    fetcher: Fetcher,
    endpoints: Endpoints,
    ledger: Ledger,
    page_size: usize,
    queue: VecDeque<Work>,
    summary: WalkSummary,
    progress_callback: Option<ProgressCallback>,
}

impl Walker {
    pub fn new(fetcher: Fetcher, endpoints: Endpoints, ledger: Ledger) -> Self {
        Self {
            fetcher,
            endpoints,
            ledger,
            page_size: DEFAULT_PAGE_SIZE,
            queue: VecDeque::new(),
            summary: WalkSummary::default(),
            progress_callback: None,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Walk the catalog reachable from `root_storefront` and drain the
    /// queue to completion. Per-node fetch failures degrade to a partial
    /// traversal; anything else propagates and aborts the run.
    pub async fn run(mut self, root_storefront: &str) -> Result<WalkSummary> {
        info!("starting walk at storefront {root_storefront}");
        self.queue.push_back(Work::Storefront {
            id: root_storefront.to_string(),
        });

        while let Some(work) = self.queue.pop_front() {
            match work {
                Work::Storefront { id } => self.walk_storefront(&id).await?,
                Work::Container {
                    id,
                    product_context,
                } => self.walk_container(&id, product_context).await?,
            }
        }

        self.summary.total_products = self.ledger.recorded_count();
        info!(
            "walk complete: {} new products, {} total, {} containers",
            self.summary.new_products, self.summary.total_products, self.summary.containers_walked
        );
        Ok(self.summary)
    }

    /// Storefronts return their full child list in one response, so no
    /// pagination. They are never entered into the visited set either: a
    /// storefront reached twice in one run is simply walked twice.
    async fn walk_storefront(&mut self, id: &str) -> Result<()> {
        info!("Found storefront {id}");
        self.emit_progress(format!("storefront {id}"));

        let url = self.endpoints.storefront(id);
        match self.fetcher.fetch(&url).await? {
            Some(doc) => {
                let children = CatalogPage::from_value(doc)?.into_children();
                self.dispatch(children, false)?;
                self.summary.storefronts_walked += 1;
            }
            None => {
                warn!("failed to get data for storefront {id} ({url})");
                self.summary.fetch_failures += 1;
            }
        }
        Ok(())
    }

    /// Page through a container's children, dispatching every non-empty
    /// page. The id is marked visited after the loop whether pagination
    /// finished or was abandoned on a failed fetch: one attempt per
    /// container, per run and across resumed runs.
    async fn walk_container(&mut self, id: &str, product_context: bool) -> Result<()> {
        if self.ledger.is_visited(id) {
            debug!("container {id} already visited, skipping");
            return Ok(());
        }
        info!("Found container {id}");
        self.emit_progress(format!("container {id}"));

        let mut offset = 0;
        loop {
            let url = self.endpoints.container(id, self.page_size, offset);
            let Some(doc) = self.fetcher.fetch(&url).await? else {
                warn!("failed to get children for container {id} at offset {offset}");
                self.summary.fetch_failures += 1;
                break;
            };
            let children = CatalogPage::from_value(doc)?.into_children();
            if children.is_empty() {
                break;
            }
            offset += children.len();
            self.dispatch(children, product_context)?;
        }

        self.ledger.mark_visited(id);
        self.summary.containers_walked += 1;
        Ok(())
    }

    /// Route one page of declared children. Product-like types are both
    /// recorded and, outside a variant expansion, re-walked as containers
    /// of their own editions; the flag stops that recursion at one level.
    fn dispatch(&mut self, children: Vec<ChildRef>, product_context: bool) -> Result<()> {
        for child in children {
            match child.kind {
                NodeKind::Container => self.queue.push_back(Work::Container {
                    id: child.id,
                    product_context,
                }),
                NodeKind::Storefront => self.queue.push_back(Work::Storefront { id: child.id }),
                kind if kind.is_product_like() => {
                    self.record(&child.id)?;
                    if !product_context {
                        self.queue.push_back(Work::Container {
                            id: child.id,
                            product_context: true,
                        });
                    }
                }
                _ => self.record(&child.id)?,
            }
        }
        Ok(())
    }

    fn record(&mut self, id: &str) -> Result<()> {
        if self.ledger.record(id)? {
            info!("Found product {id}");
            self.summary.new_products += 1;
        }
        Ok(())
    }

    fn emit_progress(&self, label: String) {
        if let Some(callback) = &self.progress_callback {
            callback(self.ledger.recorded_count(), label);
        }
    }
}
