use crate::error::Result;
use serde::Deserialize;
use serde_json::Value;

/// Node type taxonomy of the upstream catalog. The `type` strings conflate
/// "purchasable product" with "may contain variant editions": a game, film
/// or TV entry can itself be paged through like a container. Anything the
/// catalog grows that we don't know about lands in `Other` and is treated
/// as a leaf product.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum NodeKind {
    Storefront,
    Container,
    Game,
    Film,
    TvSeries,
    TvSeason,
    Other(String),
}

impl From<String> for NodeKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "storefront" => NodeKind::Storefront,
            "container" => NodeKind::Container,
            "game" => NodeKind::Game,
            "film" => NodeKind::Film,
            "tv-series" => NodeKind::TvSeries,
            "tv-season" => NodeKind::TvSeason,
            _ => NodeKind::Other(s),
        }
    }
}

impl NodeKind {
    /// True for types that are recorded as products but may also be
    /// expanded as a container of variant editions.
    pub fn is_product_like(&self) -> bool {
        matches!(
            self,
            NodeKind::Game | NodeKind::Film | NodeKind::TvSeries | NodeKind::TvSeason
        )
    }
}

/// A declared child relationship: identifier plus declared type.
#[derive(Debug, Clone, Deserialize)]
pub struct ChildRef {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
}

/// Typed view of one catalog API response. Both storefront and container
/// endpoints answer with the same envelope:
/// `{"data": {"relationships": {"children": {"data": [{"id", "type"}, ..]}}}}`
#[derive(Debug, Deserialize)]
pub struct CatalogPage {
    data: PageData,
}

#[derive(Debug, Deserialize)]
struct PageData {
    relationships: Relationships,
}

#[derive(Debug, Deserialize)]
struct Relationships {
    children: ChildSet,
}

#[derive(Debug, Deserialize)]
struct ChildSet {
    data: Vec<ChildRef>,
}

impl CatalogPage {
    /// Parse a raw response body. A response missing the relationship
    /// fields is a malformed-catalog error, which aborts the run.
    pub fn from_value(doc: Value) -> Result<Self> {
        Ok(serde_json::from_value(doc)?)
    }

    pub fn into_children(self) -> Vec<ChildRef> {
        self.data.relationships.children.data
    }
}
