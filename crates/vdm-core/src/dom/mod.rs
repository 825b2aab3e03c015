//! Document-interaction capability.
//!
//! The workflow depends only on this surface, never on a specific
//! automation product. The CLI implements it over a WebDriver session;
//! tests implement it over scripted fixture pages.

mod wait;

pub use wait::{wait_for_attr, wait_for_node, wait_for_url, wait_for_url_change, WaitPolicy};

use anyhow::Result;
use async_trait::async_trait;

/// Minimal browser-document surface the workflow needs.
///
/// Selectors are XPath strings; scoped lookups (`find_all_in`) take
/// relative XPath (`./...` or `descendant::...`). Node handles are opaque
/// and remain valid for the lifetime of the page they were found on.
#[async_trait]
pub trait Dom: Send + Sync {
    type Node: Clone + Send + Sync;

    async fn navigate(&self, url: &str) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// All nodes matching `xpath`, in document order. Empty when none match.
    async fn find_all(&self, xpath: &str) -> Result<Vec<Self::Node>>;

    /// All nodes matching a relative `xpath` under `scope`.
    async fn find_all_in(&self, scope: &Self::Node, xpath: &str) -> Result<Vec<Self::Node>>;

    async fn click(&self, node: &Self::Node) -> Result<()>;

    async fn clear(&self, node: &Self::Node) -> Result<()>;

    async fn set_value(&self, node: &Self::Node, text: &str) -> Result<()>;

    /// Attribute value, `None` when absent. Implementations resolve
    /// `"value"` against the live property so form controls report what
    /// the operator (or autofill) actually entered.
    async fn get_attribute(&self, node: &Self::Node, name: &str) -> Result<Option<String>>;

    /// Visible text content, trimmed by the renderer.
    async fn text(&self, node: &Self::Node) -> Result<String>;

    async fn is_visible(&self, node: &Self::Node) -> Result<bool>;
}

/// First node matching `xpath`, or `None`.
pub async fn find_first<D: Dom>(dom: &D, xpath: &str) -> Result<Option<D::Node>> {
    Ok(dom.find_all(xpath).await?.into_iter().next())
}

/// First node matching a relative `xpath` under `scope`, or `None`.
pub async fn find_first_in<D: Dom>(
    dom: &D,
    scope: &D::Node,
    xpath: &str,
) -> Result<Option<D::Node>> {
    Ok(dom.find_all_in(scope, xpath).await?.into_iter().next())
}

/// True when any node matching `xpath` is currently visible.
pub async fn any_visible<D: Dom>(dom: &D, xpath: &str) -> Result<bool> {
    for node in dom.find_all(xpath).await? {
        if dom.is_visible(&node).await? {
            return Ok(true);
        }
    }
    Ok(false)
}
