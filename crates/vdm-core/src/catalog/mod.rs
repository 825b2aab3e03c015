//! Version catalog resolution.
//!
//! The flat listing covers the newest releases; everything older sits
//! behind a single catch-all "archive" entry that is an expandable tree,
//! not a flat row, and must be searched separately (see `archive`).

pub mod archive;

use anyhow::{anyhow, Context, Result};

use crate::dom::{self, Dom, WaitPolicy};
use crate::error::Error;
use crate::portal;
use crate::version::VersionSpec;

/// One listed version with its navigation handle.
#[derive(Debug, Clone)]
pub struct CatalogEntry<N> {
    pub version: VersionSpec,
    pub node: N,
}

/// The catalog page scanned once per session. Not mutated afterwards.
#[derive(Debug)]
pub struct Catalog<N> {
    entries: Vec<CatalogEntry<N>>,
    archive: Option<N>,
    /// Highest listed version, projected to `major.minor`.
    highest: Option<VersionSpec>,
}

/// The catalog entry a target version resolved to.
#[derive(Debug, Clone)]
pub struct ResolvedEntry<N> {
    pub node: N,
    /// True when the target fell back to the archive entry and its
    /// download groups must be located via archive expansion.
    pub from_archive: bool,
}

/// Scan the version navigation into a catalog.
///
/// Labels that parse as versions become entries; the one matching the
/// archive label becomes the fallback; anything else is ignored.
pub async fn scan<D: Dom>(dom: &D, policy: &WaitPolicy) -> Result<Catalog<D::Node>> {
    // The nav renders late; wait for the first anchor before scanning.
    dom::wait_for_node(dom, policy, portal::VERSION_NAV, "version catalog listing").await?;

    let mut entries = Vec::new();
    let mut archive = None;
    let mut highest: Option<VersionSpec> = None;

    for node in dom.find_all(portal::VERSION_NAV).await? {
        let label = dom.text(&node).await?;
        let label = label.trim();
        match VersionSpec::parse(label) {
            Ok(version) => {
                let base = version.base();
                let is_new_high = match highest {
                    Some(h) => base.try_cmp(&h)?.is_gt(),
                    None => true,
                };
                if is_new_high {
                    highest = Some(base);
                }
                entries.push(CatalogEntry { version, node });
            }
            Err(_) if label.eq_ignore_ascii_case(portal::ARCHIVE_LABEL) => {
                archive = Some(node);
            }
            Err(_) => {}
        }
    }

    tracing::debug!(
        listed = entries.len(),
        has_archive = archive.is_some(),
        "scanned version catalog"
    );
    Ok(Catalog {
        entries,
        archive,
        highest,
    })
}

impl<N: Clone> Catalog<N> {
    /// Resolve `target` to a listed entry or the archive fallback.
    ///
    /// Fails when the target exceeds every known release: even the
    /// archive cannot contain it. The check projects the target to
    /// `major.minor` so point-release targets compare against the
    /// patch-less listing.
    pub fn resolve(&self, target: &VersionSpec) -> Result<ResolvedEntry<N>> {
        let highest = self.highest.ok_or(Error::VersionUnavailable {
            target: *target,
            highest: None,
        })?;
        if target.base().try_cmp(&highest)?.is_gt() {
            return Err(Error::VersionUnavailable {
                target: *target,
                highest: Some(highest),
            }
            .into());
        }

        if let Some(entry) = self.entries.iter().find(|e| e.version == *target) {
            return Ok(ResolvedEntry {
                node: entry.node.clone(),
                from_archive: false,
            });
        }

        let archive = self
            .archive
            .as_ref()
            .ok_or_else(|| anyhow!("catalog listing has no archive entry to fall back to"))?;
        Ok(ResolvedEntry {
            node: archive.clone(),
            from_archive: true,
        })
    }

    pub fn highest(&self) -> Option<VersionSpec> {
        self.highest
    }
}

/// Navigate to a resolved entry and block until the destination URL
/// settles.
pub async fn open_entry<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    entry: &ResolvedEntry<D::Node>,
) -> Result<String> {
    let href = dom
        .get_attribute(&entry.node, "href")
        .await?
        .context("catalog entry has no href")?;
    dom.navigate(&href).await?;
    dom::wait_for_url(dom, policy, &href, "catalog page navigation").await?;
    tracing::info!(url = %href, "opened catalog entry");
    Ok(href)
}
