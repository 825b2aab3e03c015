//! Artifact enumeration and operator selection.
//!
//! A resolved version page carries one or more download groups; each
//! group holds candidate links. Links qualify when their URL contains the
//! target's canonical version string or the member download form marker.

use anyhow::{Context, Result};

use crate::console::{self, Console};
use crate::dom::{self, Dom};
use crate::error::Error;
use crate::portal;
use crate::size::parse_size;
use crate::version::VersionSpec;

/// One downloadable file offered for the resolved version.
#[derive(Debug, Clone)]
pub struct ArtifactChoice<N> {
    pub node: N,
    pub title: String,
    /// Size label as printed on the page, e.g. "103.46 MB".
    pub size_label: String,
    /// The label parsed to bytes; the completion threshold for the
    /// download monitor.
    pub declared_size: u64,
}

/// Enumerate matching artifacts, printing each group's header,
/// description, and 1-indexed `(title, size)` lines.
///
/// `scope` restricts the scan to an expanded archive region; `Some` scope
/// comes from archive expansion, `None` means the flat version page.
/// Fails with the no-artifacts error when nothing matches across all
/// groups (including an absent scope, i.e. archive expansion found no
/// section).
pub async fn enumerate<D: Dom, C: Console>(
    dom: &D,
    console: &mut C,
    target: &VersionSpec,
    scope: Option<&D::Node>,
) -> Result<Vec<ArtifactChoice<D::Node>>> {
    let groups = match scope {
        Some(region) => {
            dom.find_all_in(region, portal::DOWNLOAD_GROUPS_SCOPED)
                .await?
        }
        None => dom.find_all(portal::DOWNLOAD_GROUPS).await?,
    };

    let version_marker = target.to_string();
    let mut choices = Vec::new();

    if !groups.is_empty() {
        console.say(&console::rule())?;
    }
    for group in &groups {
        if let Some(header) = dom::find_first_in(dom, group, portal::GROUP_HEADER).await? {
            let text = dom.text(&header).await?;
            if !text.trim().is_empty() {
                console.say(text.trim())?;
            }
        }
        if let Some(alert) = dom::find_first_in(dom, group, portal::GROUP_ALERT).await? {
            let text = dom.text(&alert).await?;
            if !text.trim().is_empty() {
                console.say(text.trim())?;
            }
        }

        for link in dom.find_all_in(group, portal::GROUP_LINKS).await? {
            let Some(url) = dom.get_attribute(&link, "href").await? else {
                continue;
            };
            if !url.contains(&version_marker) && !url.contains(portal::MEMBER_FORM_MARKER) {
                continue;
            }

            let title = dom
                .get_attribute(&link, "data-original-title")
                .await?
                .unwrap_or_default();
            let info = match dom::find_first_in(dom, &link, portal::LINK_INFO).await? {
                Some(span) => dom.text(&span).await?,
                None => continue,
            };
            let size_label = size_label_from_info(&info);
            let declared_size = parse_size(&size_label)
                .with_context(|| format!("size of {title:?} ({info:?})"))?;

            console.say(&format!("({}): {} {}", choices.len() + 1, title, info))?;
            choices.push(ArtifactChoice {
                node: link,
                title,
                size_label,
                declared_size,
            });
        }
        console.say(&console::rule())?;
    }

    if choices.is_empty() {
        return Err(Error::NoArtifacts { version: *target }.into());
    }
    tracing::info!(count = choices.len(), version = %target, "enumerated artifacts");
    Ok(choices)
}

/// Extract the size label from an info span like "(ZIP - 103.46 MB)".
fn size_label_from_info(info: &str) -> String {
    info.rsplit('-')
        .next()
        .unwrap_or(info)
        .trim()
        .trim_end_matches(')')
        .trim()
        .to_string()
}

/// Prompt the operator for one pick, 1-indexed; returns a 0-based index.
///
/// Re-prompts on non-numeric or out-of-range input; there is no cancel
/// path, only valid input exits.
pub fn choose<C: Console>(console: &mut C, target: &VersionSpec, count: usize) -> Result<usize> {
    let mut prompt = format!(
        "Found {count} files associated with version {target} ...\nRead the descriptions above and choose the file to download [1-{count}]: "
    );
    loop {
        let response = console.prompt_line(&prompt)?;
        if let Ok(n) = response.trim().parse::<usize>() {
            if (1..=count).contains(&n) {
                return Ok(n - 1);
            }
        }
        prompt =
            format!("Read the descriptions above and choose the file to download [1-{count}]: ");
    }
}
