//! Archive expansion: locate a version inside the collapsed archive tree.

use anyhow::Result;

use crate::dom::{self, Dom, WaitPolicy};
use crate::portal;
use crate::version::VersionSpec;

/// Expand the archive section for `target` and return the revealed
/// region to scope the artifact scan to.
///
/// Toggle labels are matched against the target's canonical string
/// exactly (trimmed). `None` when no toggle matches; artifact
/// enumeration then fails with its no-artifacts error.
pub async fn expand<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    target: &VersionSpec,
) -> Result<Option<D::Node>> {
    let wanted = target.to_string();
    for toggle in dom.find_all(portal::ARCHIVE_TOGGLES).await? {
        if dom.text(&toggle).await?.trim() != wanted {
            continue;
        }
        dom.click(&toggle).await?;
        dom::wait_for_attr(
            dom,
            policy,
            &toggle,
            "aria-expanded",
            "true",
            "archive section to expand",
        )
        .await?;
        tracing::info!(version = %target, "expanded archive section");
        return dom::find_first(dom, portal::EXPANDED_REGION).await;
    }
    tracing::warn!(version = %target, "no archive section matched the target version");
    Ok(None)
}
