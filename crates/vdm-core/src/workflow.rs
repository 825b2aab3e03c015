//! Top-level download workflow.
//!
//! Strictly sequential: resolve version, pick artifact, authenticate if
//! the portal asks, fill the member form, then poll the download to
//! completion. Each stage blocks until its exit condition is observed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::artifact;
use crate::auth;
use crate::catalog::{self, archive};
use crate::console::{self, Console};
use crate::dom::{self, Dom, WaitPolicy};
use crate::error::Error;
use crate::form::{self, FormEngine};
use crate::monitor::{ExpectedDownload, DEFAULT_TEMP_SUFFIX};
use crate::portal;
use crate::version::VersionSpec;

/// Everything the workflow needs besides the live session.
#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    pub portal_url: String,
    pub download_dir: PathBuf,
    pub policy: WaitPolicy,
    /// Interval between progress reports once the download is running.
    pub monitor_interval: Duration,
    /// Interim-file suffix of the download agent.
    pub temp_suffix: String,
}

impl WorkflowOptions {
    pub fn new(download_dir: PathBuf) -> Self {
        Self {
            portal_url: portal::DEFAULT_PORTAL_URL.to_string(),
            download_dir,
            policy: WaitPolicy::default(),
            monitor_interval: Duration::from_secs(1),
            temp_suffix: DEFAULT_TEMP_SUFFIX.to_string(),
        }
    }
}

/// Drive the full session; returns the path the file was saved to.
pub async fn run<D: Dom, C: Console>(
    dom: &D,
    console: &mut C,
    target: &VersionSpec,
    opts: &WorkflowOptions,
) -> Result<PathBuf> {
    let policy = &opts.policy;

    tracing::info!(version = %target, url = %opts.portal_url, "starting download workflow");
    dom.navigate(&opts.portal_url).await?;

    // Version resolution against the live catalog.
    let catalog = catalog::scan(dom, policy).await?;
    let entry = catalog.resolve(target)?;
    catalog::open_entry(dom, policy, &entry).await?;

    // Artifact enumeration and the single operator pick. Archive targets
    // get their groups from the expanded region only; no matching
    // section means no artifacts, not a whole-page scan.
    let choices = if entry.from_archive {
        match archive::expand(dom, policy, target).await? {
            Some(region) => artifact::enumerate(dom, console, target, Some(&region)).await?,
            None => return Err(Error::NoArtifacts { version: *target }.into()),
        }
    } else {
        artifact::enumerate(dom, console, target, None).await?
    };
    let pick = artifact::choose(console, target, choices.len())?;
    let chosen = &choices[pick];
    tracing::info!(title = %chosen.title, size = %chosen.size_label, "artifact chosen");

    // Follow the link; a login redirect means authentication first.
    let before = dom.current_url().await?;
    dom.click(&chosen.node).await?;
    let after = dom::wait_for_url_change(dom, policy, &before, "artifact link navigation").await?;
    if after.contains(portal::LOGIN_MARKER) {
        auth::authenticate(dom, console, policy).await?;
    }

    // The member download form names the file it will deliver.
    let fields = form::collect_fields(dom, policy).await?;
    let submit = dom::wait_for_node(dom, policy, portal::FORM_SUBMIT, "form submit button").await?;
    let filename_input =
        dom::wait_for_node(dom, policy, portal::FORM_FILENAME, "download filename field").await?;
    let filename = dom
        .get_attribute(&filename_input, "value")
        .await?
        .context("download filename field has no value")?;

    let expected = ExpectedDownload {
        dir: opts.download_dir.clone(),
        filename,
        expected_bytes: chosen.declared_size,
        temp_suffix: opts.temp_suffix.clone(),
    };

    console.say("Additional information is required for the download ...")?;
    console.say("U.S. Government Export Approval:")?;
    console.say(
        "- U.S. export regulations require that your First Name, Last Name, Company Name and Shipping Address be verified before AMD can fulfill your download request. Please provide accurate and complete information.",
    )?;
    console.say(
        "- Addresses with Post Office Boxes and names/addresses with Non-Roman Characters with accents such as grave, tilde or colon are not supported by US export compliance systems.",
    )?;

    let mut engine = FormEngine::new(dom, policy, fields, form::conditional_rules(), submit);
    engine.run(console, &expected).await?;

    // Download is running; poll it to completion.
    console.say(&console::rule())?;
    console.say(&format!("{} ({})", expected.filename, chosen.size_label))?;
    monitor_to_completion(console, &expected, opts.monitor_interval).await?;

    let path = expected.final_path();
    console.say("")?;
    console.say(&format!("File saved to {}", path.display()))?;
    console.pause("Press Enter to exit ...")?;
    tracing::info!(path = %path.display(), "download complete");
    Ok(path)
}

/// Poll progress at a fixed interval, reporting percent, elapsed, and a
/// progress-derived remaining estimate, until the final file is in place.
async fn monitor_to_completion<C: Console>(
    console: &mut C,
    expected: &ExpectedDownload,
    interval: Duration,
) -> Result<()> {
    let start = Instant::now();
    loop {
        tokio::time::sleep(interval).await;
        let progress = expected.progress()?;

        let elapsed = start.elapsed().as_secs_f64();
        let remaining = if progress > 0.0 {
            (100.0 - progress) * elapsed / progress
        } else {
            0.0
        };
        console.status(&format!(
            "Download progress: {progress:.2}% | Elapsed: {} | Remaining: {}",
            format_hms(elapsed),
            format_hms(remaining)
        ))?;

        if progress >= 100.0 {
            return Ok(());
        }
    }
}

/// Render seconds as `HH:MM:SS`.
fn format_hms(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    format!("{:02}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hms_rendering() {
        assert_eq!(format_hms(0.0), "00:00:00");
        assert_eq!(format_hms(59.9), "00:00:59");
        assert_eq!(format_hms(61.0), "00:01:01");
        assert_eq!(format_hms(3661.0), "01:01:01");
        assert_eq!(format_hms(-5.0), "00:00:00");
    }
}
