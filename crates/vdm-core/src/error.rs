//! Fatal error taxonomy for the download workflow.
//!
//! Recoverable failures (wrong credentials, invalid menu choice, empty
//! required field, rejected form submission) are handled by re-prompt loops
//! and never appear here. Everything below aborts the run.

use std::time::Duration;

use crate::version::VersionSpec;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed version or size string. Raised before any navigation.
    #[error("invalid format: {0}")]
    Format(String),

    /// Comparison between a patch-qualified and a patch-less version.
    #[error("cannot compare version {a} with {b}: one has a patch component and the other does not")]
    Comparability { a: VersionSpec, b: VersionSpec },

    /// The target version exceeds every version the portal knows about.
    #[error("version {target} is not available on the downloads page{}", highest_hint(.highest))]
    VersionUnavailable {
        target: VersionSpec,
        highest: Option<VersionSpec>,
    },

    /// The version resolved but no downloadable file matched it.
    #[error("no files found for the specified version {version}")]
    NoArtifacts { version: VersionSpec },

    /// A bounded wait expired. Not retried; surfaces to the operator.
    #[error("timed out after {timeout:?} waiting for {what}")]
    WaitTimeout { what: String, timeout: Duration },
}

fn highest_hint(highest: &Option<VersionSpec>) -> String {
    match highest {
        Some(v) => format!("; highest version available is {v}"),
        None => String::new(),
    }
}
