//! Bounded waits over the document capability.
//!
//! Every stage blocks on a specific predicate (element present, URL
//! changed, attribute value) with a configurable timeout. An expired wait
//! is fatal; only the explicitly modeled prompt loops retry.

use std::time::Duration;

use anyhow::Result;
use tokio::time::Instant;

use crate::dom::Dom;
use crate::error::Error;

/// Timeout and poll interval for one bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(20),
            interval: Duration::from_millis(500),
        }
    }
}

impl WaitPolicy {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }

    pub fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    /// The fatal error for a wait on `what` that expired.
    pub fn timed_out(&self, what: &str) -> Error {
        Error::WaitTimeout {
            what: what.to_string(),
            timeout: self.timeout,
        }
    }
}

/// Wait until a node matching `xpath` exists; returns the first match.
pub async fn wait_for_node<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    xpath: &str,
    what: &str,
) -> Result<D::Node> {
    let deadline = policy.deadline();
    loop {
        if let Some(node) = dom.find_all(xpath).await?.into_iter().next() {
            return Ok(node);
        }
        if Instant::now() >= deadline {
            return Err(policy.timed_out(what).into());
        }
        tokio::time::sleep(policy.interval).await;
    }
}

/// Wait until the current URL differs from `from`; returns the new URL.
pub async fn wait_for_url_change<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    from: &str,
    what: &str,
) -> Result<String> {
    let deadline = policy.deadline();
    loop {
        let url = dom.current_url().await?;
        if url != from {
            return Ok(url);
        }
        if Instant::now() >= deadline {
            return Err(policy.timed_out(what).into());
        }
        tokio::time::sleep(policy.interval).await;
    }
}

/// Wait until the current URL equals `expected` (navigation settled).
pub async fn wait_for_url<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    expected: &str,
    what: &str,
) -> Result<()> {
    let deadline = policy.deadline();
    loop {
        if dom.current_url().await? == expected {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(policy.timed_out(what).into());
        }
        tokio::time::sleep(policy.interval).await;
    }
}

/// Wait until `node`'s attribute `name` equals `expected`.
pub async fn wait_for_attr<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    node: &D::Node,
    name: &str,
    expected: &str,
    what: &str,
) -> Result<()> {
    let deadline = policy.deadline();
    loop {
        if dom.get_attribute(node, name).await?.as_deref() == Some(expected) {
            return Ok(());
        }
        if Instant::now() >= deadline {
            return Err(policy.timed_out(what).into());
        }
        tokio::time::sleep(policy.interval).await;
    }
}
