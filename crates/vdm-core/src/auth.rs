//! Login flow, entered only when the artifact click redirected to the
//! login page.
//!
//! Unauthenticated -> Submitting -> Authenticated, with each rejection
//! looping back to Submitting. There is no retry cap; the loop is
//! operator-bounded.

use anyhow::Result;
use tokio::time::Instant;

use crate::console::{self, Console};
use crate::dom::{self, Dom, WaitPolicy};
use crate::portal;

/// Outcome of one credential submission.
enum Submission {
    Accepted,
    Rejected,
}

/// Run the credential loop until the portal accepts a login.
///
/// Assumes the current URL is the login page. Each round prompts for
/// email and password (no echo), fills both inputs, submits, then blocks
/// until the URL moves off the login page (accepted) or an error
/// indicator shows while the URL is unchanged (rejected, re-prompt).
pub async fn authenticate<D: Dom, C: Console>(
    dom: &D,
    console: &mut C,
    policy: &WaitPolicy,
) -> Result<()> {
    let login_url = dom.current_url().await?;
    console.say("Authentication is required ...")?;

    let email_input = dom::wait_for_node(dom, policy, portal::LOGIN_EMAIL, "login form").await?;
    let password_input = dom::wait_for_node(dom, policy, portal::LOGIN_PASSWORD, "password input").await?;
    let submit = dom::wait_for_node(dom, policy, portal::LOGIN_SUBMIT, "login submit button").await?;

    loop {
        console.say(&console::rule())?;
        let email = console.prompt_line("Email: ")?;
        dom.clear(&email_input).await?;
        dom.set_value(&email_input, &email).await?;

        let password = console.prompt_secret("Password: ")?;
        dom.clear(&password_input).await?;
        dom.set_value(&password_input, &password).await?;

        dom.click(&submit).await?;
        tracing::debug!("submitted credentials");

        match wait_for_submission(dom, policy, &login_url).await? {
            Submission::Accepted => {
                console.say("Successfully authenticated!")?;
                tracing::info!("authentication accepted");
                return Ok(());
            }
            Submission::Rejected => {
                console.say("Failed to authenticate. Please check your credentials and try again.")?;
                tracing::warn!("authentication rejected");
            }
        }
    }
}

/// Block until the URL changes away from the login page or an error
/// indicator becomes visible while it has not.
async fn wait_for_submission<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
    login_url: &str,
) -> Result<Submission> {
    let deadline = policy.deadline();
    loop {
        if dom.current_url().await? != login_url {
            return Ok(Submission::Accepted);
        }
        if dom::any_visible(dom, portal::LOGIN_ERROR).await? {
            return Ok(Submission::Rejected);
        }
        if Instant::now() >= deadline {
            return Err(policy.timed_out("login submission outcome").into());
        }
        tokio::time::sleep(policy.interval).await;
    }
}
