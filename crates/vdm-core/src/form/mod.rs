//! Dynamic member-download form engine.
//!
//! The form is an ordered table of mixed text/select fields, some
//! optional. One conditional rule exists: choosing a Location can reveal
//! an enabled state select, which then replaces the free-text
//! State/Province control for the rest of the session. After a full fill
//! pass the form is submitted; a rejected submission restarts the entire
//! pass, with previously entered values surfacing as the live controls'
//! new previous values.

mod fill;

use anyhow::{Context, Result};
use tokio::time::Instant;

use crate::console::{self, Console};
use crate::dom::{self, Dom, WaitPolicy};
use crate::monitor::ExpectedDownload;
use crate::portal;

/// A fillable control. Selects are filled by clicking an option node;
/// text inputs by clear-and-type.
#[derive(Debug, Clone)]
pub enum Control<N> {
    Text(N),
    Select(N),
}

/// One labeled form field. Table order is fill order.
#[derive(Debug, Clone)]
pub struct FormField<N> {
    pub label: String,
    pub control: Control<N>,
    pub optional: bool,
}

impl<N> FormField<N> {
    pub fn text(label: &str, node: N, optional: bool) -> Self {
        Self {
            label: label.to_string(),
            control: Control::Text(node),
            optional,
        }
    }

    pub fn select(label: &str, node: N, optional: bool) -> Self {
        Self {
            label: label.to_string(),
            control: Control::Select(node),
            optional,
        }
    }
}

/// Conditional-field rule: after `trigger` is filled, probe for a newly
/// available control; when found it replaces `target`'s control in the
/// table (position and optional flag kept) for this and later passes.
#[derive(Debug, Clone)]
pub struct ConditionalRule {
    pub trigger: String,
    pub target: String,
    pub probe_xpath: String,
}

/// The portal's one conditional rule: Location drives State/Province.
pub fn conditional_rules() -> Vec<ConditionalRule> {
    vec![ConditionalRule {
        trigger: "Location".to_string(),
        target: "State/Province".to_string(),
        probe_xpath: portal::STATE_SELECT_PROBE.to_string(),
    }]
}

/// Collect the member download form fields in display order.
///
/// Waits for the first input to render, then requires the rest: a
/// missing control means the portal layout changed, which is fatal.
pub async fn collect_fields<D: Dom>(
    dom: &D,
    policy: &WaitPolicy,
) -> Result<Vec<FormField<D::Node>>> {
    let first_name =
        dom::wait_for_node(dom, policy, portal::FIELD_FIRST_NAME, "member download form").await?;

    let required = |xpath: &str, label: &str| {
        let label = label.to_string();
        let xpath = xpath.to_string();
        async move {
            dom::find_first(dom, &xpath)
                .await?
                .with_context(|| format!("form control {label:?} not found"))
        }
    };

    Ok(vec![
        FormField::text("First Name", first_name, false),
        FormField::text("Last Name", required(portal::FIELD_LAST_NAME, "Last Name").await?, false),
        FormField::text("Company", required(portal::FIELD_COMPANY, "Company").await?, false),
        FormField::text("Address 1", required(portal::FIELD_ADDRESS_1, "Address 1").await?, false),
        FormField::text("Address 2", required(portal::FIELD_ADDRESS_2, "Address 2").await?, true),
        FormField::select("Location", required(portal::FIELD_COUNTRY, "Location").await?, false),
        // Required for some countries; the conditional rule swaps in an
        // enabled select once a location is chosen.
        FormField::text("State/Province", required(portal::FIELD_STATE, "State/Province").await?, true),
        FormField::text("City", required(portal::FIELD_CITY, "City").await?, false),
        FormField::text("Postal Code", required(portal::FIELD_ZIP, "Postal Code").await?, true),
        FormField::text("Phone", required(portal::FIELD_PHONE, "Phone").await?, true),
        FormField::select("Job Function", required(portal::FIELD_JOB_FUNCTION, "Job Function").await?, false),
    ])
}

/// Outcome of one form submission.
enum Submission {
    DownloadStarted,
    Rejected,
}

/// Fills the field table and submits until a download starts.
pub struct FormEngine<'a, D: Dom> {
    dom: &'a D,
    policy: &'a WaitPolicy,
    fields: Vec<FormField<D::Node>>,
    rules: Vec<ConditionalRule>,
    submit: D::Node,
}

impl<'a, D: Dom> FormEngine<'a, D> {
    pub fn new(
        dom: &'a D,
        policy: &'a WaitPolicy,
        fields: Vec<FormField<D::Node>>,
        rules: Vec<ConditionalRule>,
        submit: D::Node,
    ) -> Self {
        Self {
            dom,
            policy,
            fields,
            rules,
            submit,
        }
    }

    /// Fill passes and submissions until the monitored download starts.
    ///
    /// A visible error element after submission prints a failure notice
    /// and restarts the whole pass; only a wait timeout aborts.
    pub async fn run<C: Console>(
        &mut self,
        console: &mut C,
        expected: &ExpectedDownload,
    ) -> Result<()> {
        loop {
            console.say(&console::rule())?;
            self.fill_pass(console).await?;
            self.dom.click(&self.submit).await?;
            tracing::debug!("submitted member download form");

            match self.wait_for_submission(expected).await? {
                Submission::DownloadStarted => {
                    tracing::info!("download started");
                    return Ok(());
                }
                Submission::Rejected => {
                    console.say(
                        "Failed to download the binary. Please check your information and try again.",
                    )?;
                    tracing::warn!("form submission rejected");
                }
            }
        }
    }

    /// One full pass over the field table, in order, applying conditional
    /// rules after each trigger field.
    async fn fill_pass<C: Console>(&mut self, console: &mut C) -> Result<()> {
        for i in 0..self.fields.len() {
            let field = self.fields[i].clone();
            match &field.control {
                Control::Select(node) => {
                    fill::fill_select(self.dom, console, &field.label, node, field.optional)
                        .await?;
                }
                Control::Text(node) => {
                    fill::fill_text(self.dom, console, &field.label, node, field.optional).await?;
                }
            }
            self.apply_rules(&field.label).await?;
        }
        Ok(())
    }

    /// Probe every rule triggered by `label`; a hit swaps the target
    /// field's control in place.
    async fn apply_rules(&mut self, label: &str) -> Result<()> {
        for rule in &self.rules {
            if rule.trigger != label {
                continue;
            }
            let Some(node) = dom::find_first(self.dom, &rule.probe_xpath).await? else {
                continue;
            };
            if let Some(idx) = self.fields.iter().position(|f| f.label == rule.target) {
                tracing::debug!(target = %rule.target, "conditional rule replaced field control");
                self.fields[idx].control = Control::Select(node);
            }
        }
        Ok(())
    }

    /// Block until the download shows progress or an error element shows.
    async fn wait_for_submission(&self, expected: &ExpectedDownload) -> Result<Submission> {
        let deadline = self.policy.deadline();
        loop {
            if expected.progress()? > 0.0 {
                return Ok(Submission::DownloadStarted);
            }
            if dom::any_visible(self.dom, portal::FORM_ERROR).await? {
                return Ok(Submission::Rejected);
            }
            if Instant::now() >= deadline {
                return Err(self.policy.timed_out("form submission outcome").into());
            }
            tokio::time::sleep(self.policy.interval).await;
        }
    }
}
