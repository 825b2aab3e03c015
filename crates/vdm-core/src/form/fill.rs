//! Per-field prompt loops.
//!
//! Phrasing rules: a field with a non-blank previous value offers "leave
//! empty for autofilled value"; an optional field is annotated
//! "(optional)". Loops only exit on acceptable input.

use anyhow::Result;

use crate::console::Console;
use crate::dom::Dom;
use crate::portal;

/// Prompt for a select control: list non-placeholder options 1-indexed,
/// then require a valid pick, or accept empty to keep a non-blank
/// previous selection.
pub(super) async fn fill_select<D: Dom, C: Console>(
    dom: &D,
    console: &mut C,
    label: &str,
    node: &D::Node,
    optional: bool,
) -> Result<()> {
    // Option 0 is the placeholder; the displayed 1-indexed list starts
    // at the first real option.
    let options = dom.find_all_in(node, portal::SELECT_OPTIONS).await?;
    if options.len() <= 1 {
        return Ok(());
    }
    let count = options.len() - 1;
    let previous = dom.get_attribute(node, "value").await?.unwrap_or_default();

    console.say(&format!("{label}:"))?;
    for (i, option) in options.iter().skip(1).enumerate() {
        let text = dom.text(option).await?;
        console.say(&format!("\t({}): {}", i + 1, text))?;
    }

    let request = select_request(count, &previous, optional);
    loop {
        let response = console.prompt_line(&request)?;
        if response.is_empty() && !previous.trim().is_empty() {
            return Ok(());
        }
        if let Ok(n) = response.parse::<usize>() {
            if (1..=count).contains(&n) {
                dom.click(&options[n]).await?;
                return Ok(());
            }
        }
    }
}

/// Prompt for a text input: accept empty when a non-blank previous value
/// exists or the field is optional, otherwise require non-empty input.
pub(super) async fn fill_text<D: Dom, C: Console>(
    dom: &D,
    console: &mut C,
    label: &str,
    node: &D::Node,
    optional: bool,
) -> Result<()> {
    let previous = dom.get_attribute(node, "value").await?.unwrap_or_default();
    let request = text_request(label, &previous, optional);
    loop {
        let response = console.prompt_line(&request)?;
        if response.is_empty() {
            if !previous.trim().is_empty() || optional {
                return Ok(());
            }
            continue;
        }
        dom.clear(node).await?;
        dom.set_value(node, &response).await?;
        return Ok(());
    }
}

fn select_request(count: usize, previous: &str, optional: bool) -> String {
    if !previous.trim().is_empty() {
        if optional {
            format!("Choice [1-{count}] (optional, leave empty for autofilled value \"{previous}\"): ")
        } else {
            format!("Choice [1-{count}] (leave empty for autofilled value \"{previous}\"): ")
        }
    } else if optional {
        format!("Choice [1-{count}] (optional): ")
    } else {
        format!("Choice [1-{count}]: ")
    }
}

fn text_request(label: &str, previous: &str, optional: bool) -> String {
    if !previous.trim().is_empty() {
        if optional {
            format!("{label} (optional, leave empty for autofilled value \"{previous}\"): ")
        } else {
            format!("{label} (leave empty for autofilled value \"{previous}\"): ")
        }
    } else if optional {
        format!("{label} (optional): ")
    } else {
        format!("{label}: ")
    }
}
