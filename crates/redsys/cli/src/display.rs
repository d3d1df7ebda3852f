//! Display utilities for the Redsys CLI

use colored::Colorize;
use redsys_core::{Classification, NormalizedResult};

/// Format a success message
pub(crate) fn success(message: &str) -> String {
    format!("✅ {}", message.green().bold())
}

/// Format a warning message
pub(crate) fn warning(message: &str) -> String {
    format!("⚠️  {}", message.yellow().bold())
}

/// Format an error message
pub(crate) fn failure(message: &str) -> String {
    format!("❌ {}", message.red().bold())
}

/// Format a key-value section for important outputs
pub(crate) fn key_value_box(title: &str, items: Vec<(&str, String)>) -> String {
    let mut result = format!("{}", title.bold().underline());

    for (key, value) in items {
        result.push_str(&format!("\n  {}: {}", key.bold(), value));
    }

    result
}

/// One-line summary of an evaluated response
pub(crate) fn outcome(result: &NormalizedResult) -> String {
    let description = result
        .description
        .as_ref()
        .map_or("no description", |entry| entry.message.as_str());
    let line = format!("{} ({}): {description}", result.classification, result.code);

    match result.classification {
        Classification::Authorized => success(&line),
        Classification::Declined => warning(&line),
        Classification::ProtocolError => failure(&line),
    }
}
