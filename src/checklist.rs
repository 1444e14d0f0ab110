//! Migration checklist generation.
//!
//! The checklist and the `create-checklist` tool text are markdown
//! templates compiled into the binary. Placeholders use `{{NAME}}` and are
//! substituted with plain string replacement.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::config::Config;

const CHECKLIST_TEMPLATE: &str = include_str!("../templates/checklist.md");
const INSTRUCTIONS_TEMPLATE: &str = include_str!("../templates/create-checklist.md");

/// File name the agent is told to save the checklist as.
pub const CHECKLIST_FILE: &str = "AI_SDK_5_MIGRATION.md";

/// Route serving the generated checklist.
pub const CHECKLIST_ROUTE: &str = "/api/checklist";

/// Route serving the conversion functions download.
pub const CONVERSION_FUNCTIONS_ROUTE: &str = "/api/conversion-functions";

/// Render the migration checklist.
///
/// `base_url` is the externally visible server URL without a trailing
/// slash; the download link for the conversion functions is built from
/// it. `date` fills the "Last Updated" footer (`YYYY-MM-DD`).
pub fn generate_checklist(base_url: &str, date: NaiveDate) -> String {
    let conversion_url = format!("{}{}", base_url, CONVERSION_FUNCTIONS_ROUTE);
    CHECKLIST_TEMPLATE
        .replace("{{CONVERSION_FUNCTIONS_URL}}", &conversion_url)
        .replace("{{LAST_UPDATED}}", &date.format("%Y-%m-%d").to_string())
}

/// Text returned by the `create-checklist` tool, telling the agent to
/// download the checklist from `api_url`.
pub fn create_checklist_instructions(api_url: &str) -> String {
    INSTRUCTIONS_TEMPLATE
        .replace("{{API_URL}}", api_url)
        .replace("{{CHECKLIST_PATH}}", CHECKLIST_FILE)
}

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// CLI entry point for `migration-mcp checklist`.
///
/// Writes the checklist to `output` when given, otherwise prints it.
pub fn run_checklist(config: &Config, output: Option<&Path>) -> Result<()> {
    let text = generate_checklist(&config.server.base_url(), today());

    match output {
        Some(path) => {
            std::fs::write(path, &text)
                .with_context(|| format!("Failed to write checklist: {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = text.len(), "checklist written");
            println!("Wrote {}", path.display());
        }
        None => print!("{}", text),
    }

    Ok(())
}
