use super::commands::ConvertOutcome;
use super::OutputFormat;
use crate::resolver::alias::AliasEntry;

/// Format a conversion summary.
pub fn format_convert_summary(outcome: &ConvertOutcome, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(outcome).unwrap_or_default(),
        OutputFormat::Text => {
            let mut output = format!(
                "Converted {} files ({}ms)",
                outcome.files_converted, outcome.duration_ms,
            );
            if outcome.files_failed > 0 {
                output.push_str(&format!(", {} failed:", outcome.files_failed));
                for err in &outcome.errors {
                    output.push_str(&format!("\n  {}", err));
                }
            }
            output
        }
    }
}

/// Format the resolved alias table.
pub fn format_aliases(entries: &[AliasEntry], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let value: Vec<serde_json::Value> = entries
                .iter()
                .map(|e| {
                    serde_json::json!({
                        "prefix": e.prefix,
                        "target": e.target.to_string_lossy(),
                    })
                })
                .collect();
            serde_json::to_string_pretty(&value).unwrap_or_default()
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                return "No path aliases configured".to_string();
            }
            let mut output = String::new();
            for e in entries {
                output.push_str(&format!("{:<20} -> {}\n", e.prefix, e.target.display()));
            }
            output.trim_end().to_string()
        }
    }
}
