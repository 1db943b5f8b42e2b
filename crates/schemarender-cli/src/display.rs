//! Display formatting for CLI output
//!
//! Reports go to stderr so stdout stays a clean rendered document.

use console::style;
use schemarender_core::ResourceCategory;
use schemarender_engine::DocumentReport;

/// Display a document report with errors grouped by section
pub fn display_document_report(report: &DocumentReport) {
    eprintln!(
        "  {} Rendering failed: {}",
        style("✗").red(),
        style(report.summary()).bold()
    );
    eprintln!();

    for (section, errors) in &report.errors_by_section {
        eprintln!(
            "  {} {} ({})",
            style("→").blue(),
            style(section).yellow(),
            pluralize(errors.len(), "error", "errors")
        );

        for error in errors {
            eprintln!("    {} {}: {}", style("✗").red(), error, error.source.message);

            if let Some(suggestion) = &error.source.suggestion {
                eprintln!("      {} {}", style("hint:").blue(), suggestion);
            }
        }
        eprintln!();
    }

    if report.rendered_entries > 0 {
        eprintln!(
            "  {} {} rendered successfully",
            style("✓").green(),
            pluralize(report.rendered_entries, "entry", "entries")
        );
    }
}

/// One line per category: `model: description`
pub fn format_exclusions(category: &ResourceCategory) -> String {
    let fields = category.excluded_fields();
    let fields = if fields.is_empty() {
        style("(none)").dim().to_string()
    } else {
        fields.join(", ")
    };
    format!("{}: {}", style(category.name()).cyan().bold(), fields)
}

/// The whole exclusion table, one known category per line
pub fn format_exclusion_table() -> String {
    ResourceCategory::known()
        .iter()
        .map(format_exclusions)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format count with proper pluralization
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}
