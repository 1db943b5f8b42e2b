//! CLI error types with exit code handling
//!
//! Commands return `miette::Result`; [`exit_code`] inspects the report to
//! pick the process exit status.

use miette::Diagnostic;
use schemarender_core::CoreError;
use schemarender_engine::{EngineError, EntryError, FieldError, TemplateError};
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Variables, --set arguments or the document itself are unusable
    #[error("Invalid input: {message}")]
    #[diagnostic(code(schemarender::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// One or more entries failed to render
    #[error("Rendering failed: {summary}")]
    #[diagnostic(code(schemarender::cli::render))]
    RenderFailed { summary: String },

    /// The rendered document could not be written as YAML or JSON
    #[error("Failed to write rendered document: {message}")]
    #[diagnostic(code(schemarender::cli::output))]
    Output { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(schemarender::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => exit_codes::INPUT_ERROR,
            CliError::RenderFailed { .. } => exit_codes::TEMPLATE_ERROR,
            CliError::Output { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Classify a core error raised while loading `what`
    pub fn loading(what: &str, err: CoreError) -> Self {
        match err {
            CoreError::Io(io) => Self::Io {
                message: format!("{}: {}", what, io),
            },
            other => Self::Input {
                message: format!("{}: {}", what, other),
                help: None,
            },
        }
    }
}

/// Turn an engine error into a report that keeps its diagnostic details
pub fn engine_report(err: EngineError) -> miette::Report {
    match err {
        EngineError::Entry(entry) => miette::Report::new(entry),
        EngineError::Field(field) => miette::Report::new(field),
        EngineError::Template(template) => miette::Report::new(template),
        EngineError::InvalidDocument { message } => miette::Report::new(CliError::Input {
            message,
            help: Some("Pass --category to render a file that is a single resource".to_string()),
        }),
        EngineError::Core(core) => miette::Report::new(CliError::loading("document", core)),
    }
}

/// Exit status for a failed command
pub fn exit_code(report: &miette::Report) -> i32 {
    if let Some(cli) = report.downcast_ref::<CliError>() {
        cli.exit_code()
    } else if report.downcast_ref::<EntryError>().is_some()
        || report.downcast_ref::<FieldError>().is_some()
        || report.downcast_ref::<TemplateError>().is_some()
    {
        exit_codes::TEMPLATE_ERROR
    } else {
        exit_codes::ERROR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let io = CliError::loading("vars.yml", CoreError::Io(std::io::Error::other("gone")));
        assert_eq!(io.exit_code(), exit_codes::IO_ERROR);

        let input = CliError::loading(
            "--set",
            CoreError::InvalidSet {
                message: "bad".to_string(),
            },
        );
        assert_eq!(input.exit_code(), exit_codes::INPUT_ERROR);

        let failed = CliError::RenderFailed {
            summary: "1 error in 1 section".to_string(),
        };
        assert_eq!(failed.exit_code(), exit_codes::TEMPLATE_ERROR);

        let output = CliError::Output {
            message: "cannot serialize".to_string(),
        };
        assert_eq!(output.exit_code(), exit_codes::ERROR);
        assert_eq!(
            output.to_string(),
            "Failed to write rendered document: cannot serialize"
        );
    }

    #[test]
    fn test_exit_code_from_report() {
        let report = miette::Report::new(TemplateError::simple("boom"));
        assert_eq!(exit_code(&report), exit_codes::TEMPLATE_ERROR);

        let report = engine_report(EngineError::InvalidDocument {
            message: "not a mapping".to_string(),
        });
        assert_eq!(exit_code(&report), exit_codes::INPUT_ERROR);

        let report = engine_report(EngineError::Field(FieldError {
            category: "source".to_string(),
            field: "schema".to_string(),
            source: TemplateError::simple("boom"),
        }));
        assert_eq!(exit_code(&report), exit_codes::TEMPLATE_ERROR);

        let report = miette::miette!("something else");
        assert_eq!(exit_code(&report), exit_codes::ERROR);
    }
}
