//! Engine error types with beautiful formatting

use indexmap::IndexMap;
use miette::{Diagnostic, NamedSource, SourceSpan};
use schemarender_core::{CoreError, Node, RenderContext};
use thiserror::Error;

use crate::suggestions::{
    AVAILABLE_FILTERS, deferred_hint, extract_filter_name, extract_identifier, suggest_undefined_variable,
    suggest_unknown_filter, suggest_unknown_function,
};

/// Main engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Template error")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Entry(#[from] EntryError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error("Invalid document: {message}")]
    InvalidDocument { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Error kind for categorizing template errors
///
/// Note: This enum is non-exhaustive - new variants may be added in future versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum TemplateErrorKind {
    UndefinedVariable,
    UnknownFilter,
    UnknownFunction,
    SyntaxError,
    TypeError,
    InvalidOperation,
    Other,
}

impl TemplateErrorKind {
    /// Convert to a code string for diagnostics
    pub fn to_code_string(&self) -> &'static str {
        match self {
            Self::UndefinedVariable => "undefined_variable",
            Self::UnknownFilter => "unknown_filter",
            Self::UnknownFunction => "unknown_function",
            Self::SyntaxError => "syntax",
            Self::TypeError => "type",
            Self::InvalidOperation => "invalid_operation",
            Self::Other => "render",
        }
    }
}

/// A string that failed to render, with source information
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("{message}")]
#[diagnostic(code(schemarender::template::render))]
pub struct TemplateError {
    /// Error message
    pub message: String,

    /// Error kind for categorization
    pub kind: TemplateErrorKind,

    /// The template string that failed
    #[source_code]
    pub src: NamedSource<String>,

    /// Error location in the template string
    #[label("error occurred here")]
    pub span: Option<SourceSpan>,

    /// Suggestion for fixing the error
    #[help]
    pub suggestion: Option<String>,
}

impl TemplateError {
    /// Build a template error from a MiniJinja error
    ///
    /// `context` is used to suggest close variable names when a lookup fails.
    pub fn from_minijinja(
        err: minijinja::Error,
        template_name: &str,
        template_source: &str,
        context: Option<&RenderContext>,
    ) -> Self {
        let kind = categorize_minijinja_error(&err);

        let span = err
            .range()
            .filter(|range| template_source.get(range.clone()).is_some())
            .map(|range| SourceSpan::new(range.start.into(), range.len().into()))
            .or_else(|| err.line().and_then(|line| calculate_span(template_source, line)));

        let expression = err
            .range()
            .and_then(|range| template_source.get(range))
            .map(|expr| expr.trim().to_string());

        let message = describe(&err, kind, expression.as_deref());
        let suggestion = generate_suggestion(kind, expression.as_deref(), context);

        Self {
            message,
            kind,
            src: NamedSource::new(template_name, template_source.to_string()),
            span,
            suggestion,
        }
    }

    /// Create a simple error without source mapping
    pub fn simple(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: TemplateErrorKind::Other,
            src: NamedSource::new("<unknown>", String::new()),
            span: None,
            suggestion: None,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> TemplateErrorKind {
        self.kind
    }
}

/// Categorize a MiniJinja error into our error kinds
fn categorize_minijinja_error(err: &minijinja::Error) -> TemplateErrorKind {
    match err.kind() {
        minijinja::ErrorKind::UndefinedError => TemplateErrorKind::UndefinedVariable,
        minijinja::ErrorKind::UnknownFilter => TemplateErrorKind::UnknownFilter,
        minijinja::ErrorKind::UnknownFunction | minijinja::ErrorKind::UnknownMethod => {
            TemplateErrorKind::UnknownFunction
        }
        minijinja::ErrorKind::SyntaxError => TemplateErrorKind::SyntaxError,
        minijinja::ErrorKind::InvalidOperation => TemplateErrorKind::InvalidOperation,
        minijinja::ErrorKind::NonPrimitive | minijinja::ErrorKind::NonKey => {
            TemplateErrorKind::TypeError
        }
        _ => {
            let msg = err.to_string().to_lowercase();
            if msg.contains("undefined") {
                TemplateErrorKind::UndefinedVariable
            } else if msg.contains("not iterable") || msg.contains("cannot") {
                TemplateErrorKind::TypeError
            } else {
                TemplateErrorKind::Other
            }
        }
    }
}

/// Human-readable message, naming the failing expression when known
fn describe(err: &minijinja::Error, kind: TemplateErrorKind, expression: Option<&str>) -> String {
    match (kind, expression) {
        (TemplateErrorKind::UndefinedVariable, Some(expr)) => {
            format!("undefined variable `{}`", expr)
        }
        (TemplateErrorKind::UnknownFilter, Some(expr)) => {
            format!("unknown filter `{}`", extract_filter_name(expr))
        }
        (TemplateErrorKind::UnknownFunction, Some(expr)) => {
            format!("unknown function `{}`", extract_identifier(expr))
        }
        _ => err
            .detail()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string())
            .replace("undefined value", "undefined variable"),
    }
}

/// Calculate the source span for a given line number
fn calculate_span(source: &str, line_num: usize) -> Option<SourceSpan> {
    let mut offset = 0;

    for (index, line) in source.lines().enumerate() {
        if index + 1 == line_num {
            return Some(SourceSpan::new(offset.into(), line.len().into()));
        }
        offset += line.len() + 1;
    }

    None
}

/// Generate context-aware suggestions based on error kind
fn generate_suggestion(
    kind: TemplateErrorKind,
    expression: Option<&str>,
    context: Option<&RenderContext>,
) -> Option<String> {
    match kind {
        TemplateErrorKind::UndefinedVariable => {
            let name = expression.map(extract_identifier)?;
            if let Some(hint) = deferred_hint(name) {
                return Some(hint);
            }

            let available: Vec<&str> = context.map(|c| c.names().collect()).unwrap_or_default();
            suggest_undefined_variable(name, &available).or_else(|| {
                Some(format!(
                    "Variable `{}` is not defined. Pass it with `--set {}=...` or use `| default(\"fallback\")`.",
                    name, name
                ))
            })
        }

        TemplateErrorKind::UnknownFilter => match expression {
            Some(expr) => suggest_unknown_filter(extract_filter_name(expr)),
            None => Some(format!(
                "Unknown filter. Available: {}",
                AVAILABLE_FILTERS.join(", ")
            )),
        },

        TemplateErrorKind::UnknownFunction => {
            let name = expression.map(extract_identifier)?;
            deferred_hint(name).or_else(|| suggest_unknown_function(name))
        }

        TemplateErrorKind::SyntaxError => Some(
            "Check bracket matching: `{{ }}` for expressions, `{% %}` for statements, `{# #}` for comments".to_string(),
        ),

        _ => None,
    }
}

/// A schema entry that failed to render, located within its document
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("could not render {section}[{index}]{}", entry_label(.name))]
#[diagnostic(code(schemarender::document::entry))]
pub struct EntryError {
    /// Top-level section the entry belongs to (`models`, `sources`, ...)
    pub section: String,

    /// Position of the entry within its section
    pub index: usize,

    /// The entry's `name` field, when it has a string one
    pub name: Option<String>,

    #[source]
    #[diagnostic_source]
    pub source: TemplateError,
}

impl EntryError {
    pub fn new(section: &str, index: usize, entry: &Node, source: TemplateError) -> Self {
        Self {
            section: section.to_string(),
            index,
            name: entry.get("name").and_then(Node::as_str).map(str::to_string),
            source,
        }
    }
}

/// A top-level field of a single resource that failed to render
#[derive(Error, Debug, Diagnostic, Clone)]
#[error("could not render {category} field `{field}`")]
#[diagnostic(code(schemarender::document::field))]
pub struct FieldError {
    /// Singular category name the resource was rendered as
    pub category: String,

    /// Top-level key whose value failed
    pub field: String,

    #[source]
    #[diagnostic_source]
    pub source: TemplateError,
}

fn entry_label(name: &Option<String>) -> String {
    name.as_ref()
        .map(|n| format!(" (name: {})", n))
        .unwrap_or_default()
}

/// A collection of errors from rendering every entry of a document
#[derive(Debug, Default)]
pub struct DocumentReport {
    /// Errors grouped by section (IndexMap preserves document order)
    pub errors_by_section: IndexMap<String, Vec<EntryError>>,

    /// Number of entries rendered without error
    pub rendered_entries: usize,

    /// Total error count
    pub total_errors: usize,
}

impl DocumentReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failed entry
    pub fn add_error(&mut self, error: EntryError) {
        self.errors_by_section
            .entry(error.section.clone())
            .or_default()
            .push(error);
        self.total_errors += 1;
    }

    /// Record a successfully rendered entry
    pub fn add_success(&mut self) {
        self.rendered_entries += 1;
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    /// Get count of sections with errors
    pub fn sections_with_errors(&self) -> usize {
        self.errors_by_section.len()
    }

    /// All errors in document order
    pub fn errors(&self) -> impl Iterator<Item = &EntryError> {
        self.errors_by_section.values().flatten()
    }

    /// Generate summary message: "5 errors in 3 sections"
    pub fn summary(&self) -> String {
        let section_word = if self.sections_with_errors() == 1 {
            "section"
        } else {
            "sections"
        };
        let error_word = if self.total_errors == 1 {
            "error"
        } else {
            "errors"
        };
        format!(
            "{} {} in {} {}",
            self.total_errors,
            error_word,
            self.sections_with_errors(),
            section_word
        )
    }
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
