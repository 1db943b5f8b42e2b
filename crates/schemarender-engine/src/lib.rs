//! schemarender Engine - selective Jinja2 rendering of schema documents
//!
//! This crate provides:
//! - `Renderer`: renders a configuration tree while leaving each category's
//!   deferred fields (and everything below them) verbatim
//! - `TemplateEngine`: the capability a renderer evaluates strings with, and
//!   `Engine`, its MiniJinja implementation
//! - Document rendering that locates failures by section and entry
//! - Human-readable error messages with suggestions

pub mod document;
pub mod engine;
pub mod error;
pub mod filters;
pub mod functions;
pub mod renderer;
pub mod suggestions;

pub use document::{RenderedDocument, render_document, render_document_collect_errors, render_resource};
pub use engine::{Engine, EngineBuilder, TemplateEngine, has_template_syntax};
pub use error::{DocumentReport, EngineError, EntryError, FieldError, TemplateError, TemplateErrorKind};
pub use renderer::Renderer;
pub use suggestions::{AVAILABLE_FILTERS, AVAILABLE_FUNCTIONS};
