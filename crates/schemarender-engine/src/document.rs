//! Rendering of whole schema documents
//!
//! A schema document is a mapping of sections (`models:`, `sources:`, ...),
//! each a sequence of entries. Every entry is rendered with a [`Renderer`] for
//! the section's category. Values that are not sequences (such as
//! `version: 2`) pass through verbatim.

use schemarender_core::{Mapping, Node, RenderContext, ResourceCategory};
use tracing::debug;

use crate::engine::TemplateEngine;
use crate::error::{DocumentReport, EngineError, EntryError, FieldError, Result, TemplateError};
use crate::renderer::Renderer;

/// A rendered document together with every entry failure
#[derive(Debug)]
pub struct RenderedDocument {
    /// The document; entries that failed are kept as they were
    pub document: Node,

    /// Error report (empty if every entry rendered)
    pub report: DocumentReport,
}

impl RenderedDocument {
    /// Check if rendering was fully successful (no errors)
    pub fn is_success(&self) -> bool {
        !self.report.has_errors()
    }
}

fn sections(document: &Node) -> Result<&Mapping> {
    document.as_mapping().ok_or_else(|| EngineError::InvalidDocument {
        message: format!(
            "expected a mapping of sections at the top level, got a {}",
            document.kind_name()
        ),
    })
}

/// Render a whole tree as a single resource of `category`
///
/// A failure under a top-level key is reported with that key. A tree that is
/// not a mapping is rendered as-is and fails with the bare template error.
pub fn render_resource<E>(
    engine: &E,
    context: &RenderContext,
    category: ResourceCategory,
    tree: &Node,
) -> Result<Node>
where
    E: TemplateEngine<Error = TemplateError> + ?Sized,
{
    let renderer = Renderer::new(engine, context, category);
    debug!(category = %renderer.category(), kind = tree.kind_name(), "rendering single resource");

    let Node::Mapping(fields) = tree else {
        return Ok(renderer.render_data(tree)?);
    };

    let mut rendered = Mapping::with_capacity(fields.len());
    for (field, value) in fields {
        let value = renderer
            .render_field(field, value)
            .map_err(|source| FieldError {
                category: renderer.category().to_string(),
                field: field.clone(),
                source,
            })?;
        rendered.insert(field.clone(), value);
    }

    Ok(Node::Mapping(rendered))
}

/// Render every section of a document, stopping at the first failing entry
pub fn render_document<E>(engine: &E, context: &RenderContext, document: &Node) -> Result<Node>
where
    E: TemplateEngine<Error = TemplateError> + ?Sized,
{
    let sections = sections(document)?;
    let mut rendered = Mapping::with_capacity(sections.len());

    for (section, value) in sections {
        let Node::Sequence(entries) = value else {
            rendered.insert(section.clone(), value.clone());
            continue;
        };

        let renderer = Renderer::new(engine, context, ResourceCategory::parse(section));
        debug!(
            section = %section,
            category = %renderer.category(),
            entries = entries.len(),
            "rendering section"
        );

        let mut out = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let entry = renderer
                .render_data(entry)
                .map_err(|source| EntryError::new(section, index, entry, source))?;
            out.push(entry);
        }
        rendered.insert(section.clone(), Node::Sequence(out));
    }

    Ok(Node::Mapping(rendered))
}

/// Render every entry of a document, collecting errors instead of stopping
///
/// Unlike [`render_document`], a failing entry does not abort the document:
/// it is recorded in the report and kept unrendered in the output. Only a
/// document that is not a mapping is an error.
pub fn render_document_collect_errors<E>(
    engine: &E,
    context: &RenderContext,
    document: &Node,
) -> Result<RenderedDocument>
where
    E: TemplateEngine<Error = TemplateError> + ?Sized,
{
    let sections = sections(document)?;
    let mut rendered = Mapping::with_capacity(sections.len());
    let mut report = DocumentReport::new();

    for (section, value) in sections {
        let Node::Sequence(entries) = value else {
            rendered.insert(section.clone(), value.clone());
            continue;
        };

        let renderer = Renderer::new(engine, context, ResourceCategory::parse(section));
        debug!(
            section = %section,
            category = %renderer.category(),
            entries = entries.len(),
            "rendering section, collecting errors"
        );

        let mut out = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match renderer.render_data(entry) {
                Ok(entry) => {
                    report.add_success();
                    out.push(entry);
                }
                Err(source) => {
                    report.add_error(EntryError::new(section, index, entry, source));
                    out.push(entry.clone());
                }
            }
        }
        rendered.insert(section.clone(), Node::Sequence(out));
    }

    if report.has_errors() {
        debug!(summary = %report.summary(), "document rendered with errors");
    }

    Ok(RenderedDocument {
        document: Node::Mapping(rendered),
        report,
    })
}
