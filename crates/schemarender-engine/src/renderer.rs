//! Selective rendering of configuration trees
//!
//! A [`Renderer`] walks a tree top-down and evaluates every string through a
//! [`TemplateEngine`], except under fields its category defers. A deferred
//! field is copied as-is together with everything nested below it: exclusion
//! stops the descent, it does not merely skip one string.

use schemarender_core::{Mapping, Node, RenderContext, ResourceCategory};
use tracing::trace;

use crate::engine::TemplateEngine;

/// Renders configuration trees of one resource category against one context
///
/// Holds no per-call state; construct once and call [`Renderer::render_data`]
/// for every document of the category.
pub struct Renderer<'a, E: TemplateEngine + ?Sized> {
    engine: &'a E,
    context: &'a RenderContext,
    category: ResourceCategory,
}

impl<'a, E: TemplateEngine + ?Sized> Renderer<'a, E> {
    /// Create a renderer; unknown categories are accepted and render every field
    pub fn new(engine: &'a E, context: &'a RenderContext, category: ResourceCategory) -> Self {
        Self {
            engine,
            context,
            category,
        }
    }

    pub fn category(&self) -> &ResourceCategory {
        &self.category
    }

    pub fn context(&self) -> &RenderContext {
        self.context
    }

    /// Render a tree, returning a new one and leaving the input untouched
    ///
    /// The first engine failure aborts the whole call and is returned as-is.
    pub fn render_data(&self, tree: &Node) -> Result<Node, E::Error> {
        match tree {
            Node::Mapping(map) => self.render_mapping(map).map(Node::Mapping),
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.render_data(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Sequence),
            Node::String(template) => self.engine.evaluate(template, self.context).map(Node::String),
            Node::Scalar(_) => Ok(tree.clone()),
        }
    }

    fn render_mapping(&self, map: &Mapping) -> Result<Mapping, E::Error> {
        let mut rendered = Mapping::with_capacity(map.len());

        for (field, value) in map {
            rendered.insert(field.clone(), self.render_field(field, value)?);
        }

        Ok(rendered)
    }

    /// Render the value of one mapping field, or copy it if the field is deferred
    pub fn render_field(&self, field: &str, value: &Node) -> Result<Node, E::Error> {
        if self.category.excludes(field) {
            trace!(field = %field, category = %self.category, "leaving deferred field verbatim");
            return Ok(value.clone());
        }
        self.render_data(value)
    }
}
