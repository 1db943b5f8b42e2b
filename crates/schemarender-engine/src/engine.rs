//! Template engine based on MiniJinja

use minijinja::Environment;
use schemarender_core::RenderContext;

use crate::error::TemplateError;
use crate::filters;
use crate::functions;

/// Name MiniJinja reports for inline template strings
const INLINE_TEMPLATE_NAME: &str = "<string>";

/// The capability of evaluating one template string against a context
///
/// Implementations must be pure: they may read the context but never mutate
/// caller-visible state.
pub trait TemplateEngine {
    type Error;

    fn evaluate(&self, template: &str, context: &RenderContext) -> Result<String, Self::Error>;
}

/// Whether a string contains any Jinja markers worth evaluating
pub fn has_template_syntax(s: &str) -> bool {
    s.contains("{{") || s.contains("{%") || s.contains("{#")
}

/// Template engine builder
pub struct EngineBuilder {
    strict_mode: bool,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self { strict_mode: true }
    }

    /// Set strict mode (fail on undefined variables)
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Build the engine
    pub fn build(self) -> Engine {
        Engine::new(self.strict_mode)
    }
}

/// The template engine
///
/// The MiniJinja environment is configured once and shared by every
/// evaluation, so one engine can serve many renderers across threads.
pub struct Engine {
    env: Environment<'static>,
    strict_mode: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Engine {
    /// Create a new engine
    pub fn new(strict_mode: bool) -> Self {
        Self {
            env: create_environment(strict_mode),
            strict_mode,
        }
    }

    /// Create a builder
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub fn is_strict(&self) -> bool {
        self.strict_mode
    }

    /// Render a single template string through MiniJinja, without the fast path
    pub fn render_string(&self, template: &str, context: &RenderContext) -> Result<String, TemplateError> {
        self.env
            .render_str(template, context.vars())
            .map_err(|e| TemplateError::from_minijinja(e, INLINE_TEMPLATE_NAME, template, Some(context)))
    }
}

impl TemplateEngine for Engine {
    type Error = TemplateError;

    fn evaluate(&self, template: &str, context: &RenderContext) -> Result<String, TemplateError> {
        if !has_template_syntax(template) {
            return Ok(template.to_string());
        }
        self.render_string(template, context)
    }
}

/// Create a configured MiniJinja environment
fn create_environment(strict_mode: bool) -> Environment<'static> {
    let mut env = Environment::new();

    if strict_mode {
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
    } else {
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Lenient);
    }

    // Block scalars in YAML end with a newline that must survive rendering
    env.set_keep_trailing_newline(true);

    env.add_filter("quote", filters::quote);
    env.add_filter("squote", filters::squote);
    env.add_filter("snakecase", filters::snakecase);
    env.add_filter("kebabcase", filters::kebabcase);

    env.add_function("var", functions::var);
    env.add_function("env_var", functions::env_var);

    env
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemplateErrorKind;

    fn create_test_context() -> RenderContext {
        RenderContext::from_yaml(r#"
test_var: "1234"
alt_var: replaced
target:
  schema: analytics
  threads: 4
"#)
        .unwrap()
    }

    #[test]
    fn test_render_simple() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let result = engine.evaluate("{{ test_var }}", &ctx).unwrap();
        assert_eq!(result, "1234");
    }

    #[test]
    fn test_render_nested_variable_with_filter() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let result = engine
            .evaluate("{{ target.schema | upper }}_{{ target.threads }}", &ctx)
            .unwrap();
        assert_eq!(result, "ANALYTICS_4");
    }

    #[test]
    fn test_custom_filters_registered() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let result = engine
            .evaluate("{{ 'OrderItems' | snakecase }} {{ alt_var | squote }}", &ctx)
            .unwrap();
        assert_eq!(result, "order_items 'replaced'");
    }

    #[test]
    fn test_plain_string_returned_unchanged() {
        let engine = Engine::default();
        let ctx = create_test_context();

        assert_eq!(engine.evaluate("my_model", &ctx).unwrap(), "my_model");
        assert_eq!(engine.evaluate("a {single} brace", &ctx).unwrap(), "a {single} brace");
        assert_eq!(engine.evaluate("", &ctx).unwrap(), "");
    }

    #[test]
    fn test_trailing_newline_preserved() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let result = engine.evaluate("select {{ test_var }}\n", &ctx).unwrap();
        assert_eq!(result, "select 1234\n");
    }

    #[test]
    fn test_comment_syntax_is_rendered() {
        let engine = Engine::default();
        let ctx = create_test_context();

        assert_eq!(engine.evaluate("a{# note #}b", &ctx).unwrap(), "ab");
    }

    #[test]
    fn test_undefined_error_strict() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let err = engine.evaluate("{{ test_vra }}", &ctx).unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::UndefinedVariable);
    }

    #[test]
    fn test_undefined_lenient() {
        let engine = Engine::builder().strict(false).build();
        let ctx = create_test_context();

        assert!(!engine.is_strict());
        assert_eq!(engine.evaluate("x{{ missing }}y", &ctx).unwrap(), "xy");
    }

    #[test]
    fn test_unknown_function_error() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let err = engine.evaluate("{{ docs('my_doc') }}", &ctx).unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::UnknownFunction);
    }

    #[test]
    fn test_syntax_error() {
        let engine = Engine::default();
        let ctx = create_test_context();

        let err = engine.evaluate("{{ test_var ", &ctx).unwrap_err();
        assert_eq!(err.kind(), TemplateErrorKind::SyntaxError);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_var_function() {
        let engine = Engine::default();
        let ctx = create_test_context();

        assert_eq!(engine.evaluate("{{ var('alt_var') }}", &ctx).unwrap(), "replaced");
        assert_eq!(engine.evaluate("{{ var('nope', 'dflt') }}", &ctx).unwrap(), "dflt");
    }

    #[test]
    fn test_has_template_syntax() {
        assert!(has_template_syntax("{{ x }}"));
        assert!(has_template_syntax("{% if x %}y{% endif %}"));
        assert!(has_template_syntax("{# c #}"));
        assert!(!has_template_syntax("plain { text }"));
    }

    #[test]
    fn test_engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Engine>();
    }
}
