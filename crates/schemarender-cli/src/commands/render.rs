//! Render command - render a schema document (or a single resource) to stdout

use clap::ValueEnum;
use miette::Result;
use schemarender_core::{Node, RenderContext, ResourceCategory, parse_set_values};
use schemarender_engine::{Engine, render_document, render_document_collect_errors, render_resource};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::display::display_document_report;
use crate::error::{CliError, engine_report};

/// Serialization format for the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

pub struct RenderArgs<'a> {
    pub file: &'a Path,
    pub vars_files: &'a [PathBuf],
    pub set_values: &'a [String],
    pub category: Option<&'a str>,
    pub output: OutputFormat,
    pub lenient: bool,
    pub keep_going: bool,
}

pub fn run(args: RenderArgs<'_>) -> Result<()> {
    let context = load_context(args.vars_files, args.set_values)?;

    let document = Node::from_file(args.file)
        .map_err(|e| CliError::loading(&args.file.display().to_string(), e))?;
    debug!(file = %args.file.display(), kind = document.kind_name(), "loaded document");

    let engine = Engine::builder().strict(!args.lenient).build();

    let rendered = match args.category {
        Some(name) => render_resource(&engine, &context, ResourceCategory::parse(name), &document)
            .map_err(engine_report)?,
        None if args.keep_going => {
            let result =
                render_document_collect_errors(&engine, &context, &document).map_err(engine_report)?;
            if !result.is_success() {
                display_document_report(&result.report);
                for error in result.report.errors() {
                    eprintln!("{:?}", miette::Report::new(error.clone()));
                }
                return Err(CliError::RenderFailed {
                    summary: result.report.summary(),
                }
                .into());
            }
            result.document
        }
        None => render_document(&engine, &context, &document).map_err(engine_report)?,
    };

    let text = match args.output {
        OutputFormat::Yaml => rendered.to_yaml(),
        OutputFormat::Json => rendered.to_json_pretty().map(|json| json + "\n"),
    }
    .map_err(|e| CliError::Output {
        message: e.to_string(),
    })?;

    print!("{}", text);
    Ok(())
}

/// Merge `-f` files in order, then apply `--set` overrides on top
fn load_context(vars_files: &[PathBuf], set_values: &[String]) -> Result<RenderContext> {
    let files = vars_files
        .iter()
        .map(|path| {
            debug!(file = %path.display(), "loading variables");
            RenderContext::from_file(path).map_err(|e| CliError::loading(&path.display().to_string(), e))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let mut context = RenderContext::merge_all(files);

    if !set_values.is_empty() {
        let overrides = parse_set_values(set_values).map_err(|e| {
            CliError::input_with_help(e.to_string(), "Use --set key=value, e.g. --set target.schema=dev")
        })?;
        context.merge(&overrides);
        debug!(count = set_values.len(), "applied --set values");
    }

    Ok(context)
}
