//! schemarender Core - Core types for selective schema rendering
//!
//! This crate provides the foundational types used throughout schemarender:
//! - `Node`: The configuration tree parsed from a schema document
//! - `ResourceCategory`: Which kind of resource a tree describes, and which of
//!   its fields are deferred to a later pass
//! - `RenderContext`: Template variables with deep merge support

pub mod category;
pub mod context;
pub mod error;
pub mod node;

pub use category::ResourceCategory;
pub use context::{RenderContext, parse_set_values};
pub use error::{CoreError, Result};
pub use node::{Mapping, Node, Scalar};
