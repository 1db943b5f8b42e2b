//! Resource categories and their exclusion policy
//!
//! Each category names the fields whose values are left verbatim by the first
//! rendering pass. Those fields either call template functions that only exist
//! in a later pass (`doc()`, `this`, `Dimension()`), or carry template syntax
//! meant for a different consumer. Matching is by field name alone, at any
//! depth of the tree.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

const MODEL_EXCLUSIONS: &[&str] = &["description"];
const SOURCE_EXCLUSIONS: &[&str] = &["description", "loaded_at_query"];
const MACRO_EXCLUSIONS: &[&str] = &["description"];
const METRIC_EXCLUSIONS: &[&str] = &["description", "filter"];

/// The kind of resource a configuration tree describes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    Model,
    Source,
    Macro,
    Metric,
    /// Any category without deferred fields; everything renders
    Other(String),
}

impl ResourceCategory {
    /// Categories with a non-empty exclusion set, in table order
    pub fn known() -> [ResourceCategory; 4] {
        [Self::Model, Self::Source, Self::Macro, Self::Metric]
    }

    /// Parse a category from a singular or plural name (`model`, `models`)
    ///
    /// Never fails: unrecognized names become [`ResourceCategory::Other`].
    pub fn parse(name: &str) -> Self {
        match name {
            "model" | "models" => Self::Model,
            "source" | "sources" => Self::Source,
            "macro" | "macros" => Self::Macro,
            "metric" | "metrics" => Self::Metric,
            other => Self::Other(other.to_string()),
        }
    }

    /// Singular name of the category
    pub fn name(&self) -> &str {
        match self {
            Self::Model => "model",
            Self::Source => "source",
            Self::Macro => "macro",
            Self::Metric => "metric",
            Self::Other(name) => name,
        }
    }

    /// Field names whose subtrees must not be rendered for this category
    pub fn excluded_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Model => MODEL_EXCLUSIONS,
            Self::Source => SOURCE_EXCLUSIONS,
            Self::Macro => MACRO_EXCLUSIONS,
            Self::Metric => METRIC_EXCLUSIONS,
            Self::Other(_) => &[],
        }
    }

    /// Whether `field` is deferred for this category
    pub fn excludes(&self, field: &str) -> bool {
        self.excluded_fields().contains(&field)
    }
}

impl FromStr for ResourceCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ResourceCategory {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
