//! Exclusions command - show which fields each category leaves verbatim

use miette::Result;
use schemarender_core::ResourceCategory;

use crate::display::{format_exclusion_table, format_exclusions};

pub fn run(category: Option<&str>) -> Result<()> {
    match category {
        Some(name) => println!("{}", format_exclusions(&ResourceCategory::parse(name))),
        None => println!("{}", format_exclusion_table()),
    }
    Ok(())
}
