//! Fuzzy matching and hints for template errors
//!
//! Levenshtein distance picks close names for typos. Names that belong to the
//! deferred rendering pass get a dedicated hint instead, since no spelling fix
//! will make them resolvable here.

/// Maximum Levenshtein distance to consider for suggestions
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// All registered filters in the engine
pub const AVAILABLE_FILTERS: &[&str] = &[
    // Custom filters
    "quote",
    "squote",
    "snakecase",
    "kebabcase",
    // Built-in MiniJinja filters
    "default",
    "upper",
    "lower",
    "title",
    "capitalize",
    "replace",
    "trim",
    "join",
    "first",
    "last",
    "length",
    "reverse",
    "sort",
    "unique",
    "map",
    "select",
    "reject",
    "dictsort",
    "items",
    "int",
    "float",
    "round",
    "string",
    "list",
    "bool",
    "tojson",
    "urlencode",
];

/// All registered functions in the engine
pub const AVAILABLE_FUNCTIONS: &[&str] = &[
    // Custom functions
    "var",
    "env_var",
    // Built-in MiniJinja globals
    "range",
    "dict",
    "namespace",
];

/// Names only resolvable by the pass that renders deferred fields
pub const DEFERRED_NAMES: &[&str] = &[
    "doc",
    "docs",
    "this",
    "Dimension",
    "TimeDimension",
    "Entity",
    "Metric",
];

/// Suggestion result with its distance
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// The suggested correction
    pub text: String,
    /// Levenshtein distance (lower = better match)
    pub distance: usize,
}

/// Find closest matches from a list of candidates
pub fn find_closest_matches(input: &str, candidates: &[&str], max_results: usize) -> Vec<Suggestion> {
    let mut suggestions: Vec<Suggestion> = candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = strsim::levenshtein(input, candidate);
            (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE).then(|| Suggestion {
                text: candidate.to_string(),
                distance,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| s.distance);
    suggestions.truncate(max_results);
    suggestions
}

fn did_you_mean(matches: &[Suggestion]) -> String {
    let names: Vec<String> = matches.iter().map(|s| format!("`{}`", s.text)).collect();
    format!("Did you mean {}?", names.join(" or "))
}

/// Hint for a name that only the later rendering pass can resolve
pub fn deferred_hint(name: &str) -> Option<String> {
    DEFERRED_NAMES.contains(&name).then(|| {
        format!(
            "`{}` is resolved in a later pass. It may only appear in deferred fields such as `description`; run `schemarender exclusions` to list them.",
            name
        )
    })
}

/// Suggest corrections for an undefined variable
pub fn suggest_undefined_variable(variable_name: &str, available_variables: &[&str]) -> Option<String> {
    let matches = find_closest_matches(variable_name, available_variables, 3);
    (!matches.is_empty()).then(|| did_you_mean(&matches))
}

/// Suggest corrections for an unknown filter
pub fn suggest_unknown_filter(filter_name: &str) -> Option<String> {
    let matches = find_closest_matches(filter_name, AVAILABLE_FILTERS, 3);

    if !matches.is_empty() {
        Some(did_you_mean(&matches))
    } else {
        Some(format!(
            "Unknown filter `{}`. Common filters: default, quote, lower, upper, replace, snakecase",
            filter_name
        ))
    }
}

/// Suggest corrections for an unknown function
pub fn suggest_unknown_function(func_name: &str) -> Option<String> {
    let matches = find_closest_matches(func_name, AVAILABLE_FUNCTIONS, 3);

    if !matches.is_empty() {
        Some(did_you_mean(&matches))
    } else {
        Some(format!(
            "Unknown function `{}`. Available functions: {}",
            func_name,
            AVAILABLE_FUNCTIONS.join(", ")
        ))
    }
}

/// Leading identifier of an expression: `target.schema | upper` gives `target`
pub fn extract_identifier(expr: &str) -> &str {
    let expr = expr.trim_start();
    let end = expr
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(expr.len());
    &expr[..end]
}

/// Filter name of a filtered expression: `name | toyml(2)` gives `toyml`
pub fn extract_filter_name(expr: &str) -> &str {
    let last = expr.rsplit('|').next().unwrap_or(expr);
    extract_identifier(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_closest_matches() {
        let matches = find_closest_matches("snakcase", AVAILABLE_FILTERS, 3);
        assert!(!matches.is_empty());
        assert_eq!(matches[0].text, "snakecase");
        assert_eq!(matches[0].distance, 1);
    }

    #[test]
    fn test_exact_match_is_not_a_suggestion() {
        assert!(find_closest_matches("quote", &["quote"], 3).is_empty());
    }

    #[test]
    fn test_suggest_undefined_variable() {
        let suggestion = suggest_undefined_variable("test_vra", &["test_var", "alt_var"]).unwrap();
        assert!(suggestion.contains("`test_var`"));

        assert!(suggest_undefined_variable("completely_different", &["test_var"]).is_none());
    }

    #[test]
    fn test_suggest_unknown_function() {
        assert!(suggest_unknown_function("env_vr").unwrap().contains("`env_var`"));
        assert!(
            suggest_unknown_function("lookup_everything")
                .unwrap()
                .contains("Available functions")
        );
    }

    #[test]
    fn test_deferred_hint() {
        assert!(deferred_hint("docs").unwrap().contains("later pass"));
        assert!(deferred_hint("Dimension").is_some());
        assert!(deferred_hint("target").is_none());
    }

    #[test]
    fn test_extract_identifier() {
        assert_eq!(extract_identifier("target.schema | upper"), "target");
        assert_eq!(extract_identifier("  docs('my_doc')"), "docs");
        assert_eq!(extract_identifier("test_var"), "test_var");
        assert_eq!(extract_identifier("'quoted'"), "");
    }

    #[test]
    fn test_extract_filter_name() {
        assert_eq!(extract_filter_name("name | toyml(2)"), "toyml");
        assert_eq!(extract_filter_name("name|lower|snakcase"), "snakcase");
        assert_eq!(extract_filter_name("toyml"), "toyml");
    }
}
