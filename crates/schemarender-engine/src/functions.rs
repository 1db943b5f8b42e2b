//! Template functions (global functions available in templates)

use minijinja::{Error, ErrorKind, State, Value};

/// Look up a context variable by name, with an optional default
///
/// Usage: {{ var("target_schema", "analytics") }}
///
/// Unlike a bare `{{ target_schema }}`, a missing variable with a default is
/// not an error even in strict mode.
pub fn var(state: &State, name: &str, default: Option<Value>) -> Result<Value, Error> {
    match state.lookup(name) {
        Some(value) if !value.is_undefined() => Ok(value),
        _ => default.ok_or_else(|| {
            Error::new(
                ErrorKind::UndefinedError,
                format!("required variable `{}` is not set and has no default", name),
            )
        }),
    }
}

/// Read a process environment variable, with an optional default
///
/// Usage: {{ env_var("DBT_TARGET_SCHEMA", "dev") }}
pub fn env_var(name: &str, default: Option<String>) -> Result<String, Error> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) => default.ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidOperation,
                format!("environment variable `{}` is not set and has no default", name),
            )
        }),
    }
}
