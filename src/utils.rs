//!
//! Utility functions shared by configuration loading and the version registry.
//!
//! This module provides:
//! - [`replace_handlebars_with_env`] - Template substitution for environment variables
//! - [`expand_base_url`] - Substitutes a version token into a base URL template
//!

use {
    regex::{Captures, Regex},
    std::{env, sync::LazyLock},
};

/// Placeholder substituted by [`expand_base_url`].
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Regular expression pattern for matching handlebars-style environment variable references.
/// Matches patterns like `{{ VAR_NAME }}` with optional whitespace around the variable name.
/// Variable names must be uppercase letters, digits, or underscores (standard env var naming).
static HANDLEBAR_REGEXP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Z0-9_]+)\s*\}\}").unwrap());

/// Replaces handlebars-style placeholders with environment variable values.
///
/// Searches through the input string for patterns like `{{ VAR_NAME }}` and replaces
/// them with the corresponding environment variable value. Whitespace around the
/// variable name is allowed: `{{VAR}}`, `{{ VAR }}`, and `{{  VAR  }}` are equivalent.
/// If an environment variable is not set, it is replaced with an empty string.
///
/// # Examples
///
/// ```
/// use axum_route_gen::replace_handlebars_with_env;
///
/// let template = "Value: {{ AXUM_ROUTE_GEN_MISSING_VAR }}";
/// let result = replace_handlebars_with_env(template);
/// assert_eq!(result, "Value: ");
/// ```
pub fn replace_handlebars_with_env(input: &str) -> String {
    HANDLEBAR_REGEXP
        .replace_all(input, |caps: &Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!(
                    variable = %var_name,
                    "Environment variable not found, substituting with empty string"
                );
                String::new()
            })
        })
        .to_string()
}

/// Expands a base URL template for one API version.
///
/// Every occurrence of `{version}` is replaced with the version token.
///
/// ```
/// use axum_route_gen::expand_base_url;
///
/// assert_eq!(expand_base_url("/api/{version}", "v2"), "/api/v2");
/// assert_eq!(expand_base_url("/{version}/public", "v1"), "/v1/public");
/// ```
pub fn expand_base_url(template: &str, version: &str) -> String {
    template.replace(VERSION_PLACEHOLDER, version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_expand_base_url_default_template() {
        assert_eq!(expand_base_url("/api/{version}", "v1"), "/api/v1");
    }

    #[test]
    fn test_expand_base_url_without_placeholder() {
        assert_eq!(expand_base_url("/api", "v1"), "/api");
    }

    #[test]
    fn test_replace_handlebars_with_env_with_variables() {
        unsafe {
            env::set_var("ROUTE_GEN_TEST_DIR", "routes");
        }
        let output = replace_handlebars_with_env("pattern = \"{{ ROUTE_GEN_TEST_DIR }}/**/*.toml\"");
        assert_eq!(output, "pattern = \"routes/**/*.toml\"");
        unsafe {
            env::remove_var("ROUTE_GEN_TEST_DIR");
        }
    }

    #[test]
    fn test_replace_handlebars_with_env_whitespace() {
        unsafe {
            env::set_var("ROUTE_GEN_SPACED_VAR", "value");
        }
        let input = "{{ROUTE_GEN_SPACED_VAR}} {{ ROUTE_GEN_SPACED_VAR }} {{  ROUTE_GEN_SPACED_VAR  }}";
        assert_eq!(replace_handlebars_with_env(input), "value value value");
        unsafe {
            env::remove_var("ROUTE_GEN_SPACED_VAR");
        }
    }

    proptest! {
        #[test]
        fn prop_strings_without_braces_are_untouched(input in "[a-zA-Z0-9 /*._-]*") {
            prop_assert_eq!(replace_handlebars_with_env(&input), input);
        }

        #[test]
        fn prop_expanded_url_contains_version(version in "v[0-9]{1,3}") {
            let url = expand_base_url("/api/{version}", &version);
            prop_assert!(url.ends_with(&version));
            prop_assert!(!url.contains(VERSION_PLACEHOLDER));
        }
    }
}
