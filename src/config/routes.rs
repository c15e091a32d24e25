use {
    crate::{Error, Result, classifier::Classifier, utils::VERSION_PLACEHOLDER},
    serde::Deserialize,
};

/// Identifier regex used when none is configured.
///
/// Capture group 1 is the HTTP method, group 2 the API version token.
/// Matches identifiers such as `routes/items_get.v1.toml` or
/// `routes/items_get.v2.admin.toml`.
pub const DEFAULT_ROUTING_IDENTIFIER_PATTERN: &str =
    r"_(delete|get|post|put|patch)\.(v\d+)(\.\S+)*\.toml$";

/// Base URL template used when none is configured.
pub const DEFAULT_BASE_URL_TEMPLATE: &str = "/api/{version}";

///
/// Configuration for route discovery and versioned mounting.
///
#[derive(Debug, Clone, Deserialize)]
pub struct RoutesConfig {
    /// Glob pattern selecting candidate route manifests. Required.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Regular expression applied to each discovered identifier.
    /// Must have at least two capture groups: method, then version.
    #[serde(default = "RoutesConfig::default_routing_identifier_pattern")]
    pub routing_identifier_pattern: String,

    /// Template for each version's mount prefix. Must contain `{version}`.
    #[serde(default = "RoutesConfig::default_base_url_template")]
    pub base_url_template: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            pattern: None,
            routing_identifier_pattern: Self::default_routing_identifier_pattern(),
            base_url_template: Self::default_base_url_template(),
        }
    }
}

impl RoutesConfig {
    fn default_routing_identifier_pattern() -> String {
        DEFAULT_ROUTING_IDENTIFIER_PATTERN.into()
    }

    fn default_base_url_template() -> String {
        DEFAULT_BASE_URL_TEMPLATE.into()
    }

    /// Returns the discovery pattern or a configuration error if it is unset.
    pub fn require_pattern(&self) -> Result<&str> {
        match self.pattern.as_deref().map(str::trim) {
            Some(pattern) if !pattern.is_empty() => Ok(pattern),
            _ => Err(Error::config("routes.pattern is required")),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.require_pattern()?;

        if !self.base_url_template.starts_with('/') {
            return Err(Error::config(format!(
                "routes.base_url_template must start with '/', got `{}`",
                self.base_url_template
            )));
        }
        if !self.base_url_template.contains(VERSION_PLACEHOLDER) {
            return Err(Error::config(format!(
                "routes.base_url_template must contain `{}`, got `{}`",
                VERSION_PLACEHOLDER, self.base_url_template
            )));
        }

        Classifier::new(&self.routing_identifier_pattern)?;
        Ok(())
    }
}
