//! Classification of discovered identifiers into `(method, version)` pairs.

use {
    crate::{Error, Result},
    axum::routing::MethodFilter,
    regex::Regex,
    std::{fmt, str::FromStr},
};

/// HTTP verbs a route unit may be registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }

    pub(crate) fn method_filter(&self) -> MethodFilter {
        match self {
            HttpMethod::Get => MethodFilter::GET,
            HttpMethod::Post => MethodFilter::POST,
            HttpMethod::Put => MethodFilter::PUT,
            HttpMethod::Patch => MethodFilter::PATCH,
            HttpMethod::Delete => MethodFilter::DELETE,
        }
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            other => Err(Error::config(format!(
                "unsupported HTTP method `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Method and API version derived from a route unit's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub method: HttpMethod,
    pub version: String,
}

/// Applies the routing identifier regex to discovered identifiers.
///
/// ```rust
/// use axum_route_gen::{Classifier, HttpMethod, DEFAULT_ROUTING_IDENTIFIER_PATTERN};
///
/// let classifier = Classifier::new(DEFAULT_ROUTING_IDENTIFIER_PATTERN).unwrap();
/// let c = classifier.classify("routes/items/list_get.v1.toml").unwrap();
/// assert_eq!(c.method, HttpMethod::Get);
/// assert_eq!(c.version, "v1");
///
/// assert!(classifier.classify("routes/items/helpers.toml").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    regex: Regex,
}

impl Classifier {
    /// Compiles the identifier regex.
    ///
    /// The regex must declare at least two capture groups: the HTTP method
    /// first, the API version second.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        // captures_len counts the implicit whole-match group
        if regex.captures_len() < 3 {
            return Err(Error::config(format!(
                "routing identifier pattern `{}` needs at least two capture groups (method, version)",
                pattern
            )));
        }
        Ok(Self { regex })
    }

    /// Returns the classification of an eligible identifier, `None` otherwise.
    pub fn classify(&self, identifier: &str) -> Option<Classification> {
        let captures = self.regex.captures(identifier)?;
        let method = captures.get(1)?.as_str();
        let version = captures.get(2)?.as_str();

        let method = match method.parse::<HttpMethod>() {
            Ok(method) => method,
            Err(_) => {
                tracing::debug!(identifier, method, "Unsupported method, skipping");
                return None;
            }
        };
        if version.is_empty() {
            return None;
        }

        Some(Classification {
            method,
            version: version.to_string(),
        })
    }
}
