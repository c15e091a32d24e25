use serde::Deserialize;

///
/// Output settings for the tracing subscriber installed by
/// `Config::setup_tracing`. Construction progress is emitted at debug level,
/// so `RUST_LOG=axum_route_gen=debug` shows every grouping and registration.
///
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// One of `default`, `json`, `compact` or `pretty`.
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Default,
    Compact,
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Wrapper {
        logging: LoggingConfig,
    }

    fn parse(format: &str) -> LogFormat {
        let text = format!("[logging]\nformat = \"{}\"", format);
        toml::from_str::<Wrapper>(&text).unwrap().logging.format
    }

    #[test]
    fn test_every_format_parses() {
        assert_eq!(parse("json"), LogFormat::Json);
        assert_eq!(parse("default"), LogFormat::Default);
        assert_eq!(parse("compact"), LogFormat::Compact);
        assert_eq!(parse("pretty"), LogFormat::Pretty);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        assert!(toml::from_str::<Wrapper>("[logging]\nformat = \"xml\"").is_err());
    }

    #[test]
    fn test_missing_format_defaults() {
        let wrapper: Wrapper = toml::from_str("[logging]").unwrap();
        assert_eq!(wrapper.logging.format, LogFormat::Default);
    }
}
