//! Route manifests and the loaders that produce them.
//!
//! A route unit is loaded into a [`RouteManifest`] value. Loading is fallible
//! and treated as non-idempotent: the orchestrator calls [`RouteLoader::load`]
//! at most once per discovered identifier.
//!
//! [`TomlRouteLoader`] reads manifests such as:
//!
//! ```toml
//! route = "/items/:id"
//! controller = "items.show"
//! middlewares = ["auth"]
//! aliases = ["/products/:id"]
//! ```
//!
//! and resolves the controller and middleware names against a
//! [`HandlerRegistry`].

use {
    crate::{Controller, Error, Middleware, Result},
    serde::Deserialize,
    std::{collections::HashMap, fs},
};

/// The loaded form of a route unit.
///
/// `route` and `controller` are optional here because a unit lacking either
/// is skipped rather than rejected.
#[derive(Debug, Clone, Default)]
pub struct RouteManifest {
    pub route: Option<String>,
    pub controller: Option<Controller>,
    pub middlewares: Option<Vec<Middleware>>,
    pub aliases: Vec<String>,
}

impl RouteManifest {
    /// A manifest with a route and a controller.
    pub fn new(route: impl Into<String>, controller: Controller) -> Self {
        Self {
            route: Some(route.into()),
            controller: Some(controller),
            ..Default::default()
        }
    }

    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.get_or_insert_with(Vec::new).push(middleware);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }
}

/// Loads route units by identifier.
pub trait RouteLoader {
    /// Loads one unit. Errors abort the construction run.
    fn load(&mut self, identifier: &str) -> Result<RouteManifest>;
}

/// Named controllers and middlewares that TOML manifests refer to.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    controllers: HashMap<String, Controller>,
    middlewares: HashMap<String, Middleware>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a controller under its own name.
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controllers
            .insert(controller.name().to_string(), controller);
        self
    }

    /// Registers a middleware under its own name.
    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares
            .insert(middleware.name().to_string(), middleware);
        self
    }

    pub fn controller(&self, name: &str) -> Option<&Controller> {
        self.controllers.get(name)
    }

    pub fn middleware(&self, name: &str) -> Option<&Middleware> {
        self.middlewares.get(name)
    }
}

/// On-disk manifest layout.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    route: Option<String>,
    controller: Option<String>,
    middlewares: Option<Vec<String>>,
    #[serde(default)]
    aliases: Vec<String>,
}

/// Loads TOML manifests from the file system.
#[derive(Debug, Clone)]
pub struct TomlRouteLoader {
    registry: HandlerRegistry,
}

impl TomlRouteLoader {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self { registry }
    }

    /// Parses and resolves manifest text; `identifier` is used in errors only.
    pub fn parse(&self, identifier: &str, text: &str) -> Result<RouteManifest> {
        let file: ManifestFile =
            toml::from_str(text).map_err(|err| Error::load(identifier, err))?;

        let controller = file
            .controller
            .map(|name| {
                self.registry
                    .controller(&name)
                    .cloned()
                    .ok_or_else(|| Error::load(identifier, format!("unknown controller `{}`", name)))
            })
            .transpose()?;

        let middlewares = file
            .middlewares
            .map(|names| {
                names
                    .iter()
                    .map(|name| {
                        self.registry.middleware(name).cloned().ok_or_else(|| {
                            Error::load(identifier, format!("unknown middleware `{}`", name))
                        })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(RouteManifest {
            route: file.route,
            controller,
            middlewares,
            aliases: file.aliases,
        })
    }
}

impl RouteLoader for TomlRouteLoader {
    fn load(&mut self, identifier: &str) -> Result<RouteManifest> {
        let text = fs::read_to_string(identifier).map_err(|err| Error::load(identifier, err))?;
        self.parse(identifier, &text)
    }
}

/// In-memory loader keyed by identifier.
///
/// Each manifest is handed out once; a second load of the same identifier
/// fails, as does loading an identifier that was never added.
#[derive(Debug, Clone, Default)]
pub struct MemoryRouteLoader {
    manifests: HashMap<String, RouteManifest>,
}

impl MemoryRouteLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(mut self, identifier: impl Into<String>, manifest: RouteManifest) -> Self {
        self.manifests.insert(identifier.into(), manifest);
        self
    }

    /// Identifiers not loaded yet.
    pub fn remaining(&self) -> usize {
        self.manifests.len()
    }
}

impl RouteLoader for MemoryRouteLoader {
    fn load(&mut self, identifier: &str) -> Result<RouteManifest> {
        self.manifests
            .remove(identifier)
            .ok_or_else(|| Error::load(identifier, "no manifest for identifier"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use axum::{extract::Request, middleware::Next};

    fn registry() -> HandlerRegistry {
        HandlerRegistry::new()
            .with_controller(Controller::new("items.show", || async { "item" }))
            .with_middleware(Middleware::from_fn("auth", |req: Request, next: Next| {
                next.run(req)
            }))
    }

    #[test]
    fn test_parse_full_manifest() {
        let loader = TomlRouteLoader::new(registry());
        let manifest = loader
            .parse(
                "items_get.v1.toml",
                r#"
route = "/items/:id"
controller = "items.show"
middlewares = ["auth"]
aliases = ["/products/:id", "/goods/:id"]
                "#,
            )
            .unwrap();

        assert_eq!(manifest.route.as_deref(), Some("/items/:id"));
        assert_eq!(manifest.controller.unwrap().name(), "items.show");
        let middlewares = manifest.middlewares.unwrap();
        assert_eq!(middlewares.len(), 1);
        assert_eq!(&middlewares[0], registry().middleware("auth").unwrap());
        assert_eq!(manifest.aliases, vec!["/products/:id", "/goods/:id"]);
    }

    #[test]
    fn test_registry_hands_out_the_same_middleware_instance() {
        let registry = registry();
        let loader = TomlRouteLoader::new(registry.clone());
        let text = "route = \"/a\"\ncontroller = \"items.show\"\nmiddlewares = [\"auth\"]";
        let first = loader.parse("a", text).unwrap().middlewares.unwrap();
        let second = loader.parse("b", text).unwrap().middlewares.unwrap();
        assert_eq!(first[0], second[0]);
        assert_eq!(&first[0], registry.middleware("auth").unwrap());
    }

    #[test]
    fn test_missing_fields_are_not_errors() {
        let loader = TomlRouteLoader::new(registry());
        let manifest = loader.parse("x", "aliases = [\"/a\"]").unwrap();
        assert!(manifest.route.is_none());
        assert!(manifest.controller.is_none());
        assert!(manifest.middlewares.is_none());
    }

    #[test]
    fn test_unknown_controller_is_load_error() {
        let loader = TomlRouteLoader::new(registry());
        let err = loader
            .parse("items_get.v1.toml", "route = \"/a\"\ncontroller = \"nope\"")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
        assert!(err.to_string().contains("items_get.v1.toml"));
        assert!(err.to_string().contains("unknown controller `nope`"));
    }

    #[test]
    fn test_unknown_middleware_is_load_error() {
        let loader = TomlRouteLoader::new(registry());
        let err = loader
            .parse(
                "x",
                "route = \"/a\"\ncontroller = \"items.show\"\nmiddlewares = [\"missing\"]",
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_malformed_toml_is_load_error() {
        let loader = TomlRouteLoader::new(registry());
        assert_eq!(
            loader.parse("x", "route = ").unwrap_err().kind(),
            ErrorKind::Load
        );
        assert_eq!(
            loader.parse("x", "rout = \"/typo\"").unwrap_err().kind(),
            ErrorKind::Load
        );
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let mut loader = TomlRouteLoader::new(registry());
        let err = loader.load("no/such/route_get.v1.toml").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Load);
    }

    #[test]
    fn test_memory_loader_hands_out_each_manifest_once() {
        let controller = Controller::new("c", || async {});
        let mut loader = MemoryRouteLoader::new()
            .with_manifest("a_get.v1.js", RouteManifest::new("/a", controller));
        assert_eq!(loader.remaining(), 1);
        assert!(loader.load("a_get.v1.js").is_ok());
        assert_eq!(loader.load("a_get.v1.js").unwrap_err().kind(), ErrorKind::Load);
        assert_eq!(loader.load("unknown").unwrap_err().kind(), ErrorKind::Load);
    }

    #[test]
    fn test_manifest_builders() {
        let controller = Controller::new("c", || async {});
        let manifest = RouteManifest::new("/a", controller)
            .with_alias("/b")
            .with_middleware(Middleware::pass_through());
        assert_eq!(manifest.aliases, vec!["/b"]);
        assert_eq!(manifest.middlewares.map(|m| m.len()), Some(1));
    }
}
