//! Route-table construction.
//!
//! [`RouteGenerator`] sequences discovery, classification, version grouping,
//! collection and ordered commit. Units are processed one at a time in
//! discovery order, which fixes both the order in which version groupings
//! are created and the accumulation order of records with equal patterns.

use {
    crate::{
        Config, Dispatcher, GlobProvider, Middleware, Result, RouteLoader,
        classifier::Classifier,
        collector::{self, RegistrationRecord},
        discovery::{FsGlob, discover},
        dispatcher::AxumDispatcher,
        orderer,
        registry::{RoutingMapBuilder, VersionSettings},
    },
    axum::Router,
    std::{
        collections::BTreeMap,
        time::{Duration, Instant},
    },
};

/// Statistics of one construction run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstructionSummary {
    /// Identifiers returned by discovery.
    pub discovered: usize,
    /// Identifiers matching the routing identifier pattern.
    pub eligible: usize,
    /// Eligible units skipped for lacking a route or controller.
    pub skipped: usize,
    /// Records handed to the dispatcher, aliases included. A dispatcher may
    /// still skip some of them as collisions.
    pub registered: usize,
    /// Versions in grouping creation order.
    pub versions: Vec<String>,
    pub elapsed: Duration,
}

/// Builds a versioned route table from discovered route manifests.
///
/// ```rust,no_run
/// use axum::{Router, extract::Request, middleware::Next};
/// use axum_route_gen::{
///     Config, Controller, HandlerRegistry, Middleware, RouteGenerator, TomlRouteLoader,
///     VersionSettings,
/// };
///
/// async fn list_items() -> &'static str {
///     "[]"
/// }
///
/// # fn example() -> axum_route_gen::Result<()> {
/// let config = Config::default().with_pattern("routes/**/*.toml");
/// config.setup_tracing();
///
/// let registry = HandlerRegistry::new().with_controller(Controller::new("items.list", list_items));
/// let audit = Middleware::from_fn("audit", |req: Request, next: Next| next.run(req));
///
/// let app: Router = RouteGenerator::new(config, TomlRouteLoader::new(registry))
///     .with_global_middleware(audit.clone())
///     .with_version("v2", VersionSettings::new().with_middleware(audit))
///     .generate(Router::new())?;
/// # Ok(())
/// # }
/// ```
pub struct RouteGenerator {
    config: Config,
    glob: Box<dyn GlobProvider>,
    loader: Box<dyn RouteLoader>,
    global_middlewares: Vec<Middleware>,
    versioning: BTreeMap<String, VersionSettings>,
}

impl RouteGenerator {
    /// Creates a generator that discovers units on the file system.
    pub fn new(config: Config, loader: impl RouteLoader + 'static) -> Self {
        Self {
            config,
            glob: Box::new(FsGlob),
            loader: Box::new(loader),
            global_middlewares: Vec::new(),
            versioning: BTreeMap::new(),
        }
    }

    /// Replaces the glob provider.
    pub fn with_glob(mut self, glob: impl GlobProvider + 'static) -> Self {
        self.glob = Box::new(glob);
        self
    }

    /// Adds a middleware applied to every version grouping.
    pub fn with_global_middleware(mut self, middleware: Middleware) -> Self {
        self.global_middlewares.push(middleware);
        self
    }

    /// Pre-declares settings for one API version.
    ///
    /// Declaring the same version twice replaces the earlier settings.
    pub fn with_version(mut self, version: impl Into<String>, settings: VersionSettings) -> Self {
        self.versioning.insert(version.into(), settings);
        self
    }

    /// Runs construction against `dispatcher`.
    ///
    /// Configuration is validated before discovery. Any load or dispatch
    /// error aborts the run; groupings and registrations already handed to
    /// the dispatcher are not rolled back.
    pub fn construct<D>(mut self, dispatcher: &mut D) -> Result<ConstructionSummary>
    where
        D: Dispatcher + ?Sized,
    {
        self.config.validate()?;
        let started = Instant::now();
        let pattern = self.config.routes.require_pattern()?.to_string();
        let classifier = Classifier::new(&self.config.routes.routing_identifier_pattern)?;

        tracing::debug!(pattern = %pattern, "Route generation started");

        let identifiers = discover(self.glob.as_ref(), &pattern)?;
        tracing::debug!(count = identifiers.len(), "Matched files found");

        let mut summary = ConstructionSummary {
            discovered: identifiers.len(),
            ..Default::default()
        };
        let mut builder = RoutingMapBuilder::new(
            self.config.routes.base_url_template.clone(),
            std::mem::take(&mut self.global_middlewares),
            std::mem::take(&mut self.versioning),
        );
        let mut records: Vec<RegistrationRecord> = Vec::new();

        for identifier in &identifiers {
            let Some(classification) = classifier.classify(identifier) else {
                tracing::debug!(identifier = %identifier, "Not a route unit, skipping");
                continue;
            };
            summary.eligible += 1;

            let manifest = self.loader.load(identifier)?;
            let Some(unit) = collector::validate(&manifest) else {
                tracing::debug!(
                    identifier = %identifier,
                    "Route unit has no route or controller, skipping"
                );
                summary.skipped += 1;
                continue;
            };

            let entry = builder.ensure(&classification.version, dispatcher)?;
            records.extend(collector::collect(&unit, &classification, entry));
        }

        let routing_map = builder.finish();
        summary.registered = orderer::commit(records, dispatcher)?;
        summary.versions = routing_map.versions().to_vec();
        summary.elapsed = started.elapsed();

        tracing::debug!(
            registered = summary.registered,
            versions = ?summary.versions,
            elapsed = %humantime::format_duration(summary.elapsed),
            "Route generation finished"
        );
        Ok(summary)
    }

    /// Runs construction with an [`AxumDispatcher`] and mounts every version
    /// grouping into `app`.
    pub fn generate(self, app: Router) -> Result<Router> {
        let mut dispatcher = AxumDispatcher::new();
        self.construct(&mut dispatcher)?;
        Ok(dispatcher.into_router(app))
    }
}

#[cfg(test)]
mod tests;
