//! Per-version router groupings.
//!
//! [`RoutingMapBuilder::ensure`] is the only place that asks the dispatcher for
//! a new grouping, so each API version gets exactly one grouping per
//! construction run. The builder is borrowed exclusively by the orchestrator
//! and finalized into an immutable [`RoutingMap`] before commit.

use {
    crate::{
        Middleware, ParamMiddleware, Result,
        dispatcher::{Dispatcher, GroupingId},
        utils::expand_base_url,
    },
    std::collections::BTreeMap,
};

/// Static settings for one API version, declared before discovery runs.
#[derive(Debug, Clone, Default)]
pub struct VersionSettings {
    /// Middlewares applied to every route of the version, after the global ones.
    pub middlewares: Vec<Middleware>,
    /// Middlewares keyed by path parameter name.
    pub param_middlewares: Vec<(String, ParamMiddleware)>,
}

impl VersionSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a version-level middleware.
    pub fn with_middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Adds a middleware that runs when a matched route has parameter `name`.
    pub fn with_param_middleware(
        mut self,
        name: impl Into<String>,
        middleware: ParamMiddleware,
    ) -> Self {
        self.param_middlewares.push((name.into(), middleware));
        self
    }
}

/// One API version's routing surface.
#[derive(Debug, Clone)]
pub struct VersionEntry {
    version: String,
    base_url: String,
    grouping: GroupingId,
    middlewares: Vec<Middleware>,
}

impl VersionEntry {
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Mount prefix, e.g. `/api/v1`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn grouping(&self) -> GroupingId {
        self.grouping
    }

    /// Grouping-level middlewares: global ones first, then version-specific.
    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }
}

/// Builds the version → entry map while units are being collected.
#[derive(Debug)]
pub struct RoutingMapBuilder {
    base_url_template: String,
    global_middlewares: Vec<Middleware>,
    settings: BTreeMap<String, VersionSettings>,
    entries: BTreeMap<String, VersionEntry>,
    creation_order: Vec<String>,
}

impl RoutingMapBuilder {
    /// Creates a builder pre-seeded with per-version settings.
    pub fn new(
        base_url_template: impl Into<String>,
        global_middlewares: Vec<Middleware>,
        settings: BTreeMap<String, VersionSettings>,
    ) -> Self {
        Self {
            base_url_template: base_url_template.into(),
            global_middlewares,
            settings,
            entries: BTreeMap::new(),
            creation_order: Vec::new(),
        }
    }

    /// Returns the entry for `version`, creating its grouping on first use.
    ///
    /// An existing entry is returned unchanged and the dispatcher is not
    /// called.
    pub fn ensure<D>(&mut self, version: &str, dispatcher: &mut D) -> Result<&VersionEntry>
    where
        D: Dispatcher + ?Sized,
    {
        if !self.entries.contains_key(version) {
            let entry = self.create(version, dispatcher)?;
            self.creation_order.push(version.to_string());
            self.entries.insert(version.to_string(), entry);
        }
        // present: inserted above or earlier
        self.entries
            .get(version)
            .ok_or_else(|| crate::Error::internal(format!("version `{}` vanished", version)))
    }

    fn create<D>(&self, version: &str, dispatcher: &mut D) -> Result<VersionEntry>
    where
        D: Dispatcher + ?Sized,
    {
        let settings = self.settings.get(version);
        let middlewares = union_middlewares(
            &self.global_middlewares,
            settings.map(|s| s.middlewares.as_slice()).unwrap_or_default(),
        );
        let base_url = expand_base_url(&self.base_url_template, version);

        let grouping = dispatcher.create_grouping(&base_url)?;
        for middleware in &middlewares {
            dispatcher.use_middleware(grouping, middleware.clone())?;
        }
        if let Some(settings) = settings {
            for (name, middleware) in &settings.param_middlewares {
                dispatcher.param(grouping, name, middleware.clone())?;
            }
        }
        dispatcher.mount(grouping, &base_url)?;

        tracing::debug!(
            version,
            base_url = %base_url,
            middlewares = middlewares.len(),
            "Version grouping created"
        );

        Ok(VersionEntry {
            version: version.to_string(),
            base_url,
            grouping,
            middlewares,
        })
    }

    pub fn get(&self, version: &str) -> Option<&VersionEntry> {
        self.entries.get(version)
    }

    /// Freezes the map.
    pub fn finish(self) -> RoutingMap {
        RoutingMap {
            entries: self.entries,
            creation_order: self.creation_order,
        }
    }
}

/// Immutable version → entry map produced by [`RoutingMapBuilder::finish`].
#[derive(Debug, Clone, Default)]
pub struct RoutingMap {
    entries: BTreeMap<String, VersionEntry>,
    creation_order: Vec<String>,
}

impl RoutingMap {
    pub fn get(&self, version: &str) -> Option<&VersionEntry> {
        self.entries.get(version)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Versions in the order their groupings were created.
    pub fn versions(&self) -> &[String] {
        &self.creation_order
    }
}

/// Concatenates both lists, keeping the first occurrence of each middleware.
fn union_middlewares(global: &[Middleware], specific: &[Middleware]) -> Vec<Middleware> {
    let mut union: Vec<Middleware> = Vec::with_capacity(global.len() + specific.len());
    for middleware in global.iter().chain(specific) {
        if !union.contains(middleware) {
            union.push(middleware.clone());
        }
    }
    union
}
