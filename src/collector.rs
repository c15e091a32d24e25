//! Expansion of loaded route units into registration records.

use crate::{
    Classification, Controller, HttpMethod, Middleware, RouteManifest,
    dispatcher::GroupingId,
    registry::VersionEntry,
};

/// A pending binding awaiting commit.
#[derive(Debug, Clone)]
pub struct RegistrationRecord {
    pub version: String,
    pub grouping: GroupingId,
    pub method: HttpMethod,
    /// Raw route pattern; the commit order is sorted on this.
    pub route: String,
    pub middlewares: Vec<Middleware>,
    pub controller: Controller,
    /// Base URL joined with the route, for diagnostics.
    pub url: String,
}

/// A manifest that has both a route and a controller.
#[derive(Debug)]
pub struct ValidManifest<'a> {
    route: &'a str,
    controller: &'a Controller,
    manifest: &'a RouteManifest,
}

/// Returns the manifest's route and controller, or `None` if either is
/// missing. An empty route counts as missing.
pub fn validate(manifest: &RouteManifest) -> Option<ValidManifest<'_>> {
    Some(ValidManifest {
        route: manifest.route.as_deref().filter(|route| !route.is_empty())?,
        controller: manifest.controller.as_ref()?,
        manifest,
    })
}

/// Emits one record for the primary route and one per alias.
///
/// All records share the method, controller and middleware chain. A unit
/// that declares no middlewares gets a single pass-through middleware; an
/// explicitly empty list stays empty.
pub fn collect(
    unit: &ValidManifest<'_>,
    classification: &Classification,
    entry: &VersionEntry,
) -> Vec<RegistrationRecord> {
    let middlewares = match &unit.manifest.middlewares {
        Some(middlewares) => middlewares.clone(),
        None => vec![Middleware::pass_through()],
    };

    std::iter::once(unit.route)
        .chain(unit.manifest.aliases.iter().map(String::as_str))
        .map(|route| RegistrationRecord {
            version: entry.version().to_string(),
            grouping: entry.grouping(),
            method: classification.method,
            route: route.to_string(),
            middlewares: middlewares.clone(),
            controller: unit.controller.clone(),
            url: format!("{}{}", entry.base_url(), route),
        })
        .collect()
}
