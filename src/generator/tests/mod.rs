//! Test helpers and utilities for RouteGenerator tests
//!
//! These tests drive [`RouteGenerator::construct`] against a recording
//! dispatcher, so the exact sequence of dispatcher calls can be asserted
//! without building a router. `axum_app` runs the same pipeline against the
//! real axum dispatcher using `oneshot()`.
//!
//! ## Available Helpers
//!
//! - Configuration: `config_for()`, `js_config_for()`
//! - Discovery: `VecGlob`
//! - Loading: `LoggingLoader`
//! - Dispatch: `RecordingDispatcher`, `Call`
//! - Handlers: `controller()`, `named_middleware()`

use crate::{
    Config, Controller, Dispatcher, GlobProvider, HttpMethod, Middleware, MemoryRouteLoader,
    ParamMiddleware, Result, RouteLoader, RouteManifest, dispatcher::GroupingId,
};
use axum::{extract::Request, middleware::Next};
use std::sync::{Arc, Mutex};


// ============================================================================
// Configuration Helpers
// ============================================================================

/// Identifier regex for units named like `items_get.v1.x.js`.
pub(crate) const JS_IDENTIFIER_PATTERN: &str = r"_(delete|get|post|put|patch)\.(v\d+)(\.\S+)*\.js$";

/// A default configuration with the given discovery pattern.
pub(crate) fn config_for(pattern: &str) -> Config {
    Config::from_toml("")
        .expect("empty TOML is a valid config")
        .with_pattern(pattern)
}

/// Like `config_for`, but classifying `.js` identifiers.
pub(crate) fn js_config_for(pattern: &str) -> Config {
    config_for(pattern).with_routing_identifier_pattern(JS_IDENTIFIER_PATTERN)
}

// ============================================================================
// Discovery
// ============================================================================

/// Returns a fixed list of identifiers in the given (unsorted) order and
/// records every pattern it was asked for.
#[derive(Clone, Default)]
pub(crate) struct VecGlob {
    identifiers: Vec<String>,
    pub(crate) requested: Arc<Mutex<Vec<String>>>,
}

impl VecGlob {
    pub(crate) fn new(identifiers: &[&str]) -> Self {
        Self {
            identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
            requested: Arc::default(),
        }
    }
}

impl GlobProvider for VecGlob {
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        self.requested.lock().unwrap().push(pattern.to_string());
        crate::discovery::compile_glob(pattern)?;
        Ok(self.identifiers.clone())
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Wraps a `MemoryRouteLoader` and records every identifier it loads.
pub(crate) struct LoggingLoader {
    inner: MemoryRouteLoader,
    pub(crate) loads: Arc<Mutex<Vec<String>>>,
}

impl LoggingLoader {
    pub(crate) fn new(manifests: Vec<(&str, RouteManifest)>) -> Self {
        let inner = manifests
            .into_iter()
            .fold(MemoryRouteLoader::new(), |loader, (id, manifest)| {
                loader.with_manifest(id, manifest)
            });
        Self {
            inner,
            loads: Arc::default(),
        }
    }
}

impl RouteLoader for LoggingLoader {
    fn load(&mut self, identifier: &str) -> Result<RouteManifest> {
        self.loads.lock().unwrap().push(identifier.to_string());
        self.inner.load(identifier)
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// One call received by the `RecordingDispatcher`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateGrouping(String),
    Mount(GroupingId, String),
    Use(GroupingId, Middleware),
    Param(GroupingId, String),
    Register {
        grouping: GroupingId,
        method: HttpMethod,
        pattern: String,
        middlewares: Vec<Middleware>,
        controller: Controller,
    },
}

/// Records every dispatcher call in order.
#[derive(Default)]
pub(crate) struct RecordingDispatcher {
    pub(crate) calls: Vec<Call>,
    groupings: usize,
}

impl RecordingDispatcher {
    pub(crate) fn created_prefixes(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::CreateGrouping(prefix) => Some(prefix.clone()),
                _ => None,
            })
            .collect()
    }

    /// Middlewares `use`d on a grouping, in order.
    pub(crate) fn used_on(&self, grouping: GroupingId) -> Vec<Middleware> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Use(g, middleware) if *g == grouping => Some(middleware.clone()),
                _ => None,
            })
            .collect()
    }

    /// `(grouping, method, pattern)` of every registration, in order.
    pub(crate) fn registrations(&self) -> Vec<(GroupingId, HttpMethod, String)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Register {
                    grouping,
                    method,
                    pattern,
                    ..
                } => Some((*grouping, *method, pattern.clone())),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn registered_patterns(&self) -> Vec<String> {
        self.registrations().into_iter().map(|(_, _, p)| p).collect()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn create_grouping(&mut self, prefix: &str) -> Result<GroupingId> {
        self.calls.push(Call::CreateGrouping(prefix.to_string()));
        self.groupings += 1;
        Ok(GroupingId::new(self.groupings - 1))
    }

    fn mount(&mut self, grouping: GroupingId, prefix: &str) -> Result<()> {
        self.calls.push(Call::Mount(grouping, prefix.to_string()));
        Ok(())
    }

    fn use_middleware(&mut self, grouping: GroupingId, middleware: Middleware) -> Result<()> {
        self.calls.push(Call::Use(grouping, middleware));
        Ok(())
    }

    fn param(&mut self, grouping: GroupingId, name: &str, _middleware: ParamMiddleware) -> Result<()> {
        self.calls.push(Call::Param(grouping, name.to_string()));
        Ok(())
    }

    fn register(
        &mut self,
        grouping: GroupingId,
        method: HttpMethod,
        pattern: &str,
        middlewares: &[Middleware],
        controller: Controller,
    ) -> Result<()> {
        self.calls.push(Call::Register {
            grouping,
            method,
            pattern: pattern.to_string(),
            middlewares: middlewares.to_vec(),
            controller,
        });
        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A controller answering with its own name.
pub(crate) fn controller(name: &'static str) -> Controller {
    Controller::new(name, move || async move { name })
}

/// A middleware that forwards the request.
pub(crate) fn named_middleware(name: &'static str) -> Middleware {
    Middleware::from_fn(name, |req: Request, next: Next| next.run(req))
}
