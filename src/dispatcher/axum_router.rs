//! Axum-backed dispatcher.

use {
    super::{Dispatcher, GroupingId},
    crate::{BoxResponseFuture, Controller, Error, HttpMethod, Middleware, ParamMiddleware, Result},
    axum::{
        Router,
        extract::{RawPathParams, Request, rejection::RawPathParamsRejection},
        middleware::{Next, from_fn},
        routing::{MethodRouter, on},
    },
    std::{
        collections::{HashMap, HashSet},
        sync::Arc,
    },
};

/// Builds one `axum::Router` per grouping and nests them into an application.
///
/// Axum applies layers only to routes that already exist, so grouping-level
/// middlewares are recorded and applied in [`AxumDispatcher::into_router`],
/// after every route has been registered. Layer order follows registration
/// order: the first middleware handed to `use_middleware` sees the request
/// first.
///
/// Route patterns may use Express-style segments (`/items/:id`, `/files/*`,
/// `/files/*rest`); they are rewritten to axum's syntax (`/items/{id}`,
/// `/files/{*wildcard}`, `/files/{*rest}`). A catch-all anywhere but the last
/// segment, an empty parameter name or a brace that does not enclose a whole
/// segment is a [`Dispatch`](crate::ErrorKind::Dispatch) error.
///
/// # Collisions
///
/// Axum panics when the same method is routed twice on one path, when two
/// paths differ only in their parameter names, or when a parameter and a
/// catch-all sit at the same position after an identical prefix. These cases
/// are skipped with a warning instead, so the first registration wins.
#[derive(Default)]
pub struct AxumDispatcher {
    groupings: Vec<Grouping>,
}

#[derive(Default)]
struct Grouping {
    prefix: String,
    mount: Option<String>,
    router: Router,
    middlewares: Vec<Middleware>,
    params: Vec<(Arc<str>, ParamMiddleware)>,
    shapes: HashMap<String, String>,
    captures: HashMap<String, (Capture, String)>,
    registered: HashSet<(HttpMethod, String)>,
}

impl AxumDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groupings created so far.
    pub fn grouping_count(&self) -> usize {
        self.groupings.len()
    }

    fn grouping_mut(&mut self, grouping: GroupingId) -> Result<&mut Grouping> {
        self.groupings
            .get_mut(grouping.index())
            .ok_or_else(|| Error::dispatch(format!("unknown grouping {:?}", grouping)))
    }

    /// Applies every grouping's middlewares and nests it into `app`.
    pub fn into_router(self, mut app: Router) -> Router {
        for grouping in self.groupings {
            let Some(prefix) = grouping.mount.clone() else {
                tracing::warn!(prefix = %grouping.prefix, "Grouping was never mounted, dropping it");
                continue;
            };
            let router = grouping.finish();
            app = if prefix == "/" {
                app.merge(router)
            } else {
                app.nest(&prefix, router)
            };
        }
        app
    }
}

impl Grouping {
    /// The earlier path whose capture kind differs from `path`'s at the same
    /// position, if any.
    fn capture_conflict(&self, path: &str) -> Option<&str> {
        captures(path).into_iter().find_map(|(prefix, capture)| {
            self.captures
                .get(&prefix)
                .filter(|(existing, _)| *existing != capture)
                .map(|(_, path)| path.as_str())
        })
    }

    fn finish(self) -> Router {
        let mut router = self.router;

        // route_layer panics on a router without routes
        if !self.registered.is_empty() {
            for (name, middleware) in self.params.into_iter().rev() {
                router = router.route_layer(from_fn(
                    move |params: std::result::Result<RawPathParams, RawPathParamsRejection>,
                          req: Request,
                          next: Next| {
                        let value = params.ok().and_then(|params| {
                            params
                                .iter()
                                .find(|(key, _)| *key == &*name)
                                .map(|(_, value)| value.to_string())
                        });
                        match value {
                            Some(value) => middleware.call(req, next, value),
                            None => Box::pin(next.run(req)) as BoxResponseFuture,
                        }
                    },
                ));
            }
        }

        for middleware in self.middlewares.into_iter().rev() {
            router = router.layer(from_fn(move |req: Request, next: Next| {
                middleware.call(req, next)
            }));
        }
        router
    }
}

impl Dispatcher for AxumDispatcher {
    fn create_grouping(&mut self, prefix: &str) -> Result<GroupingId> {
        let id = GroupingId::new(self.groupings.len());
        self.groupings.push(Grouping {
            prefix: prefix.to_string(),
            ..Default::default()
        });
        Ok(id)
    }

    fn mount(&mut self, grouping: GroupingId, prefix: &str) -> Result<()> {
        if !prefix.starts_with('/') {
            return Err(Error::dispatch(format!(
                "mount prefix `{}` must start with '/'",
                prefix
            )));
        }
        let prefix = match prefix.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        if self
            .groupings
            .iter()
            .any(|g| g.mount.as_deref() == Some(prefix))
        {
            return Err(Error::dispatch(format!(
                "another grouping is already mounted at `{}`",
                prefix
            )));
        }
        self.grouping_mut(grouping)?.mount = Some(prefix.to_string());
        Ok(())
    }

    fn use_middleware(&mut self, grouping: GroupingId, middleware: Middleware) -> Result<()> {
        self.grouping_mut(grouping)?.middlewares.push(middleware);
        Ok(())
    }

    fn param(
        &mut self,
        grouping: GroupingId,
        name: &str,
        middleware: ParamMiddleware,
    ) -> Result<()> {
        self.grouping_mut(grouping)?
            .params
            .push((Arc::from(name), middleware));
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
        if !pattern.starts_with('/') {
            return Err(Error::dispatch(format!(
                "route `{}` must start with '/'",
                pattern
            )));
        }

        let group = self.grouping_mut(grouping)?;
        let path = to_axum_path(pattern);
        validate_path(pattern, &path)?;
        let shape = path_shape(&path);

        if let Some(existing) = group.shapes.get(&shape) {
            if *existing != path {
                tracing::warn!(
                    %method,
                    route = %pattern,
                    conflicts_with = %existing,
                    "Route collides with an earlier registration, skipping"
                );
                return Ok(());
            }
        }
        if let Some(existing) = group.capture_conflict(&path) {
            tracing::warn!(
                %method,
                route = %pattern,
                conflicts_with = %existing,
                "Parameter and catch-all share a position, skipping"
            );
            return Ok(());
        }
        if !group.registered.insert((method, path.clone())) {
            tracing::warn!(
                %method,
                route = %pattern,
                "Route already registered for this method, skipping"
            );
            return Ok(());
        }
        group.shapes.entry(shape).or_insert_with(|| path.clone());
        for (prefix, capture) in captures(&path) {
            group
                .captures
                .entry(prefix)
                .or_insert_with(|| (capture, path.clone()));
        }

        let mut method_router: MethodRouter =
            on(method.method_filter(), move |req: Request| controller.call(req));
        for middleware in middlewares.iter().rev().cloned() {
            method_router = method_router.layer(from_fn(move |req: Request, next: Next| {
                middleware.call(req, next)
            }));
        }

        group.router = std::mem::take(&mut group.router).route(&path, method_router);
        Ok(())
    }
}

/// Rewrites Express-style `:name`, `*` and `*name` segments into axum syntax.
fn to_axum_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if let Some(name) = segment.strip_prefix(':') {
                format!("{{{}}}", name)
            } else if let Some(name) = segment.strip_prefix('*') {
                let name = if name.is_empty() { "wildcard" } else { name };
                format!("{{*{}}}", name)
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Rejects rewritten paths that axum refuses to route.
fn validate_path(pattern: &str, path: &str) -> Result<()> {
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;

    for (index, segment) in segments.iter().enumerate() {
        let Some(inner) = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
        else {
            if segment.contains(['{', '}']) {
                return Err(Error::dispatch(format!(
                    "route `{}`: braces must enclose a whole segment",
                    pattern
                )));
            }
            continue;
        };

        let catch_all = inner.starts_with('*');
        let name = inner.strip_prefix('*').unwrap_or(inner);
        if name.is_empty() || name.contains(['{', '}', '*', ':']) {
            return Err(Error::dispatch(format!(
                "route `{}`: invalid parameter name in `{}`",
                pattern, segment
            )));
        }
        if catch_all && index != last {
            return Err(Error::dispatch(format!(
                "route `{}`: a catch-all is only allowed in the last segment",
                pattern
            )));
        }
    }
    Ok(())
}

/// Whole-segment capture kinds; axum keeps one per position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    Param,
    CatchAll,
}

/// Every capture in `path`, keyed by the shape of the segments before it.
fn captures(path: &str) -> Vec<(String, Capture)> {
    let segments: Vec<&str> = path.split('/').collect();
    segments
        .iter()
        .enumerate()
        .filter_map(|(index, segment)| {
            let capture = if segment.starts_with("{*") {
                Capture::CatchAll
            } else if segment.starts_with('{') {
                Capture::Param
            } else {
                return None;
            };
            Some((path_shape(&segments[..index].join("/")), capture))
        })
        .collect()
}

/// The path with parameter names erased; two paths with the same shape
/// cannot coexist in one axum router.
fn path_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.starts_with("{*") {
                "{*}"
            } else if segment.starts_with('{') && segment.ends_with('}') {
                "{}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
