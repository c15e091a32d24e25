//! Type-erased middlewares and controllers.
//!
//! Route manifests are discovered at runtime, so the concrete handler and
//! middleware types cannot be known when the route table is built. These
//! wrappers erase them behind `Arc<dyn Fn>` while keeping axum's
//! `Request`/`Next`/`Response` vocabulary.
//!
//! Two middlewares are the same middleware only if they were cloned from the
//! same value; equality is pointer identity on the shared function. This is the
//! identity used when global and version-specific middlewares are unioned.

use {
    axum::{
        extract::Request,
        handler::Handler,
        middleware::Next,
        response::{IntoResponse, Response},
    },
    std::{fmt, future::Future, pin::Pin, sync::Arc},
};

/// Boxed response future returned by every erased handler.
pub type BoxResponseFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

type MiddlewareFn = dyn Fn(Request, Next) -> BoxResponseFuture + Send + Sync;
type ParamMiddlewareFn = dyn Fn(Request, Next, String) -> BoxResponseFuture + Send + Sync;
type ControllerFn = dyn Fn(Request) -> BoxResponseFuture + Send + Sync;

/// A named request middleware.
///
/// ```rust
/// use axum_route_gen::Middleware;
///
/// let audit = Middleware::from_fn("audit", |req, next| async move {
///     tracing::info!(uri = %req.uri(), "audited");
///     next.run(req).await
/// });
/// assert_eq!(audit.name(), "audit");
/// assert_eq!(audit, audit.clone());
/// ```
#[derive(Clone)]
pub struct Middleware {
    name: Arc<str>,
    func: Arc<MiddlewareFn>,
}

impl Middleware {
    /// Wraps an async function of `(Request, Next)`.
    pub fn from_fn<F, Fut, Out>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
        Out: IntoResponse,
    {
        let func = move |req: Request, next: Next| -> BoxResponseFuture {
            let fut = f(req, next);
            Box::pin(async move { fut.await.into_response() })
        };
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Middleware that forwards every request untouched.
    ///
    /// Used as the route-level chain of units that declare no middlewares.
    pub fn pass_through() -> Self {
        Self::from_fn("pass-through", |req: Request, next: Next| next.run(req))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the middleware.
    pub fn call(&self, req: Request, next: Next) -> BoxResponseFuture {
        (self.func)(req, next)
    }
}

impl PartialEq for Middleware {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl Eq for Middleware {}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Middleware").field(&self.name).finish()
    }
}

/// A middleware bound to a path parameter.
///
/// It runs only for requests whose matched route declares the parameter, and
/// receives the parameter's decoded value.
///
/// ```rust
/// use axum_route_gen::ParamMiddleware;
///
/// let load_item = ParamMiddleware::from_fn("load-item", |req, next, id| async move {
///     tracing::debug!(%id, "loading item");
///     next.run(req).await
/// });
/// assert_eq!(load_item.name(), "load-item");
/// ```
#[derive(Clone)]
pub struct ParamMiddleware {
    name: Arc<str>,
    func: Arc<ParamMiddlewareFn>,
}

impl ParamMiddleware {
    /// Wraps an async function of `(Request, Next, value)`.
    pub fn from_fn<F, Fut, Out>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Request, Next, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Out> + Send + 'static,
        Out: IntoResponse,
    {
        let func = move |req: Request, next: Next, value: String| -> BoxResponseFuture {
            let fut = f(req, next, value);
            Box::pin(async move { fut.await.into_response() })
        };
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the middleware with the parameter's value.
    pub fn call(&self, req: Request, next: Next, value: String) -> BoxResponseFuture {
        (self.func)(req, next, value)
    }
}

impl PartialEq for ParamMiddleware {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for ParamMiddleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParamMiddleware").field(&self.name).finish()
    }
}

/// A named route controller wrapping any stateless axum handler.
///
/// ```rust
/// use axum::Json;
/// use axum_route_gen::Controller;
///
/// async fn list_items() -> Json<Vec<&'static str>> {
///     Json(vec!["apple", "pear"])
/// }
///
/// let controller = Controller::new("items.list", list_items);
/// assert_eq!(controller.name(), "items.list");
/// ```
#[derive(Clone)]
pub struct Controller {
    name: Arc<str>,
    func: Arc<ControllerFn>,
}

impl Controller {
    /// Wraps an axum handler. Extractors work as they do in a regular route.
    pub fn new<H, T>(name: impl Into<Arc<str>>, handler: H) -> Self
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let func = move |req: Request| -> BoxResponseFuture {
            Box::pin(handler.clone().call(req, ()))
        };
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invokes the controller.
    pub fn call(&self, req: Request) -> BoxResponseFuture {
        (self.func)(req)
    }
}

impl PartialEq for Controller {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.func, &other.func)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Controller").field(&self.name).finish()
    }
}
