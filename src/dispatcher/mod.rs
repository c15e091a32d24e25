//! The dispatcher seam.
//!
//! The route-table engine never matches requests itself. It hands groupings
//! and registrations to a [`Dispatcher`], which is assumed to apply
//! first-registered-wins matching. [`AxumDispatcher`] is the production
//! implementation; tests substitute a recording one.

mod axum_router;

pub use axum_router::AxumDispatcher;

use crate::{Controller, HttpMethod, Middleware, ParamMiddleware, Result};

/// Opaque handle to a router grouping owned by a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupingId(usize);

impl GroupingId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Receives groupings and route registrations from the route-table engine.
///
/// Calls arrive in this order for every version: `create_grouping`, then
/// `use_middleware` for each grouping middleware, then `param` for each
/// parameter middleware, then `mount`. `register` calls follow once every
/// unit has been collected, sorted by route pattern.
pub trait Dispatcher {
    /// Allocates a new, empty grouping for routes mounted under `prefix`.
    fn create_grouping(&mut self, prefix: &str) -> Result<GroupingId>;

    /// Mounts the grouping on the application under `prefix`.
    fn mount(&mut self, grouping: GroupingId, prefix: &str) -> Result<()>;

    /// Adds a middleware applied to every route of the grouping.
    fn use_middleware(&mut self, grouping: GroupingId, middleware: Middleware) -> Result<()>;

    /// Adds a middleware that runs when a matched route has parameter `name`.
    fn param(&mut self, grouping: GroupingId, name: &str, middleware: ParamMiddleware)
    -> Result<()>;

    /// Registers `method` + `pattern` with its route-level middlewares.
    fn register(
        &mut self,
        grouping: GroupingId,
        method: HttpMethod,
        pattern: &str,
        middlewares: &[Middleware],
        controller: Controller,
    ) -> Result<()>;
}
