//! # axum-route-gen
//!
//! Builds a versioned axum route table from route manifests discovered on the
//! file system.
//!
//! Each route unit is a small TOML manifest whose file name carries the HTTP
//! method and API version, e.g. `routes/items/show_get.v1.toml`:
//!
//! ```toml
//! route = "/items/:id"
//! controller = "items.show"
//! middlewares = ["auth"]
//! aliases = ["/products/:id"]
//! ```
//!
//! Construction runs once at start-up:
//!
//! 1. **Discovery** lists identifiers matching a glob and sorts them in
//!    descending order ([`discovery`]).
//! 2. **Classification** extracts `(method, version)` from each identifier with
//!    a configurable regex; non-matching files are skipped ([`classifier`]).
//! 3. **Version grouping** lazily creates one router grouping per version, with
//!    the global and version-specific middlewares unioned ([`registry`]).
//! 4. **Collection** loads each unit and expands its aliases into registration
//!    records ([`collector`], [`manifest`]).
//! 5. **Commit** registers the records in descending order of their route
//!    pattern, so `/items/new` lands ahead of `/items` ([`orderer`]).
//!
//! The engine never matches requests itself. It drives a [`Dispatcher`], and
//! [`AxumDispatcher`] turns the result into an `axum::Router`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use axum_route_gen::{Config, Controller, HandlerRegistry, Result, RouteGenerator, TomlRouteLoader};
//!
//! async fn show_item() -> &'static str {
//!     "item"
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::default();  // Loads from config/{RUST_ENV}.toml
//!     config.setup_tracing();
//!
//!     let registry = HandlerRegistry::new().with_controller(Controller::new("items.show", show_item));
//!     let app: Router = RouteGenerator::new(config, TomlRouteLoader::new(registry))
//!         .generate(Router::new())?;
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! With `config/dev.toml`:
//! ```toml
//! [routes]
//! pattern = "{{ ROUTES_DIR }}/**/*.toml"
//! base_url_template = "/api/{version}"
//! ```
//!
//! Run with `RUST_ENV=dev ROUTES_DIR=routes cargo run`.
//!
//! # Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`discovery`] | Glob providers and descending discovery order |
//! | [`classifier`] | Identifier → `(method, version)` |
//! | [`registry`] | Per-version groupings and middleware union |
//! | [`manifest`] | Route manifests and loaders |
//! | [`collector`] | Alias expansion into registration records |
//! | [`orderer`] | Commit order |
//! | [`dispatcher`] | The dispatcher seam and its axum implementation |
//!
//! # Error Handling
//!
//! Every fallible operation returns the crate's [`Result`]. Errors carry an
//! [`ErrorKind`] and a stable [`Error::error_code`]. Any error aborts the run;
//! a server should not accept traffic with a partially built route table.
mod config;
mod error;
mod generator;
mod handler;
mod utils;

pub mod classifier;
pub mod collector;
pub mod discovery;
pub mod dispatcher;
pub mod manifest;
pub mod orderer;
pub mod registry;

pub use classifier::{Classification, Classifier, HttpMethod};
pub use collector::RegistrationRecord;
pub use config::*;
pub use discovery::{FsGlob, GlobProvider};
pub use dispatcher::{AxumDispatcher, Dispatcher, GroupingId};
pub use error::*;
pub use generator::*;
pub use handler::*;
pub use manifest::{HandlerRegistry, MemoryRouteLoader, RouteLoader, RouteManifest, TomlRouteLoader};
pub use registry::{RoutingMap, VersionEntry, VersionSettings};
pub use utils::*;

pub type Result<T> = std::result::Result<T, Error>;
