//! # chainrouter
//!
//! **chainrouter** is an HTTP request router built around ordered handler chains. It decides,
//! for a `(method, path)` pair, which route's chain runs and which path parameters were
//! extracted. It performs no I/O of its own and plugs into any host that can call a handler.
//!
//! ## Overview
//!
//! Routes are registered in order and matched in order: the first route whose method and
//! path pattern match wins, and its handlers run one after another, each deciding whether to
//! pass control on. Routers can be namespaced under a prefix, merged into each other, and
//! asked to generate the conventional CRUD route set for a resource.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`path`]** - Colon-token path patterns (`/users/:user`), prefix joining, path segments
//! - **[`handler`]** - Handler shapes (direct and suspend-style), continuations, chains
//! - **[`router`]** - Route table, registration, lookup, grouping, extending, resources
//! - **[`dispatcher`]** - Linear first-match dispatch over a router's table
//! - **[`config`]** - Router configuration from code, YAML or environment
//! - **[`manifest`]** - YAML route manifests used by the CLI
//! - **[`otel`]** - Structured logging setup
//! - **[`cli`]** - The `chainrouter` command-line tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Host as Host<br/>(server / outer chain)
//!     participant Dispatcher
//!     participant Table as Route table<br/>(ArcSwap snapshot)
//!     participant Chain as Route chain
//!
//!     Host->>Dispatcher: handler(ctx, next)
//!     Dispatcher->>Table: load snapshot
//!     loop routes in insertion order
//!         Dispatcher->>Dispatcher: method equal?
//!         Dispatcher->>Dispatcher: matcher accepts path?
//!     end
//!     alt first match
//!         Dispatcher->>Dispatcher: ctx.route, ctx.params
//!         Dispatcher->>Chain: run handlers in order
//!         Chain-->>Dispatcher: done (or short-circuited)
//!         Dispatcher->>Host: next(ctx)
//!     else no match
//!         Dispatcher->>Host: not_found(ctx, next) or next(ctx)
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use chainrouter::router::Controller;
//! use chainrouter::{Context, Handler, Router};
//! use http::Method;
//!
//! let mut api = Router::with_prefix("/api");
//! api.load_methods();
//! api.get("/users/:user", [Handler::direct(|ctx, next| {
//!     let user = ctx.param("user").unwrap_or_default().to_string();
//!     ctx.respond(200, user);
//!     next.run(ctx)
//! })])?;
//! api.resource("company", &Controller::new())?;
//!
//! let dispatcher = api.dispatcher();
//!
//! let mut ctx = Context::new(Method::GET, "/api/users/ada");
//! dispatcher.handle(&mut ctx)?;
//! assert_eq!(ctx.body, "ada");
//!
//! let mut ctx = Context::new(Method::DELETE, "/api/companies/acme");
//! dispatcher.handle(&mut ctx)?;
//! assert_eq!(ctx.status, 501);
//! assert_eq!(ctx.param("company"), Some("acme"));
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Handler Shapes
//!
//! Handlers come in two shapes, freely mixed within one chain:
//!
//! - **Direct**: `Fn(&mut Context, Next) -> HandlerResult`; call `next.run(ctx)` to continue
//! - **Suspend**: a resumable step function that yields [`Step::Next`](handler::Step) to let
//!   downstream run and [`Step::Done`](handler::Step) when finished
//!
//! Both are normalized to direct style once, when a route is created.
//!
//! ## Error Handling
//!
//! Registration mistakes are reported immediately as [`RouterError`]. Dispatch never fails on
//! its own: an unmatched request falls through. Handler errors are `anyhow::Error` and
//! propagate out of dispatch unchanged.
//!
//! ## Logging
//!
//! Every registration and dispatch decision emits a `tracing` event. Install a subscriber
//! with [`otel::init_logging_with_config`] or your own.

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod echo;
pub mod error;
pub mod handler;
pub mod ids;
pub mod manifest;
pub mod method;
pub mod otel;
pub mod path;
pub mod router;

pub use config::RouterConfig;
pub use dispatcher::{DispatchOverride, Dispatcher};
pub use error::RouterError;
pub use handler::{Context, Handler, HandlerResult, Next, Step};
pub use ids::RequestId;
pub use router::{Controller, Route, RouteProvider, Router};
