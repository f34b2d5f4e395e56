//! # Router Module
//!
//! Route registration, lookup and composition.
//!
//! ## Overview
//!
//! A [`Router`] owns an ordered table of [`Route`]s. Each route is a
//! method, a logical path (`/users/:user`), a prefix it is mounted under
//! and an ordered chain of [`Handler`](crate::Handler)s. The table order is
//! the dispatch order: the first route whose method and path match wins.
//!
//! The router is responsible for:
//! - Building routes from `"METHOD /path"` tokens or explicit paths
//! - Keeping the table in insertion order
//! - Looking routes up by logical path
//! - Grouping routes and merging other routers' tables (re-mounting them)
//! - Generating conventional CRUD route sets ([`Router::resource`])
//!
//! Matching and handler execution live in [`crate::dispatcher`].
//!
//! ## Architecture
//!
//! A [`Route`] is split in two shared halves:
//!
//! 1. **Definition**: method, logical path, handlers and their normalized
//!    [`Chain`](crate::handler::Chain). Never changes.
//! 2. **Mount**: prefix, joined path and the compiled
//!    [`PathMatcher`](crate::path::PathMatcher). Re-mounting creates a new
//!    mount; the old one stays valid for whoever holds it.
//!
//! Per-request match results never touch the route: they go into the
//! request's [`Context`](crate::Context).
//!
//! ## Example
//!
//! ```
//! use chainrouter::router::Controller;
//! use chainrouter::{Handler, Router};
//!
//! let mut api = Router::with_prefix("/api");
//! api.load_methods();
//! api.get("/health", [Handler::direct(|ctx, next| {
//!     ctx.respond(200, "ok");
//!     next.run(ctx)
//! })])?;
//!
//! api.resource("user", &Controller::new())?;
//!
//! let paths: Vec<String> = api.get_routes().iter().map(|r| r.to_string()).collect();
//! assert_eq!(paths[0], "GET /api/health");
//! assert_eq!(paths[1], "GET /api/users");
//! assert_eq!(paths[4], "GET /api/users/:user");
//! # Ok::<(), chainrouter::RouterError>(())
//! ```

mod combinators;
mod core;
mod resource;
mod route;

pub use combinators::RouteProvider;
pub use core::Router;
pub use resource::{Controller, ResourceAction, ResourcePaths};
pub use route::{Route, RouteTarget};
pub(crate) use core::SharedTable;
