//! # Dispatcher Module
//!
//! Runs a router's table against incoming requests.
//!
//! ## Request Flow
//!
//! 1. Scan the table in insertion order
//! 2. Skip routes whose method differs from the request's
//! 3. The first route whose matcher accepts the path wins; its parameters are
//!    merged after any already on the context
//! 4. The route and parameters are written to the [`Context`](crate::Context),
//!    the route's chain runs, then the surrounding continuation
//! 5. Without a match the context is left as it was and the not-found
//!    handler runs if configured, otherwise the surrounding continuation
//!
//! The dispatcher never sets a status or body of its own.
//!
//! ## Handler Forms
//!
//! - [`Router::middleware`](crate::Router::middleware) gives a direct-style handler
//! - [`Router::legacy_middleware`](crate::Router::legacy_middleware) gives the
//!   same dispatch as a suspend-style handler for cooperative hosts
//! - [`Router::middleware_with`](crate::Router::middleware_with) serves the
//!   routes under another prefix or with another not-found handler
//!
//! Since each form is a [`Handler`](crate::Handler), routers nest inside
//! other routers' chains.
//!
//! ## Example
//!
//! ```
//! use chainrouter::{Context, Handler, Router};
//! use http::Method;
//!
//! let mut router = Router::default();
//! router.add_route("GET /users/:user", Handler::direct(|ctx, next| {
//!     let user = ctx.param("user").unwrap_or_default().to_string();
//!     ctx.respond(200, format!("hello {user}"));
//!     next.run(ctx)
//! }), [])?;
//!
//! let dispatcher = router.dispatcher();
//! let mut ctx = Context::new(Method::GET, "/users/ada");
//! dispatcher.handle(&mut ctx)?;
//! assert_eq!(ctx.status, 200);
//! assert_eq!(ctx.body, "hello ada");
//! # Ok::<(), anyhow::Error>(())
//! ```

mod core;

pub use core::{DispatchOverride, Dispatcher};
