//! # Handler Module
//!
//! The handler model shared by routes and dispatchers.
//!
//! ## Handler shapes
//!
//! A [`Handler`] is one of two shapes:
//!
//! - **Direct** - `Fn(&mut Context, Next) -> HandlerResult`. The handler calls
//!   [`Next::run`] to pass control downstream; not calling it stops the chain.
//! - **Suspend** - a [`SuspendHandler`] whose per-request [`Resumable`] yields
//!   [`Step::Next`] to ask its driver to run downstream, and [`Step::Done`] when
//!   finished. This is the cooperative-yield shape legacy middleware uses.
//!
//! Routes normalize every handler to direct style once, when the route is
//! created ([`compose`]), so dispatch never inspects handler shapes.
//!
//! ## Example
//!
//! ```
//! use chainrouter::handler::{compose, Context, Handler};
//! use http::Method;
//!
//! let chain = compose(&[
//!     Handler::around(
//!         |ctx| { ctx.set_header("x-legacy", "before"); Ok(()) },
//!         |ctx| { ctx.set_header("x-legacy", "after"); Ok(()) },
//!     ),
//!     Handler::direct(|ctx, next| {
//!         ctx.respond(200, "ok");
//!         next.run(ctx)
//!     }),
//! ]);
//!
//! let mut ctx = Context::new(Method::GET, "/");
//! chain.run_to_end(&mut ctx).unwrap();
//! assert_eq!(ctx.status, 200);
//! assert_eq!(ctx.get_header("x-legacy"), Some("after"));
//! ```

mod context;
mod convert;
mod core;

pub use context::{Context, HeaderVec, MAX_INLINE_HEADERS};
pub use convert::{drive, into_suspend, suspend_to_direct};
pub use core::{
    compose, direct_fn, not_implemented, step_fn, Chain, DirectFn, Handler, HandlerResult, Next,
    Resumable, Step, StepFn, SuspendHandler, Tail,
};
