//! Dispatcher core module - hot path for request dispatch.
//!
//! Dispatch is a linear scan over one table snapshot. Nothing is allocated
//! for routes whose method differs; parameters extracted on a match go into
//! the request's `Context`, never onto the shared `Route`.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::{debug, info};

use crate::config::RouterConfig;
use crate::error::Result;
use crate::handler::{direct_fn, into_suspend, Context, DirectFn, Handler, HandlerResult, Next};
use crate::path::{normalize_prefix, ParamVec};
use crate::router::{Route, Router, SharedTable};

/// Per-dispatcher overrides of the router configuration
#[derive(Debug, Clone, Default)]
pub struct DispatchOverride {
    /// Serve the routes re-mounted under this prefix instead
    pub prefix: Option<String>,
    /// Not-found handler replacing the configured one
    pub not_found: Option<Handler>,
}

/// Routes re-mounted under an override prefix, for one table snapshot
struct Remounted {
    source: Arc<Vec<Route>>,
    routes: Arc<Vec<Route>>,
}

/// Matches requests against a router's table and runs the winning chain
///
/// Cloning is cheap; clones share the table and the re-mount cache.
#[derive(Clone)]
pub struct Dispatcher {
    table: SharedTable,
    config: Arc<RouterConfig>,
    prefix: Option<String>,
    not_found: Option<Arc<DirectFn>>,
    remounted: Arc<ArcSwapOption<Remounted>>,
}

impl Dispatcher {
    pub(crate) fn new(router: &Router, overrides: DispatchOverride) -> Result<Self> {
        let not_found = overrides
            .not_found
            .as_ref()
            .or(router.config.not_found.as_ref())
            .map(Handler::to_direct);
        let prefix = overrides
            .prefix
            .map(|p| normalize_prefix(&p))
            .filter(|p| *p != router.config.prefix);

        let dispatcher = Self {
            table: Arc::clone(&router.table),
            config: Arc::clone(&router.config),
            prefix,
            not_found,
            remounted: Arc::new(ArcSwapOption::empty()),
        };
        // Compile the re-mounted table now so a bad prefix fails here
        dispatcher.snapshot()?;

        debug!(
            prefix = %dispatcher.prefix(),
            has_not_found = dispatcher.not_found.is_some(),
            "Dispatcher created"
        );
        Ok(dispatcher)
    }

    /// Prefix requests are matched under
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(&self.config.prefix)
    }

    /// The routes this dispatcher scans, in order
    ///
    /// # Errors
    ///
    /// `InvalidPattern` if a route registered after this dispatcher was
    /// created cannot be compiled under the override prefix.
    pub fn snapshot(&self) -> Result<Arc<Vec<Route>>> {
        let source = self.table.load_full();
        let Some(prefix) = self.prefix.as_deref() else {
            return Ok(source);
        };

        if let Some(cached) = &*self.remounted.load() {
            if Arc::ptr_eq(&cached.source, &source) {
                return Ok(Arc::clone(&cached.routes));
            }
        }

        let routes = source
            .iter()
            .map(|route| route.mount(prefix, self.config.matcher))
            .collect::<Result<Vec<_>>>()?;
        let routes = Arc::new(routes);
        debug!(
            prefix = %prefix,
            routes = routes.len(),
            "Re-mounted table for dispatch"
        );
        self.remounted.store(Some(Arc::new(Remounted {
            source,
            routes: Arc::clone(&routes),
        })));
        Ok(routes)
    }

    /// First route matching `ctx`'s method and path, with the merged params
    fn find(routes: &[Route], ctx: &Context) -> Option<(usize, ParamVec)> {
        routes.iter().enumerate().find_map(|(i, route)| {
            if *route.method() != ctx.method {
                return None;
            }
            route.matches(&ctx.path, &ctx.params).map(|params| (i, params))
        })
    }

    /// Dispatch one request
    ///
    /// On a match the route and parameters are written to `ctx`, the route's
    /// chain runs, and `next` runs once the chain completes, whether or not
    /// its last handler called its own continuation. Without a match `ctx`
    /// is left untouched and the not-found handler (or `next`) runs.
    /// Handler errors propagate unchanged and skip `next`.
    pub fn dispatch(&self, ctx: &mut Context, next: Next<'_>) -> HandlerResult {
        let routes = self.snapshot()?;
        debug!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            routes = routes.len(),
            "Route match attempt"
        );

        let Some((index, params)) = Self::find(&routes, ctx) else {
            debug!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path,
                has_not_found = self.not_found.is_some(),
                "No route matched"
            );
            return match &self.not_found {
                Some(handler) => handler(ctx, next),
                None => next.run(ctx),
            };
        };

        let route = &routes[index];
        info!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path,
            route_pattern = %route.path(),
            position = index,
            path_params = ?params,
            "Route matched"
        );
        ctx.params = params;
        ctx.route = Some(route.clone());

        route.chain().run_to_end(ctx)?;
        next.run(ctx)
    }

    /// Dispatch with nothing after the router
    pub fn handle(&self, ctx: &mut Context) -> HandlerResult {
        let mut end = |_: &mut Context| -> HandlerResult { Ok(()) };
        self.dispatch(ctx, Next::new(&[], &mut end))
    }

    /// Direct-style handler running this dispatcher
    #[must_use]
    pub fn into_handler(self) -> Handler {
        Handler::Direct(self.into_direct())
    }

    /// Suspend-style handler running this dispatcher
    ///
    /// Dispatch is identical; the result can be driven by a cooperative
    /// host with [`drive`](crate::handler::drive).
    #[must_use]
    pub fn into_legacy(self) -> Handler {
        Handler::Suspend(into_suspend(self.into_direct()))
    }

    fn into_direct(self) -> Arc<DirectFn> {
        direct_fn(move |ctx, next| self.dispatch(ctx, next))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("prefix", &self.prefix())
            .field("routes", &self.table.load().len())
            .field("has_not_found", &self.not_found.is_some())
            .finish()
    }
}

impl Router {
    /// A dispatcher over this router's table
    ///
    /// Routes registered later are picked up by the dispatcher too.
    #[must_use]
    pub fn dispatcher(&self) -> Dispatcher {
        let not_found = self.config.not_found.as_ref().map(Handler::to_direct);
        Dispatcher {
            table: Arc::clone(&self.table),
            config: Arc::clone(&self.config),
            prefix: None,
            not_found,
            remounted: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// The router as a direct-style handler
    #[must_use]
    pub fn middleware(&self) -> Handler {
        self.dispatcher().into_handler()
    }

    /// The router as a direct-style handler, with overrides
    ///
    /// # Errors
    ///
    /// `InvalidPattern` if the routes cannot be re-mounted under the
    /// override prefix.
    pub fn middleware_with(&self, overrides: DispatchOverride) -> Result<Handler> {
        Ok(Dispatcher::new(self, overrides)?.into_handler())
    }

    /// The router as a suspend-style handler for cooperative hosts
    #[must_use]
    pub fn legacy_middleware(&self) -> Handler {
        self.dispatcher().into_legacy()
    }

    /// [`legacy_middleware`](Router::legacy_middleware) in legacy mode,
    /// [`middleware`](Router::middleware) otherwise
    #[must_use]
    pub fn handler(&self) -> Handler {
        if self.config.legacy_mode {
            self.legacy_middleware()
        } else {
            self.middleware()
        }
    }
}
