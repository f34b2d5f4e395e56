//! Router core: the route table and the operations that build and query it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use http::Method;
use tracing::{debug, info, warn};

use crate::config::RouterConfig;
use crate::error::{Result, RouterError};
use crate::handler::Handler;
use crate::method::{parse_method, split_method_token};

use super::route::{Route, RouteTarget};

/// Ordered routes of one router, swapped atomically on every registration
pub(crate) type SharedTable = Arc<ArcSwap<Vec<Route>>>;

/// Registers routes and hands out dispatchers over them
///
/// Routes are kept in insertion order, which is also dispatch priority:
/// the first route whose method and path match wins. Duplicates are legal.
///
/// The table is shared with every dispatcher this router creates through an
/// `ArcSwap`, so routes registered after [`middleware`](Router::middleware)
/// was called are still seen by that middleware. Readers never block.
///
/// # Example
///
/// ```
/// use chainrouter::{Handler, Router};
///
/// let mut router = Router::with_prefix("/api");
/// router
///     .add_route("GET /users", Handler::direct(|ctx, next| {
///         ctx.respond(200, "all users");
///         next.run(ctx)
///     }), [])?
///     .add_route("DELETE", "/users/:user", [Handler::direct(|ctx, next| {
///         ctx.status = 204;
///         next.run(ctx)
///     })])?;
///
/// assert_eq!(router.get_routes().len(), 2);
/// assert_eq!(router.get_route("users").unwrap().path(), "/api/users");
/// # Ok::<(), chainrouter::RouterError>(())
/// ```
pub struct Router {
    pub(crate) config: Arc<RouterConfig>,
    pub(crate) table: SharedTable,
    methods_loaded: bool,
}

impl Router {
    /// Create an empty router
    #[must_use]
    pub fn new(config: RouterConfig) -> Self {
        info!(
            prefix = %config.prefix,
            legacy_mode = config.legacy_mode,
            sensitive = config.matcher.sensitive,
            strict = config.matcher.strict,
            has_not_found = config.not_found.is_some(),
            "Router created"
        );
        Self {
            config: Arc::new(config),
            table: Arc::new(ArcSwap::from_pointee(Vec::new())),
            methods_loaded: false,
        }
    }

    /// Create an empty router with default options under `prefix`
    #[must_use]
    pub fn with_prefix(prefix: impl AsRef<str>) -> Self {
        Self::new(RouterConfig::with_prefix(prefix))
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Namespace every route of this router is mounted under
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Build a route without registering it
    ///
    /// `method` is a verb token, optionally carrying the path as in
    /// `"GET /users"`. The embedded path is only used when `target` is
    /// handlers rather than an explicit path. Handlers from `target` come
    /// first, followed by `handlers`.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `method` does not name a supported verb
    /// - `InvalidArgument` if no path was given either way, or it is empty
    /// - `InvalidArgument` if no handlers were given
    /// - `InvalidPattern` if the joined path does not compile
    pub fn create_route<T, I>(&self, method: &str, target: T, handlers: I) -> Result<Route>
    where
        T: Into<RouteTarget>,
        I: IntoIterator<Item = Handler>,
    {
        let (verb, embedded) = split_method_token(method);
        let Some(method) = parse_method(verb) else {
            warn!(method = %verb, "Rejected route with unknown method");
            return Err(RouterError::invalid(
                "createRoute",
                "method must be a string naming an HTTP verb",
            ));
        };

        let (route, mut middlewares) = match (target.into(), embedded) {
            (RouteTarget::Path(path), _) => (path, Vec::new()),
            (RouteTarget::Handlers(inner), Some(path)) => (path.to_string(), inner),
            (RouteTarget::Handlers(_), None) => {
                return Err(RouterError::invalid(
                    "createRoute",
                    "path must be a string, array, or function",
                ));
            }
        };
        if route.is_empty() {
            return Err(RouterError::invalid(
                "createRoute",
                "path must be a string, array, or function",
            ));
        }

        middlewares.extend(handlers);
        if middlewares.is_empty() {
            return Err(RouterError::invalid(
                "createRoute",
                "at least one handler is required",
            ));
        }

        let route = Route::build(
            method,
            route,
            middlewares,
            &self.config.prefix,
            self.config.matcher,
        )?;
        debug!(
            method = %route.method(),
            route = %route.route(),
            path = %route.path(),
            handlers = route.middlewares().len(),
            "Route created"
        );
        Ok(route)
    }

    /// Build a route and append it to the table
    ///
    /// # Errors
    ///
    /// Same as [`create_route`](Router::create_route).
    pub fn add_route<T, I>(&mut self, method: &str, target: T, handlers: I) -> Result<&mut Self>
    where
        T: Into<RouteTarget>,
        I: IntoIterator<Item = Handler>,
    {
        let route = self.create_route(method, target, handlers)?;
        info!(
            method = %route.method(),
            path = %route.path(),
            position = self.table.load().len(),
            "Route registered"
        );
        self.append(std::iter::once(route));
        Ok(self)
    }

    /// Append already-built route lists, in argument order
    ///
    /// Routes are taken as they are: nothing is re-mounted.
    pub fn add_routes<L, R>(&mut self, lists: L) -> &mut Self
    where
        L: IntoIterator<Item = R>,
        R: IntoIterator<Item = Route>,
    {
        let before = self.table.load().len();
        self.append(lists.into_iter().flatten());
        info!(
            added = self.table.load().len() - before,
            total = self.table.load().len(),
            "Routes appended"
        );
        self
    }

    /// First route whose logical path equals `name`, ignoring one leading `/`
    #[must_use]
    pub fn get_route(&self, name: &str) -> Option<Route> {
        let name = name.strip_prefix('/').unwrap_or(name);
        self.table
            .load()
            .iter()
            .find(|r| r.route().strip_prefix('/').unwrap_or(r.route()) == name)
            .cloned()
    }

    /// Snapshot of the table in dispatch order
    #[must_use]
    pub fn get_routes(&self) -> Arc<Vec<Route>> {
        self.table.load_full()
    }

    /// Enable the verb helpers ([`get`](Router::get), [`post`](Router::post), ...)
    pub fn load_methods(&mut self) -> &mut Self {
        if !self.methods_loaded {
            debug!(prefix = %self.config.prefix, "Verb helpers loaded");
        }
        self.methods_loaded = true;
        self
    }

    #[must_use]
    pub fn methods_loaded(&self) -> bool {
        self.methods_loaded
    }

    pub(crate) fn append(&mut self, routes: impl IntoIterator<Item = Route>) {
        let current = self.table.load();
        let mut next = Vec::clone(&current);
        next.extend(routes);
        self.table.store(Arc::new(next));
    }

    fn verb(
        &mut self,
        method: Method,
        name: &'static str,
        path: &str,
        handlers: Vec<Handler>,
    ) -> Result<&mut Self> {
        if !self.methods_loaded {
            return Err(RouterError::MethodsNotLoaded { method: name });
        }
        self.add_route(method.as_str(), path, handlers)
    }
}

macro_rules! verb_helpers {
    ($($(#[$doc:meta])* $name:ident => $method:expr;)*) => {
        impl Router {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// `MethodsNotLoaded` before [`load_methods`](Router::load_methods),
                /// otherwise the errors of [`add_route`](Router::add_route).
                pub fn $name<I>(&mut self, path: &str, handlers: I) -> Result<&mut Self>
                where
                    I: IntoIterator<Item = Handler>,
                {
                    self.verb($method, stringify!($name), path, handlers.into_iter().collect())
                }
            )*
        }
    };
}

verb_helpers! {
    /// Register a `GET` route
    get => Method::GET;
    /// Register a `POST` route
    post => Method::POST;
    /// Register a `PUT` route
    put => Method::PUT;
    /// Register a `PATCH` route
    patch => Method::PATCH;
    /// Register a `DELETE` route
    delete => Method::DELETE;
    /// Register a `DELETE` route (short alias)
    del => Method::DELETE;
    /// Register a `HEAD` route
    head => Method::HEAD;
    /// Register an `OPTIONS` route
    options => Method::OPTIONS;
    /// Register a `TRACE` route
    trace => Method::TRACE;
    /// Register a `CONNECT` route
    connect => Method::CONNECT;
}

impl Default for Router {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("prefix", &self.config.prefix)
            .field("routes", &self.table.load().len())
            .field("methods_loaded", &self.methods_loaded)
            .finish()
    }
}
