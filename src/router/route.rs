use std::fmt;
use std::sync::Arc;

use http::Method;

use crate::error::Result;
use crate::handler::{compose, Chain, Handler};
use crate::path::{join_prefix, MatchOptions, ParamVec, PathMatcher};

/// The mount-independent half of a route
struct RouteDef {
    method: Method,
    route: String,
    middlewares: Vec<Handler>,
    chain: Chain,
}

/// Where a route definition is mounted: prefix, joined path and its matcher
struct Mount {
    prefix: String,
    path: String,
    matcher: PathMatcher,
}

/// One registered `(method, path pattern, handler chain)`
///
/// A route is an immutable definition (method, logical route, handlers)
/// paired with a mount (prefix, joined path, compiled matcher). Re-mounting
/// under another prefix produces a new `Route` sharing the same definition;
/// the original is never touched, so routers that share routes stay
/// independent. Match results are returned to the caller, never stored here.
#[derive(Clone)]
pub struct Route {
    def: Arc<RouteDef>,
    mount: Arc<Mount>,
}

impl Route {
    /// Build a route and mount it under `prefix`
    ///
    /// Handlers are normalized to direct style here, once.
    pub(crate) fn build(
        method: Method,
        route: String,
        middlewares: Vec<Handler>,
        prefix: &str,
        options: MatchOptions,
    ) -> Result<Self> {
        let chain = compose(&middlewares);
        let def = Arc::new(RouteDef {
            method,
            route,
            middlewares,
            chain,
        });
        let mount = Arc::new(Self::mount_def(&def, prefix, options)?);
        Ok(Self { def, mount })
    }

    fn mount_def(def: &RouteDef, prefix: &str, options: MatchOptions) -> Result<Mount> {
        let path = join_prefix(prefix, &def.route);
        let matcher = PathMatcher::compile(&path, options)?;
        Ok(Mount {
            prefix: prefix.to_string(),
            path,
            matcher,
        })
    }

    /// This route's definition mounted under another prefix
    ///
    /// The joined path and matcher are recomputed from the new prefix.
    /// Mounting twice under the same prefix yields the same path and matcher.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`](crate::RouterError::InvalidPattern)
    /// if the joined path cannot be compiled.
    pub fn mount(&self, prefix: &str, options: MatchOptions) -> Result<Self> {
        Ok(Self {
            def: Arc::clone(&self.def),
            mount: Arc::new(Self::mount_def(&self.def, prefix, options)?),
        })
    }

    /// Uppercase HTTP verb
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.def.method
    }

    /// Namespace the route is mounted under
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.mount.prefix
    }

    /// Logical path as registered, without the prefix
    #[must_use]
    pub fn route(&self) -> &str {
        &self.def.route
    }

    /// Prefix and route joined; what request paths are matched against
    #[must_use]
    pub fn path(&self) -> &str {
        &self.mount.path
    }

    #[must_use]
    pub fn matcher(&self) -> &PathMatcher {
        &self.mount.matcher
    }

    /// Handlers in registration order, in their original shape
    #[must_use]
    pub fn middlewares(&self) -> &[Handler] {
        &self.def.middlewares
    }

    /// Handlers normalized to direct style
    #[must_use]
    pub fn chain(&self) -> &Chain {
        &self.def.chain
    }

    /// Match a request path against this route
    ///
    /// Returns `existing` extended with the extracted parameters, or `None`.
    #[must_use]
    pub fn matches(&self, path: &str, existing: &ParamVec) -> Option<ParamVec> {
        self.mount.matcher.match_path(path, existing)
    }

    /// True if both values share one definition
    #[must_use]
    pub fn same_definition(&self, other: &Route) -> bool {
        Arc::ptr_eq(&self.def, &other.def)
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.def.method)
            .field("prefix", &self.mount.prefix)
            .field("route", &self.def.route)
            .field("path", &self.mount.path)
            .field("middlewares", &self.def.middlewares.len())
            .finish()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.def.method, self.mount.path)
    }
}

/// The second argument of route construction: an explicit path, or handlers
/// that signal "use the path embedded in the method token" (`"GET /users"`)
#[derive(Debug, Clone)]
pub enum RouteTarget {
    Path(String),
    Handlers(Vec<Handler>),
}

impl From<&str> for RouteTarget {
    fn from(path: &str) -> Self {
        RouteTarget::Path(path.to_string())
    }
}

impl From<String> for RouteTarget {
    fn from(path: String) -> Self {
        RouteTarget::Path(path)
    }
}

impl From<&String> for RouteTarget {
    fn from(path: &String) -> Self {
        RouteTarget::Path(path.clone())
    }
}

impl From<Handler> for RouteTarget {
    fn from(handler: Handler) -> Self {
        RouteTarget::Handlers(vec![handler])
    }
}

impl From<Vec<Handler>> for RouteTarget {
    fn from(handlers: Vec<Handler>) -> Self {
        RouteTarget::Handlers(handlers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::Context;

    fn ok() -> Handler {
        Handler::direct(|ctx, next| {
            ctx.status = 200;
            next.run(ctx)
        })
    }

    fn users_route(prefix: &str) -> Route {
        Route::build(
            Method::GET,
            "/users/:user".to_string(),
            vec![ok(), ok()],
            prefix,
            MatchOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_build_joins_prefix() {
        let route = users_route("/api");
        assert_eq!(route.prefix(), "/api");
        assert_eq!(route.route(), "/users/:user");
        assert_eq!(route.path(), "/api/users/:user");
        assert_eq!(route.middlewares().len(), 2);
        assert_eq!(route.chain().len(), 2);
        assert_eq!(route.to_string(), "GET /api/users/:user");
    }

    #[test]
    fn test_mount_leaves_original_untouched() {
        let original = users_route("/");
        let mounted = original.mount("/v2", MatchOptions::default()).unwrap();
        assert_eq!(original.path(), "/users/:user");
        assert_eq!(mounted.path(), "/v2/users/:user");
        assert!(mounted.same_definition(&original));
        assert!(original.matches("/v2/users/1", &ParamVec::new()).is_none());
        assert!(mounted.matches("/v2/users/1", &ParamVec::new()).is_some());
    }

    #[test]
    fn test_mount_is_idempotent() {
        let original = users_route("/");
        let once = original.mount("/api", MatchOptions::default()).unwrap();
        let twice = once.mount("/api", MatchOptions::default()).unwrap();
        assert_eq!(once.path(), twice.path());
        assert_eq!(once.matcher(), twice.matcher());
    }

    #[test]
    fn test_matches_extracts_params() {
        let route = users_route("/api");
        let params = route.matches("/api/users/42", &ParamVec::new()).unwrap();
        assert_eq!(crate::path::param(&params, "user"), Some("42"));
    }

    #[test]
    fn test_chain_runs() {
        let route = users_route("/");
        let mut ctx = Context::new(Method::GET, "/users/1");
        route.chain().run_to_end(&mut ctx).unwrap();
        assert_eq!(ctx.status, 200);
    }

    #[test]
    fn test_target_conversions() {
        assert!(matches!(RouteTarget::from("/x"), RouteTarget::Path(p) if p == "/x"));
        assert!(matches!(RouteTarget::from(ok()), RouteTarget::Handlers(h) if h.len() == 1));
    }
}
