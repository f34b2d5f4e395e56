//! Grouping routes and merging route tables.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, RouterError};

use super::core::Router;
use super::route::Route;

/// Anything that can hand over an ordered list of routes
///
/// [`Router::extend`] accepts any provider, so route sets built elsewhere
/// can be merged without being wrapped in a router first.
pub trait RouteProvider {
    /// Routes in dispatch order
    fn provide_routes(&self) -> Vec<Route>;
}

impl RouteProvider for Router {
    fn provide_routes(&self) -> Vec<Route> {
        Vec::clone(&self.table.load())
    }
}

impl RouteProvider for [Route] {
    fn provide_routes(&self) -> Vec<Route> {
        self.to_vec()
    }
}

impl RouteProvider for Vec<Route> {
    fn provide_routes(&self) -> Vec<Route> {
        self.clone()
    }
}

impl RouteProvider for Arc<Vec<Route>> {
    fn provide_routes(&self) -> Vec<Route> {
        Vec::clone(self)
    }
}

impl Router {
    /// Fold routes into one composite route
    ///
    /// The composite's logical path is the plain string concatenation of the
    /// first two routes' logical paths; its method and handlers are the second
    /// route's. With more routes the fold continues left to right, so only the
    /// last route's handlers survive. The composite is mounted under this
    /// router's prefix and is not registered.
    ///
    /// ```
    /// use chainrouter::{Handler, Router};
    ///
    /// let router = Router::default();
    /// let noop = || Handler::direct(|ctx, next| next.run(ctx));
    /// let dest = router.create_route("GET", "/foo/bar", [noop()])?;
    /// let src = router.create_route("POST", "/baz/qux", [noop(), noop()])?;
    ///
    /// let grouped = router.group_routes(&[dest, src])?;
    /// assert_eq!(grouped.route(), "/foo/bar/baz/qux");
    /// assert_eq!(grouped.method(), &http::Method::POST);
    /// assert_eq!(grouped.middlewares().len(), 2);
    /// # Ok::<(), chainrouter::RouterError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when fewer than two routes are given, or whatever
    /// compiling the concatenated path produces.
    pub fn group_routes(&self, routes: &[Route]) -> Result<Route> {
        let [dest, src, rest @ ..] = routes else {
            return Err(RouterError::invalid(
                "groupRoutes",
                "at least two routes are required",
            ));
        };

        let mut grouped = self.group_pair(dest, src)?;
        for next in rest {
            grouped = self.group_pair(&grouped, next)?;
        }
        Ok(grouped)
    }

    fn group_pair(&self, dest: &Route, src: &Route) -> Result<Route> {
        let route = format!("{}{}", dest.route(), src.route());
        debug!(
            dest = %dest.route(),
            src = %src.route(),
            grouped = %route,
            method = %src.method(),
            "Grouping routes"
        );
        Route::build(
            src.method().clone(),
            route,
            src.middlewares().to_vec(),
            &self.config.prefix,
            self.config.matcher,
        )
    }

    /// Append every route of `other`, re-mounted under this router's prefix
    ///
    /// Routes mounted under a different prefix, or compiled with different
    /// match options, are re-mounted on a copy; the source keeps its own
    /// routes untouched. The join is literal: a route
    /// `/api/users` merged into a router with prefix `/api` matches
    /// `/api/api/users`.
    ///
    /// # Errors
    ///
    /// `InvalidPattern` if a re-mounted path does not compile. Nothing is
    /// appended in that case.
    pub fn extend<P>(&mut self, other: &P) -> Result<&mut Self>
    where
        P: RouteProvider + ?Sized,
    {
        let prefix = self.config.prefix.clone();
        let options = self.config.matcher;
        let incoming = other.provide_routes();
        let count = incoming.len();

        let mut remounted = 0usize;
        let mut routes = Vec::with_capacity(count);
        for route in incoming {
            if route.prefix() == prefix && route.matcher().options() == options {
                routes.push(route);
            } else {
                routes.push(route.mount(&prefix, options)?);
                remounted += 1;
            }
        }
        self.append(routes);

        info!(
            prefix = %prefix,
            added = count,
            remounted,
            total = self.table.load().len(),
            "Router extended"
        );
        Ok(self)
    }
}
