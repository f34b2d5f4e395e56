//! YAML route manifests for the CLI.
//!
//! A manifest describes a router without code: its configuration, the routes
//! to register and the resources to generate. Every registered route is
//! served by the [echo handler](crate::echo::echo_handler); resource actions
//! that are not listed get the 501 stub.
//!
//! ```yaml
//! config:
//!   prefix: /api
//!   legacy_mode: false
//! not_found: true
//! routes:
//!   - GET /health
//!   - method: POST
//!     path: /login
//! resources:
//!   - name: user
//!     actions: [index, show]
//! ```

use std::path::Path;

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::config::RouterConfig;
use crate::echo::echo_handler;
use crate::handler::Handler;
use crate::path::normalize_prefix;
use crate::router::{Controller, Router};

/// One route entry: `"GET /users"` or `{ method, path }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouteEntry {
    Shorthand(String),
    Full { method: String, path: String },
}

/// One resource entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Base name, e.g. `user` or `companies/:company/department`
    pub name: String,
    /// Actions served by the echo handler
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub config: RouterConfig,
    /// Install a not-found handler answering 404 with a JSON error
    pub not_found: bool,
    pub routes: Vec<RouteEntry>,
    pub resources: Vec<ResourceEntry>,
}

/// The not-found handler installed by `not_found: true`
fn not_found_handler() -> Handler {
    Handler::direct(|ctx, next| {
        let path = ctx.path.clone();
        ctx.respond(404, json!({ "error": "not found", "path": path }));
        next.run(ctx)
    })
}

impl Manifest {
    /// Parse a manifest from YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the document does not describe a manifest.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse route manifest")
    }

    /// Load a manifest file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Build the router the manifest describes
    ///
    /// # Errors
    ///
    /// Returns the first registration error, with the offending entry.
    pub fn build_router(&self) -> Result<Router> {
        let mut config = self.config.clone();
        config.prefix = normalize_prefix(&config.prefix);
        if self.not_found {
            config.not_found = Some(not_found_handler());
        }
        let mut router = Router::new(config);

        for entry in &self.routes {
            match entry {
                RouteEntry::Shorthand(token) => router
                    .add_route(token, echo_handler(), [])
                    .with_context(|| format!("route '{token}'"))?,
                RouteEntry::Full { method, path } => router
                    .add_route(method, path.as_str(), [echo_handler()])
                    .with_context(|| format!("route '{method} {path}'"))?,
            };
        }

        for resource in &self.resources {
            let controller = resource
                .actions
                .iter()
                .fold(Controller::new(), |c, action| c.action(action, echo_handler()));
            router
                .resource(&resource.name, &controller)
                .with_context(|| format!("resource '{}'", resource.name))?;
        }

        debug!(
            routes = router.get_routes().len(),
            prefix = %router.prefix(),
            "Router built from manifest"
        );
        Ok(router)
    }
}
