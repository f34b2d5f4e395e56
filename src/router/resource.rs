//! Conventional CRUD route sets ("resource routing").
//!
//! A resource named `user` expands to:
//!
//! | Action | Method | Path |
//! |--------|--------|------|
//! | `index` | GET | `/users` |
//! | `new` | GET | `/users/new` |
//! | `create` | POST | `/users` |
//! | `show` | GET | `/users/:user` |
//! | `edit` | GET | `/users/:user/edit` |
//! | `update` | PUT, POST, PATCH | `/users/:user` |
//! | `destroy`, `remove`, `delete`, `del` | DELETE | `/users/:user` |
//!
//! Routes are registered in that order. The four delete aliases share one
//! method and path, so only `destroy` is ever reached at dispatch time.
//!
//! Names can be nested (`companies/:company/departments`): only the last
//! segment is inflected, everything before it is kept as written.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use http::Method;
use inflector::string::pluralize::to_plural;
use inflector::string::singularize::to_singular;
use tracing::{debug, info, warn};

use crate::error::{Result, RouterError};
use crate::handler::{not_implemented, Handler};
use crate::path::PathSegments;

use super::core::Router;
use super::route::Route;

/// One conventional resource action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceAction {
    Index,
    New,
    Create,
    Show,
    Edit,
    Update,
    Destroy,
    Remove,
    Delete,
    Del,
}

/// Whether an action targets the collection or one member, plus any suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Collection,
    CollectionSuffix(&'static str),
    Member,
    MemberSuffix(&'static str),
}

impl ResourceAction {
    /// Every action, in registration order
    pub const ALL: [ResourceAction; 10] = [
        ResourceAction::Index,
        ResourceAction::New,
        ResourceAction::Create,
        ResourceAction::Show,
        ResourceAction::Edit,
        ResourceAction::Update,
        ResourceAction::Destroy,
        ResourceAction::Remove,
        ResourceAction::Delete,
        ResourceAction::Del,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ResourceAction::Index => "index",
            ResourceAction::New => "new",
            ResourceAction::Create => "create",
            ResourceAction::Show => "show",
            ResourceAction::Edit => "edit",
            ResourceAction::Update => "update",
            ResourceAction::Destroy => "destroy",
            ResourceAction::Remove => "remove",
            ResourceAction::Delete => "delete",
            ResourceAction::Del => "del",
        }
    }

    /// Methods this action registers under, in order
    #[must_use]
    pub fn methods(self) -> &'static [Method] {
        const GET: &[Method] = &[Method::GET];
        const POST: &[Method] = &[Method::POST];
        const UPDATE: &[Method] = &[Method::PUT, Method::POST, Method::PATCH];
        const DELETE: &[Method] = &[Method::DELETE];
        match self {
            ResourceAction::Index | ResourceAction::New => GET,
            ResourceAction::Show | ResourceAction::Edit => GET,
            ResourceAction::Create => POST,
            ResourceAction::Update => UPDATE,
            ResourceAction::Destroy
            | ResourceAction::Remove
            | ResourceAction::Delete
            | ResourceAction::Del => DELETE,
        }
    }

    fn target(self) -> Target {
        match self {
            ResourceAction::Index | ResourceAction::Create => Target::Collection,
            ResourceAction::New => Target::CollectionSuffix("new"),
            ResourceAction::Edit => Target::MemberSuffix("edit"),
            _ => Target::Member,
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResourceAction {
    type Err = RouterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ResourceAction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| RouterError::invalid("resource", format!("unknown action '{s}'")))
    }
}

/// Action name to handlers
///
/// Names that are not a [`ResourceAction`] are kept but ignored (with a
/// warning) when the resource is generated. Actions without handlers get
/// the 501 "Not Implemented" stub.
#[derive(Debug, Clone, Default)]
pub struct Controller {
    actions: HashMap<String, Vec<Handler>>,
}

impl Controller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the single handler for `action`
    #[must_use]
    pub fn action(self, action: impl Into<String>, handler: Handler) -> Self {
        self.actions(action, vec![handler])
    }

    /// Set the handler list for `action`, replacing any earlier one
    #[must_use]
    pub fn actions(mut self, action: impl Into<String>, handlers: Vec<Handler>) -> Self {
        self.actions.insert(action.into(), handlers);
        self
    }

    /// Handlers registered for `action`, if any
    #[must_use]
    pub fn get(&self, action: ResourceAction) -> Option<&[Handler]> {
        self.actions
            .get(action.name())
            .filter(|h| !h.is_empty())
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.actions
            .keys()
            .map(String::as_str)
            .filter(|name| name.parse::<ResourceAction>().is_err())
    }
}

/// Singular and plural forms Inflector gets wrong
const IRREGULAR: &[(&str, &str)] = &[
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("child", "children"),
    ("mouse", "mice"),
    ("louse", "lice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
    ("leaf", "leaves"),
    ("half", "halves"),
    ("knife", "knives"),
    ("life", "lives"),
    ("wife", "wives"),
    ("wolf", "wolves"),
    ("shelf", "shelves"),
];

/// `(singular, plural)` of `word`, which may be given in either form
fn inflect(word: &str) -> (String, String) {
    let irregular = IRREGULAR.iter().find(|(one, many)| {
        word.eq_ignore_ascii_case(one) || word.eq_ignore_ascii_case(many)
    });
    if let Some((one, many)) = irregular {
        return ((*one).to_string(), (*many).to_string());
    }
    let singular = to_singular(word);
    let plural = to_plural(&singular);
    (singular, plural)
}

/// Collection and member paths derived from a resource name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePaths {
    /// e.g. `/users`
    pub collection: PathSegments,
    /// e.g. `/users/:user`
    pub member: PathSegments,
    /// e.g. `user`
    pub param: String,
}

impl ResourcePaths {
    /// Derive the paths for `name`
    ///
    /// The last segment must be static and may be given singular or plural.
    /// Its plural names the collection path, its singular the member
    /// parameter.
    ///
    /// ```
    /// use chainrouter::router::ResourcePaths;
    ///
    /// let paths = ResourcePaths::from_name("company").unwrap();
    /// assert_eq!(paths.collection.to_path(), "/companies");
    /// assert_eq!(paths.member.to_path(), "/companies/:company");
    ///
    /// let paths = ResourcePaths::from_name("people").unwrap();
    /// assert_eq!(paths.member.to_path(), "/people/:person");
    /// ```
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty name or one ending in a parameter.
    pub fn from_name(name: &str) -> Result<Self> {
        let segments = PathSegments::parse(name);
        let Some(last) = segments.last_static() else {
            return Err(RouterError::invalid(
                "resource",
                "name must end with a static path segment",
            ));
        };
        let (param, plural) = inflect(last);
        let collection = segments.with_last_static(plural);
        let member = collection.clone().with_param(param.clone());
        Ok(Self {
            collection,
            member,
            param,
        })
    }

    fn path_for(&self, target: Target) -> String {
        match target {
            Target::Collection => self.collection.to_path(),
            Target::CollectionSuffix(s) => self.collection.clone().with_static(s).to_path(),
            Target::Member => self.member.to_path(),
            Target::MemberSuffix(s) => self.member.clone().with_static(s).to_path(),
        }
    }
}

impl Router {
    /// Build the conventional route set for `name` without registering it
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the name has no static last segment, or any
    /// error route construction produces.
    pub fn create_resource(&self, name: &str, controller: &Controller) -> Result<Vec<Route>> {
        let paths = ResourcePaths::from_name(name)?;
        for unknown in controller.unknown_names() {
            warn!(resource = %name, action = %unknown, "Ignoring unknown resource action");
        }

        let mut routes = Vec::with_capacity(12);
        for action in ResourceAction::ALL {
            let handlers = match controller.get(action) {
                Some(handlers) => handlers.to_vec(),
                None => vec![not_implemented()],
            };
            let path = paths.path_for(action.target());
            for method in action.methods() {
                debug!(
                    resource = %name,
                    action = %action,
                    method = %method,
                    path = %path,
                    "Generating resource route"
                );
                routes.push(self.create_route(method.as_str(), path.as_str(), handlers.clone())?);
            }
        }
        Ok(routes)
    }

    /// Generate and register the conventional route set for `name`
    ///
    /// The generated routes are appended in one atomic swap after all of them
    /// were built; on error the table is left as it was.
    ///
    /// # Errors
    ///
    /// Same as [`create_resource`](Router::create_resource).
    pub fn resource(&mut self, name: &str, controller: &Controller) -> Result<&mut Self> {
        let routes = self.create_resource(name, controller)?;
        let count = routes.len();
        self.append(routes);
        info!(
            resource = %name,
            routes = count,
            total = self.table.load().len(),
            "Resource registered"
        );
        Ok(self)
    }
}
