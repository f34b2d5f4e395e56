//! Path joining and segment-level path manipulation.

use std::fmt;

/// Join a router prefix and a logical route into the fully-qualified pattern
///
/// The prefix loses its surrounding slashes and the route loses one leading
/// slash; the two are then joined by exactly one `/`. The route is otherwise
/// taken literally, so a route that already starts with the prefix keeps it
/// (`/api` + `/api/users` gives `/api/api/users`).
///
/// ```
/// use chainrouter::path::join_prefix;
///
/// assert_eq!(join_prefix("/", "/users"), "/users");
/// assert_eq!(join_prefix("/api/", "/users/:user"), "/api/users/:user");
/// assert_eq!(join_prefix("/api", "/"), "/api/");
/// ```
#[must_use]
pub fn join_prefix(prefix: &str, route: &str) -> String {
    let clean = prefix.trim_matches('/');
    let path = route.strip_prefix('/').unwrap_or(route);
    if clean.is_empty() {
        format!("/{path}")
    } else {
        format!("/{clean}/{path}")
    }
}

/// Normalize a configured prefix so it always starts with `/`
#[must_use]
pub fn normalize_prefix(prefix: &str) -> String {
    if prefix.starts_with('/') {
        prefix.to_string()
    } else {
        format!("/{prefix}")
    }
}

/// One `/`-separated piece of a path pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text
    Static(String),
    /// `:name` parameter token (stored without the colon)
    Param(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static(s) => f.write_str(s),
            Segment::Param(p) => write!(f, ":{p}"),
        }
    }
}

/// A path pattern as an ordered list of segments
///
/// Used by resource generation to derive collection and member paths at any
/// nesting depth instead of slicing strings at fixed slash positions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSegments {
    segments: Vec<Segment>,
}

impl PathSegments {
    /// Split a pattern on `/`, dropping empty pieces
    #[must_use]
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(s.to_string()),
            })
            .collect();
        Self { segments }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// The last segment, if it is a static one
    #[must_use]
    pub fn last_static(&self) -> Option<&str> {
        match self.segments.last() {
            Some(Segment::Static(s)) => Some(s),
            _ => None,
        }
    }

    /// Replace the last segment with a static one
    #[must_use]
    pub fn with_last_static(mut self, text: impl Into<String>) -> Self {
        self.segments.pop();
        self.segments.push(Segment::Static(text.into()));
        self
    }

    /// Append a static segment
    #[must_use]
    pub fn with_static(mut self, text: impl Into<String>) -> Self {
        self.segments.push(Segment::Static(text.into()));
        self
    }

    /// Append a parameter segment
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::Param(name.into()));
        self
    }

    /// Render back to a pattern with a leading `/`
    #[must_use]
    pub fn to_path(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PathSegments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}
