//! # Path Module
//!
//! Path pattern compilation and path manipulation used by route registration.
//!
//! - [`PathMatcher`] compiles a colon-token pattern (`/users/:user`) into a
//!   matcher that extracts named parameters from a concrete request path.
//! - [`join_prefix`] builds the fully-qualified pattern a route is matched
//!   against from its router prefix and logical route.
//! - [`PathSegments`] is the structured form resource generation works on.

mod matcher;
mod segments;

pub use matcher::{param, MatchOptions, ParamVec, PathMatcher, MAX_INLINE_PARAMS};
pub use segments::{join_prefix, normalize_prefix, PathSegments, Segment};
