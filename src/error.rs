use std::fmt;

/// Registration-time error
///
/// Raised synchronously by route construction, grouping, lookup and resource
/// generation. Dispatch never produces a `RouterError`: an unmatched request
/// falls through to the next handler instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// A caller passed an argument of the wrong shape
    InvalidArgument {
        /// Router operation that rejected the argument (e.g. `createRoute`)
        operation: &'static str,
        /// What was expected
        message: String,
    },
    /// A path pattern could not be compiled into a matcher
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },
    /// A verb helper (`get`, `post`, ...) was used before `load_methods`
    MethodsNotLoaded {
        /// The verb that was called
        method: &'static str,
    },
}

impl RouterError {
    pub(crate) fn invalid(operation: &'static str, message: impl Into<String>) -> Self {
        RouterError::InvalidArgument {
            operation,
            message: message.into(),
        }
    }

    /// True for the `InvalidArgument` variant
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RouterError::InvalidArgument { .. })
    }
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::InvalidArgument { operation, message } => {
                write!(f, ".{operation}: {message}")
            }
            RouterError::InvalidPattern { pattern, message } => {
                write!(f, "invalid path pattern '{pattern}': {message}")
            }
            RouterError::MethodsNotLoaded { method } => {
                write!(
                    f,
                    ".{method}: verb helpers are not loaded, call load_methods() first"
                )
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Result alias for registration-time operations
pub type Result<T> = std::result::Result<T, RouterError>;
