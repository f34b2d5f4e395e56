//! Colon-token path pattern compiler.
//!
//! Patterns such as `/users/:user`, `/files/:path*` or `/items/:id(\d+)` are
//! compiled once into an anchored [`Regex`] plus the ordered list of parameter
//! names, the same two-phase approach the routing table has always used:
//! compile at registration, then only run the regex on the request path.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{Result, RouterError};

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Extracted path parameters, in extraction order.
///
/// Names are `Arc<str>` shared with the compiled matcher; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// Look up a parameter by name with "last write wins" semantics
#[must_use]
pub fn param<'a>(params: &'a ParamVec, name: &str) -> Option<&'a str> {
    params
        .iter()
        .rfind(|(k, _)| k.as_ref() == name)
        .map(|(_, v)| v.as_str())
}

/// Matching flags forwarded verbatim from the router configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Case-sensitive matching
    pub sensitive: bool,
    /// Trailing slash is significant
    pub strict: bool,
    /// Pattern must consume the whole path
    pub end: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            sensitive: false,
            strict: false,
            end: true,
        }
    }
}

// escaped char | optional prefix + (:name[(pattern)] | (pattern)) + modifier | bare *
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\\.)|([/.])?(?:(?::(\w+)(?:\(((?:\\.|[^\\()])+)\))?|\(((?:\\.|[^\\()])+)\))([+*?])?|(\*))",
    )
    .expect("token grammar is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(ParamToken),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ParamToken {
    name: Arc<str>,
    prefix: Option<char>,
    optional: bool,
    repeat: bool,
    partial: bool,
    pattern: String,
}

fn tokenize(pattern: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut literal = String::new();
    let mut index = 0;
    let mut key = 0usize;

    for caps in TOKEN_RE.captures_iter(pattern) {
        let Some(whole) = caps.get(0) else { continue };
        literal.push_str(&pattern[index..whole.start()]);
        index = whole.end();

        if let Some(escaped) = caps.get(1) {
            literal.push_str(&escaped.as_str()[1..]);
            continue;
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }

        let prefix = caps.get(2).and_then(|m| m.as_str().chars().next());
        let next = pattern[index..].chars().next();
        let modifier = caps.get(6).map(|m| m.as_str());
        let asterisk = caps.get(7).is_some();
        let delimiter = prefix.unwrap_or('/');

        let name: Arc<str> = match caps.get(3) {
            Some(name) => Arc::from(name.as_str()),
            None => {
                let name = Arc::from(key.to_string());
                key += 1;
                name
            }
        };

        let custom = caps.get(4).or_else(|| caps.get(5)).map(|m| m.as_str());
        let pattern = match custom {
            Some(p) => p.replace('$', r"\$"),
            None if asterisk => ".*".to_string(),
            None => format!("[^{}]+?", regex::escape(&delimiter.to_string())),
        };

        tokens.push(Token::Param(ParamToken {
            name,
            prefix,
            optional: matches!(modifier, Some("?") | Some("*")),
            repeat: matches!(modifier, Some("+") | Some("*")),
            partial: prefix.is_some() && next.is_some() && next != prefix,
            pattern,
        }));
    }

    literal.push_str(&pattern[index..]);
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    tokens
}

fn to_regex_source(tokens: &[Token], options: MatchOptions) -> String {
    let mut route = String::from("^");

    for token in tokens {
        match token {
            Token::Literal(text) => route.push_str(&regex::escape(text)),
            Token::Param(p) => {
                let prefix = p
                    .prefix
                    .map(|c| regex::escape(&c.to_string()))
                    .unwrap_or_default();
                let mut capture = format!("(?:{})", p.pattern);
                if p.repeat {
                    capture = format!("{capture}(?:{prefix}{capture})*");
                }
                let piece = if p.optional {
                    if p.partial {
                        format!("{prefix}({capture})?")
                    } else {
                        format!("(?:{prefix}({capture}))?")
                    }
                } else {
                    format!("{prefix}({capture})")
                };
                route.push_str(&piece);
            }
        }
    }

    let ends_with_delimiter = route.len() > 1 && route.ends_with('/');
    if !options.strict {
        if ends_with_delimiter {
            route.pop();
        }
        route.push_str("/?");
    }
    if options.end {
        route.push('$');
    } else if !(options.strict && ends_with_delimiter) {
        route.push_str("(?:/|$)");
    }
    route
}

/// A compiled path pattern
///
/// Cheap to clone: the regex and parameter names are shared.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    pattern: Arc<str>,
    regex: Regex,
    names: Arc<[Arc<str>]>,
    options: MatchOptions,
}

impl PathMatcher {
    /// Compile `pattern` with the given options
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] when a custom `(pattern)` group
    /// does not form a valid regular expression.
    pub fn compile(pattern: &str, options: MatchOptions) -> Result<Self> {
        let tokens = tokenize(pattern);
        let names: Vec<Arc<str>> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Param(p) => Some(Arc::clone(&p.name)),
                Token::Literal(_) => None,
            })
            .collect();

        let source = to_regex_source(&tokens, options);
        let regex = RegexBuilder::new(&source)
            .case_insensitive(!options.sensitive)
            .build()
            .map_err(|e| RouterError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            pattern: Arc::from(pattern),
            regex,
            names: names.into(),
            options,
        })
    }

    /// The pattern this matcher was compiled from
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parameter names in the order they appear in the pattern
    #[must_use]
    pub fn param_names(&self) -> &[Arc<str>] {
        &self.names
    }

    /// Options the matcher was compiled with
    #[must_use]
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Test a path without extracting parameters
    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path`, extending `existing` with the extracted parameters
    ///
    /// Returns `None` when the literal segments do not line up. A pattern
    /// without parameters yields `existing` unchanged. Values are
    /// percent-decoded; a value that does not decode to UTF-8 is kept as-is.
    #[must_use]
    pub fn match_path(&self, path: &str, existing: &ParamVec) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = existing.clone();
        for (i, name) in self.names.iter().enumerate() {
            let Some(value) = caps.get(i + 1) else {
                continue;
            };
            let raw = value.as_str();
            let decoded = urlencoding::decode(raw)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            params.push((Arc::clone(name), decoded));
        }
        Some(params)
    }
}

impl PartialEq for PathMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.options == other.options
    }
}
