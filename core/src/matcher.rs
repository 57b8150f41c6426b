//! `LabelMatcher` — Predicates over a single label
//!
//! A [`LabelMatcher`] reads one label out of a [`LabelSet`] and compares it
//! against an exact value or an anchored regex. [`Matchers`] is the
//! conjunction a route is gated by.
//!
//! # Available Matchers
//!
//! - [`MatchKind::Exact`] — String equality
//! - [`MatchKind::Regex`] — Fully anchored regex (RE2 semantics, linear time)

use crate::{LabelName, LabelSet, RouteError};
use std::fmt;

/// How a [`LabelMatcher`] compares the label value.
#[derive(Debug, Clone)]
pub enum MatchKind {
    /// Exact string equality.
    Exact(String),
    /// Regular expression match, anchored at both ends.
    Regex {
        /// The pattern as written in configuration (unanchored).
        pattern: String,
        /// The compiled, anchored regex.
        regex: regex::Regex,
    },
}

/// A predicate over one label of a [`LabelSet`].
///
/// # INV: absent → `""`
///
/// A label missing from the set is read as the empty string, so `team=""`
/// matches alerts without a `team` label.
///
/// # Example
///
/// ```
/// use amroute::{LabelMatcher, LabelSet};
///
/// let m = LabelMatcher::regex("severity", "crit|page").unwrap();
/// assert!(m.matches(&LabelSet::new().with("severity", "crit")));
/// assert!(!m.matches(&LabelSet::new().with("severity", "critical"))); // anchored
/// assert_eq!(m.to_string(), r#"severity=~"crit|page""#);
/// ```
#[derive(Debug, Clone)]
pub struct LabelMatcher {
    name: LabelName,
    kind: MatchKind,
}

impl LabelMatcher {
    /// Create an exact matcher.
    pub fn exact(name: impl Into<LabelName>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: MatchKind::Exact(value.into()),
        }
    }

    /// Create a regex matcher. The pattern is anchored as `^(?:pattern)$`.
    ///
    /// Uses Rust's `regex` crate which guarantees linear time matching (no `ReDoS`).
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRegex`] if the pattern does not compile.
    pub fn regex(name: impl Into<LabelName>, pattern: impl Into<String>) -> Result<Self, RouteError> {
        let name = name.into();
        let pattern = pattern.into();
        let regex = compile_anchored(&pattern).map_err(|e| RouteError::InvalidRegex {
            label: name.clone(),
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name,
            kind: MatchKind::Regex { pattern, regex },
        })
    }

    /// The label this matcher reads.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How the label value is compared.
    #[must_use]
    pub fn kind(&self) -> &MatchKind {
        &self.kind
    }

    /// Returns `true` if this is a regex matcher.
    #[must_use]
    pub fn is_regex(&self) -> bool {
        matches!(self.kind, MatchKind::Regex { .. })
    }

    /// Check the label against this predicate.
    pub fn matches(&self, labels: &LabelSet) -> bool {
        let value = labels.value_or_empty(&self.name);
        match &self.kind {
            MatchKind::Exact(expected) => value == expected,
            MatchKind::Regex { regex, .. } => regex.is_match(value),
        }
    }
}

impl fmt::Display for LabelMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            MatchKind::Exact(value) => write!(f, "{}={value:?}", self.name),
            MatchKind::Regex { pattern, .. } => write!(f, "{}=~{pattern:?}", self.name),
        }
    }
}

/// Compile `pattern` anchored at both ends.
pub(crate) fn compile_anchored(pattern: &str) -> Result<regex::Regex, regex::Error> {
    regex::Regex::new(&format!("^(?:{pattern})$"))
}

/// A conjunction of [`LabelMatcher`]s.
///
/// Evaluation short-circuits on the first failing matcher. An empty
/// conjunction always holds.
///
/// ```
/// use amroute::{LabelMatcher, LabelSet, Matchers};
///
/// assert!(Matchers::default().matches(&LabelSet::new()));
///
/// let ms: Matchers = vec![
///     LabelMatcher::exact("service", "api"),
///     LabelMatcher::exact("env", "prod"),
/// ].into();
/// assert!(ms.matches(&LabelSet::new().with("service", "api").with("env", "prod")));
/// assert!(!ms.matches(&LabelSet::new().with("service", "api")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Matchers(Vec<LabelMatcher>);

impl Matchers {
    /// Create a conjunction from matchers, keeping their order.
    #[must_use]
    pub fn new(matchers: Vec<LabelMatcher>) -> Self {
        Self(matchers)
    }

    /// Do all matchers hold for `labels`?
    pub fn matches(&self, labels: &LabelSet) -> bool {
        self.0.iter().all(|m| m.matches(labels))
    }

    /// Number of matchers in the conjunction.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for the always-true empty conjunction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate matchers in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, LabelMatcher> {
        self.0.iter()
    }
}

impl From<Vec<LabelMatcher>> for Matchers {
    fn from(matchers: Vec<LabelMatcher>) -> Self {
        Self(matchers)
    }
}

impl<'a> IntoIterator for &'a Matchers {
    type Item = &'a LabelMatcher;
    type IntoIter = std::slice::Iter<'a, LabelMatcher>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Matchers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{m}")?;
        }
        f.write_str("}")
    }
}

// Note: Send + Sync is derived automatically; regex::Regex is shareable.
