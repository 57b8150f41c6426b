//! `LabelSet` — The alert attributes that routes match against
//!
//! A label set is the whole matching context: every [`LabelMatcher`](crate::LabelMatcher)
//! reads one label out of it. Labels are kept sorted by name so iteration and
//! rendering are deterministic.

use std::collections::BTreeMap;
use std::fmt;

/// Name of a label, e.g. `"severity"`.
pub type LabelName = String;

/// Value of a label, e.g. `"critical"`.
pub type LabelValue = String;

/// The key/value attributes describing one alert instance.
///
/// # Example
///
/// ```
/// use amroute::LabelSet;
///
/// let labels = LabelSet::new()
///     .with("service", "api")
///     .with("severity", "critical");
///
/// assert_eq!(labels.get("service"), Some("api"));
/// assert_eq!(labels.get("team"), None);
/// assert_eq!(labels.to_string(), r#"{service="api", severity="critical"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LabelSet {
    labels: BTreeMap<LabelName, LabelValue>,
}

impl LabelSet {
    /// Create an empty label set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label (builder pattern). Replaces an existing value.
    #[must_use]
    pub fn with(mut self, name: impl Into<LabelName>, value: impl Into<LabelValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a label, returning the previous value if any.
    pub fn insert(
        &mut self,
        name: impl Into<LabelName>,
        value: impl Into<LabelValue>,
    ) -> Option<LabelValue> {
        self.labels.insert(name.into(), value.into())
    }

    /// Get a label value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }

    /// Get a label value by name, reading an absent label as `""`.
    ///
    /// This is the view matchers use: an alert without a `team` label matches
    /// `team=""` and `team=~".*"`.
    #[must_use]
    pub fn value_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Number of labels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if there are no labels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate labels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.labels.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<LabelName>, V: Into<LabelValue>> FromIterator<(K, V)> for LabelSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            labels: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl fmt::Display for LabelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value:?}")?;
        }
        f.write_str("}")
    }
}

/// Returns `true` if `name` is a valid label name: `[a-zA-Z_][a-zA-Z0-9_]*`.
///
/// ```
/// use amroute::is_valid_label_name;
///
/// assert!(is_valid_label_name("severity"));
/// assert!(is_valid_label_name("_internal2"));
/// assert!(!is_valid_label_name("2fast"));
/// assert!(!is_valid_label_name("team-name"));
/// assert!(!is_valid_label_name(""));
/// ```
#[must_use]
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
