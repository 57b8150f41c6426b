//! Config types for routing tree construction.
//!
//! These types are the serde-deserializable shape of the routing tree. They
//! are validated with [`RoutingConfig::validate()`] and turned into runtime
//! types by [`RoutingConfig::build()`].
//!
//! # Relationship to runtime types
//!
//! | Config type | Runtime type | Loader method |
//! |-------------|-------------|---------------|
//! | [`RoutingConfig`] | [`Routes`] | `RoutingConfig::build()` |
//! | [`RouteConfig`] | [`Route`](crate::Route) | `Route::new()` |
//!
//! # Format
//!
//! ```yaml
//! routes:
//!   - send_to: team-api
//!     group_by: [alertname, cluster]
//!     group_wait: 30s
//!     match: { service: api }
//!     match_re: { severity: "critical|page" }
//!     continue: true
//!     routes: []
//! ```

use crate::matcher::compile_anchored;
use crate::{
    is_valid_label_name, ConfigError, LabelName, Routes, MAX_DEPTH, MAX_REGEX_PATTERN_LENGTH,
};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Top-level routing configuration: the ordered forest of routes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutingConfig {
    /// Top-level routes, evaluated in order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

/// Configuration for one [`Route`](crate::Route).
///
/// Every override is optional. Anything not set here is inherited from the
/// enclosing route, except `group_by`, which always starts empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    /// Notification target for matched alerts. Empty means inherit.
    #[serde(default)]
    pub send_to: Option<String>,

    /// Labels to group alerts by.
    #[serde(default)]
    pub group_by: Vec<LabelName>,

    /// Group wait override, e.g. `30s`.
    #[serde(default, with = "humantime_serde")]
    pub group_wait: Option<Duration>,

    /// Group interval override, e.g. `5m`.
    #[serde(default, with = "humantime_serde")]
    pub group_interval: Option<Duration>,

    /// Repeat interval override, e.g. `4h`.
    #[serde(default, with = "humantime_serde")]
    pub repeat_interval: Option<Duration>,

    /// Resolved-notification override.
    #[serde(default)]
    pub send_resolved: Option<bool>,

    /// Exact label matchers.
    #[serde(default, rename = "match")]
    pub match_labels: BTreeMap<LabelName, String>,

    /// Regex label matchers (anchored).
    #[serde(default)]
    pub match_re: BTreeMap<LabelName, String>,

    /// Keep evaluating later siblings after this route matched.
    #[serde(default, rename = "continue")]
    pub continue_matching: bool,

    /// Child routes, evaluated in order.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

impl RoutingConfig {
    /// Parse a routing config from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document does not fit the schema.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Parse a routing config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document does not fit the schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Maximum nesting depth of the configured routes (0 when empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.routes.iter().map(RouteConfig::depth).max().unwrap_or(0)
    }

    /// Validate this config against the constraints construction relies on.
    ///
    /// Checks:
    /// - Nesting depth does not exceed [`MAX_DEPTH`]
    /// - Label names are valid in `match`, `match_re` and `group_by`
    /// - Regexes compile and are at most [`MAX_REGEX_PATTERN_LENGTH`] long
    /// - `group_by` has no duplicates
    /// - `group_interval` and `repeat_interval` are non-zero
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in depth-first order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_depth(self.depth())?;
        for (i, route) in self.routes.iter().enumerate() {
            route.validate_at(&format!("routes[{i}]"))?;
        }
        Ok(())
    }

    /// Validate and construct the routing tree with default options.
    ///
    /// # Errors
    ///
    /// Returns the validation error, if any. Construction itself cannot fail
    /// on a validated config.
    pub fn build(&self) -> Result<Routes, ConfigError> {
        self.validate()?;
        let routes = Routes::new(&self.routes, None)?;
        tracing::debug!(
            routes = routes.len(),
            depth = self.depth(),
            "built routing tree"
        );
        Ok(routes)
    }
}

impl RouteConfig {
    /// Nesting depth of this route (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.routes.iter().map(Self::depth).max().unwrap_or(0)
    }

    /// Validate this route and its descendants.
    ///
    /// # Errors
    ///
    /// See [`RoutingConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_depth(self.depth())?;
        self.validate_at("route")
    }

    fn validate_at(&self, path: &str) -> Result<(), ConfigError> {
        for name in self.match_labels.keys() {
            check_label_name(name, "match", path)?;
        }

        for (name, pattern) in &self.match_re {
            check_label_name(name, "match_re", path)?;
            let invalid = |reason: String| ConfigError::InvalidRegex {
                label: name.clone(),
                pattern: pattern.clone(),
                path: path.to_owned(),
                reason,
            };
            if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
                return Err(invalid(format!(
                    "pattern length is {}, but maximum allowed is {MAX_REGEX_PATTERN_LENGTH}",
                    pattern.len()
                )));
            }
            compile_anchored(pattern).map_err(|e| invalid(e.to_string()))?;
        }

        let mut seen = BTreeSet::new();
        for name in &self.group_by {
            check_label_name(name, "group_by", path)?;
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateGroupBy {
                    name: name.clone(),
                    path: path.to_owned(),
                });
            }
        }

        if self.group_interval == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroInterval {
                field: "group_interval",
                path: path.to_owned(),
            });
        }
        if self.repeat_interval == Some(Duration::ZERO) {
            return Err(ConfigError::ZeroInterval {
                field: "repeat_interval",
                path: path.to_owned(),
            });
        }

        for (i, child) in self.routes.iter().enumerate() {
            child.validate_at(&format!("{path}.routes[{i}]"))?;
        }
        Ok(())
    }
}

fn check_depth(depth: usize) -> Result<(), ConfigError> {
    if depth > MAX_DEPTH {
        return Err(ConfigError::DepthExceeded {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

fn check_label_name(name: &str, field: &'static str, path: &str) -> Result<(), ConfigError> {
    if is_valid_label_name(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLabelName {
            name: name.to_owned(),
            field,
            path: path.to_owned(),
        })
    }
}
