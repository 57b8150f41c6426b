//! Route — Routing tree node with depth-first, continue-aware matching
//!
//! A [`Route`] gates its subtree with a [`Matchers`] conjunction. [`Routes`]
//! is the ordered forest; matching it behaves like matching a synthetic root
//! that always matches and falls back to [`DEFAULT_ROUTE_OPTIONS`].

use crate::{
    LabelMatcher, LabelSet, Matchers, RouteConfig, RouteError, RouteOptions,
    DEFAULT_ROUTE_OPTIONS,
};
use std::collections::BTreeSet;

/// A node of the routing tree.
///
/// # INV: options are fully resolved
///
/// `options` already contains everything inherited from ancestors. Matching
/// reads it directly and never consults the parent.
///
/// # INV: depth-first, left-to-right
///
/// Children are evaluated in configuration order. The first child that
/// produces a match stops evaluation of its later siblings, unless that
/// child has `continue_matching` set.
#[derive(Debug, Clone)]
pub struct Route {
    /// Resolved notification policy for alerts that stop at this route.
    pub options: RouteOptions,

    /// Conjunction an alert has to satisfy to enter this route.
    pub matchers: Matchers,

    /// If true, an alert matching this route keeps matching later siblings.
    pub continue_matching: bool,

    /// Child routes, in configuration order.
    pub routes: Routes,
}

impl Route {
    /// Build a route from its configuration and the options of the
    /// enclosing route.
    ///
    /// Starts from a copy of `parent`, recomputes `group_by` from scratch,
    /// applies every configured override, then builds the children with the
    /// resolved options as their parent.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::InvalidRegex`] if a `match_re` pattern does not
    /// compile. Configuration that passed
    /// [`RouteConfig::validate`](crate::RouteConfig::validate) never does.
    pub fn new(config: &RouteConfig, parent: &RouteOptions) -> Result<Self, RouteError> {
        let mut options = parent.clone();
        options.group_by = config.group_by.iter().cloned().collect::<BTreeSet<_>>();

        if let Some(target) = config.send_to.as_deref().filter(|t| !t.is_empty()) {
            target.clone_into(&mut options.target);
        }
        if let Some(group_wait) = config.group_wait {
            options.group_wait = group_wait;
        }
        if let Some(group_interval) = config.group_interval {
            options.group_interval = group_interval;
        }
        if let Some(repeat_interval) = config.repeat_interval {
            options.repeat_interval = repeat_interval;
        }
        if let Some(send_resolved) = config.send_resolved {
            options.send_resolved = send_resolved;
        }

        let mut matchers = Vec::with_capacity(config.match_labels.len() + config.match_re.len());
        for (name, value) in &config.match_labels {
            matchers.push(LabelMatcher::exact(name.as_str(), value.as_str()));
        }
        for (name, pattern) in &config.match_re {
            // Validation compiles every pattern, so this only fires for
            // config that bypassed it.
            let matcher = LabelMatcher::regex(name.as_str(), pattern.as_str()).inspect_err(|e| {
                tracing::error!(error = %e, "route construction on unvalidated config");
            })?;
            matchers.push(matcher);
        }

        let routes = Routes::new(&config.routes, Some(&options))?;

        Ok(Self {
            options,
            matchers: Matchers::new(matchers),
            continue_matching: config.continue_matching,
            routes,
        })
    }

    /// Match `labels` against this route and its subtree.
    ///
    /// Returns an empty list if this route's matchers do not hold. Otherwise
    /// returns the options of every matching descendant, in depth-first
    /// order, or this route's own options if no descendant matched.
    pub fn matches(&self, labels: &LabelSet) -> Vec<&RouteOptions> {
        if !self.matchers.matches(labels) {
            tracing::trace!(matchers = %self.matchers, "route pruned");
            return Vec::new();
        }

        let mut all = Vec::new();
        self.routes.collect_matches(labels, &mut all);

        if all.is_empty() {
            tracing::trace!(send_to = %self.options.target, "route matched as leaf");
            all.push(&self.options);
        }
        all
    }

    /// Returns `true` if this route has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.routes.is_empty()
    }

    /// Nesting depth of this route (1 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        1 + self.routes.depth()
    }
}

/// Ordered forest of [`Route`]s.
///
/// # Example
///
/// ```
/// use amroute::{LabelSet, RouteConfig, Routes, DEFAULT_ROUTE_OPTIONS};
///
/// let routes = Routes::new(
///     &[RouteConfig {
///         send_to: Some("team-api".into()),
///         match_labels: [("service".to_string(), "api".to_string())].into(),
///         ..RouteConfig::default()
///     }],
///     None,
/// )
/// .unwrap();
///
/// let hit = routes.matches(&LabelSet::new().with("service", "api"));
/// assert_eq!(hit[0].target, "team-api");
///
/// let miss = routes.matches(&LabelSet::new().with("service", "db"));
/// assert_eq!(miss, vec![&DEFAULT_ROUTE_OPTIONS]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Routes(Vec<Route>);

impl Routes {
    /// Build every top-level route in order, inheriting from `parent`, or
    /// from [`DEFAULT_ROUTE_OPTIONS`] when `parent` is `None`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RouteError`] hit while building any route.
    pub fn new(configs: &[RouteConfig], parent: Option<&RouteOptions>) -> Result<Self, RouteError> {
        let parent = parent.unwrap_or(&DEFAULT_ROUTE_OPTIONS);
        configs
            .iter()
            .map(|config| Route::new(config, parent))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Match `labels` against the whole forest.
    ///
    /// Behaves like a synthetic root route with no matchers, these routes as
    /// children and [`DEFAULT_ROUTE_OPTIONS`] as its own options, so the
    /// result is never empty.
    pub fn matches(&self, labels: &LabelSet) -> Vec<&RouteOptions> {
        let mut all = Vec::new();
        self.collect_matches(labels, &mut all);

        if all.is_empty() {
            tracing::trace!(%labels, "no route matched, using defaults");
            all.push(&DEFAULT_ROUTE_OPTIONS);
        }
        all
    }

    /// Append the matches of each route in order, stopping after the first
    /// route that matched without `continue_matching`.
    fn collect_matches<'a>(&'a self, labels: &LabelSet, all: &mut Vec<&'a RouteOptions>) {
        for route in &self.0 {
            let matches = route.matches(labels);
            let matched = !matches.is_empty();
            all.extend(matches);

            if matched && !route.continue_matching {
                break;
            }
        }
    }

    /// Number of routes at this level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no routes at this level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate routes in evaluation order.
    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.0.iter()
    }

    /// Maximum nesting depth below this level (0 when empty).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.iter().map(Route::depth).max().unwrap_or(0)
    }
}

impl From<Vec<Route>> for Routes {
    fn from(routes: Vec<Route>) -> Self {
        Self(routes)
    }
}

impl<'a> IntoIterator for &'a Routes {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Note: Route and Routes are Send + Sync because
// every field is, so one tree can be matched from many threads at once.
