//! Evaluation trace types for debugging routing decisions.
//!
//! Trace types mirror the runtime types ([`Route`], [`Routes`]) but capture
//! evaluation results instead of configuration. Use `matches_with_trace()` to
//! see which routes were entered, which were pruned and which were never
//! reached because a sibling matched first.
//!
//! # Example
//!
//! ```
//! use amroute::prelude::*;
//!
//! let routes = RoutingConfig::from_yaml("routes: [{ send_to: api, match: { service: api } }]")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let trace = routes.matches_with_trace(&LabelSet::new().with("service", "db"));
//! assert!(trace.used_fallback);
//! assert!(!trace.steps[0].matched);
//! ```

use crate::{LabelSet, Route, RouteOptions, Routes, DEFAULT_ROUTE_OPTIONS};
use std::fmt;

/// Trace of one [`Route`] evaluation.
///
/// Unlike the trace of a predicate, evaluation keeps its short-circuit here:
/// siblings after a non-continuing match are not evaluated, and are counted in
/// `skipped` instead.
#[derive(Clone)]
pub struct RouteTrace {
    /// Whether this route's matchers held.
    pub matched: bool,
    /// The route's matchers, rendered (e.g. `{service="api"}`).
    pub matchers: String,
    /// The route's resolved target.
    pub target: String,
    /// The route's continue flag.
    pub continue_matching: bool,
    /// Trace of each evaluated child, in order. Empty when `matched` is false.
    pub children: Vec<RouteTrace>,
    /// Children not evaluated because an earlier sibling matched without `continue`.
    pub skipped: usize,
    /// Whether this route contributed its own options (no child matched).
    pub used_own_options: bool,
}

impl RouteTrace {
    /// Whether this route or any descendant produced a match.
    #[must_use]
    pub fn produced_match(&self) -> bool {
        self.used_own_options || self.children.iter().any(Self::produced_match)
    }
}

impl fmt::Debug for RouteTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTrace")
            .field("matched", &self.matched)
            .field("matchers", &self.matchers)
            .field("target", &self.target)
            .field("continue_matching", &self.continue_matching)
            .field("children", &self.children)
            .field("skipped", &self.skipped)
            .field("used_own_options", &self.used_own_options)
            .finish()
    }
}

/// Trace of a full [`Routes`] evaluation.
///
/// # INV: `result` == `matches()` result
///
/// The `result` field always equals what [`Routes::matches()`] returns for the
/// same labels (as owned values).
#[derive(Clone)]
pub struct MatchTrace {
    /// The final result (identical to what `matches()` returns).
    pub result: Vec<RouteOptions>,
    /// Trace of each top-level route that was evaluated (in order).
    pub steps: Vec<RouteTrace>,
    /// Top-level routes not evaluated because of short-circuit.
    pub skipped: usize,
    /// Whether the default options were used because nothing matched.
    pub used_fallback: bool,
}

impl fmt::Debug for MatchTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatchTrace")
            .field("result", &self.result)
            .field("steps", &self.steps)
            .field("skipped", &self.skipped)
            .field("used_fallback", &self.used_fallback)
            .finish()
    }
}

impl Route {
    /// Match with full trace for debugging.
    ///
    /// Appends the same options [`matches()`](Self::matches) would return to
    /// `result`.
    pub fn matches_with_trace(&self, labels: &LabelSet, result: &mut Vec<RouteOptions>) -> RouteTrace {
        let mut trace = RouteTrace {
            matched: self.matchers.matches(labels),
            matchers: self.matchers.to_string(),
            target: self.options.target.clone(),
            continue_matching: self.continue_matching,
            children: Vec::new(),
            skipped: 0,
            used_own_options: false,
        };
        if !trace.matched {
            return trace;
        }

        let before = result.len();
        let (children, skipped) = self.routes.trace_children(labels, result);
        trace.children = children;
        trace.skipped = skipped;

        if result.len() == before {
            trace.used_own_options = true;
            result.push(self.options.clone());
        }
        trace
    }
}

impl Routes {
    /// Match the whole forest with full trace for debugging.
    #[must_use]
    pub fn matches_with_trace(&self, labels: &LabelSet) -> MatchTrace {
        let mut result = Vec::new();
        let (steps, skipped) = self.trace_children(labels, &mut result);

        let used_fallback = result.is_empty();
        if used_fallback {
            result.push(DEFAULT_ROUTE_OPTIONS.clone());
        }

        MatchTrace {
            result,
            steps,
            skipped,
            used_fallback,
        }
    }

    fn trace_children(
        &self,
        labels: &LabelSet,
        result: &mut Vec<RouteOptions>,
    ) -> (Vec<RouteTrace>, usize) {
        let mut steps = Vec::new();
        for (i, route) in self.iter().enumerate() {
            let before = result.len();
            let step = route.matches_with_trace(labels, result);
            steps.push(step);

            if result.len() > before && !route.continue_matching {
                return (steps, self.len() - i - 1);
            }
        }
        (steps, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RoutingConfig;

    fn routes(yaml: &str) -> Routes {
        RoutingConfig::from_yaml(yaml).unwrap().build().unwrap()
    }

    const TREE: &str = r#"
routes:
  - send_to: team-api
    match: { service: api }
    continue: true
    routes:
      - send_to: oncall
        match: { severity: critical }
  - send_to: audit
  - send_to: never
"#;

    #[test]
    fn trace_result_equals_matches() {
        let routes = routes(TREE);
        for lset in [
            LabelSet::new().with("service", "api").with("severity", "critical"),
            LabelSet::new().with("service", "api"),
            LabelSet::new().with("service", "db"),
            LabelSet::new(),
        ] {
            let trace = routes.matches_with_trace(&lset);
            let expected: Vec<RouteOptions> =
                routes.matches(&lset).into_iter().cloned().collect();
            assert_eq!(trace.result, expected, "labels {lset}");
        }
    }

    #[test]
    fn trace_records_skipped_siblings() {
        let routes = routes(TREE);
        let trace =
            routes.matches_with_trace(&LabelSet::new().with("service", "api").with("severity", "critical"));

        // team-api continues, audit matches without continue, never is skipped.
        assert_eq!(trace.steps.len(), 2);
        assert_eq!(trace.skipped, 1);
        assert!(!trace.used_fallback);

        let api = &trace.steps[0];
        assert!(api.matched);
        assert!(!api.used_own_options);
        assert_eq!(api.children.len(), 1);
        assert!(api.children[0].used_own_options);
        assert_eq!(api.children[0].target, "oncall");
        assert!(api.produced_match());
    }

    #[test]
    fn trace_pruned_route_has_no_children() {
        let routes = routes(TREE);
        let trace = routes.matches_with_trace(&LabelSet::new().with("service", "db"));
        let api = &trace.steps[0];
        assert!(!api.matched);
        assert!(api.children.is_empty());
        assert!(!api.produced_match());
        assert_eq!(api.matchers, r#"{service="api"}"#);
    }

    #[test]
    fn trace_fallback_on_empty_forest() {
        let trace = Routes::default().matches_with_trace(&LabelSet::new());
        assert!(trace.used_fallback);
        assert!(trace.steps.is_empty());
        assert_eq!(trace.result, vec![RouteOptions::default()]);
    }

    #[test]
    fn trace_debug_format() {
        let routes = routes(TREE);
        let trace = routes.matches_with_trace(&LabelSet::new().with("service", "api"));
        let debug = format!("{trace:?}");
        assert!(debug.contains("team-api"));
        assert!(debug.contains("used_fallback"));
    }
}
