//! amroute-test: Helpers and conformance fixtures for routing trees
//!
//! Provides terse builders for label sets and result summaries, plus the
//! YAML fixture runner (feature = `"fixtures"`) used by the conformance suite.
//!
//! # Example
//!
//! ```
//! use amroute_test::prelude::*;
//!
//! let routes = RoutingConfig::from_yaml("routes: [{ send_to: api, match: { service: api } }]")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(targets(&routes, &alert(&[("service", "api")])), vec!["api"]);
//! assert_eq!(targets(&routes, &alert(&[("service", "db")])), vec![""]);
//! ```

use amroute::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Build a label set from `(name, value)` pairs.
#[must_use]
pub fn alert(pairs: &[(&str, &str)]) -> LabelSet {
    pairs.iter().copied().collect()
}

/// Targets of every matched route, in match order.
#[must_use]
pub fn targets(routes: &Routes, labels: &LabelSet) -> Vec<String> {
    routes
        .matches(labels)
        .into_iter()
        .map(|opts| opts.target.clone())
        .collect()
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{alert, targets};
    pub use amroute::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_builds_label_set() {
        let labels = alert(&[("service", "api"), ("severity", "critical")]);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("severity"), Some("critical"));
    }

    #[test]
    fn targets_of_empty_forest_is_default() {
        assert_eq!(targets(&Routes::default(), &alert(&[])), vec![String::new()]);
    }

    #[test]
    fn targets_preserve_order() {
        let routes = RoutingConfig::from_yaml(
            r#"
routes:
  - { send_to: first, continue: true }
  - { send_to: second, continue: true }
  - { send_to: third }
"#,
        )
        .unwrap()
        .build()
        .unwrap();
        assert_eq!(
            targets(&routes, &alert(&[])),
            vec!["first", "second", "third"]
        );
    }
}
