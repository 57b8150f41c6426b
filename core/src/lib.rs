//! amroute - alert routing tree evaluator
//!
//! Given an alert's label set, amroute decides which notification policies
//! govern it by walking a statically configured tree of label matchers.
//!
//! # Architecture
//!
//! - [`LabelSet`] — The alert's labels (the matching context)
//! - [`LabelMatcher`] — Exact or regex predicate over one label
//! - [`Matchers`] — Conjunction of label matchers (all must hold)
//! - [`RouteOptions`] — Fully resolved notification policy for one node
//! - [`Route`] — Tree node: matchers + options + continue flag + children
//! - [`Routes`] — Ordered forest with a synthetic always-matching root
//!
//! # Key Design Insights
//!
//! 1. **Inheritance by copy**: options are resolved once at construction time.
//!    Matching never walks back up the tree.
//!
//! 2. **Depth-first, left-to-right**: the first matching child wins unless it
//!    sets `continue`, in which case later siblings are evaluated too.
//!
//! 3. **Never empty at the top**: [`Routes::matches`] falls back to
//!    [`DEFAULT_ROUTE_OPTIONS`] when nothing in the forest matches.
//!
//! # Example
//!
//! ```
//! use amroute::prelude::*;
//!
//! let config = RoutingConfig::from_yaml(r#"
//! routes:
//!   - send_to: team-api
//!     match: { service: api }
//!     routes:
//!       - send_to: oncall
//!         match: { severity: critical }
//! "#).unwrap();
//!
//! let routes = config.build().unwrap();
//!
//! let labels = LabelSet::new().with("service", "api").with("severity", "critical");
//! let matched = routes.matches(&labels);
//! assert_eq!(matched.len(), 1);
//! assert_eq!(matched[0].target, "oncall");
//!
//! let labels = LabelSet::new().with("service", "db");
//! assert_eq!(routes.matches(&labels)[0], &DEFAULT_ROUTE_OPTIONS);
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod config;
mod labels;
mod matcher;
mod options;
mod route;
mod trace;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use config::{RouteConfig, RoutingConfig};
pub use labels::{is_valid_label_name, LabelName, LabelSet, LabelValue};
pub use matcher::{LabelMatcher, MatchKind, Matchers};
pub use options::{RouteOptions, DEFAULT_ROUTE_OPTIONS};
pub use route::{Route, Routes};
pub use trace::{MatchTrace, RouteTrace};

/// Prelude module for convenient imports.
///
/// ```
/// use amroute::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        ConfigError,
        // Labels
        LabelMatcher,
        LabelSet,
        Matchers,
        // Trace types
        MatchTrace,
        // Core types
        Route,
        // Config types
        RouteConfig,
        RouteError,
        RouteOptions,
        RouteTrace,
        Routes,
        RoutingConfig,
        DEFAULT_ROUTE_OPTIONS,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum allowed nesting depth of configured routes.
///
/// Matching recurses once per level. Enforced at config load time via
/// [`RoutingConfig::validate`].
pub const MAX_DEPTH: usize = 32;

/// Maximum length for regex patterns in `match_re`.
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from route tree construction.
///
/// Construction only fails when configuration skipped validation. Any value
/// that passed [`RoutingConfig::validate`] builds without error, so seeing
/// one of these in production points at the caller, not the alert.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// A `match_re` pattern failed to compile.
    #[error("invalid regex for label \"{label}\" (\"{pattern}\"): {reason}")]
    InvalidRegex {
        /// The label the matcher applies to.
        label: String,
        /// The pattern as written in configuration.
        pattern: String,
        /// The underlying regex error message.
        reason: String,
    },
}

/// Errors from loading and validating routing configuration.
///
/// Caught at config load time, never at match time. Fix the configuration and
/// reload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The document could not be deserialized.
    #[error("invalid config: {reason}")]
    Parse {
        /// The underlying parser message.
        reason: String,
    },
    /// A label name in `match`, `match_re` or `group_by` is not a valid label name.
    #[error("invalid label name \"{name}\" in {field} at {path}")]
    InvalidLabelName {
        /// The offending name.
        name: String,
        /// Which field contained it.
        field: &'static str,
        /// Location of the route, e.g. `routes[0].routes[2]`.
        path: String,
    },
    /// A `match_re` pattern failed to compile or is too long.
    #[error("invalid regex \"{pattern}\" for label \"{label}\" at {path}: {reason}")]
    InvalidRegex {
        /// The label the matcher applies to.
        label: String,
        /// The pattern as written.
        pattern: String,
        /// Location of the route.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
    /// The same label appears more than once in `group_by`.
    #[error("duplicate label \"{name}\" in group_by at {path}")]
    DuplicateGroupBy {
        /// The repeated label name.
        name: String,
        /// Location of the route.
        path: String,
    },
    /// `group_interval` or `repeat_interval` was configured as zero.
    #[error("{field} must be greater than zero at {path}")]
    ZeroInterval {
        /// Which interval field.
        field: &'static str,
        /// Location of the route.
        path: String,
    },
    /// Route nesting exceeds [`MAX_DEPTH`].
    #[error(
        "route nesting depth is {depth}, but maximum allowed is {max}, \
         flatten your routing tree"
    )]
    DepthExceeded {
        /// Actual depth of the configured tree.
        depth: usize,
        /// Maximum allowed depth.
        max: usize,
    },
    /// Construction failed after validation passed.
    #[error(transparent)]
    Build(#[from] RouteError),
}
