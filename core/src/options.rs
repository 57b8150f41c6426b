//! `RouteOptions` — The resolved notification policy of a route

use crate::LabelName;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Options used when no route overrides them, and the fallback result of
/// [`Routes::matches`](crate::Routes::matches) when nothing in the forest matches.
///
/// Empty target, resolved notifications on, 20s group wait, 5m group
/// interval, 1h repeat interval, no grouping labels.
pub static DEFAULT_ROUTE_OPTIONS: RouteOptions = RouteOptions {
    target: String::new(),
    send_resolved: true,
    group_by: BTreeSet::new(),
    group_wait: Duration::from_secs(20),
    group_interval: Duration::from_secs(5 * 60),
    repeat_interval: Duration::from_secs(60 * 60),
};

/// Inheritable notification policy attached to a [`Route`](crate::Route).
///
/// Every value is fully resolved at construction: a route's options already
/// contain whatever it inherited from its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteOptions {
    /// Identifier of the notification configuration matched alerts go to.
    pub target: String,
    /// Whether resolved alerts are notified too.
    pub send_resolved: bool,

    /// Labels to group alerts by. Never inherited: each route computes its own.
    pub group_by: BTreeSet<LabelName>,

    /// How long to wait to group matching alerts before the first notification.
    pub group_wait: Duration,
    /// How long to wait before notifying about new alerts in an existing group.
    pub group_interval: Duration,
    /// How long to wait before repeating a notification that has not changed.
    pub repeat_interval: Duration,
}

impl Default for RouteOptions {
    fn default() -> Self {
        DEFAULT_ROUTE_OPTIONS.clone()
    }
}

impl fmt::Display for RouteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<RouteOptions target:{:?} group_by:{:?} timers:\"{}\"|\"{}\">",
            self.target,
            self.group_by,
            humantime::format_duration(self.group_wait),
            humantime::format_duration(self.group_interval),
        )
    }
}
