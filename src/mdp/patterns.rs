//! Ordered line-pattern table.
//!
//! | Kind                 | Line                                                   |
//! |----------------------|--------------------------------------------------------|
//! | `note`               | `#... <note>`                                          |
//! | `log`                | `***L:<severity> <record>`                             |
//! | `terminate`          | `***TERMINATE`                                         |
//! | `query_string`       | `***Q:STRING <name>`                                   |
//! | `query_multi_string` | `***Q:MULTI-STRING <name> <boundary> <abort_boundary>` |
//! | `query_value`        | `***Q:VALUE <name>`                                    |
//! | `confirm`            | `***CONFIRM <what> <description>`                      |
//! | `display_value`      | `***D:VALUE <name>=<type>:<value>`                     |
//! | `display_multi_string` | `***D:MULTI-STRING <name> <boundary>`                |
//!
//! Entries are tried in order and the first match wins.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::mdp::event::EventKind;

/// One row of the table.
#[derive(Debug)]
pub struct EventPattern {
    /// Kind produced when `regex` matches.
    pub kind: EventKind,
    /// Anchored line pattern with named groups for the kind's attributes.
    pub regex: Regex,
}

const TABLE: &[(EventKind, &str)] = &[
    (EventKind::Note, r"^#+ *(?P<note>.*)$"),
    (EventKind::Log, r"^[*]{3}L:(?P<severity>[^ ]+) (?P<record>.*)$"),
    (EventKind::Terminate, r"^[*]{3}TERMINATE$"),
    (EventKind::QueryString, r"^[*]{3}Q:STRING (?P<name>.*)$"),
    (
        EventKind::QueryMultiString,
        r"^[*]{3}Q:MULTI-STRING (?P<name>[^ ]+) (?P<boundary>[^ ]+) (?P<abort_boundary>.+)$",
    ),
    (EventKind::QueryValue, r"^[*]{3}Q:VALUE (?P<name>.*)$"),
    (
        EventKind::Confirm,
        r"^[*]{3}CONFIRM (?P<what>[^ ]+) (?P<description>.*)$",
    ),
    (
        EventKind::DisplayValue,
        r"^[*]{3}D:VALUE (?P<name>[^=]+)=(?P<type>[^:]+):(?P<value>.*)$",
    ),
    (
        EventKind::DisplayMultiString,
        r"^[*]{3}D:MULTI-STRING (?P<name>[^ ]+) (?P<boundary>.*)$",
    ),
];

#[allow(clippy::expect_used)]
static PATTERNS: LazyLock<Vec<EventPattern>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|&(kind, pattern)| EventPattern {
            kind,
            regex: Regex::new(pattern).expect("event pattern must compile"),
        })
        .collect()
});

/// The compiled table, built on first use and immutable afterwards.
#[must_use]
pub fn patterns() -> &'static [EventPattern] {
    &PATTERNS
}

/// Find the first table entry matching `line`.
#[must_use]
pub fn match_line(line: &str) -> Option<(EventKind, Captures<'_>)> {
    patterns()
        .iter()
        .find_map(|p| p.regex.captures(line).map(|caps| (p.kind, caps)))
}
