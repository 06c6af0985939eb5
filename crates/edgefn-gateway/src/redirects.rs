//! Edge redirect evaluation
//!
//! Redirect rules are declarative data from the site manifest, evaluated
//! before any function code runs. Evaluation walks the rules in manifest
//! order and applies the first rule whose method set and source pattern
//! both match; rules whose method gate rejects the request are skipped,
//! not terminal. Evaluation is a single pass: a rewritten path is not fed
//! back through the table.
//!
//! Query strings are never consumed by matching. A rewrite leaves the
//! query on the request untouched; a 3xx redirect appends it to the
//! `Location` value.

use crate::manifest::RedirectRule;

/// Result of evaluating the redirect table against a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// Internal rewrite: route the request as if it had this path
    Rewrite { path: String },

    /// External redirect: answer immediately with `Location` and this status
    Redirect { status: u16, location: String },
}

/// An ordered, immutable redirect table
#[derive(Debug, Clone, Default)]
pub struct RedirectTable {
    rules: Vec<RedirectRule>,
}

impl RedirectTable {
    /// Build a table from manifest rules, preserving manifest order
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self { rules }
    }

    /// Number of rules in the table
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate the table against a request line.
    ///
    /// Returns None when no rule applies; the request then falls through
    /// to function resolution and the static layer unchanged.
    pub fn evaluate(&self, method: &str, path: &str, query: Option<&str>) -> Option<RedirectOutcome> {
        for rule in &self.rules {
            if !method_allowed(&rule.methods, method) {
                continue;
            }
            let Some(splat) = match_source(&rule.source, path) else {
                continue;
            };

            let target = substitute_splat(&rule.target, splat.as_deref());
            if rule.status == 200 {
                return Some(RedirectOutcome::Rewrite { path: target });
            }
            return Some(RedirectOutcome::Redirect {
                status: rule.status,
                location: append_query(target, query),
            });
        }

        None
    }
}

/// Check whether a rule's method set admits the request method.
/// `"*"` admits everything; comparison is case-insensitive.
fn method_allowed(methods: &[String], method: &str) -> bool {
    methods
        .iter()
        .any(|m| m == "*" || m.eq_ignore_ascii_case(method))
}

/// Match a source pattern against a request path.
///
/// Exact sources match only that path. A trailing `/*` source matches the
/// bare prefix, the prefix with a trailing slash, and any deeper path; the
/// captured remainder (possibly empty) is returned as the splat. Returns
/// None for no match, Some(None) for an exact match, Some(Some(splat)) for
/// a wildcard match.
fn match_source(source: &str, path: &str) -> Option<Option<String>> {
    if let Some(prefix) = source.strip_suffix("/*") {
        if path == prefix {
            return Some(Some(String::new()));
        }
        // Prefix boundary is a path segment: /apix does not match /api/*
        let rest = path.strip_prefix(prefix)?;
        let rest = rest.strip_prefix('/')?;
        return Some(Some(rest.to_string()));
    }

    if path == source {
        Some(None)
    } else {
        None
    }
}

/// Replace `:splat` in the target with the wildcard capture
fn substitute_splat(target: &str, splat: Option<&str>) -> String {
    match splat {
        Some(splat) => target.replace(":splat", splat),
        None => target.to_string(),
    }
}

/// Append the original query string to a redirect location
fn append_query(location: String, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => {
            let separator = if location.contains('?') { '&' } else { '?' };
            format!("{}{}{}", location, separator, q)
        }
        _ => location,
    }
}
