//! Runtime route matcher
//!
//! Mirrors the matching code embedded in the generated `routes.ts`: a route's
//! segment list is applied to a path, and the characters left over once all
//! segments are consumed are the match `distance`. A distance of 0 is an exact
//! match; anything else is an ancestor that can still render its layout.

use crate::error::{Result, RouteError};
use crate::segments::{self, param_name};
use crate::types::{Route, ROOT_ROUTE_NAME};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    /// The navigation path as it was given.
    pub path: String,
    /// Canonical name of the matched route.
    pub route: String,
    pub params: HashMap<String, String>,
    /// 0 means a perfect match.
    pub distance: usize,
}

impl RouteMatch {
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// Applies `segments` to `path`. Returns `None` as soon as a literal segment
/// does not match or the path runs out before every segment is consumed.
pub fn match_route(path: &str, segments: &[String]) -> Option<RouteMatch> {
    let mut current = path.trim_start_matches('/');
    let mut params = HashMap::new();
    for segment in segments {
        if current.is_empty() {
            return None;
        }
        match param_name(segment) {
            Some(name) => {
                let (head, tail) = decapitate(current);
                params.insert(name.to_string(), head.to_string());
                current = tail;
            }
            None => current = strip_literal(current, segment)?,
        }
    }
    Some(RouteMatch {
        path: path.to_string(),
        route: segments::route_name(segments),
        params,
        distance: current.chars().count(),
    })
}

/// Splits off the first `/`-delimited token.
fn decapitate(text: &str) -> (&str, &str) {
    match text.split_once('/') {
        Some((head, tail)) => (head, tail),
        None => (text, ""),
    }
}

/// `literal` must be followed by the end of the path or by a `/`.
fn strip_literal<'a>(text: &'a str, literal: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(literal)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}

/// The route name to segment list dictionary, in generation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    entries: Vec<(String, Vec<String>)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_routes<'a>(routes: impl IntoIterator<Item = &'a Route>) -> Self {
        let mut table = Self::new();
        for route in routes {
            table.insert(&route.name);
        }
        table
    }

    pub fn from_names<S: AsRef<str>>(names: impl IntoIterator<Item = S>) -> Self {
        let mut table = Self::new();
        for name in names {
            table.insert(name.as_ref());
        }
        table
    }

    pub fn insert(&mut self, name: &str) {
        let name = canonical(name);
        let segments = segments::parse_route_name(&name);
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = segments,
            None => self.entries.push((name, segments)),
        }
    }

    /// Segment list of a route, looked up with or without its leading `/`.
    pub fn segments(&self, name: &str) -> Option<&[String]> {
        let name = canonical(name);
        self.entries
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, segments)| segments.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, segments)| (name.as_str(), segments.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First exact match, otherwise the closest ancestor match.
    pub fn find_route_for_path(&self, path: &str) -> Option<RouteMatch> {
        let mut best_match: Option<RouteMatch> = None;
        for (_, segments) in &self.entries {
            let Some(candidate) = match_route(path, segments) else {
                continue;
            };
            if candidate.is_exact() {
                return Some(candidate);
            }
            let closer = best_match
                .as_ref()
                .map_or(true, |best| candidate.distance < best.distance);
            if closer {
                best_match = Some(candidate);
            }
        }
        best_match
    }

    /// Path of `route` with its parameter segments replaced by `params`.
    pub fn hydrate<P: std::fmt::Display>(&self, route: &str, params: &[P]) -> Result<String> {
        let segments = self
            .segments(route)
            .ok_or_else(|| RouteError::unknown_route(route))?;
        segments::hydrate(segments, params)
    }
}

fn canonical(name: &str) -> String {
    if name.starts_with(ROOT_ROUTE_NAME) {
        name.to_string()
    } else {
        format!("{}{}", ROOT_ROUTE_NAME, name)
    }
}
