//! Route name segmentation
//!
//! A canonical route name such as `/shop/[category]/items/[id]/reviews` is
//! split into literal groups and parameter placeholders:
//! `["shop", "[category]", "items", "[id]", "reviews"]`. Consecutive literal
//! folders are kept together, so `/a/b/[x]/c/d` gives `["a/b", "[x]", "c/d"]`.

use crate::error::{Result, RouteError};
use crate::types::{PARAM_MARKER, ROOT_ROUTE_NAME};
use std::fmt::Display;

pub fn parse_route_name(name: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut buffer: Vec<&str> = Vec::new();
    for item in name.split('/').filter(|item| !item.is_empty()) {
        if is_param_segment(item) {
            if !buffer.is_empty() {
                segments.push(buffer.join("/"));
                buffer.clear();
            }
            segments.push(item.to_string());
        } else {
            buffer.push(item);
        }
    }
    if !buffer.is_empty() {
        segments.push(buffer.join("/"));
    }
    segments
}

pub fn is_param_segment(segment: &str) -> bool {
    segment.contains(PARAM_MARKER)
}

/// `id` for `[id]`. Returns `None` for literal segments.
pub fn param_name(segment: &str) -> Option<&str> {
    let start = segment.find(PARAM_MARKER)? + 1;
    let end = match segment.rfind(']') {
        Some(end) if end >= start => end,
        _ => segment.len(),
    };
    Some(&segment[start..end])
}

pub fn param_count(segments: &[String]) -> usize {
    segments.iter().filter(|s| is_param_segment(s)).count()
}

/// Canonical route name for a segment list.
pub fn route_name(segments: &[String]) -> String {
    format!("{}{}", ROOT_ROUTE_NAME, segments.join("/"))
}

/// Replaces parameter segments by `params`, in order of appearance.
///
/// `hydrate(["article", "[id]", "detail"], [27])` gives `/article/27/detail`.
pub fn hydrate<P: Display>(segments: &[String], params: &[P]) -> Result<String> {
    let expected = param_count(segments);
    if params.len() < expected {
        return Err(RouteError::MissingParameter {
            route: route_name(segments),
            expected,
            given: params.len(),
        });
    }

    let mut params = params.iter();
    let items: Vec<String> = segments
        .iter()
        .map(|segment| match param_name(segment) {
            Some(_) => params.next().map(|p| p.to_string()).unwrap_or_default(),
            None => segment.clone(),
        })
        .collect();
    Ok(format!("{}{}", ROOT_ROUTE_NAME, items.join("/")))
}
