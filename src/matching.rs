//! Path normalisation and segment matching.
//!
//! Menu and catalog paths are absolute, slash-delimited keys
//! (`/system/user`). Navigation targets arrive in whatever shape the caller
//! produced (`system/user/`, `/system/user?tab=2`), so every comparison goes
//! through [`normalize_path`] first.
//!
//! # Rules
//!
//! 1. Empty paths normalise to `"/"`.
//! 2. A leading slash is ensured and trailing slashes are removed.
//! 3. Runs of slashes collapse to one.
//!
//! Patterns may contain `:param` segments, which match any single segment and
//! are captured into [`RouteParams`].

use crate::params::RouteParams;
use std::borrow::Cow;

/// Normalise a path for comparison.
///
/// Returns `Cow::Borrowed` when the input is already normalised.
///
/// ```
/// use admin_navigator::normalize_path;
///
/// assert_eq!(normalize_path("/dashboard"), "/dashboard");
/// assert_eq!(normalize_path("dashboard/"), "/dashboard");
/// assert_eq!(normalize_path("//system//user"), "/system/user");
/// assert_eq!(normalize_path(""), "/");
/// ```
#[must_use]
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if path == "/" {
        return Cow::Borrowed(path);
    }

    let already = path.starts_with('/') && !path.ends_with('/') && !path.contains("//");
    if already {
        return Cow::Borrowed(path);
    }

    let segments = split_path(path);
    if segments.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", segments.join("/")))
    }
}

/// Split a navigation target into its path and optional query string.
///
/// ```
/// use admin_navigator::matching::split_target;
///
/// assert_eq!(split_target("/users?page=2"), ("/users", Some("page=2")));
/// assert_eq!(split_target("/users"), ("/users", None));
/// ```
pub fn split_target(target: &str) -> (&str, Option<&str>) {
    let without_hash = target.split_once('#').map_or(target, |(path, _)| path);
    match without_hash.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (without_hash, None),
    }
}

/// Split a path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Return `true` if a pattern segment captures a parameter.
pub fn is_param_segment(segment: &str) -> bool {
    segment.starts_with(':')
}

/// Match a concrete path against a route pattern.
///
/// Returns the captured parameters when every segment matches, `None`
/// otherwise. Static patterns match only their exact path.
///
/// ```
/// use admin_navigator::matching::match_pattern;
///
/// let params = match_pattern("/system/user/42", "/system/user/:id").unwrap();
/// assert_eq!(params.get("id"), Some(&"42".to_string()));
/// assert!(match_pattern("/system/role", "/system/user/:id").is_none());
/// ```
pub fn match_pattern(path: &str, pattern: &str) -> Option<RouteParams> {
    let path_segments = split_path(path);
    let pattern_segments = split_path(pattern);

    if path_segments.len() != pattern_segments.len() {
        return None;
    }

    let mut params = RouteParams::new();
    for (path_seg, pattern_seg) in path_segments.iter().zip(pattern_segments.iter()) {
        if is_param_segment(pattern_seg) {
            params.insert(pattern_seg[1..].to_string(), (*path_seg).to_string());
        } else if pattern_seg != path_seg {
            return None;
        }
    }

    Some(params)
}
