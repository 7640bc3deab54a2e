//! Route matching logic.
//!
//! # Responsibilities
//! - Parse path patterns (`/api/status`, `/a/:id`, `/files/*`)
//! - Match request paths against a pattern, capturing parameters
//! - Match request methods (HEAD is served by GET routes)
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Empty segments are ignored, so `/a/` and `//a` both match `/a`
//! - No regex: matching is a single pass over the segments

use std::fmt;

use axum::http::Method;
use thiserror::Error;

/// Error returned when a route pattern cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern '{0}' has a parameter without a name")]
    UnnamedParam(String),

    #[error("pattern '{0}' has a wildcard that is not the last segment")]
    WildcardNotLast(String),
}

/// One segment of a path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Matches exactly this text.
    Static(String),
    /// Matches any single segment, captured under this name.
    Param(String),
    /// Matches the rest of the path (possibly empty), captured as `*`.
    Wildcard,
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a pattern such as `/a/:id` or `/*`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        }

        let parts: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(parts.len());

        for (i, part) in parts.iter().enumerate() {
            let segment = if *part == "*" {
                if i + 1 != parts.len() {
                    return Err(PatternError::WildcardNotLast(pattern.to_string()));
                }
                Segment::Wildcard
            } else if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(PatternError::UnnamedParam(pattern.to_string()));
                }
                Segment::Param(name.to_string())
            } else {
                Segment::Static(part.to_string())
            };
            segments.push(segment);
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Match `path`, returning the captured parameters on success.
    pub fn capture(&self, path: &str) -> Option<PathParams> {
        let mut params = PathParams::default();
        let mut parts = path.split('/').filter(|s| !s.is_empty());

        for segment in &self.segments {
            match segment {
                Segment::Static(expected) => {
                    if parts.next()? != expected.as_str() {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.push(name.clone(), parts.next()?.to_string());
                }
                Segment::Wildcard => {
                    let rest: Vec<&str> = parts.collect();
                    params.push("*".to_string(), rest.join("/"));
                    return Some(params);
                }
            }
        }

        if parts.next().is_some() {
            None
        } else {
            Some(params)
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Parameters captured by a matched pattern, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    fn push(&mut self, name: String, value: String) {
        self.entries.push((name, value));
    }

    /// Value captured for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Returns true if a route registered for `route` serves a `request` method.
pub fn method_matches(route: &Method, request: &Method) -> bool {
    route == request || (*route == Method::GET && *request == Method::HEAD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_pattern() {
        let pattern = PathPattern::parse("/api/status").unwrap();
        assert_eq!(pattern.capture("/api/status"), Some(PathParams::default()));
        assert_eq!(pattern.capture("/api/status/"), Some(PathParams::default()));
        assert!(pattern.capture("/api").is_none());
        assert!(pattern.capture("/api/status/extra").is_none());
        assert!(pattern.capture("/API/status").is_none()); // Case sensitive
    }

    #[test]
    fn test_root_pattern() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.capture("/").is_some());
        assert!(pattern.capture("/anything").is_none());
    }

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/a/:id").unwrap();
        let params = pattern.capture("/a/1").unwrap();
        assert_eq!(params.get("id"), Some("1"));
        assert!(pattern.capture("/a").is_none());
        assert!(pattern.capture("/a/1/2").is_none());
    }

    #[test]
    fn test_wildcard_captures_rest() {
        let pattern = PathPattern::parse("/files/*").unwrap();
        let params = pattern.capture("/files/css/site.css").unwrap();
        assert_eq!(params.get("*"), Some("css/site.css"));
        assert_eq!(pattern.capture("/files").unwrap().get("*"), Some(""));

        let everything = PathPattern::parse("/*").unwrap();
        assert!(everything.capture("/this/does/not/exist").is_some());
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("api"),
            Err(PatternError::MissingLeadingSlash("api".into()))
        );
        assert_eq!(
            PathPattern::parse("/a/:"),
            Err(PatternError::UnnamedParam("/a/:".into()))
        );
        assert_eq!(
            PathPattern::parse("/*/a"),
            Err(PatternError::WildcardNotLast("/*/a".into()))
        );
    }

    #[test]
    fn test_method_matches() {
        assert!(method_matches(&Method::GET, &Method::GET));
        assert!(method_matches(&Method::GET, &Method::HEAD));
        assert!(!method_matches(&Method::GET, &Method::POST));
        assert!(!method_matches(&Method::HEAD, &Method::GET));
    }
}
