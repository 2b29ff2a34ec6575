//! Path pattern compilation and filling.
//!
//! Patterns use `{name}` (or `:name`) for a parameter segment, e.g.
//! `/users/{id}/posts/:post_id`. Each pattern is compiled once into an
//! anchored regex for recognition and kept as a segment list for generation.

use crate::request::Params;
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A compiled route path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
    segments: Vec<Segment>,
    param_names: Vec<String>,
}

impl PathPattern {
    /// Compile `path` into an anchored regex and its parameter names.
    ///
    /// `/users/{id}` becomes `^/users/([^/]+)$` with parameters `["id"]`.
    #[must_use]
    pub fn new(path: &str) -> Self {
        let source = normalize_path(path);
        let mut pattern = String::with_capacity(source.len() + 5);
        pattern.push('^');
        let mut segments = Vec::new();
        let mut param_names = Vec::new();

        for segment in source.split('/').filter(|s| !s.is_empty()) {
            let param = segment
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .or_else(|| segment.strip_prefix(':'));
            match param {
                Some(name) => {
                    pattern.push_str("/([^/]+)");
                    param_names.push(name.to_string());
                    segments.push(Segment::Param(name.to_string()));
                }
                None => {
                    pattern.push('/');
                    pattern.push_str(&regex::escape(segment));
                    segments.push(Segment::Static(segment.to_string()));
                }
            }
        }
        if segments.is_empty() {
            pattern.push('/');
        }
        pattern.push('$');

        let regex = Regex::new(&pattern).expect("Failed to compile path regex");
        Self {
            source,
            regex,
            segments,
            param_names,
        }
    }

    /// The normalised pattern text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Match a request path, returning the captured parameters.
    ///
    /// A single trailing slash on `path` is ignored. Captured values are
    /// percent-decoded.
    #[must_use]
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let path = if path.len() > 1 {
            path.strip_suffix('/').unwrap_or(path)
        } else {
            path
        };
        let caps = self.regex.captures(path)?;
        Some(
            self.param_names
                .iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (name.clone(), decode_segment(m.as_str()))))
                .collect(),
        )
    }

    /// Fill the pattern's parameters from `params`.
    ///
    /// # Errors
    ///
    /// The name of the first parameter missing from `params`.
    pub fn fill(&self, params: &Params) -> Result<String, String> {
        if self.segments.is_empty() {
            return Ok("/".to_string());
        }
        let mut path = String::with_capacity(self.source.len());
        for segment in &self.segments {
            path.push('/');
            match segment {
                Segment::Static(s) => path.push_str(s),
                Segment::Param(name) => {
                    let value = params.get(name).ok_or_else(|| name.clone())?.to_string();
                    path.push_str(&encode_segment(&value));
                }
            }
        }
        Ok(path)
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    format!("/{trimmed}")
}

/// Percent-encode a path segment value.
fn encode_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Percent-decode a captured segment; undecodable input is kept as is.
fn decode_segment(raw: &str) -> String {
    urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |v| v.into_owned())
}
