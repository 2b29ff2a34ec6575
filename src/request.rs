//! # Request Module
//!
//! The minimal request shape the subdomain layer needs from a host framework:
//! method, path, a settable host, and a string-keyed parameter bag that
//! recognition writes the derived subdomain (and model ids) into.

use crate::config::SubdomainConfig;
use crate::error::Result;
use crate::host::HostParts;
use http::Method;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// A single parameter value: one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    One(String),
    Many(Vec<String>),
}

impl ParamValue {
    /// The value if it is a single string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::One(s) => Some(s),
            ParamValue::Many(_) => None,
        }
    }

    /// The value as a list; a single string is a one-element list.
    #[must_use]
    pub fn to_list(&self) -> Vec<String> {
        match self {
            ParamValue::One(s) => vec![s.clone()],
            ParamValue::Many(list) => list.clone(),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::One(s) => f.write_str(s),
            ParamValue::Many(list) => f.write_str(&list.join(",")),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::One(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::One(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        ParamValue::One(s.clone())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(list: Vec<String>) -> Self {
        ParamValue::Many(list)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(list: Vec<&str>) -> Self {
        ParamValue::Many(list.into_iter().map(str::to_string).collect())
    }
}

macro_rules! param_value_from_display {
    ($($t:ty),*) => {
        $(impl From<$t> for ParamValue {
            fn from(v: $t) -> Self {
                ParamValue::One(v.to_string())
            }
        })*
    };
}

param_value_from_display!(i32, i64, u32, u64, usize);

/// String-keyed parameter bag, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.0.insert(key.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// The value under `key` if it is a single string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(ParamValue::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn extend(&mut self, other: Params) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// An inbound request as seen by the subdomain layer.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    host: Option<String>,
    params: Params,
}

impl Request {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            host: None,
            params: Params::new(),
        }
    }

    /// A `GET` request for `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.set_host(host);
        self
    }

    pub fn set_host(&mut self, host: impl Into<String>) {
        self.host = Some(host.into());
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without any query string.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.path.split_once('?') {
            Some((path, _)) => path,
            None => &self.path,
        }
    }

    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Parameters injected by recognition.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub(crate) fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// The request's subdomain token, `None` when the host has no subdomain.
    ///
    /// # Errors
    ///
    /// [`crate::RoutingError::HostMissing`] if the request has no host.
    pub fn subdomain(&self, config: &SubdomainConfig) -> Result<Option<String>> {
        let host = self.host().unwrap_or_default();
        HostParts::parse(host, config.domain_length).map(|parts| parts.subdomain)
    }
}
