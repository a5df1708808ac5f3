//! Request description handed to the dispatcher.

use serde_json::Value;
use std::fmt;

/// HTTP verbs used against the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar query parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

impl QueryValue {
    /// Empty strings are treated as absent and never transmitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Str(s) if s.is_empty())
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<&String> for QueryValue {
    fn from(s: &String) -> Self {
        Self::Str(s.clone())
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// A single upstream call: method, path, query and optional JSON body.
///
/// Built per operation and dropped after dispatch. Path placeholders of the
/// form `{name}` are substituted literally by [`RequestSpec::path_param`].
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    query: Vec<(String, QueryValue)>,
    body: Option<Value>,
}

impl RequestSpec {
    pub fn new(method: Method, path_template: impl Into<String>) -> Self {
        Self {
            method,
            path: path_template.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path_template: impl Into<String>) -> Self {
        Self::new(Method::Get, path_template)
    }

    pub fn post(path_template: impl Into<String>) -> Self {
        Self::new(Method::Post, path_template)
    }

    pub fn delete(path_template: impl Into<String>) -> Self {
        Self::new(Method::Delete, path_template)
    }

    /// Replace every `{name}` placeholder in the path with `value`.
    #[must_use]
    pub fn path_param(mut self, name: &str, value: &str) -> Self {
        self.path = self.path.replace(&format!("{{{name}}}"), value);
        self
    }

    #[must_use]
    pub fn query(mut self, key: &str, value: impl Into<QueryValue>) -> Self {
        self.query.push((key.to_string(), value.into()));
        self
    }

    /// Add a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt<V: Into<QueryValue>>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    #[must_use]
    pub fn extend_query(mut self, pairs: impl IntoIterator<Item = (String, QueryValue)>) -> Self {
        self.query.extend(pairs);
        self
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// All query pairs as supplied, including empty ones.
    pub fn raw_query(&self) -> &[(String, QueryValue)] {
        &self.query
    }

    /// Query pairs that will actually be transmitted, in insertion order.
    #[must_use]
    pub fn cleaned_query(&self) -> Vec<(&str, String)> {
        self.query
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.to_string()))
            .collect()
    }

    /// Body to transmit. Null and empty objects are not sent.
    #[must_use]
    pub fn body_to_send(&self) -> Option<&Value> {
        match &self.body {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) if map.is_empty() => None,
            Some(body) => Some(body),
        }
    }

    /// `"<METHOD> <path>"`, used in diagnostics.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}
