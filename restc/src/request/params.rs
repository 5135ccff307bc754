//! Path and query parameter rendering.
//!
//! Parameter values are held as [`serde_json::Value`] so callers can pass
//! strings, numbers, booleans or sequences without converting them first.

use serde_json::Value;
use url::form_urlencoded;

/// A named substitution for a path template.
///
/// Both `{name}` and `:name` placeholders are replaced. Sequence values
/// render as their elements joined with `,`.
///
/// ```
/// use restc::PathParam;
///
/// let params = [PathParam::new("id", 42), PathParam::new("tag", vec!["a", "b"])];
/// assert_eq!(restc::render_path("/users/{id}/posts/:tag", &params), "/users/42/posts/a,b");
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PathParam {
    name: String,
    value: Value,
}

impl PathParam {
    /// Create a path parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Placeholder name, without braces or colon.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn rendered(&self) -> String {
        match &self.value {
            Value::Array(items) => items.iter().map(scalar_string).collect::<Vec<_>>().join(","),
            other => scalar_string(other),
        }
    }
}

/// A named query parameter.
///
/// Sequence values expand into repeated `name=value` pairs. Values whose
/// string form is empty are skipped, for scalars and sequence elements alike.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryParam {
    name: String,
    value: Value,
}

impl QueryParam {
    /// Create a query parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parameter value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    fn emitted_values(&self) -> Vec<String> {
        let values = match &self.value {
            Value::Array(items) => items.iter().map(scalar_string).collect(),
            other => vec![scalar_string(other)],
        };
        values.into_iter().filter(|v| !v.is_empty()).collect()
    }
}

/// String form of a single value: strings verbatim, `null` as empty,
/// everything else as compact JSON.
fn scalar_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute every `{name}` and `:name` occurrence in `template`.
///
/// Placeholders without a matching parameter are left untouched.
pub fn render_path(template: &str, params: &[PathParam]) -> String {
    let mut path = template.to_owned();
    for param in params {
        let value = param.rendered();
        path = path
            .replace(&format!("{{{}}}", param.name), &value)
            .replace(&format!(":{}", param.name), &value);
    }
    path
}

/// Build a `?`-prefixed, form-urlencoded query string.
///
/// Returns an empty string when no pair is emitted.
///
/// ```
/// use restc::QueryParam;
/// use serde_json::json;
///
/// let params = [QueryParam::new("q", ""), QueryParam::new("ids", json!([1, "", 3]))];
/// assert_eq!(restc::render_query(&params), "?ids=1&ids=3");
/// ```
pub fn render_query(params: &[QueryParam]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut emitted = false;
    for param in params {
        for value in param.emitted_values() {
            serializer.append_pair(&param.name, &value);
            emitted = true;
        }
    }
    if emitted {
        format!("?{}", serializer.finish())
    } else {
        String::new()
    }
}
