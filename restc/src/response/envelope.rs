//! Typed field access on untyped JSON documents.

use serde_json::Value;

/// Accessors used to pick envelope fields out of a parsed document.
///
/// None of them panic on a type mismatch: a missing field and a field of the
/// wrong type both read as `None`.
pub trait EnvelopeExt {
    /// The field as a string.
    fn field_str(&self, name: &str) -> Option<&str>;

    /// The field as an integer. Floats with a fractional part do not count.
    fn field_i64(&self, name: &str) -> Option<i64>;

    /// Remove the field from an object and return it.
    fn take_field(&mut self, name: &str) -> Option<Value>;
}

impl EnvelopeExt for Value {
    fn field_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    fn field_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    fn take_field(&mut self, name: &str) -> Option<Value> {
        self.as_object_mut().and_then(|object| object.remove(name))
    }
}
