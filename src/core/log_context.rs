//! Structured logging context for key-value fields
//!
//! This module provides:
//! - `FieldValue`: a renderable field payload
//! - `LogContext`: the unique-key field map attached to one entry
//! - `Fields`: the capability a record implements to be promoted into fields
//! - `ToFieldValue`: conversion used by the `loggable!` macro

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::UInt(u) => write!(f, "{}", u),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i64::from(i))
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        FieldValue::UInt(u)
    }
}

impl From<u32> for FieldValue {
    fn from(u: u32) -> Self {
        FieldValue::UInt(u64::from(u))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Borrowing conversion into a [`FieldValue`].
///
/// This is what `loggable!` calls on every member, so a member type must
/// implement it for the record to be loggable.
pub trait ToFieldValue {
    fn to_field_value(&self) -> FieldValue;
}

macro_rules! signed_to_field_value {
    ($($ty:ty),*) => {
        $(impl ToFieldValue for $ty {
            fn to_field_value(&self) -> FieldValue {
                FieldValue::Int(i64::from(*self))
            }
        })*
    };
}

macro_rules! unsigned_to_field_value {
    ($($ty:ty),*) => {
        $(impl ToFieldValue for $ty {
            fn to_field_value(&self) -> FieldValue {
                FieldValue::UInt(u64::from(*self))
            }
        })*
    };
}

signed_to_field_value!(i8, i16, i32, i64);
unsigned_to_field_value!(u8, u16, u32, u64);

impl ToFieldValue for isize {
    fn to_field_value(&self) -> FieldValue {
        i64::try_from(*self).map_or_else(|_| FieldValue::String(self.to_string()), FieldValue::Int)
    }
}

impl ToFieldValue for usize {
    fn to_field_value(&self) -> FieldValue {
        u64::try_from(*self).map_or_else(|_| FieldValue::String(self.to_string()), FieldValue::UInt)
    }
}

impl ToFieldValue for f32 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(f64::from(*self))
    }
}

impl ToFieldValue for f64 {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }
}

impl ToFieldValue for bool {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl ToFieldValue for char {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}

impl ToFieldValue for str {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.to_string())
    }
}

impl ToFieldValue for String {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl ToFieldValue for FieldValue {
    fn to_field_value(&self) -> FieldValue {
        self.clone()
    }
}

impl<T: ToFieldValue> ToFieldValue for Option<T> {
    fn to_field_value(&self) -> FieldValue {
        self.as_ref().map_or(FieldValue::Null, ToFieldValue::to_field_value)
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for &T {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Box<T> {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

impl<T: ToFieldValue + ?Sized> ToFieldValue for Arc<T> {
    fn to_field_value(&self) -> FieldValue {
        (**self).to_field_value()
    }
}

/// Context for structured logging with key-value fields
///
/// Keys are unique; inserting an existing key replaces its value. Iteration
/// order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogContext {
    fields: HashMap<String, FieldValue>,
}

impl LogContext {
    /// Create a new empty log context
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: HashMap::with_capacity(capacity),
        }
    }

    /// Add a field to the context
    #[must_use]
    pub fn with_field<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Add a field to the context (mutable version)
    pub fn add_field<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.insert(key.into(), value.into());
    }

    /// Get all fields
    pub fn fields(&self) -> &HashMap<String, FieldValue> {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if context has any fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for LogContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// A record whose named members can be attached to a log line as fields.
///
/// The returned context must hold exactly one key per declared member.
/// Implement it by hand, or declare the record with [`loggable!`](crate::loggable).
///
/// # Example
///
/// ```
/// use shlog::{Fields, LogContext};
///
/// struct Request {
///     path: String,
///     status: u16,
/// }
///
/// impl Fields for Request {
///     fn fields(&self) -> LogContext {
///         LogContext::new()
///             .with_field("path", self.path.as_str())
///             .with_field("status", u32::from(self.status))
///     }
/// }
///
/// let ctx = Request { path: "/health".into(), status: 200 }.fields();
/// assert_eq!(ctx.len(), 2);
/// ```
pub trait Fields {
    fn fields(&self) -> LogContext;
}

impl Fields for LogContext {
    fn fields(&self) -> LogContext {
        self.clone()
    }
}

impl<T: Fields + ?Sized> Fields for &T {
    fn fields(&self) -> LogContext {
        (**self).fields()
    }
}

impl<T: Fields + ?Sized> Fields for &mut T {
    fn fields(&self) -> LogContext {
        (**self).fields()
    }
}

impl<T: Fields + ?Sized> Fields for Box<T> {
    fn fields(&self) -> LogContext {
        (**self).fields()
    }
}

impl<T: Fields + ?Sized> Fields for Rc<T> {
    fn fields(&self) -> LogContext {
        (**self).fields()
    }
}

impl<T: Fields + ?Sized> Fields for Arc<T> {
    fn fields(&self) -> LogContext {
        (**self).fields()
    }
}
