//! Property values handed to the resolver.
//!
//! A [`Property`] is either plain data or something that still has to be
//! materialized: a callable, a lazy wrapper, a promise, a resource or an
//! arrayable object. [`Properties`] is the ordered mapping that holds them.

use std::fmt;
use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

use serde_json::{Map, Value};

use crate::error::BoxError;
use crate::request::PartialRequest;

/// Zero-argument function producing a property.
pub struct Callable(Box<dyn FnOnce() -> Result<Property, BoxError>>);

impl Callable {
    /// Wrap an infallible function.
    pub fn new<F, T>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
        T: Into<Property>,
    {
        Self(Box::new(move || Ok(f().into())))
    }

    /// Wrap a function that may fail.
    pub fn fallible<F, T, E>(f: F) -> Self
    where
        F: FnOnce() -> Result<T, E> + 'static,
        T: Into<Property>,
        E: Into<BoxError>,
    {
        Self(Box::new(move || f().map(Into::into).map_err(Into::into)))
    }

    /// Run the function.
    pub fn call(self) -> Result<Property, BoxError> {
        (self.0)()
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callable")
    }
}

/// A callable only evaluated on partial reloads.
#[derive(Debug)]
pub struct Lazy(Callable);

impl Lazy {
    pub fn new<F, T>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
        T: Into<Property>,
    {
        Self(Callable::new(f))
    }

    pub fn from_callable(callable: Callable) -> Self {
        Self(callable)
    }

    pub fn into_callable(self) -> Callable {
        self.0
    }
}

/// A value that settles later; waiting blocks the caller.
pub trait Promise {
    fn wait(self: Box<Self>) -> Result<Property, BoxError>;
}

impl<T> Promise for Receiver<T>
where
    T: Into<Property>,
{
    fn wait(self: Box<Self>) -> Result<Property, BoxError> {
        self.recv().map(Into::into).map_err(Into::into)
    }
}

impl<T> Promise for JoinHandle<T>
where
    T: Into<Property>,
{
    fn wait(self: Box<Self>) -> Result<Property, BoxError> {
        self.join()
            .map(Into::into)
            .map_err(|_| "promise thread panicked".into())
    }
}

/// An object rendered to plain data in the context of the current request.
pub trait Resource {
    fn to_response(&self, request: &PartialRequest) -> Result<Value, BoxError>;
}

/// An object that knows how to turn itself into property data.
pub trait Arrayable {
    fn to_array(&self) -> Property;
}

/// A single property value.
pub enum Property {
    Value(Value),
    Map(Properties),
    List(Vec<Property>),
    Callable(Callable),
    Lazy(Lazy),
    Promise(Box<dyn Promise>),
    Resource(Box<dyn Resource>),
    Arrayable(Box<dyn Arrayable>),
}

impl Property {
    pub fn value(value: impl Into<Value>) -> Self {
        Property::Value(value.into())
    }

    pub fn callable<F, T>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
        T: Into<Property>,
    {
        Property::Callable(Callable::new(f))
    }

    pub fn lazy<F, T>(f: F) -> Self
    where
        F: FnOnce() -> T + 'static,
        T: Into<Property>,
    {
        Property::Lazy(Lazy::new(f))
    }

    pub fn promise(promise: impl Promise + 'static) -> Self {
        Property::Promise(Box::new(promise))
    }

    pub fn resource(resource: impl Resource + 'static) -> Self {
        Property::Resource(Box::new(resource))
    }

    pub fn arrayable(arrayable: impl Arrayable + 'static) -> Self {
        Property::Arrayable(Box::new(arrayable))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, Property::Lazy(_))
    }

    /// Variant name for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Property::Value(_) => "value",
            Property::Map(_) => "map",
            Property::List(_) => "list",
            Property::Callable(_) => "callable",
            Property::Lazy(_) => "lazy property",
            Property::Promise(_) => "promise",
            Property::Resource(_) => "resource",
            Property::Arrayable(_) => "arrayable",
        }
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Property::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Property::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Property::List(l) => f.debug_tuple("List").field(l).finish(),
            other => f.write_str(other.kind()),
        }
    }
}

impl From<Value> for Property {
    fn from(value: Value) -> Self {
        Property::Value(value)
    }
}

impl From<Properties> for Property {
    fn from(map: Properties) -> Self {
        Property::Map(map)
    }
}

impl From<Vec<Property>> for Property {
    fn from(items: Vec<Property>) -> Self {
        Property::List(items)
    }
}

impl From<Callable> for Property {
    fn from(callable: Callable) -> Self {
        Property::Callable(callable)
    }
}

impl From<Lazy> for Property {
    fn from(lazy: Lazy) -> Self {
        Property::Lazy(lazy)
    }
}

impl From<Map<String, Value>> for Property {
    fn from(map: Map<String, Value>) -> Self {
        Property::Map(map.into_iter().collect())
    }
}

macro_rules! plain_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Property {
            fn from(value: $ty) -> Self {
                Property::Value(Value::from(value))
            }
        })*
    };
}

plain_from!(&str, String, bool, i32, i64, u32, u64, f64);

/// Ordered mapping from key to [`Property`].
///
/// Insertion order is kept; replacing an existing key keeps its position.
/// Lookups scan the entries linearly, so building a mapping of `n` keys is
/// O(n²).
#[derive(Debug, Default)]
pub struct Properties {
    entries: Vec<(String, Property)>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Property>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Property> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Property> {
        self.position(key).map(move |i| &mut self.entries[i].1)
    }

    /// Insert or replace, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Property>) -> Option<Property> {
        let key = key.into();
        let value = value.into();
        match self.position(&key) {
            Some(i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Property> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Property) -> bool) {
        self.entries.retain(|(k, v)| keep(k, v));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }
}

impl<K, V> FromIterator<(K, V)> for Properties
where
    K: Into<String>,
    V: Into<Property>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl IntoIterator for Properties {
    type Item = (String, Property);
    type IntoIter = std::vec::IntoIter<(String, Property)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
