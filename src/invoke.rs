//! Callable invocation.

use crate::error::BoxError;
use crate::property::{Callable, Property};

/// Runs callables and lazy properties on behalf of the resolver.
///
/// Implement this to supply arguments from an application container, or to
/// wrap invocation with instrumentation. Plain closures taking a [`Callable`]
/// are invokers too.
pub trait Invoker {
    fn invoke(&self, callable: Callable) -> Result<Property, BoxError>;
}

/// Calls the function with no arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectInvoker;

impl Invoker for DirectInvoker {
    fn invoke(&self, callable: Callable) -> Result<Property, BoxError> {
        callable.call()
    }
}

impl<F> Invoker for F
where
    F: Fn(Callable) -> Result<Property, BoxError>,
{
    fn invoke(&self, callable: Callable) -> Result<Property, BoxError> {
        self(callable)
    }
}
