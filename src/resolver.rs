//! Property resolution - filters and materializes a component's properties.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::case::{CaseConverter, KeyCaseConverter};
use crate::dot::{except_dot, only_dot, set_value_dot};
use crate::error::ResolveError;
use crate::invoke::{DirectInvoker, Invoker};
use crate::property::{Callable, Properties, Property};
use crate::request::PartialRequest;
use crate::types::ResolverConfig;

/// Produces the properties sent to the client for one component.
pub trait PropertiesResolver {
    /// Resolve `properties` for `component`.
    ///
    /// `persisted` lists dot-paths the client always keeps; they are
    /// selected on every partial reload that filters with `only`.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` if a callable, promise or resource fails, or
    /// if a value cannot be reduced to plain data.
    fn resolve(
        &self,
        component: &str,
        properties: Properties,
        persisted: &[String],
    ) -> Result<Map<String, Value>, ResolveError>;
}

/// Resolver driven by the partial-reload headers of a request.
#[derive(Debug)]
pub struct RequestPropertiesResolver<'r, C = KeyCaseConverter, I = DirectInvoker> {
    request: &'r PartialRequest,
    config: ResolverConfig,
    case_converter: C,
    invoker: I,
}

impl<'r> RequestPropertiesResolver<'r> {
    /// Create a resolver with the default key converter and direct invocation.
    pub fn new(request: &'r PartialRequest, config: ResolverConfig) -> Self {
        Self {
            request,
            config,
            case_converter: KeyCaseConverter,
            invoker: DirectInvoker,
        }
    }
}

impl<'r, C, I> RequestPropertiesResolver<'r, C, I> {
    /// Replace the case converter.
    pub fn with_case_converter<C2>(self, case_converter: C2) -> RequestPropertiesResolver<'r, C2, I> {
        RequestPropertiesResolver {
            request: self.request,
            config: self.config,
            case_converter,
            invoker: self.invoker,
        }
    }

    /// Replace the invoker used for callables and lazy properties.
    pub fn with_invoker<I2>(self, invoker: I2) -> RequestPropertiesResolver<'r, C, I2> {
        RequestPropertiesResolver {
            request: self.request,
            config: self.config,
            case_converter: self.case_converter,
            invoker,
        }
    }
}

impl<C, I> PropertiesResolver for RequestPropertiesResolver<'_, C, I>
where
    C: CaseConverter,
    I: Invoker,
{
    fn resolve(
        &self,
        component: &str,
        properties: Properties,
        persisted: &[String],
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut properties = properties;
        let partial = self.request.partial_component() == Some(component);
        debug!(component, partial, "resolving properties");

        if !partial {
            let before = properties.len();
            properties.retain(|_, property| !property.is_lazy());
            debug!(dropped = before - properties.len(), "dropped lazy properties");
        }

        // Selection hints only apply when this component is the partial target.
        if partial {
            if let Some(only) = self.request.only_data() {
                let mut only = self.convert_partial_case(only);
                only.extend(persisted.iter().cloned());
                debug!(?only, "selecting only");
                properties = only_dot(properties, &only);
            }

            if let Some(except) = self.request.except_data() {
                let except = self.convert_partial_case(except);
                debug!(?except, "selecting except");
                properties = except_dot(properties, &except);
            }
        }

        let resolved = self.resolve_instances(properties, true, "")?;
        Ok(self.convert_output_case(resolved))
    }
}

// --- Internal implementation ---

impl<C, I> RequestPropertiesResolver<'_, C, I>
where
    C: CaseConverter,
    I: Invoker,
{
    /// Materialize every value. Dotted keys are expanded at the top level only.
    fn resolve_instances(
        &self,
        properties: Properties,
        unpack_dot_keys: bool,
        path: &str,
    ) -> Result<Map<String, Value>, ResolveError> {
        let mut result = Map::new();

        for (key, property) in properties {
            let child_path = join_path(path, &key);
            let value = self.resolve_property(property, &child_path)?;

            if unpack_dot_keys && key.contains('.') {
                set_value_dot(&mut result, &key, value);
            } else {
                result.insert(key, value);
            }
        }

        Ok(result)
    }

    /// Run a value through the capability chain in its fixed order.
    ///
    /// Each step sees the output of the previous one, so a callable may
    /// return a lazy property, a promise may settle to a resource, and so on.
    fn resolve_property(&self, property: Property, path: &str) -> Result<Value, ResolveError> {
        trace!(path, kind = property.kind(), "resolving property");

        let property = match property {
            Property::Callable(callable) => self.invoke(callable, path)?,
            other => other,
        };

        let property = match property {
            Property::Lazy(lazy) => self.invoke(lazy.into_callable(), path)?,
            other => other,
        };

        let property = match property {
            Property::Promise(promise) => {
                promise
                    .wait()
                    .map_err(|source| ResolveError::PromiseRejected {
                        path: path.to_string(),
                        source,
                    })?
            }
            other => other,
        };

        let property = match property {
            Property::Resource(resource) => {
                let data = resource
                    .to_response(self.request)
                    .map_err(|source| ResolveError::Resource {
                        path: path.to_string(),
                        source,
                    })?;
                Property::Value(data)
            }
            other => other,
        };

        let property = match property {
            Property::Arrayable(arrayable) => arrayable.to_array(),
            other => other,
        };

        match property {
            Property::Value(value) => Ok(value),
            Property::Map(map) => Ok(Value::Object(self.resolve_instances(map, false, path)?)),
            Property::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.resolve_property(item, &join_path(path, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Err(ResolveError::Unresolved {
                path: path.to_string(),
                kind: other.kind(),
            }),
        }
    }

    fn invoke(&self, callable: Callable, path: &str) -> Result<Property, ResolveError> {
        self.invoker
            .invoke(callable)
            .map_err(|source| ResolveError::Invocation {
                path: path.to_string(),
                source,
            })
    }

    fn convert_partial_case(&self, paths: Vec<String>) -> Vec<String> {
        let case = self.config.force_case.input;
        paths.iter().map(|path| case.apply_path(path)).collect()
    }

    fn convert_output_case(&self, map: Map<String, Value>) -> Map<String, Value> {
        self.case_converter
            .convert(map, self.config.force_case.output)
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::types::Case;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn resolve_with(
        request: &PartialRequest,
        config: ResolverConfig,
        properties: Properties,
    ) -> Value {
        let resolver = RequestPropertiesResolver::new(request, config);
        Value::Object(resolver.resolve("Users/Show", properties, &[]).unwrap())
    }

    #[test]
    fn full_load_drops_top_level_lazy() {
        let properties = Properties::new()
            .with("name", "Ann")
            .with("stats", Property::lazy(|| 42));
        let result = resolve_with(&PartialRequest::new(), ResolverConfig::new(), properties);
        assert_eq!(result, json!({ "name": "Ann" }));
    }

    #[test]
    fn lazy_not_invoked_on_full_load() {
        let invoked = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&invoked);
        let properties = Properties::new().with(
            "stats",
            Property::lazy(move || {
                *flag.borrow_mut() = true;
                1
            }),
        );
        resolve_with(&PartialRequest::new(), ResolverConfig::new(), properties);
        assert!(!*invoked.borrow());
    }

    #[test]
    fn other_component_is_not_partial() {
        let request = PartialRequest::new()
            .with_partial_component("Teams/Index")
            .with_only(&["name"]);
        let properties = Properties::new()
            .with("name", "Ann")
            .with("email", "a@x.com")
            .with("stats", Property::lazy(|| 42));
        let result = resolve_with(&request, ResolverConfig::new(), properties);
        assert_eq!(result, json!({ "name": "Ann", "email": "a@x.com" }));
    }

    #[test]
    fn partial_without_hints_evaluates_lazy() {
        let request = PartialRequest::new().with_partial_component("Users/Show");
        let properties = Properties::new()
            .with("name", "Ann")
            .with("stats", Property::lazy(|| 42));
        let result = resolve_with(&request, ResolverConfig::new(), properties);
        assert_eq!(result, json!({ "name": "Ann", "stats": 42 }));
    }

    #[test]
    fn callable_chain_order() {
        let properties = Properties::new().with(
            "deep",
            Property::callable(|| Property::lazy(|| Properties::new().with("x", Property::callable(|| 1)))),
        );
        let result = resolve_with(&PartialRequest::new(), ResolverConfig::new(), properties);
        assert_eq!(result, json!({ "deep": { "x": 1 } }));
    }

    #[test]
    fn callable_returning_callable_is_unresolved() {
        let properties =
            Properties::new().with("bad", Property::callable(|| Property::callable(|| 1)));
        let request = PartialRequest::new();
        let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new());
        let err = resolver.resolve("Users/Show", properties, &[]).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::Unresolved { ref path, kind: "callable" } if path == "bad"
        ));
    }

    #[test]
    fn nested_error_path_is_dotted() {
        let properties = Properties::new().with(
            "user",
            Properties::new().with(
                "posts",
                vec![Property::value(1), Property::Callable(Callable::fallible(|| Err::<i64, _>("db down")))],
            ),
        );
        let request = PartialRequest::new();
        let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new());
        let err = resolver.resolve("Users/Show", properties, &[]).unwrap_err();
        assert_eq!(err.path(), "user.posts.1");
    }

    #[test]
    fn dotted_keys_expand_only_at_top_level() {
        let properties = Properties::new()
            .with("user.name", "Ann")
            .with("meta", Properties::new().with("a.b", 1));
        let result = resolve_with(&PartialRequest::new(), ResolverConfig::new(), properties);
        assert_eq!(
            result,
            json!({ "user": { "name": "Ann" }, "meta": { "a.b": 1 } })
        );
    }

    #[test]
    fn input_case_applies_to_selection() {
        let request = PartialRequest::new()
            .with_partial_component("Users/Show")
            .with_only(&["userProfile.avatarUrl"]);
        let properties = Properties::new().with(
            "user_profile",
            json!({ "avatar_url": "a.png", "bio": "hi" }),
        );
        let config = ResolverConfig::new().input_case(Case::Snake);
        let result = resolve_with(&request, config, properties);
        assert_eq!(result, json!({ "user_profile": { "avatar_url": "a.png" } }));
    }

    #[test]
    fn custom_invoker_is_used_for_lazy() {
        let request = PartialRequest::new().with_partial_component("Users/Show");
        let properties = Properties::new().with("stats", Property::lazy(|| 1));
        let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new())
            .with_invoker(|_: Callable| -> Result<Property, BoxError> {
                Ok(Property::value("intercepted"))
            });
        let result = resolver.resolve("Users/Show", properties, &[]).unwrap();
        assert_eq!(Value::Object(result), json!({ "stats": "intercepted" }));
    }

    #[test]
    fn custom_case_converter_is_used() {
        struct Upper;
        impl CaseConverter for Upper {
            fn convert(&self, map: Map<String, Value>, _case: Case) -> Map<String, Value> {
                map.into_iter().map(|(k, v)| (k.to_uppercase(), v)).collect()
            }
        }

        let request = PartialRequest::new();
        let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new())
            .with_case_converter(Upper);
        let result = resolver
            .resolve("Users/Show", Properties::new().with("name", "Ann"), &[])
            .unwrap();
        assert_eq!(Value::Object(result), json!({ "NAME": "Ann" }));
    }
}
