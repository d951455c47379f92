//! Partial-reload property resolution
//!
//! Decides which properties of a server-driven UI component are sent to the
//! client on a request, then materializes them into plain JSON.
//!
//! A full load drops lazy properties. A partial reload targeting the
//! component (`X-Monolikit-Partial-Component`) may narrow the payload with
//! `X-Monolikit-Only-Data` or `X-Monolikit-Except-Data`, each a JSON list of
//! dot-paths.
//!
//! # Example
//!
//! ```
//! use partial_props::{PartialRequest, Properties, PropertiesResolver, Property,
//!     RequestPropertiesResolver, ResolverConfig};
//! use serde_json::{json, Value};
//!
//! let properties = || {
//!     Properties::new()
//!         .with("user", Properties::new().with("name", "Ann").with("email", "a@x.com"))
//!         .with("stats", Property::lazy(|| 42))
//! };
//!
//! // Full load: the lazy `stats` property is left out.
//! let request = PartialRequest::new();
//! let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new());
//! let resolved = resolver.resolve("Users/Show", properties(), &[]).unwrap();
//! assert_eq!(Value::Object(resolved), json!({ "user": { "name": "Ann", "email": "a@x.com" } }));
//!
//! // Partial reload asking for the user's name only.
//! let request = PartialRequest::new()
//!     .with_partial_component("Users/Show")
//!     .with_only(&["user.name"]);
//! let resolver = RequestPropertiesResolver::new(&request, ResolverConfig::new());
//! let resolved = resolver.resolve("Users/Show", properties(), &[]).unwrap();
//! assert_eq!(Value::Object(resolved), json!({ "user": { "name": "Ann" } }));
//! ```
//!
//! # Resolution Order
//!
//! Every value goes through the same chain; each step sees the previous
//! step's output:
//!
//! | Step | Effect |
//! |------|--------|
//! | callable | invoked through the [`Invoker`] |
//! | lazy | invoked through the [`Invoker`] |
//! | promise | waited on |
//! | resource | rendered against the request |
//! | arrayable | converted to property data |
//! | map / list | resolved recursively |

mod case;
mod dot;
mod error;
mod invoke;
mod loader;
mod property;
mod request;
mod resolver;
mod types;

pub use case::{convert_value, to_camel, to_snake, CaseConverter, KeyCaseConverter};
pub use dot::{except_dot, only_dot, set_value_dot};
pub use error::{BoxError, LoadError, ResolveError};
pub use invoke::{DirectInvoker, Invoker};
pub use loader::{
    is_url, load_config, load_json, load_json_auto, load_json_str, load_properties,
    properties_from_value, LAZY_MARKER,
};
pub use property::{Arrayable, Callable, Lazy, Promise, Properties, Property, Resource};
pub use request::{parse_paths, PartialRequest};
pub use resolver::{PropertiesResolver, RequestPropertiesResolver};
pub use types::{
    Case, ForceCase, ResolverConfig, EXCEPT_DATA_HEADER, ONLY_DATA_HEADER,
    PARTIAL_COMPONENT_HEADER,
};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
