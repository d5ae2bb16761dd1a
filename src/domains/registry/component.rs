//! Component declarations.
//!
//! A host application registers each of its controllers as a [`Component`],
//! declaring every request-mapped method with the builder DSL:
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use route_mcp_gateway::domains::registry::Component;
//!
//! struct GreetingController;
//!
//! let component = Component::rest_controller("greetingController", Arc::new(GreetingController))
//!     .get("greet", |m| {
//!         m.query::<String>("name")
//!             .response_body::<String>()
//!             .invoke(|_ctrl, args| async move {
//!                 let name = args.get("name").and_then(|v| v.as_str()).unwrap_or("world");
//!                 Ok(json!(format!("hello {}", name)))
//!             })
//!     })
//!     .build();
//!
//! assert_eq!(component.methods().len(), 1);
//! ```
//!
//! Invokers are bound to the component instance at build time, so dispatch
//! never needs runtime type introspection.

use futures::FutureExt;
use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use super::schema::{BodyFieldsFn, body_fields};
use super::type_name::simple_type_name;

/// Argument map handed to an invoked handler.
pub type ToolArguments = serde_json::Map<String, Value>;

/// Result of a handler invocation. Business errors travel as `anyhow::Error`.
pub type HandlerResult = anyhow::Result<Value>;

/// A handler bound to its component instance.
pub type BoundHandler =
    Arc<dyn Fn(ToolArguments) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

type UnboundHandler<T> =
    Arc<dyn Fn(Arc<T>, ToolArguments) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

// ============================================================================
// Declared metadata
// ============================================================================

/// HTTP verb mapping declared on a method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMapping {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    /// Verb-agnostic mapping.
    Request,
}

/// Role of a component in the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stereotype {
    /// Serves inbound requests; its mapped methods are tool candidates.
    RestController,
    /// Any other component. Never scanned.
    Service,
}

/// How a declared input is bound from the inbound request.
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// Query-string input under `key`.
    Query { key: String },
    /// Path segment input; `None` means the input's own identifier.
    Path { key: Option<String> },
    /// Request body; `fields` reads the body type's declared fields.
    Body { fields: BodyFieldsFn },
    /// Input without any binding annotation.
    Unannotated,
}

/// A declared method input.
#[derive(Debug, Clone)]
pub struct MethodParam {
    /// Identifier of the input in the method signature.
    pub ident: String,
    /// Simple name of the declared type.
    pub type_name: String,
    /// Binding kind.
    pub kind: ParamKind,
}

/// Declared return type of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnType {
    /// Simple name of the declared type.
    pub type_name: String,
    /// Whether the value is written directly as the response body.
    pub response_body: bool,
}

impl Default for ReturnType {
    fn default() -> Self {
        Self {
            type_name: "()".to_string(),
            response_body: false,
        }
    }
}

// ============================================================================
// Handler methods
// ============================================================================

/// A method declared on a registered component.
#[derive(Clone)]
pub struct HandlerMethod {
    ident: String,
    display_name: Option<String>,
    mapping: Option<RequestMapping>,
    params: Vec<MethodParam>,
    returns: ReturnType,
    invoker: Option<BoundHandler>,
}

impl HandlerMethod {
    /// Method identifier.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Explicit display name, if one was declared.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Verb mapping, `None` for plain methods.
    pub fn mapping(&self) -> Option<RequestMapping> {
        self.mapping
    }

    /// Declared inputs, in declaration order.
    pub fn params(&self) -> &[MethodParam] {
        &self.params
    }

    /// Declared return type.
    pub fn returns(&self) -> &ReturnType {
        &self.returns
    }

    /// Whether this method can be called with a single argument map.
    pub fn accepts_arguments(&self) -> bool {
        self.invoker.is_some()
    }

    /// Start an invocation with `arguments`.
    ///
    /// Returns `None` when the method has no argument-map invoker.
    pub fn invoke(&self, arguments: ToolArguments) -> Option<BoxFuture<'static, HandlerResult>> {
        self.invoker.as_ref().map(|invoker| invoker(arguments))
    }
}

impl fmt::Debug for HandlerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerMethod")
            .field("ident", &self.ident)
            .field("display_name", &self.display_name)
            .field("mapping", &self.mapping)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .field("accepts_arguments", &self.accepts_arguments())
            .finish()
    }
}

/// Builder for a single method declaration on a component of type `T`.
pub struct MethodBuilder<T> {
    ident: String,
    display_name: Option<String>,
    mapping: Option<RequestMapping>,
    params: Vec<MethodParam>,
    returns: ReturnType,
    invoker: Option<UnboundHandler<T>>,
}

impl<T: Send + Sync + 'static> MethodBuilder<T> {
    fn new(ident: impl Into<String>, mapping: Option<RequestMapping>) -> Self {
        Self {
            ident: ident.into(),
            display_name: None,
            mapping,
            params: Vec::new(),
            returns: ReturnType::default(),
            invoker: None,
        }
    }

    /// Declare an explicit display name (used as the tool name).
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = (!name.is_empty()).then_some(name);
        self
    }

    /// Declare a query-string input bound under `key`.
    pub fn query<P: ?Sized>(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.param::<P>(key.clone(), ParamKind::Query { key })
    }

    /// Declare a path input keyed by its own identifier.
    pub fn path<P: ?Sized>(self, ident: impl Into<String>) -> Self {
        self.param::<P>(ident, ParamKind::Path { key: None })
    }

    /// Declare a path input bound under an explicit `key`.
    pub fn path_as<P: ?Sized>(self, ident: impl Into<String>, key: impl Into<String>) -> Self {
        let key = key.into();
        let key = (!key.is_empty()).then_some(key);
        self.param::<P>(ident, ParamKind::Path { key })
    }

    /// Declare a request body input of type `B`.
    pub fn body<B: JsonSchema>(self, ident: impl Into<String>) -> Self {
        self.param::<B>(
            ident,
            ParamKind::Body {
                fields: body_fields::<B>,
            },
        )
    }

    /// Declare an input without a binding annotation.
    pub fn arg<P: ?Sized>(self, ident: impl Into<String>) -> Self {
        self.param::<P>(ident, ParamKind::Unannotated)
    }

    /// Declare the return type, rendered by a view rather than as a body.
    pub fn returns<R: ?Sized>(mut self) -> Self {
        self.returns = ReturnType {
            type_name: simple_type_name::<R>(),
            response_body: false,
        };
        self
    }

    /// Declare the return type, written directly as the response body.
    pub fn response_body<R: ?Sized>(mut self) -> Self {
        self.returns = ReturnType {
            type_name: simple_type_name::<R>(),
            response_body: true,
        };
        self
    }

    /// Provide the argument-map entry point for this method.
    pub fn invoke<F, Fut>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<T>, ToolArguments) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        let invoker: UnboundHandler<T> = Arc::new(move |this: Arc<T>, arguments: ToolArguments| {
            handler(this, arguments).boxed()
        });
        self.invoker = Some(invoker);
        self
    }

    fn param<P: ?Sized>(mut self, ident: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(MethodParam {
            ident: ident.into(),
            type_name: simple_type_name::<P>(),
            kind,
        });
        self
    }

    fn bind(self, instance: &Arc<T>) -> HandlerMethod {
        let invoker = self.invoker.map(|unbound| {
            let instance = Arc::clone(instance);
            Arc::new(move |arguments: ToolArguments| unbound(Arc::clone(&instance), arguments))
                as BoundHandler
        });

        HandlerMethod {
            ident: self.ident,
            display_name: self.display_name,
            mapping: self.mapping,
            params: self.params,
            returns: self.returns,
            invoker,
        }
    }
}

// ============================================================================
// Components
// ============================================================================

/// A registered component and its declared methods.
#[derive(Debug, Clone)]
pub struct Component {
    id: String,
    type_id: TypeId,
    type_name: String,
    stereotype: Stereotype,
    methods: Vec<HandlerMethod>,
}

impl Component {
    /// Start declaring a request-handler component.
    pub fn rest_controller<T: Send + Sync + 'static>(
        id: impl Into<String>,
        instance: Arc<T>,
    ) -> ComponentBuilder<T> {
        ComponentBuilder::new(id, Stereotype::RestController, instance)
    }

    /// Start declaring a component that does not serve requests.
    pub fn service<T: Send + Sync + 'static>(
        id: impl Into<String>,
        instance: Arc<T>,
    ) -> ComponentBuilder<T> {
        ComponentBuilder::new(id, Stereotype::Service, instance)
    }

    /// Component identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// `TypeId` of the component instance.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Simple name of the component type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Component stereotype.
    pub fn stereotype(&self) -> Stereotype {
        self.stereotype
    }

    /// Whether the component serves inbound requests.
    pub fn is_request_handler(&self) -> bool {
        self.stereotype == Stereotype::RestController
    }

    /// Whether the component instance is a `C`.
    pub fn is<C: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<C>()
    }

    /// All declared methods, in declaration order.
    pub fn methods(&self) -> &[HandlerMethod] {
        &self.methods
    }

    /// The method named `ident` that accepts a single argument map.
    pub fn invocable_method(&self, ident: &str) -> Option<&HandlerMethod> {
        self.methods
            .iter()
            .find(|m| m.ident == ident && m.accepts_arguments())
    }
}

/// Builder for a [`Component`] wrapping an instance of `T`.
pub struct ComponentBuilder<T> {
    id: String,
    stereotype: Stereotype,
    instance: Arc<T>,
    methods: Vec<HandlerMethod>,
}

impl<T: Send + Sync + 'static> ComponentBuilder<T> {
    fn new(id: impl Into<String>, stereotype: Stereotype, instance: Arc<T>) -> Self {
        Self {
            id: id.into(),
            stereotype,
            instance,
            methods: Vec::new(),
        }
    }

    /// Declare a GET-mapped method.
    pub fn get<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Get), declare)
    }

    /// Declare a POST-mapped method.
    pub fn post<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Post), declare)
    }

    /// Declare a PUT-mapped method.
    pub fn put<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Put), declare)
    }

    /// Declare a PATCH-mapped method.
    pub fn patch<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Patch), declare)
    }

    /// Declare a DELETE-mapped method.
    pub fn delete<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Delete), declare)
    }

    /// Declare a verb-agnostic request mapping.
    pub fn request<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, Some(RequestMapping::Request), declare)
    }

    /// Declare a plain method without any request mapping.
    pub fn method<F>(self, ident: &str, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        self.declare(ident, None, declare)
    }

    fn declare<F>(mut self, ident: &str, mapping: Option<RequestMapping>, declare: F) -> Self
    where
        F: FnOnce(MethodBuilder<T>) -> MethodBuilder<T>,
    {
        let method = declare(MethodBuilder::new(ident, mapping)).bind(&self.instance);
        self.methods.push(method);
        self
    }

    /// Finish the declaration.
    pub fn build(self) -> Component {
        Component {
            id: self.id,
            type_id: TypeId::of::<T>(),
            type_name: simple_type_name::<T>(),
            stereotype: self.stereotype,
            methods: self.methods,
        }
    }
}
