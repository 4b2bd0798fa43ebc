//! Opaque handles stored in the route table.
//!
//! A [`Handle`] is either a bare function or a method bound to a shared
//! receiver. The callable is type-erased; its [`Shape`] is recorded once at
//! registration so the serve side can ask "is this the kind of callable I
//! need?" without knowing how it got there.

use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

/// Declared type of a registered callable.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    type_id: TypeId,
    type_name: &'static str,
}

impl Shape {
    /// The shape of `T`.
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns true if this is the shape of `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Full type name, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name)
    }
}

type Erased = Arc<dyn Any + Send + Sync>;

/// A bare function handle.
#[derive(Clone)]
pub struct FunctionHandle {
    service: String,
    name: String,
    shape: Shape,
    callable: Erased,
}

impl FunctionHandle {
    /// Wrap `callable`.
    pub fn new<F: Any + Send + Sync>(service: &str, name: &str, callable: F) -> Self {
        Self {
            service: service.to_string(),
            name: name.to_string(),
            shape: Shape::of::<F>(),
            callable: Arc::new(callable),
        }
    }
}

/// A method bound to a shared receiver.
#[derive(Clone)]
pub struct MethodHandle {
    service: String,
    group: String,
    name: String,
    receiver_shape: Shape,
    shape: Shape,
    receiver: Erased,
    callable: Erased,
}

impl MethodHandle {
    /// The group (receiver) name the method was registered under.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Declared type of the receiver.
    pub fn receiver_shape(&self) -> Shape {
        self.receiver_shape
    }
}

/// A registered callable.
#[derive(Clone)]
pub enum Handle {
    /// A bare function.
    Function(FunctionHandle),
    /// A method with its receiver.
    Method(MethodHandle),
}

impl Handle {
    /// Build a function handle.
    pub fn function<F: Any + Send + Sync>(service: &str, name: &str, callable: F) -> Self {
        Handle::Function(FunctionHandle::new(service, name, callable))
    }

    /// Name of the service that registered this handle.
    pub fn service(&self) -> &str {
        match self {
            Handle::Function(h) => &h.service,
            Handle::Method(h) => &h.service,
        }
    }

    /// Name of the function or method.
    pub fn name(&self) -> &str {
        match self {
            Handle::Function(h) => &h.name,
            Handle::Method(h) => &h.name,
        }
    }

    /// Declared type of the callable.
    pub fn shape(&self) -> Shape {
        match self {
            Handle::Function(h) => h.shape,
            Handle::Method(h) => h.shape,
        }
    }

    /// Returns true for bound methods.
    pub fn is_method(&self) -> bool {
        matches!(self, Handle::Method(_))
    }

    /// The function, if this is a function handle of type `F`.
    pub fn downcast<F: Any>(&self) -> Option<&F> {
        match self {
            Handle::Function(h) => h.callable.downcast_ref::<F>(),
            Handle::Method(_) => None,
        }
    }

    /// Receiver and method, if this is a method of `R` with type `F`.
    pub fn downcast_method<R: Any, F: Any>(&self) -> Option<(&R, &F)> {
        match self {
            Handle::Method(h) => Some((
                h.receiver.downcast_ref::<R>()?,
                h.callable.downcast_ref::<F>()?,
            )),
            Handle::Function(_) => None,
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handle::Function(h) => f
                .debug_struct("Function")
                .field("service", &h.service)
                .field("name", &h.name)
                .field("shape", &h.shape)
                .finish(),
            Handle::Method(h) => f
                .debug_struct("Method")
                .field("service", &h.service)
                .field("group", &h.group)
                .field("name", &h.name)
                .field("receiver", &h.receiver_shape)
                .field("shape", &h.shape)
                .finish(),
        }
    }
}

/// A receiver and the methods to expose from it.
///
/// Rust has no runtime method enumeration, so the methods are listed
/// explicitly. The group name defaults to the receiver's type name.
///
/// # Example
///
/// ```rust
/// use trellis_std::MethodSet;
///
/// struct Player;
///
/// impl Player {
///     fn login(&self, user: &str) -> String {
///         format!("hello {user}")
///     }
/// }
///
/// let set = MethodSet::new(Player).method("Login", Player::login as fn(&Player, &str) -> String);
/// assert_eq!(set.name(), "Player");
/// assert_eq!(set.len(), 1);
/// ```
pub struct MethodSet<R> {
    name: String,
    receiver: Arc<R>,
    methods: Vec<(String, Shape, Erased)>,
}

impl<R: Any + Send + Sync> MethodSet<R> {
    /// Expose methods of `receiver`.
    pub fn new(receiver: R) -> Self {
        Self::from_arc(Arc::new(receiver))
    }

    /// Expose methods of an already shared receiver.
    pub fn from_arc(receiver: Arc<R>) -> Self {
        Self {
            name: crate::naming::short_type_name(std::any::type_name::<R>()).to_string(),
            receiver,
            methods: Vec::new(),
        }
    }

    /// Override the group name.
    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Add a method.
    pub fn method<F: Any + Send + Sync>(mut self, name: &str, callable: F) -> Self {
        let callable: Erased = Arc::new(callable);
        self.methods.push((name.to_string(), Shape::of::<F>(), callable));
        self
    }

    /// The group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if no method was added.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Split into `(method name, handle)` pairs bound to `service`/`group`.
    pub(crate) fn into_handles(self, service: &str, group: &str) -> Vec<(String, Handle)> {
        let receiver: Erased = self.receiver;
        let receiver_shape = Shape::of::<R>();
        self.methods
            .into_iter()
            .map(|(name, shape, callable)| {
                let handle = Handle::Method(MethodHandle {
                    service: service.to_string(),
                    group: group.to_string(),
                    name: name.clone(),
                    receiver_shape,
                    shape,
                    receiver: Arc::clone(&receiver),
                    callable,
                });
                (name, handle)
            })
            .collect()
    }
}
