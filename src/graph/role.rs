//! Capability classification for endpoints.
//!
//! Every entity that takes part in a connection is assigned exactly one
//! [`Role`] out of a closed set of four. Passive roles are inferred from the
//! entity's call shape; active roles are always declared explicitly, since
//! only the entity itself can know it intends to drive the timing of data
//! transfer. Classification is a pure function of the [`Signature`] and runs
//! only while a connection is being built — never while data flows.

use crate::graph::error::ClassifyError;
use std::any::TypeId;

/// The four endpoint roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Yields a value only when explicitly pulled (nullary call).
    PassiveSource,
    /// Accepts a pushed value and performs a side effect (unary, void call).
    PassiveSink,
    /// Pushes values into its chain on its own schedule.
    ActiveSource,
    /// Consumes values from its chain on its own schedule.
    ActiveSink,
}

impl Role {
    pub fn is_source(self) -> bool {
        matches!(self, Role::PassiveSource | Role::ActiveSource)
    }

    pub fn is_sink(self) -> bool {
        matches!(self, Role::PassiveSink | Role::ActiveSink)
    }

    pub fn is_passive(self) -> bool {
        matches!(self, Role::PassiveSource | Role::PassiveSink)
    }

    pub fn is_active(self) -> bool {
        matches!(self, Role::ActiveSource | Role::ActiveSink)
    }
}

/// Which active role an entity declares, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveKind {
    Source,
    Sink,
}

/// Value-level description of an entity's call shape.
///
/// This is the input to [`classify`]. The built-in adapters construct their
/// signatures from the closures they wrap; custom endpoints describe
/// themselves the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    /// The entity can be invoked at all.
    pub callable: bool,
    /// The call takes exactly one argument.
    pub takes_arg: bool,
    /// The call returns a value (as opposed to unit).
    pub returns_value: bool,
    /// The call surface is overloaded, so the shape above is ambiguous.
    pub overloaded: bool,
    /// A result type was declared explicitly, resolving any overload
    /// ambiguity.
    pub declared_result: bool,
    /// Explicit active declaration. Always wins over structural inference.
    pub active: Option<ActiveKind>,
}

impl Signature {
    /// Callable with no arguments, returning a value.
    pub fn nullary_value() -> Self {
        Self {
            callable: true,
            returns_value: true,
            ..Self::default()
        }
    }

    /// Callable with one argument, returning nothing.
    pub fn unary_void() -> Self {
        Self {
            callable: true,
            takes_arg: true,
            ..Self::default()
        }
    }

    pub fn active_source() -> Self {
        Self {
            active: Some(ActiveKind::Source),
            ..Self::default()
        }
    }

    pub fn active_sink() -> Self {
        Self {
            active: Some(ActiveKind::Sink),
            ..Self::default()
        }
    }

    /// Mark the call surface as overloaded.
    pub fn overloaded(mut self) -> Self {
        self.overloaded = true;
        self
    }

    /// Mark the entity as carrying an explicitly declared result type.
    pub fn with_declared_result(mut self) -> Self {
        self.declared_result = true;
        self
    }
}

/// Assign a [`Role`] to a call shape.
///
/// The rules, in order:
/// 1. An explicit active declaration always wins.
/// 2. An entity that is not callable has no role.
/// 3. An overloaded call surface is ambiguous unless a result type was
///    declared explicitly.
/// 4. Nullary-returning → passive source; unary-void → passive sink.
pub fn classify(sig: &Signature) -> Result<Role, ClassifyError> {
    if let Some(kind) = sig.active {
        return Ok(match kind {
            ActiveKind::Source => Role::ActiveSource,
            ActiveKind::Sink => Role::ActiveSink,
        });
    }
    if !sig.callable {
        return Err(ClassifyError::NotCallable);
    }
    if sig.overloaded && !sig.declared_result {
        return Err(ClassifyError::Ambiguous);
    }
    match (sig.takes_arg, sig.returns_value) {
        (false, true) => Ok(Role::PassiveSource),
        (true, false) => Ok(Role::PassiveSink),
        _ => Err(ClassifyError::NoRole),
    }
}

/// Runtime type identity for chain type checking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeTag {
    pub id: TypeId,
    pub name: &'static str,
}

impl TypeTag {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }
}

/// One side (input or output) of a link's port surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortType {
    /// No port on this side (a source has no input, a sink no output).
    None,
    /// Accepts any token type; used by the generic sink adapter.
    Any,
    /// A single concrete type.
    Of(TypeTag),
}

impl PortType {
    pub fn of<T: 'static>() -> Self {
        PortType::Of(TypeTag::of::<T>())
    }

    /// Name for diagnostics, if a concrete type is known.
    pub fn name(&self) -> &'static str {
        match self {
            PortType::None => "(none)",
            PortType::Any => "(any)",
            PortType::Of(tag) => tag.name,
        }
    }
}
