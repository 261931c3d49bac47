//! Capability interface over the host compiler's declarations.
//!
//! Everything the processor needs to know about the program being compiled is
//! expressed through the [`SymbolModel`] trait and the plain data types in this
//! module.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque identifier of a declaration known to the symbol model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(String);

impl DeclId {
    /// Create an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl From<&str> for DeclId {
    fn from(id: &str) -> Self { Self::new(id) }
}

/// The scope a declaration is directly nested in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnclosingScope {
    /// A top-level namespace. The empty string denotes the unnamed namespace.
    Namespace(String),
    /// Another declaration (the declaration is a nested type).
    Declaration(DeclId),
}

/// A reference to a declared type, as written in a marker argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(DeclId);

impl TypeRef {
    /// Reference the declaration identified by `target`.
    pub fn new(target: impl Into<DeclId>) -> Self { Self(target.into()) }

    /// Identifier of the referenced declaration.
    pub fn target(&self) -> &DeclId { &self.0 }
}

/// The sole argument of the registration marker.
///
/// Hosts allow either a single type reference or a list of them; lists may in
/// turn contain lists when the host's constant folding leaves them nested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarkerArgument {
    /// `@Marker(Foo)`
    Type(TypeRef),
    /// `@Marker({Foo, Bar})`
    Array(Vec<MarkerArgument>),
}

impl MarkerArgument {
    /// Flatten the argument into the ordered list of distinct type references it names.
    pub fn provider_refs(&self) -> Vec<&TypeRef> {
        let mut refs = Vec::new();
        self.collect_refs(&mut refs);
        refs
    }

    fn collect_refs<'a>(&'a self, out: &mut Vec<&'a TypeRef>) {
        match self {
            MarkerArgument::Type(type_ref) =>
                if !out.contains(&type_ref) {
                    out.push(type_ref);
                },
            MarkerArgument::Array(values) =>
                for value in values {
                    value.collect_refs(out);
                },
        }
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeclKind {
    /// A concrete or abstract class.
    #[default]
    Class,
    /// An interface.
    Interface,
    /// An enumeration.
    Enum,
    /// A record type.
    Record,
    /// An annotation type.
    Annotation,
}

/// A type declaration as seen by the symbol model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Unique identifier within the model
    pub id: DeclId,
    /// Simple (unqualified) name
    pub simple_name: String,
    /// Kind of declaration
    #[serde(default)]
    pub kind: DeclKind,
    /// Directly enclosing scope
    pub enclosing: EnclosingScope,
    /// Direct supertypes (superclass and implemented interfaces)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub supertypes: Vec<DeclId>,
    /// Argument of the registration marker, if the declaration carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerArgument>,
}

/// One processing pass of the host compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Round {
    /// Zero-based index of the pass
    pub index: usize,
    /// Set on the final pass, after which no further declarations appear
    pub processing_over: bool,
}

impl Round {
    /// A regular pass that may contain marked declarations.
    pub fn new(index: usize) -> Self { Self { index, processing_over: false } }

    /// The final pass signalling that no further passes will occur.
    pub fn last(index: usize) -> Self { Self { index, processing_over: true } }
}

/// Errors raised by symbol model lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// No declaration with the given identifier exists.
    #[error("unknown declaration `{0}`")]
    UnknownDeclaration(DeclId),
    /// A type reference does not resolve to a declaration.
    #[error("type reference `{0}` cannot be converted to a declaration")]
    UnresolvedType(DeclId),
    /// A declaration reported as marked carries no marker.
    #[error("declaration `{0}` does not carry the registration marker")]
    NotMarked(DeclId),
    /// Following enclosing scopes from a declaration leads back to itself.
    #[error("declaration `{0}` is enclosed in itself")]
    NestingCycle(DeclId),
}

/// Result alias for symbol model lookups.
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Read-only view of the host compiler's symbol and type model.
pub trait SymbolModel {
    /// Declarations carrying the registration marker that appeared in `round`.
    fn marked_declarations(&self, round: &Round) -> Vec<DeclId>;

    /// The marker argument attached to `decl`.
    fn marker_argument(&self, decl: &DeclId) -> SymbolResult<&MarkerArgument>;

    /// Resolve a type reference to the declaration it names.
    fn resolve(&self, type_ref: &TypeRef) -> SymbolResult<&Declaration>;

    /// Look up a declaration by identifier.
    fn declaration(&self, id: &DeclId) -> SymbolResult<&Declaration>;

    /// Whether `sub` is `sup` or one of its (transitive) subtypes.
    fn is_subtype(&self, sub: &DeclId, sup: &DeclId) -> SymbolResult<bool>;
}
