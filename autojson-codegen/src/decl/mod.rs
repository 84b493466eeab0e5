//! Declaration model adapter.
//!
//! Front-ends expose their declaration trees through the narrow
//! [`DeclarationTree`] trait. [`extract_classes`] projects such a tree into
//! [`ClassMetadata`](crate::model::ClassMetadata) values, resolving every field
//! type through the [`TypeTable`]. Nothing downstream of this module sees a
//! front-end type.

mod adapter;
pub mod manifest;
mod types;

pub use adapter::{ClassIter, canonical_type_name, extract_classes, qualified_name};
pub use manifest::{DeclId, DeclarationManifest};
pub use types::{BuiltinKind, TypeTable};

/// Coarse classification of a declaration node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    /// The root of a translation unit.
    TranslationUnit,
    /// A namespace scope.
    Namespace,
    /// A class or struct definition.
    Record,
    /// A data member of a record.
    Field,
    /// Anything the generator does not inspect.
    Other,
}

/// Canonical form of a field's type, after typedefs are desugared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalType<Id> {
    /// A builtin type category.
    Builtin(BuiltinKind),
    /// A record type, identified by its declaration.
    Record(Id),
    /// Any other type (pointers, templates, enums, ...), by spelling.
    Unsupported(String),
}

/// Read-only capabilities the generator needs from a declaration front-end.
pub trait DeclarationTree {
    /// Handle identifying one node of the tree.
    type Id: Copy + Eq + std::fmt::Debug;

    /// The root node of the translation unit.
    fn root(&self) -> Self::Id;

    /// Direct children of `node`, in document order.
    fn children(&self, node: Self::Id) -> impl Iterator<Item = Self::Id> + '_;

    /// Classification of `node`.
    fn kind(&self, node: Self::Id) -> DeclKind;

    /// Display name of `node`.
    fn name(&self, node: Self::Id) -> &str;

    /// The scope that semantically contains `node`.
    fn semantic_parent(&self, node: Self::Id) -> Option<Self::Id>;

    /// Annotation strings attached to `node`, in source order.
    fn annotations(&self, node: Self::Id) -> impl Iterator<Item = &str> + '_;

    /// Canonical type of the field `node`.
    ///
    /// Only called for nodes whose kind is [`DeclKind::Field`].
    fn canonical_type(&self, field: Self::Id) -> CanonicalType<Self::Id>;
}
