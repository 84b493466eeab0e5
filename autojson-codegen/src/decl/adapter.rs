//! Projection of a declaration tree into class metadata.

use tracing::{debug, trace};

use super::{CanonicalType, DeclKind, DeclarationTree, TypeTable};
use crate::annotation::{ClassFlags, FieldFlags};
use crate::error::CodegenError;
use crate::model::{ClassMetadata, FieldMetadata};

/// Lazily enumerates the classes below `root` that pass `filter`.
///
/// Namespaces are entered recursively; records are reported but not entered,
/// so nested classes are only reachable as field types. The filter is applied
/// to every visited node, namespaces included. Each item is produced
/// independently: a malformed class yields an error and the walk continues
/// with its siblings.
pub fn extract_classes<'a, T, F>(
    tree: &'a T,
    root: T::Id,
    filter: F,
    table: &'a TypeTable,
) -> ClassIter<'a, T, F>
where
    T: DeclarationTree,
    F: FnMut(T::Id) -> bool,
{
    ClassIter {
        tree,
        filter,
        table,
        stack: vec![tree.children(root).collect::<Vec<_>>().into_iter()],
    }
}

/// Iterator returned by [`extract_classes`].
pub struct ClassIter<'a, T: DeclarationTree, F> {
    tree: &'a T,
    filter: F,
    table: &'a TypeTable,
    stack: Vec<std::vec::IntoIter<T::Id>>,
}

impl<T, F> Iterator for ClassIter<'_, T, F>
where
    T: DeclarationTree,
    F: FnMut(T::Id) -> bool,
{
    type Item = Result<ClassMetadata, CodegenError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let scope = self.stack.last_mut()?;
            let Some(node) = scope.next() else {
                self.stack.pop();
                continue;
            };
            if !(self.filter)(node) {
                continue;
            }
            match self.tree.kind(node) {
                DeclKind::Namespace => {
                    let children: Vec<_> = self.tree.children(node).collect();
                    self.stack.push(children.into_iter());
                }
                DeclKind::Record => return Some(build_class(self.tree, self.table, node)),
                DeclKind::TranslationUnit | DeclKind::Field | DeclKind::Other => {}
            }
        }
    }
}

/// Fully qualified name of a record: `::` plus the name of each enclosing
/// namespace, stopping at the first ancestor that is not a namespace.
pub fn qualified_name<T: DeclarationTree>(tree: &T, record: T::Id) -> String {
    let mut name = format!("::{}", tree.name(record));
    let mut cursor = record;
    while let Some(parent) = tree
        .semantic_parent(cursor)
        .filter(|parent| tree.kind(*parent) == DeclKind::Namespace)
    {
        name = format!("::{}{name}", tree.name(parent));
        cursor = parent;
    }
    name
}

/// Canonical spelling of a field's type.
///
/// # Errors
///
/// Returns [`CodegenError::UnsupportedType`] when the type is neither a
/// builtin listed in `table` nor a record.
pub fn canonical_type_name<T: DeclarationTree>(
    tree: &T,
    table: &TypeTable,
    class: &str,
    field: T::Id,
) -> Result<String, CodegenError> {
    let unsupported = |spelling: String| CodegenError::UnsupportedType {
        class: class.to_owned(),
        field: tree.name(field).to_owned(),
        spelling,
    };
    match tree.canonical_type(field) {
        CanonicalType::Builtin(kind) => table
            .spelling(kind)
            .map(str::to_owned)
            .ok_or_else(|| unsupported(kind.spelling().to_owned())),
        CanonicalType::Record(record) if tree.kind(record) == DeclKind::Record => {
            Ok(qualified_name(tree, record))
        }
        CanonicalType::Record(record) => Err(unsupported(tree.name(record).to_owned())),
        CanonicalType::Unsupported(spelling) => Err(unsupported(spelling)),
    }
}

fn build_class<T: DeclarationTree>(
    tree: &T,
    table: &TypeTable,
    record: T::Id,
) -> Result<ClassMetadata, CodegenError> {
    let name = qualified_name(tree, record);
    debug!(class = %name, "extracting class");

    let fields = tree
        .children(record)
        .filter(|child| tree.kind(*child) == DeclKind::Field)
        .map(|field| build_field(tree, table, &name, field))
        .collect::<Result<Vec<_>, _>>()?;

    let mut flags = ClassFlags::default();
    for markup in tree.annotations(record) {
        flags
            .apply(Some(markup))
            .map_err(|source| CodegenError::AnnotationSyntax {
                declaration: name.clone(),
                source,
            })?;
    }

    Ok(ClassMetadata::new(name, flags.strict_parsing, fields))
}

fn build_field<T: DeclarationTree>(
    tree: &T,
    table: &TypeTable,
    class: &str,
    field: T::Id,
) -> Result<FieldMetadata, CodegenError> {
    let member_name = tree.name(field);
    let type_name = canonical_type_name(tree, table, class, field)?;

    let mut flags = FieldFlags::default();
    for markup in tree.annotations(field) {
        flags
            .apply(Some(markup))
            .map_err(|source| CodegenError::AnnotationSyntax {
                declaration: format!("{class}::{member_name}"),
                source,
            })?;
    }

    trace!(class, field = member_name, type_name = %type_name, ?flags, "extracted field");
    Ok(FieldMetadata::new(type_name, member_name).with_flags(flags))
}
