//! JSON declaration manifest front-end.
//!
//! A manifest is the declaration tree of one translation unit, written by an
//! external front-end (for example a libclang walker) after it has resolved
//! typedefs and record references:
//!
//! ```json
//! {
//!   "main_file": "userdef.hpp",
//!   "decls": [
//!     { "kind": "namespace", "name": "geo", "file": "userdef.hpp", "decls": [
//!       { "kind": "struct", "id": "c:@N@geo@S@Point", "name": "Point",
//!         "file": "userdef.hpp",
//!         "fields": [
//!           { "name": "x", "type": { "kind": "builtin", "name": "int" } },
//!           { "name": "y", "type": { "kind": "builtin", "name": "int" },
//!             "annotations": ["<codegen><key>Y</key></codegen>"] }
//!         ] }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Loading flattens the nested document into an arena with parent links so
//! the adapter can walk scopes outward.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::debug;

use super::{BuiltinKind, CanonicalType, DeclKind, DeclarationTree};
use crate::error::CodegenError;

/// Handle to a node of a [`DeclarationManifest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeclId(usize);

/// Serialized form of a manifest document.
#[derive(Debug, Clone, Deserialize)]
pub struct ManifestDocument {
    /// File the translation unit was parsed from.
    pub main_file: String,
    /// Top-level declarations in document order.
    #[serde(default)]
    pub decls: Vec<DeclNode>,
}

/// One declaration of the manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeclNode {
    /// A namespace scope and its members.
    Namespace {
        /// Namespace name; empty for anonymous namespaces.
        #[serde(default)]
        name: String,
        /// File the declaration appears in.
        #[serde(default)]
        file: Option<String>,
        /// Member declarations.
        #[serde(default)]
        decls: Vec<DeclNode>,
    },
    /// A `struct` definition.
    Struct(RecordNode),
    /// A `class` definition.
    Class(RecordNode),
    /// Any other declaration; kept only to preserve document order.
    Other {
        /// Declaration name, if any.
        #[serde(default)]
        name: String,
        /// File the declaration appears in.
        #[serde(default)]
        file: Option<String>,
    },
}

/// A record definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordNode {
    /// Stable identifier used by type references.
    #[serde(default)]
    pub id: Option<String>,
    /// Unqualified record name.
    pub name: String,
    /// File the declaration appears in.
    #[serde(default)]
    pub file: Option<String>,
    /// Annotation strings attached to the record.
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Data members in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    /// Nested declarations, such as member classes.
    #[serde(default)]
    pub decls: Vec<DeclNode>,
}

/// A data member.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldNode {
    /// Member name.
    pub name: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// Annotation strings attached to the member.
    #[serde(default)]
    pub annotations: Vec<String>,
}

/// A type as reported by the front-end.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeRef {
    /// A builtin type category.
    Builtin {
        /// The category.
        name: BuiltinKind,
    },
    /// A reference to a record declared in the manifest.
    Record {
        /// Id of the referenced record.
        #[serde(rename = "ref")]
        target: String,
    },
    /// A typedef or alias, with the type it desugars to.
    Typedef {
        /// Alias spelling.
        name: String,
        /// Aliased type.
        canonical: Box<TypeRef>,
    },
    /// A type the front-end could not express in manifest terms.
    Unsupported {
        /// Source spelling of the type.
        spelling: String,
    },
}

#[derive(Debug)]
struct Entry {
    kind: DeclKind,
    name: String,
    file: Option<String>,
    parent: Option<DeclId>,
    children: Vec<DeclId>,
    annotations: Vec<String>,
    ty: Option<CanonicalType<DeclId>>,
}

impl Entry {
    fn new(kind: DeclKind, name: String, file: Option<String>, parent: Option<DeclId>) -> Self {
        Self {
            kind,
            name,
            file,
            parent,
            children: Vec::new(),
            annotations: Vec::new(),
            ty: None,
        }
    }
}

/// A loaded manifest, flattened into an arena.
#[derive(Debug)]
pub struct DeclarationManifest {
    main_file: String,
    entries: Vec<Entry>,
}

const ROOT: DeclId = DeclId(0);

impl DeclarationManifest {
    /// Parses and indexes a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`CodegenError::Manifest`] for JSON that does not match the
    /// schema.
    pub fn from_json(text: &str) -> Result<Self, CodegenError> {
        let document: ManifestDocument = serde_json::from_str(text)?;
        Ok(Self::from_document(document))
    }

    /// Indexes an already deserialized manifest document.
    ///
    /// A record reference naming an id the manifest never declares becomes
    /// an unsupported type carrying that id, so it only fails generation of
    /// the class that uses it.
    #[must_use]
    pub fn from_document(document: ManifestDocument) -> Self {
        let mut builder = ArenaBuilder::default();
        builder.entries.push(Entry::new(
            DeclKind::TranslationUnit,
            String::new(),
            Some(document.main_file.clone()),
            None,
        ));
        for decl in document.decls {
            builder.push_decl(decl, ROOT);
        }
        Self {
            main_file: document.main_file,
            entries: builder.resolve(),
        }
    }

    /// File the translation unit was parsed from.
    #[must_use]
    pub fn main_file(&self) -> &str {
        &self.main_file
    }

    /// File `node` is declared in.
    ///
    /// Declarations without a recorded file inherit the file of their
    /// enclosing scope; top-level ones default to the main file.
    #[must_use]
    pub fn file_of(&self, node: DeclId) -> Option<&str> {
        self.entry(node).and_then(|entry| entry.file.as_deref())
    }

    /// Whether `node` is declared in the main file rather than an include.
    #[must_use]
    pub fn is_in_main_file(&self, node: DeclId) -> bool {
        self.file_of(node) == Some(self.main_file.as_str())
    }

    fn entry(&self, node: DeclId) -> Option<&Entry> {
        self.entries.get(node.0)
    }
}

impl DeclarationTree for DeclarationManifest {
    type Id = DeclId;

    fn root(&self) -> DeclId {
        ROOT
    }

    fn children(&self, node: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        self.entry(node)
            .map(|entry| entry.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
    }

    fn kind(&self, node: DeclId) -> DeclKind {
        self.entry(node).map_or(DeclKind::Other, |entry| entry.kind)
    }

    fn name(&self, node: DeclId) -> &str {
        self.entry(node).map_or("", |entry| entry.name.as_str())
    }

    fn semantic_parent(&self, node: DeclId) -> Option<DeclId> {
        self.entry(node).and_then(|entry| entry.parent)
    }

    fn annotations(&self, node: DeclId) -> impl Iterator<Item = &str> + '_ {
        self.entry(node)
            .map(|entry| entry.annotations.as_slice())
            .unwrap_or_default()
            .iter()
            .map(String::as_str)
    }

    fn canonical_type(&self, field: DeclId) -> CanonicalType<DeclId> {
        self.entry(field)
            .and_then(|entry| entry.ty.clone())
            .unwrap_or_else(|| CanonicalType::Unsupported(format!("<not a field: {field:?}>")))
    }
}

#[derive(Default)]
struct ArenaBuilder {
    entries: Vec<Entry>,
    record_ids: HashMap<String, DeclId>,
    pending: Vec<(DeclId, String)>,
}

impl ArenaBuilder {
    /// Appends `entry`, inheriting the parent's file when none is recorded.
    fn push_entry(&mut self, mut entry: Entry) -> DeclId {
        let id = DeclId(self.entries.len());
        if entry.file.is_none() {
            entry.file = entry
                .parent
                .and_then(|parent| self.entries.get(parent.0))
                .and_then(|parent| parent.file.clone());
        }
        if let Some(parent) = entry.parent.and_then(|parent| self.entries.get_mut(parent.0)) {
            parent.children.push(id);
        }
        self.entries.push(entry);
        id
    }

    fn push_decl(&mut self, decl: DeclNode, parent: DeclId) {
        match decl {
            DeclNode::Namespace { name, file, decls } => {
                let id = self.push_entry(Entry::new(DeclKind::Namespace, name, file, Some(parent)));
                for child in decls {
                    self.push_decl(child, id);
                }
            }
            DeclNode::Struct(record) | DeclNode::Class(record) => self.push_record(record, parent),
            DeclNode::Other { name, file } => {
                self.push_entry(Entry::new(DeclKind::Other, name, file, Some(parent)));
            }
        }
    }

    fn push_record(&mut self, record: RecordNode, parent: DeclId) {
        let RecordNode {
            id: record_id,
            name,
            file,
            annotations,
            fields,
            decls,
        } = record;
        let mut entry = Entry::new(DeclKind::Record, name, file, Some(parent));
        entry.annotations = annotations;
        let id = self.push_entry(entry);
        if let Some(record_id) = record_id {
            self.record_ids.insert(record_id, id);
        }

        for field in fields {
            let mut field_entry = Entry::new(DeclKind::Field, field.name, None, Some(id));
            field_entry.annotations = field.annotations;
            let field_id = self.push_entry(field_entry);
            let ty = self.canonicalize(field.ty, field_id);
            if let Some(entry) = self.entries.get_mut(field_id.0) {
                entry.ty = ty;
            }
        }
        for child in decls {
            self.push_decl(child, id);
        }
    }

    /// Desugars typedefs. Record references are resolved once every record
    /// has been indexed, since they may point forward.
    fn canonicalize(&mut self, ty: TypeRef, field: DeclId) -> Option<CanonicalType<DeclId>> {
        match ty {
            TypeRef::Builtin { name } => Some(CanonicalType::Builtin(name)),
            TypeRef::Record { target } => {
                self.pending.push((field, target));
                None
            }
            TypeRef::Typedef { canonical, .. } => self.canonicalize(*canonical, field),
            TypeRef::Unsupported { spelling } => Some(CanonicalType::Unsupported(spelling)),
        }
    }

    fn resolve(mut self) -> Vec<Entry> {
        for (field, target) in std::mem::take(&mut self.pending) {
            let ty = if let Some(record) = self.record_ids.get(&target) {
                CanonicalType::Record(*record)
            } else {
                debug!(id = %target, "record reference does not resolve");
                CanonicalType::Unsupported(target)
            };
            if let Some(entry) = self.entries.get_mut(field.0) {
                entry.ty = Some(ty);
            }
        }
        self.entries
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for manifest loading.

    use super::*;

    const SAMPLE: &str = r#"{
        "main_file": "main.hpp",
        "decls": [
            { "kind": "namespace", "name": "outer", "file": "main.hpp", "decls": [
                { "kind": "struct", "id": "Outer::Node", "name": "Node", "file": "main.hpp",
                  "fields": [
                      { "name": "next", "type": { "kind": "record", "ref": "Later" } },
                      { "name": "size", "type": { "kind": "typedef", "name": "size_type",
                        "canonical": { "kind": "builtin", "name": "ulong" } } }
                  ] }
            ] },
            { "kind": "class", "id": "Later", "name": "Later", "file": "other.hpp" }
        ]
    }"#;

    fn sample() -> DeclarationManifest {
        DeclarationManifest::from_json(SAMPLE).expect("sample manifest loads")
    }

    #[test]
    fn flattens_scopes_with_parent_links() {
        let manifest = sample();
        let top: Vec<_> = manifest.children(manifest.root()).collect();
        assert_eq!(top.len(), 2);
        let namespace = *top.first().expect("namespace");
        assert_eq!(manifest.kind(namespace), DeclKind::Namespace);
        let record = manifest.children(namespace).next().expect("record");
        assert_eq!(manifest.name(record), "Node");
        assert_eq!(manifest.semantic_parent(record), Some(namespace));
        assert_eq!(manifest.semantic_parent(namespace), Some(manifest.root()));
    }

    #[test]
    fn resolves_forward_references_and_typedefs() {
        let manifest = sample();
        let namespace = manifest.children(manifest.root()).next().expect("namespace");
        let record = manifest.children(namespace).next().expect("record");
        let fields: Vec<_> = manifest.children(record).collect();
        let later = manifest.children(manifest.root()).nth(1).expect("later");

        let types: Vec<_> = fields.iter().map(|f| manifest.canonical_type(*f)).collect();
        assert_eq!(
            types,
            vec![
                CanonicalType::Record(later),
                CanonicalType::Builtin(BuiltinKind::ULong),
            ]
        );
    }

    #[test]
    fn tracks_main_file_membership() {
        let manifest = sample();
        let top: Vec<_> = manifest.children(manifest.root()).collect();
        let flags: Vec<_> = top.iter().map(|n| manifest.is_in_main_file(*n)).collect();
        assert_eq!(flags, vec![true, false]);
    }

    #[test]
    fn missing_file_is_inherited_from_scope() {
        let text = r#"{ "main_file": "a.hpp", "decls": [
            { "kind": "namespace", "name": "n", "decls": [ { "kind": "struct", "name": "A" } ] }
        ] }"#;
        let manifest = DeclarationManifest::from_json(text).expect("manifest loads");
        let namespace = manifest.children(manifest.root()).next().expect("namespace");
        let record = manifest.children(namespace).next().expect("record");
        assert_eq!(manifest.file_of(record), Some("a.hpp"));
        assert!(manifest.is_in_main_file(record));
    }

    #[test]
    fn dangling_reference_becomes_unsupported() {
        let text = r#"{ "main_file": "a.hpp", "decls": [
            { "kind": "struct", "name": "A",
              "fields": [ { "name": "b", "type": { "kind": "record", "ref": "missing" } } ] }
        ] }"#;
        let manifest = DeclarationManifest::from_json(text).expect("manifest loads");
        let record = manifest.children(manifest.root()).next().expect("record");
        let field = manifest.children(record).next().expect("field");
        assert_eq!(
            manifest.canonical_type(field),
            CanonicalType::Unsupported("missing".to_owned())
        );
    }

    #[test]
    fn unknown_builtin_is_a_schema_error() {
        let text = r#"{ "main_file": "a.hpp", "decls": [
            { "kind": "struct", "name": "A",
              "fields": [ { "name": "b", "type": { "kind": "builtin", "name": "quad" } } ] }
        ] }"#;
        let err = DeclarationManifest::from_json(text).expect_err("unknown builtin");
        assert!(matches!(err, CodegenError::Manifest(_)), "{err:?}");
    }
}
