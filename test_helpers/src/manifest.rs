//! Builders for declaration manifests.
//!
//! # Examples
//!
//! ```
//! use autojson_codegen_test_helpers::manifest::{Decl, Field, Manifest};
//!
//! let json = Manifest::new("main.hpp")
//!     .decl(Decl::record("Point").field(Field::builtin("x", "int")))
//!     .to_json();
//! assert!(json.contains("\"Point\""));
//! ```

use serde_json::{Map, Value, json};

/// A manifest under construction.
#[derive(Debug, Clone)]
pub struct Manifest {
    main_file: String,
    decls: Vec<Decl>,
}

impl Manifest {
    /// Starts a manifest for `main_file`.
    #[must_use]
    pub fn new(main_file: &str) -> Self {
        Self {
            main_file: main_file.to_owned(),
            decls: Vec::new(),
        }
    }

    /// Appends a top-level declaration.
    #[must_use]
    pub fn decl(mut self, decl: Decl) -> Self {
        self.decls.push(decl);
        self
    }

    /// Renders the manifest as a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        json!({
            "main_file": self.main_file,
            "decls": self.decls.iter().map(Decl::to_value).collect::<Vec<_>>(),
        })
    }

    /// Renders the manifest as JSON text.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}

/// A declaration under construction.
#[derive(Debug, Clone)]
pub struct Decl {
    kind: &'static str,
    name: String,
    id: Option<String>,
    file: Option<String>,
    annotations: Vec<String>,
    fields: Vec<Field>,
    children: Vec<Decl>,
}

impl Decl {
    fn with_kind(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_owned(),
            id: None,
            file: None,
            annotations: Vec::new(),
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    /// A namespace.
    #[must_use]
    pub fn namespace(name: &str) -> Self {
        Self::with_kind("namespace", name)
    }

    /// A `struct` whose id defaults to its name.
    #[must_use]
    pub fn record(name: &str) -> Self {
        Self::with_kind("struct", name).id(name)
    }

    /// A `class` whose id defaults to its name.
    #[must_use]
    pub fn class(name: &str) -> Self {
        Self::with_kind("class", name).id(name)
    }

    /// A declaration the generator skips.
    #[must_use]
    pub fn other(name: &str) -> Self {
        Self::with_kind("other", name)
    }

    /// Sets the reference id of a record.
    #[must_use]
    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Sets the file the declaration appears in.
    #[must_use]
    pub fn file(mut self, file: &str) -> Self {
        self.file = Some(file.to_owned());
        self
    }

    /// Attaches an annotation string.
    #[must_use]
    pub fn annotate(mut self, markup: &str) -> Self {
        self.annotations.push(markup.to_owned());
        self
    }

    /// Appends a data member.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a nested declaration.
    #[must_use]
    pub fn child(mut self, decl: Self) -> Self {
        self.children.push(decl);
        self
    }

    fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("kind".to_owned(), json!(self.kind));
        object.insert("name".to_owned(), json!(self.name));
        if let Some(file) = &self.file {
            object.insert("file".to_owned(), json!(file));
        }
        match self.kind {
            "namespace" => {
                object.insert("decls".to_owned(), children(&self.children));
            }
            "struct" | "class" => {
                if let Some(id) = &self.id {
                    object.insert("id".to_owned(), json!(id));
                }
                object.insert("annotations".to_owned(), json!(self.annotations));
                object.insert(
                    "fields".to_owned(),
                    Value::Array(self.fields.iter().map(Field::to_value).collect()),
                );
                object.insert("decls".to_owned(), children(&self.children));
            }
            _ => {}
        }
        Value::Object(object)
    }
}

fn children(decls: &[Decl]) -> Value {
    Value::Array(decls.iter().map(Decl::to_value).collect())
}

/// A data member under construction.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: Value,
    annotations: Vec<String>,
}

impl Field {
    fn with_type(name: &str, ty: Value) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            annotations: Vec::new(),
        }
    }

    /// A member of builtin type, named by its manifest category.
    #[must_use]
    pub fn builtin(name: &str, kind: &str) -> Self {
        Self::with_type(name, json!({ "kind": "builtin", "name": kind }))
    }

    /// A member whose type is the record with id `target`.
    #[must_use]
    pub fn record(name: &str, target: &str) -> Self {
        Self::with_type(name, json!({ "kind": "record", "ref": target }))
    }

    /// A member declared through a typedef of a builtin category.
    #[must_use]
    pub fn typedef(name: &str, alias: &str, kind: &str) -> Self {
        Self::with_type(
            name,
            json!({
                "kind": "typedef",
                "name": alias,
                "canonical": { "kind": "builtin", "name": kind },
            }),
        )
    }

    /// A member of a type the front-end could not express.
    #[must_use]
    pub fn unsupported(name: &str, spelling: &str) -> Self {
        Self::with_type(name, json!({ "kind": "unsupported", "spelling": spelling }))
    }

    /// Attaches an annotation string.
    #[must_use]
    pub fn annotate(mut self, markup: &str) -> Self {
        self.annotations.push(markup.to_owned());
        self
    }

    fn to_value(&self) -> Value {
        json!({
            "name": self.name,
            "type": self.ty,
            "annotations": self.annotations,
        })
    }
}

/// Wraps `inner` in a `<codegen>` element.
#[must_use]
pub fn codegen(inner: &str) -> String {
    format!("<codegen>{inner}</codegen>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_nest_records() {
        let value = Manifest::new("m.hpp")
            .decl(
                Decl::namespace("geo")
                    .child(Decl::record("Point").field(Field::builtin("x", "int"))),
            )
            .to_value();
        assert_eq!(value["decls"][0]["kind"], "namespace");
        assert_eq!(value["decls"][0]["decls"][0]["id"], "Point");
        assert_eq!(
            value["decls"][0]["decls"][0]["fields"][0]["type"]["name"],
            "int"
        );
    }

    #[test]
    fn other_declarations_carry_no_members() {
        let value = Manifest::new("m.hpp").decl(Decl::other("f")).to_value();
        assert!(value["decls"][0].get("fields").is_none());
    }

    #[test]
    fn codegen_wraps_markup() {
        assert_eq!(codegen("<ignore>true</ignore>"), "<codegen><ignore>true</ignore></codegen>");
    }
}
