//! Parser for the `<codegen>` annotation markup.
//!
//! Declarations carry free-form annotation strings. The generator only
//! understands a single XML element named `codegen`, whose children tweak how
//! a class or field is handled:
//!
//! ```xml
//! <codegen>
//!   <required>true</required>
//!   <key>administrator ID</key>
//! </codegen>
//! ```
//!
//! Booleans accept `true` and `false` in any letter case. Every other literal
//! is rejected rather than defaulted.

use roxmltree::{Document, Node};
use thiserror::Error;

const ROOT_TAG: &str = "codegen";

/// Errors raised while parsing annotation markup.
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The markup is not a well-formed XML fragment.
    #[error("annotation markup {markup:?} is not well-formed: {source}")]
    Malformed {
        /// The markup as written on the declaration.
        markup: String,
        /// Parser diagnostic.
        #[source]
        source: roxmltree::Error,
    },

    /// The root element is something other than `<codegen>`.
    #[error("annotation root must be <codegen>, found {node}")]
    UnexpectedRoot {
        /// The offending root element, rendered as written.
        node: String,
    },

    /// A boolean element holds text other than `true` or `false`.
    #[error("<{element}> expects `true` or `false`, found {node}")]
    InvalidBoolean {
        /// Name of the boolean element.
        element: String,
        /// The offending element, rendered as written.
        node: String,
    },

    /// A `<key>` element carries no text.
    #[error("<key> must name a non-empty key, found {node}")]
    EmptyKey {
        /// The offending element, rendered as written.
        node: String,
    },
}

/// Class-level annotation flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassFlags {
    /// Reject unknown keys instead of skipping them.
    pub strict_parsing: bool,
}

impl ClassFlags {
    /// Applies one annotation to the flags.
    ///
    /// Absent or empty markup leaves the flags untouched. Otherwise every flag
    /// is reassigned from the markup, so the last annotation on a declaration
    /// wins.
    ///
    /// # Errors
    ///
    /// Returns an [`AnnotationError`] for malformed markup, a root other than
    /// `<codegen>`, or a boolean element with invalid text.
    pub fn apply(&mut self, markup: Option<&str>) -> Result<(), AnnotationError> {
        let Some(text) = markup.filter(|text| !text.is_empty()) else {
            return Ok(());
        };
        let document = parse_document(text)?;
        let root = codegen_root(&document, text)?;
        self.strict_parsing = truth_value(text, child(root, "strict_parsing"))?;
        Ok(())
    }
}

/// Field-level annotation flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFlags {
    /// The field must appear in every parsed object.
    pub required: bool,
    /// The field is left out of every generated fragment.
    pub ignore: bool,
    /// Serialized key override; `None` keeps the member name.
    pub key: Option<String>,
}

impl FieldFlags {
    /// Applies one annotation to the flags.
    ///
    /// Absent or empty markup leaves the flags untouched. Otherwise every flag
    /// is reassigned, including `key`, which falls back to `None` when the
    /// markup has no `<key>` element.
    ///
    /// # Errors
    ///
    /// Returns an [`AnnotationError`] for malformed markup, a root other than
    /// `<codegen>`, an invalid boolean, or an empty `<key>`.
    pub fn apply(&mut self, markup: Option<&str>) -> Result<(), AnnotationError> {
        let Some(text) = markup.filter(|text| !text.is_empty()) else {
            return Ok(());
        };
        let document = parse_document(text)?;
        let root = codegen_root(&document, text)?;
        *self = Self {
            required: truth_value(text, child(root, "required"))?,
            ignore: truth_value(text, child(root, "ignore"))?,
            key: key_value(text, child(root, "key"))?,
        };
        Ok(())
    }
}

fn parse_document(markup: &str) -> Result<Document<'_>, AnnotationError> {
    Document::parse(markup).map_err(|source| AnnotationError::Malformed {
        markup: markup.to_owned(),
        source,
    })
}

fn codegen_root<'a, 'input>(
    document: &'a Document<'input>,
    markup: &str,
) -> Result<Node<'a, 'input>, AnnotationError> {
    let root = document.root_element();
    if root.has_tag_name(ROOT_TAG) {
        Ok(root)
    } else {
        Err(AnnotationError::UnexpectedRoot {
            node: render_node(markup, root),
        })
    }
}

fn child<'a, 'input>(parent: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|node| node.is_element() && node.has_tag_name(name))
}

fn truth_value(markup: &str, element: Option<Node<'_, '_>>) -> Result<bool, AnnotationError> {
    let Some(node) = element else {
        return Ok(false);
    };
    match node.text() {
        Some(text) if text.eq_ignore_ascii_case("true") => Ok(true),
        Some(text) if text.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(AnnotationError::InvalidBoolean {
            element: node.tag_name().name().to_owned(),
            node: render_node(markup, node),
        }),
    }
}

fn key_value(markup: &str, element: Option<Node<'_, '_>>) -> Result<Option<String>, AnnotationError> {
    let Some(node) = element else {
        return Ok(None);
    };
    match node.text() {
        Some(text) if !text.is_empty() => Ok(Some(text.to_owned())),
        _ => Err(AnnotationError::EmptyKey {
            node: render_node(markup, node),
        }),
    }
}

fn render_node(markup: &str, node: Node<'_, '_>) -> String {
    markup
        .get(node.range())
        .map_or_else(|| format!("<{}>", node.tag_name().name()), str::to_owned)
}
