//! Error types for `autojson-codegen`.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::annotation::AnnotationError;
use crate::engine::TemplateError;

/// Errors surfaced by the generation pipeline.
///
/// Every variant is fatal for the run: the driver never writes partial
/// output for a translation unit that produced one of these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// Annotation markup attached to a declaration could not be parsed.
    #[error("invalid annotation on '{declaration}': {source}")]
    AnnotationSyntax {
        /// Qualified name of the class, or `Class::member` for fields.
        declaration: String,
        /// Underlying markup failure.
        #[source]
        source: AnnotationError,
    },

    /// A field's canonical type is neither a supported builtin nor a record.
    #[error("field '{field}' of '{class}' has unsupported type '{spelling}'")]
    UnsupportedType {
        /// Qualified name of the owning class.
        class: String,
        /// Member name of the offending field.
        field: String,
        /// Front-end spelling of the type.
        spelling: String,
    },

    /// The shared template contains a placeholder that cannot be resolved.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// Two active fields of one class serialize under the same key.
    #[error("class '{class}' maps both '{first}' and '{second}' to the key \"{key}\"")]
    DuplicateKey {
        /// Qualified name of the class.
        class: String,
        /// The colliding serialized key.
        key: String,
        /// Member that claims the key first.
        first: String,
        /// Member whose dispatch branch would be unreachable.
        second: String,
    },

    /// The declaration manifest is not valid JSON for the expected schema.
    #[error("failed to parse declaration manifest: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Layered configuration could not be extracted.
    #[error("failed to load configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    /// Filesystem access failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that triggered the failure.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
