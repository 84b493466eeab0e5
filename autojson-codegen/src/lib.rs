//! Generates SAX-style JSON handlers and serializers for annotated C++
//! declarations.
//!
//! The pipeline reads a translation unit through the
//! [`decl::DeclarationTree`] abstraction, projects every eligible class into
//! a [`model::ClassMetadata`] using its `<codegen>` annotations, and
//! instantiates a hole-based [`engine::Template`] once per class. The
//! [`driver`] ties the stages together and writes the result only when the
//! whole unit succeeds.

pub mod annotation;
pub mod config;
pub mod decl;
pub mod driver;
pub mod engine;
pub mod error;
pub mod fs;
pub mod model;
