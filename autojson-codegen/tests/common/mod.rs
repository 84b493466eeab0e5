//! Shared helpers for `autojson-codegen` integration tests.

use autojson_codegen::decl::{DeclarationManifest, DeclarationTree};
use autojson_codegen::driver::{GenerateOptions, GeneratedUnit, generate_unit};
use autojson_codegen::engine::{DEFAULT_TEMPLATE, Template};
use autojson_codegen::error::CodegenError;

/// Generates the unit described by `manifest` with the built-in template,
/// keeping only declarations from the main file.
///
/// # Errors
///
/// Returns whatever the pipeline reports for the manifest.
#[expect(
    clippy::expect_used,
    reason = "the built-in template is covered by its own unit tests"
)]
pub(crate) fn generate(
    manifest: &str,
    options: GenerateOptions,
) -> Result<GeneratedUnit, CodegenError> {
    let template = Template::parse(DEFAULT_TEMPLATE).expect("built-in template parses");
    generate_with(manifest, &template, options)
}

/// Generates the unit described by `manifest` with `template`.
///
/// # Errors
///
/// Returns whatever the pipeline reports for the manifest.
pub(crate) fn generate_with(
    manifest: &str,
    template: &Template,
    options: GenerateOptions,
) -> Result<GeneratedUnit, CodegenError> {
    let tree = DeclarationManifest::from_json(manifest)?;
    generate_unit(
        &tree,
        tree.root(),
        |node| tree.is_in_main_file(node),
        template,
        options,
    )
}
