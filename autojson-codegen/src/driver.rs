//! Translation-unit driver.
//!
//! Ties the pipeline together: enumerate classes, check key uniqueness,
//! instantiate the template per class and concatenate the blocks. Output is
//! only produced when every class of the unit succeeds.

use camino::Utf8Path;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::decl::{DeclarationManifest, DeclarationTree, TypeTable, extract_classes};
use crate::engine::{DEFAULT_TEMPLATE, Template, generate_class};
use crate::error::CodegenError;
use crate::fs;
use crate::model::ClassMetadata;

/// Switches that change what [`generate_unit`] accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Accept classes whose active fields share a serialized key.
    pub permit_duplicate_keys: bool,
}

impl From<&GeneratorConfig> for GenerateOptions {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            permit_duplicate_keys: config.permit_duplicate_keys,
        }
    }
}

/// Code generated for one translation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    /// Concatenated class blocks, each followed by a newline.
    pub text: String,
    /// Qualified names of the generated classes, in output order.
    pub classes: Vec<String>,
}

/// Generates code for every class below `root` that passes `filter`.
///
/// # Errors
///
/// Returns the first error raised while extracting a class, or
/// [`CodegenError::DuplicateKey`] when two active fields share a key and
/// `options` does not permit it.
pub fn generate_unit<T, F>(
    tree: &T,
    root: T::Id,
    filter: F,
    template: &Template,
    options: GenerateOptions,
) -> Result<GeneratedUnit, CodegenError>
where
    T: DeclarationTree,
    F: FnMut(T::Id) -> bool,
{
    let mut unit = GeneratedUnit {
        text: String::new(),
        classes: Vec::new(),
    };
    for class in extract_classes(tree, root, filter, TypeTable::shared()) {
        let class = class?;
        check_keys(&class, options)?;
        unit.text.push_str(&generate_class(template, &class));
        unit.text.push('\n');
        unit.classes.push(class.qualified_name().to_owned());
    }
    Ok(unit)
}

fn check_keys(class: &ClassMetadata, options: GenerateOptions) -> Result<(), CodegenError> {
    let Some(collision) = class.first_key_collision() else {
        return Ok(());
    };
    if options.permit_duplicate_keys {
        warn!(
            class = class.qualified_name(),
            key = collision.key,
            unreachable = collision.second,
            "duplicate serialized key; later field is unreachable when parsing"
        );
        return Ok(());
    }
    Err(CodegenError::DuplicateKey {
        class: class.qualified_name().to_owned(),
        key: collision.key.to_owned(),
        first: collision.first.to_owned(),
        second: collision.second.to_owned(),
    })
}

/// Loads the template named by `config`, or the embedded default.
///
/// # Errors
///
/// Returns [`CodegenError::Io`] if the template file cannot be read and
/// [`CodegenError::Template`] if it names an unknown hole.
pub fn load_template(config: &GeneratorConfig) -> Result<Template, CodegenError> {
    let template = match config.template.as_deref() {
        Some(path) => {
            debug!(path = %path, "loading template");
            Template::parse(&fs::read_to_string(path)?)?
        }
        None => Template::parse(DEFAULT_TEMPLATE)?,
    };
    Ok(template)
}

/// Generates code for the manifest at `input` and writes it to `output`.
///
/// The output file is only created once the whole unit has been generated.
///
/// # Errors
///
/// Returns any error from reading inputs, generating the unit, or writing
/// the artifact.
pub fn run(
    input: &Utf8Path,
    output: &Utf8Path,
    config: &GeneratorConfig,
) -> Result<GeneratedUnit, CodegenError> {
    let template = load_template(config)?;
    let manifest = DeclarationManifest::from_json(&fs::read_to_string(input)?)?;
    let include_foreign = config.include_foreign_declarations;
    let unit = generate_unit(
        &manifest,
        manifest.root(),
        |node| include_foreign || manifest.is_in_main_file(node),
        &template,
        GenerateOptions::from(config),
    )?;
    fs::write_artifact(output, &unit.text)?;
    info!(
        output = %output,
        classes = unit.classes.len(),
        "generated translation unit"
    );
    Ok(unit)
}
