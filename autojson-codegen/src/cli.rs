//! Command-line interface definitions for `autojson-codegen`.

use camino::Utf8PathBuf;
use clap::Parser;

use autojson_codegen::config::ConfigOverrides;

/// Parsed CLI arguments for `autojson-codegen`.
#[derive(Debug, Parser)]
#[command(name = "autojson-codegen")]
#[command(about = "Generate SAX handlers and serializers for annotated C++ declarations")]
#[command(version)]
pub struct Args {
    /// Declaration manifest describing the translation unit.
    #[arg(short, long, value_name = "manifest.json")]
    pub input: Utf8PathBuf,
    /// File the generated code is written to.
    #[arg(short, long, value_name = "path")]
    pub output: Utf8PathBuf,
    /// Template file replacing the built-in one.
    #[arg(long, value_name = "path")]
    pub template: Option<Utf8PathBuf>,
    /// Configuration file (defaults to `autojson-codegen.toml` when present).
    #[arg(long, value_name = "path")]
    pub config: Option<Utf8PathBuf>,
    /// Also generate code for records declared in included files.
    #[arg(long = "include-foreign-declarations")]
    pub should_include_foreign: bool,
    /// Accept classes whose fields share a serialized key.
    #[arg(long = "permit-duplicate-keys")]
    pub should_permit_duplicates: bool,
}

impl Args {
    /// Converts the flags into configuration overrides.
    ///
    /// Switches that are not given leave lower configuration layers in charge.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            template: self.template.clone(),
            include_foreign_declarations: self.should_include_foreign.then_some(true),
            permit_duplicate_keys: self.should_permit_duplicates.then_some(true),
        }
    }
}
