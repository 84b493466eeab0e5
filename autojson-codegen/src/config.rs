//! Layered generator configuration.
//!
//! Values are merged with `figment`, later layers overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. a TOML file (the `--config` path, or [`DEFAULT_CONFIG_FILE`] when present)
//! 3. `AUTOJSON_CODEGEN_*` environment variables
//! 4. command-line overrides

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CodegenError;
use crate::fs;

/// Configuration file picked up from the working directory when no explicit
/// path is given.
pub const DEFAULT_CONFIG_FILE: &str = "autojson-codegen.toml";

/// Prefix of the environment variables read by [`load`].
pub const ENV_PREFIX: &str = "AUTOJSON_CODEGEN_";

/// Options controlling a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Template file replacing the embedded default.
    pub template: Option<Utf8PathBuf>,
    /// Generate code for records declared outside the main file as well.
    pub include_foreign_declarations: bool,
    /// Accept classes whose active fields share a serialized key.
    pub permit_duplicate_keys: bool,
}

/// Values supplied on the command line; unset fields leave lower layers
/// untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    /// Template file override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Utf8PathBuf>,
    /// Forces foreign declarations on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_foreign_declarations: Option<bool>,
    /// Forces duplicate keys to be accepted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permit_duplicate_keys: Option<bool>,
}

/// Loads the merged configuration.
///
/// # Errors
///
/// Returns [`CodegenError::Io`] when an explicit `config_path` cannot be
/// read, and [`CodegenError::Config`] when a layer holds values of the wrong
/// shape.
pub fn load(
    config_path: Option<&Utf8Path>,
    overrides: &ConfigOverrides,
) -> Result<GeneratorConfig, CodegenError> {
    let mut figment = Figment::from(Serialized::defaults(GeneratorConfig::default()));

    let file = match config_path {
        Some(path) => Some((path, fs::read_to_string(path)?)),
        None => {
            let path = Utf8Path::new(DEFAULT_CONFIG_FILE);
            fs::read_optional(path)?.map(|text| (path, text))
        }
    };
    if let Some((path, text)) = file {
        debug!(path = %path, "merging configuration file");
        figment = figment.merge(Toml::string(&text));
    }

    let config: GeneratorConfig = figment
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(Box::new)?;
    debug!(?config, "configuration loaded");
    Ok(config)
}
