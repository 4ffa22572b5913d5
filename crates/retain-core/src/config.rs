//! Processor configuration from `retain.toml` and host `key=value` options.

use std::path::{Path, PathBuf};

use retain_model::ProcessorOptions;
use tracing::debug;

/// File name looked up next to the symbol snapshot.
pub const CONFIG_FILE_NAME: &str = "retain.toml";

/// Host option keys, as passed by the build system.
pub mod keys {
    pub const IS_DEPENDENCY: &str = "retain.isDependency";
    pub const DEBUG_LOGGING: &str = "retain.debugLogging";
    pub const PACKAGE: &str = "retain.package";
    pub const EMIT_RUNTIME: &str = "retain.emitRuntime";
    pub const ACTIVITY_BASE: &str = "retain.activityBase";
    pub const FRAGMENT_BASE: &str = "retain.fragmentBase";
    pub const MAX_PASSES: &str = "retain.maxPasses";
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for option {key}")]
    InvalidOption { key: String, value: String },

    #[error("unknown option {key}")]
    UnknownOption { key: String },

    #[error("malformed option {input:?}, expected key=value")]
    MalformedOption { input: String },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidOption {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub fn load_options(path: &Path) -> Result<ProcessorOptions> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let options = options_from_str(&text, path)?;
    debug!(path = %path.display(), package = %options.package, "loaded processor options");
    Ok(options)
}

/// Parses TOML text; `path` is only used in errors.
pub fn options_from_str(text: &str, path: &Path) -> Result<ProcessorOptions> {
    toml::from_str(text).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies one host option onto `options`.
pub fn apply_option(options: &mut ProcessorOptions, key: &str, value: &str) -> Result<()> {
    let value = value.trim();
    match key.trim() {
        keys::IS_DEPENDENCY => options.is_dependency = parse_bool(key, value)?,
        keys::DEBUG_LOGGING => options.debug_logging = parse_bool(key, value)?,
        keys::EMIT_RUNTIME => options.emit_runtime = parse_bool(key, value)?,
        keys::PACKAGE => {
            if !is_package_name(value) {
                return Err(ConfigError::invalid(key, value));
            }
            options.package = value.to_string();
        }
        keys::ACTIVITY_BASE => options.activity_base = Some(value.to_string()),
        keys::FRAGMENT_BASE => options.fragment_base = Some(value.to_string()),
        keys::MAX_PASSES => {
            options.max_passes = value
                .parse()
                .ok()
                .filter(|passes| *passes > 0)
                .ok_or_else(|| ConfigError::invalid(key, value))?;
        }
        other => {
            return Err(ConfigError::UnknownOption {
                key: other.to_string(),
            });
        }
    }
    Ok(())
}

/// Splits `key=value` and applies it.
pub fn apply_option_str(options: &mut ProcessorOptions, input: &str) -> Result<()> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| ConfigError::MalformedOption {
            input: input.to_string(),
        })?;
    apply_option(options, key, value)
}

pub fn apply_options<'a>(
    options: &mut ProcessorOptions,
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<()> {
    for (key, value) in pairs {
        apply_option(options, key, value)?;
    }
    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::invalid(key, value))
    }
}

fn is_package_name(value: &str) -> bool {
    !value.is_empty()
        && value.split('.').all(|segment| {
            let mut chars = segment.chars();
            chars
                .next()
                .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}
