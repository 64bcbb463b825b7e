//! Directory descriptor and per-directory note settings.
//!
//! # Responsibility
//! - Describe where a new note lands and how its name/body are rendered.
//! - Carry identifier generation options for the directory.
//!
//! # Invariants
//! - `extension` is non-empty.
//! - `filename_template` is non-empty.
//! - `id_options.length` is greater than zero.
//!
//! # See also
//! - crate::config for TOML loading and per-directory overrides.

use crate::config::ConfigError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const DEFAULT_FILENAME_TEMPLATE: &str = "{{id}}";
pub const DEFAULT_EXTENSION: &str = "md";
pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_ID_LENGTH: usize = 4;

/// Character set used to draw identifier characters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdCharset {
    /// Digits plus ASCII letters of both cases.
    #[default]
    Alphanum,
    /// Lowercase hexadecimal digits.
    Hex,
    /// ASCII letters of both cases.
    Letters,
    /// Decimal digits.
    Numbers,
    /// Caller-provided alphabet.
    #[serde(untagged)]
    Custom(String),
}

impl IdCharset {
    /// Returns the alphabet drawn from when generating.
    pub fn alphabet(&self) -> &str {
        match self {
            Self::Alphanum => "0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Hex => "0123456789abcdef",
            Self::Letters => "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Numbers => "0123456789",
            Self::Custom(chars) => chars.as_str(),
        }
    }
}

/// Letter case applied to generated identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdCase {
    #[default]
    Lower,
    Upper,
    /// Keeps the case drawn from the charset.
    Mixed,
}

/// Identifier generation options for one directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct IdOptions {
    pub length: usize,
    pub charset: IdCharset,
    pub case: IdCase,
}

impl Default for IdOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_ID_LENGTH,
            charset: IdCharset::default(),
            case: IdCase::default(),
        }
    }
}

/// Effective note settings of one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
    /// Template source rendered into the file name (without extension).
    pub filename_template: String,
    /// Optional body template file; relative paths resolve against the
    /// loader's template directory.
    pub body_template_path: Option<PathBuf>,
    /// File extension appended after a literal `.`.
    pub extension: String,
    /// Title used when the caller does not provide one.
    pub default_title: String,
    pub id_options: IdOptions,
    /// Extra values exposed to templates as `extra.<key>`.
    pub extra: BTreeMap<String, String>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            body_template_path: None,
            extension: DEFAULT_EXTENSION.to_string(),
            default_title: DEFAULT_TITLE.to_string(),
            id_options: IdOptions::default(),
            extra: BTreeMap::new(),
        }
    }
}

impl DirectoryConfig {
    /// Checks the structural invariants of this config.
    ///
    /// # Errors
    /// - `ConfigError::Invalid` on empty extension or filename template.
    /// - `ConfigError::Invalid` on zero id length or empty custom charset.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.extension.trim().is_empty() {
            return Err(ConfigError::Invalid("extension cannot be empty".to_string()));
        }
        if self.filename_template.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "filename template cannot be empty".to_string(),
            ));
        }
        if self.id_options.length == 0 {
            return Err(ConfigError::Invalid(
                "id length must be greater than zero".to_string(),
            ));
        }
        if self.id_options.charset.alphabet().is_empty() {
            return Err(ConfigError::Invalid("id charset cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Target directory of a create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    /// Base path new notes are joined onto.
    pub path: PathBuf,
    /// Display name relative to the notebook root (`""` for the root).
    pub name: String,
    pub config: DirectoryConfig,
}

impl Directory {
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, config: DirectoryConfig) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            config,
        }
    }
}
