//! Notebook configuration loading.
//!
//! # Responsibility
//! - Parse the notebook TOML file into note settings.
//! - Resolve the effective `DirectoryConfig` for one directory.
//!
//! # Invariants
//! - Unset fields fall back to `DirectoryConfig::default()`.
//! - Per-directory overrides replace `[note]` fields; extra maps merge with
//!   directory values winning.
//! - `directory()` only returns validated configs.

use crate::model::dir::{Directory, DirectoryConfig, IdCase, IdCharset};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Notebook-level directory holding config and templates.
pub const NOTEBOOK_DIR_NAME: &str = ".notegen";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const TEMPLATES_DIR_NAME: &str = "templates";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read config `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid config: {err}"),
            Self::Invalid(message) => write!(f, "invalid note config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        Self::Parse(value)
    }
}

/// `[note]` table; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NoteSection {
    pub filename: Option<String>,
    pub extension: Option<String>,
    /// Body template file, relative to the templates directory.
    pub template: Option<PathBuf>,
    pub default_title: Option<String>,
    pub id_length: Option<usize>,
    pub id_charset: Option<IdCharset>,
    pub id_case: Option<IdCase>,
}

impl NoteSection {
    fn apply_to(&self, config: &mut DirectoryConfig) {
        if let Some(filename) = &self.filename {
            config.filename_template = filename.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if let Some(template) = &self.template {
            config.body_template_path = Some(template.clone());
        }
        if let Some(title) = &self.default_title {
            config.default_title = title.clone();
        }
        if let Some(length) = self.id_length {
            config.id_options.length = length;
        }
        if let Some(charset) = &self.id_charset {
            config.id_options.charset = charset.clone();
        }
        if let Some(case) = self.id_case {
            config.id_options.case = case;
        }
    }
}

/// `[dir."<relative path>"]` override table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirSection {
    pub note: NoteSection,
    pub extra: BTreeMap<String, String>,
}

/// Parsed notebook configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotebookConfig {
    pub note: NoteSection,
    pub extra: BTreeMap<String, String>,
    pub dir: BTreeMap<String, DirSection>,
}

impl NotebookConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Effective settings for `relative` (notebook-root relative path).
    pub fn directory_config(&self, relative: &str) -> DirectoryConfig {
        let mut config = DirectoryConfig::default();
        self.note.apply_to(&mut config);
        config.extra = self.extra.clone();

        let name = normalize_dir_name(relative);
        if let Some(section) = self
            .dir
            .iter()
            .find(|(key, _)| normalize_dir_name(key) == name)
            .map(|(_, section)| section)
        {
            section.note.apply_to(&mut config);
            config
                .extra
                .extend(section.extra.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        config
    }

    /// Resolves a validated directory descriptor under `root`.
    ///
    /// # Errors
    /// - `ConfigError::Invalid` when the effective config breaks its
    ///   invariants or `relative` escapes the notebook.
    pub fn directory(&self, root: &Path, relative: &str) -> Result<Directory, ConfigError> {
        let name = normalize_dir_name(relative);
        if name.split('/').any(|part| part == "..") {
            return Err(ConfigError::Invalid(format!(
                "directory `{relative}` is outside the notebook"
            )));
        }

        let config = self.directory_config(&name);
        config.validate()?;
        let path = if name.is_empty() {
            root.to_path_buf()
        } else {
            root.join(&name)
        };
        Ok(Directory::new(path, name, config))
    }
}

/// Reads and parses a notebook config file.
pub fn load_notebook_config(path: &Path) -> Result<NotebookConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    NotebookConfig::from_toml_str(&source)
}

/// Loads `<root>/.notegen/config.toml`, or defaults when it is absent.
pub fn load_notebook_config_or_default(root: &Path) -> Result<NotebookConfig, ConfigError> {
    let path = config_path(root);
    let present = crate::fs::exists(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    if !present {
        return Ok(NotebookConfig::default());
    }
    load_notebook_config(&path)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(NOTEBOOK_DIR_NAME).join(CONFIG_FILE_NAME)
}

pub fn templates_dir(root: &Path) -> PathBuf {
    root.join(NOTEBOOK_DIR_NAME).join(TEMPLATES_DIR_NAME)
}

fn normalize_dir_name(relative: &str) -> String {
    relative
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::{
        config_path, load_notebook_config_or_default, normalize_dir_name, ConfigError,
        NotebookConfig, NOTEBOOK_DIR_NAME,
    };
    use crate::model::dir::{IdCase, IdCharset};
    use std::path::{Path, PathBuf};

    const SAMPLE: &str = r#"
[note]
filename = "{{id}}-{{slug title}}"
template = "default.md"
id-length = 6
id-charset = "hex"

[extra]
author = "Ana"
team = "core"

[dir."journal/daily".note]
filename = "{{id}}"
default-title = "Daily"
id-case = "upper"

[dir."journal/daily".extra]
team = "ops"
"#;

    #[test]
    fn note_section_replaces_defaults() {
        let config = NotebookConfig::from_toml_str(SAMPLE).unwrap();
        let root = config.directory_config("");
        assert_eq!(root.filename_template, "{{id}}-{{slug title}}");
        assert_eq!(root.extension, "md");
        assert_eq!(root.default_title, "Untitled");
        assert_eq!(root.body_template_path, Some(PathBuf::from("default.md")));
        assert_eq!(root.id_options.length, 6);
        assert_eq!(root.id_options.charset, IdCharset::Hex);
    }

    #[test]
    fn dir_override_wins_and_extra_maps_merge() {
        let config = NotebookConfig::from_toml_str(SAMPLE).unwrap();
        let daily = config.directory_config("./journal/daily/");
        assert_eq!(daily.filename_template, "{{id}}");
        assert_eq!(daily.default_title, "Daily");
        assert_eq!(daily.id_options.case, IdCase::Upper);
        assert_eq!(daily.id_options.length, 6);
        assert_eq!(daily.extra.get("author").map(String::as_str), Some("Ana"));
        assert_eq!(daily.extra.get("team").map(String::as_str), Some("ops"));
    }

    #[test]
    fn custom_charset_parses_as_literal_alphabet() {
        let config = NotebookConfig::from_toml_str("[note]\nid-charset = \"abc123\"\n").unwrap();
        assert_eq!(
            config.note.id_charset,
            Some(IdCharset::Custom("abc123".to_string()))
        );
    }

    #[test]
    fn directory_rejects_invalid_configs_and_escapes() {
        let config = NotebookConfig::from_toml_str("[note]\nextension = \"\"\n").unwrap();
        assert!(matches!(
            config.directory(Path::new("/nb"), "notes"),
            Err(ConfigError::Invalid(_))
        ));

        let config = NotebookConfig::default();
        assert!(matches!(
            config.directory(Path::new("/nb"), "../outside"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn directory_joins_root_and_keeps_relative_name() {
        let dir = NotebookConfig::default()
            .directory(Path::new("/nb"), "journal/")
            .unwrap();
        assert_eq!(dir.path, PathBuf::from("/nb/journal"));
        assert_eq!(dir.name, "journal");

        let root = NotebookConfig::default().directory(Path::new("/nb"), ".").unwrap();
        assert_eq!(root.path, PathBuf::from("/nb"));
        assert_eq!(root.name, "");
    }

    #[test]
    fn missing_config_file_loads_defaults() {
        let root = tempfile::tempdir().unwrap();
        let config = load_notebook_config_or_default(root.path()).unwrap();
        assert_eq!(config, NotebookConfig::default());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_config_location_is_an_io_error() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(NOTEBOOK_DIR_NAME), "not a directory").unwrap();

        let err = load_notebook_config_or_default(root.path())
            .expect_err("a failing existence check must not fall back to defaults");
        assert!(matches!(err, ConfigError::Io { path, .. } if path == config_path(root.path())));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            NotebookConfig::from_toml_str("[note]\nfilenme = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn normalize_dir_name_strips_dots_and_slashes() {
        assert_eq!(normalize_dir_name("./a//b/"), "a/b");
        assert_eq!(normalize_dir_name("."), "");
    }
}
