//! Placeholder values consumed by note templates.
//!
//! # Responsibility
//! - Build the initial context from create options.
//! - Derive new context values for each pipeline stage.
//!
//! # Invariants
//! - `id`, `filename` and `filename_stem` are empty until a path resolves.
//! - `filename` and `filename_stem` are only ever set together.
//! - The extra map is borrowed read-only from the directory config.

use crate::model::note::CreateOptions;
use std::collections::BTreeMap;

/// Placeholder name for the generated identifier.
pub const PLACEHOLDER_ID: &str = "id";
pub const PLACEHOLDER_TITLE: &str = "title";
pub const PLACEHOLDER_CONTENT: &str = "content";
pub const PLACEHOLDER_DIR: &str = "dir";
pub const PLACEHOLDER_FILENAME: &str = "filename";
pub const PLACEHOLDER_FILENAME_STEM: &str = "filename-stem";
/// Prefix of extra placeholders, e.g. `extra.author`.
pub const PLACEHOLDER_EXTRA_PREFIX: &str = "extra.";

const BUILTIN_PLACEHOLDERS: &[&str] = &[
    PLACEHOLDER_ID,
    PLACEHOLDER_TITLE,
    PLACEHOLDER_CONTENT,
    PLACEHOLDER_DIR,
    PLACEHOLDER_FILENAME,
    PLACEHOLDER_FILENAME_STEM,
];

/// Returns the built-in placeholder names.
pub fn builtin_placeholders() -> &'static [&'static str] {
    BUILTIN_PLACEHOLDERS
}

/// Result of looking up one placeholder name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'v> {
    Found(&'v str),
    /// `extra.<key>` with a key absent from the extra map.
    MissingExtra,
    /// Not a placeholder name at all.
    Unknown,
}

/// Render context threaded through one create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext<'a> {
    id: String,
    title: String,
    content: String,
    dir: String,
    filename: String,
    filename_stem: String,
    extra: &'a BTreeMap<String, String>,
}

impl<'a> RenderContext<'a> {
    /// Builds the initial context for one create call.
    ///
    /// Title falls back to the directory default when absent or empty;
    /// content falls back to the empty string.
    pub fn from_options(options: &'a CreateOptions) -> Self {
        let config = &options.dir.config;
        let title = options
            .title
            .as_deref()
            .filter(|title| !title.is_empty())
            .unwrap_or(config.default_title.as_str());

        Self {
            id: String::new(),
            title: title.to_string(),
            content: options.content.clone().unwrap_or_default(),
            dir: options.dir.name.clone(),
            filename: String::new(),
            filename_stem: String::new(),
            extra: &config.extra,
        }
    }

    /// Returns a copy carrying a fresh identifier.
    ///
    /// Filename fields of a previous attempt never carry over.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            filename: String::new(),
            filename_stem: String::new(),
            ..self.clone()
        }
    }

    /// Returns a copy with both filename fields populated.
    pub fn with_filename(self, filename: impl Into<String>, stem: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            filename_stem: stem.into(),
            ..self
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn filename_stem(&self) -> &str {
        &self.filename_stem
    }

    pub fn extra(&self) -> &BTreeMap<String, String> {
        self.extra
    }

    /// Whether filename and stem have been populated by resolution.
    ///
    /// The stem may legitimately be empty (`.md`); the filename never is.
    pub fn is_resolved(&self) -> bool {
        !self.filename.is_empty()
    }

    /// Looks up a placeholder by its template name.
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        if let Some(key) = name.strip_prefix(PLACEHOLDER_EXTRA_PREFIX) {
            return match self.extra.get(key) {
                Some(value) => Lookup::Found(value.as_str()),
                None => Lookup::MissingExtra,
            };
        }

        match name {
            PLACEHOLDER_ID => Lookup::Found(&self.id),
            PLACEHOLDER_TITLE => Lookup::Found(&self.title),
            PLACEHOLDER_CONTENT => Lookup::Found(&self.content),
            PLACEHOLDER_DIR => Lookup::Found(&self.dir),
            PLACEHOLDER_FILENAME => Lookup::Found(&self.filename),
            PLACEHOLDER_FILENAME_STEM => Lookup::Found(&self.filename_stem),
            _ => Lookup::Unknown,
        }
    }
}
