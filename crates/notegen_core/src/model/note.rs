//! Input and output values of one create operation.

use crate::model::dir::Directory;
use std::path::PathBuf;

/// Options of one create call. Read-only for the whole operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Fully resolved target directory.
    pub dir: Directory,
    /// Note title; empty or absent falls back to the directory default.
    pub title: Option<String>,
    /// Initial content injected into the body template.
    pub content: Option<String>,
}

impl CreateOptions {
    pub fn new(dir: Directory) -> Self {
        Self {
            dir,
            title: None,
            content: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A composed note, ready to be persisted.
///
/// Only ever built on success, so both fields are always valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedNote {
    pub path: PathBuf,
    pub content: String,
}
