//! Errors of the note creation transaction.
//!
//! # Invariants
//! - Every variant renders with a `new note: ` prefix.
//! - Only path collisions are ever retried; everything here is terminal.

use crate::config::ConfigError;
use crate::template::TemplateError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type NoteResult<T> = Result<T, NoteError>;

/// Pipeline stage a failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteStage {
    /// Config validation and template loading.
    Load,
    /// Filename resolution loop.
    Resolve,
    /// Body rendering.
    Render,
    /// Persisting the note.
    Write,
}

impl NoteStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resolve => "resolve",
            Self::Render => "render",
            Self::Write => "write",
        }
    }
}

/// Which template failed to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Filename,
    Body,
}

impl Display for TemplateKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Filename => write!(f, "filename"),
            Self::Body => write!(f, "body"),
        }
    }
}

/// Create-operation error.
#[derive(Debug)]
pub enum NoteError {
    /// Directory config violates its invariants.
    Config(ConfigError),
    /// Filename or body template could not be loaded.
    TemplateLoad {
        template: TemplateKind,
        source: TemplateError,
    },
    /// Template rendering failed for the current context.
    TemplateRender {
        template: TemplateKind,
        source: TemplateError,
    },
    /// The existence check of a candidate path failed.
    Validation {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Every attempt produced an occupied path.
    CollisionExhausted { path: PathBuf, attempts: usize },
    /// Writing the note to disk failed.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NoteError {
    /// Stage that produced this error.
    pub fn stage(&self) -> NoteStage {
        match self {
            Self::Config(_) | Self::TemplateLoad { .. } => NoteStage::Load,
            Self::TemplateRender {
                template: TemplateKind::Filename,
                ..
            }
            | Self::Validation { .. }
            | Self::CollisionExhausted { .. } => NoteStage::Resolve,
            Self::TemplateRender {
                template: TemplateKind::Body,
                ..
            } => NoteStage::Render,
            Self::Write { .. } => NoteStage::Write,
        }
    }
}

impl Display for NoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "new note: ")?;
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::TemplateLoad { template, source } => {
                write!(f, "cannot load {template} template: {source}")
            }
            Self::TemplateRender { template, source } => {
                write!(f, "cannot render {template} template: {source}")
            }
            Self::Validation { path, source } => {
                write!(f, "cannot check `{}`: {source}", path.display())
            }
            Self::CollisionExhausted { path, .. } => {
                write!(f, "{}: note already exists", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for NoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::TemplateLoad { source, .. } | Self::TemplateRender { source, .. } => Some(source),
            Self::Validation { source, .. } | Self::Write { source, .. } => Some(source),
            Self::CollisionExhausted { .. } => None,
        }
    }
}

impl From<ConfigError> for NoteError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}
