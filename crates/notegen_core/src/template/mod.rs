//! Template contracts used by the note pipeline.
//!
//! # Responsibility
//! - Define the `Renderer` capability shared by filename and body templates.
//! - Define the `TemplateLoader` seam that turns sources/files into renderers.
//!
//! # Invariants
//! - Rendering never mutates the context.
//! - `NullRenderer` always renders the empty string.
//!
//! # See also
//! - `engine` for the placeholder implementation.

use crate::model::context::RenderContext;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub mod engine;

pub type TemplateResult<T> = Result<T, TemplateError>;

/// Template load/render failure.
#[derive(Debug)]
pub enum TemplateError {
    /// Template source is malformed.
    Parse(String),
    /// Template file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Placeholder has no value in the render context.
    MissingPlaceholder(String),
    /// Helper name is not supported.
    UnknownHelper(String),
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid template: {message}"),
            Self::Io { path, source } => {
                write!(f, "cannot read template `{}`: {source}", path.display())
            }
            Self::MissingPlaceholder(name) => write!(f, "missing value for placeholder `{name}`"),
            Self::UnknownHelper(name) => write!(f, "unknown template helper `{name}`"),
        }
    }
}

impl Error for TemplateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Expands a render context into a string.
pub trait Renderer {
    fn render(&self, context: &RenderContext<'_>) -> TemplateResult<String>;
}

impl<F> Renderer for F
where
    F: Fn(&RenderContext<'_>) -> TemplateResult<String>,
{
    fn render(&self, context: &RenderContext<'_>) -> TemplateResult<String> {
        self(context)
    }
}

/// Renderer used when a directory has no body template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&self, _context: &RenderContext<'_>) -> TemplateResult<String> {
        Ok(String::new())
    }
}

/// Builds renderers from inline sources or template files.
pub trait TemplateLoader {
    /// Compiles an inline template source.
    fn load(&self, source: &str) -> TemplateResult<Box<dyn Renderer>>;
    /// Reads and compiles a template file.
    fn load_file(&self, path: &Path) -> TemplateResult<Box<dyn Renderer>>;
}
