//! Core note-creation engine for notegen.
//! This crate owns the single-shot "create a note" transaction.

pub mod config;
pub mod error;
pub mod fs;
pub mod id;
pub mod logging;
pub mod model;
pub mod service;
pub mod template;

pub use config::{
    load_notebook_config, load_notebook_config_or_default, ConfigError, NotebookConfig,
};
pub use error::{NoteError, NoteResult, NoteStage, TemplateKind};
pub use fs::{FsPathValidator, PathValidator};
pub use id::{new_id_generator, IdGenerator, RandomIdGenerator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::context::RenderContext;
pub use model::dir::{Directory, DirectoryConfig, IdCase, IdCharset, IdOptions};
pub use model::note::{CreateOptions, CreatedNote};
pub use service::note_service::{create_note, NoteComposer};
pub use service::resolver::{FilenameResolver, ResolvedPath, RetryPolicy, MAX_ATTEMPTS};
pub use template::engine::{FsTemplateLoader, PlaceholderTemplate};
pub use template::{NullRenderer, Renderer, TemplateError, TemplateLoader};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
