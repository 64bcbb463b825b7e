//! Note creation use-case.
//!
//! # Responsibility
//! - Compose a new note: context, unique path, rendered body.
//! - Load templates and persist the composed note (`create_note`).
//!
//! # Invariants
//! - The pipeline is linear: build, resolve, render, write.
//! - Nothing touches the filesystem before a composed note exists; on any
//!   failure no file is written.
//! - Errors surface unchanged apart from the `new note: ` context.

use crate::error::{NoteError, NoteResult, TemplateKind};
use crate::fs::{write_string, FsPathValidator, PathValidator};
use crate::id::{new_id_generator, IdGenerator};
use crate::model::context::RenderContext;
use crate::model::note::{CreateOptions, CreatedNote};
use crate::service::resolver::{FilenameResolver, RetryPolicy};
use crate::template::{NullRenderer, Renderer, TemplateLoader};
use log::{info, warn};
use std::path::PathBuf;

/// Orchestrates one creation transaction without performing I/O itself.
pub struct NoteComposer<'r, F: ?Sized, B: ?Sized, V: ?Sized> {
    filename_template: &'r F,
    body_template: &'r B,
    validator: &'r V,
    policy: RetryPolicy,
}

impl<'r, F, B, V> NoteComposer<'r, F, B, V>
where
    F: Renderer + ?Sized,
    B: Renderer + ?Sized,
    V: PathValidator + ?Sized,
{
    pub fn new(filename_template: &'r F, body_template: &'r B, validator: &'r V) -> Self {
        Self {
            filename_template,
            body_template,
            validator,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Builds the context, resolves a free path, then renders the body.
    pub fn compose<G>(&self, options: &CreateOptions, ids: &mut G) -> NoteResult<CreatedNote>
    where
        G: IdGenerator + ?Sized,
    {
        self.compose_counted(options, ids).map(|(note, _)| note)
    }

    /// Like `compose`, also returning how many identifiers were consumed.
    pub fn compose_counted<G>(
        &self,
        options: &CreateOptions,
        ids: &mut G,
    ) -> NoteResult<(CreatedNote, usize)>
    where
        G: IdGenerator + ?Sized,
    {
        let context = RenderContext::from_options(options);

        let resolved = FilenameResolver::new(self.filename_template, self.validator)
            .with_policy(self.policy)
            .resolve(&options.dir, &context, ids)?;

        let content = self
            .body_template
            .render(&resolved.context)
            .map_err(|source| NoteError::TemplateRender {
                template: TemplateKind::Body,
                source,
            })?;

        let note = CreatedNote {
            path: resolved.path,
            content,
        };
        Ok((note, resolved.attempts))
    }
}

/// Creates a new note on disk and returns its path.
///
/// # Errors
/// - `Config` when the directory config is invalid.
/// - `TemplateLoad` when a template cannot be loaded.
/// - `TemplateRender`, `Validation`, `CollisionExhausted` from composition.
/// - `Write` when persisting fails.
pub fn create_note<L>(options: &CreateOptions, loader: &L) -> NoteResult<PathBuf>
where
    L: TemplateLoader + ?Sized,
{
    let config = &options.dir.config;
    config.validate()?;

    let filename_template =
        loader
            .load(&config.filename_template)
            .map_err(|source| NoteError::TemplateLoad {
                template: TemplateKind::Filename,
                source,
            })?;

    let body_template: Box<dyn Renderer> = match config
        .body_template_path
        .as_deref()
        .filter(|path| !path.as_os_str().is_empty())
    {
        Some(path) => loader
            .load_file(path)
            .map_err(|source| NoteError::TemplateLoad {
                template: TemplateKind::Body,
                source,
            })?,
        None => Box::new(NullRenderer),
    };

    let mut ids = new_id_generator(&config.id_options);
    let (note, attempts) =
        NoteComposer::new(&*filename_template, &*body_template, &FsPathValidator)
            .compose_counted(options, &mut ids)
            .inspect_err(|err| {
                warn!(
                    "event=note_create module=note status=error stage={} dir={}",
                    err.stage().as_str(),
                    options.dir.path.display()
                )
            })?;

    write_string(&note.path, &note.content)
        .map_err(|source| NoteError::Write {
            path: note.path.clone(),
            source,
        })
        .inspect_err(|err| {
            warn!(
                "event=note_create module=note status=error stage={} path={}",
                err.stage().as_str(),
                note.path.display()
            )
        })?;

    info!(
        "event=note_create module=note status=ok path={} attempts={}",
        note.path.display(),
        attempts
    );
    Ok(note.path)
}
