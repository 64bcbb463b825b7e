//! Unique note path resolution.
//!
//! # Responsibility
//! - Combine fresh identifiers with the filename template until a free
//!   path is found.
//! - Populate filename fields of the render context on success.
//!
//! # Invariants
//! - At most `RetryPolicy::max_attempts` identifiers are generated.
//! - Only "path occupied" is retried; render and validation failures abort.
//! - The returned context always has `filename` and `filename_stem` set.

use crate::error::{NoteError, NoteResult, TemplateKind};
use crate::fs::{filename, filename_stem, join_under, PathValidator};
use crate::id::IdGenerator;
use crate::model::context::RenderContext;
use crate::model::dir::Directory;
use crate::template::Renderer;
use log::{debug, warn};
use std::path::PathBuf;

/// Upper bound of identifier attempts per create call.
pub const MAX_ATTEMPTS: usize = 50;

/// Bounded retry policy for filename collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
}

impl RetryPolicy {
    /// Builds a policy; zero is bumped to a single attempt.
    pub fn new(max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Whether a validation outcome should trigger another attempt.
    pub fn should_retry(&self, is_free: bool, attempt: usize) -> bool {
        !is_free && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(MAX_ATTEMPTS)
    }
}

/// Free path plus the context it was rendered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'a> {
    pub path: PathBuf,
    pub context: RenderContext<'a>,
    /// Number of identifiers consumed, including the successful one.
    pub attempts: usize,
}

/// Resolves a free path for a new note inside one directory.
pub struct FilenameResolver<'r, R: ?Sized, V: ?Sized> {
    template: &'r R,
    validator: &'r V,
    policy: RetryPolicy,
}

impl<'r, R, V> FilenameResolver<'r, R, V>
where
    R: Renderer + ?Sized,
    V: PathValidator + ?Sized,
{
    pub fn new(template: &'r R, validator: &'r V) -> Self {
        Self {
            template,
            validator,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs the resolution loop.
    ///
    /// # Errors
    /// - `TemplateRender` when the filename template fails; never retried.
    /// - `Validation` when the existence check fails; never retried.
    /// - `CollisionExhausted` with the last candidate after the final attempt.
    pub fn resolve<'a, G>(
        &self,
        dir: &Directory,
        context: &RenderContext<'a>,
        ids: &mut G,
    ) -> NoteResult<ResolvedPath<'a>>
    where
        G: IdGenerator + ?Sized,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let candidate = context.with_id(ids.generate());

            let rendered =
                self.template
                    .render(&candidate)
                    .map_err(|source| NoteError::TemplateRender {
                        template: TemplateKind::Filename,
                        source,
                    })?;
            let path = join_under(&dir.path, &format!("{rendered}.{}", dir.config.extension));

            let is_free = self
                .validator
                .is_free(&path)
                .map_err(|source| NoteError::Validation {
                    path: path.clone(),
                    source,
                })?;

            if is_free {
                debug!(
                    "event=path_resolved module=resolver status=ok attempts={} path={}",
                    attempt,
                    path.display()
                );
                let context = candidate.with_filename(filename(&path), filename_stem(&path));
                return Ok(ResolvedPath {
                    path,
                    context,
                    attempts: attempt,
                });
            }

            if !self.policy.should_retry(is_free, attempt) {
                warn!(
                    "event=path_exhausted module=resolver status=error attempts={} path={}",
                    attempt,
                    path.display()
                );
                return Err(NoteError::CollisionExhausted {
                    path,
                    attempts: attempt,
                });
            }
            debug!(
                "event=path_collision module=resolver status=retry attempt={} path={}",
                attempt,
                path.display()
            );
        }
    }
}
