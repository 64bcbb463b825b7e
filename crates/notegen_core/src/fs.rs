//! Filesystem helpers and candidate path validation.
//!
//! # Responsibility
//! - Report whether a candidate note path is free.
//! - Persist rendered note content.
//!
//! # Invariants
//! - "Free" is a snapshot; nothing is locked or reserved.
//! - A failing existence check is an error, never "occupied".

use std::io;
use std::path::{Component, Path, PathBuf};

/// Judges whether a candidate path may be used for a new note.
pub trait PathValidator {
    /// Returns `Ok(true)` when nothing exists at `path`.
    fn is_free(&self, path: &Path) -> io::Result<bool>;
}

impl<F> PathValidator for F
where
    F: Fn(&Path) -> io::Result<bool>,
{
    fn is_free(&self, path: &Path) -> io::Result<bool> {
        self(path)
    }
}

/// Validator backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FsPathValidator;

impl PathValidator for FsPathValidator {
    fn is_free(&self, path: &Path) -> io::Result<bool> {
        exists(path).map(|exists| !exists)
    }
}

/// Whether anything (file, directory, dangling symlink) exists at `path`.
pub fn exists(path: &Path) -> io::Result<bool> {
    match std::fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Writes `content` to `path`, creating missing parent directories.
pub fn write_string(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Joins `name` onto `base`, dropping root and prefix components so an
/// absolute-looking name never replaces the base.
pub fn join_under(base: &Path, name: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) | Component::CurDir | Component::ParentDir => {
                path.push(component)
            }
            Component::RootDir | Component::Prefix(_) => {}
        }
    }
    path
}

/// Base name of `path` without its final extension.
///
/// Unlike `Path::file_stem`, a leading dot counts as an extension
/// separator, so `.md` has an empty stem.
pub fn filename_stem(path: &Path) -> String {
    let name = filename(path);
    match name.rfind('.') {
        Some(index) => name[..index].to_string(),
        None => name,
    }
}

/// Base name of `path`.
pub fn filename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
