//! Placeholder template engine and filesystem template loader.
//!
//! # Responsibility
//! - Compile `{{name}}` / `{{helper name}}` sources into renderers.
//! - Load template files from a templates directory.
//!
//! # Invariants
//! - Unknown placeholder names and helpers are rejected at load time.
//! - Missing `extra.<key>` values are rejected at render time.
//! - Literal text is emitted unchanged.

use crate::model::context::{builtin_placeholders, Lookup, RenderContext, PLACEHOLDER_EXTRA_PREFIX};
use crate::template::{Renderer, TemplateError, TemplateLoader, TemplateResult};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]*)\}\}").expect("valid template tag regex"));
static NON_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Value transform applied inside a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Helper {
    Slug,
    Upper,
    Lower,
    Trim,
}

impl Helper {
    fn parse(name: &str) -> TemplateResult<Self> {
        match name {
            "slug" => Ok(Self::Slug),
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            "trim" => Ok(Self::Trim),
            other => Err(TemplateError::UnknownHelper(other.to_string())),
        }
    }

    fn apply(self, value: &str) -> String {
        match self {
            Self::Slug => slugify(value),
            Self::Upper => value.to_uppercase(),
            Self::Lower => value.to_lowercase(),
            Self::Trim => value.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder {
        name: String,
        helper: Option<Helper>,
    },
}

/// Compiled placeholder template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTemplate {
    segments: Vec<Segment>,
}

impl PlaceholderTemplate {
    /// Compiles one template source.
    ///
    /// # Errors
    /// - `TemplateError::Parse` on unbalanced braces, empty tags, or unknown
    ///   placeholder names.
    /// - `TemplateError::UnknownHelper` on unsupported helper names.
    pub fn parse(source: &str) -> TemplateResult<Self> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for captures in TAG_RE.captures_iter(source) {
            let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            push_literal(&mut segments, &source[cursor..whole.start()])?;
            segments.push(parse_tag(inner.as_str())?);
            cursor = whole.end();
        }
        push_literal(&mut segments, &source[cursor..])?;

        Ok(Self { segments })
    }

    /// Placeholder names referenced by this template, in order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder { name, .. } => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }
}

impl Renderer for PlaceholderTemplate {
    fn render(&self, context: &RenderContext<'_>) -> TemplateResult<String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder { name, helper } => {
                    let value = match context.lookup(name) {
                        Lookup::Found(value) => value,
                        Lookup::MissingExtra | Lookup::Unknown => {
                            return Err(TemplateError::MissingPlaceholder(name.clone()));
                        }
                    };
                    match helper {
                        Some(helper) => out.push_str(&helper.apply(value)),
                        None => out.push_str(value),
                    }
                }
            }
        }
        Ok(out)
    }
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) -> TemplateResult<()> {
    if text.contains("{{") || text.contains("}}") {
        return Err(TemplateError::Parse(format!(
            "unbalanced braces near `{}`",
            text.trim()
        )));
    }
    if !text.is_empty() {
        segments.push(Segment::Literal(text.to_string()));
    }
    Ok(())
}

fn parse_tag(inner: &str) -> TemplateResult<Segment> {
    let words = inner.split_whitespace().collect::<Vec<_>>();
    let (helper, name) = match words.as_slice() {
        [name] => (None, *name),
        [helper, name] => (Some(Helper::parse(helper)?), *name),
        [] => return Err(TemplateError::Parse("empty tag `{{}}`".to_string())),
        _ => {
            return Err(TemplateError::Parse(format!(
                "too many words in tag `{{{{{}}}}}`",
                inner.trim()
            )))
        }
    };

    let is_extra = name
        .strip_prefix(PLACEHOLDER_EXTRA_PREFIX)
        .is_some_and(|key| !key.is_empty());
    if !is_extra && !builtin_placeholders().contains(&name) {
        return Err(TemplateError::Parse(format!("unknown placeholder `{name}`")));
    }

    Ok(Segment::Placeholder {
        name: name.to_string(),
        helper,
    })
}

/// Lowercase ASCII kebab-case form of `value`.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

/// Loads placeholder templates, resolving relative files against a
/// templates directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsTemplateLoader {
    templates_dir: PathBuf,
}

impl FsTemplateLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.templates_dir.join(path)
        }
    }
}

impl TemplateLoader for FsTemplateLoader {
    fn load(&self, source: &str) -> TemplateResult<Box<dyn Renderer>> {
        Ok(Box::new(PlaceholderTemplate::parse(source)?))
    }

    fn load_file(&self, path: &Path) -> TemplateResult<Box<dyn Renderer>> {
        let resolved = self.resolve(path);
        let source = std::fs::read_to_string(&resolved).map_err(|source| TemplateError::Io {
            path: resolved.clone(),
            source,
        })?;
        debug!(
            "event=template_load module=template status=ok path={}",
            resolved.display()
        );
        self.load(&source)
    }
}
