use notegen_core::{
    CreateOptions, Directory, DirectoryConfig, NoteComposer, NoteError, NoteStage,
    PlaceholderTemplate, RenderContext, TemplateError, TemplateKind, MAX_ATTEMPTS,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

fn notes_dir() -> Directory {
    let mut config = DirectoryConfig {
        default_title: "Untitled".to_string(),
        ..DirectoryConfig::default()
    };
    config
        .extra
        .insert("author".to_string(), "Ana".to_string());
    Directory::new("/notes", "", config)
}

fn template(source: &str) -> PlaceholderTemplate {
    PlaceholderTemplate::parse(source).expect("test template should parse")
}

/// Generator yielding a scripted sequence and counting calls.
fn scripted_ids<'a>(ids: &'a [&'a str], calls: &'a Cell<usize>) -> impl FnMut() -> String + 'a {
    move || {
        let index = calls.get();
        calls.set(index + 1);
        ids.get(index).copied().unwrap_or("overflow").to_string()
    }
}

/// Validator backed by an in-memory set of occupied paths.
fn occupied(paths: &[&str]) -> impl Fn(&Path) -> io::Result<bool> {
    let taken = paths.iter().map(PathBuf::from).collect::<HashSet<_>>();
    move |path: &Path| Ok(!taken.contains(path))
}

#[test]
fn free_first_candidate_yields_path_and_body() {
    let filename = template("20230101-{{id}}");
    let body = template("# {{title}}\nstem={{filename-stem}} file={{filename}} id={{id}}");
    let validator = occupied(&[]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["abcd"], &calls);

    let options = CreateOptions::new(notes_dir()).with_title("My Note");
    let note = NoteComposer::new(&filename, &body, &validator)
        .compose(&options, &mut ids)
        .unwrap();

    assert_eq!(note.path, PathBuf::from("/notes/20230101-abcd.md"));
    assert_eq!(
        note.content,
        "# My Note\nstem=20230101-abcd file=20230101-abcd.md id=abcd"
    );
    assert_eq!(calls.get(), 1);
}

#[test]
fn occupied_candidate_is_retried_with_the_next_identifier() {
    let filename = template("20230101-{{id}}");
    let body = template("{{filename-stem}}");
    let validator = occupied(&["/notes/20230101-abcd.md"]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["abcd", "efgh"], &calls);

    let options = CreateOptions::new(notes_dir());
    let note = NoteComposer::new(&filename, &body, &validator)
        .compose(&options, &mut ids)
        .unwrap();

    assert_eq!(note.path, PathBuf::from("/notes/20230101-efgh.md"));
    assert_eq!(note.content, "20230101-efgh");
    assert_eq!(calls.get(), 2);
}

#[test]
fn k_collisions_consume_exactly_k_plus_one_identifiers() {
    let ids_owned = (0..MAX_ATTEMPTS).map(|i| format!("id{i}")).collect::<Vec<_>>();
    let ids_ref = ids_owned.iter().map(String::as_str).collect::<Vec<_>>();
    let filename = template("{{id}}");

    for k in [0, 1, 7, MAX_ATTEMPTS - 1] {
        let taken = (0..k).map(|i| format!("/notes/id{i}.md")).collect::<Vec<_>>();
        let taken_ref = taken.iter().map(String::as_str).collect::<Vec<_>>();
        let validator = occupied(&taken_ref);
        let calls = Cell::new(0);
        let mut ids = scripted_ids(&ids_ref, &calls);

        let options = CreateOptions::new(notes_dir());
        let note = NoteComposer::new(&filename, &notegen_core::NullRenderer, &validator)
            .compose(&options, &mut ids)
            .unwrap();

        assert_eq!(note.path, PathBuf::from(format!("/notes/id{k}.md")));
        assert_eq!(calls.get(), k + 1, "k = {k}");
        assert_eq!(note.content, "");
    }
}

#[test]
fn exhaustion_stops_after_fifty_attempts_with_last_path() {
    let filename = template("{{id}}");
    let checks = Cell::new(0);
    let validator = |_: &Path| -> io::Result<bool> {
        checks.set(checks.get() + 1);
        Ok(false)
    };
    let ids_owned = (0..MAX_ATTEMPTS + 10).map(|i| format!("id{i}")).collect::<Vec<_>>();
    let ids_ref = ids_owned.iter().map(String::as_str).collect::<Vec<_>>();
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&ids_ref, &calls);

    let options = CreateOptions::new(notes_dir());
    let err = NoteComposer::new(&filename, &notegen_core::NullRenderer, &validator)
        .compose(&options, &mut ids)
        .unwrap_err();

    match &err {
        NoteError::CollisionExhausted { path, attempts } => {
            assert_eq!(path, &PathBuf::from("/notes/id49.md"));
            assert_eq!(*attempts, 50);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.get(), 50);
    assert_eq!(checks.get(), 50);
    assert_eq!(err.stage(), NoteStage::Resolve);
}

#[test]
fn empty_title_uses_directory_default() {
    let filename = template("{{id}}");
    let body = template("{{title}}|{{content}}|{{extra.author}}");
    let validator = occupied(&[]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a"], &calls);

    let options = CreateOptions::new(notes_dir()).with_title("");
    let note = NoteComposer::new(&filename, &body, &validator)
        .compose(&options, &mut ids)
        .unwrap();
    assert_eq!(note.content, "Untitled||Ana");
}

#[test]
fn filename_fields_are_empty_before_resolution_and_set_together_after() {
    let seen = RefCell::new(Vec::new());
    let filename = |context: &RenderContext<'_>| -> Result<String, TemplateError> {
        seen.borrow_mut().push((
            context.filename().to_string(),
            context.filename_stem().to_string(),
        ));
        Ok(context.id().to_string())
    };
    let body = |context: &RenderContext<'_>| -> Result<String, TemplateError> {
        assert!(context.is_resolved());
        Ok(format!("{}:{}", context.filename(), context.filename_stem()))
    };
    let validator = occupied(&["/notes/one.md"]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["one", "two"], &calls);

    let options = CreateOptions::new(notes_dir());
    let note = NoteComposer::new(&filename, &body, &validator)
        .compose(&options, &mut ids)
        .unwrap();

    assert_eq!(note.content, "two.md:two");
    for (name, stem) in seen.borrow().iter() {
        assert!(name.is_empty());
        assert!(stem.is_empty());
    }
    assert_eq!(seen.borrow().len(), 2);
}

#[test]
fn filename_render_failure_aborts_without_validation() {
    let filename = template("{{id}}-{{extra.missing}}");
    let checks = Cell::new(0);
    let validator = |_: &Path| -> io::Result<bool> {
        checks.set(checks.get() + 1);
        Ok(true)
    };
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a", "b"], &calls);

    let options = CreateOptions::new(notes_dir());
    let err = NoteComposer::new(&filename, &notegen_core::NullRenderer, &validator)
        .compose(&options, &mut ids)
        .unwrap_err();

    assert!(matches!(
        err,
        NoteError::TemplateRender {
            template: TemplateKind::Filename,
            source: TemplateError::MissingPlaceholder(_),
        }
    ));
    assert_eq!(calls.get(), 1);
    assert_eq!(checks.get(), 0);
}

#[test]
fn validator_failure_is_not_retried() {
    let filename = template("{{id}}");
    let validator = |_: &Path| -> io::Result<bool> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    };
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a", "b"], &calls);

    let options = CreateOptions::new(notes_dir());
    let err = NoteComposer::new(&filename, &notegen_core::NullRenderer, &validator)
        .compose(&options, &mut ids)
        .unwrap_err();

    match &err {
        NoteError::Validation { path, source } => {
            assert_eq!(path, &PathBuf::from("/notes/a.md"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(calls.get(), 1);
    assert!(err.to_string().starts_with("new note: "));
}

#[test]
fn body_render_failure_is_tagged_with_render_stage() {
    let filename = template("{{id}}");
    let body = template("{{extra.missing}}");
    let validator = occupied(&[]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a"], &calls);

    let options = CreateOptions::new(notes_dir());
    let err = NoteComposer::new(&filename, &body, &validator)
        .compose(&options, &mut ids)
        .unwrap_err();
    assert_eq!(err.stage(), NoteStage::Render);
}

#[test]
fn empty_rendered_filename_is_still_validated() {
    let filename = template("{{filename}}");
    let seen = RefCell::new(Vec::new());
    let validator = |path: &Path| -> io::Result<bool> {
        seen.borrow_mut().push(path.to_path_buf());
        Ok(true)
    };
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a"], &calls);

    let options = CreateOptions::new(notes_dir());
    let note = NoteComposer::new(&filename, &template("[{{filename-stem}}]"), &validator)
        .compose(&options, &mut ids)
        .unwrap();

    assert_eq!(note.path, PathBuf::from("/notes/.md"));
    assert_eq!(note.content, "[]");
    assert_eq!(seen.borrow().as_slice(), [PathBuf::from("/notes/.md")]);
}

#[test]
fn absolute_looking_filename_stays_under_the_directory() {
    let filename = template("{{title}}");
    let validator = occupied(&[]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a"], &calls);

    let options = CreateOptions::new(notes_dir()).with_title("/tmp/escaped");
    let note = NoteComposer::new(&filename, &template("{{filename}}"), &validator)
        .compose(&options, &mut ids)
        .unwrap();

    assert_eq!(note.path, PathBuf::from("/notes/tmp/escaped.md"));
    assert_eq!(note.content, "escaped.md");
}

#[test]
fn compose_counted_reports_consumed_identifiers() {
    let filename = template("{{id}}");
    let validator = occupied(&["/notes/a.md", "/notes/b.md"]);
    let calls = Cell::new(0);
    let mut ids = scripted_ids(&["a", "b", "c"], &calls);

    let options = CreateOptions::new(notes_dir());
    let (note, attempts) = NoteComposer::new(&filename, &notegen_core::NullRenderer, &validator)
        .compose_counted(&options, &mut ids)
        .unwrap();

    assert_eq!(note.path, PathBuf::from("/notes/c.md"));
    assert_eq!(attempts, 3);
    assert_eq!(attempts, calls.get());
}
