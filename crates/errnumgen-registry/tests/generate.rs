mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use common::{commit, declared, generate, read, write_tree};
use errnumgen_core::SourceReader;
use errnumgen_error::ErrorKind;
use errnumgen_registry::{GenOptions, Generator};
use pretty_assertions::assert_eq;

const SINGLE: &str = r#"
    package a

    import "errors"

    func f() (string, error) {
        return "", errors.New("bad")
    }
"#;

#[test]
fn wraps_single_error_return() {
    let dir = write_tree(&[("a.go", SINGLE)]);
    let output = generate(dir.path());

    assert_eq!(output.new_sites, 1);
    assert_eq!(output.recovered_max, 0);
    assert_eq!(output.counter, 1);
    assert_eq!(declared(&output.registry), vec!["N_1 = 1"]);
    assert_eq!(output.out_path, dir.path().join("errnums").join("errnums.go"));

    let (path, content) = output.sources.iter().next().unwrap();
    assert!(path.ends_with("a.go"));
    assert_eq!(
        content.as_str(),
        "package a\n\nimport \"errors\"\n\nfunc f() (string, error) {\n    return \"\", errnums.New(errnums.N_1, errors.New(\"bad\"))\n}\n"
    );
}

#[test]
fn second_run_is_a_no_op() {
    let dir = write_tree(&[("a.go", SINGLE)]);
    let first = generate(dir.path());
    let registry = first.registry.clone();
    commit(first);
    let rewritten = read(dir.path(), "a.go");

    let second = generate(dir.path());
    assert!(second.is_unchanged());
    assert!(second.sources.is_empty());
    assert_eq!(second.already_wrapped, 1);
    assert_eq!(second.recovered_max, 1);
    assert_eq!(second.registry, registry);

    commit(second);
    assert_eq!(read(dir.path(), "a.go"), rewritten);
}

/// Generate and commit `root`, then generate again: the second run must find
/// every first-run site already wrapped and leave the tree as committed.
fn assert_rerun_is_stable(root: &Path, new_sites: usize) {
    let first = generate(root);
    assert_eq!(first.new_sites, new_sites);
    let registry = first.registry.clone();
    let paths: Vec<PathBuf> = first.sources.keys().cloned().collect();
    commit(first);
    let committed: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();

    let second = generate(root);
    assert_eq!(second.new_sites, 0);
    assert!(second.sources.is_empty());
    assert_eq!(second.already_wrapped, new_sites);
    assert_eq!(second.counter, new_sites as u32);
    assert_eq!(second.registry, registry);

    commit(second);
    let after: Vec<String> = paths.iter().map(|p| fs::read_to_string(p).unwrap()).collect();
    assert_eq!(after, committed);
}

#[test]
fn literal_inside_wrapped_value_stays_untouched_on_rerun() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        import "errors"

        func wrapped() error {
            return run(func() error { return errors.New("hidden") })
        }

        func run(f func() error) error { return f() }
        "#,
    )]);
    let first = generate(dir.path());
    let content = first.sources.values().next().unwrap();
    assert!(content.contains(
        r#"return errnums.New(errnums.N_1, run(func() error { return errors.New("hidden") }))"#
    ));
    assert!(content.contains("return errnums.New(errnums.N_2, f())"));

    assert_rerun_is_stable(dir.path(), 2);
    assert!(!read(dir.path(), "a.go").contains("N_3"));
}

#[test]
fn returned_literals_are_stable_on_rerun() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        import "errors"

        func handler() (func() error, error) {
            return func() error { return errors.New("later") }, nil
        }

        func wrapped() error {
            return run(func() error { return errors.New("hidden") })
        }

        func run(f func() error) error { return f() }
        "#,
    )]);
    assert_rerun_is_stable(dir.path(), 3);
    let content = read(dir.path(), "a.go");
    assert!(content.contains(r#"return errnums.New(errnums.N_1, errors.New("later"))"#));
    assert!(content.contains(r#"return errors.New("hidden")"#));
}

#[test]
fn nested_layouts_are_stable_on_rerun() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        func outer() (int, error) {
            inner := func() (error, string) {
                return errInner, "x"
            }
            _ = inner
            return 0, errOuter
        }
        "#,
    )]);
    assert_rerun_is_stable(dir.path(), 2);
}

#[test]
fn numbering_follows_file_then_source_order() {
    let dir = write_tree(&[
        (
            "b.go",
            r#"
            package a

            func g() error {
                return errG()
            }
            "#,
        ),
        (
            "a.go",
            r#"
            package a

            func f(x int) error {
                if x > 0 {
                    return errPositive()
                }
                return errOther()
            }
            "#,
        ),
    ]);
    let output = generate(dir.path());

    assert_eq!(declared(&output.registry), vec!["N_1 = 1", "N_2 = 2", "N_3 = 3"]);
    let a = &output.sources[&dir.path().join("a.go")];
    let b = &output.sources[&dir.path().join("b.go")];
    assert!(a.contains("return errnums.New(errnums.N_1, errPositive())"));
    assert!(a.contains("return errnums.New(errnums.N_2, errOther())"));
    assert!(b.contains("return errnums.New(errnums.N_3, errG())"));
}

#[test]
fn bare_return_is_skipped_without_failing() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        func f() (n int, s string, err error) {
            return
        }
        "#,
    )]);
    let output = generate(dir.path());

    assert_eq!(output.new_sites, 0);
    assert!(output.sources.is_empty());
    assert_eq!(output.notes.len(), 1);
    assert_eq!(output.notes[0].kind(), ErrorKind::UnexpectedResultArity);
    assert!(declared(&output.registry).is_empty());
}

#[test]
fn nil_error_slot_is_skipped() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        func f() (int, error) {
            return 1, nil
        }
        "#,
    )]);
    let output = generate(dir.path());
    assert_eq!(output.new_sites, 0);
    assert!(output.notes.is_empty());
}

#[test]
fn new_identifiers_continue_after_recovered_maximum() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        func f(x int) error {
            if x == 1 {
                return errnums.New(errnums.N_7, errOne)
            }
            if x == 2 {
                return errTwo
            }
            return errnums.New(errnums.N_3, errThree)
        }
        "#,
    )]);
    let output = generate(dir.path());

    assert_eq!(output.recovered_max, 7);
    assert_eq!(output.counter, 8);
    assert_eq!(output.already_wrapped, 2);
    assert_eq!(declared(&output.registry).len(), 8);
    let content = output.sources.values().next().unwrap();
    assert!(content.contains("return errnums.New(errnums.N_8, errTwo)"));
    assert!(content.contains("return errnums.New(errnums.N_3, errThree)"));
}

#[test]
fn nested_literal_uses_its_own_layout() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        func outer() (int, error) {
            inner := func() (error, string) {
                return errInner, "x"
            }
            _ = inner
            return 0, errOuter
        }
        "#,
    )]);
    let output = generate(dir.path());
    let content = output.sources.values().next().unwrap();
    assert!(content.contains(r#"return errnums.New(errnums.N_1, errInner), "x""#));
    assert!(content.contains("return 0, errnums.New(errnums.N_2, errOuter)"));
}

#[test]
fn multi_line_expression_keeps_its_formatting() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        import "fmt"

        func f(err error) error {
            return fmt.Errorf(
                "wrapped: %w",
                err,
            )
        }
        "#,
    )]);
    let output = generate(dir.path());
    let content = output.sources.values().next().unwrap();
    assert!(content.contains(
        "return errnums.New(errnums.N_1, fmt.Errorf(\n        \"wrapped: %w\",\n        err,\n    ))"
    ));
}

#[test]
fn custom_package_and_out_path() {
    let dir = write_tree(&[("a.go", SINGLE)]);
    let out = dir.path().join("gen").join("codes.go");
    let output = Generator::new(
        GenOptions::new(dir.path())
            .with_out_package("codes")
            .with_out_path(Some(out.clone())),
    )
    .unwrap()
    .generate()
    .unwrap();

    assert_eq!(output.out_path, out);
    assert!(output.registry.contains("package codes\n"));
    let content = output.sources.values().next().unwrap();
    assert!(content.contains("codes.New(codes.N_1, errors.New(\"bad\"))"));
}

#[test]
fn registry_file_is_never_rewritten() {
    let dir = write_tree(&[("a.go", SINGLE)]);
    commit(generate(dir.path()));
    // The registry declares functions returning error; it must stay out of scope.
    let second = generate(dir.path());
    assert!(second
        .sources
        .keys()
        .all(|p| !p.ends_with("errnums/errnums.go")));
    assert!(second.is_unchanged());
}

#[test]
fn skip_paths_are_left_alone() {
    let dir = write_tree(&[
        ("a.go", SINGLE),
        ("gen/b.go", "package gen\n\nfunc g() error {\n\treturn errB\n}\n"),
    ]);
    let output = Generator::new(
        GenOptions::new(dir.path()).with_skip_paths(vec![dir.path().join("gen")]),
    )
    .unwrap()
    .generate()
    .unwrap();
    assert_eq!(output.new_sites, 1);
    assert!(output.sources.keys().all(|p| p.ends_with("a.go")));
}

#[test]
fn syntax_error_aborts_before_output() {
    let dir = write_tree(&[
        ("a.go", SINGLE),
        ("b.go", "package a\n\nfunc broken() error {\n\treturn (\n}\n"),
    ]);
    let err = Generator::new(GenOptions::new(dir.path()))
        .unwrap()
        .generate()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
}

#[test]
fn invalid_package_is_rejected() {
    let err = Generator::new(GenOptions::new(".").with_out_package("no-dash")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

struct DeniedReader;

impl SourceReader for DeniedReader {
    fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
    }
}

#[test]
fn read_failures_carry_the_path() {
    let dir = write_tree(&[("a.go", SINGLE)]);
    let err = Generator::new(GenOptions::new(dir.path()))
        .unwrap()
        .with_reader(Arc::new(DeniedReader))
        .generate()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(err.context_value("path").is_some_and(|p| p.ends_with("a.go")));
    assert!(fs::metadata(dir.path().join("errnums")).is_err());
}

#[test]
fn exhausted_identifier_space_is_an_error() {
    let dir = write_tree(&[(
        "a.go",
        r#"
        package a

        import "errors"

        func f(x int) error {
            if x > 0 {
                return errnums.New(errnums.N_4294967295, errOld)
            }
            return errors.New("new")
        }
        "#,
    )]);
    let before = read(dir.path(), "a.go");
    let err = Generator::new(GenOptions::new(dir.path()))
        .unwrap()
        .generate()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.message().contains("exhausted"));
    assert!(err.context_value("path").is_some_and(|p| p.ends_with("a.go")));
    assert_eq!(read(dir.path(), "a.go"), before);
    assert!(fs::metadata(dir.path().join("errnums")).is_err());
}
