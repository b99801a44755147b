mod common;

use std::io;
use std::path::Path;
use std::sync::Arc;

use common::write_tree;
use errnumgen_core::{ErrorKind, LoadOptions, SkipList, SourceLoader, SourceReader};

#[test]
fn groups_files_into_units_by_directory() {
    let dir = write_tree(&[
        ("a.go", "package root\n\nfunc f() error { return nil }\n"),
        ("sub/b.go", "package sub\n\nfunc g() error { return nil }\n"),
        ("sub/c.go", "package sub\n\nconst C = 1\n"),
    ]);
    let project = SourceLoader::new(dir.path(), LoadOptions::new()).load().unwrap();

    let names: Vec<&str> = project.units.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["root", "sub"]);
    assert_eq!(project.units[1].files.len(), 2);
    // c.go has neither keyword and is parsed as empty.
    assert!(project.units[1].files[1].tree.is_none());
    assert_eq!(project.decl_count(), 2);
}

#[test]
fn skips_tests_testdata_vendor_and_skip_paths() {
    let dir = write_tree(&[
        ("a.go", "package a\n\nfunc f() error { return nil }\n"),
        ("a_test.go", "package a\n\nfunc t() error { return nil }\n"),
        ("testdata/x.go", "package x\n\nfunc f() error { return nil }\n"),
        ("vendor/v/v.go", "package v\n\nfunc f() error { return nil }\n"),
        ("gen/g.go", "package gen\n\nfunc f() error { return nil }\n"),
    ]);
    let skip = SkipList::new([dir.path().join("gen")]).unwrap();
    let project = SourceLoader::new(dir.path(), LoadOptions::new().with_skip(skip))
        .load()
        .unwrap();

    assert_eq!(project.units.len(), 1);
    assert_eq!(project.units[0].files.len(), 1);

    let project = SourceLoader::new(dir.path(), LoadOptions::new().with_include_tests(true))
        .load()
        .unwrap();
    let files: usize = project.units.iter().map(|u| u.files.len()).sum();
    assert_eq!(files, 3);
}

#[test]
fn empty_tree_is_no_source_found() {
    let dir = write_tree(&[("README.md", "nothing here")]);
    let err = SourceLoader::new(dir.path(), LoadOptions::new())
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSourceFound);
}

#[test]
fn malformed_files_abort_with_syntax_error() {
    let dir = write_tree(&[
        ("a.go", "package a\n\nfunc f() error { return nil\n"),
        ("b.go", "package a\n\nfunc g() error { return }}\n"),
        ("c.go", "package a\n\nfunc h() error { return nil }\n"),
    ]);
    let err = SourceLoader::new(dir.path(), LoadOptions::new())
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::SyntaxError);
    assert_eq!(err.context_value("count"), Some("2"));
}

struct FailingReader;

impl SourceReader for FailingReader {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("denied: {}", path.display()),
        ))
    }
}

#[test]
fn read_failures_carry_the_path() {
    let dir = write_tree(&[("a.go", "package a\n\nfunc f() error { return nil }\n")]);
    let err = SourceLoader::new(dir.path(), LoadOptions::new())
        .with_reader(Arc::new(FailingReader))
        .load()
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(err.context_value("path").unwrap().ends_with("a.go"));
}
