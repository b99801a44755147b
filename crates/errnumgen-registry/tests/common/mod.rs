#![allow(dead_code)]

use std::fs;
use std::path::Path;

use errnumgen_registry::{GenOptions, GenerateOutput, Generator};
use tempfile::TempDir;
use textwrap::dedent;

pub fn write_tree(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (rel, text) in files {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, dedent(text).trim_start()).expect("write source");
    }
    dir
}

pub fn generate(root: &Path) -> GenerateOutput {
    Generator::new(GenOptions::new(root))
        .expect("valid options")
        .generate()
        .expect("generate")
}

/// Write every produced file, the way a non-dry run would.
pub fn commit(output: GenerateOutput) {
    for (path, content) in output.into_file_map() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create dirs");
        }
        fs::write(&path, content).expect("write output");
    }
}

pub fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).expect("read file")
}

/// Constant lines of a rendered registry, in order.
pub fn declared(registry: &str) -> Vec<String> {
    registry
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("N_"))
        .map(str::to_string)
        .collect()
}
