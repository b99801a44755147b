#![allow(dead_code)]

use std::fs;
use std::path::Path;

use errnumgen_core::{
    DiscoveryReport, ErrorNodeFinder, LoadOptions, Project, ScheduleAll, SiteClassifier,
    SourceLoader, filter_unit,
};
use tempfile::TempDir;
use textwrap::dedent;

/// Write `(relative path, source)` pairs below a fresh temp dir.
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

pub fn load(root: &Path) -> Project {
    SourceLoader::new(root, LoadOptions::new())
        .load()
        .expect("load project")
}

pub fn discover_with<C: SiteClassifier>(project: &Project, classifier: C) -> DiscoveryReport {
    let mut finder = ErrorNodeFinder::new(classifier);
    let mut report = DiscoveryReport::default();
    for unit in &project.units {
        let filtered = filter_unit(unit);
        finder.find_unit(&filtered, &mut report).expect("discover");
    }
    report
}

pub fn discover(project: &Project) -> DiscoveryReport {
    discover_with(project, ScheduleAll)
}

/// Texts of all scheduled sites in discovery order.
pub fn site_texts(report: &DiscoveryReport) -> Vec<String> {
    report
        .files
        .iter()
        .flat_map(|f| f.sites.iter().map(|s| s.text.clone()))
        .collect()
}
