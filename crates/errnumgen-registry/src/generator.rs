//! One generator run: load, discover, number, rewrite and render.
//!
//! Nothing here touches the disk beyond reading sources. The caller decides
//! whether to print or commit the returned [`GenerateOutput`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use errnumgen_core::{
    DiscoveryReport, Edit, ErrorNodeFinder, FileEdits, FsReader, LoadOptions, Project, SkipList,
    SourceLoader, SourceReader, filter_unit,
};
use errnumgen_error::{Error, Result};

use crate::counter::IdCounter;
use crate::options::GenOptions;
use crate::render::render_registry;
use crate::wrap::WrapStrategy;

/// Everything one run produced.
#[derive(Debug)]
pub struct GenerateOutput {
    /// Where the registry file belongs.
    pub out_path: PathBuf,
    pub registry: String,
    /// New content of every file with at least one new site, by path.
    pub sources: BTreeMap<PathBuf, String>,
    /// Highest identifier found on already wrapped sites.
    pub recovered_max: u32,
    /// Highest identifier in use after this run.
    pub counter: u32,
    pub new_sites: usize,
    pub already_wrapped: usize,
    /// Recoverable diagnostics gathered along the way.
    pub notes: Vec<Error>,
}

impl GenerateOutput {
    pub fn is_unchanged(&self) -> bool {
        self.new_sites == 0
    }

    /// Registry first, then every rewritten source.
    pub fn into_file_map(self) -> Vec<(PathBuf, String)> {
        let mut files = Vec::with_capacity(self.sources.len() + 1);
        files.push((self.out_path, self.registry));
        files.extend(self.sources);
        files
    }
}

/// Sites to rewrite, grouped per file in discovery order.
#[derive(Debug, Default)]
pub struct RewritePlan {
    pub files: Vec<(PathBuf, FileEdits)>,
}

impl RewritePlan {
    pub fn edit_count(&self) -> usize {
        self.files.iter().map(|(_, edits)| edits.len()).sum()
    }
}

pub struct Generator {
    options: GenOptions,
    strategy: WrapStrategy,
    reader: Arc<dyn SourceReader>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("options", &self.options)
            .field("strategy", &self.strategy)
            .finish_non_exhaustive()
    }
}

impl Generator {
    pub fn new(options: GenOptions) -> Result<Self> {
        options.validate()?;
        let strategy = WrapStrategy::new(options.out_package.clone())?;
        Ok(Self {
            options,
            strategy,
            reader: Arc::new(FsReader),
        })
    }

    pub fn with_reader(mut self, reader: Arc<dyn SourceReader>) -> Self {
        self.reader = reader;
        self
    }

    /// Load every package below the root; the registry file itself is
    /// always skipped.
    pub fn load(&self) -> Result<Project> {
        let mut skip = SkipList::new(&self.options.skip_paths)?;
        skip.push(&self.options.out_path())?;
        let options = LoadOptions::new()
            .with_skip(skip)
            .with_include_tests(self.options.include_tests);
        SourceLoader::new(&self.options.root, options)
            .with_reader(self.reader.clone())
            .load()
    }

    /// Find every site still to wrap. Identifiers of already wrapped sites
    /// are recorded in `counter`; nothing is issued yet.
    pub fn discover(&self, project: &Project, counter: &mut IdCounter) -> Result<DiscoveryReport> {
        let start = Instant::now();
        let mut report = DiscoveryReport::default();
        let mut finder = ErrorNodeFinder::new(self.strategy.classifier(counter));
        for unit in &project.units {
            let filtered = filter_unit(unit);
            debug!(
                unit = %unit.name,
                files = filtered.files.len(),
                decls = filtered.decl_count(),
                "filtered unit"
            );
            finder.find_unit(&filtered, &mut report)?;
        }

        info!(
            "Discovered {} new sites, {} already wrapped, {} skipped in {:.2}s",
            report.site_count(),
            report.already_wrapped,
            report.notes.len(),
            start.elapsed().as_secs_f64()
        );
        if !report.notes.is_empty() {
            warn!(
                "{} return statements left alone: returned values do not match the declared results",
                report.notes.len()
            );
        }
        Ok(report)
    }

    /// Issue identifiers in discovery order and build the edits.
    pub fn plan(&self, report: &DiscoveryReport, counter: &mut IdCounter) -> Result<RewritePlan> {
        let mut plan = RewritePlan::default();
        for file in &report.files {
            let mut edits = FileEdits::new();
            for site in &file.sites {
                let at = |e: Error| e.with_path(&file.path).with_context("line", site.line.to_string());
                let id = counter.next_id().map_err(at)?;
                let replacement = self.strategy.synthesize(&site.text, id).map_err(at)?;
                edits.push(Edit::new(site.start, site.end, replacement));
            }
            plan.files.push((file.path.clone(), edits));
        }
        Ok(plan)
    }

    /// Apply a plan to the original bytes of each file.
    pub fn rewrite(&self, project: &Project, plan: &RewritePlan) -> Result<BTreeMap<PathBuf, String>> {
        let mut sources = BTreeMap::new();
        for (path, edits) in &plan.files {
            let original = self.original(project, path)?;
            let content = edits.apply(&original).map_err(|e| e.with_path(path))?;
            let content = String::from_utf8(content).map_err(|e| {
                Error::unexpected("rewritten source is not valid UTF-8")
                    .with_operation("generator::rewrite")
                    .with_path(path)
                    .set_source(e)
            })?;
            sources.insert(path.clone(), content);
        }
        Ok(sources)
    }

    /// Original content, from the loaded project or re-read when absent.
    fn original(&self, project: &Project, path: &Path) -> Result<Vec<u8>> {
        if let Some(file) = project.find_file(path) {
            return Ok(file.source.content().to_vec());
        }
        debug!(file = %path.display(), "re-reading original content");
        self.reader
            .read(path)
            .map_err(|e| Error::io(e, path).with_operation("generator::original"))
    }

    pub fn render(&self, counter: &IdCounter) -> Result<String> {
        render_registry(&self.options.out_package, counter.value())
    }

    /// Full run. Fails before producing any output when a stage fails.
    pub fn generate(&self) -> Result<GenerateOutput> {
        let start = Instant::now();
        let project = self.load()?;

        let mut counter = IdCounter::new();
        let report = self.discover(&project, &mut counter)?;
        let recovered_max = counter.recovered();

        let plan = self.plan(&report, &mut counter)?;
        let sources = self.rewrite(&project, &plan)?;
        let registry = self.render(&counter)?;

        info!(
            "Wrapped {} sites in {} files, identifiers {}..={} in {:.2}s",
            plan.edit_count(),
            sources.len(),
            recovered_max.saturating_add(1),
            counter.value(),
            start.elapsed().as_secs_f64()
        );

        Ok(GenerateOutput {
            out_path: self.options.out_path(),
            registry,
            sources,
            recovered_max,
            counter: counter.value(),
            new_sites: plan.edit_count(),
            already_wrapped: report.already_wrapped,
            notes: report.notes,
        })
    }
}
