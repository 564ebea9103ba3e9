//! Extraction and compile runs over the configured modules.
//!
//! A run walks the modules in configuration order. For each one it prepares
//! the gettext layout, drives the external tools and the markup core, and
//! then processes the module's JavaScript distribution if it has one. Module
//! setup failures are logged and the module is skipped; only a bad module
//! filter aborts the run.

mod compile;
mod extract;
pub mod files;
pub mod module;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use glob::Pattern;

use crate::{
    config::Config,
    core::locale::SupportedLocales,
    log::RunLog,
    tools::{ToolInvocation, ToolOutput, ToolRunner},
};

pub use module::{GettextModule, ModuleSet, module_name};

/// Directory of a module's JavaScript distribution, relative to the module.
pub const DIST_DIR: &str = "install/dist";

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Modules processed with their `locale/` directory.
    pub modules: usize,
    /// JavaScript distributions processed.
    pub distributions: usize,
    /// Modules skipped for lack of a `locale/` directory or a failed setup.
    pub skipped: usize,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    root: PathBuf,
    runner: &'a dyn ToolRunner,
    locales: SupportedLocales,
    excludes: Vec<Pattern>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, root: &Path, runner: &'a dyn ToolRunner) -> Result<Self> {
        Ok(Self {
            config,
            root: root.to_path_buf(),
            runner,
            locales: config.supported_locales()?,
            excludes: files::compile_patterns(&config.excludes),
        })
    }

    /// Update catalog templates and `.po` files.
    pub fn extract(&self, only: Option<&str>, log: &mut RunLog) -> Result<RunSummary> {
        let paths = select_modules(self.module_paths(log), only)?;
        let tools = [
            self.config.tools.xgettext.as_str(),
            self.config.tools.msginit.as_str(),
            self.config.tools.msgmerge.as_str(),
        ];
        let mut summary = RunSummary::default();

        log.info("Extracting gettext strings from module folders...");
        for path in &paths {
            match self.setup_module(path, &module_name(path), &tools, log) {
                Some(module) => {
                    self.extract_module(&module, log);
                    summary.modules += 1;
                }
                None => summary.skipped += 1,
            }
        }

        log.info(format!("Extracting gettext strings from \"{}\" folders...", DIST_DIR));
        for path in paths.iter().filter(|p| has_distribution(p)) {
            let dist = path.join(DIST_DIR);
            if let Some(module) = self.setup_module(&dist, &module_name(path), &tools[..1], log) {
                self.extract_distribution(&module, log);
                summary.distributions += 1;
            }
        }

        Ok(summary)
    }

    /// Build `.mo` files, translated markup and JavaScript message maps.
    pub fn compile(&self, only: Option<&str>, log: &mut RunLog) -> Result<RunSummary> {
        // Lookups may cross into other modules through explicit domains.
        let all_paths = self.module_paths(log);
        let modules = ModuleSet::from_paths(&all_paths);
        let paths = select_modules(all_paths, only)?;
        let tools = [self.config.tools.msgfmt.as_str()];
        let merge_tools = [self.config.tools.msgmerge.as_str()];
        let mut summary = RunSummary::default();

        for path in &paths {
            match self.setup_module(path, &module_name(path), &tools, log) {
                Some(module) => {
                    self.compile_module(&module, &modules, log);
                    summary.modules += 1;
                }
                None => summary.skipped += 1,
            }
        }

        for path in paths.iter().filter(|p| has_distribution(p)) {
            if let Some(module) = self.setup_module(path, &module_name(path), &merge_tools, log) {
                log.info(format!(
                    "Compiling gettext strings from {} for locales: {}",
                    path.join(DIST_DIR).display(),
                    locale_list(&module)
                ));
                self.compile_distribution(&module, log);
                summary.distributions += 1;
            }
        }

        Ok(summary)
    }

    fn module_paths(&self, log: &mut RunLog) -> Vec<PathBuf> {
        files::discover_modules(&self.root, &self.config.modules, log)
    }

    /// Prepare a module, logging why it was skipped when that fails.
    fn setup_module(
        &self,
        path: &Path,
        name: &str,
        tools: &[&str],
        log: &mut RunLog,
    ) -> Option<GettextModule> {
        let locale_dir = path.join(module::LOCALE_DIR);
        if !locale_dir.is_dir() {
            log.info(format!("Skipped. No locale directory found: {}", locale_dir.display()));
            return None;
        }

        match GettextModule::setup(path, name, &self.locales, tools, self.runner, log) {
            Ok(module) => Some(module),
            Err(err) => {
                log.error(format!("{}: {:#}", path.display(), err));
                None
            }
        }
    }

    pub(crate) fn find_files(&self, dir: &Path, includes: &[&str]) -> Vec<PathBuf> {
        files::find_files(dir, includes, &self.excludes)
    }

    /// Run a tool and log its outcome. Returns the output on success only.
    pub(crate) fn run_tool(&self, invocation: &ToolInvocation, log: &mut RunLog) -> Option<ToolOutput> {
        match self.runner.run(invocation) {
            Ok(output) if output.success => Some(output),
            Ok(output) => {
                let status = output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |code| code.to_string());
                log.error(format!(
                    "Command failed with status {}: {}\n{}",
                    status,
                    invocation,
                    output.combined()
                ));
                None
            }
            Err(err) => {
                log.error(format!("{:#}", err));
                None
            }
        }
    }
}

/// `paths`, narrowed to the module named `only` when given.
fn select_modules(paths: Vec<PathBuf>, only: Option<&str>) -> Result<Vec<PathBuf>> {
    let Some(name) = only else {
        return Ok(paths);
    };

    let selected: Vec<PathBuf> = paths.into_iter().filter(|p| module_name(p) == name).collect();
    if selected.is_empty() {
        bail!("No configured module is named '{}'", name);
    }
    Ok(selected)
}

fn has_distribution(module: &Path) -> bool {
    module.join(DIST_DIR).join(module::LOCALE_DIR).is_dir()
}

fn locale_list(module: &GettextModule) -> String {
    module
        .locales
        .iter()
        .map(|l| l.posix())
        .collect::<Vec<_>>()
        .join(", ")
}
