use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use markup_gettext::{
    config::Config,
    log::{RunLog, Severity},
    pipeline::{Pipeline, RunSummary},
    tools::{ToolInvocation, ToolOutput, ToolRunner},
};
use tempfile::TempDir;

mod compile;
mod distribution;

pub const TEMPLATE: &str = r#"<!DOCTYPE html>
<html><head><meta name="gettext" content="translate"><title>Shop</title></head>
<body>
<h1 gettext=".">Hello</h1>
<input gettext="placeholder" placeholder="Your name">
</body></html>
"#;

pub const CS_CATALOG: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Language: cs\n"

msgid "Hello"
msgstr "Ahoj"

msgid "Your name"
msgstr "Vaše jméno"
"#;

pub const EN_CATALOG: &str = r#"msgid ""
msgstr ""
"Content-Type: text/plain; charset=UTF-8\n"
"Language: en\n"
"#;

/// Stands in for the gettext tools: records every call and produces the
/// files the real tools would.
#[derive(Default)]
pub struct FakeTools {
    calls: RefCell<Vec<ToolInvocation>>,
    markup_sources: RefCell<Vec<String>>,
    failing: Vec<&'static str>,
}

impl FakeTools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(programs: &[&'static str]) -> Self {
        Self {
            failing: programs.to_vec(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<ToolInvocation> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, program: &str) -> Vec<ToolInvocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.program == program)
            .collect()
    }

    /// Virtual PHP sources generated from markup, captured at call time.
    pub fn markup_sources(&self) -> Vec<String> {
        self.markup_sources.borrow().clone()
    }
}

impl ToolRunner for FakeTools {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        if self.failing.contains(&invocation.program.as_str()) {
            return Ok(ToolOutput::failed(1, format!("{}: simulated failure", invocation.program)));
        }

        let option = |name: &str| {
            invocation
                .option(name)
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("missing {} in {}", name, invocation))
        };

        match invocation.program.as_str() {
            "xgettext" => {
                if invocation.args.iter().any(|a| a == "--no-location")
                    && let Some(source) = invocation.args.last()
                {
                    self.markup_sources.borrow_mut().push(fs::read_to_string(source)?);
                }
                Ok(ToolOutput::ok(""))
            }
            "msginit" => {
                fs::copy(option("--input")?, option("--output")?)?;
                Ok(ToolOutput::ok(""))
            }
            "msgfmt" => {
                fs::write(option("-o")?, b"\xde\x12\x04\x95")?;
                Ok(ToolOutput::ok(""))
            }
            "msgmerge" if invocation.args.iter().any(|a| a == "--update") => Ok(ToolOutput::ok("")),
            "msgmerge" => {
                let po = invocation.args.get(1).context("missing po file")?;
                Ok(ToolOutput::ok(fs::read_to_string(po)?))
            }
            other => Err(anyhow!("Cannot execute {}", other)),
        }
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        Some(PathBuf::from("/usr/bin").join(program))
    }
}

pub struct Project {
    _temp_dir: TempDir,
    root: PathBuf,
}

impl Project {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.root.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }
        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))
    }

    pub fn create_dir(&self, path: &str) -> Result<()> {
        fs::create_dir_all(self.root.join(path))?;
        Ok(())
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.root.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }

    pub fn exists(&self, path: &str) -> bool {
        self.root.join(path).exists()
    }

    /// A module `site` with the shop template and its catalogs.
    pub fn with_site() -> Result<Self> {
        let project = Self::new()?;
        project.write_file("site/index.html", TEMPLATE)?;
        project.write_file("site/locale/cs_CZ.po", CS_CATALOG)?;
        project.write_file("site/locale/en_US.po", EN_CATALOG)?;
        Ok(project)
    }
}

pub fn config(modules: &[&str], locales: &[&str]) -> Config {
    Config {
        modules: modules.iter().map(|m| m.to_string()).collect(),
        locales: locales.iter().map(|l| l.to_string()).collect(),
        ..Config::default()
    }
}

pub fn extract(project: &Project, config: &Config, tools: &FakeTools) -> Result<(RunSummary, RunLog)> {
    let pipeline = Pipeline::new(config, project.root(), tools)?;
    let mut log = RunLog::with_root(project.root());
    let summary = pipeline.extract(None, &mut log)?;
    Ok((summary, log))
}

pub fn compile(project: &Project, config: &Config, tools: &FakeTools) -> Result<(RunSummary, RunLog)> {
    let pipeline = Pipeline::new(config, project.root(), tools)?;
    let mut log = RunLog::with_root(project.root());
    let summary = pipeline.compile(None, &mut log)?;
    Ok((summary, log))
}

pub fn errors(log: &RunLog) -> Vec<String> {
    log.messages(Severity::Error)
        .into_iter()
        .map(str::to_string)
        .collect()
}
