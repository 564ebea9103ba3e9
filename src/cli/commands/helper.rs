use std::{env, path::PathBuf};

use anyhow::{Context, Result};

use super::{CommandResult, PipelineKind};
use crate::{
    cli::args::CommonArgs,
    config::{Config, load_config},
    log::RunLog,
    pipeline::Pipeline,
    tools::SystemToolRunner,
};

/// Configuration and project root for one run, with CLI overrides applied.
#[derive(Debug)]
pub struct RunContext {
    pub config: Config,
    pub root: PathBuf,
}

impl RunContext {
    pub fn from_args(common: &CommonArgs) -> Result<Self> {
        let start = match &common.root {
            Some(root) => root.clone(),
            None => env::current_dir().context("Cannot determine current directory")?,
        };
        let start = start
            .canonicalize()
            .with_context(|| format!("Cannot access project root: {}", start.display()))?;

        let loaded = load_config(&start)?;
        let mut config = loaded.config;
        if !common.locales.is_empty() {
            config.locales = common.locales.clone();
            config.validate()?;
        }

        Ok(Self {
            config,
            root: loaded.root,
        })
    }
}

/// Load the run context and drive one pipeline command.
pub fn run_pipeline(kind: PipelineKind, common: &CommonArgs) -> Result<CommandResult> {
    let ctx = RunContext::from_args(common)?;
    let runner = SystemToolRunner::new(common.verbose);
    let pipeline = Pipeline::new(&ctx.config, &ctx.root, &runner)?;
    let mut log = RunLog::with_root(&ctx.root);
    let module = common.module.as_deref();

    let summary = match kind {
        PipelineKind::Extract => pipeline.extract(module, &mut log)?,
        PipelineKind::Compile => pipeline.compile(module, &mut log)?,
    };

    Ok(CommandResult::new(kind.into(), summary, log))
}
