use std::{fs, path::Path};

use anyhow::{Context, Result};

use super::{CommandKind, CommandResult};
use crate::{
    config::{CONFIG_FILE_NAME, default_config_json},
    log::RunLog,
    pipeline::RunSummary,
};

/// Write the default configuration into `dir`. An existing file is kept and
/// reported as an error.
pub fn init(dir: &Path) -> Result<CommandResult> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    let mut log = RunLog::new();

    if config_path.exists() {
        log.error(format!("{} already exists", CONFIG_FILE_NAME));
    } else {
        fs::write(&config_path, default_config_json()?)
            .with_context(|| format!("Failed to write file: {}", config_path.display()))?;
        log.info(format!("Created {}", CONFIG_FILE_NAME));
    }

    Ok(CommandResult::new(CommandKind::Init, RunSummary::default(), log))
}
