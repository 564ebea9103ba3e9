mod command_result;
pub mod helper;
pub mod init;

use anyhow::Result;

use super::args::{CompileCommand, ExtractCommand};

pub use command_result::*;

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    helper::run_pipeline(PipelineKind::Extract, &cmd.common)
}

pub fn compile(cmd: CompileCommand) -> Result<CommandResult> {
    helper::run_pipeline(PipelineKind::Compile, &cmd.common)
}
