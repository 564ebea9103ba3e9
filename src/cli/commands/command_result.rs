use crate::{cli::exit_status::ExitStatus, log::RunLog, pipeline::RunSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Extract,
    Compile,
    Init,
}

/// The commands that run the extraction or compile pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    Extract,
    Compile,
}

impl From<PipelineKind> for CommandKind {
    fn from(kind: PipelineKind) -> Self {
        match kind {
            PipelineKind::Extract => CommandKind::Extract,
            PipelineKind::Compile => CommandKind::Compile,
        }
    }
}

/// Result of running an mgettext command.
#[derive(Debug)]
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: RunSummary,
    /// Everything the run logged, in order.
    pub log: RunLog,
}

impl CommandResult {
    pub fn new(kind: CommandKind, summary: RunSummary, log: RunLog) -> Self {
        Self { kind, summary, log }
    }

    pub fn error_count(&self) -> usize {
        self.log.error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.log.warning_count()
    }

    /// `Failure` when the run logged any error.
    pub fn exit_status(&self) -> ExitStatus {
        if self.log.has_errors() {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}
