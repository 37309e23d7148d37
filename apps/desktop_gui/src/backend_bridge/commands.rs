//! Backend commands queued from UI to backend worker.

use shared::domain::SubmissionToken;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    Convert {
        token: SubmissionToken,
        text: String,
    },
    Shutdown,
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Convert { .. } => "convert",
            BackendCommand::Shutdown => "shutdown",
        }
    }
}
