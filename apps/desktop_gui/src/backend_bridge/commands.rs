//! Backend commands queued from UI to backend worker.

use client_core::SubmissionTicket;

pub enum BackendCommand {
    Calculate { ticket: SubmissionTicket },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::Calculate { .. } => "calculate",
        }
    }
}
