//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker.
///
/// On failure the returned message is also written to `status`; the command
/// never reaches the worker.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) -> Result<(), String> {
    let cmd_name = cmd.name();

    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            *status = "UI command queue is full; please retry".to_string();
            Err(status.clone())
        }
        Err(TrySendError::Disconnected(_)) => {
            *status =
                "Backend worker disconnected (possible startup/runtime failure); restart the app"
                    .to_string();
            Err(status.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use client_core::SubmissionController;
    use crossbeam_channel::bounded;

    fn calculate_command() -> BackendCommand {
        let mut controller = SubmissionController::new();
        BackendCommand::Calculate {
            ticket: controller.submit().expect("empty form submits"),
        }
    }

    #[test]
    fn queues_command_when_receiver_alive() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();

        assert!(dispatch_backend_command(&tx, calculate_command(), &mut status).is_ok());
        assert!(status.is_empty());
        assert!(matches!(
            rx.try_recv(),
            Ok(BackendCommand::Calculate { .. })
        ));
    }

    #[test]
    fn reports_full_and_disconnected_queues() {
        let (tx, rx) = bounded(1);
        let mut status = String::new();
        dispatch_backend_command(&tx, calculate_command(), &mut status).expect("first fits");

        let full = dispatch_backend_command(&tx, calculate_command(), &mut status)
            .expect_err("queue full");
        assert!(full.contains("full"));

        drop(rx);
        let gone = dispatch_backend_command(&tx, calculate_command(), &mut status)
            .expect_err("disconnected");
        assert!(gone.contains("disconnected"));
        assert_eq!(status, gone);
    }
}
