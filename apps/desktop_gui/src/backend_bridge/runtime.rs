//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::{execute_ticket, ScoringBackend};
use crossbeam_channel::{Receiver, Sender};
use shared::error::ErrorCode;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Starts the backend worker thread. Every `Calculate` command runs as its
/// own task, so overlapping submissions proceed independently.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    backend: Arc<dyn ScoringBackend>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    ErrorCode::Internal,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let _ = ui_tx.try_send(UiEvent::Info("Ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Calculate { ticket } => {
                        tracing::info!(ticket_id = ticket.id, "backend: calculate");
                        let backend = backend.clone();
                        let ui_tx = ui_tx.clone();
                        tokio::spawn(async move {
                            let outcome = execute_ticket(backend.as_ref(), &ticket).await;
                            // Every ticket must settle or the form stays busy,
                            // so wait for room in the queue instead of dropping.
                            let event = UiEvent::CalculationSettled {
                                ticket_id: ticket.id,
                                outcome,
                            };
                            let delivered =
                                tokio::task::spawn_blocking(move || ui_tx.send(event).is_ok())
                                    .await
                                    .unwrap_or(false);
                            if !delivered {
                                tracing::warn!(
                                    ticket_id = ticket.id,
                                    "ui event queue closed; dropping calculation outcome"
                                );
                            }
                        });
                    }
                }
            }
            tracing::info!("backend command queue closed; worker exiting");
        });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use client_core::{ScoringError, SubmissionController};
    use crossbeam_channel::bounded;
    use serde_json::json;
    use shared::{
        domain::Metal,
        protocol::{CalculateRequest, ScoreReport},
    };
    use std::time::Duration;

    struct FixedBackend;

    #[async_trait]
    impl ScoringBackend for FixedBackend {
        async fn calculate(
            &self,
            request: &CalculateRequest,
        ) -> Result<ScoreReport, ScoringError> {
            if request.is_empty() {
                return Ok(ScoreReport::from_value(
                    json!({ "error": "heavyMetalConcentrations is required" }),
                ));
            }
            if request.heavy_metal_concentrations.contains_key(&Metal::Mercury) {
                return Err(ScoringError::Transport("connection reset".into()));
            }
            Ok(ScoreReport::from_value(json!({ "HPI": 9.5, "classification": "Safe" })))
        }
    }

    fn next_settled(ui_rx: &Receiver<UiEvent>) -> (u64, Result<ScoreReport, ScoringError>) {
        loop {
            match ui_rx
                .recv_timeout(Duration::from_secs(5))
                .expect("worker event")
            {
                UiEvent::CalculationSettled { ticket_id, outcome } => return (ticket_id, outcome),
                UiEvent::Info(_) => continue,
                UiEvent::Error(err) => panic!("unexpected worker error: {}", err.message()),
            }
        }
    }

    #[test]
    fn worker_runs_tickets_and_reports_outcomes() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(8);
        let worker = launch(cmd_rx, ui_tx, Arc::new(FixedBackend));

        let mut controller = SubmissionController::new();
        let empty = controller.submit().expect("accepted");
        let empty_id = empty.id;
        cmd_tx
            .send(BackendCommand::Calculate { ticket: empty })
            .expect("send");
        let (ticket_id, outcome) = next_settled(&ui_rx);
        assert_eq!(ticket_id, empty_id);
        let report = outcome.expect("error body is still a report");
        assert_eq!(report.classification(), None);

        controller.edit(Metal::Iron, "2.5").expect("valid");
        let filled = controller.submit().expect("accepted");
        let filled_id = filled.id;
        cmd_tx
            .send(BackendCommand::Calculate { ticket: filled })
            .expect("send");
        let (ticket_id, outcome) = next_settled(&ui_rx);
        assert_eq!(ticket_id, filled_id);
        let report = outcome.expect("report");
        assert_eq!(report.classification(), Some("Safe"));

        drop(cmd_tx);
        worker.join().expect("worker exits when queue closes");
    }

    #[test]
    fn outcomes_wait_for_room_in_a_full_ui_queue() {
        let (cmd_tx, cmd_rx) = bounded(8);
        let (ui_tx, ui_rx) = bounded(1);
        let worker = launch(cmd_rx, ui_tx, Arc::new(FixedBackend));

        let mut controller = SubmissionController::new();
        controller.edit(Metal::Zinc, "1").expect("valid");
        let mut ids = Vec::new();
        for _ in 0..3 {
            let ticket = controller.submit().expect("accepted");
            ids.push(ticket.id);
            cmd_tx
                .send(BackendCommand::Calculate { ticket })
                .expect("send");
        }
        controller.edit(Metal::Mercury, "0.1").expect("valid");
        let failing = controller.submit().expect("accepted");
        ids.push(failing.id);
        cmd_tx
            .send(BackendCommand::Calculate { ticket: failing })
            .expect("send");

        // Let every task finish before draining the single-slot queue.
        std::thread::sleep(Duration::from_millis(200));
        let mut settled = Vec::new();
        let mut failures = 0;
        for _ in 0..ids.len() {
            let (ticket_id, outcome) = next_settled(&ui_rx);
            if outcome.is_err() {
                failures += 1;
            }
            settled.push(ticket_id);
        }
        settled.sort_unstable();
        assert_eq!(settled, ids);
        assert_eq!(failures, 1);

        drop(cmd_tx);
        worker.join().expect("worker exits when queue closes");
    }
}
