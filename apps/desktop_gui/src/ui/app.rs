use std::time::{Duration, Instant};

use client_core::{
    presentation::{FieldRow, ResultView},
    FormView,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::CONCENTRATION_UNIT;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{FormModel, UiAction};
use crate::ui::theme;

const FIELD_WIDTH: f32 = 300.0;

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub scoring_url: String,
}

pub struct HmpiCalculatorApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    model: FormModel,
    startup: StartupConfig,
    style_applied: bool,
}

impl HmpiCalculatorApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            model: FormModel::default(),
            startup,
            style_applied: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.model.apply_event(event, Instant::now());
        }
    }

    fn handle_action(&mut self, action: UiAction) {
        let Some(cmd) = self.model.apply_action(action) else {
            return;
        };
        let BackendCommand::Calculate { ticket } = &cmd;
        let ticket_id = ticket.id;
        if let Err(reason) = dispatch_backend_command(&self.cmd_tx, cmd, &mut self.model.status) {
            self.model.dispatch_failed(ticket_id, reason, Instant::now());
        }
    }

    fn show_status_banner(&self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let Some(banner) = &self.model.status_banner else {
            return;
        };
        egui::Frame::NONE
            .fill(theme::BANNER_FILL)
            .stroke(egui::Stroke::new(1.0, theme::BANNER_STROKE))
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            actions.push(UiAction::DismissBanner);
                        }
                    });
                });
            });
        ui.add_space(8.0);
    }

    fn concentration_field(
        ui: &mut egui::Ui,
        row: &FieldRow,
        submit_on_enter: bool,
        actions: &mut Vec<UiAction>,
    ) {
        ui.vertical(|ui| {
            ui.set_width(FIELD_WIDTH);
            ui.label(egui::RichText::new(row.label).strong());

            let stroke = if row.error.is_some() {
                egui::Stroke::new(1.5, theme::ERROR_TEXT)
            } else {
                egui::Stroke::NONE
            };
            egui::Frame::NONE
                .stroke(stroke)
                .corner_radius(4.0)
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let mut buf = row.raw.clone();
                        let edit = egui::TextEdit::singleline(&mut buf)
                            .id_salt(("concentration", row.metal.key()))
                            .hint_text(format!("Enter {}", row.metal.key()))
                            .desired_width(FIELD_WIDTH - 40.0);
                        let response = ui.add(edit);
                        ui.weak(CONCENTRATION_UNIT);

                        if response.changed() {
                            actions.push(UiAction::Edit {
                                metal: row.metal,
                                raw: buf,
                            });
                        }
                        if submit_on_enter
                            && response.lost_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter))
                        {
                            actions.push(UiAction::Submit);
                        }
                    });
                });

            if let Some(error) = &row.error {
                ui.label(egui::RichText::new(error).color(theme::ERROR_TEXT).small());
            }
        });
    }

    fn show_form(ui: &mut egui::Ui, view: &FormView, actions: &mut Vec<UiAction>) {
        egui::Grid::new("concentration_grid")
            .num_columns(2)
            .spacing([24.0, 14.0])
            .show(ui, |ui| {
                for (i, row) in view.rows.iter().enumerate() {
                    Self::concentration_field(ui, row, view.submit_enabled, actions);
                    if i % 2 == 1 {
                        ui.end_row();
                    }
                }
            });

        ui.add_space(16.0);
        ui.vertical_centered(|ui| {
            let button = egui::Button::new(
                egui::RichText::new(view.submit_label)
                    .strong()
                    .size(16.0)
                    .color(egui::Color32::WHITE),
            )
            .fill(theme::ACCENT)
            .min_size(egui::vec2(220.0, 40.0));
            if ui.add_enabled(view.submit_enabled, button).clicked() {
                actions.push(UiAction::Submit);
            }
        });
    }

    fn show_results(
        &mut self,
        ui: &mut egui::Ui,
        result: &ResultView,
        ctx: &egui::Context,
    ) {
        let response = egui::Frame::NONE
            .fill(theme::RESULT_FILL)
            .stroke(egui::Stroke::new(
                1.0,
                theme::lighten_color(theme::SAFE_TEXT, 0.6),
            ))
            .corner_radius(12.0)
            .inner_margin(egui::Margin::symmetric(20, 16))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.heading("Results:");
                ui.add_space(6.0);
                egui::Grid::new("result_grid")
                    .num_columns(2)
                    .spacing([16.0, 6.0])
                    .show(ui, |ui| {
                        for row in &result.rows {
                            ui.label(egui::RichText::new(format!("{}:", row.label)).strong());
                            ui.label(&row.value);
                            ui.end_row();
                        }
                        ui.label(egui::RichText::new("Classification:").strong());
                        ui.label(
                            egui::RichText::new(&result.classification.label)
                                .strong()
                                .color(theme::badge_color(result.classification.tone)),
                        );
                        ui.end_row();
                    });
                if let Some(at) = self.model.last_result_at {
                    ui.add_space(6.0);
                    ui.weak(format!("Updated {}", at.format("%H:%M:%S")));
                }
            })
            .response;

        let now = Instant::now();
        if self.model.take_due_reveal(now) {
            response.scroll_to_me(Some(egui::Align::TOP));
        } else if let Some(remaining) = self.model.reveal_pending_for(now) {
            ctx.request_repaint_after(remaining);
        }
    }

    fn show_warning(&self, ctx: &egui::Context, actions: &mut Vec<UiAction>) {
        let Some(warning) = &self.model.warning else {
            return;
        };
        let modal = egui::Modal::new(egui::Id::new("submit_warning")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading(format!("{} error", err_label(warning.category())));
            ui.label(warning.message());
            ui.add_space(8.0);
            ui.button("OK").clicked()
        });
        if modal.inner || modal.should_close() {
            actions.push(UiAction::DismissWarning);
        }
    }
}

impl eframe::App for HmpiCalculatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.style_applied {
            theme::apply_form_style(ctx);
            self.style_applied = true;
        }
        self.process_ui_events();

        let view = self.model.controller.view();
        let mut actions = Vec::new();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.weak(&self.model.status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(format!("Scoring service: {}", self.startup.scoring_url));
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.heading(
                            egui::RichText::new("Heavy Metal Pollution Indices Calculator")
                                .strong()
                                .size(26.0),
                        );
                    });
                    ui.add_space(16.0);
                    self.show_status_banner(ui, &mut actions);
                    Self::show_form(ui, &view, &mut actions);

                    if let Some(result) = &view.result {
                        ui.add_space(28.0);
                        self.show_results(ui, result, ctx);
                    }
                });
        });

        self.show_warning(ctx, &mut actions);

        for action in actions {
            self.handle_action(action);
        }

        let poll = if self.model.controller.is_pending() {
            Duration::from_millis(16)
        } else {
            Duration::from_millis(100)
        };
        ctx.request_repaint_after(poll);
    }
}
