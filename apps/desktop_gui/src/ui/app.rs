//! The upload form window.

use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{Severity, ALLOWED_EXTENSIONS};

use crate::backend_bridge::{commands::BackendCommand, save_dialog::SaveRequest};
use crate::controller::{
    events::UiEvent, orchestration::dispatch_backend_command, reducer::FormView,
};

const FORM_WIDTH: f32 = 420.0;
const ACCENT: egui::Color32 = egui::Color32::from_rgb(59, 130, 246);

pub struct UploadFormApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    save_rx: Receiver<SaveRequest>,
    view: FormView,
}

impl UploadFormApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        save_rx: Receiver<SaveRequest>,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            save_rx,
            view: FormView::default(),
        }
    }

    fn process_ui_events(&mut self) {
        let now = Instant::now();
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event, now);
        }
        self.view.expire_toasts(now);
    }

    /// Save prompts from the backend are answered here so the native dialog
    /// runs on the UI thread.
    fn answer_save_requests(&mut self) {
        while let Ok(request) = self.save_rx.try_recv() {
            let chosen = rfd::FileDialog::new()
                .set_file_name(&request.file_name)
                .add_filter("Zip archive", &["zip"])
                .save_file();
            if request.reply.send(chosen).is_err() {
                tracing::warn!("backend stopped waiting for the save prompt");
            }
        }
    }

    fn dispatch(&mut self, cmd: BackendCommand) {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.view);
    }

    /// Cancelling the dialog keeps the current selection; "Clear" drops it.
    fn pick_file(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Excel workbook", ALLOWED_EXTENSIONS)
            .pick_file();
        if let Some(path) = picked {
            self.dispatch(BackendCommand::SelectFile { path: Some(path) });
        }
    }

    fn show_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("app_header").show(ctx, |ui| {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("✈").size(32.0).color(ACCENT));
                ui.label(egui::RichText::new("Flight Price").strong().size(30.0));
            });
            ui.add_space(8.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.weak(self.view.status.as_str());
        });
    }

    fn show_form(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let top_space = (ui.available_height() * 0.15).clamp(12.0, 120.0);
            ui.add_space(top_space);

            ui.vertical_centered(|ui| {
                ui.heading("Generate flight price predictions");
                ui.add_space(16.0);
                ui.set_width(FORM_WIDTH);

                egui::Frame::NONE
                    .fill(ui.visuals().faint_bg_color)
                    .corner_radius(16.0)
                    .stroke(egui::Stroke::new(
                        1.0,
                        ui.visuals().widgets.noninteractive.bg_stroke.color,
                    ))
                    .inner_margin(egui::Margin::symmetric(24, 20))
                    .show(ui, |ui| self.show_form_body(ui));
            });
        });
    }

    fn show_form_body(&mut self, ui: &mut egui::Ui) {
        ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);

        ui.label(egui::RichText::new(self.view.form.label.as_str()).strong());

        let picker_enabled = self.view.picker_enabled();
        let can_clear = picker_enabled && self.view.form.has_file;
        let mut pick_clicked = false;
        let mut clear_clicked = false;
        ui.horizontal(|ui| {
            pick_clicked = ui
                .add_enabled(picker_enabled, egui::Button::new("Choose file…"))
                .clicked();
            clear_clicked = ui
                .add_enabled(can_clear, egui::Button::new("Clear"))
                .clicked();
        });
        ui.weak("Select an .xlsx file to upload");
        ui.add_space(8.0);

        let processing = self.view.is_processing();
        let label = if processing {
            "Processing..."
        } else {
            "Generate predictions"
        };
        let submit_button = egui::Button::new(egui::RichText::new(label).strong().size(16.0))
            .fill(ACCENT)
            .min_size(egui::vec2(ui.available_width(), 40.0));
        let submit_clicked = ui
            .add_enabled(self.view.can_submit(), submit_button)
            .clicked();
        if processing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.weak("Waiting for the prediction service");
            });
        }

        if pick_clicked {
            self.pick_file();
        } else if clear_clicked {
            self.dispatch(BackendCommand::SelectFile { path: None });
        } else if submit_clicked {
            self.dispatch(BackendCommand::Submit);
        }
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.view.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::vec2(-16.0, -40.0))
            .show(ctx, |ui| {
                for toast in &self.view.toasts {
                    let fill = match toast.notification.severity {
                        Severity::Error => egui::Color32::from_rgb(220, 38, 38),
                        Severity::Warning => egui::Color32::from_rgb(217, 119, 6),
                        Severity::Info => ACCENT,
                    };
                    egui::Frame::NONE
                        .fill(fill)
                        .corner_radius(8.0)
                        .inner_margin(egui::Margin::symmetric(12, 8))
                        .show(ui, |ui| {
                            ui.label(
                                egui::RichText::new(toast.notification.message.as_str())
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for UploadFormApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();
        self.answer_save_requests();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_form(ctx);
        self.show_toasts(ctx);

        if self.view.is_processing() || !self.view.toasts.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
