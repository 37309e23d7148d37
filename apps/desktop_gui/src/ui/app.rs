use arboard::Clipboard;

use crate::controller::AppController;
use crate::ui::widgets::{input_field, output_display, OutputAction};

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub server_url: String,
    pub initial_input: Option<String>,
}

pub struct DesktopGuiApp {
    controller: AppController,
    draft: String,
    server_url: String,
    attempted_auto_focus: bool,
    clipboard_note: Option<String>,
    tick: u64,
}

impl DesktopGuiApp {
    pub fn bootstrap(controller: AppController, startup: StartupConfig) -> Self {
        let mut app = Self {
            controller,
            draft: String::new(),
            server_url: startup.server_url,
            attempted_auto_focus: false,
            clipboard_note: None,
            tick: 0,
        };
        if let Some(input) = startup.initial_input {
            app.draft = input.clone();
            app.submit(input);
        }
        app
    }

    fn submit(&mut self, text: String) {
        self.clipboard_note = None;
        self.controller.on_submit(text);
    }

    fn copy_output(&mut self) {
        let text = self.controller.output_text().to_string();
        self.clipboard_note = Some(match Clipboard::new().and_then(|mut c| c.set_text(text)) {
            Ok(()) => "Copied result to clipboard".to_string(),
            Err(err) => {
                tracing::warn!("clipboard unavailable: {err}");
                format!("Clipboard unavailable: {err}")
            }
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.controller.pending() {
                    ui.spinner();
                }
                let status = self
                    .clipboard_note
                    .as_deref()
                    .unwrap_or_else(|| self.controller.status());
                ui.label(status);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.server_url.as_str());
                });
            });
        });
    }

    fn show_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(12.0);
            ui.heading("Money");
            ui.weak("Type an amount and press Enter.");
            ui.add_space(8.0);

            let should_focus = !self.attempted_auto_focus;
            self.attempted_auto_focus = true;
            if let Some(text) = input_field(ui, &mut self.draft, should_focus) {
                self.submit(text);
            }

            ui.add_space(12.0);
            if output_display(ui, self.controller.output_text()) == OutputAction::Copy {
                self.copy_output();
            }
        });
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick = self.tick.wrapping_add(1);

        self.controller.process_ui_events();

        self.show_status_bar(ctx);
        self.show_main(ctx);

        if self.controller.pending() {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

impl Drop for DesktopGuiApp {
    fn drop(&mut self) {
        tracing::debug!(
            frames = self.tick,
            submissions = self.controller.latest_token().map_or(0, |t| t.0),
            stale_discards = self.controller.stale_discards(),
            "closing window"
        );
        self.controller.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::bounded;

    use super::{DesktopGuiApp, StartupConfig};
    use crate::backend_bridge::commands::BackendCommand;
    use crate::controller::AppController;

    #[test]
    fn initial_input_is_submitted_on_startup_and_kept_in_draft() {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (_ui_tx, ui_rx) = bounded(4);
        let app = DesktopGuiApp::bootstrap(
            AppController::new(cmd_tx, ui_rx),
            StartupConfig {
                server_url: "http://127.0.0.1:8080".to_string(),
                initial_input: Some("5 usd".to_string()),
            },
        );

        assert_eq!(app.draft, "5 usd");
        match cmd_rx.try_recv().expect("convert queued") {
            BackendCommand::Convert { text, .. } => assert_eq!(text, "5 usd"),
            other => panic!("unexpected command {other:?}"),
        }

        drop(app);
        assert_eq!(cmd_rx.try_recv().expect("shutdown queued"), BackendCommand::Shutdown);
    }
}
