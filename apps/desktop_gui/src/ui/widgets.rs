//! Stateless view functions. Everything they show comes from their arguments.


/// What the user asked the output area to do this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputAction {
    None,
    Copy,
}

/// Single-line input with a Convert button.
///
/// Returns the raw draft text when the user submits it (Enter or button).
/// The draft is left as typed.
pub fn input_field(ui: &mut egui::Ui, draft: &mut String, should_focus: bool) -> Option<String> {
    let mut submitted = false;

    ui.horizontal(|ui| {
        let button_width = 96.0;
        let edit = egui::TextEdit::singleline(draft)
            .id_salt("money_input")
            .hint_text(
                egui::RichText::new("e.g. 5 usd to eur, 2 lakh")
                    .color(ui.visuals().weak_text_color()),
            )
            .desired_width(f32::INFINITY);
        let width = (ui.available_width() - button_width).max(120.0);
        let response = ui.add_sized([width, 32.0], edit);

        if should_focus {
            response.request_focus();
        }

        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            submitted = true;
            // Keep typing without clicking back into the field.
            response.request_focus();
        }

        let button = egui::Button::new(egui::RichText::new("Convert").strong())
            .min_size(egui::vec2(button_width - 8.0, 32.0));
        if ui.add(button).clicked() {
            submitted = true;
        }
    });

    submitted.then(|| draft.clone())
}

pub fn output_display(ui: &mut egui::Ui, text: &str) -> OutputAction {
    let mut action = OutputAction::None;

    egui::Frame::NONE
        .fill(ui.visuals().faint_bg_color)
        .corner_radius(10.0)
        .inner_margin(egui::Margin::symmetric(14, 12))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            let response = ui.add(
                egui::Label::new(egui::RichText::new(text).size(22.0).monospace())
                    .selectable(true)
                    .wrap(),
            );
            response.context_menu(|ui| {
                if ui.button("Copy").clicked() {
                    action = OutputAction::Copy;
                    ui.close();
                }
            });
        });

    action
}
