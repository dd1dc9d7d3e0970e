use emuy_shared::{errors::RequestError, uac::Role};
use secrecy::{ExposeSecret as _, SecretString};

pub fn get_text_height(ui: &mut egui::Ui) -> f32 {
    egui::TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y)
}

pub fn ui_password_edit(
    ui: &mut egui::Ui,
    password: &mut SecretString,
    hint_text: &str,
) -> egui::Response {
    let mut temp = password.expose_secret().to_owned();
    let result = ui.add(
        egui::TextEdit::singleline(&mut temp)
            .password(true)
            .hint_text(hint_text),
    );
    *password = SecretString::from(temp);
    result
}

pub fn readonly_checkbox_no_text(ui: &mut egui::Ui, mut value: bool) {
    ui.add_enabled(false, egui::Checkbox::without_text(&mut value));
}

/// Convenience function to create escape buttons
pub fn ui_escape_button(ui: &mut egui::Ui, caption: impl Into<egui::WidgetText>) -> bool {
    crate::shortcuts::shortcut_button(
        ui,
        caption,
        "",
        &egui::KeyboardShortcut::new(egui::Modifiers::NONE, egui::Key::Escape),
    )
}

pub fn ui_error_label(ui: &mut egui::Ui, err: &RequestError) {
    ui.colored_label(ui.visuals().error_fg_color, format!("Request failed: {err}"));
}

/// Shown when a request succeeded but returned nothing
pub fn ui_empty_state(ui: &mut egui::Ui, text: &str) {
    ui.weak(text);
}

pub fn ui_card<R>(
    ui: &mut egui::Ui,
    heading: &str,
    add_contents: impl FnOnce(&mut egui::Ui) -> R,
) -> R {
    egui::Frame::group(ui.style())
        .show(ui, |ui| {
            ui.set_min_width(180.0);
            ui.vertical(|ui| {
                ui.strong(heading);
                ui.separator();
                add_contents(ui)
            })
            .inner
        })
        .inner
}

/// Small label with a solid background used for status tags
pub fn ui_badge(ui: &mut egui::Ui, text: impl Into<String>, fill: egui::Color32) {
    ui.label(
        egui::RichText::new(text.into())
            .small()
            .color(egui::Color32::WHITE)
            .background_color(fill),
    );
}

pub fn ui_loading(ui: &mut egui::Ui, text: &str) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label(text);
    });
}

/// Role name in the role's colour when it has a valid one
pub fn ui_role_name(ui: &mut egui::Ui, role: &Role) {
    let mut text = egui::RichText::new(&*role.name);
    if let Some([r, g, b]) = role.color_rgb() {
        text = text.color(egui::Color32::from_rgb(r, g, b));
    }
    ui.label(text);
}
