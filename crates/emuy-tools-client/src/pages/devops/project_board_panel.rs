use emuy_shared::project_board::{BoardColumn, BoardItem};

use crate::{
    app::wake_fn,
    pages::resource::{AwaitingType, Resource},
    ui_helpers::ui_empty_state,
    DataShared,
};

const COLUMN_WIDTH: f32 = 220.0;

#[derive(Debug, Default)]
pub struct ProjectBoardPanel {
    columns: Resource<Vec<BoardColumn>>,
}

impl ProjectBoardPanel {
    pub fn ui(&mut self, ui: &mut egui::Ui, data_shared: &DataShared) {
        let config = data_shared.client.config();
        let settings = &config.project_board;
        if !settings.has_project_id() {
            ui.label("The project board is not configured for in-app display.");
            ui.hyperlink_to("Open the project board", &settings.embed_url);
            return;
        }
        if !data_shared.has_github_token() {
            // Loads again once a token is saved
            self.columns.reset();
            ui.label("Save a GitHub token in the GitHub section to show the board here.");
            ui.hyperlink_to("Open the project board", &settings.embed_url);
            return;
        }

        ui.horizontal(|ui| {
            if ui.button("Reload").clicked() {
                self.columns.reset();
            }
            ui.hyperlink_to("Open on GitHub", &settings.embed_url);
        });
        ui.separator();

        let client = &data_shared.client;
        let ctx = ui.ctx().clone();
        let Some(columns) = self
            .columns
            .ui_get(ui, None, || AwaitingType(client.project_board(wake_fn(ctx))))
        else {
            return;
        };
        if columns.is_empty() {
            ui_empty_state(ui, "The board has no items");
            return;
        }
        egui::ScrollArea::horizontal()
            .id_salt("project board columns")
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    for column in columns.iter() {
                        ui_column(ui, column);
                    }
                });
            });
    }
}

fn ui_column(ui: &mut egui::Ui, column: &BoardColumn) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(COLUMN_WIDTH);
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.strong(&column.status);
                ui.weak(column.items.len().to_string());
            });
            ui.separator();
            for item in column.items.iter() {
                ui_item(ui, item);
            }
        });
    });
}

fn ui_item(ui: &mut egui::Ui, item: &BoardItem) {
    let title = match item.number {
        Some(number) => format!("#{number} {}", item.title),
        None => item.title.clone(),
    };
    match &item.url {
        Some(url) => ui.hyperlink_to(title, url),
        None => ui.label(title),
    };
}
