use calendar_sync_panel::CalendarSyncPanel;
use emuy_shared::routes::Route;
use github_panel::GitHubPanel;
use health_panel::HealthPanel;
use project_board_panel::ProjectBoardPanel;
use strum::IntoEnumIterator as _;

use super::DisplayablePage;
use crate::displayable_page_common;

mod calendar_sync_panel;
mod github_panel;
mod health_panel;
mod project_board_panel;

/// Health polling runs for as long as this page is open, whichever section is
/// showing
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UiDevOps {
    is_open: bool,
    page_unique_number: usize,
    section: Section,
    #[serde(skip)]
    health: HealthPanel,
    #[serde(skip)]
    github: GitHubPanel,
    #[serde(skip)]
    calendar_sync: CalendarSyncPanel,
    #[serde(skip)]
    project_board: ProjectBoardPanel,
}

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumIter,
    strum::Display,
)]
enum Section {
    #[default]
    #[strum(to_string = "Service Health")]
    Health,
    GitHub,
    #[strum(to_string = "Calendar Sync")]
    CalendarSync,
    #[strum(to_string = "Project Board")]
    ProjectBoard,
}

impl DisplayablePage for UiDevOps {
    displayable_page_common!("DevOps", Route::DevOps);

    fn reset_to_default(&mut self, _: super::private::Token) {
        // Dropping the health panel stops the polling
        self.health = Default::default();
        self.github = Default::default();
        self.calendar_sync = Default::default();
        self.project_board = Default::default();
    }

    fn show(&mut self, ui: &mut eframe::egui::Ui, data_shared: &mut crate::DataShared) {
        self.health.tick(ui.ctx(), &data_shared.client);

        ui.horizontal(|ui| {
            for section in Section::iter() {
                ui.selectable_value(&mut self.section, section, section.to_string());
            }
            ui.separator();
            self.health.ui_summary(ui);
        });
        ui.separator();

        match self.section {
            Section::Health => self.health.ui(ui),
            Section::GitHub => self.github.ui(ui, data_shared),
            Section::CalendarSync => self.calendar_sync.ui(ui, &data_shared.client),
            Section::ProjectBoard => self.project_board.ui(ui, data_shared),
        }
    }
}

fn ui_timestamp_label(ui: &mut egui::Ui, at: Option<chrono::DateTime<chrono::Utc>>) {
    match at {
        Some(at) => ui.label(at.format("%Y-%m-%d %H:%M").to_string()),
        None => ui.weak("-"),
    };
}
