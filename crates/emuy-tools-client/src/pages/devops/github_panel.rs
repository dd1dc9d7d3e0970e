use emuy_shared::github::{
    Commit, Comparison, MergeOutcome, RunState, WorkflowRun, WorkflowRuns, Workflows,
};
use egui_extras::{Column, TableBuilder};
use secrecy::SecretString;
use tracing::info;

use super::ui_timestamp_label;
use crate::{
    app::wake_fn,
    pages::resource::{AwaitingType, Resource},
    ui_helpers::{ui_badge, ui_card, ui_empty_state, ui_password_edit},
    DataShared,
};

/// Branch heads, compare and merge, and the Actions workflows of the
/// configured repository. Writes need a token.
#[derive(Debug)]
pub struct GitHubPanel {
    token_input: SecretString,
    base_head: Resource<Commit>,
    head_head: Resource<Commit>,
    comparison: Resource<Comparison>,
    merge: Resource<MergeOutcome>,
    last_merge: Option<MergeOutcome>,
    workflows: Resource<Workflows>,
    runs: Resource<WorkflowRuns>,
    dispatch: Resource<()>,
    last_dispatched: Option<String>,
}

impl Default for GitHubPanel {
    fn default() -> Self {
        Self {
            token_input: SecretString::from(String::new()),
            base_head: Default::default(),
            head_head: Default::default(),
            comparison: Default::default(),
            merge: Default::default(),
            last_merge: None,
            workflows: Default::default(),
            runs: Default::default(),
            dispatch: Default::default(),
            last_dispatched: None,
        }
    }
}

impl GitHubPanel {
    pub fn ui(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        self.ui_token(ui, data_shared);
        ui.separator();

        if ui.button("Reload").clicked() {
            self.reload();
        }
        self.ui_branches(ui, data_shared);
        ui.separator();
        self.ui_workflows(ui, data_shared);
    }

    fn reload(&mut self) {
        self.base_head.reset();
        self.head_head.reset();
        self.comparison.reset();
        self.workflows.reset();
        self.runs.reset();
    }

    fn ui_token(&mut self, ui: &mut egui::Ui, data_shared: &mut DataShared) {
        ui.horizontal(|ui| {
            if data_shared.has_github_token() {
                ui_badge(ui, "Token set", egui::Color32::DARK_GREEN);
                if ui.button("Clear Token").clicked() {
                    data_shared.set_github_token(None);
                }
            } else {
                ui.label("GitHub token");
                ui_password_edit(ui, &mut self.token_input, "Needed to merge and run workflows");
                if ui.button("Save Token").clicked() {
                    let token = std::mem::replace(
                        &mut self.token_input,
                        SecretString::from(String::new()),
                    );
                    data_shared.set_github_token(Some(token));
                }
            }
        });
    }

    fn ui_branches(&mut self, ui: &mut egui::Ui, data_shared: &DataShared) {
        let client = &data_shared.client;
        let config = client.config();
        let settings = &config.github;
        ui.heading(format!("Branches of {}", settings.repo));

        ui.horizontal_wrapped(|ui| {
            for (branch, resource) in [
                (&settings.base_branch, &mut self.base_head),
                (&settings.head_branch, &mut self.head_head),
            ] {
                ui_card(ui, branch, |ui| {
                    let ctx = ui.ctx().clone();
                    if let Some(commit) = resource.ui_get(ui, None, || {
                        AwaitingType(client.branch_head(branch, wake_fn(ctx)))
                    }) {
                        ui_commit(ui, commit);
                    }
                });
            }
        });

        ui.label(format!(
            "Comparing {} into {}",
            settings.head_branch, settings.base_branch
        ));
        let ctx = ui.ctx().clone();
        let Some(comparison) = self.comparison.ui_get(ui, None, || {
            AwaitingType(client.compare_branches(
                &settings.base_branch,
                &settings.head_branch,
                wake_fn(ctx),
            ))
        }) else {
            return;
        };
        let summary = comparison.summary();
        egui::Grid::new("diff summary grid")
            .num_columns(2)
            .show(ui, |ui| {
                ui.label("Status");
                ui.strong(summary.status.to_string());
                ui.end_row();
                ui.label("Ahead / Behind");
                ui.label(format!("{} / {}", summary.ahead_by, summary.behind_by));
                ui.end_row();
                ui.label("Files changed");
                ui.label(summary.files_changed.to_string());
                ui.end_row();
                ui.label("Lines");
                ui.label(format!("+{} -{}", summary.additions, summary.deletions));
                ui.end_row();
            });
        if let Some(url) = &comparison.html_url {
            ui.hyperlink_to("View on GitHub", url);
        }
        ui.collapsing(format!("Files ({})", comparison.files.len()), |ui| {
            for file in comparison.files.iter() {
                ui.horizontal(|ui| {
                    ui.monospace(&file.filename);
                    ui.weak(format!(
                        "{} +{} -{}",
                        file.status, file.additions, file.deletions
                    ));
                });
            }
        });

        if let Some(outcome) = self.merge.ui_operation(ui, "Merging...") {
            info!(?outcome, "merge finished");
            self.last_merge = Some(outcome);
            // Both the head commit and the comparison changed
            self.base_head.reset();
            self.comparison.reset();
            return;
        }
        if let Some(outcome) = &self.last_merge {
            match outcome {
                MergeOutcome::Merged { sha } => {
                    ui.label(format!("Merged as {}", sha.get(..7).unwrap_or(sha)))
                }
                MergeOutcome::NothingToMerge => ui.label("Nothing to merge"),
            };
        }
        let can_merge =
            summary.can_merge() && data_shared.has_github_token() && !self.merge.is_loading();
        let button = ui
            .add_enabled(
                can_merge,
                egui::Button::new(format!(
                    "Merge {} into {}",
                    settings.head_branch, settings.base_branch
                )),
            )
            .on_disabled_hover_text("Needs a token and commits to merge");
        if button.clicked() {
            self.last_merge = None;
            self.merge.start(client.merge_branches(
                &settings.base_branch,
                &settings.head_branch,
                wake_fn(ui.ctx().clone()),
            ));
        }
    }

    fn ui_workflows(&mut self, ui: &mut egui::Ui, data_shared: &DataShared) {
        let client = &data_shared.client;
        let config = client.config();
        let git_ref = &config.github.base_branch;
        ui.heading("Workflows");

        if self.dispatch.ui_operation(ui, "Starting workflow...").is_some() {
            // The new run shows up in the list
            self.runs.reset();
        }
        if let Some(name) = &self.last_dispatched {
            ui.weak(format!("Started {name} on {git_ref}"));
        }

        let ctx = ui.ctx().clone();
        if let Some(workflows) = self
            .workflows
            .ui_get(ui, None, || AwaitingType(client.workflows(wake_fn(ctx))))
        {
            if workflows.workflows.is_empty() {
                ui_empty_state(ui, "No workflows");
            }
            egui::Grid::new("workflows grid")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    for workflow in workflows.workflows.iter() {
                        ui.label(&workflow.name).on_hover_text(&workflow.path);
                        ui.weak(&workflow.state);
                        let can_run = data_shared.has_github_token() && !self.dispatch.is_loading();
                        if ui
                            .add_enabled(can_run, egui::Button::new("Run"))
                            .on_disabled_hover_text("Needs a token")
                            .clicked()
                        {
                            self.last_dispatched = Some(workflow.name.clone());
                            self.dispatch.start(client.dispatch_workflow(
                                workflow.id,
                                git_ref,
                                wake_fn(ui.ctx().clone()),
                            ));
                        }
                        ui.end_row();
                    }
                });
        }

        ui.separator();
        ui.strong("Recent runs");
        let ctx = ui.ctx().clone();
        if let Some(runs) = self
            .runs
            .ui_get(ui, None, || AwaitingType(client.workflow_runs(wake_fn(ctx))))
        {
            if runs.workflow_runs.is_empty() {
                ui_empty_state(ui, "No workflow runs");
            } else {
                ui.weak(format!(
                    "Showing {} of {}",
                    runs.workflow_runs.len(),
                    runs.total_count
                ));
                ui_runs_table(ui, &runs.workflow_runs);
            }
        }
    }
}

fn ui_commit(ui: &mut egui::Ui, commit: &Commit) {
    ui.horizontal(|ui| {
        match &commit.html_url {
            Some(url) => ui.hyperlink_to(commit.short_sha(), url),
            None => ui.monospace(commit.short_sha()),
        };
        ui.label(commit.title());
    });
    ui.weak(format!("by {}", commit.author_name()));
}

fn ui_runs_table(ui: &mut egui::Ui, runs: &[WorkflowRun]) {
    TableBuilder::new(ui)
        .id_salt("workflow runs table")
        .striped(true)
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::auto())
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["#", "Workflow", "Branch", "Event", "State", "Started"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|mut body| {
            for run in runs {
                body.row(18.0, |mut row| {
                    row.col(|ui| {
                        match &run.html_url {
                            Some(url) => ui.hyperlink_to(run.run_number.to_string(), url),
                            None => ui.label(run.run_number.to_string()),
                        };
                    });
                    row.col(|ui| {
                        ui.label(run.name.as_deref().unwrap_or("-"));
                    });
                    row.col(|ui| {
                        ui.label(run.head_branch.as_deref().unwrap_or("-"));
                    });
                    row.col(|ui| {
                        ui.label(&run.event);
                    });
                    row.col(|ui| {
                        let state = run.state();
                        ui_badge(ui, state.to_string(), run_state_color(state));
                    });
                    row.col(|ui| ui_timestamp_label(ui, run.created_at));
                });
            }
        });
}

fn run_state_color(state: RunState) -> egui::Color32 {
    match state {
        RunState::Success => egui::Color32::DARK_GREEN,
        RunState::Failure => egui::Color32::DARK_RED,
        RunState::Queued | RunState::InProgress => egui::Color32::from_rgb(180, 140, 0),
        RunState::Cancelled | RunState::Skipped | RunState::Unknown => egui::Color32::DARK_GRAY,
    }
}
