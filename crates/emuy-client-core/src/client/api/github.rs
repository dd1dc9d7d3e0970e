use emuy_shared::{
    const_config::path::{
        path_github_branch_commits, path_github_compare, path_github_merge,
        path_github_workflow_dispatch, path_github_workflow_runs, path_github_workflows,
    },
    errors::RequestError,
    github::{Commit, Comparison, MergeOutcome, WorkflowRuns, Workflows},
    req_args::{DispatchReqArgs, MergeReqArgs, NoArgs},
};
use futures::channel::oneshot;
use reqwest::StatusCode;
use secrecy::SecretString;

use crate::{
    client::{
        deliver, extract_response, handle_error, respond_now, ResponseReceiver, UiCallBack,
    },
    Client,
};

impl Client {
    /// Used for every GitHub request from now on. Reads work without a token
    /// (public repositories only) but dispatching and merging need one.
    #[tracing::instrument(skip(token))]
    pub fn set_github_token(&self, token: Option<SecretString>) {
        self.lock_inner().github_token = token;
    }

    pub fn has_github_token(&self) -> bool {
        self.lock_inner().github_token.is_some()
    }

    /// Latest commit on `branch`
    #[tracing::instrument(skip(ui_notify))]
    pub fn branch_head<F: UiCallBack>(
        &self,
        branch: &str,
        ui_notify: F,
    ) -> ResponseReceiver<Commit> {
        let repo = self.config().github.repo.full_name();
        self.send_request_expect_json(
            path_github_branch_commits(&repo, branch),
            &NoArgs {},
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn workflow_runs<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<WorkflowRuns> {
        let repo = self.config().github.repo.full_name();
        self.send_request_expect_json(path_github_workflow_runs(&repo), &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn workflows<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<Workflows> {
        let repo = self.config().github.repo.full_name();
        self.send_request_expect_json(path_github_workflows(&repo), &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn dispatch_workflow<F: UiCallBack>(
        &self,
        workflow_id: u64,
        git_ref: &str,
        ui_notify: F,
    ) -> ResponseReceiver<()> {
        if !self.has_github_token() {
            return respond_now(Err(token_required()), ui_notify);
        }
        let repo = self.config().github.repo.full_name();
        let args = DispatchReqArgs {
            git_ref: git_ref.to_string(),
        };
        self.send_request_expect_empty(
            path_github_workflow_dispatch(&repo, workflow_id),
            &args,
            ui_notify,
        )
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn compare_branches<F: UiCallBack>(
        &self,
        base: &str,
        head: &str,
        ui_notify: F,
    ) -> ResponseReceiver<Comparison> {
        let repo = self.config().github.repo.full_name();
        self.send_request_expect_json(
            path_github_compare(&repo, base, head),
            &NoArgs {},
            ui_notify,
        )
    }

    /// Merges `head` into `base`. A merge conflict comes back as a status
    /// error with code 409.
    #[tracing::instrument(skip(ui_notify))]
    pub fn merge_branches<F: UiCallBack>(
        &self,
        base: &str,
        head: &str,
        ui_notify: F,
    ) -> ResponseReceiver<MergeOutcome> {
        if !self.has_github_token() {
            return respond_now(Err(token_required()), ui_notify);
        }
        let repo = self.config().github.repo.full_name();
        let args = MergeReqArgs::new(base, head);
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_merge(resp).await;
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request(path_github_merge(&repo), &args, on_done);
        rx
    }
}

fn token_required() -> RequestError {
    RequestError::NotConfigured("a GitHub token is required for this action".to_string())
}

#[tracing::instrument(ret, err(Debug))]
async fn process_merge(
    response: reqwest::Result<reqwest::Response>,
) -> Result<MergeOutcome, RequestError> {
    let response = extract_response(response)?;
    match response.status() {
        StatusCode::CREATED => {
            let commit: Commit = response.json().await.map_err(|e| {
                RequestError::Malformed(format!("failed to parse merge commit: {e}"))
            })?;
            Ok(MergeOutcome::Merged { sha: commit.sha })
        }
        StatusCode::NO_CONTENT => Ok(MergeOutcome::NothingToMerge),
        _ => Err(handle_error(response).await),
    }
}
