use emuy_shared::{
    const_config::path::PATH_PROJECT_BOARD_QUERY,
    errors::RequestError,
    project_board::{group_by_status, BoardColumn, BoardData, GraphQlRequest, GraphQlResponse},
};

use futures::channel::oneshot;

use crate::{
    client::{deliver, process_json_body, respond_now, ResponseReceiver, UiCallBack},
    Client,
};

impl Client {
    /// Items of the configured project grouped into status columns. Needs
    /// both a project id and a GitHub token, without them the page falls back
    /// to the embed link.
    #[tracing::instrument(skip(ui_notify))]
    pub fn project_board<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<Vec<BoardColumn>> {
        let config = self.config();
        if !config.project_board.has_project_id() {
            return respond_now(
                Err(RequestError::NotConfigured(
                    "no project board id configured".to_string(),
                )),
                ui_notify,
            );
        }
        if !self.has_github_token() {
            return respond_now(
                Err(RequestError::NotConfigured(
                    "a GitHub token is required to query the project board".to_string(),
                )),
                ui_notify,
            );
        }
        let args = GraphQlRequest::project_items(&config.project_board.project_id);
        let (tx, rx) = oneshot::channel();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_json_body::<GraphQlResponse<BoardData>>(resp)
                .await
                .and_then(board_columns);
            deliver(tx, msg);
            ui_notify();
        };
        self.initiate_request(PATH_PROJECT_BOARD_QUERY, &args, on_done);
        rx
    }
}

fn board_columns(response: GraphQlResponse<BoardData>) -> Result<Vec<BoardColumn>, RequestError> {
    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(RequestError::Malformed(messages.join("; ")));
    }
    let data = response
        .data
        .ok_or_else(|| RequestError::Malformed("response contained no data".to_string()))?;
    Ok(group_by_status(data.into_items()))
}
