use emuy_shared::{
    calendar_sync::{SyncConfig, SyncReport, SyncStatus},
    const_config::path::{PATH_SYNC_CONFIG, PATH_SYNC_STATUS, PATH_SYNC_TRIGGER},
    req_args::NoArgs,
};

use crate::{
    client::{ResponseReceiver, UiCallBack},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn sync_status<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<SyncStatus> {
        self.send_request_expect_json(PATH_SYNC_STATUS, &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn sync_config<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<SyncConfig> {
        self.send_request_expect_json(PATH_SYNC_CONFIG, &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn trigger_sync<F: UiCallBack>(&self, ui_notify: F) -> ResponseReceiver<SyncReport> {
        self.send_request_expect_json(PATH_SYNC_TRIGGER, &NoArgs {}, ui_notify)
    }
}
