use emuy_shared::{
    attendance::{
        rank_leaderboard, AttendanceDraft, AttendanceRecord, AttendanceStats, LeaderboardCount,
        LeaderboardEntry, RecordId,
    },
    const_config::path::{
        path_attendance_record_delete, path_attendance_record_update,
        PATH_ATTENDANCE_LEADERBOARD, PATH_ATTENDANCE_RECORDS, PATH_ATTENDANCE_RECORD_CREATE,
        PATH_ATTENDANCE_STATS,
    },
    req_args::NoArgs,
};

use crate::{
    client::{ResponseReceiver, UiCallBack},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify))]
    pub fn list_records<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<Vec<AttendanceRecord>> {
        self.send_request_expect_json(PATH_ATTENDANCE_RECORDS, &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn create_record<F: UiCallBack>(
        &self,
        draft: &AttendanceDraft,
        ui_notify: F,
    ) -> ResponseReceiver<AttendanceRecord> {
        self.send_request_expect_json(PATH_ATTENDANCE_RECORD_CREATE, draft, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn update_record<F: UiCallBack>(
        &self,
        id: RecordId,
        draft: &AttendanceDraft,
        ui_notify: F,
    ) -> ResponseReceiver<AttendanceRecord> {
        self.send_request_expect_json(path_attendance_record_update(id), draft, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn delete_record<F: UiCallBack>(&self, id: RecordId, ui_notify: F) -> ResponseReceiver<()> {
        self.send_request_expect_empty(path_attendance_record_delete(id), &NoArgs {}, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify))]
    pub fn attendance_stats<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<AttendanceStats> {
        self.send_request_expect_json(PATH_ATTENDANCE_STATS, &NoArgs {}, ui_notify)
    }

    /// The service only counts, ranks are assigned here
    #[tracing::instrument(skip(ui_notify))]
    pub fn leaderboard<F: UiCallBack>(
        &self,
        ui_notify: F,
    ) -> ResponseReceiver<Vec<LeaderboardEntry>> {
        self.send_request_map_json(
            PATH_ATTENDANCE_LEADERBOARD,
            &NoArgs {},
            |counts: Vec<LeaderboardCount>| rank_leaderboard(counts),
            ui_notify,
        )
    }
}
