//! Stub collaborators for the client integration tests. A single actix-web
//! server on a random port answers for the auth service, the attendance api,
//! the calendar sync worker, GitHub, the project board and the health
//! endpoint. Responses come from [`StubState`] which the tests can inspect and
//! change.

#![warn(unused_crate_dependencies)]

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use anyhow::Context as _;
use emuy_client_core::{
    get_configuration, Client, ClientConfiguration, HealthTarget, ServiceUrls,
};
use emuy_shared::{
    admin::{ActivityEntry, AdminUser, PermissionInfo},
    attendance::{
        AttendanceDraft, AttendanceRecord, AttendanceStats, LeaderboardCount, RecordId,
    },
    req_args::{ActivityReqArgs, AssignRoleReqArgs},
    telemetry::{self, get_subscriber, init_subscriber},
    uac::{Role, RoleDraft},
};
use emuy_time::Seconds;
use serde_json::json;
use std::net::TcpListener;
use std::ops::Deref;
use std::sync::{LazyLock, Mutex};
use std::time::Duration;
use tracing_actix_web::TracingLogger;
use uuid::Uuid;

/// Short so the timeout test does not take long
pub const TEST_HEALTH_TIMEOUT: Seconds = Seconds::new(1);

// Ensure that the `tracing` stack is only initialised once
pub static TRACING: LazyLock<String> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let log_file_name = format!("client_tests{}", Uuid::new_v4());
        let (file, path) = telemetry::create_trace_file(&log_file_name).unwrap();
        let subscriber = get_subscriber(subscriber_name, default_filter_level, file);
        init_subscriber(subscriber).unwrap();
        format!("Traces for tests being written to: {path:?}")
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).unwrap();
        "Traces set to std::io::sink".to_string()
    }
});

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub stub: web::Data<StubState>,
}

impl std::fmt::Debug for TestApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestApp")
            .field("address", &self.address)
            .finish()
    }
}

/// What the stub collaborators answer with
#[derive(Debug)]
pub struct StubState {
    pub me: Mutex<CannedResponse>,
    pub health: Mutex<CannedHealth>,
    pub users: Mutex<Vec<AdminUser>>,
    pub roles: Mutex<Vec<Role>>,
    pub activity: Mutex<Vec<ActivityEntry>>,
    pub records: Mutex<Vec<AttendanceRecord>>,
    pub leaderboard: Mutex<Vec<LeaderboardCount>>,
    /// `METHOD path` of every request received, in order
    pub requests: Mutex<Vec<String>>,
    /// Value of the last `Authorization` header seen, if any
    pub last_authorization: Mutex<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct CannedResponse {
    pub status: u16,
    pub body: serde_json::Value,
}

#[derive(Debug, Clone, Copy)]
pub struct CannedHealth {
    pub status: u16,
    pub delay: Duration,
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

/// Body of `/auth/me` for a logged in user
pub fn me_authenticated(permissions: &[&str], is_super_admin: bool) -> serde_json::Value {
    json!({
        "authenticated": true,
        "user": {
            "id": "1",
            "username": "emuy",
            "displayName": "Emuy",
            "avatar": null
        },
        "roles": [
            {"id": "r1", "name": "Member", "color": "#3498db", "priority": 1},
            {"id": "r2", "name": "Officer", "color": "#e67e22", "priority": 5}
        ],
        "permissions": permissions,
        "isSuperAdmin": is_super_admin
    })
}

pub fn me_unauthenticated() -> serde_json::Value {
    json!({ "authenticated": false })
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Starts the stubs and builds a [`Client`] pointed at them. `customize` can
/// adjust the configuration before the client is built.
pub async fn spawn_app_with<F>(customize: F) -> TestApp
where
    F: FnOnce(&mut ClientConfiguration),
{
    start_tracing();
    let stub = web::Data::new(StubState::default());
    let address = start_stub_server(stub.clone())
        .await
        .expect("failed to start stub server");

    let mut configuration = get_configuration().expect("failed to read configuration");
    configuration.services = ServiceUrls::all_at(&address);
    configuration.health.timeout_secs = TEST_HEALTH_TIMEOUT;
    configuration.health.services = vec![HealthTarget {
        name: "Stub".to_string(),
        url: address.clone(),
    }];
    configuration.project_board.project_id = "PVT_test".to_string();
    customize(&mut configuration);

    let client = Client::new(configuration).expect("failed to build client");
    TestApp {
        address,
        client,
        stub,
    }
}

fn start_tracing() {
    // Accessing TRACING also forces the LazyLock to initialize
    let logging_msg = TRACING.deref();
    println!("{logging_msg}");
}

async fn start_stub_server(stub: web::Data<StubState>) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").context("failed to bind random port")?;
    let port = listener
        .local_addr()
        .context("failed to get local address of listener")?
        .port();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(stub.clone())
            .configure(stub_routes)
    })
    .workers(1)
    .listen(listener)
    .context("failed to bind stub server to listener")?
    .run();
    // Runs until the test's runtime shuts down
    tokio::spawn(server);
    Ok(format!("http://127.0.0.1:{port}"))
}

fn stub_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .route("/auth/me", web::get().to(auth_me))
        .route("/auth/admin/users", web::get().to(list_users))
        .route("/auth/admin/users/{id}/ban", web::post().to(ban_user))
        .route("/auth/admin/users/{id}/unban", web::post().to(unban_user))
        .route("/auth/admin/users/{id}/roles", web::post().to(assign_role))
        .route(
            "/auth/admin/users/{id}/roles/{role_id}",
            web::delete().to(remove_role),
        )
        .route("/auth/admin/roles", web::get().to(list_roles))
        .route("/auth/admin/roles", web::post().to(create_role))
        .route("/auth/admin/permissions", web::get().to(list_permissions))
        .route("/auth/admin/activity", web::get().to(recent_activity))
        .route("/attendance/records", web::get().to(list_records))
        .route("/attendance/records", web::post().to(create_record))
        .route("/attendance/records/{id}", web::put().to(update_record))
        .route("/attendance/records/{id}", web::delete().to(delete_record))
        .route("/attendance/leaderboard", web::get().to(leaderboard))
        .route("/attendance/stats", web::get().to(attendance_stats))
        .route("/status", web::get().to(sync_status))
        .route("/config", web::get().to(sync_config))
        .route("/sync", web::post().to(trigger_sync))
        .route(
            "/repos/{owner}/{repo}/compare/{basehead}",
            web::get().to(github_compare),
        )
        .route("/repos/{owner}/{repo}/merges", web::post().to(github_merge))
        .route("/graphql", web::post().to(project_board));
}

impl Default for StubState {
    fn default() -> Self {
        Self {
            me: Mutex::new(CannedResponse {
                status: 200,
                body: me_authenticated(&["view_cruddy"], false),
            }),
            health: Mutex::new(CannedHealth {
                status: 200,
                delay: Duration::ZERO,
            }),
            users: Mutex::new(Vec::new()),
            roles: Mutex::new(vec![Role {
                id: "r1".into(),
                name: "Member".to_string().try_into().unwrap(),
                color: Some("#3498db".to_string()),
                priority: 1,
            }]),
            activity: Mutex::new(Vec::new()),
            records: Mutex::new(Vec::new()),
            leaderboard: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            last_authorization: Mutex::new(None),
        }
    }
}

impl StubState {
    pub fn set_me(&self, status: u16, body: serde_json::Value) {
        *self.me.lock().unwrap() = CannedResponse { status, body };
    }

    pub fn set_health(&self, status: u16, delay: Duration) {
        *self.health.lock().unwrap() = CannedHealth { status, delay };
    }

    /// Number of requests received for `METHOD path`
    pub fn request_count(&self, method_and_path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| *r == method_and_path)
            .count()
    }

    fn record(&self, req: &HttpRequest) {
        self.requests
            .lock()
            .unwrap()
            .push(format!("{} {}", req.method(), req.path()));
        if let Some(value) = req.headers().get(actix_web::http::header::AUTHORIZATION) {
            *self.last_authorization.lock().unwrap() = value.to_str().ok().map(str::to_string);
        }
    }
}

fn not_found(what: &str) -> HttpResponse {
    HttpResponse::NotFound().body(format!("{what} not found"))
}

fn status_code(status: u16) -> actix_web::http::StatusCode {
    actix_web::http::StatusCode::from_u16(status)
        .unwrap_or(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
}

async fn health(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    let canned = *stub.health.lock().unwrap();
    if !canned.delay.is_zero() {
        actix_web::rt::time::sleep(canned.delay).await;
    }
    HttpResponse::build(status_code(canned.status)).finish()
}

async fn auth_me(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    let canned = stub.me.lock().unwrap().clone();
    HttpResponse::build(status_code(canned.status)).json(canned.body)
}

async fn list_users(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(&*stub.users.lock().unwrap())
}

fn set_banned(stub: &StubState, id: &str, banned: bool) -> HttpResponse {
    let mut users = stub.users.lock().unwrap();
    match users.iter_mut().find(|u| u.id.as_ref() == id) {
        Some(user) => {
            user.banned = banned;
            HttpResponse::Ok().finish()
        }
        None => not_found("user"),
    }
}

async fn ban_user(
    req: HttpRequest,
    path: web::Path<String>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    set_banned(&stub, &path, true)
}

async fn unban_user(
    req: HttpRequest,
    path: web::Path<String>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    set_banned(&stub, &path, false)
}

async fn assign_role(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AssignRoleReqArgs>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let Some(role) = stub
        .roles
        .lock()
        .unwrap()
        .iter()
        .find(|r| r.id == body.role_id)
        .cloned()
    else {
        return not_found("role");
    };
    let mut users = stub.users.lock().unwrap();
    match users.iter_mut().find(|u| u.id.as_ref() == path.as_str()) {
        Some(user) => {
            if !user.has_role(&role) {
                user.roles.push(role);
            }
            HttpResponse::Ok().finish()
        }
        None => not_found("user"),
    }
}

async fn remove_role(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let (user_id, role_id) = path.into_inner();
    let mut users = stub.users.lock().unwrap();
    match users.iter_mut().find(|u| u.id.as_ref() == user_id) {
        Some(user) => {
            user.roles.retain(|r| r.id.as_ref() != role_id);
            HttpResponse::NoContent().finish()
        }
        None => not_found("user"),
    }
}

async fn list_roles(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(&*stub.roles.lock().unwrap())
}

async fn create_role(
    req: HttpRequest,
    body: web::Json<RoleDraft>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let mut roles = stub.roles.lock().unwrap();
    let draft = body.into_inner();
    let role = Role {
        id: format!("r{}", roles.len() + 1).into(),
        name: draft.name,
        color: draft.color,
        priority: draft.priority,
    };
    roles.push(role.clone());
    HttpResponse::Created().json(role)
}

async fn list_permissions(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    let catalogue: Vec<PermissionInfo> = ["view_admin", "view_cruddy", "view_devops"]
        .into_iter()
        .map(|name| PermissionInfo {
            name: name.into(),
            description: None,
        })
        .collect();
    HttpResponse::Ok().json(catalogue)
}

async fn recent_activity(
    req: HttpRequest,
    query: web::Query<ActivityReqArgs>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let activity = stub.activity.lock().unwrap();
    let limited: Vec<&ActivityEntry> = activity.iter().take(query.limit.into()).collect();
    HttpResponse::Ok().json(limited)
}

async fn list_records(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(&*stub.records.lock().unwrap())
}

async fn create_record(
    req: HttpRequest,
    body: web::Json<AttendanceDraft>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let mut records = stub.records.lock().unwrap();
    let draft = body.into_inner();
    let record = AttendanceRecord {
        id: records.iter().map(|r| r.id).max().unwrap_or(0) + 1,
        name: draft.name,
        event: draft.event,
        time: draft.time,
    };
    records.push(record.clone());
    HttpResponse::Created().json(record)
}

async fn update_record(
    req: HttpRequest,
    path: web::Path<RecordId>,
    body: web::Json<AttendanceDraft>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let id = path.into_inner();
    let mut records = stub.records.lock().unwrap();
    match records.iter_mut().find(|r| r.id == id) {
        Some(record) => {
            let draft = body.into_inner();
            record.name = draft.name;
            record.event = draft.event;
            record.time = draft.time;
            HttpResponse::Ok().json(record.clone())
        }
        None => not_found("record"),
    }
}

async fn delete_record(
    req: HttpRequest,
    path: web::Path<RecordId>,
    stub: web::Data<StubState>,
) -> HttpResponse {
    stub.record(&req);
    let id = path.into_inner();
    let mut records = stub.records.lock().unwrap();
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        not_found("record")
    } else {
        HttpResponse::NoContent().finish()
    }
}

async fn leaderboard(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(&*stub.leaderboard.lock().unwrap())
}

async fn attendance_stats(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    let stats = AttendanceStats::from_records(&stub.records.lock().unwrap());
    HttpResponse::Ok().json(stats)
}

async fn sync_status(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(json!({
        "running": false,
        "lastSync": "2024-05-01T10:00:00Z",
        "lastResult": "ok",
        "eventsSynced": 12
    }))
}

async fn sync_config(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(json!({
        "calendarId": "events@group.calendar.google.com",
        "intervalMinutes": 15,
        "enabled": true
    }))
}

async fn trigger_sync(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(json!({"created": 2, "updated": 1, "deleted": 0, "errors": []}))
}

async fn github_compare(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(json!({
        "status": "ahead",
        "ahead_by": 2,
        "behind_by": 0,
        "total_commits": 2,
        "files": [
            {"filename": "src/lib.rs", "status": "modified", "additions": 7, "deletions": 3},
            {"filename": "Cargo.toml", "status": "modified", "additions": 1, "deletions": 1}
        ]
    }))
}

async fn github_merge(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Created().json(json!({
        "sha": "abcdef0123456789",
        "commit": {"message": "Merge dev into main"}
    }))
}

async fn project_board(req: HttpRequest, stub: web::Data<StubState>) -> HttpResponse {
    stub.record(&req);
    HttpResponse::Ok().json(json!({"data": {"node": {"title": "Roadmap", "items": {"nodes": [
        {"id": "1", "fieldValueByName": {"name": "Todo"}, "content": {"title": "Health grid"}},
        {"id": "2", "fieldValueByName": {"name": "Done"}, "content": {"title": "Leaderboard"}},
        {"id": "3", "fieldValueByName": {"name": "Todo"}, "content": {"title": "Calendar sync"}}
    ]}}}}))
}
