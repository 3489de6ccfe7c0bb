use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{debug, error, info};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;

use crate::config::Config;
use crate::downloader::{self, EXPORT_FILE_NAME};
use crate::error::SessionError;
use crate::notification::{ExpiryPolicy, Notification, NotificationCenter};
use crate::record::ScanRecord;
use crate::session::{Outcome, ScanSession};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const CSV_FILE_NAME: &str = "ScanResults.csv";

pub struct AppState {
    session: Mutex<ScanSession>,
    // pending banner clear, aborted when a newer notification supersedes it
    expiry_task: Mutex<Option<JoinHandle<()>>>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let notifications = NotificationCenter::new(config.notification_timeout, config.expiry);
        AppState {
            session: Mutex::new(ScanSession::with_notifications(notifications)),
            expiry_task: Mutex::new(None),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Deserialize)]
struct ScanRequest {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct DecodeErrorReport {
    message: String,
}

#[derive(Serialize)]
struct SessionView {
    scanning: bool,
    can_export: bool,
    records: Vec<ScanRecord>,
    notification: Notification,
}

impl SessionView {
    fn of(session: &ScanSession) -> Self {
        SessionView {
            scanning: session.is_scanning(),
            can_export: session.can_export(),
            records: session.records().to_vec(),
            notification: session.notifications().current().clone(),
        }
    }
}

#[derive(Serialize)]
struct ScanResponse {
    outcome: Outcome,
    #[serde(flatten)]
    session: SessionView,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(serve_scanner))
        .route("/api/state", get(get_state))
        .route("/api/notification", get(get_notification))
        .route("/api/scan", post(submit_scan))
        .route("/api/scan/start", post(start_scan))
        .route("/api/scan/stop", post(stop_scan))
        .route("/api/scan/error", post(report_decode_error))
        .route("/api/export", get(export_xlsx))
        .route("/api/export.csv", get(export_csv))
        .route("/api/reset", post(reset_session))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Setup app state
    let app_state = Arc::new(AppState::new(&config));
    let app = router(app_state);

    // Start server
    let listener = TcpListener::bind(config.addr).await?;
    info!("Listening on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_scanner() -> Html<&'static str> {
    Html(include_str!("./static/scanner.html"))
}

async fn get_state(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(SessionView::of(&lock(&state.session)))
}

async fn get_notification(State(state): State<Arc<AppState>>) -> Json<Notification> {
    Json(lock(&state.session).notifications().current().clone())
}

async fn start_scan(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = lock(&state.session);
    session.start_scanning();
    Json(SessionView::of(&session))
}

async fn stop_scan(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = lock(&state.session);
    session.stop_scanning();
    Json(SessionView::of(&session))
}

async fn submit_scan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScanRequest>,
) -> Json<ScanResponse> {
    let text = payload.text.unwrap_or_default();

    let (outcome, view) = {
        let mut session = lock(&state.session);
        let outcome = session.submit_scan(&text);
        // scheduled while the session is still locked, so expiry tasks are
        // stored in the same order their handles were issued
        if outcome != Outcome::Ignored {
            schedule_expiry(&state, &session);
        }
        (outcome, SessionView::of(&session))
    };

    Json(ScanResponse {
        outcome,
        session: view,
    })
}

async fn report_decode_error(
    State(state): State<Arc<AppState>>,
    Json(report): Json<DecodeErrorReport>,
) -> StatusCode {
    lock(&state.session).report_decode_error(&report.message);
    StatusCode::NO_CONTENT
}

async fn reset_session(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    let mut session = lock(&state.session);
    session.reset();
    Json(SessionView::of(&session))
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let session = lock(&state.session);
    let records = match session.export_records() {
        Ok(records) => records,
        Err(e) => return no_data(e),
    };

    match downloader::to_xlsx(records) {
        Ok(buffer) => attachment(XLSX_MIME, EXPORT_FILE_NAME, buffer),
        Err(e) => {
            error!("xlsx export failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    status: "error".to_string(),
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let session = lock(&state.session);
    match session.export_records() {
        Ok(records) => attachment(
            "text/csv; charset=utf-8",
            CSV_FILE_NAME,
            downloader::to_csv(records).into_bytes(),
        ),
        Err(e) => no_data(e),
    }
}

fn attachment(mime: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

fn no_data(e: SessionError) -> Response {
    info!("export refused: {}", e);
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            status: "error".to_string(),
            message: e.to_string(),
        }),
    )
        .into_response()
}

/// Spawn the task that clears the banner raised by the latest scan.
///
/// Must be called with the session lock held, right after the submission
/// that produced `session.last_timer()`.
fn schedule_expiry(state: &Arc<AppState>, session: &ScanSession) {
    let Some(handle) = session.last_timer() else {
        return;
    };
    let policy = session.notifications().policy();

    let delay = handle.remaining(Instant::now());
    let task_state = Arc::clone(state);
    let task = tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let fired = lock(&task_state.session).notifications_mut().fire(handle);
        debug!("banner expiry {} applied: {}", handle.id(), fired);
    });

    match policy {
        ExpiryPolicy::Supersede => {
            if let Some(previous) = lock(&state.expiry_task).replace(task) {
                previous.abort();
            }
        }
        // every timer runs to completion
        ExpiryPolicy::Overlapping => {}
    }
}
