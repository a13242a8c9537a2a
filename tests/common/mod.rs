#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use feedback_reporter::{Config, ReportPresenter, SessionSummary, SubmissionOutcome};
use serde_json::Value;
use tempfile::TempDir;
use uuid::Uuid;

pub const APP_NAME: &str = "Notes";

pub struct TestEnv {
    _tmp: TempDir,
    pub crash_dir: PathBuf,
    pub prefs_path: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let crash_dir = tmp.path().join("DiagnosticReports");
        fs::create_dir_all(&crash_dir).expect("create crash dir");
        let prefs_path = tmp.path().join("prefs").join("feedback.json");

        Self {
            _tmp: tmp,
            crash_dir,
            prefs_path,
        }
    }

    pub fn config(&self, target_url: &str) -> Config {
        let mut config = Config::default();
        config.app.name = APP_NAME.to_string();
        config.app.version = "3.2.1".to_string();
        config.submission.target_url = target_url.to_string();
        config.crash_logs.directory = self.crash_dir.clone();
        config.preferences.path = self.prefs_path.clone();
        config
    }

    pub fn write_crash_log(&self, name: &str, body: &str, modified: DateTime<Utc>) -> PathBuf {
        let path = self.crash_dir.join(name);
        fs::write(&path, body).expect("write crash log");
        set_modified(&path, modified);
        path
    }
}

pub fn set_modified(path: &Path, at: DateTime<Utc>) {
    let file = fs::File::options()
        .write(true)
        .open(path)
        .expect("open for mtime");
    file.set_modified(SystemTime::from(at)).expect("set mtime");
}

/// Report window double that always shows and records callbacks
#[derive(Default)]
pub struct TestPresenter {
    pub presented: Mutex<Vec<SessionSummary>>,
    pub finished: Mutex<Vec<(Uuid, SubmissionOutcome)>>,
}

impl ReportPresenter for TestPresenter {
    fn present(&self, session: &SessionSummary) -> bool {
        self.presented.lock().unwrap().push(session.clone());
        true
    }

    fn submission_finished(&self, session_id: Uuid, outcome: &SubmissionOutcome) {
        self.finished
            .lock()
            .unwrap()
            .push((session_id, outcome.clone()));
    }
}

#[derive(Clone)]
struct Captured {
    bodies: Arc<Mutex<Vec<Value>>>,
    status: StatusCode,
}

async fn capture(State(state): State<Captured>, Json(body): Json<Value>) -> (StatusCode, String) {
    state.bodies.lock().unwrap().push(body);
    (state.status, "report received".to_string())
}

/// Start a local endpoint answering `status`; returns its URL and the bodies it saw
pub async fn spawn_report_server(status: StatusCode) -> (String, Arc<Mutex<Vec<Value>>>) {
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let state = Captured {
        bodies: bodies.clone(),
        status,
    };

    let app = Router::new()
        .route("/reports", post(capture))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    (format!("http://{}/reports", addr), bodies)
}
