mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use common::{spawn_report_server, TestEnv, TestPresenter};
use feedback_reporter::{
    ExceptionReport, FeedbackReporter, FeedbackReporterDelegate, JsonFilePreferenceStore,
    PreferenceStore, ReportForm, ReportKind, SubmissionOutcome, TableDataSource,
};
use serde_json::{json, Map, Value};

struct ScrubbingDelegate;

impl FeedbackReporterDelegate for ScrubbingDelegate {
    fn custom_parameters(&self) -> std::collections::BTreeMap<String, String> {
        [("build".to_string(), "1234".to_string())].into_iter().collect()
    }

    fn anonymize_preferences(&self, mut preferences: Map<String, Value>) -> Map<String, Value> {
        if preferences.contains_key("user_name") {
            preferences.insert("user_name".to_string(), json!("<redacted>"));
        }
        preferences
    }
}

#[tokio::test]
async fn crash_report_is_uploaded_and_not_repeated() {
    let env = TestEnv::new();
    let (url, bodies) = spawn_report_server(StatusCode::OK).await;
    let now = Utc::now();

    env.write_crash_log(
        "Notes_2024-05-01-101500_mac.crash",
        "Exception Type: EXC_CRASH (SIGABRT)",
        now - Duration::hours(3),
    );
    env.write_crash_log(
        "Notes_2024-05-02-091000_mac.crash",
        "Exception Type: EXC_BAD_ACCESS (SIGSEGV)",
        now - Duration::hours(1),
    );
    env.write_crash_log("Mail_2024-05-02.crash", "not ours", now);

    let presenter = Arc::new(TestPresenter::default());
    let reporter = FeedbackReporter::builder(env.config(&url), presenter.clone())
        .delegate(Arc::new(ScrubbingDelegate))
        .build()
        .expect("build reporter");

    assert!(reporter.report_if_crash().await);
    let summary = reporter.current_session().expect("window open");
    assert_eq!(summary.kind, ReportKind::Crash);
    assert_eq!(summary.title, "Notes");
    assert_eq!(summary.rows.len(), 2);
    assert_eq!(summary.rows[0].filename, "Notes_2024-05-02-091000_mac.crash");
    assert!(summary.rows[0].selected);
    assert!(summary.report_text.as_deref().unwrap().contains("SIGSEGV"));

    let outcome = reporter
        .submit(ReportForm::new("It crashed while saving").with_email("jane@example.com"))
        .await;
    assert!(matches!(outcome, SubmissionOutcome::Submitted(ref r) if r.status == 200));
    assert!(reporter.status().is_idle());

    let bodies = bodies.lock().unwrap().clone();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["type"], "crash");
    assert_eq!(body["comment"], "It crashed while saving");
    assert_eq!(body["email"], "jane@example.com");
    assert_eq!(body["build"], "1234");
    assert_eq!(body["system"]["app_name"], "Notes");
    assert_eq!(body["system"]["app_version"], "3.2.1");

    let documents = body["documents"].as_object().expect("documents object");
    assert_eq!(documents.len(), 1);
    assert_eq!(
        documents["Notes_2024-05-02-091000_mac.crash"],
        STANDARD.encode("Exception Type: EXC_BAD_ACCESS (SIGSEGV)")
    );

    // A fresh instance reads the persisted check time
    let again = FeedbackReporter::builder(env.config(&url), Arc::new(TestPresenter::default()))
        .build()
        .expect("build reporter");
    assert!(!again.report_if_crash().await);

    let prefs = JsonFilePreferenceStore::open(&env.prefs_path);
    assert_eq!(
        prefs.get_string("FRFeedbackReporter.email").as_deref(),
        Some("jane@example.com")
    );
}

#[tokio::test]
async fn preferences_are_anonymized_before_upload() {
    let env = TestEnv::new();
    let (url, bodies) = spawn_report_server(StatusCode::OK).await;

    let prefs = JsonFilePreferenceStore::open(&env.prefs_path);
    prefs.set("user_name", json!("Jane Appleseed")).unwrap();
    prefs.set("font_size", json!(14)).unwrap();

    let reporter = FeedbackReporter::builder(env.config(&url), Arc::new(TestPresenter::default()))
        .delegate(Arc::new(ScrubbingDelegate))
        .preferences(Arc::new(prefs))
        .build()
        .expect("build reporter");

    assert!(reporter.report_feedback());
    let outcome = reporter.submit(ReportForm::new("Nice app")).await;
    assert!(matches!(outcome, SubmissionOutcome::Submitted(_)));

    let bodies = bodies.lock().unwrap().clone();
    let preferences = &bodies[0]["preferences"];
    assert_eq!(preferences["user_name"], "<redacted>");
    assert_eq!(preferences["font_size"], 14);
    assert_eq!(bodies[0]["type"], "feedback");
    assert!(bodies[0]["email"].is_null());
}

#[tokio::test]
async fn server_error_keeps_window_open() {
    let env = TestEnv::new();
    let (url, bodies) = spawn_report_server(StatusCode::INTERNAL_SERVER_ERROR).await;

    let presenter = Arc::new(TestPresenter::default());
    let reporter = FeedbackReporter::builder(env.config(&url), presenter.clone())
        .build()
        .expect("build reporter");

    let exception = ExceptionReport::new("IOError", "disk full");
    assert!(reporter.report_exception(Some(&exception)));

    let outcome = reporter.submit(ReportForm::new("")).await;
    assert!(matches!(outcome, SubmissionOutcome::Failed(_)));
    assert_eq!(bodies.lock().unwrap().len(), 1);
    assert_eq!(reporter.status().displayed_kind(), Some(ReportKind::Exception));
    assert_eq!(presenter.finished.lock().unwrap().len(), 1);

    assert!(reporter.cancel());
    assert!(reporter.status().is_idle());
}

#[tokio::test]
async fn unreachable_endpoint_is_absorbed() {
    let env = TestEnv::new();
    // Grab a free port and close it again so connections are refused
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/reports", listener.local_addr().unwrap());
    drop(listener);

    let reporter = FeedbackReporter::builder(env.config(&url), Arc::new(TestPresenter::default()))
        .build()
        .expect("build reporter");

    assert!(reporter.report_support_need());
    let outcome = reporter.submit(ReportForm::new("help")).await;
    assert!(matches!(outcome, SubmissionOutcome::Failed(_)));
    assert!(!reporter.status().is_idle());
}

#[tokio::test]
async fn other_file_can_be_attached_to_open_window() {
    let env = TestEnv::new();
    let (url, bodies) = spawn_report_server(StatusCode::OK).await;

    let attachment = env.crash_dir.join("screenshot.png");
    std::fs::write(&attachment, [0x89, b'P', b'N', b'G']).unwrap();

    struct Picker(std::path::PathBuf);
    impl feedback_reporter::FilePicker for Picker {
        fn pick_file(&self) -> Option<std::path::PathBuf> {
            Some(self.0.clone())
        }
    }

    let reporter = FeedbackReporter::builder(env.config(&url), Arc::new(TestPresenter::default()))
        .build()
        .expect("build reporter");
    assert!(reporter.report_feedback());

    struct Button(Option<String>);
    impl feedback_reporter::ActionButton for Button {
        fn set_title(&mut self, title: &str) {
            self.0 = Some(title.to_string());
        }

        fn set_enabled(&mut self, _enabled: bool) {}
    }

    let mut button = Button(None);
    reporter
        .with_session(|s| {
            s.documents_mut()
                .setup_other_button(&mut button, Arc::new(Picker(attachment.clone())))
        })
        .unwrap();
    assert!(button.0.is_some());

    assert!(reporter.other_button_clicked());
    assert_eq!(
        reporter.with_session(|s| s.documents().row_count()),
        Some(1)
    );

    let outcome = reporter.submit(ReportForm::new("see screenshot")).await;
    assert!(matches!(outcome, SubmissionOutcome::Submitted(_)));

    let bodies = bodies.lock().unwrap().clone();
    assert_eq!(
        bodies[0]["documents"]["screenshot.png"],
        STANDARD.encode([0x89, b'P', b'N', b'G'])
    );
}

#[tokio::test]
async fn table_view_may_read_back_through_reporter() {
    use std::sync::{Mutex, OnceLock, Weak};

    #[derive(Default)]
    struct ReadBackView {
        reporter: OnceLock<Weak<FeedbackReporter>>,
        selected: Mutex<Vec<bool>>,
    }

    impl feedback_reporter::TableView for ReadBackView {
        fn reload_data(&self) {}

        fn reload_row(&self, row: usize) {
            let Some(reporter) = self.reporter.get().and_then(Weak::upgrade) else {
                return;
            };
            if let Some(Some(read)) = reporter.with_session(|s| s.documents().row_at(row)) {
                self.selected.lock().unwrap().push(read.selected);
            }
        }
    }

    let env = TestEnv::new();
    env.write_crash_log("Notes_2024-05-01.crash", "boom", Utc::now());

    let reporter = Arc::new(
        FeedbackReporter::builder(env.config("http://127.0.0.1:1"), Arc::new(TestPresenter::default()))
            .build()
            .expect("build reporter"),
    );
    assert!(reporter.report_if_crash().await);

    let view = Arc::new(ReadBackView::default());
    let _ = view.reporter.set(Arc::downgrade(&reporter));
    let bound = view.clone();
    reporter
        .with_session(move |s| s.documents_mut().set_table_view(bound))
        .unwrap();

    let worker = reporter.clone();
    let toggles = tokio::task::spawn_blocking(move || {
        worker.with_session(|s| s.documents_mut().toggle_row(0));
        worker.with_session(|s| s.documents_mut().toggle_row(0));
    });
    tokio::time::timeout(std::time::Duration::from_secs(5), toggles)
        .await
        .expect("row redraw blocked on the reporter state")
        .unwrap();

    // The crash log starts selected
    assert_eq!(*view.selected.lock().unwrap(), vec![false, true]);
}
