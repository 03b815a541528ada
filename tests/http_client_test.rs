//! HTTP 分析客户端测试
//!
//! 用本地 axum 服务模拟分析接口

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use phishing_guard::clients::GENERIC_FAILURE_MESSAGE;
use phishing_guard::{AnalysisClient, ApiError, BatchSession, Candidate, Config, EmailItem, HttpAnalysisClient};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

const ANALYZE_PATH: &str = "/api/analysis/analyze_email/";

/// 服务端收到的一个 multipart 字段
#[derive(Debug, Clone)]
struct UploadedPart {
    name: String,
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

struct FakeService {
    status: StatusCode,
    body: &'static str,
    uploads: Mutex<Vec<UploadedPart>>,
}

impl FakeService {
    async fn uploads(&self) -> Vec<UploadedPart> {
        self.uploads.lock().await.clone()
    }
}

async fn analyze_email(
    State(service): State<Arc<FakeService>>,
    mut multipart: Multipart,
) -> (StatusCode, &'static str) {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        service.uploads.lock().await.push(UploadedPart {
            name,
            file_name,
            content_type,
            bytes,
        });
    }
    (service.status, service.body)
}

/// 启动本地分析服务，按固定状态码和响应体回复
async fn serve(status: StatusCode, body: &'static str) -> (String, Arc<FakeService>) {
    let service = Arc::new(FakeService {
        status,
        body,
        uploads: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route(ANALYZE_PATH, post(analyze_email))
        .with_state(service.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), service)
}

fn client_for(base_url: &str) -> HttpAnalysisClient {
    let config = Config {
        api_base_url: base_url.to_string(),
        request_timeout_secs: 5,
        use_system_proxy: false,
        ..Config::default()
    };
    HttpAnalysisClient::new(&config).unwrap()
}

/// 通过会话生成真实的 `EmailItem`
async fn item_at(path: &Path) -> EmailItem {
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    let session = BatchSession::new();
    session.add_files(vec![Candidate::new(path, name, 0)]).await;
    session.remove(0).await.unwrap()
}

const SAMPLE_EML: &str =
    "From: billing@paypa1.com\r\nTo: me@example.com\r\nSubject: Account on hold\r\n\r\nClick here\r\n";

fn write_eml(dir: &Path, name: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, SAMPLE_EML).unwrap();
    path
}

#[tokio::test]
async fn test_success_uploads_file_and_normalizes_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&write_eml(dir.path(), "hold.eml")).await;
    let (base, service) = serve(
        StatusCode::OK,
        r#"{"sender": "billing@paypa1.com", "subject": "Account on hold",
            "recipient": "me@example.com", "date": null, "body": "Click here",
            "is_suspicious": true, "analysis": "Suspicious link detected"}"#,
    )
    .await;

    let verdict = client_for(&base).analyze(&item).await.unwrap();
    let uploads = service.uploads().await;

    assert!(verdict.is_suspicious);
    assert_eq!(verdict.subject, "Account on hold");
    assert_eq!(verdict.date, "");
    assert_eq!(verdict.findings, vec!["Suspicious link detected"]);

    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].name, "email_file");
    assert_eq!(uploads[0].file_name.as_deref(), Some("hold.eml"));
    assert_eq!(uploads[0].content_type.as_deref(), Some("message/rfc822"));
    assert_eq!(uploads[0].bytes, SAMPLE_EML.as_bytes());
}

#[tokio::test]
async fn test_error_body_message_is_surfaced() {
    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&write_eml(dir.path(), "a.eml")).await;
    let (base, _service) = serve(
        StatusCode::BAD_REQUEST,
        r#"{"error": "No email file provided"}"#,
    )
    .await;

    let err = client_for(&base).analyze(&item).await.unwrap_err();

    match &err {
        ApiError::BadResponse { status, message, .. } => {
            assert_eq!(*status, 400);
            assert_eq!(message, "No email file provided");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.user_message(), "No email file provided");
}

#[tokio::test]
async fn test_error_without_body_uses_generic_message() {
    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&write_eml(dir.path(), "a.eml")).await;
    let (base, _service) = serve(StatusCode::BAD_GATEWAY, "").await;

    let err = client_for(&base).analyze(&item).await.unwrap_err();

    assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_malformed_success_body_is_failure() {
    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&write_eml(dir.path(), "a.eml")).await;
    let (base, _service) = serve(StatusCode::OK, r#"{"verdict": "maybe"}"#).await;

    let err = client_for(&base).analyze(&item).await.unwrap_err();

    assert!(matches!(err, ApiError::JsonParseFailed { .. }));
}

#[tokio::test]
async fn test_missing_file_fails_before_request() {
    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&dir.path().join("deleted.eml")).await;

    let err = client_for("http://127.0.0.1:9").analyze(&item).await.unwrap_err();

    assert!(matches!(err, ApiError::FileReadFailed { .. }));
}

#[tokio::test]
async fn test_unreachable_service_is_request_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let item = item_at(&write_eml(dir.path(), "a.eml")).await;

    let err = client_for(&format!("http://{}", addr))
        .analyze(&item)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::RequestFailed { .. }));
}
