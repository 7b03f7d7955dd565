//! End-to-end lookup: client -> proxy -> stub exam board -> back

mod common;

use axum::http::StatusCode;
use common::*;
use edu_result::{DecryptResult, LookupRequest, ProxyConfig};

const BOARD_RESPONSE: &str = r#"{
    "success": true,
    "exam": "SSC",
    "timestamp": "2024-05-12T10:00:00Z",
    "studentInfo": {
        "Roll No": "123456",
        "Name": "RAHIM UDDIN",
        "Board": "DHAKA",
        "Reg No": "987654321",
        "Institute": "DHAKA COLLEGIATE SCHOOL"
    },
    "subjects": [
        {"code": "101", "name": "BANGLA", "grade": "A+"},
        {"code": "107", "name": "ENGLISH", "grade": "A+"},
        {"code": "109", "name": "MATHEMATICS", "grade": "A+"}
    ],
    "summary": {"GPA": "5.00", "Result": "Passed"}
}"#;

#[tokio::test]
async fn test_lookup_end_to_end() {
    let (upstream, mut hits) = spawn_upstream(StatusCode::OK, BOARD_RESPONSE).await;
    let proxy = spawn_proxy(ProxyConfig::new(upstream, TEST_KEY)).await;
    let client = client(&proxy);

    let request = LookupRequest::new("ssc", "2023", "dhaka", "123456", "987654321");
    let record = client.lookup_record(&request).await.unwrap();

    assert!(record.success);
    assert_eq!(record.summary.gpa, "5.00");
    assert_eq!(record.summary.result, "Passed");
    assert_eq!(record.student_info.name.as_deref(), Some("RAHIM UDDIN"));
    assert_eq!(record.subjects.len(), 3);
    assert_eq!(record.subjects[2].name, "MATHEMATICS");

    let hit = hits.recv().await.unwrap();
    assert_eq!(hit.query.get("exam").map(String::as_str), Some("ssc"));
    assert_eq!(hit.query.get("board").map(String::as_str), Some("dhaka"));
}

#[tokio::test]
async fn test_lookup_by_roll_and_registration() {
    let (upstream, _hits) = spawn_upstream(StatusCode::OK, BOARD_RESPONSE).await;
    let proxy = spawn_proxy(ProxyConfig::new(upstream, TEST_KEY)).await;

    let result = client(&proxy)
        .lookup_by_roll_and_registration("ssc", "2023", "dhaka", "123456", "987654321", None)
        .await
        .unwrap();

    let DecryptResult::Json(value) = result else {
        panic!("expected a JSON result");
    };
    assert_eq!(value["summary"]["GPA"], "5.00");
}

#[tokio::test]
async fn test_health_reports_mirror_state() {
    let (upstream, _hits) = spawn_upstream(StatusCode::OK, BOARD_RESPONSE).await;
    let config = ProxyConfig::new(upstream, TEST_KEY).with_backend_url("http://127.0.0.1:1");
    let proxy = spawn_proxy(config).await;

    let health: serde_json::Value = reqwest::get(format!("{}/health", proxy))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(health["status"], "ok");
    assert_eq!(health["mirror_enabled"], true);
}
