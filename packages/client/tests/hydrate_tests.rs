// ABOUTME: Tests for loading a stored submission into the edit form

use serde_json::json;
use simlok_client::{load_for_edit, ClientConfig, SubmissionClient};
use simlok_core::{ApprovalStatus, DocumentKind};
use simlok_form::Validator;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SubmissionClient {
    SubmissionClient::new(&ClientConfig::new(Url::parse(&server.uri()).unwrap())).unwrap()
}

fn stored_submission() -> serde_json::Value {
    json!({
        "submission": {
            "id": "sub-7",
            "approval_status": "NEEDS_REVISION",
            "vendor_name": "PT Sinar Jaya",
            "job_description": "Perbaikan pipa",
            "implementation_start_date": "2025-03-03T00:00:00.000Z",
            "implementation_end_date": "2025-03-05T00:00:00.000Z",
            "worker_names": "Ana\nBudi",
            "support_documents": [
                {"id": "d1", "document_type": "SIMJA", "document_subtype": "Ast. Man. Facility Management",
                 "document_number": "S-1", "document_date": "2025-01-10T00:00:00.000Z", "document_upload": "/api/files/s1.pdf"},
                {"id": "d2", "document_type": "SIKA", "document_subtype": "Pekerjaan Panas",
                 "document_number": "K-1", "document_date": "2025-01-11", "document_upload": "/api/files/k1.pdf"},
                {"id": "d3", "document_type": "JSA",
                 "document_number": "J-1", "document_date": "2025-01-12", "document_upload": "/api/files/j1.pdf"}
            ]
        }
    })
}

#[tokio::test]
async fn test_load_for_edit_builds_form() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_submission()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workers": [{
                "id": "w1",
                "worker_name": "Ana",
                "worker_photo": "/api/files/ana.jpg",
                "hsse_pass_number": "HSSE-1",
                "hsse_pass_valid_thru": "2026-01-01T00:00:00.000Z",
                "hsse_pass_document_upload": "/api/files/hsse-ana.pdf"
            }]
        })))
        .mount(&server)
        .await;

    let edit = load_for_edit(&client(&server), "sub-7").await.unwrap();

    assert_eq!(edit.submission_id, "sub-7");
    assert_eq!(edit.approval_status, ApprovalStatus::NeedsRevision);
    let state = &edit.state;
    assert_eq!(state.form_data().implementation_start_date, "2025-03-03");
    assert_eq!(state.workers().len(), 1);
    assert_eq!(state.workers()[0].hsse_pass_valid_thru.as_deref(), Some("2026-01-01"));
    assert_ne!(state.workers()[0].id, "w1");
    assert_eq!(state.desired_count(), 1);
    assert_eq!(state.worker_count_input(), "1");

    assert!(state.documents().is_visible(DocumentKind::Jsa));
    assert!(!state.documents().is_visible(DocumentKind::WorkOrder));
    assert_eq!(
        state.documents().list(DocumentKind::Simja).rows()[0].document_date,
        "2025-01-10"
    );
    assert_eq!(Validator::submission().run(state), Ok(()));
}

#[tokio::test]
async fn test_load_for_edit_falls_back_to_worker_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(stored_submission()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7/workers"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "boom"})))
        .mount(&server)
        .await;

    let edit = load_for_edit(&client(&server), "sub-7").await.unwrap();

    let names: Vec<&str> = edit
        .state
        .workers()
        .iter()
        .map(|w| w.worker_name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana", "Budi"]);
    assert_eq!(edit.state.desired_count(), 2);
}

#[tokio::test]
async fn test_load_for_edit_missing_submission() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/nope"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Pengajuan tidak ditemukan"})))
        .mount(&server)
        .await;

    let err = load_for_edit(&client(&server), "nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.user_message(), "Pengajuan tidak ditemukan");
}

#[tokio::test]
async fn test_load_for_edit_tolerates_null_columns() {
    let server = MockServer::start().await;
    let mut body = stored_submission();
    let submission = &mut body["submission"];
    submission["holiday_working_hours"] = json!(null);
    submission["work_facilities"] = json!(null);
    submission["other_notes"] = json!(null);
    submission["simlok_number"] = json!(null);
    submission["support_documents"][2]["document_subtype"] = json!(null);

    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/submissions/sub-7/workers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "workers": [
                {"worker_name": "Ana", "worker_photo": null, "hsse_pass_number": null},
                {"worker_name": null}
            ]
        })))
        .mount(&server)
        .await;

    let edit = load_for_edit(&client(&server), "sub-7").await.unwrap();

    assert!(edit.simlok_number.is_none());
    let form = edit.state.form_data();
    assert_eq!(form.vendor_name, "PT Sinar Jaya");
    assert_eq!(form.holiday_working_hours, "");
    assert_eq!(form.other_notes, "");
    assert_eq!(edit.state.workers().len(), 2);
    assert_eq!(edit.state.workers()[0].worker_name, "Ana");
    assert_eq!(edit.state.workers()[1].worker_name, "");
    assert!(edit.state.documents().is_visible(DocumentKind::Jsa));
}
