// ABOUTME: End-to-end submit flow against a mock SIMLOK server
// ABOUTME: Double-submit guard, PDF gate, error messages and draft clearing

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use simlok_client::error::{GENERIC_SERVER_ERROR, GENERIC_UNEXPECTED_ERROR};
use simlok_client::pdf::MSG_NOT_PDF;
use simlok_client::pdf_gate::MSG_DOWNLOAD_FAILED;
use simlok_client::{
    ClientConfig, StructuralPdfValidator, SubmissionClient, SubmitController, SubmitError,
    SubmitMode, SubmitOutcome,
};
use simlok_core::{DocField, DocumentKind, FormField};
use simlok_form::{DraftManager, FormState, MemoryStore, RecordingNotifier, ToastLevel};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

struct Harness {
    controller: SubmitController,
    drafts: Arc<DraftManager>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(base_url: &str) -> Harness {
    let config = ClientConfig::new(Url::parse(base_url).unwrap());
    let client = SubmissionClient::new(&config).unwrap();
    let drafts = Arc::new(DraftManager::new(Arc::new(MemoryStore::new())));
    let notifier = Arc::new(RecordingNotifier::new());
    let controller = SubmitController::new(
        client,
        Arc::new(StructuralPdfValidator::shallow()),
        drafts.clone(),
        notifier.clone(),
    );
    Harness {
        controller,
        drafts,
        notifier,
    }
}

fn doc_id(state: &FormState, kind: DocumentKind) -> String {
    state.documents().list(kind).rows()[0].id.clone()
}

fn complete_form() -> FormState {
    let mut state = FormState::new();
    state.set_field(FormField::VendorName, "PT Sinar Jaya");
    state.set_field(FormField::JobDescription, "Perbaikan pipa");
    state.set_field(FormField::ImplementationStartDate, "2025-03-03");
    state.set_field(FormField::ImplementationEndDate, "2025-03-05");

    for (kind, upload) in [
        (DocumentKind::Simja, "/api/files/simja.pdf"),
        (DocumentKind::Sika, "/api/files/sika.pdf"),
    ] {
        let id = doc_id(&state, kind);
        if kind == DocumentKind::Sika {
            state.update_document(kind, &id, DocField::Subtype, "Pekerjaan Panas");
        }
        state.update_document(kind, &id, DocField::Number, "001/2025");
        state.update_document(kind, &id, DocField::Date, "2025-01-15");
        state.update_document(kind, &id, DocField::Upload, upload);
    }

    let id = state.workers()[0].id.clone();
    state.update_worker_name(&id, "Ana");
    state.update_worker_photo(&id, "/api/files/ana.jpg");
    state.update_worker_hsse_number(&id, "HSSE-001");
    state.update_worker_hsse_valid_thru(&id, "2026-01-01");
    state.update_worker_hsse_document(&id, "/api/files/hsse-ana.pdf");
    state
}

async fn serve_pdfs(server: &MockServer) {
    for file in ["/api/files/simja.pdf", "/api/files/sika.pdf"] {
        Mock::given(method("GET"))
            .and(path(file))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(PDF.to_vec()))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_double_submit_sends_one_request() {
    let server = MockServer::start().await;
    serve_pdfs(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/submissions"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"submission": {"id": "sub-1"}}))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let state = complete_form();

    let (first, second) = tokio::join!(
        h.controller.submit(&state, SubmitMode::Create),
        h.controller.submit(&state, SubmitMode::Create),
    );

    assert!(matches!(first.unwrap(), SubmitOutcome::Submitted(_)));
    assert_eq!(second.unwrap(), SubmitOutcome::Ignored);
    assert!(!h.controller.is_submitting());
}

#[tokio::test]
async fn test_count_mismatch_makes_no_network_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let mut state = complete_form();
    state.set_worker_count_input("3");

    let err = h
        .controller
        .submit(&state, SubmitMode::Create)
        .await
        .unwrap_err();

    let SubmitError::Validation(failure) = &err else {
        panic!("expected a validation failure, got {err:?}");
    };
    assert_eq!(failure.check, "worker_count");
    assert!(server.received_requests().await.unwrap().is_empty());
    assert_eq!(h.notifier.toasts()[0].level, ToastLevel::Error);
    assert!(!h.controller.is_submitting());
}

#[tokio::test]
async fn test_pdf_gate_marks_broken_documents() {
    let server = MockServer::start().await;
    // simja.pdf is not mounted and answers 404
    Mock::given(method("GET"))
        .and(path("/api/files/sika.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let state = complete_form();

    let err = h
        .controller
        .submit(&state, SubmitMode::Create)
        .await
        .unwrap_err();

    let report = err.invalid_documents().expect("pdf report");
    assert_eq!(report.checked, 2);
    assert_eq!(
        report.invalid.get(&doc_id(&state, DocumentKind::Simja)).map(String::as_str),
        Some(MSG_DOWNLOAD_FAILED)
    );
    assert_eq!(
        report.invalid.get(&doc_id(&state, DocumentKind::Sika)).map(String::as_str),
        Some(MSG_NOT_PDF)
    );
    // one aggregate toast
    assert_eq!(h.notifier.count(), 1);
}

#[tokio::test]
async fn test_success_clears_draft_and_resets_form() {
    let server = MockServer::start().await;
    serve_pdfs(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/submissions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "sub-9"})))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let mut state = complete_form();
    assert!(h.drafts.save(&state.to_draft()));

    let outcome = h
        .controller
        .submit_and_reset(&mut state, SubmitMode::Create)
        .await
        .unwrap();

    let SubmitOutcome::Submitted(receipt) = outcome else {
        panic!("expected a receipt");
    };
    assert_eq!(receipt.submission_id.as_deref(), Some("sub-9"));
    assert_eq!(receipt.redirect_to, "/vendor/submissions");
    assert!(h.drafts.load().is_none());
    assert_eq!(state.form_data().vendor_name, "");
    assert_eq!(state.workers().len(), 1);

    let requests = server.received_requests().await.unwrap();
    let post = requests.iter().find(|r| r.method.as_str() == "POST").unwrap();
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert_eq!(body["worker_names"], "Ana");
    assert_eq!(body["sika_documents"][0]["document_subtype"], "Pekerjaan Panas");
}

#[tokio::test]
async fn test_update_skips_pdf_gate() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/submissions/sub-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let outcome = h
        .controller
        .submit(
            &complete_form(),
            SubmitMode::Update {
                id: "sub-3".to_string(),
            },
        )
        .await
        .unwrap();

    let SubmitOutcome::Submitted(receipt) = outcome else {
        panic!("expected a receipt");
    };
    assert_eq!(receipt.submission_id.as_deref(), Some("sub-3"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_server_error_messages() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/submissions/known"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"error": "Vendor belum terverifikasi"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/submissions/opaque"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    let state = complete_form();

    let err = h
        .controller
        .submit(&state, SubmitMode::Update { id: "known".into() })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), "Vendor belum terverifikasi");

    let err = h
        .controller
        .submit(&state, SubmitMode::Update { id: "opaque".into() })
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), GENERIC_SERVER_ERROR);
    assert_eq!(h.notifier.toasts()[1].message, GENERIC_SERVER_ERROR);
}

#[tokio::test]
async fn test_transport_failure_uses_generic_message() {
    // nothing listens on port 1
    let h = harness("http://127.0.0.1:1");
    let err = h
        .controller
        .submit(&complete_form(), SubmitMode::Update { id: "x".into() })
        .await
        .unwrap_err();

    assert!(matches!(&err, SubmitError::Client(e) if e.is_network_error()));
    assert_eq!(err.user_message(), GENERIC_UNEXPECTED_ERROR);
    assert!(!h.controller.is_submitting());
}

#[tokio::test]
async fn test_resubmit_patches_submission() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/submissions/sub-4/resubmit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server.uri());
    h.controller.resubmit("sub-4").await.unwrap();
    assert_eq!(h.notifier.toasts()[0].level, ToastLevel::Success);
}
