/// HTTP-level tests for the `/api` routes, run through `actix_web::test`
/// against the in-memory store.

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use radir::handlers::api::{self, AppState};
use radir::models::agenda::MemoryAgendaStore;

mod common;
use common::{document_xml, write_template};

fn state(export_template: PathBuf) -> web::Data<AppState> {
    web::Data::new(AppState {
        store: Arc::new(MemoryAgendaStore::new()),
        export_template,
    })
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .service(web::scope("/api").configure(api::configure)),
        )
        .await
    };
}

fn agenda_body(title: &str) -> Value {
    json!({
        "title": title,
        "meeting_type": "RADIR",
        "initiator": "Divisi Keuangan",
        "director": "Direktur Keuangan",
        "contact_person": "Rina",
        "attachments": [
            {"kind": "NOTA_DINAS", "path": "radir/rina/nota.pdf"},
            {"kind": "MATERI_PRESENTASI", "path": "radir/rina/materi.pptx"},
            {"kind": "KAJIAN_HUKUM", "path": "radir/rina/hukum.pdf"},
            {"kind": "KAJIAN_RISIKO", "not_required": true},
        ],
    })
}

fn schedule_body() -> Value {
    json!({
        "date": "2026-03-10",
        "start_time": "09:00:00",
        "end_time": "11:00:00",
        "method": "OFFLINE",
        "location": "Ruang Rapat Direksi",
    })
}

// ---------------------------------------------------------------------------
// Agenda CRUD
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_create_and_read_agenda() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/agendas")
        .insert_header(("X-User", "rina"))
        .set_json(agenda_body("Persetujuan RKAP"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "DAPAT_DILANJUTKAN");
    assert_eq!(body["data"]["created_by"], "rina");
    assert_eq!(body["data"]["is_complete"], true);
    assert_eq!(body["data"]["priority"], "RENDAH");
    let id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::get().uri(&format!("/api/agendas/{id}")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["title"], "Persetujuan RKAP");
}

#[actix_web::test]
async fn test_mutations_require_json_content_type() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/agendas")
        .insert_header(ContentType::form_url_encoded())
        .set_payload("title=x")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn test_missing_agenda_is_404() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/agendas/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "message": "Agenda not found"}));
}

#[actix_web::test]
async fn test_list_filters_and_rejects_unknown_status() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    for title in ["Laporan RADIR Q1", "Kajian Investasi", "radir khusus"] {
        let req = test::TestRequest::post().uri("/api/agendas").set_json(agenda_body(title)).to_request();
        assert!(test::call_service(&app, req).await.status().is_success());
    }

    let req = test::TestRequest::get()
        .uri("/api/agendas?search=radir&status=all&sort=title&dir=asc&per_page=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"].as_array().expect("items").len(), 1);
    assert_eq!(body["data"]["items"][0]["title"], "Laporan RADIR Q1");
    assert_eq!(body["data"]["counts"]["DAPAT_DILANJUTKAN"], 3);
    assert_eq!(body["data"]["counts"]["SELESAI"], 0);

    let req = test::TestRequest::get().uri("/api/agendas?status=ARSIP").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_malformed_input_gets_json_envelope() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let mut schedule = schedule_body();
    schedule["date"] = json!("10-03-2026");
    let req = test::TestRequest::post()
        .uri("/api/agendas/bulk-schedule")
        .set_json(json!({"ids": [1], "schedule": schedule}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().expect("message").starts_with("Invalid request body"));

    let req = test::TestRequest::get().uri("/api/agendas?page=abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().expect("message").starts_with("Invalid query string"));

    let req = test::TestRequest::get().uri("/api/agendas/abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_cancel_and_resume_over_http() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/api/agendas").set_json(agenda_body("Pengadaan")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri(&format!("/api/agendas/{id}/cancel"))
        .set_json(json!({"reason": "ok"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Reason must be at least 5 characters");

    let req = test::TestRequest::post()
        .uri(&format!("/api/agendas/{id}/cancel"))
        .set_json(json!({"reason": "Dokumen belum lengkap"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "DIBATALKAN");
    assert_eq!(body["data"]["cancellation_reason"], "Dokumen belum lengkap");

    let req = test::TestRequest::post()
        .uri(&format!("/api/agendas/{id}/resume"))
        .insert_header(ContentType::json())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "DAPAT_DILANJUTKAN");
    assert_eq!(body["data"]["cancellation_reason"], Value::Null);
}

#[actix_web::test]
async fn test_bulk_schedule_reports_partial_success() {
    let state = state(PathBuf::from("unused.docx"));
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/api/agendas").set_json(agenda_body("Siap")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/agendas/eligibility")
        .set_json(json!({"ids": [id, 77]}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["effective_ids"], json!([id]));
    assert_eq!(body["data"]["can_bulk_schedule"], true);

    let req = test::TestRequest::post()
        .uri("/api/agendas/bulk-schedule")
        .set_json(json!({"ids": [id, 77], "schedule": schedule_body()}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "1 succeeded / 1 failed");
    assert_eq!(body["data"]["succeeded"], json!([id]));
    assert_eq!(body["data"]["failed"][0]["id"], 77);

    let req = test::TestRequest::post()
        .uri("/api/agendas/bulk-delete")
        .set_json(json!({"ids": [id]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get().uri("/api/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["by_status"]["DIJADWALKAN"], 1);
}

// ---------------------------------------------------------------------------
// Minutes, monitoring and export
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_minutes_to_export_flow() {
    let dir = TempDir::new().expect("temp dir");
    let template = write_template(
        dir.path(),
        &document_xml("<w:p><w:r><w:t>{jenis_rapat} {nomor_rapat}/{tahun}: {jumlah_agenda} agenda</w:t></w:r></w:p>"),
    );
    let state = state(template);
    let app = init_app!(state);

    let req = test::TestRequest::post().uri("/api/agendas").set_json(agenda_body("RKAP")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().expect("id");

    let req = test::TestRequest::post()
        .uri("/api/agendas/bulk-schedule")
        .set_json(json!({"ids": [id], "schedule": schedule_body()}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["success"], true);

    let req = test::TestRequest::put()
        .uri(&format!("/api/agendas/{id}/minutes"))
        .set_json(json!({
            "meeting_number": 7,
            "meeting_year": 2026,
            "attendance": [{"name": "Andi", "position": "Direktur Utama", "status": "HADIR"}],
            "decisions": ["Disetujui"],
            "arahan": [{"text": "Tindak lanjuti", "pic": "Divisi Keuangan", "due_date": "2026-04-01"}],
            "notes_html": "<p>Catatan</p>",
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/agendas/{id}/minutes/finalize"))
        .insert_header(ContentType::json())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["status"], "SELESAI");

    let req = test::TestRequest::put()
        .uri(&format!("/api/agendas/{id}/arahan/0/follow-up"))
        .set_json(json!({"status": "PROSES", "note": "Sedang disusun"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["follow_up"]["status"], "PROSES");

    let req = test::TestRequest::get().uri("/api/monitoring").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["summary"]["total"], 1);
    assert_eq!(body["data"]["summary"]["proses"], 1);

    let req = test::TestRequest::post()
        .uri("/api/export")
        .set_json(json!({"meeting_number": 7, "meeting_year": 2026, "meeting_type": "RADIR"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["file_name"], "Risalah_RADIR_7_2026.docx");
    assert!(!body["data"]["content_base64"].as_str().expect("base64").is_empty());

    let req = test::TestRequest::post()
        .uri("/api/export")
        .set_json(json!({"meeting_number": 8, "meeting_year": 2026, "meeting_type": "RADIR"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
