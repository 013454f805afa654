//! Shared fixtures for the integration tests.
//!
//! Every test gets its own `MemoryAgendaStore`; nothing touches a database.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

use radir::models::agenda::actions;
use radir::models::agenda::{
    Agenda, AgendaForm, AgendaStatus, AgendaStore, AttachmentKind, AttachmentSlot, AttendanceStatus,
    MeetingMethod, MeetingType, Schedule, Urgency,
};
use radir::models::minutes::{ArahanInput, AttendanceInput, MinutesInput};

pub const ACTOR: &str = "sekretariat";

// ============================================================================
// FORMS
// ============================================================================

/// A form with every mandatory attachment uploaded.
pub fn complete_form(title: &str) -> AgendaForm {
    AgendaForm {
        title: title.to_string(),
        meeting_type: MeetingType::Radir,
        urgency: Urgency::Biasa,
        urgency_justification: None,
        deadline: None,
        initiator: "Divisi Keuangan".to_string(),
        director: "Direktur Keuangan".to_string(),
        support: vec!["Divisi Hukum".to_string()],
        contact_person: "Rina (ext. 2231)".to_string(),
        attachments: AttachmentKind::MANDATORY
            .iter()
            .enumerate()
            .map(|(i, kind)| AttachmentSlot {
                kind: *kind,
                path: Some(format!("radir/rina/lampiran-{i}.pdf")),
                not_required: false,
            })
            .collect(),
        supporting_documents: vec![],
    }
}

/// A form missing the risk review, so the agenda stays DRAFT.
pub fn incomplete_form(title: &str) -> AgendaForm {
    let mut form = complete_form(title);
    form.attachments.retain(|slot| slot.kind != AttachmentKind::KajianRisiko);
    form
}

pub fn offline_schedule(date: NaiveDate) -> Schedule {
    Schedule {
        date,
        start_time: NaiveTime::from_hms_opt(9, 0, 0).expect("valid time"),
        end_time: NaiveTime::from_hms_opt(11, 30, 0).expect("valid time"),
        method: MeetingMethod::Offline,
        location: Some("Ruang Rapat Direksi Lt. 5".to_string()),
        link: None,
    }
}

pub fn meeting_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date")
}

pub fn minutes_input(meeting_number: i32, meeting_year: i32) -> MinutesInput {
    MinutesInput {
        meeting_number,
        meeting_year,
        attendance: vec![
            AttendanceInput {
                name: "Andi Wijaya".to_string(),
                position: "Direktur Utama".to_string(),
                status: AttendanceStatus::Hadir,
                representative: None,
            },
            AttendanceInput {
                name: "Siti Rahma".to_string(),
                position: "Direktur Keuangan".to_string(),
                status: AttendanceStatus::Diwakili,
                representative: Some("Budi Santoso".to_string()),
            },
            AttendanceInput {
                name: "Joko Prasetyo".to_string(),
                position: "Direktur SDM".to_string(),
                status: AttendanceStatus::TidakHadir,
                representative: None,
            },
        ],
        decisions: vec!["RKAP disetujui dengan catatan".to_string()],
        arahan: vec![ArahanInput {
            text: "Revisi asumsi kurs".to_string(),
            pic: "Divisi Keuangan".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 4, 1),
        }],
        notes_html: "<p>Pembahasan RKAP</p><ul><li>Asumsi kurs</li><li>Capex</li></ul>".to_string(),
    }
}

// ============================================================================
// STORE SETUP
// ============================================================================

pub async fn create(store: &dyn AgendaStore, form: AgendaForm) -> Agenda {
    actions::create(store, form, ACTOR).await.expect("create agenda")
}

/// Create an agenda and move it straight to `status`, bypassing the workflow.
pub async fn seed(store: &dyn AgendaStore, title: &str, status: AgendaStatus) -> Agenda {
    let mut agenda = create(store, complete_form(title)).await;
    agenda.status = status;
    store.save(&agenda).await.expect("save seeded agenda");
    agenda
}

/// Create, schedule and record minutes for one agenda. Returns it DIJADWALKAN.
pub async fn scheduled_with_minutes(
    store: &dyn AgendaStore,
    title: &str,
    meeting_number: i32,
) -> Agenda {
    let agenda = create(store, complete_form(title)).await;
    let outcome = actions::bulk_schedule(store, &[agenda.id], &offline_schedule(meeting_date()), ACTOR)
        .await
        .expect("schedule");
    assert!(outcome.all_succeeded());
    radir::models::minutes::record(store, agenda.id, minutes_input(meeting_number, 2026), ACTOR)
        .await
        .expect("record minutes")
}

// ============================================================================
// EXPORT TEMPLATE
// ============================================================================

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

/// Wrap paragraphs in a minimal WordprocessingML body.
pub fn document_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    )
}

/// Write a minimal `.docx` with the given `word/document.xml` into `dir`.
pub fn write_template(dir: &Path, document: &str) -> PathBuf {
    let path = dir.join("risalah.docx");
    let file = std::fs::File::create(&path).expect("create template file");
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options).expect("start content types");
    zip.write_all(CONTENT_TYPES.as_bytes()).expect("write content types");
    zip.start_file("word/document.xml", options).expect("start document");
    zip.write_all(document.as_bytes()).expect("write document");
    zip.finish().expect("finish template");
    path
}

/// Read one part back out of a rendered `.docx`.
pub fn read_part(docx: &[u8], name: &str) -> String {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(docx)).expect("open docx");
    let mut part = archive.by_name(name).expect("part present");
    let mut content = String::new();
    part.read_to_string(&mut content).expect("read part");
    content
}
