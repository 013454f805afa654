//! Minutes export: merges every agenda of one meeting into the `.docx` template.

pub mod docx;
pub mod template;
pub mod text;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::Path;

use crate::errors::AppError;
use crate::models::agenda::{Agenda, AgendaStore, Attendance, AttendanceStatus, MeetingKey};
use crate::models::minutes;

#[derive(Debug, Serialize)]
pub struct ExportedDocument {
    pub file_name: String,
    pub content_base64: String,
}

pub fn file_name(key: &MeetingKey) -> String {
    format!(
        "Risalah_{}_{}_{}.docx",
        key.meeting_type.as_str(),
        key.meeting_number,
        key.meeting_year
    )
}

/// Attendance across all agendas of the meeting, first appearance wins the
/// position; someone present for any agenda counts as present.
fn merged_attendance(agendas: &[Agenda]) -> Vec<Attendance> {
    let mut merged: Vec<Attendance> = Vec::new();
    for person in agendas.iter().filter_map(|a| a.minutes.as_ref()).flat_map(|m| &m.attendance) {
        match merged.iter_mut().find(|p| p.name.eq_ignore_ascii_case(&person.name)) {
            Some(existing) if !existing.is_present() && person.is_present() => {
                existing.status = person.status;
                existing.representative = person.representative.clone();
            }
            Some(_) => {}
            None => merged.push(person.clone()),
        }
    }
    merged
}

fn attendance_note(person: &Attendance) -> String {
    match (&person.status, &person.representative) {
        (AttendanceStatus::Hadir, _) => "Hadir".to_string(),
        (AttendanceStatus::Diwakili, Some(rep)) => format!("Diwakili oleh {rep}"),
        (AttendanceStatus::Diwakili, None) => "Diwakili".to_string(),
        (AttendanceStatus::TidakHadir, _) => "Tidak hadir".to_string(),
    }
}

/// Build the template context for one meeting. Fails if there is nothing to
/// export or any agenda of the meeting has no minutes.
pub fn build_context(key: &MeetingKey, agendas: &[Agenda]) -> Result<Value, AppError> {
    if agendas.is_empty() {
        return Err(AppError::Export(format!(
            "No agendas found for {} no. {}/{}",
            key.meeting_type.display_name(),
            key.meeting_number,
            key.meeting_year
        )));
    }
    if let Some(missing) = agendas.iter().find(|a| a.minutes.is_none()) {
        return Err(AppError::Export(format!("Agenda #{} has no minutes", missing.id)));
    }

    let attendance = merged_attendance(agendas);
    let present = attendance.iter().filter(|p| p.is_present()).count();
    let schedule = agendas.iter().find_map(|a| a.schedule.as_ref());

    let (tanggal, hari, waktu, tempat) = match schedule {
        Some(s) => (
            text::tanggal(s.date),
            text::nama_hari(s.date).to_string(),
            format!("{} - {}", s.start_time.format("%H:%M"), s.end_time.format("%H:%M")),
            [s.location.as_deref(), s.link.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" / "),
        ),
        None => Default::default(),
    };

    let hadir: Vec<Value> = attendance
        .iter()
        .enumerate()
        .map(|(i, p)| json!({
            "no": i + 1,
            "nama": p.name,
            "jabatan": p.position,
            "keterangan": attendance_note(p),
        }))
        .collect();

    let agenda: Vec<Value> = agendas
        .iter()
        .enumerate()
        .filter_map(|(i, a)| a.minutes.as_ref().map(|m| (i, a, m)))
        .map(|(i, a, m)| json!({
            "no": i + 1,
            "judul": a.title,
            "pemrakarsa": a.initiator,
            "direktur": a.director,
            "jumlah_hadir": minutes::present_count(m),
            "catatan": text::html_to_text(&m.notes_html),
            "keputusan": m.decisions.iter().enumerate().map(|(j, d)| json!({
                "no": j + 1,
                "teks": d.text,
            })).collect::<Vec<_>>(),
            "arahan": m.arahan.iter().enumerate().map(|(j, ar)| json!({
                "no": j + 1,
                "teks": ar.text,
                "pic": ar.pic,
                "batas_waktu": ar.due_date.map(text::tanggal).unwrap_or_default(),
            })).collect::<Vec<_>>(),
        }))
        .collect();

    Ok(json!({
        "nomor_rapat": key.meeting_number,
        "tahun": key.meeting_year,
        "jenis_rapat": key.meeting_type.display_name(),
        "tanggal": tanggal,
        "hari": hari,
        "waktu": waktu,
        "tempat": tempat,
        "jumlah_hadir": present,
        "jumlah_hadir_terbilang": text::terbilang(present as u64),
        "jumlah_undangan": attendance.len(),
        "jumlah_agenda": agenda.len(),
        "hadir": hadir,
        "agenda": agenda,
    }))
}

/// Export the minutes of one meeting as a base64-encoded `.docx`. Any missing
/// piece (template, agendas, minutes) aborts the whole export.
pub async fn export_minutes(
    store: &dyn AgendaStore,
    template_path: &Path,
    key: &MeetingKey,
) -> Result<ExportedDocument, AppError> {
    let mut agendas = store.find_by_meeting(key).await?;
    agendas.sort_by_key(|a| a.id);

    let context = build_context(key, &agendas)?;
    let bytes = docx::fill_template(template_path, &context)?;
    log::info!(
        "Exported minutes {} ({} agendas, {} bytes)",
        file_name(key),
        agendas.len(),
        bytes.len()
    );

    Ok(ExportedDocument {
        file_name: file_name(key),
        content_base64: STANDARD.encode(bytes),
    })
}
