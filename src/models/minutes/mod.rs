//! Meeting execution: minutes are recorded against a scheduled agenda and
//! finalizing them completes the agenda.

pub mod types;

use serde_json::json;

pub use types::*;

use crate::audit;
use crate::errors::AppError;
use crate::models::agenda::actions;
use crate::models::agenda::{Agenda, AgendaStatus, AgendaStore, AttendanceStatus, MeetingMinutes};
use crate::validate;

fn validate_input(input: &MinutesInput) -> Result<(), AppError> {
    let mut errors = vec![
        (input.meeting_number < 1).then(|| "Meeting number must be at least 1".to_string()),
        validate::validate_year(input.meeting_year),
    ];
    for (i, person) in input.attendance.iter().enumerate() {
        errors.push(validate::validate_required(&person.name, &format!("Attendee {} name", i + 1), 150));
        if person.status == AttendanceStatus::Diwakili
            && validate::non_blank(person.representative.as_deref()).is_none()
        {
            errors.push(Some(format!("Attendee {} is represented but has no representative", i + 1)));
        }
    }
    for (i, decision) in input.decisions.iter().enumerate() {
        errors.push(validate::validate_required(decision, &format!("Decision {}", i + 1), 5000));
    }
    for (i, arahan) in input.arahan.iter().enumerate() {
        errors.push(validate::validate_required(&arahan.text, &format!("Arahan {}", i + 1), 5000));
        errors.push(validate::validate_optional(&arahan.pic, &format!("Arahan {} PIC", i + 1), 150));
    }
    validate::collect(errors).map_err(AppError::Validation)
}

/// Record (or re-record) the minutes of a DIJADWALKAN agenda.
pub async fn record(
    store: &dyn AgendaStore,
    id: i64,
    input: MinutesInput,
    actor: &str,
) -> Result<Agenda, AppError> {
    validate_input(&input)?;

    let mut agenda = store.find(id).await?.ok_or(AppError::NotFound)?;
    if agenda.status != AgendaStatus::Dijadwalkan {
        return Err(AppError::Precondition(format!(
            "Minutes can only be recorded for scheduled agendas; #{id} is {}",
            agenda.status
        )));
    }

    agenda.minutes = Some(MeetingMinutes {
        meeting_number: input.meeting_number,
        meeting_year: input.meeting_year,
        attendance: input.attendance.into_iter().map(Into::into).collect(),
        decisions: input.decisions.into_iter().map(Into::into).collect(),
        arahan: input.arahan.into_iter().map(Into::into).collect(),
        notes_html: input.notes_html,
        finalized_at: None,
    });
    agenda.updated_at = actions::now();
    store.save(&agenda).await?;

    audit::log(actor, "minutes.recorded", "agenda", id, json!({
        "meeting_number": input.meeting_number,
        "meeting_year": input.meeting_year,
    }));
    Ok(agenda)
}

/// Finalize the minutes, moving the agenda to SELESAI.
pub async fn finalize(store: &dyn AgendaStore, id: i64, actor: &str) -> Result<Agenda, AppError> {
    actions::complete(store, id, actor).await
}

/// Attendees counted as present: in person or represented.
pub fn present_count(minutes: &MeetingMinutes) -> usize {
    minutes.attendance.iter().filter(|a| a.is_present()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agenda::{Attendance, AttendanceStatus};

    fn person(name: &str, status: AttendanceStatus) -> Attendance {
        Attendance {
            name: name.to_string(),
            position: "Direktur".to_string(),
            status,
            representative: None,
        }
    }

    #[test]
    fn present_count_includes_representatives() {
        let minutes = MeetingMinutes {
            meeting_number: 3,
            meeting_year: 2026,
            attendance: vec![
                person("A", AttendanceStatus::Hadir),
                person("B", AttendanceStatus::Diwakili),
                person("C", AttendanceStatus::TidakHadir),
            ],
            decisions: vec![],
            arahan: vec![],
            notes_html: String::new(),
            finalized_at: None,
        };
        assert_eq!(present_count(&minutes), 2);
    }

    #[test]
    fn input_validation_collects_errors() {
        let input = MinutesInput {
            meeting_number: 0,
            meeting_year: 1990,
            attendance: vec![AttendanceInput {
                name: " ".to_string(),
                position: String::new(),
                status: AttendanceStatus::Diwakili,
                representative: None,
            }],
            decisions: vec!["".to_string()],
            arahan: vec![],
            notes_html: String::new(),
        };
        let Err(AppError::Validation(msg)) = validate_input(&input) else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Meeting number"));
        assert!(msg.contains("Meeting year"));
        assert!(msg.contains("Attendee 1 name"));
        assert!(msg.contains("representative"));
        assert!(msg.contains("Decision 1"));
    }
}
