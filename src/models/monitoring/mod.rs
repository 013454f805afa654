//! Monitoring and evaluation of arahan (directives) issued in completed meetings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::audit;
use crate::errors::AppError;
use crate::models::agenda::actions;
use crate::models::agenda::attachments;
use crate::models::agenda::{Agenda, AgendaStatus, AgendaStore, FollowUp, FollowUpStatus};
use crate::validate;

/// One arahan as shown on the monitoring board.
#[derive(Debug, Clone, Serialize)]
pub struct MonitoringItem {
    pub agenda_id: i64,
    pub agenda_title: String,
    pub meeting_number: i32,
    pub meeting_year: i32,
    pub index: usize,
    pub text: String,
    pub pic: String,
    pub due_date: Option<NaiveDate>,
    pub follow_up: FollowUp,
    pub overdue: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonitoringSummary {
    pub total: usize,
    pub belum: usize,
    pub proses: usize,
    pub selesai: usize,
    pub overdue: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FollowUpInput {
    pub status: FollowUpStatus,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub evidence_path: Option<String>,
}

/// Flatten the arahan of every SELESAI agenda into monitoring rows.
pub fn overview(agendas: &[Agenda], today: NaiveDate) -> Vec<MonitoringItem> {
    agendas
        .iter()
        .filter(|a| a.status == AgendaStatus::Selesai)
        .filter_map(|a| a.minutes.as_ref().map(|m| (a, m)))
        .flat_map(|(agenda, minutes)| {
            minutes.arahan.iter().enumerate().map(move |(index, arahan)| MonitoringItem {
                agenda_id: agenda.id,
                agenda_title: agenda.title.clone(),
                meeting_number: minutes.meeting_number,
                meeting_year: minutes.meeting_year,
                index,
                text: arahan.text.clone(),
                pic: arahan.pic.clone(),
                due_date: arahan.due_date,
                follow_up: arahan.follow_up.clone(),
                overdue: arahan.follow_up.status != FollowUpStatus::Selesai
                    && arahan.due_date.is_some_and(|due| due < today),
            })
        })
        .collect()
}

pub fn summary(items: &[MonitoringItem]) -> MonitoringSummary {
    let mut summary = MonitoringSummary { total: items.len(), ..Default::default() };
    for item in items {
        match item.follow_up.status {
            FollowUpStatus::Belum => summary.belum += 1,
            FollowUpStatus::Proses => summary.proses += 1,
            FollowUpStatus::Selesai => summary.selesai += 1,
        }
        if item.overdue {
            summary.overdue += 1;
        }
    }
    summary
}

/// Record follow-up progress on the `index`-th arahan of a SELESAI agenda.
pub async fn update_follow_up(
    store: &dyn AgendaStore,
    agenda_id: i64,
    index: usize,
    input: FollowUpInput,
    actor: &str,
) -> Result<Agenda, AppError> {
    let evidence = validate::non_blank(input.evidence_path.as_deref());
    validate::collect([
        validate::validate_optional(&input.note, "Follow-up note", 5000),
        evidence.as_deref().and_then(attachments::validate_path),
        (input.status == FollowUpStatus::Selesai && input.note.trim().is_empty() && evidence.is_none())
            .then(|| "A completed follow-up needs a note or evidence".to_string()),
    ])
    .map_err(AppError::Validation)?;

    let mut agenda = store.find(agenda_id).await?.ok_or(AppError::NotFound)?;
    if agenda.status != AgendaStatus::Selesai {
        return Err(AppError::Precondition(format!(
            "Follow-ups are tracked only for completed agendas; #{agenda_id} is {}",
            agenda.status
        )));
    }
    let stamp = actions::now();
    let arahan = agenda
        .minutes
        .as_mut()
        .and_then(|m| m.arahan.get_mut(index))
        .ok_or(AppError::NotFound)?;
    arahan.follow_up = FollowUp {
        status: input.status,
        note: input.note.trim().to_string(),
        evidence_path: evidence,
        updated_at: Some(stamp),
    };
    agenda.updated_at = stamp;
    store.save(&agenda).await?;

    audit::log(actor, "arahan.follow_up", "agenda", agenda_id, json!({
        "index": index,
        "status": input.status,
    }));
    Ok(agenda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::agenda::{Arahan, MeetingMinutes, MeetingType, Urgency};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn agenda(id: i64, status: AgendaStatus, arahan: Vec<Arahan>) -> Agenda {
        let at = date(2026, 1, 5).and_hms_opt(8, 0, 0).unwrap();
        Agenda {
            id,
            title: format!("Agenda {id}"),
            meeting_type: MeetingType::Radir,
            urgency: Urgency::Biasa,
            urgency_justification: None,
            deadline: None,
            initiator: "Divisi SDM".to_string(),
            director: "Direktur SDM".to_string(),
            support: vec![],
            contact_person: "Budi".to_string(),
            attachments: vec![],
            supporting_documents: vec![],
            status,
            cancellation_reason: None,
            postponement_reason: None,
            schedule: None,
            minutes: Some(MeetingMinutes {
                meeting_number: 2,
                meeting_year: 2026,
                attendance: vec![],
                decisions: vec![],
                arahan,
                notes_html: String::new(),
                finalized_at: None,
            }),
            created_by: "tester".to_string(),
            created_at: at,
            updated_at: at,
        }
    }

    fn arahan(due: Option<NaiveDate>, status: FollowUpStatus) -> Arahan {
        Arahan {
            text: "Susun kajian lanjutan".to_string(),
            pic: "Divisi Hukum".to_string(),
            due_date: due,
            follow_up: FollowUp { status, ..Default::default() },
        }
    }

    #[test]
    fn overview_only_covers_completed_agendas() {
        let agendas = vec![
            agenda(1, AgendaStatus::Selesai, vec![
                arahan(Some(date(2026, 2, 1)), FollowUpStatus::Belum),
                arahan(Some(date(2026, 2, 1)), FollowUpStatus::Selesai),
                arahan(None, FollowUpStatus::Proses),
            ]),
            agenda(2, AgendaStatus::Dijadwalkan, vec![arahan(None, FollowUpStatus::Belum)]),
        ];
        let items = overview(&agendas, date(2026, 3, 1));
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.agenda_id == 1));
        assert_eq!(items.iter().map(|i| i.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(items[0].overdue);
        assert!(!items[1].overdue);
        assert!(!items[2].overdue);

        let s = summary(&items);
        assert_eq!(s, MonitoringSummary { total: 3, belum: 1, proses: 1, selesai: 1, overdue: 1 });
    }
}
