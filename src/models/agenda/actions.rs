//! Status transition actions. Each one is an independent read-modify-write against
//! the store; bulk actions fan out one request per agenda and report every item's
//! outcome instead of rolling back.

use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::Serialize;
use serde_json::json;

use super::attachments;
use super::lifecycle;
use super::store::AgendaStore;
use super::types::{Agenda, AgendaForm, AgendaStatus, Schedule, Urgency};
use crate::audit;
use crate::errors::AppError;
use crate::validate;

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Per-item result of a bulk action.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    pub succeeded: Vec<i64>,
    pub failed: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub id: i64,
    pub message: String,
}

impl BatchOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        !self.succeeded.is_empty() && !self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!("{} succeeded / {} failed", self.succeeded.len(), self.failed.len())
    }

    fn record(&mut self, id: i64, result: Result<(), AppError>) {
        match result {
            Ok(()) => self.succeeded.push(id),
            Err(e) => {
                if e.is_system() {
                    log::error!("Bulk action on agenda #{id} failed: {e}");
                }
                self.failed.push(BatchFailure { id, message: e.user_message() });
            }
        }
    }
}

fn validate_form(form: &AgendaForm) -> Result<(), AppError> {
    let justification_error = if form.urgency != Urgency::Biasa {
        validate::validate_required(
            form.urgency_justification.as_deref().unwrap_or(""),
            "Urgency justification",
            2000,
        )
    } else {
        None
    };

    let paths = form
        .attachments
        .iter()
        .filter_map(|slot| slot.path.as_deref())
        .filter(|p| !p.trim().is_empty())
        .chain(form.supporting_documents.iter().map(String::as_str))
        .map(attachments::validate_path);

    validate::collect(
        [
            validate::validate_required(&form.title, "Title", 255),
            validate::validate_required(&form.initiator, "Initiator", 150),
            validate::validate_required(&form.director, "Director", 150),
            validate::validate_required(&form.contact_person, "Contact person", 150),
            justification_error,
        ]
        .into_iter()
        .chain(paths),
    )
    .map_err(AppError::Validation)
}

fn apply_form(agenda: &mut Agenda, form: AgendaForm) {
    agenda.title = form.title.trim().to_string();
    agenda.meeting_type = form.meeting_type;
    agenda.urgency = form.urgency;
    agenda.urgency_justification = if form.urgency == Urgency::Biasa {
        None
    } else {
        validate::non_blank(form.urgency_justification.as_deref())
    };
    agenda.deadline = form.deadline;
    agenda.initiator = form.initiator.trim().to_string();
    agenda.director = form.director.trim().to_string();
    agenda.support = form
        .support
        .iter()
        .filter_map(|s| validate::non_blank(Some(s.as_str())))
        .collect();
    agenda.contact_person = form.contact_person.trim().to_string();
    agenda.attachments = attachments::normalize_slots(&form.attachments);
    agenda.supporting_documents = form
        .supporting_documents
        .iter()
        .map(|p| p.trim().to_string())
        .collect();
}

/// Submit a new agenda. It starts as DAPAT_DILANJUTKAN when every mandatory
/// attachment is settled, otherwise as DRAFT.
pub async fn create(store: &dyn AgendaStore, form: AgendaForm, actor: &str) -> Result<Agenda, AppError> {
    validate_form(&form)?;

    let stamp = now();
    let mut agenda = Agenda {
        id: 0,
        title: String::new(),
        meeting_type: form.meeting_type,
        urgency: Urgency::Biasa,
        urgency_justification: None,
        deadline: None,
        initiator: String::new(),
        director: String::new(),
        support: Vec::new(),
        contact_person: String::new(),
        attachments: Vec::new(),
        supporting_documents: Vec::new(),
        status: AgendaStatus::Draft,
        cancellation_reason: None,
        postponement_reason: None,
        schedule: None,
        minutes: None,
        created_by: actor.to_string(),
        created_at: stamp,
        updated_at: stamp,
    };
    apply_form(&mut agenda, form);
    agenda.status = lifecycle::initial_status(&agenda);

    let agenda = store.insert(agenda).await?;
    log::info!("Agenda #{} created as {}", agenda.id, agenda.status);
    audit::log(actor, "agenda.created", "agenda", agenda.id, json!({
        "title": agenda.title,
        "status": agenda.status,
    }));
    Ok(agenda)
}

/// Edit an agenda's content. Allowed while DRAFT, DAPAT_DILANJUTKAN or DITUNDA.
pub async fn update(store: &dyn AgendaStore, id: i64, form: AgendaForm, actor: &str) -> Result<Agenda, AppError> {
    validate_form(&form)?;

    let mut agenda = store.find(id).await?.ok_or(AppError::NotFound)?;
    if !lifecycle::can_edit(&agenda) {
        return Err(AppError::Precondition(format!(
            "Agenda #{id} can no longer be edited while it is {}",
            agenda.status
        )));
    }
    let before = agenda.status;
    apply_form(&mut agenda, form);
    lifecycle::refresh_completeness(&mut agenda);
    agenda.updated_at = now();

    store.save(&agenda).await?;
    audit::log(actor, "agenda.updated", "agenda", id, json!({
        "status_before": before,
        "status_after": agenda.status,
    }));
    Ok(agenda)
}

/// Load, apply one lifecycle step, save. Nothing is written when the step fails.
async fn transition<F>(store: &dyn AgendaStore, id: i64, step: F) -> Result<Agenda, AppError>
where
    F: FnOnce(&mut Agenda, NaiveDateTime) -> Result<(), AppError>,
{
    let mut agenda = store.find(id).await?.ok_or(AppError::NotFound)?;
    step(&mut agenda, now())?;
    store.save(&agenda).await?;
    Ok(agenda)
}

pub async fn cancel(store: &dyn AgendaStore, id: i64, reason: &str, actor: &str) -> Result<Agenda, AppError> {
    let agenda = transition(store, id, |a, at| lifecycle::cancel(a, reason, at)).await?;
    audit::log(actor, "agenda.cancelled", "agenda", id, json!({ "reason": agenda.cancellation_reason }));
    Ok(agenda)
}

pub async fn postpone(store: &dyn AgendaStore, id: i64, reason: &str, actor: &str) -> Result<Agenda, AppError> {
    let agenda = transition(store, id, |a, at| lifecycle::postpone(a, reason, at)).await?;
    audit::log(actor, "agenda.postponed", "agenda", id, json!({ "reason": agenda.postponement_reason }));
    Ok(agenda)
}

pub async fn resume(store: &dyn AgendaStore, id: i64, actor: &str) -> Result<Agenda, AppError> {
    let agenda = transition(store, id, lifecycle::resume).await?;
    audit::log(actor, "agenda.resumed", "agenda", id, json!({ "status": agenda.status }));
    Ok(agenda)
}

/// Minutes finalization: DIJADWALKAN -> SELESAI.
pub async fn complete(store: &dyn AgendaStore, id: i64, actor: &str) -> Result<Agenda, AppError> {
    let agenda = transition(store, id, lifecycle::complete).await?;
    audit::log(actor, "agenda.completed", "agenda", id, json!({ "status": agenda.status }));
    Ok(agenda)
}

fn unique(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Apply one schedule to every id. The schedule itself is validated once; after
/// that each agenda is scheduled by its own request and may fail on its own.
pub async fn bulk_schedule(
    store: &dyn AgendaStore,
    ids: &[i64],
    schedule: &Schedule,
    actor: &str,
) -> Result<BatchOutcome, AppError> {
    let ids = unique(ids);
    if ids.is_empty() {
        return Err(AppError::Validation("Select at least one agenda to schedule".to_string()));
    }
    lifecycle::validate_schedule(schedule)?;

    let results = join_all(ids.iter().map(|&id| async move {
        let result = transition(store, id, |a, at| lifecycle::schedule(a, schedule, at))
            .await
            .map(|_| ());
        (id, result)
    }))
    .await;

    let mut outcome = BatchOutcome::default();
    for (id, result) in results {
        outcome.record(id, result);
    }

    log::info!("Bulk schedule for {} agendas: {}", ids.len(), outcome.summary());
    audit::log(actor, "agenda.bulk_scheduled", "agenda", 0, json!({
        "date": schedule.date,
        "succeeded": outcome.succeeded,
        "failed": outcome.failed.iter().map(|f| f.id).collect::<Vec<_>>(),
    }));
    Ok(outcome)
}

/// Permanently delete agendas. If any id is missing, DIJADWALKAN or SELESAI the
/// whole call is rejected before a single delete is issued.
pub async fn bulk_delete(store: &dyn AgendaStore, ids: &[i64], actor: &str) -> Result<BatchOutcome, AppError> {
    let ids = unique(ids);
    if ids.is_empty() {
        return Err(AppError::Validation("Select at least one agenda to delete".to_string()));
    }

    for &id in &ids {
        let agenda = store
            .find(id)
            .await?
            .ok_or_else(|| AppError::Precondition(format!("Agenda #{id} no longer exists")))?;
        if !lifecycle::can_delete(&agenda) {
            return Err(AppError::Precondition(format!(
                "Agenda #{id} is {} and cannot be deleted",
                agenda.status
            )));
        }
    }

    let results = join_all(ids.iter().map(|&id| async move { (id, store.delete(id).await) })).await;

    let mut outcome = BatchOutcome::default();
    for (id, result) in results {
        outcome.record(id, result);
    }

    log::info!("Bulk delete of {} agendas: {}", ids.len(), outcome.summary());
    audit::log(actor, "agenda.bulk_deleted", "agenda", 0, json!({
        "succeeded": outcome.succeeded,
        "failed": outcome.failed.iter().map(|f| f.id).collect::<Vec<_>>(),
    }));
    Ok(outcome)
}
