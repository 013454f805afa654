//! Status transition rules for agendas.
//!
//! Every function here is pure: it inspects or mutates an in-memory `Agenda` and
//! never touches storage. A rejected transition leaves the agenda untouched.
//!
//! ```text
//! DRAFT <-> DAPAT_DILANJUTKAN --schedule--> DIJADWALKAN --complete--> SELESAI
//!   |            |                            |
//!   +-- cancel / postpone ---------------------+--> DIBATALKAN / DITUNDA
//!                                                   |
//!                        DAPAT_DILANJUTKAN <--resume+
//! ```

use chrono::NaiveDateTime;

use super::types::{Agenda, AgendaStatus, AttachmentKind, MeetingMethod, Schedule};
use crate::errors::AppError;
use crate::validate;

use AgendaStatus::*;

/// True when every mandatory attachment slot is filled or marked not-required.
pub fn is_complete(agenda: &Agenda) -> bool {
    AttachmentKind::MANDATORY.iter().all(|kind| {
        agenda
            .attachments
            .iter()
            .any(|slot| slot.kind == *kind && slot.is_settled())
    })
}

pub fn initial_status(agenda: &Agenda) -> AgendaStatus {
    if is_complete(agenda) { DapatDilanjutkan } else { Draft }
}

/// Re-derive DRAFT vs DAPAT_DILANJUTKAN after an edit. Other states are left alone.
pub fn refresh_completeness(agenda: &mut Agenda) {
    if matches!(agenda.status, Draft | DapatDilanjutkan) {
        agenda.status = initial_status(agenda);
    }
}

pub fn can_edit(agenda: &Agenda) -> bool {
    matches!(agenda.status, Draft | DapatDilanjutkan | Ditunda)
}

pub fn can_delete(agenda: &Agenda) -> bool {
    !matches!(agenda.status, Dijadwalkan | Selesai)
}

pub fn can_bulk_delete<'a>(agendas: impl IntoIterator<Item = &'a Agenda>) -> bool {
    let mut any = false;
    for agenda in agendas {
        if !can_delete(agenda) {
            return false;
        }
        any = true;
    }
    any
}

/// A bulk schedule is only offered for a non-empty, uniformly resumable set.
pub fn can_bulk_schedule<'a>(agendas: impl IntoIterator<Item = &'a Agenda>) -> bool {
    let mut any = false;
    for agenda in agendas {
        if agenda.status != DapatDilanjutkan {
            return false;
        }
        any = true;
    }
    any
}

fn illegal(agenda: &Agenda, action: &str) -> AppError {
    AppError::Precondition(format!(
        "Cannot {action} agenda #{} while it is {}",
        agenda.id, agenda.status
    ))
}

fn checked_reason(reason: &str) -> Result<String, AppError> {
    match validate::validate_reason(reason) {
        Some(msg) => Err(AppError::Validation(msg)),
        None => Ok(reason.trim().to_string()),
    }
}

pub fn cancel(agenda: &mut Agenda, reason: &str, now: NaiveDateTime) -> Result<(), AppError> {
    let reason = checked_reason(reason)?;
    if !matches!(agenda.status, Draft | DapatDilanjutkan | Ditunda | Dijadwalkan) {
        return Err(illegal(agenda, "cancel"));
    }
    agenda.status = Dibatalkan;
    agenda.cancellation_reason = Some(reason);
    agenda.updated_at = now;
    Ok(())
}

pub fn postpone(agenda: &mut Agenda, reason: &str, now: NaiveDateTime) -> Result<(), AppError> {
    let reason = checked_reason(reason)?;
    if !matches!(agenda.status, Draft | DapatDilanjutkan | Dijadwalkan) {
        return Err(illegal(agenda, "postpone"));
    }
    agenda.status = Ditunda;
    agenda.postponement_reason = Some(reason);
    agenda.updated_at = now;
    Ok(())
}

/// Bring a postponed or cancelled agenda back to DAPAT_DILANJUTKAN, dropping the
/// reasons and any schedule it had.
pub fn resume(agenda: &mut Agenda, now: NaiveDateTime) -> Result<(), AppError> {
    if !matches!(agenda.status, Ditunda | Dibatalkan) {
        return Err(illegal(agenda, "resume"));
    }
    agenda.status = DapatDilanjutkan;
    agenda.cancellation_reason = None;
    agenda.postponement_reason = None;
    agenda.schedule = None;
    agenda.updated_at = now;
    Ok(())
}

pub fn validate_schedule(schedule: &Schedule) -> Result<(), AppError> {
    if schedule.end_time <= schedule.start_time {
        return Err(AppError::Validation(
            "End time must be after start time".to_string(),
        ));
    }
    let has_location = validate::non_blank(schedule.location.as_deref()).is_some();
    let has_link = validate::non_blank(schedule.link.as_deref()).is_some();
    let missing = match schedule.method {
        MeetingMethod::Offline if !has_location => Some("Location is required for offline meetings"),
        MeetingMethod::Online if !has_link => Some("Meeting link is required for online meetings"),
        MeetingMethod::Hybrid if !(has_location && has_link) => {
            Some("Hybrid meetings need both a location and a meeting link")
        }
        _ => None,
    };
    match missing {
        Some(msg) => Err(AppError::Validation(msg.to_string())),
        None => Ok(()),
    }
}

pub fn schedule(agenda: &mut Agenda, schedule: &Schedule, now: NaiveDateTime) -> Result<(), AppError> {
    validate_schedule(schedule)?;
    if agenda.status != DapatDilanjutkan {
        return Err(illegal(agenda, "schedule"));
    }
    agenda.status = Dijadwalkan;
    agenda.schedule = Some(schedule.clone());
    agenda.updated_at = now;
    Ok(())
}

/// Minutes finalization: DIJADWALKAN -> SELESAI.
pub fn complete(agenda: &mut Agenda, now: NaiveDateTime) -> Result<(), AppError> {
    if agenda.status != Dijadwalkan {
        return Err(illegal(agenda, "finalize minutes of"));
    }
    let Some(minutes) = agenda.minutes.as_mut() else {
        return Err(AppError::Precondition(format!(
            "Agenda #{} has no recorded minutes",
            agenda.id
        )));
    };
    minutes.finalized_at = Some(now);
    agenda.status = Selesai;
    agenda.updated_at = now;
    Ok(())
}
