use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::agenda_handlers::{to_view, today, FilterParams};
use crate::handlers::api::{actor, ApiResponse, AppState};
use crate::models::agenda::actions::{self, BatchOutcome};
use crate::models::agenda::filter::AgendaListView;
use crate::models::agenda::Schedule;

#[derive(Debug, Deserialize)]
pub struct ReasonForm {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    pub ids: Vec<i64>,
    #[serde(default)]
    pub filter: FilterParams,
}

#[derive(Debug, Deserialize)]
pub struct BulkScheduleForm {
    pub ids: Vec<i64>,
    pub schedule: Schedule,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteForm {
    pub ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct Eligibility {
    /// Selected ids still visible under the filter, in list order.
    pub effective_ids: Vec<i64>,
    pub can_bulk_schedule: bool,
    pub can_bulk_delete: bool,
}

/// POST /api/agendas/{id}/cancel
pub async fn cancel(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Json<ReasonForm>,
) -> Result<HttpResponse, AppError> {
    let agenda = actions::cancel(state.store.as_ref(), path.into_inner(), &form.reason, &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Agenda cancelled")))
}

/// POST /api/agendas/{id}/postpone
pub async fn postpone(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Json<ReasonForm>,
) -> Result<HttpResponse, AppError> {
    let agenda = actions::postpone(state.store.as_ref(), path.into_inner(), &form.reason, &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Agenda postponed")))
}

/// POST /api/agendas/{id}/resume
pub async fn resume(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let agenda = actions::resume(state.store.as_ref(), path.into_inner(), &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Agenda resumed")))
}

/// POST /api/agendas/eligibility
/// Which bulk actions the current selection allows. Only selected agendas that
/// pass the given filter take part.
pub async fn eligibility(
    state: web::Data<AppState>,
    form: web::Json<SelectionForm>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let mut view = AgendaListView::new(state.store.list().await?, today());
    form.filter.apply(&mut view)?;
    view.select(form.ids);

    let result = Eligibility {
        effective_ids: view.effective_selection().iter().map(|a| a.id).collect(),
        can_bulk_schedule: view.can_bulk_schedule(),
        can_bulk_delete: view.can_bulk_delete(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(result)))
}

fn batch_response(outcome: BatchOutcome) -> HttpResponse {
    let body = ApiResponse {
        success: outcome.all_succeeded(),
        message: Some(outcome.summary()),
        data: Some(outcome),
    };
    HttpResponse::Ok().json(body)
}

/// POST /api/agendas/bulk-schedule
/// Items that fail are reported individually; the others stay scheduled.
pub async fn bulk_schedule(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<BulkScheduleForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = actions::bulk_schedule(state.store.as_ref(), &form.ids, &form.schedule, &actor(&req)).await?;
    Ok(batch_response(outcome))
}

/// POST /api/agendas/bulk-delete
pub async fn bulk_delete(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<BulkDeleteForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = actions::bulk_delete(state.store.as_ref(), &form.ids, &actor(&req)).await?;
    Ok(batch_response(outcome))
}
