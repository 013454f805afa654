use actix_web::{web, HttpRequest, HttpResponse};

use crate::errors::AppError;
use crate::handlers::agenda_handlers::{to_view, today};
use crate::handlers::api::{actor, ApiResponse, AppState};
use crate::models::minutes::{self, MinutesInput};

/// PUT /api/agendas/{id}/minutes
/// Record or replace the minutes of a scheduled agenda.
pub async fn record(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Json<MinutesInput>,
) -> Result<HttpResponse, AppError> {
    let agenda = minutes::record(state.store.as_ref(), path.into_inner(), form.into_inner(), &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Minutes saved")))
}

/// POST /api/agendas/{id}/minutes/finalize
pub async fn finalize(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let agenda = minutes::finalize(state.store.as_ref(), path.into_inner(), &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Minutes finalized")))
}
