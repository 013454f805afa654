use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::export;
use crate::handlers::api::{ApiResponse, AppState};
use crate::models::agenda::MeetingKey;

/// POST /api/export
/// Body: `{meeting_number, meeting_year, meeting_type}`. Returns the filled
/// minutes document as base64 together with its file name.
pub async fn export_minutes(
    state: web::Data<AppState>,
    key: web::Json<MeetingKey>,
) -> Result<HttpResponse, AppError> {
    let document = export::export_minutes(state.store.as_ref(), &state.export_template, &key).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(document)))
}
