use actix_web::{
    web, Error, HttpRequest, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::agenda::AgendaStore;

use super::{agenda_handlers, dashboard, export_handlers, minutes_handlers, monitoring_handlers, workflow_handlers};

/// Shared application state handed to every handler.
pub struct AppState {
    pub store: Arc<dyn AgendaStore>,
    pub export_template: PathBuf,
}

/// Uniform JSON envelope for successful calls. Failures use the same shape via
/// `AppError`'s `ResponseError` impl.
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse { success: true, message: None, data: Some(data) }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        ApiResponse { success: true, message: Some(message.into()), data: Some(data) }
    }
}

/// Name of the acting user for audit entries. Authentication happens upstream;
/// the gateway forwards the user in `X-User`.
pub fn actor(req: &HttpRequest) -> String {
    req.headers()
        .get("x-user")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("system")
        .to_string()
}

/// Reject POST/PUT/DELETE requests that don't have Content-Type: application/json.
/// Browsers cannot send cross-origin JSON with cookies via a simple form POST.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == actix_web::http::Method::POST
        || method == actix_web::http::Method::PUT
        || method == actix_web::http::Method::DELETE
    {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let body = serde_json::json!({
                "success": false,
                "message": "Content-Type must be application/json for mutation requests"
            });
            let response = HttpResponse::UnsupportedMediaType().json(body);
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure the `/api` routes. Static segments are registered before `{id}`.
/// Extractor failures (bad JSON body, query string or path segment) come back as
/// 422 with the usual error envelope instead of actix's plain-text 400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid request body: {err}")).into()
    }));
    cfg.app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid query string: {err}")).into()
    }));
    cfg.app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::Validation(format!("Invalid path parameter: {err}")).into()
    }));
    cfg.service(
        web::scope("/agendas")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(agenda_handlers::list))
            .route("", web::post().to(agenda_handlers::create))
            .route("/eligibility", web::post().to(workflow_handlers::eligibility))
            .route("/bulk-schedule", web::post().to(workflow_handlers::bulk_schedule))
            .route("/bulk-delete", web::post().to(workflow_handlers::bulk_delete))
            .route("/{id}", web::get().to(agenda_handlers::read))
            .route("/{id}", web::put().to(agenda_handlers::update))
            .route("/{id}/cancel", web::post().to(workflow_handlers::cancel))
            .route("/{id}/postpone", web::post().to(workflow_handlers::postpone))
            .route("/{id}/resume", web::post().to(workflow_handlers::resume))
            .route("/{id}/minutes", web::put().to(minutes_handlers::record))
            .route("/{id}/minutes/finalize", web::post().to(minutes_handlers::finalize))
            .route("/{id}/arahan/{index}/follow-up", web::put().to(monitoring_handlers::update_follow_up))
    );
    cfg.service(
        web::scope("/export")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::post().to(export_handlers::export_minutes))
    );
    cfg.route("/monitoring", web::get().to(monitoring_handlers::overview));
    cfg.route("/dashboard", web::get().to(dashboard::index));
}
