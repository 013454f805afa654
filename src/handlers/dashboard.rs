use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::handlers::agenda_handlers::today;
use crate::handlers::api::{ApiResponse, AppState};
use crate::models::agenda::filter::status_counts;
use crate::models::agenda::{AgendaStatus, Priority};
use crate::models::monitoring;

#[derive(Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub by_status: BTreeMap<AgendaStatus, usize>,
    /// Open agendas (not yet scheduled or closed) whose deadline is close.
    pub high_priority_open: usize,
    pub monitoring: monitoring::MonitoringSummary,
}

/// GET /api/dashboard
pub async fn index(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let agendas = state.store.list().await?;
    let today = today();

    let high_priority_open = agendas
        .iter()
        .filter(|a| matches!(a.status, AgendaStatus::Draft | AgendaStatus::DapatDilanjutkan))
        .filter(|a| a.priority(today) == Priority::Tinggi)
        .count();
    let items = monitoring::overview(&agendas, today);

    Ok(HttpResponse::Ok().json(ApiResponse::ok(DashboardStats {
        total: agendas.len(),
        by_status: status_counts(&agendas),
        high_priority_open,
        monitoring: monitoring::summary(&items),
    })))
}
