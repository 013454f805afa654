use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::agenda_handlers::today;
use crate::handlers::api::{actor, ApiResponse, AppState};
use crate::models::monitoring::{self, FollowUpInput, MonitoringItem, MonitoringSummary};

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    #[serde(default)]
    pub overdue_only: bool,
}

#[derive(Serialize)]
pub struct Overview {
    pub items: Vec<MonitoringItem>,
    pub summary: MonitoringSummary,
}

/// GET /api/monitoring
pub async fn overview(
    state: web::Data<AppState>,
    query: web::Query<OverviewQuery>,
) -> Result<HttpResponse, AppError> {
    let agendas = state.store.list().await?;
    let mut items = monitoring::overview(&agendas, today());
    let summary = monitoring::summary(&items);
    if query.overdue_only {
        items.retain(|i| i.overdue);
    }
    Ok(HttpResponse::Ok().json(ApiResponse::ok(Overview { items, summary })))
}

/// PUT /api/agendas/{id}/arahan/{index}/follow-up
pub async fn update_follow_up(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(i64, usize)>,
    form: web::Json<FollowUpInput>,
) -> Result<HttpResponse, AppError> {
    let (agenda_id, index) = path.into_inner();
    let agenda = monitoring::update_follow_up(
        state.store.as_ref(),
        agenda_id,
        index,
        form.into_inner(),
        &actor(&req),
    )
    .await?;

    let item = monitoring::overview(std::slice::from_ref(&agenda), today())
        .into_iter()
        .find(|i| i.index == index)
        .ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(item, "Follow-up updated")))
}
