use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::AppError;
use crate::handlers::api::{actor, ApiResponse, AppState};
use crate::models::agenda::filter::{AgendaListView, SortSpec, StatusFilter};
use crate::models::agenda::{actions, lifecycle, Agenda, AgendaForm, AgendaStatus, AgendaView};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn to_view(agenda: Agenda, today: NaiveDate) -> AgendaView {
    AgendaView {
        priority: agenda.priority(today),
        is_complete: lifecycle::is_complete(&agenda),
        agenda,
    }
}

/// Filter inputs shared by the list and eligibility endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl FilterParams {
    pub fn apply(&self, view: &mut AgendaListView) -> Result<(), AppError> {
        view.set_search(self.search.as_deref().unwrap_or(""));
        view.set_status(StatusFilter::from_param(self.status.as_deref()).map_err(AppError::Validation)?);
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(AppError::Validation("Start date must not be after end date".to_string()));
            }
        }
        view.set_date_range(self.from, self.to);
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: Option<String>,
    pub dir: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

impl ListQuery {
    fn filter(&self) -> FilterParams {
        FilterParams {
            search: self.search.clone(),
            status: self.status.clone(),
            from: self.from,
            to: self.to,
        }
    }
}

#[derive(Serialize)]
pub struct ListResponse {
    pub items: Vec<AgendaView>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub counts: BTreeMap<AgendaStatus, usize>,
}

/// GET /api/agendas - filtered, sorted, paginated agenda list.
/// Query params: search, status (or "all"), from, to (deadline range), sort, dir,
/// page (default 1), per_page (default 25).
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let today = today();
    let mut view = AgendaListView::new(state.store.list().await?, today);
    query.filter().apply(&mut view)?;
    view.set_sort(SortSpec::from_params(query.sort.as_deref(), query.dir.as_deref()));

    let page = view.page(query.page.unwrap_or(1), query.per_page.unwrap_or(25));
    let response = ListResponse {
        items: page.items.into_iter().map(|a| to_view(a.clone(), today)).collect(),
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        counts: view.status_counts(),
    };
    Ok(HttpResponse::Ok().json(ApiResponse::ok(response)))
}

/// GET /api/agendas/{id}
pub async fn read(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let agenda = state.store.find(path.into_inner()).await?.ok_or(AppError::NotFound)?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(to_view(agenda, today()))))
}

/// POST /api/agendas - submit a new agenda.
pub async fn create(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<AgendaForm>,
) -> Result<HttpResponse, AppError> {
    let agenda = actions::create(state.store.as_ref(), form.into_inner(), &actor(&req)).await?;
    let message = match agenda.status {
        AgendaStatus::DapatDilanjutkan => "Agenda submitted",
        _ => "Agenda saved as draft; some attachments are still missing",
    };
    Ok(HttpResponse::Created().json(ApiResponse::with_message(to_view(agenda, today()), message)))
}

/// PUT /api/agendas/{id}
pub async fn update(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Json<AgendaForm>,
) -> Result<HttpResponse, AppError> {
    let agenda = actions::update(state.store.as_ref(), path.into_inner(), form.into_inner(), &actor(&req)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(to_view(agenda, today()), "Agenda updated")))
}
