//! Per-screen view-model for the agenda list: filter inputs, sort, selection.
//!
//! The whole fetched set is held in memory and the filtered view is recomputed
//! on every call; nothing is cached between input changes.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::lifecycle;
use super::types::{Agenda, AgendaStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AgendaStatus),
}

impl StatusFilter {
    /// `None`, `""` and `"all"` (any case) mean no status filter.
    pub fn from_param(value: Option<&str>) -> Result<Self, String> {
        match value.map(str::trim) {
            None | Some("") => Ok(StatusFilter::All),
            Some(v) if v.eq_ignore_ascii_case("all") => Ok(StatusFilter::All),
            Some(v) => v
                .parse()
                .map(StatusFilter::Only)
                .map_err(|_| format!("Unknown status filter '{v}'")),
        }
    }

    fn matches(&self, status: AgendaStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortColumn {
    #[default]
    CreatedAt,
    Deadline,
    Title,
    Priority,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    #[default]
    Desc,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub dir: SortDir,
}

impl SortSpec {
    pub fn from_params(sort: Option<&str>, dir: Option<&str>) -> Self {
        let column = match sort {
            Some("deadline") => SortColumn::Deadline,
            Some("title") => SortColumn::Title,
            Some("priority") => SortColumn::Priority,
            _ => SortColumn::CreatedAt,
        };
        SortSpec {
            column,
            dir: if dir == Some("asc") { SortDir::Asc } else { SortDir::Desc },
        }
    }
}

/// One page of the filtered list.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

pub struct AgendaListView {
    agendas: Vec<Agenda>,
    search: String,
    status: StatusFilter,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    sort: SortSpec,
    today: NaiveDate,
    selected: BTreeSet<i64>,
}

impl AgendaListView {
    pub fn new(agendas: Vec<Agenda>, today: NaiveDate) -> Self {
        AgendaListView {
            agendas,
            search: String::new(),
            status: StatusFilter::All,
            date_from: None,
            date_to: None,
            sort: SortSpec::default(),
            today,
            selected: BTreeSet::new(),
        }
    }

    pub fn set_search(&mut self, term: &str) {
        self.search = term.trim().to_lowercase();
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.status = status;
    }

    /// Inclusive range on the deadline; either bound may be open.
    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.date_from = from;
        self.date_to = to;
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
    }

    fn matches(&self, agenda: &Agenda) -> bool {
        if !self.search.is_empty()
            && !agenda.title.to_lowercase().contains(&self.search)
            && !agenda.initiator.to_lowercase().contains(&self.search)
        {
            return false;
        }
        if !self.status.matches(agenda.status) {
            return false;
        }
        if self.date_from.is_some() || self.date_to.is_some() {
            let Some(deadline) = agenda.deadline else {
                return false;
            };
            if self.date_from.is_some_and(|from| deadline < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| deadline > to) {
                return false;
            }
        }
        true
    }

    /// The agendas passing every filter, in sort order.
    pub fn filtered(&self) -> Vec<&Agenda> {
        let mut items: Vec<&Agenda> = self.agendas.iter().filter(|a| self.matches(a)).collect();
        let today = self.today;
        items.sort_by(|a, b| {
            let ord = match self.sort.column {
                SortColumn::CreatedAt => a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)),
                SortColumn::Deadline => a.deadline.cmp(&b.deadline),
                SortColumn::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
                SortColumn::Priority => a
                    .priority(today)
                    .cmp(&b.priority(today))
                    .then(b.deadline.cmp(&a.deadline)),
            };
            match self.sort.dir {
                SortDir::Asc => ord,
                SortDir::Desc => ord.reverse(),
            }
        });
        items
    }

    pub fn page(&self, page: usize, per_page: usize) -> Page<&Agenda> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, 100);
        let filtered = self.filtered();
        let total = filtered.len();
        let items = filtered
            .into_iter()
            .skip((page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();
        Page { items, page, per_page, total }
    }

    pub fn toggle_select(&mut self, id: i64) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn select(&mut self, ids: impl IntoIterator<Item = i64>) {
        self.selected.extend(ids);
    }

    pub fn select_all_filtered(&mut self) {
        let ids: Vec<i64> = self.filtered().iter().map(|a| a.id).collect();
        self.selected.extend(ids);
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selected(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    /// Selected agendas that are also visible under the current filters.
    pub fn effective_selection(&self) -> Vec<&Agenda> {
        self.filtered()
            .into_iter()
            .filter(|a| self.selected.contains(&a.id))
            .collect()
    }

    pub fn can_bulk_schedule(&self) -> bool {
        lifecycle::can_bulk_schedule(self.effective_selection())
    }

    pub fn can_bulk_delete(&self) -> bool {
        lifecycle::can_bulk_delete(self.effective_selection())
    }

    /// Count of every status over the full (unfiltered) set.
    pub fn status_counts(&self) -> BTreeMap<AgendaStatus, usize> {
        status_counts(&self.agendas)
    }
}

pub fn status_counts(agendas: &[Agenda]) -> BTreeMap<AgendaStatus, usize> {
    let mut counts: BTreeMap<AgendaStatus, usize> =
        AgendaStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for agenda in agendas {
        *counts.entry(agenda.status).or_default() += 1;
    }
    counts
}
