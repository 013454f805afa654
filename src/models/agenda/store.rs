use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::RwLock;

use super::types::{Agenda, MeetingKey};
use crate::errors::AppError;

/// Storage for agenda rows.
///
/// Writes are whole-record and unconditional: two concurrent saves of the same
/// agenda resolve as last write wins.
#[async_trait]
pub trait AgendaStore: Send + Sync {
    /// All agendas, newest first.
    async fn list(&self) -> Result<Vec<Agenda>, AppError>;

    async fn find(&self, id: i64) -> Result<Option<Agenda>, AppError>;

    /// Persist a new agenda; the `id` on the input is ignored. Returns the stored row.
    async fn insert(&self, agenda: Agenda) -> Result<Agenda, AppError>;

    /// Overwrite an existing agenda. `AppError::NotFound` if it is gone.
    async fn save(&self, agenda: &Agenda) -> Result<(), AppError>;

    /// Permanently remove an agenda. `AppError::NotFound` if it is gone.
    async fn delete(&self, id: i64) -> Result<(), AppError>;

    /// Every agenda whose minutes carry this meeting number, year and type.
    async fn find_by_meeting(&self, key: &MeetingKey) -> Result<Vec<Agenda>, AppError>;
}

/// In-process store used when no database is configured, and by the tests.
#[derive(Default)]
pub struct MemoryAgendaStore {
    rows: RwLock<BTreeMap<i64, Agenda>>,
    next_id: AtomicI64,
}

impl MemoryAgendaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgendaStore for MemoryAgendaStore {
    async fn list(&self) -> Result<Vec<Agenda>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows.values().rev().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Agenda>, AppError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn insert(&self, mut agenda: Agenda) -> Result<Agenda, AppError> {
        agenda.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.write().await.insert(agenda.id, agenda.clone());
        Ok(agenda)
    }

    async fn save(&self, agenda: &Agenda) -> Result<(), AppError> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&agenda.id) {
            Some(row) => {
                *row = agenda.clone();
                Ok(())
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        match self.rows.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound),
        }
    }

    async fn find_by_meeting(&self, key: &MeetingKey) -> Result<Vec<Agenda>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .filter(|a| a.meeting_key().as_ref() == Some(key))
            .cloned()
            .collect())
    }
}
