use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::PgPool;
use sqlx::types::Json;

use super::store::AgendaStore;
use super::types::*;
use crate::errors::AppError;

/// PostgreSQL-backed agenda store. Nested data (attachments, schedule, minutes)
/// lives in JSONB columns next to the scalar fields.
#[derive(Clone)]
pub struct PgAgendaStore {
    pool: PgPool,
}

impl PgAgendaStore {
    pub fn new(pool: PgPool) -> Self {
        PgAgendaStore { pool }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, title, meeting_type, urgency, urgency_justification, \
            deadline, initiator, director, support, contact_person, attachments, \
            supporting_documents, status, cancellation_reason, postponement_reason, \
            schedule, minutes, created_by, created_at, updated_at \
     FROM agendas";

#[derive(sqlx::FromRow)]
struct Row {
    id: i64,
    title: String,
    meeting_type: String,
    urgency: String,
    urgency_justification: Option<String>,
    deadline: Option<NaiveDate>,
    initiator: String,
    director: String,
    support: Json<Vec<String>>,
    contact_person: String,
    attachments: Json<Vec<AttachmentSlot>>,
    supporting_documents: Json<Vec<String>>,
    status: String,
    cancellation_reason: Option<String>,
    postponement_reason: Option<String>,
    schedule: Option<Json<Schedule>>,
    minutes: Option<Json<MeetingMinutes>>,
    created_by: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn decode_err(e: UnknownValue) -> AppError {
    AppError::Db(sqlx::Error::Decode(Box::new(e)))
}

impl TryFrom<Row> for Agenda {
    type Error = AppError;

    fn try_from(row: Row) -> Result<Self, Self::Error> {
        Ok(Agenda {
            id: row.id,
            title: row.title,
            meeting_type: row.meeting_type.parse().map_err(decode_err)?,
            urgency: row.urgency.parse().map_err(decode_err)?,
            urgency_justification: row.urgency_justification,
            deadline: row.deadline,
            initiator: row.initiator,
            director: row.director,
            support: row.support.0,
            contact_person: row.contact_person,
            attachments: row.attachments.0,
            supporting_documents: row.supporting_documents.0,
            status: row.status.parse().map_err(decode_err)?,
            cancellation_reason: row.cancellation_reason,
            postponement_reason: row.postponement_reason,
            schedule: row.schedule.map(|j| j.0),
            minutes: row.minutes.map(|j| j.0),
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn into_agendas(rows: Vec<Row>) -> Result<Vec<Agenda>, AppError> {
    rows.into_iter().map(Agenda::try_from).collect()
}

#[async_trait]
impl AgendaStore for PgAgendaStore {
    async fn list(&self) -> Result<Vec<Agenda>, AppError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY created_at DESC, id DESC");
        let rows = sqlx::query_as::<_, Row>(&sql)
            .fetch_all(&self.pool)
            .await?;
        into_agendas(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<Agenda>, AppError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1");
        let row = sqlx::query_as::<_, Row>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(Agenda::try_from).transpose()
    }

    async fn insert(&self, agenda: Agenda) -> Result<Agenda, AppError> {
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO agendas (title, meeting_type, urgency, urgency_justification, deadline, \
                                  initiator, director, support, contact_person, attachments, \
                                  supporting_documents, status, cancellation_reason, \
                                  postponement_reason, schedule, minutes, created_by, \
                                  created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                     $17, $18, $19) \
             RETURNING id",
        )
        .bind(&agenda.title)
        .bind(agenda.meeting_type.as_str())
        .bind(agenda.urgency.as_str())
        .bind(&agenda.urgency_justification)
        .bind(agenda.deadline)
        .bind(&agenda.initiator)
        .bind(&agenda.director)
        .bind(Json(&agenda.support))
        .bind(&agenda.contact_person)
        .bind(Json(&agenda.attachments))
        .bind(Json(&agenda.supporting_documents))
        .bind(agenda.status.as_str())
        .bind(&agenda.cancellation_reason)
        .bind(&agenda.postponement_reason)
        .bind(agenda.schedule.as_ref().map(Json))
        .bind(agenda.minutes.as_ref().map(Json))
        .bind(&agenda.created_by)
        .bind(agenda.created_at)
        .bind(agenda.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Agenda { id, ..agenda })
    }

    async fn save(&self, agenda: &Agenda) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE agendas SET title = $2, meeting_type = $3, urgency = $4, \
                    urgency_justification = $5, deadline = $6, initiator = $7, director = $8, \
                    support = $9, contact_person = $10, attachments = $11, \
                    supporting_documents = $12, status = $13, cancellation_reason = $14, \
                    postponement_reason = $15, schedule = $16, minutes = $17, updated_at = $18 \
             WHERE id = $1",
        )
        .bind(agenda.id)
        .bind(&agenda.title)
        .bind(agenda.meeting_type.as_str())
        .bind(agenda.urgency.as_str())
        .bind(&agenda.urgency_justification)
        .bind(agenda.deadline)
        .bind(&agenda.initiator)
        .bind(&agenda.director)
        .bind(Json(&agenda.support))
        .bind(&agenda.contact_person)
        .bind(Json(&agenda.attachments))
        .bind(Json(&agenda.supporting_documents))
        .bind(agenda.status.as_str())
        .bind(&agenda.cancellation_reason)
        .bind(&agenda.postponement_reason)
        .bind(agenda.schedule.as_ref().map(Json))
        .bind(agenda.minutes.as_ref().map(Json))
        .bind(agenda.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agendas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn find_by_meeting(&self, key: &MeetingKey) -> Result<Vec<Agenda>, AppError> {
        let sql = format!(
            "{SELECT_COLUMNS} \
             WHERE meeting_number = $1 AND meeting_year = $2 AND meeting_type = $3 \
             ORDER BY id ASC"
        );
        let rows = sqlx::query_as::<_, Row>(&sql)
            .bind(key.meeting_number)
            .bind(key.meeting_year)
            .bind(key.meeting_type.as_str())
            .fetch_all(&self.pool)
            .await?;
        into_agendas(rows)
    }
}
