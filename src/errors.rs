use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use std::fmt;

/// Message shown to users for anything that is not their fault.
pub const SYSTEM_ERROR_MESSAGE: &str = "A system error occurred. Please try again.";

#[derive(Debug)]
pub enum AppError {
    Db(sqlx::Error),
    Migrate(sqlx::migrate::MigrateError),
    Io(std::io::Error),
    Json(serde_json::Error),
    /// Bad input: missing fields, a reason that is too short, and so on.
    Validation(String),
    /// The agenda is not in a state that allows the requested action.
    Precondition(String),
    Export(String),
    NotFound,
}

impl AppError {
    /// The message a caller may show to the user. System errors collapse to a
    /// generic message; the detail only goes to the log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Precondition(msg) | AppError::Export(msg) => {
                msg.clone()
            }
            AppError::NotFound => "Agenda not found".to_string(),
            _ => SYSTEM_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_system(&self) -> bool {
        matches!(
            self,
            AppError::Db(_) | AppError::Migrate(_) | AppError::Io(_) | AppError::Json(_)
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Db(e) => write!(f, "Database error: {e}"),
            AppError::Migrate(e) => write!(f, "Migration error: {e}"),
            AppError::Io(e) => write!(f, "IO error: {e}"),
            AppError::Json(e) => write!(f, "JSON error: {e}"),
            AppError::Validation(msg) => write!(f, "Validation failed: {msg}"),
            AppError::Precondition(msg) => write!(f, "Not allowed: {msg}"),
            AppError::Export(msg) => write!(f, "Export failed: {msg}"),
            AppError::NotFound => write!(f, "Not found"),
        }
    }
}

impl std::error::Error for AppError {}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Precondition(_) => StatusCode::CONFLICT,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Export(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.is_system() {
            log::error!("{self}");
        }
        HttpResponse::build(self.status_code()).json(ErrorBody {
            success: false,
            message: self.user_message(),
        })
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Db(e)
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        AppError::Migrate(e)
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Io(e)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Json(e)
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(e: zip::result::ZipError) -> Self {
        AppError::Export(format!("Invalid document template: {e}"))
    }
}
