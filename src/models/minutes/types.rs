use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::agenda::{Arahan, Attendance, AttendanceStatus, Decision, FollowUp};

/// Input for recording the minutes of a scheduled agenda.
#[derive(Debug, Clone, Deserialize)]
pub struct MinutesInput {
    pub meeting_number: i32,
    pub meeting_year: i32,
    #[serde(default)]
    pub attendance: Vec<AttendanceInput>,
    #[serde(default)]
    pub decisions: Vec<String>,
    #[serde(default)]
    pub arahan: Vec<ArahanInput>,
    #[serde(default)]
    pub notes_html: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceInput {
    pub name: String,
    #[serde(default)]
    pub position: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub representative: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArahanInput {
    pub text: String,
    #[serde(default)]
    pub pic: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl From<AttendanceInput> for Attendance {
    fn from(input: AttendanceInput) -> Self {
        Attendance {
            name: input.name.trim().to_string(),
            position: input.position.trim().to_string(),
            status: input.status,
            representative: crate::validate::non_blank(input.representative.as_deref()),
        }
    }
}

impl From<String> for Decision {
    fn from(text: String) -> Self {
        Decision { text: text.trim().to_string() }
    }
}

impl From<ArahanInput> for Arahan {
    fn from(input: ArahanInput) -> Self {
        Arahan {
            text: input.text.trim().to_string(),
            pic: input.pic.trim().to_string(),
            due_date: input.due_date,
            follow_up: FollowUp::default(),
        }
    }
}
