use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Workflow status of an agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgendaStatus {
    Draft,
    DapatDilanjutkan,
    Dijadwalkan,
    Ditunda,
    Dibatalkan,
    Selesai,
}

impl AgendaStatus {
    pub const ALL: [AgendaStatus; 6] = [
        AgendaStatus::Draft,
        AgendaStatus::DapatDilanjutkan,
        AgendaStatus::Dijadwalkan,
        AgendaStatus::Ditunda,
        AgendaStatus::Dibatalkan,
        AgendaStatus::Selesai,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgendaStatus::Draft => "DRAFT",
            AgendaStatus::DapatDilanjutkan => "DAPAT_DILANJUTKAN",
            AgendaStatus::Dijadwalkan => "DIJADWALKAN",
            AgendaStatus::Ditunda => "DITUNDA",
            AgendaStatus::Dibatalkan => "DIBATALKAN",
            AgendaStatus::Selesai => "SELESAI",
        }
    }
}

impl fmt::Display for AgendaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownValue(pub String);

impl fmt::Display for UnknownValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown value '{}'", self.0)
    }
}

impl std::error::Error for UnknownValue {}

impl FromStr for AgendaStatus {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgendaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownValue(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingType {
    #[serde(rename = "RADIR")]
    Radir,
    #[serde(rename = "RAKORDIR")]
    Rakordir,
    #[serde(rename = "RAPAT_KHUSUS")]
    RapatKhusus,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Radir => "RADIR",
            MeetingType::Rakordir => "RAKORDIR",
            MeetingType::RapatKhusus => "RAPAT_KHUSUS",
        }
    }

    /// Title used in exported documents.
    pub fn display_name(&self) -> &'static str {
        match self {
            MeetingType::Radir => "Rapat Direksi",
            MeetingType::Rakordir => "Rapat Koordinasi Direksi",
            MeetingType::RapatKhusus => "Rapat Khusus",
        }
    }
}

impl FromStr for MeetingType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RADIR" => Ok(MeetingType::Radir),
            "RAKORDIR" => Ok(MeetingType::Rakordir),
            "RAPAT_KHUSUS" => Ok(MeetingType::RapatKhusus),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Urgency {
    #[default]
    Biasa,
    Segera,
    SangatSegera,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Biasa => "BIASA",
            Urgency::Segera => "SEGERA",
            Urgency::SangatSegera => "SANGAT_SEGERA",
        }
    }
}

impl FromStr for Urgency {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BIASA" => Ok(Urgency::Biasa),
            "SEGERA" => Ok(Urgency::Segera),
            "SANGAT_SEGERA" => Ok(Urgency::SangatSegera),
            other => Err(UnknownValue(other.to_string())),
        }
    }
}

/// Derived from days until the deadline; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Rendah,
    Sedang,
    Tinggi,
}

impl Priority {
    pub fn from_deadline(deadline: Option<NaiveDate>, today: NaiveDate) -> Self {
        let Some(deadline) = deadline else {
            return Priority::Rendah;
        };
        let days_left = (deadline - today).num_days();
        if days_left <= 3 {
            Priority::Tinggi
        } else if days_left <= 7 {
            Priority::Sedang
        } else {
            Priority::Rendah
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttachmentKind {
    NotaDinas,
    MateriPresentasi,
    KajianHukum,
    KajianRisiko,
}

impl AttachmentKind {
    /// Slots every agenda must settle before it can move past DRAFT.
    pub const MANDATORY: [AttachmentKind; 4] = [
        AttachmentKind::NotaDinas,
        AttachmentKind::MateriPresentasi,
        AttachmentKind::KajianHukum,
        AttachmentKind::KajianRisiko,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentSlot {
    pub kind: AttachmentKind,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub not_required: bool,
}

impl AttachmentSlot {
    pub fn empty(kind: AttachmentKind) -> Self {
        AttachmentSlot { kind, path: None, not_required: false }
    }

    pub fn is_settled(&self) -> bool {
        self.not_required || self.path.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MeetingMethod {
    Offline,
    Online,
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub method: MeetingMethod,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Hadir,
    Diwakili,
    TidakHadir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub name: String,
    #[serde(default)]
    pub position: String,
    pub status: AttendanceStatus,
    #[serde(default)]
    pub representative: Option<String>,
}

impl Attendance {
    pub fn is_present(&self) -> bool {
        matches!(self.status, AttendanceStatus::Hadir | AttendanceStatus::Diwakili)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FollowUpStatus {
    #[default]
    Belum,
    Proses,
    Selesai,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FollowUp {
    #[serde(default)]
    pub status: FollowUpStatus,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub evidence_path: Option<String>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

/// A directive issued during the meeting, tracked afterwards by monitoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arahan {
    pub text: String,
    #[serde(default)]
    pub pic: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub follow_up: FollowUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingMinutes {
    pub meeting_number: i32,
    pub meeting_year: i32,
    #[serde(default)]
    pub attendance: Vec<Attendance>,
    #[serde(default)]
    pub decisions: Vec<Decision>,
    #[serde(default)]
    pub arahan: Vec<Arahan>,
    #[serde(default)]
    pub notes_html: String,
    #[serde(default)]
    pub finalized_at: Option<NaiveDateTime>,
}

/// Composite key shared by every agenda discussed in one meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeetingKey {
    pub meeting_number: i32,
    pub meeting_year: i32,
    pub meeting_type: MeetingType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agenda {
    pub id: i64,
    pub title: String,
    pub meeting_type: MeetingType,
    pub urgency: Urgency,
    pub urgency_justification: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub initiator: String,
    pub director: String,
    pub support: Vec<String>,
    pub contact_person: String,
    pub attachments: Vec<AttachmentSlot>,
    pub supporting_documents: Vec<String>,
    pub status: AgendaStatus,
    pub cancellation_reason: Option<String>,
    pub postponement_reason: Option<String>,
    pub schedule: Option<Schedule>,
    pub minutes: Option<MeetingMinutes>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Agenda {
    pub fn meeting_key(&self) -> Option<MeetingKey> {
        self.minutes.as_ref().map(|m| MeetingKey {
            meeting_number: m.meeting_number,
            meeting_year: m.meeting_year,
            meeting_type: self.meeting_type,
        })
    }

    pub fn priority(&self, today: NaiveDate) -> Priority {
        Priority::from_deadline(self.deadline, today)
    }
}

/// Form input for creating or editing an agenda.
#[derive(Debug, Clone, Deserialize)]
pub struct AgendaForm {
    pub title: String,
    pub meeting_type: MeetingType,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub urgency_justification: Option<String>,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    pub initiator: String,
    pub director: String,
    #[serde(default)]
    pub support: Vec<String>,
    pub contact_person: String,
    #[serde(default)]
    pub attachments: Vec<AttachmentSlot>,
    #[serde(default)]
    pub supporting_documents: Vec<String>,
}

/// Agenda plus the values derived at read time.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaView {
    #[serde(flatten)]
    pub agenda: Agenda,
    pub priority: Priority,
    pub is_complete: bool,
}
