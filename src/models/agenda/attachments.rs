//! Attachment path handling. The binaries live in object storage; agendas only
//! ever carry the path strings.

use super::types::{AttachmentKind, AttachmentSlot};

/// Object-store path for an uploaded file: `{workflow}/{user_id}/{file_name}`.
pub fn object_path(workflow: &str, user_id: &str, file_name: &str) -> String {
    format!(
        "{}/{}/{}",
        workflow.trim_matches('/'),
        user_id.trim_matches('/'),
        file_name.trim_start_matches('/')
    )
}

/// Reject paths that are empty, absolute, or try to climb out of their prefix.
pub fn validate_path(path: &str) -> Option<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Some("Attachment path is empty".to_string());
    }
    if trimmed.starts_with('/') || trimmed.starts_with('\\') || trimmed.contains(':') {
        return Some(format!("Attachment path '{trimmed}' must be relative"));
    }
    if trimmed.split(['/', '\\']).any(|part| part == "..") {
        return Some(format!("Attachment path '{trimmed}' must not contain '..'"));
    }
    None
}

/// Normalise submitted slots: one slot per mandatory kind, in a fixed order.
/// Later duplicates of a kind win; blank paths become `None`.
pub fn normalize_slots(submitted: &[AttachmentSlot]) -> Vec<AttachmentSlot> {
    AttachmentKind::MANDATORY
        .iter()
        .map(|kind| {
            submitted
                .iter()
                .rev()
                .find(|slot| slot.kind == *kind)
                .map(|slot| AttachmentSlot {
                    kind: *kind,
                    path: crate::validate::non_blank(slot.path.as_deref()),
                    not_required: slot.not_required,
                })
                .unwrap_or_else(|| AttachmentSlot::empty(*kind))
        })
        .collect()
}
