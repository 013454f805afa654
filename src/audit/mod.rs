use serde_json::{Value, json};

/// Log target for audit entries, so they can be routed separately
/// (`RUST_LOG=audit=info`).
pub const TARGET: &str = "audit";

/// Record an audit entry for an agenda workflow action.
pub fn log(actor: &str, action: &str, target_type: &str, target_id: i64, details: Value) {
    let entry = entry(actor, action, target_type, target_id, details);
    log::info!(target: TARGET, "{entry}");
}

/// Build the JSON audit entry written by [`log`].
pub fn entry(actor: &str, action: &str, target_type: &str, target_id: i64, details: Value) -> Value {
    json!({
        "at": chrono::Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S").to_string(),
        "actor": actor,
        "action": action,
        "target_type": target_type,
        "target_id": target_id,
        "details": details,
    })
}
