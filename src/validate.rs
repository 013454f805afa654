use chrono::Datelike;

/// Shortest cancellation or postponement reason accepted, in characters.
pub const MIN_REASON_LEN: usize = 5;

/// Validate a cancellation/postponement reason: required, at least 5 characters.
pub fn validate_reason(reason: &str) -> Option<String> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Some("Reason is required".to_string());
    }
    if trimmed.chars().count() < MIN_REASON_LEN {
        return Some(format!("Reason must be at least {MIN_REASON_LEN} characters"));
    }
    None
}

/// Validate a required text field with a max length.
pub fn validate_required(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(format!("{field_name} is required"));
    }
    if trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate an optional text field with a max length (empty is OK).
pub fn validate_optional(value: &str, field_name: &str, max_len: usize) -> Option<String> {
    let trimmed = value.trim();
    if !trimmed.is_empty() && trimmed.chars().count() > max_len {
        return Some(format!("{field_name} must be at most {max_len} characters"));
    }
    None
}

/// Validate a meeting year: four digits, not absurdly far from today.
pub fn validate_year(year: i32) -> Option<String> {
    let current = chrono::Local::now().year();
    if !(2000..=current + 1).contains(&year) {
        return Some(format!("Meeting year must be between 2000 and {}", current + 1));
    }
    None
}

/// Trim a value and turn blank input into `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Collect every validation error; `Err` carries them joined for display.
pub fn collect(errors: impl IntoIterator<Item = Option<String>>) -> Result<(), String> {
    let errors: Vec<String> = errors.into_iter().flatten().collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_reasons_are_rejected() {
        assert!(validate_reason("").is_some());
        assert!(validate_reason("ok").is_some());
        assert!(validate_reason("   abcd   ").is_some());
        assert!(validate_reason("abcde").is_none());
        assert!(validate_reason("Dokumen belum lengkap").is_none());
    }

    #[test]
    fn reason_length_counts_characters_not_bytes() {
        // four characters, eight bytes
        assert!(validate_reason("éééé").is_some());
    }

    #[test]
    fn required_and_optional_fields() {
        assert!(validate_required("  ", "Title", 10).is_some());
        assert!(validate_required("abc", "Title", 2).is_some());
        assert!(validate_required("abc", "Title", 10).is_none());
        assert!(validate_optional("", "Note", 3).is_none());
        assert!(validate_optional("abcd", "Note", 3).is_some());
    }

    #[test]
    fn collect_joins_messages() {
        assert!(collect([None, None]).is_ok());
        let err = collect([Some("a".to_string()), None, Some("b".to_string())]).unwrap_err();
        assert_eq!(err, "a; b");
    }
}
