//! Local checks run before anything is sent. Failures are
//! `ValidationError`s and leave the caller's input untouched.

use payloads::ErrorInfo;
use payloads::requests::{COMMENT_MAX_LEN, REPORT_REASON_MAX_LEN};

/// Trimmed comment body, or why it cannot be posted.
pub fn content(raw: &str) -> Result<String, ErrorInfo> {
    non_blank(raw, COMMENT_MAX_LEN, "Comment cannot be empty.", "Comment")
}

/// Trimmed report reason, or why it cannot be submitted.
pub fn report_reason(raw: &str) -> Result<String, ErrorInfo> {
    non_blank(
        raw,
        REPORT_REASON_MAX_LEN,
        "Please give a reason for reporting this comment.",
        "Reason",
    )
}

fn non_blank(
    raw: &str,
    max_len: usize,
    empty: &str,
    what: &str,
) -> Result<String, ErrorInfo> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ErrorInfo::validation(empty));
    }
    if trimmed.chars().count() > max_len {
        return Err(ErrorInfo::validation(format!(
            "{what} must be at most {max_len} characters."
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::ErrorKind;

    #[test]
    fn whitespace_only_is_rejected() {
        let error = report_reason(" \n\t ").unwrap_err();
        assert_eq!(error.kind, ErrorKind::ValidationError);
        assert!(content("   ").is_err());
    }

    #[test]
    fn input_is_trimmed() {
        assert_eq!(content("  hello ").unwrap(), "hello");
    }

    #[test]
    fn length_is_counted_in_characters() {
        let at_limit = "é".repeat(REPORT_REASON_MAX_LEN);
        assert!(report_reason(&at_limit).is_ok());
        assert!(report_reason(&format!("{at_limit}é")).is_err());
    }
}
