use crate::error::{DripError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// State layout
// ---------------------------------------------------------------------------

pub const DRIP_DIR: &str = ".drip";
pub const CONFIG_FILE: &str = ".drip/config.yaml";
pub const ORDER_FILE: &str = ".drip/order.yaml";
pub const CURSORS_FILE: &str = ".drip/cursors.yaml";
pub const LIBRARY_FILE: &str = ".drip/library.json";

pub fn drip_dir(root: &Path) -> PathBuf {
    root.join(DRIP_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn order_path(root: &Path) -> PathBuf {
    root.join(ORDER_FILE)
}

pub fn cursors_path(root: &Path) -> PathBuf {
    root.join(CURSORS_FILE)
}

pub fn library_path(root: &Path) -> PathBuf {
    root.join(LIBRARY_FILE)
}

// ---------------------------------------------------------------------------
// Recipient validation
// ---------------------------------------------------------------------------

static RECIPIENT_RE: OnceLock<Regex> = OnceLock::new();

fn recipient_re() -> &'static Regex {
    // E.164: leading +, non-zero lead digit, 8-15 digits total.
    RECIPIENT_RE.get_or_init(|| Regex::new(r"^\+[1-9][0-9]{7,14}$").unwrap())
}

pub fn validate_recipient(number: &str) -> Result<()> {
    if !recipient_re().is_match(number) {
        return Err(DripError::InvalidRecipient(number.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_recipients() {
        for number in ["+15551234567", "+447911123456", "+861012345678"] {
            validate_recipient(number).unwrap_or_else(|_| panic!("expected valid: {number}"));
        }
    }

    #[test]
    fn invalid_recipients() {
        for number in [
            "",
            "15551234567",
            "+0551234567",
            "+1555123",
            "+1 555 123 4567",
            "+1555123456789012345",
            "not-a-number",
        ] {
            assert!(
                validate_recipient(number).is_err(),
                "expected invalid: {number}"
            );
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/proj");
        assert_eq!(
            config_path(root),
            PathBuf::from("/tmp/proj/.drip/config.yaml")
        );
        assert_eq!(order_path(root), PathBuf::from("/tmp/proj/.drip/order.yaml"));
        assert_eq!(
            cursors_path(root),
            PathBuf::from("/tmp/proj/.drip/cursors.yaml")
        );
        assert_eq!(
            library_path(root),
            PathBuf::from("/tmp/proj/.drip/library.json")
        );
    }
}
