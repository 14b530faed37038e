use crate::error::{DripError, Result};
use crate::{io, paths};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

fn warning(message: String) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Warning,
        message,
    }
}

fn error(message: String) -> ConfigWarning {
    ConfigWarning {
        level: WarnLevel::Error,
        message,
    }
}

// ---------------------------------------------------------------------------
// TwilioConfig
// ---------------------------------------------------------------------------

pub const PLACEHOLDER_SID: &str = "ACXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";
pub const PLACEHOLDER_TOKEN: &str = "your-auth-token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub twilio: TwilioConfig,
    #[serde(default)]
    pub recipients: Vec<String>,
    /// Optional override for the content snapshot location, relative to the
    /// state root unless absolute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
}

fn default_version() -> u32 {
    1
}

impl Config {
    /// The config `drip init` writes: valid shape, placeholder credentials.
    pub fn starter() -> Self {
        Self {
            version: 1,
            twilio: TwilioConfig {
                account_sid: PLACEHOLDER_SID.to_string(),
                auth_token: PLACEHOLDER_TOKEN.to_string(),
                from_number: "+15550000000".to_string(),
            },
            recipients: Vec::new(),
            library: None,
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(DripError::NotInitialized);
        }
        let data =
            std::fs::read_to_string(&path).map_err(|e| DripError::load("config", &path, e))?;
        serde_yaml::from_str(&data).map_err(|e| DripError::load("config", &path, e))
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self).map_err(|e| DripError::persist("config", &path, e))?;
        io::atomic_write(&path, data.as_bytes())
            .map_err(|e| DripError::persist("config", &path, e))
    }

    /// Resolve the content snapshot path: explicit override first, then the
    /// configured location, then the default under `.drip/`.
    pub fn library_path(&self, root: &Path, override_path: Option<&Path>) -> PathBuf {
        if let Some(p) = override_path {
            return p.to_path_buf();
        }
        match &self.library {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => paths::library_path(root),
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let sid = self.twilio.account_sid.trim();
        if sid.is_empty() || sid == PLACEHOLDER_SID {
            warnings.push(error("twilio.account_sid is not set".to_string()));
        } else if !sid.starts_with("AC") {
            warnings.push(warning(format!(
                "twilio.account_sid '{sid}' does not look like an account SID (expected AC prefix)"
            )));
        }

        let token = self.twilio.auth_token.trim();
        if token.is_empty() || token == PLACEHOLDER_TOKEN {
            warnings.push(error("twilio.auth_token is not set".to_string()));
        }

        if paths::validate_recipient(&self.twilio.from_number).is_err() {
            warnings.push(error(format!(
                "twilio.from_number '{}' is not an E.164 number",
                self.twilio.from_number
            )));
        }

        if self.recipients.is_empty() {
            warnings.push(warning(
                "no recipients configured — 'drip send' will do nothing".to_string(),
            ));
        }

        for recipient in &self.recipients {
            if paths::validate_recipient(recipient).is_err() {
                warnings.push(error(format!(
                    "recipient '{recipient}' is not an E.164 number"
                )));
            }
        }

        let mut seen = HashSet::new();
        for recipient in &self.recipients {
            if !seen.insert(recipient) {
                warnings.push(warning(format!(
                    "recipient '{recipient}' is listed more than once; duplicates receive one item per run"
                )));
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
