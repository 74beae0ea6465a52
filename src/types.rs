use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Closed set of notification severities, one entry point each.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Info,
    Success,
    Warning,
}

impl Severity {
    pub const ALL: [Self; 4] = [Self::Error, Self::Info, Self::Success, Self::Warning];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" | "err" => Ok(Self::Error),
            "info" | "information" => Ok(Self::Info),
            "success" | "ok" => Ok(Self::Success),
            "warn" | "warning" => Ok(Self::Warning),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Icon class applied to a toast for each severity.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct IconClasses {
    pub error: String,
    pub info: String,
    pub success: String,
    pub warning: String,
}

impl IconClasses {
    #[must_use]
    pub fn for_severity(&self, severity: Severity) -> &str {
        match severity {
            Severity::Error => &self.error,
            Severity::Info => &self.info,
            Severity::Success => &self.success,
            Severity::Warning => &self.warning,
        }
    }
}

impl Default for IconClasses {
    fn default() -> Self {
        Self {
            error: "toast-error".to_string(),
            info: "toast-info".to_string(),
            success: "toast-success".to_string(),
            warning: "toast-warning".to_string(),
        }
    }
}
