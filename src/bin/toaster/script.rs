use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use toaster::NotificationRequest;
use toaster::config::HumantimeDuration;
use toaster::error::ScriptError;

/// One scripted event, applied once the engine clock reaches `at`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct Step {
    #[serde_as(as = "HumantimeDuration")]
    #[serde(default)]
    pub at: Duration,
    #[serde(flatten)]
    pub action: Action,
}

/// Toasts are addressed by their index among live toasts, in document order.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Notify(NotificationRequest),
    Hover {
        toast: usize,
    },
    Leave {
        toast: usize,
    },
    Click {
        toast: usize,
    },
    Close {
        toast: usize,
    },
    Focus {
        toast: usize,
    },
    Blur,
    Dismiss {
        toast: usize,
        #[serde(default)]
        force: bool,
    },
    Clear,
}

impl Action {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Notify(_) => "notify",
            Self::Hover { .. } => "hover",
            Self::Leave { .. } => "leave",
            Self::Click { .. } => "click",
            Self::Close { .. } => "close",
            Self::Focus { .. } => "focus",
            Self::Blur => "blur",
            Self::Dismiss { .. } => "dismiss",
            Self::Clear => "clear",
        }
    }
}

pub fn load(path: &Path) -> Result<Vec<Step>, ScriptError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(path, &raw)
}

pub fn parse(path: &Path, raw: &str) -> Result<Vec<Step>, ScriptError> {
    serde_json::from_str(raw).map_err(|source| ScriptError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
