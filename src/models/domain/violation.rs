use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AttemptError;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    #[serde(rename = "timestamp")]
    pub occurred_at: DateTime<Utc>,
}

impl Violation {
    pub fn new(kind: ViolationKind) -> Self {
        Self {
            kind,
            occurred_at: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    TabSwitch,
    WindowBlur,
    FullscreenExit,
    CopyAttempt,
    CutAttempt,
    PasteAttempt,
    ContextMenu,
    PrintAttempt,
    DevToolsOpen,
}

impl ViolationKind {
    pub fn detector(&self) -> Detector {
        match self {
            ViolationKind::TabSwitch | ViolationKind::WindowBlur => Detector::TabVisibility,
            ViolationKind::FullscreenExit => Detector::Fullscreen,
            ViolationKind::CopyAttempt | ViolationKind::CutAttempt | ViolationKind::PasteAttempt => {
                Detector::Clipboard
            }
            ViolationKind::ContextMenu => Detector::ContextMenu,
            ViolationKind::PrintAttempt => Detector::Print,
            ViolationKind::DevToolsOpen => Detector::DevTools,
        }
    }

    /// Warning text shown to the learner before they choose to continue.
    pub fn description(&self) -> &'static str {
        match self {
            ViolationKind::TabSwitch => "You switched away from the assessment tab",
            ViolationKind::WindowBlur => "The assessment window lost focus",
            ViolationKind::FullscreenExit => "You exited fullscreen mode",
            ViolationKind::CopyAttempt => "Copying content is not allowed",
            ViolationKind::CutAttempt => "Cutting content is not allowed",
            ViolationKind::PasteAttempt => "Pasting content is not allowed",
            ViolationKind::ContextMenu => "The context menu is disabled during the assessment",
            ViolationKind::PrintAttempt => "Printing is not allowed",
            ViolationKind::DevToolsOpen => "Developer tools were detected",
        }
    }
}

/// A family of signals the violation monitor can be told to watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Detector {
    TabVisibility,
    Fullscreen,
    Clipboard,
    ContextMenu,
    Print,
    DevTools,
}

impl Detector {
    pub const ALL: [Detector; 6] = [
        Detector::TabVisibility,
        Detector::Fullscreen,
        Detector::Clipboard,
        Detector::ContextMenu,
        Detector::Print,
        Detector::DevTools,
    ];
}

impl FromStr for Detector {
    type Err = AttemptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "tab_visibility" | "tab" => Ok(Detector::TabVisibility),
            "fullscreen" => Ok(Detector::Fullscreen),
            "clipboard" | "copy_paste" => Ok(Detector::Clipboard),
            "context_menu" => Ok(Detector::ContextMenu),
            "print" => Ok(Detector::Print),
            "dev_tools" | "devtools" => Ok(Detector::DevTools),
            other => Err(AttemptError::ValidationError(format!(
                "Unknown violation detector '{}'",
                other
            ))),
        }
    }
}
