//! Display-frame model for the target device.
//!
//! The device renders a sequence of small text/icon frames; order is
//! significant. This module owns the JSON contract and nothing else.

pub mod icons;

use serde::Serialize;
use utoipa::ToSchema;

/// One unit of sequential display output.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Frame {
    pub text: String,
    /// Symbolic icon id (e.g. "i996") or an inline base64 data URI.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Progress-indicator payload; used purely as a visual marker.
    #[serde(rename = "goalData", skip_serializing_if = "Option::is_none")]
    pub goal_data: Option<GoalData>,
}

impl Frame {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: None,
            goal_data: None,
        }
    }

    pub fn with_icon(text: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            icon: Some(icon.into()),
            goal_data: None,
        }
    }

    pub fn goal(mut self, goal: GoalData) -> Self {
        self.goal_data = Some(goal);
        self
    }
}

/// Progress-indicator payload attached to a frame.
///
/// The numbers carry no meaning beyond driving the device's goal bar.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GoalData {
    pub start: i32,
    pub current: i32,
    pub end: i32,
    pub unit: String,
}

impl GoalData {
    /// Full bar shown next to an imminent departure.
    pub fn due() -> Self {
        Self {
            start: 0,
            current: 1,
            end: 1,
            unit: String::new(),
        }
    }

    /// Empty bar marking a platform as assigned.
    pub fn platform_assigned() -> Self {
        Self {
            start: 0,
            current: 0,
            end: 1,
            unit: String::new(),
        }
    }
}

/// Device response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FrameResponse {
    pub frames: Vec<Frame>,
}

impl FrameResponse {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn single(frame: Frame) -> Self {
        Self {
            frames: vec![frame],
        }
    }
}
