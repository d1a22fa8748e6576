//! P2PQuake JSON API v2 messages.
//!
//! Only the fields the relay consumes are modelled. Every field is optional
//! or defaulted because the same socket carries many message codes with
//! unrelated shapes.

use serde::{Deserialize, Serialize};

/// Earthquake information (震度・震源に関する情報).
pub const CODE_EARTHQUAKE: i32 = 551;

/// Tsunami forecast (津波予報).
pub const CODE_TSUNAMI: i32 = 552;

/// A message received from the P2PQuake WebSocket.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct P2pQuakeMessage {
    /// Message code; selects the payload shape.
    #[serde(default)]
    pub code: i32,

    /// Earthquake details (code 551).
    #[serde(default)]
    pub earthquake: Option<Earthquake>,

    /// Observation points (code 551).
    #[serde(default)]
    pub points: Vec<ObservationPoint>,

    /// Issue metadata (code 551, 552).
    #[serde(default)]
    pub issue: Option<Issue>,

    /// Free-form comments (code 551).
    #[serde(default)]
    pub comments: Option<Comments>,

    /// Whether the tsunami forecast was lifted (code 552).
    #[serde(default)]
    pub cancelled: bool,

    /// Tsunami forecast areas (code 552).
    #[serde(default)]
    pub areas: Vec<TsunamiArea>,
}

/// Earthquake summary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Earthquake {
    /// Origin time, e.g. "2024/01/01 16:10:00" (JST).
    #[serde(default)]
    pub time: String,

    /// Hypocenter details.
    #[serde(default)]
    pub hypocenter: Hypocenter,

    /// Maximum intensity scale code (-1 when unknown).
    #[serde(default = "unknown_i32")]
    pub max_scale: i32,

    /// Domestic tsunami status, e.g. "None" or "Warning".
    #[serde(default)]
    pub domestic_tsunami: Option<String>,
}

/// Hypocenter details. `-1` is the feed's "unknown" sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hypocenter {
    #[serde(default)]
    pub name: String,

    #[serde(default = "unknown_f64")]
    pub magnitude: f64,

    /// Depth in km; 0 means very shallow.
    #[serde(default = "unknown_f64")]
    pub depth: f64,
}

impl Default for Hypocenter {
    fn default() -> Self {
        Self {
            name: String::new(),
            magnitude: -1.0,
            depth: -1.0,
        }
    }
}

/// An observation point with its measured intensity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationPoint {
    /// Prefecture name.
    #[serde(default)]
    pub pref: String,

    /// Observation point address.
    #[serde(default)]
    pub addr: String,

    /// Intensity scale code.
    #[serde(default = "unknown_i32")]
    pub scale: i32,
}

/// Issue metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Issue {
    /// Report type, e.g. "ScalePrompt" or "DetailScale".
    #[serde(default, rename = "type")]
    pub kind: String,
}

/// Free-form comments attached to an earthquake report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comments {
    #[serde(default)]
    pub free_form_comment: String,
}

/// A tsunami forecast area.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsunamiArea {
    #[serde(default)]
    pub name: String,

    /// Severity grade, e.g. "MajorWarning".
    #[serde(default)]
    pub grade: Option<String>,

    #[serde(default)]
    pub max_height: Option<MaxHeight>,
}

/// Expected maximum wave height.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaxHeight {
    #[serde(default)]
    pub description: String,
}

fn unknown_i32() -> i32 {
    -1
}

fn unknown_f64() -> f64 {
    -1.0
}
