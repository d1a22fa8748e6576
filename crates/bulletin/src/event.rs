//! Normalized feed events.

use std::fmt;

use crate::scale::{Scale, UNKNOWN_LABEL};

/// An event decoded from one feed message, ready to render.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Seismic intensity / hypocenter report.
    EarthquakeIntensity(EarthquakeReport),
    /// Tsunami warning, watch or cancellation.
    TsunamiAdvisory(TsunamiAdvisory),
    /// One report of an earthquake early warning sequence.
    EarlyWarning(EarlyWarning),
}

/// Magnitude, with the feed's `-1` sentinel decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    Unknown,
    Value(f64),
}

impl Magnitude {
    /// Decode a raw magnitude; `-1` (and non-finite values) mean unknown.
    pub fn from_raw(raw: f64) -> Self {
        if raw == -1.0 || !raw.is_finite() {
            Self::Unknown
        } else {
            Self::Value(raw)
        }
    }
}

impl fmt::Display for Magnitude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
            Self::Value(m) => write!(f, "{:.1}", m),
        }
    }
}

/// Hypocenter depth, with the feed's `-1` and `0` sentinels decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Depth {
    Unknown,
    VeryShallow,
    Km(f64),
}

impl Depth {
    /// Decode a raw depth in km.
    pub fn from_raw(raw: f64) -> Self {
        if raw == -1.0 || !raw.is_finite() {
            Self::Unknown
        } else if raw == 0.0 {
            Self::VeryShallow
        } else {
            Self::Km(raw)
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => f.write_str(UNKNOWN_LABEL),
            Self::VeryShallow => f.write_str("ごく浅い"),
            Self::Km(km) => write!(f, "約{}km", km),
        }
    }
}

/// An observation point and its measured intensity code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationPoint {
    pub prefecture: String,
    pub address: String,
    pub scale: i32,
}

impl ObservationPoint {
    pub fn new(prefecture: impl Into<String>, address: impl Into<String>, scale: i32) -> Self {
        Self {
            prefecture: prefecture.into(),
            address: address.into(),
            scale,
        }
    }
}

/// Domestic tsunami status attached to an earthquake report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsunamiStatus {
    /// No tsunami expected ("None" on the wire).
    NoThreat,
    Unknown,
    Checking,
    NonEffective,
    Watch,
    Warning,
    /// Missing or unrecognized.
    Unavailable,
}

impl TsunamiStatus {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("None") => Self::NoThreat,
            Some("Unknown") => Self::Unknown,
            Some("Checking") => Self::Checking,
            Some("NonEffective") => Self::NonEffective,
            Some("Watch") => Self::Watch,
            Some("Warning") => Self::Warning,
            _ => Self::Unavailable,
        }
    }

    /// Status line shown in full earthquake reports.
    pub fn text(&self) -> &'static str {
        match self {
            Self::NoThreat => "津波の心配なし。",
            Self::Unknown => UNKNOWN_LABEL,
            Self::Checking => "津波調査中。情報に注意。",
            Self::NonEffective => "海面変動の可能性。被害の心配なし。",
            Self::Watch => "津波注意報発表中。",
            Self::Warning => "津波警報等発表中。",
            Self::Unavailable => "（津波情報なし）",
        }
    }
}

/// An earthquake intensity report.
#[derive(Debug, Clone, PartialEq)]
pub struct EarthquakeReport {
    /// Origin time as sent by the feed, e.g. "2024/01/01 16:10:00".
    pub time: String,
    pub hypocenter: String,
    pub magnitude: Magnitude,
    pub depth: Depth,
    pub max_scale: Scale,
    pub points: Vec<ObservationPoint>,
    /// Free-form remark; empty strings are treated as absent.
    pub comment: Option<String>,
    /// Preliminary intensity-only report (震度速報).
    pub scale_prompt: bool,
    pub tsunami: TsunamiStatus,
}

/// Severity grade of a tsunami forecast area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsunamiGrade {
    MajorWarning,
    Warning,
    Watch,
    Unknown,
    /// Missing or unrecognized grade.
    Other,
}

impl TsunamiGrade {
    pub fn from_wire(raw: Option<&str>) -> Self {
        match raw {
            Some("MajorWarning") => Self::MajorWarning,
            Some("Warning") => Self::Warning,
            Some("Watch") => Self::Watch,
            Some("Unknown") => Self::Unknown,
            _ => Self::Other,
        }
    }
}

/// A tsunami forecast area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    pub name: String,
    pub max_height: String,
    pub grade: TsunamiGrade,
}

/// A tsunami advisory covering one or more areas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TsunamiAdvisory {
    pub cancelled: bool,
    pub areas: Vec<Area>,
}

impl TsunamiAdvisory {
    /// Grade of the advisory, taken from its first area.
    pub fn grade(&self) -> TsunamiGrade {
        self.areas
            .first()
            .map(|area| area.grade)
            .unwrap_or(TsunamiGrade::Other)
    }
}

/// One early warning report.
#[derive(Debug, Clone, PartialEq)]
pub struct EarlyWarning {
    pub serial: u32,
    pub is_final: bool,
    pub is_cancelled: bool,
    /// Hypocenter assumed by a simplified method; accuracy may be low.
    pub is_assumption: bool,
    pub hypocenter: String,
    pub magnitude: Magnitude,
    pub depth: Depth,
    /// Estimated maximum intensity label, e.g. "5弱".
    pub max_intensity: String,
    /// Origin time as sent by the feed, e.g. "2024/01/01 16:10:09".
    pub origin_time: String,
}
