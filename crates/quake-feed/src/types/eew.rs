//! JMA Earthquake Early Warning messages (Wolfx-style JSON).

use serde::{Deserialize, Serialize};

use super::{lenient_f64, lenient_string};

/// An early warning report.
///
/// Frames without `Title` and `CodeType` (heartbeats, pongs) decode with
/// those fields empty; see [`EewMessage::is_warning`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EewMessage {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,

    #[serde(rename = "CodeType", default)]
    pub code_type: Option<String>,

    /// Report serial number within one warning, starting at 1.
    #[serde(rename = "Serial", default, deserialize_with = "lenient_f64")]
    pub serial: Option<f64>,

    #[serde(rename = "isFinal", default)]
    pub is_final: bool,

    #[serde(rename = "isCancel", default)]
    pub is_cancel: bool,

    /// Hypocenter assumed by a simplified method (PLUM etc.).
    #[serde(rename = "isAssumption", default)]
    pub is_assumption: bool,

    /// Estimated maximum intensity label, e.g. "5弱".
    #[serde(rename = "MaxIntensity", default, deserialize_with = "lenient_string")]
    pub max_intensity: Option<String>,

    /// Origin time, e.g. "2024/01/01 16:10:09".
    #[serde(rename = "OriginTime", default)]
    pub origin_time: Option<String>,

    #[serde(rename = "Hypocenter", default)]
    pub hypocenter: Option<String>,

    /// Magnitude. The upstream key is misspelled.
    #[serde(rename = "Magunitude", default, deserialize_with = "lenient_f64")]
    pub magnitude: Option<f64>,

    #[serde(rename = "Depth", default, deserialize_with = "lenient_f64")]
    pub depth: Option<f64>,
}

impl EewMessage {
    /// Whether the frame carries the early-warning discriminator fields.
    pub fn is_warning(&self) -> bool {
        self.title.is_some() && self.code_type.is_some()
    }

    /// Serial number as an integer, if present and non-negative.
    pub fn serial_number(&self) -> Option<u32> {
        self.serial
            .filter(|s| s.is_finite() && *s >= 0.0)
            .map(|s| s as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_warning() {
        let raw = r#"{
            "Title": "緊急地震速報（予報）",
            "CodeType": "M、最大予測震度及び主要動到達予測時刻の緊急地震速報",
            "Serial": 3,
            "isFinal": false,
            "isCancel": false,
            "isAssumption": false,
            "MaxIntensity": "5弱",
            "OriginTime": "2024/01/01 16:10:09",
            "Hypocenter": "石川県能登地方",
            "Magunitude": 5.9,
            "Depth": 10
        }"#;
        let msg: EewMessage = serde_json::from_str(raw).unwrap();
        assert!(msg.is_warning());
        assert_eq!(msg.serial_number(), Some(3));
        assert_eq!(msg.max_intensity.as_deref(), Some("5弱"));
        assert_eq!(msg.magnitude, Some(5.9));
        assert_eq!(msg.depth, Some(10.0));
    }

    #[test]
    fn test_decode_numeric_strings() {
        let raw = r#"{"Title": "t", "CodeType": "c", "Serial": "12", "MaxIntensity": 4,
                      "Magunitude": "4.2", "Depth": "abc"}"#;
        let msg: EewMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.serial_number(), Some(12));
        assert_eq!(msg.max_intensity.as_deref(), Some("4"));
        assert_eq!(msg.magnitude, Some(4.2));
        assert_eq!(msg.depth, None);
    }

    #[test]
    fn test_heartbeat_is_not_warning() {
        let raw = r#"{"type": "heartbeat", "ver": "1.0"}"#;
        let msg: EewMessage = serde_json::from_str(raw).unwrap();
        assert!(!msg.is_warning());
        assert_eq!(msg.serial_number(), None);
    }
}
