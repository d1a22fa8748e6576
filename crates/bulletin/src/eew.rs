//! Earthquake early warning reports.

use crate::event::EarlyWarning;
use crate::scale::UNKNOWN_LABEL;

/// Sentence posted when an early warning is withdrawn.
pub const EEW_CANCELLED: &str = "緊急地震速報は取り消されました。";

pub(crate) fn format_early_warning(warning: &EarlyWarning) -> String {
    if warning.is_cancelled {
        return EEW_CANCELLED.to_string();
    }

    let intensity = if warning.max_intensity.trim().is_empty() {
        UNKNOWN_LABEL
    } else {
        warning.max_intensity.trim()
    };

    let mut out = format!(
        "[緊急地震速報 第{}報]\n最大予測震度:{}\n{}頃発生\n震源:{}\nM{} 深さ:{}",
        warning.serial,
        intensity,
        origin_time(&warning.origin_time),
        warning.hypocenter,
        warning.magnitude,
        warning.depth,
    );
    if warning.is_assumption {
        out.push_str("\n※仮定震源要素のため精度が低い可能性あり");
    }
    if warning.is_final {
        out.push_str("\n[最終報]");
    }
    out
}

/// Drop the year from "YYYY/MM/DD HH:MM:SS"; other layouts pass through.
fn origin_time(raw: &str) -> &str {
    let raw = raw.trim();
    match raw.char_indices().nth(5) {
        Some((idx, _)) if raw.len() >= 19 && raw.as_bytes()[4] == b'/' => &raw[idx..],
        _ => raw,
    }
}
