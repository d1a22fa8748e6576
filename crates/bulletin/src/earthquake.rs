//! Earthquake intensity reports.

use chrono::NaiveDateTime;
use indexmap::{IndexMap, IndexSet};

use crate::address::municipality;
use crate::event::{EarthquakeReport, ObservationPoint};
use crate::scale::Scale;

/// Timestamp layouts sent by the feed.
const TIME_FORMATS: [&str; 2] = ["%Y/%m/%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"];

/// Addresses grouped by prefecture, in first-seen order.
type ByPrefecture = IndexMap<String, Vec<String>>;

/// Render an earthquake report.
pub(crate) fn format_earthquake(report: &EarthquakeReport) -> String {
    if report.scale_prompt {
        format_scale_prompt(report)
    } else {
        format_full(report)
    }
}

/// Preliminary intensity report (震度速報): raw addresses, strongest code first.
fn format_scale_prompt(report: &EarthquakeReport) -> String {
    let mut groups: Vec<(Scale, ByPrefecture)> = group_by_scale(&report.points).into_iter().collect();
    groups.sort_by_key(|(scale, _)| std::cmp::Reverse(scale.code()));

    let mut out = format!("[震度速報] {}頃\n震度3以上地域:\n", clock_time(&report.time));
    for (scale, prefectures) in &groups {
        out.push_str(&format!("震度{}: ", scale.label()));
        for (pref, addresses) in prefectures {
            out.push_str(&format!("{}({}) ", pref, addresses.join(", ")));
        }
        out.push('\n');
    }
    out
}

/// Full report: summary lines then municipalities ordered by severity.
fn format_full(report: &EarthquakeReport) -> String {
    let mut groups: Vec<(Scale, ByPrefecture)> = group_by_scale(&report.points).into_iter().collect();
    groups.sort_by_key(|(scale, _)| scale.severity_rank());

    let mut out = format!(
        "{}\n震源:{}\n最大震度:{}\nM{} 深さ:{}\n{}\n[各地の震度]",
        clock_time(&report.time),
        report.hypocenter,
        report.max_scale.label(),
        report.magnitude,
        report.depth,
        report.tsunami.text(),
    );
    for (scale, prefectures) in &groups {
        out.push_str(&format!("\n震度{}: ", scale.label()));
        for (pref, addresses) in prefectures {
            let cities: IndexSet<&str> = addresses
                .iter()
                .map(|addr| municipality(addr).unwrap_or(addr))
                .collect();
            let cities: Vec<&str> = cities.into_iter().collect();
            out.push_str(&format!("{}({}) ", pref, cities.join(", ")));
        }
    }

    if let Some(comment) = report.comment.as_deref().filter(|c| !c.is_empty()) {
        out.push_str(&format!("\n情報: {}", comment));
    }
    out
}

fn group_by_scale(points: &[ObservationPoint]) -> IndexMap<Scale, ByPrefecture> {
    let mut groups: IndexMap<Scale, ByPrefecture> = IndexMap::new();
    for point in points {
        groups
            .entry(Scale::from_code(point.scale))
            .or_default()
            .entry(point.prefecture.clone())
            .or_default()
            .push(point.address.clone());
    }
    groups
}

/// "MM/DD HH:MM" in the feed's own civil time; unparseable input is kept
/// verbatim.
pub(crate) fn clock_time(raw: &str) -> String {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|t| t.format("%m/%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}
