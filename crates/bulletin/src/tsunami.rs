//! Tsunami advisories.

use crate::event::{TsunamiAdvisory, TsunamiGrade};

/// Sentence posted when all tsunami advisories are lifted.
pub const TSUNAMI_CANCELLED: &str = "津波警報等は解除されました。";

fn header(grade: TsunamiGrade) -> &'static str {
    match grade {
        TsunamiGrade::MajorWarning => "[大津波警報🟪] 大津波警報発表！今すぐ避難！\n地域:",
        TsunamiGrade::Warning => "[津波警報🟥] 津波警報発表！高台へ避難！\n地域:",
        TsunamiGrade::Watch => "[津波注意報🟨] 津波注意報発表。海から離れて！\n地域:",
        TsunamiGrade::Unknown => "[津波情報❓] 津波状況不明。情報に注意。\n地域:",
        TsunamiGrade::Other => "[津波情報] 処理失敗。\n地域:",
    }
}

pub(crate) fn format_tsunami(advisory: &TsunamiAdvisory) -> String {
    if advisory.cancelled {
        return TSUNAMI_CANCELLED.to_string();
    }

    let grade = advisory.grade();
    let areas = advisory
        .areas
        .iter()
        .map(|area| format!("{}({})", area.name, area.max_height))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!("{}\n{}\n津波は1mでも危険！", header(grade), areas);
    if grade == TsunamiGrade::MajorWarning {
        out.push_str("\n⚠️絶対避難⚠️");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Area;

    fn area(name: &str, height: &str, grade: TsunamiGrade) -> Area {
        Area {
            name: name.to_string(),
            max_height: height.to_string(),
            grade,
        }
    }

    #[test]
    fn test_cancelled_ignores_areas() {
        let advisory = TsunamiAdvisory {
            cancelled: true,
            areas: vec![area("能登", "5m", TsunamiGrade::MajorWarning)],
        };
        assert_eq!(format_tsunami(&advisory), TSUNAMI_CANCELLED);
    }

    #[test]
    fn test_major_warning_adds_evacuation_line() {
        let advisory = TsunamiAdvisory {
            cancelled: false,
            areas: vec![
                area("能登", "５ｍ", TsunamiGrade::MajorWarning),
                area("新潟県上中下越", "３ｍ", TsunamiGrade::Warning),
            ],
        };
        assert_eq!(
            format_tsunami(&advisory),
            "[大津波警報🟪] 大津波警報発表！今すぐ避難！\n地域:\n能登(５ｍ), 新潟県上中下越(３ｍ)\n\
             津波は1mでも危険！\n⚠️絶対避難⚠️"
        );
    }

    #[test]
    fn test_header_follows_first_area_only() {
        let advisory = TsunamiAdvisory {
            cancelled: false,
            areas: vec![
                area("佐渡", "１ｍ", TsunamiGrade::Watch),
                area("能登", "５ｍ", TsunamiGrade::MajorWarning),
            ],
        };
        let text = format_tsunami(&advisory);
        assert!(text.starts_with("[津波注意報🟨]"));
        assert!(!text.contains("絶対避難"));
    }

    #[test]
    fn test_unrecognized_grade_falls_back() {
        let advisory = TsunamiAdvisory {
            cancelled: false,
            areas: vec![area("X", "?", TsunamiGrade::Other)],
        };
        assert!(format_tsunami(&advisory).starts_with("[津波情報] 処理失敗。"));

        let empty = TsunamiAdvisory {
            cancelled: false,
            areas: vec![],
        };
        assert!(format_tsunami(&empty).starts_with("[津波情報] 処理失敗。"));
    }
}
