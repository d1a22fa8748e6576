//! JMA seismic intensity scale codes.

/// Label rendered for unmapped codes and unknown values.
pub const UNKNOWN_LABEL: &str = "不明";

/// A seismic intensity on the JMA scale.
///
/// The set of codes is closed; anything outside it becomes [`Scale::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scale {
    One,
    Two,
    Three,
    Four,
    FiveLower,
    FiveUpper,
    SixLower,
    SixUpper,
    Seven,
    Unknown,
}

impl Scale {
    /// Map a feed scale code (10, 20, ..., 70) to an intensity.
    pub fn from_code(code: i32) -> Self {
        match code {
            10 => Self::One,
            20 => Self::Two,
            30 => Self::Three,
            40 => Self::Four,
            45 => Self::FiveLower,
            50 => Self::FiveUpper,
            55 => Self::SixLower,
            60 => Self::SixUpper,
            70 => Self::Seven,
            _ => Self::Unknown,
        }
    }

    /// The feed scale code, or `None` for [`Scale::Unknown`].
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::One => Some(10),
            Self::Two => Some(20),
            Self::Three => Some(30),
            Self::Four => Some(40),
            Self::FiveLower => Some(45),
            Self::FiveUpper => Some(50),
            Self::SixLower => Some(55),
            Self::SixUpper => Some(60),
            Self::Seven => Some(70),
            Self::Unknown => None,
        }
    }

    /// Display label, e.g. "5弱".
    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::FiveLower => "5弱",
            Self::FiveUpper => "5強",
            Self::SixLower => "6弱",
            Self::SixUpper => "6強",
            Self::Seven => "7",
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    /// Position in the severity ranking used by full reports (0 = strongest).
    pub(crate) fn severity_rank(&self) -> u8 {
        match self {
            Self::Seven => 0,
            Self::SixUpper => 1,
            Self::SixLower => 2,
            Self::FiveUpper => 3,
            Self::FiveLower => 4,
            Self::Four => 5,
            Self::Three => 6,
            Self::Two => 7,
            Self::One => 8,
            Self::Unknown => 9,
        }
    }
}

/// Display label for a raw scale code.
pub fn label_of(code: i32) -> &'static str {
    Scale::from_code(code).label()
}
