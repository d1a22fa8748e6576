//! Feed event model and bulletin rendering.
//!
//! Everything in this crate is pure: a [`FeedEvent`] goes in, a trimmed
//! [`Bulletin`] comes out, and the same event always renders to the same
//! text. Length limits are not applied here; the publisher truncates right
//! before posting.
//!
//! # Example
//!
//! ```rust
//! use bulletin::{render, FeedEvent, TsunamiAdvisory};
//!
//! let event = FeedEvent::TsunamiAdvisory(TsunamiAdvisory {
//!     cancelled: true,
//!     areas: vec![],
//! });
//! assert_eq!(render(&event).as_str(), "津波警報等は解除されました。");
//! ```

mod address;
mod earthquake;
mod eew;
mod event;
mod scale;
mod tsunami;

use std::fmt;

pub use address::municipality;
pub use eew::EEW_CANCELLED;
pub use event::{
    Area, Depth, EarlyWarning, EarthquakeReport, FeedEvent, Magnitude, ObservationPoint,
    TsunamiAdvisory, TsunamiGrade, TsunamiStatus,
};
pub use scale::{label_of, Scale, UNKNOWN_LABEL};
pub use tsunami::TSUNAMI_CANCELLED;

/// Human-readable text ready for posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bulletin(String);

impl Bulletin {
    /// Wrap text, trimming leading and trailing whitespace.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Length in Unicode scalar values.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for Bulletin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Bulletin {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Render an event into a bulletin.
pub fn render(event: &FeedEvent) -> Bulletin {
    let text = match event {
        FeedEvent::EarthquakeIntensity(report) => earthquake::format_earthquake(report),
        FeedEvent::TsunamiAdvisory(advisory) => tsunami::format_tsunami(advisory),
        FeedEvent::EarlyWarning(warning) => eew::format_early_warning(warning),
    };
    Bulletin::new(text)
}

impl FeedEvent {
    /// Render this event; see [`render`].
    pub fn render(&self) -> Bulletin {
        render(self)
    }
}

/// Crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
