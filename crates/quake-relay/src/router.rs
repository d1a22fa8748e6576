//! Per-feed classification: decide which messages become bulletins.

use bulletin::{
    Area, Bulletin, Depth, EarlyWarning, EarthquakeReport, FeedEvent, Magnitude,
    ObservationPoint, Scale, TsunamiAdvisory, TsunamiGrade, TsunamiStatus,
};
use quake_feed::{Earthquake, EewMessage, P2pQuakeMessage, CODE_EARTHQUAKE, CODE_TSUNAMI};
use thiserror::Error;

/// Issue type of preliminary intensity-only reports.
const SCALE_PROMPT: &str = "ScalePrompt";

/// Outcome of routing one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Post this bulletin.
    Publish(Bulletin),
    /// Nothing to post.
    Ignore { reason: String },
}

impl RouteDecision {
    fn publish(event: FeedEvent) -> Self {
        Self::Publish(event.render())
    }

    fn ignore(reason: impl Into<String>) -> Self {
        Self::Ignore {
            reason: reason.into(),
        }
    }

    /// The bulletin, if this decision publishes.
    pub fn bulletin(&self) -> Option<&Bulletin> {
        match self {
            Self::Publish(bulletin) => Some(bulletin),
            Self::Ignore { .. } => None,
        }
    }
}

/// A message that claims a kind but lacks what that kind requires.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("code {0} message without earthquake data")]
    MissingEarthquake(i32),

    #[error("early warning without a serial number")]
    MissingSerial,
}

/// Classifies a decoded feed message and renders what deserves a bulletin.
pub trait Route {
    fn route(&self) -> Result<RouteDecision, RouteError>;
}

impl Route for P2pQuakeMessage {
    fn route(&self) -> Result<RouteDecision, RouteError> {
        match self.code {
            CODE_EARTHQUAKE => {
                let earthquake = self
                    .earthquake
                    .as_ref()
                    .ok_or(RouteError::MissingEarthquake(self.code))?;
                Ok(RouteDecision::publish(FeedEvent::EarthquakeIntensity(
                    earthquake_report(self, earthquake),
                )))
            }
            CODE_TSUNAMI => Ok(RouteDecision::publish(FeedEvent::TsunamiAdvisory(
                tsunami_advisory(self),
            ))),
            code => Ok(RouteDecision::ignore(format!("unhandled code {}", code))),
        }
    }
}

impl Route for EewMessage {
    fn route(&self) -> Result<RouteDecision, RouteError> {
        if !self.is_warning() {
            return Ok(RouteDecision::ignore("not an early warning"));
        }

        let serial = self.serial_number();
        if !self.is_cancel && !self.is_final && serial != Some(1) {
            return match serial {
                Some(n) => Ok(RouteDecision::ignore(format!("intermediate report #{}", n))),
                None => Err(RouteError::MissingSerial),
            };
        }

        Ok(RouteDecision::publish(FeedEvent::EarlyWarning(early_warning(self))))
    }
}

fn earthquake_report(message: &P2pQuakeMessage, earthquake: &Earthquake) -> EarthquakeReport {
    EarthquakeReport {
        time: earthquake.time.clone(),
        hypocenter: earthquake.hypocenter.name.clone(),
        magnitude: Magnitude::from_raw(earthquake.hypocenter.magnitude),
        depth: Depth::from_raw(earthquake.hypocenter.depth),
        max_scale: Scale::from_code(earthquake.max_scale),
        points: message
            .points
            .iter()
            .map(|p| ObservationPoint::new(&p.pref, &p.addr, p.scale))
            .collect(),
        comment: message
            .comments
            .as_ref()
            .map(|c| c.free_form_comment.clone())
            .filter(|c| !c.is_empty()),
        scale_prompt: message
            .issue
            .as_ref()
            .is_some_and(|issue| issue.kind == SCALE_PROMPT),
        tsunami: TsunamiStatus::from_wire(earthquake.domestic_tsunami.as_deref()),
    }
}

fn tsunami_advisory(message: &P2pQuakeMessage) -> TsunamiAdvisory {
    TsunamiAdvisory {
        cancelled: message.cancelled,
        areas: message
            .areas
            .iter()
            .map(|a| Area {
                name: a.name.clone(),
                max_height: a
                    .max_height
                    .as_ref()
                    .map(|h| h.description.clone())
                    .unwrap_or_default(),
                grade: TsunamiGrade::from_wire(a.grade.as_deref()),
            })
            .collect(),
    }
}

fn early_warning(message: &EewMessage) -> EarlyWarning {
    EarlyWarning {
        serial: message.serial_number().unwrap_or_default(),
        is_final: message.is_final,
        is_cancelled: message.is_cancel,
        is_assumption: message.is_assumption,
        hypocenter: message.hypocenter.clone().unwrap_or_default(),
        magnitude: message.magnitude.map(Magnitude::from_raw).unwrap_or(Magnitude::Unknown),
        depth: message.depth.map(Depth::from_raw).unwrap_or(Depth::Unknown),
        max_intensity: message.max_intensity.clone().unwrap_or_default(),
        origin_time: message.origin_time.clone().unwrap_or_default(),
    }
}
