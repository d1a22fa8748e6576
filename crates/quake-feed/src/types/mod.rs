//! Wire types of the supported upstream feeds.

mod eew;
mod p2pquake;

pub use eew::EewMessage;
pub use p2pquake::{
    Comments, Earthquake, Hypocenter, Issue, MaxHeight, ObservationPoint, P2pQuakeMessage,
    TsunamiArea, CODE_EARTHQUAKE, CODE_TSUNAMI,
};

use serde::{Deserialize, Deserializer};

/// A JSON scalar that some feeds send either as a number or as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(f64),
    Bool(bool),
    Text(String),
}

/// Deserialize an optional number that may arrive as a numeric string.
///
/// Unparseable values decode as `None` instead of failing the whole frame.
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value {
        Scalar::Number(n) => Some(n),
        Scalar::Text(s) => s.trim().parse().ok(),
        Scalar::Bool(_) => None,
    }))
}

/// Deserialize an optional string that may arrive as a number.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Scalar>::deserialize(deserializer)?;
    Ok(raw.map(|value| match value {
        Scalar::Number(n) if n.fract() == 0.0 => format!("{}", n as i64),
        Scalar::Number(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
        Scalar::Text(s) => s,
    }))
}
