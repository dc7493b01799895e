// ── Lenient numbers ──
//
// Quantities and amounts arrive as JSON numbers from most endpoints and as
// decimal strings ("1500000.00") from the ones backed by DECIMAL columns.
// Null and blank strings count as absent.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
}

fn parse<E: serde::de::Error>(raw: Option<Raw>) -> Result<Option<f64>, E> {
    match raw {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid number: {text:?}")))
        }
    }
}

/// Number or numeric string; absent values read as zero.
pub(crate) fn or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(parse(Option::<Raw>::deserialize(deserializer)?)?.unwrap_or_default())
}

/// Number or numeric string; absent values stay `None`.
pub(crate) fn optional<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    parse(Option::<Raw>::deserialize(deserializer)?)
}
