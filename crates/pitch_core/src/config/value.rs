//! Fixed-or-random field values.
//!
//! ```text
//! Speed=148            fixed
//! Speed=RAND[140:152]  uniform in [140, 152] at every (re)build
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LineError, ResolveError};

const RAND_MARKER: &str = "RAND[";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Fixed(f64),
    /// Both bounds are always present when produced by the parser
    Random { min: Option<f64>, max: Option<f64> },
}

impl FieldValue {
    pub fn range(min: f64, max: f64) -> Self {
        FieldValue::Random {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn is_random(&self) -> bool {
        matches!(self, FieldValue::Random { .. })
    }

    /// Value shown before resolution: the fixed value or the range midpoint.
    pub fn nominal(&self) -> Option<f64> {
        match *self {
            FieldValue::Fixed(v) => Some(v),
            FieldValue::Random {
                min: Some(lo),
                max: Some(hi),
            } => Some(0.5 * (lo + hi)),
            FieldValue::Random { .. } => None,
        }
    }

    /// Sample a concrete value; bounds may be given in either order.
    pub fn resolve<R: Rng>(
        &self,
        field: &'static str,
        rng: &mut R,
    ) -> Result<f64, ResolveError> {
        match *self {
            FieldValue::Fixed(v) => Ok(v),
            FieldValue::Random {
                min: Some(a),
                max: Some(b),
            } => {
                let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
                if lo == hi {
                    Ok(lo)
                } else {
                    Ok(rng.gen_range(lo..=hi))
                }
            }
            FieldValue::Random { .. } => Err(ResolveError::MissingRange { field }),
        }
    }

    /// Parse a literal or a `RAND[min:max]` marker.
    pub fn parse(key: &str, raw: &str) -> Result<Self, LineError> {
        let text = raw.trim();
        if starts_with_ignore_case(text, RAND_MARKER) {
            return parse_range(key, text);
        }
        parse_number(text)
            .map(FieldValue::Fixed)
            .ok_or_else(|| LineError::MalformedNumber {
                key: key.to_string(),
                value: text.to_string(),
            })
    }
}

fn parse_range(key: &str, text: &str) -> Result<FieldValue, LineError> {
    let malformed = || LineError::MalformedRange {
        key: key.to_string(),
        value: text.to_string(),
    };

    let inner = text[RAND_MARKER.len()..]
        .strip_suffix(']')
        .ok_or_else(malformed)?;

    let mut parts = inner.split(':');
    let (min, max) = match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => (a, b),
        _ => return Err(malformed()),
    };

    let min = parse_number(min).ok_or_else(malformed)?;
    let max = parse_number(max).ok_or_else(malformed)?;
    Ok(FieldValue::range(min, max))
}

/// Finite decimal number; `nan` and `inf` are rejected.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}
