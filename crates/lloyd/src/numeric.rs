/// Outcome of validating a single numeric literal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Number {
    Finite(f64),
    /// Parsed, but NaN or infinite (including overflow such as `1e999`).
    NonFinite,
    Unparseable,
}

impl Number {
    pub fn finite(self) -> Option<f64> {
        match self {
            Number::Finite(v) => Some(v),
            Number::NonFinite | Number::Unparseable => None,
        }
    }
}

/// Parse a float literal, ignoring surrounding whitespace.
pub fn parse_number(s: &str) -> Number {
    let s = s.trim();
    if s.is_empty() {
        return Number::Unparseable;
    }

    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Number::Finite(v),
        Ok(_) => Number::NonFinite,
        Err(_) => Number::Unparseable,
    }
}

/// Parse a literal that must denote a whole number, e.g. `3` or `3.0`.
///
/// Returns `None` for anything non-finite, fractional or negative.
pub fn parse_whole_number(s: &str) -> Option<u64> {
    let v = parse_number(s).finite()?;
    if v.fract() != 0.0 || v < 0.0 || v > u64::MAX as f64 {
        return None;
    }
    Some(v as u64)
}
