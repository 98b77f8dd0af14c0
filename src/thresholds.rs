//! Threshold range expressions for warning and critical levels
//!
//! A threshold is given on the command line as one of `N`, `N:`, `:M` or
//! `N:M`. Whether a value breaches it depends on the alert direction of the
//! check: capacity checks alert when the value drops *below* the range,
//! load checks alert when it rises *above* it.

use std::fmt;

use anyhow::{Context, Result, bail};

/// Direction in which a check alerts against its thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertDirection {
    /// Alert when the value falls below the range (capacity floor).
    Below,
    /// Alert when the value rises above the range (load ceiling).
    Above,
}

/// A parsed threshold expression.
///
/// The original expression text is kept verbatim so it can be echoed into
/// the performance data unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Threshold {
    text: String,
    lower: Option<f64>,
    upper: Option<f64>,
}

impl Threshold {
    /// Parse a threshold expression. Usable as a clap value parser.
    pub fn parse(expression: &str) -> Result<Threshold> {
        let text = expression.trim();
        if text.is_empty() {
            bail!("threshold expression must not be empty");
        }

        let (lower, upper) = match text.split_once(':') {
            // "N:M", "N:" or ":M"
            Some((start, end)) => (parse_bound(start)?, parse_bound(end)?),
            // a bare "N" bounds the value on both sides
            None => {
                let bound = parse_bound(text)?;
                (bound, bound)
            }
        };

        if lower.is_none() && upper.is_none() {
            bail!("threshold expression `{text}` has no bounds");
        }

        Ok(Threshold {
            text: text.to_string(),
            lower,
            upper,
        })
    }

    /// True iff a lower bound exists and the value is below it.
    pub fn is_below(&self, value: f64) -> bool {
        self.lower.is_some_and(|lower| value < lower)
    }

    /// True iff an upper bound exists and the value is above it.
    pub fn is_above(&self, value: f64) -> bool {
        self.upper.is_some_and(|upper| value > upper)
    }

    /// Direction-aware breach predicate.
    pub fn alerts(&self, direction: AlertDirection, value: f64) -> bool {
        match direction {
            AlertDirection::Below => self.is_below(value),
            AlertDirection::Above => self.is_above(value),
        }
    }
}

fn parse_bound(raw: &str) -> Result<Option<f64>> {
    if raw.is_empty() {
        return Ok(None);
    }
    let bound = raw
        .parse::<f64>()
        .with_context(|| format!("`{raw}` is not a numeric threshold bound"))?;
    Ok(Some(bound))
}

impl fmt::Display for Threshold {
    /// Renders the expression exactly as it was given on the command line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}
