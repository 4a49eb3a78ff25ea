// crates/core/src/moving_average.rs
//! Trailing simple moving average over per-word scores.
//!
//! Output index `i` (for `i >= W`) is the mean of `scores[i-W..i]`: the `W`
//! scores *before* `i`, never including `i` itself. Indices below `W` are
//! the warm-up region and are filled according to a [`WarmupPolicy`].
//!
//! The running sum is kept in `i64`, so each value is computed from an exact
//! integer sum with a single division and the whole pass is O(N).

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::InvalidWindowError;

/// Number of preceding words averaged at each position. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Window(usize);

impl Window {
    pub fn new(window: i64) -> Result<Self, InvalidWindowError> {
        match usize::try_from(window) {
            Ok(w) if w > 0 => Ok(Self(w)),
            _ => Err(InvalidWindowError { window }),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Window {
    type Error = InvalidWindowError;

    fn try_from(window: i64) -> Result<Self, Self::Error> {
        Self::new(window)
    }
}

/// Value emitted before the window has filled up.
///
/// `Zero` is the default and matches the classic behaviour of this tool, but
/// a zero there cannot be told apart from a genuinely neutral stretch of
/// text. `Nan` marks those positions as undefined instead (charts leave
/// them blank). `Partial` averages whatever scores precede the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarmupPolicy {
    #[default]
    Zero,
    Nan,
    Partial,
}

impl WarmupPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::Nan => "nan",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for WarmupPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarmupPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zero" => Ok(Self::Zero),
            "nan" => Ok(Self::Nan),
            "partial" => Ok(Self::Partial),
            other => Err(format!(
                "unknown warm-up policy `{other}` (expected zero, nan or partial)"
            )),
        }
    }
}

/// Moving average with the default zero warm-up.
pub fn moving_average(scores: &[i32], window: Window) -> Vec<f64> {
    moving_average_with(scores, window, WarmupPolicy::Zero)
}

/// Moving average of `scores`, same length as `scores`.
///
/// When `window >= scores.len()` every position is warm-up.
pub fn moving_average_with(scores: &[i32], window: Window, policy: WarmupPolicy) -> Vec<f64> {
    let w = window.get();
    let mut averages = Vec::with_capacity(scores.len());
    // Sum of scores[max(0, i - w)..i] at the top of each iteration.
    let mut sum: i64 = 0;

    for (i, &score) in scores.iter().enumerate() {
        if i < w {
            averages.push(match policy {
                WarmupPolicy::Zero => 0.0,
                WarmupPolicy::Nan => f64::NAN,
                WarmupPolicy::Partial if i == 0 => 0.0,
                WarmupPolicy::Partial => sum as f64 / i as f64,
            });
        } else {
            averages.push(sum as f64 / w as f64);
            sum -= i64::from(scores[i - w]);
        }
        sum += i64::from(score);
    }

    averages
}
