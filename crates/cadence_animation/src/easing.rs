//! Easing functions for animations
//!
//! Penner-style equations parameterized by absolute time:
//!
//! - `t`: elapsed time since the animation started
//! - `b`: base (starting) value
//! - `c`: total change in value (`to - from`)
//! - `d`: total duration
//!
//! Every curve satisfies `f(0, b, c, d) == b` and `f(d, b, c, d) == b + c`.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use cadence_core::CadenceError;
use serde::Deserialize;

/// Signature shared by every easing curve
pub type EasingFn = fn(f64, f64, f64, f64) -> f64;

pub fn linear(t: f64, b: f64, c: f64, d: f64) -> f64 {
    b + c * (t / d)
}

/// Quadratic ease-in
pub fn ease_in(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    b + c * p * p
}

/// Quadratic ease-out
pub fn ease_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    b + c * p * (2.0 - p)
}

/// Quadratic ease-in-out
pub fn ease_in_out(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    if p < 0.5 {
        b + 2.0 * c * p * p
    } else {
        let q = 1.0 - p;
        b + c - 2.0 * c * q * q
    }
}

pub fn in_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    b + c * p * p * p
}

pub fn out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d - 1.0;
    b + c * (p * p * p + 1.0)
}

pub fn in_out_cubic(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    if p < 0.5 {
        b + 4.0 * c * p * p * p
    } else {
        let q = 1.0 - p;
        b + c - 4.0 * c * q * q * q
    }
}

pub fn in_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    b + c * (1.0 - (t / d * FRAC_PI_2).cos())
}

pub fn out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    b + c * (t / d * FRAC_PI_2).sin()
}

pub fn in_out_sine(t: f64, b: f64, c: f64, d: f64) -> f64 {
    b + c / 2.0 * (1.0 - (t / d * PI).cos())
}

pub fn in_circular(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d;
    b + c * (1.0 - (1.0 - p * p).sqrt())
}

pub fn out_circular(t: f64, b: f64, c: f64, d: f64) -> f64 {
    let p = t / d - 1.0;
    b + c * (1.0 - p * p).sqrt()
}

pub fn in_out_circular(t: f64, b: f64, c: f64, d: f64) -> f64 {
    // Work in half-durations: s runs 0..2 over the animation
    let s = 2.0 * t / d;
    if s < 1.0 {
        b + c / 2.0 * (1.0 - (1.0 - s * s).sqrt())
    } else {
        let r = s - 2.0;
        b + c / 2.0 * ((1.0 - r * r).sqrt() + 1.0)
    }
}

/// Easing function type
#[derive(Clone, Copy, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Easing {
    #[default]
    Linear,
    In,
    Out,
    InOut,
    InCubic,
    OutCubic,
    InOutCubic,
    InSine,
    OutSine,
    InOutSine,
    InCircular,
    OutCircular,
    InOutCircular,
    /// A caller-supplied curve with the same `(t, b, c, d)` contract
    Custom(EasingFn),
}

impl Easing {
    /// Every named curve
    pub const ALL: [Easing; 13] = [
        Easing::Linear,
        Easing::In,
        Easing::Out,
        Easing::InOut,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InCircular,
        Easing::OutCircular,
        Easing::InOutCircular,
    ];

    /// Evaluate the curve at elapsed time `t`
    #[inline]
    pub fn apply(&self, t: f64, b: f64, c: f64, d: f64) -> f64 {
        (self.function())(t, b, c, d)
    }

    /// The plain function behind this curve
    pub fn function(&self) -> EasingFn {
        match self {
            Easing::Linear => linear,
            Easing::In => ease_in,
            Easing::Out => ease_out,
            Easing::InOut => ease_in_out,
            Easing::InCubic => in_cubic,
            Easing::OutCubic => out_cubic,
            Easing::InOutCubic => in_out_cubic,
            Easing::InSine => in_sine,
            Easing::OutSine => out_sine,
            Easing::InOutSine => in_out_sine,
            Easing::InCircular => in_circular,
            Easing::OutCircular => out_circular,
            Easing::InOutCircular => in_out_circular,
            Easing::Custom(f) => *f,
        }
    }

    /// Canonical name, as accepted by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Easing::Linear => "linear",
            Easing::In => "in",
            Easing::Out => "out",
            Easing::InOut => "inOut",
            Easing::InCubic => "inCubic",
            Easing::OutCubic => "outCubic",
            Easing::InOutCubic => "inOutCubic",
            Easing::InSine => "inSine",
            Easing::OutSine => "outSine",
            Easing::InOutSine => "inOutSine",
            Easing::InCircular => "inCircular",
            Easing::OutCircular => "outCircular",
            Easing::InOutCircular => "inOutCircular",
            Easing::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Easing({})", self.name())
    }
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Easing {
    type Err = CadenceError;

    /// Accepts the canonical camelCase names as well as snake_case and
    /// kebab-case spellings (`in_out_cubic`, `ease-in-out`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        let normalized = normalized.strip_prefix("ease").unwrap_or(&normalized);

        Easing::ALL
            .into_iter()
            .find(|easing| easing.name().to_lowercase() == normalized)
            .ok_or_else(|| CadenceError::UnknownEasing(s.to_string()))
    }
}

impl TryFrom<String> for Easing {
    type Error = CadenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<EasingFn> for Easing {
    fn from(f: EasingFn) -> Self {
        Easing::Custom(f)
    }
}
