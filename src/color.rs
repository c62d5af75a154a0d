//! Color primitives shared by region growing and color keying
//!
//! Both entry points compare colors with the same Euclidean RGB distance and
//! the same inclusive threshold, so a tolerance value selects identical
//! colors whether it is used spatially or globally.

use crate::error::{Result, WandError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest possible distance between two 8-bit RGB colors (`255 * sqrt(3)`)
pub const MAX_COLOR_DISTANCE: f64 = 441.672_955_930_063_7;

/// An RGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Read the RGB part of an RGBA pixel, ignoring alpha
    #[must_use]
    pub fn from_rgba(pixel: [u8; 4]) -> Self {
        Self::new(pixel[0], pixel[1], pixel[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = WandError;

    /// Parse `#rrggbb` or `rrggbb`
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(WandError::invalid_config(format!(
                "Color '{}' must be 6 hex digits (e.g. #ff00ff)",
                s
            )));
        }

        let channel = |range: std::ops::Range<usize>| {
            hex.get(range)
                .and_then(|digits| u8::from_str_radix(digits, 16).ok())
                .ok_or_else(|| {
                    WandError::invalid_config(format!("Color '{}' contains non-hex digits", s))
                })
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Euclidean distance between two colors in RGB space
///
/// Ranges from 0.0 for identical colors to [`MAX_COLOR_DISTANCE`].
#[inline]
#[must_use]
pub fn color_distance(p: Rgb, q: Rgb) -> f64 {
    let dr = f64::from(p.r) - f64::from(q.r);
    let dg = f64::from(p.g) - f64::from(q.g);
    let db = f64::from(p.b) - f64::from(q.b);

    (dr * dr + dg * dg + db * db).sqrt()
}

/// Maximum color distance that still counts as a match
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Tolerance(f64);

impl Tolerance {
    /// Exact color match only
    pub const EXACT: Self = Self(0.0);

    /// Default for both removal modes
    pub const DEFAULT: Self = Self(32.0);

    /// Validate and wrap a tolerance value
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(WandError::config_value_error(
                "tolerance",
                value,
                ">= 0 and finite",
                None,
            ));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Inclusive match test: `distance <= tolerance`
    #[inline]
    #[must_use]
    pub fn matches(self, distance: f64) -> bool {
        distance <= self.0
    }

    /// Distance from `reference` to `candidate` is within this tolerance
    #[inline]
    #[must_use]
    pub fn accepts(self, reference: Rgb, candidate: Rgb) -> bool {
        self.matches(color_distance(reference, candidate))
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = WandError;

    fn try_from(value: f64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Tolerance> for f64 {
    fn from(tolerance: Tolerance) -> Self {
        tolerance.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
