//! Resampling filters offered for scaled placements.

use std::fmt;
use std::str::FromStr;

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned when a filter name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown resampling filter '{0}' (expected one of: lanczos3, catmull-rom, gaussian, triangle)")]
pub struct ParseFilterError(pub String);

/// Filter used when a placement scales the source image.
///
/// Nearest-neighbour is deliberately absent: wallpapers are scaled by large
/// factors and it aliases visibly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    /// Lanczos with window 3. Sharpest, slowest.
    #[default]
    Lanczos3,
    /// Bicubic Catmull-Rom spline.
    CatmullRom,
    Gaussian,
    /// Bilinear.
    Triangle,
}

impl ResampleFilter {
    /// The `image` crate filter this maps to.
    pub fn filter_type(self) -> FilterType {
        match self {
            Self::Lanczos3 => FilterType::Lanczos3,
            Self::CatmullRom => FilterType::CatmullRom,
            Self::Gaussian => FilterType::Gaussian,
            Self::Triangle => FilterType::Triangle,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Lanczos3 => "lanczos3",
            Self::CatmullRom => "catmull-rom",
            Self::Gaussian => "gaussian",
            Self::Triangle => "triangle",
        }
    }
}

impl fmt::Display for ResampleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResampleFilter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            _ => Err(ParseFilterError(s.to_string())),
        }
    }
}
