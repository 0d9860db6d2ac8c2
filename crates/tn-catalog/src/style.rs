//! Per-feature style resolution.
//!
//! The renderer calls the resolver for every feature on every redraw, so
//! [`resolve_style`] is a pure function of `(feature, highlighted name,
//! palette)`.

use std::fmt;
use std::str::FromStr;

use crate::feature::TrailFeature;
use crate::highlight::HighlightState;
use crate::CatalogError;

// ── Color ─────────────────────────────────────────────────────────────────────

/// An opaque sRGB colour.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = CatalogError;

    /// Parse `#rrggbb`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ── Palette ───────────────────────────────────────────────────────────────────

/// The two trail colours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Palette {
    pub base: Color,
    pub highlight: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: Color::rgb(0x44, 0x66, 0xaa),
            highlight: Color::rgb(0xff, 0x44, 0x22),
        }
    }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Colour for `feature` given the highlighted relation name.
///
/// Highlighted iff the feature's primary relation `name` equals
/// `highlighted`.  No highlight, or a feature without a name, is always
/// base.
pub fn resolve_style(feature: &TrailFeature, highlighted: Option<&str>, palette: &Palette) -> Color {
    match (feature.name(), highlighted) {
        (Some(name), Some(h)) if name == h => palette.highlight,
        _ => palette.base,
    }
}

/// A style callback bound to a highlight state, handed to the renderer.
#[derive(Copy, Clone)]
pub struct StyleResolver<'a> {
    highlight: &'a HighlightState,
    palette: Palette,
}

impl<'a> StyleResolver<'a> {
    pub fn new(highlight: &'a HighlightState, palette: Palette) -> Self {
        Self { highlight, palette }
    }

    pub fn resolve(&self, feature: &TrailFeature) -> Color {
        self.highlight
            .with(|h| resolve_style(feature, h, &self.palette))
    }

    /// The highlight revision at this instant; a renderer caches resolved
    /// colours per revision.
    pub fn revision(&self) -> u64 {
        self.highlight.revision()
    }
}
