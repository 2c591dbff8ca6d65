//! Color handling for rendered knowledge graphs
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, so style configuration can accept any CSS color string.

use std::{fmt, str::FromStr};

use color::DynamicColor;

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)" or a named color like "red" or "gray".
    ///
    /// # Examples
    ///
    /// ```
    /// use coursemap_core::color::Color;
    ///
    /// let indigo = Color::new("#6366f1").unwrap();
    /// let gray = Color::new("gray").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns a copy of this color with the given alpha (0.0 transparent, 1.0 opaque).
    ///
    /// # Examples
    ///
    /// ```
    /// use coursemap_core::color::Color;
    ///
    /// let faded = Color::new("red").unwrap().with_alpha(0.5);
    /// assert_eq!(faded.alpha(), 0.5);
    /// ```
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}
