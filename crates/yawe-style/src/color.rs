#![forbid(unsafe_code)]

//! Hex color values as accepted by the editor's color attributes.
//!
//! Colors are written `#RRGGBB` or `#RRGGBBAA`. Selection colors may carry
//! a second value for the blurred (unfocused) state: `#3377FF; #123456`.

use std::fmt;
use std::str::FromStr;

/// Errors produced while parsing color values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    /// The value does not match `#` followed by 6 or 8 hex digits.
    #[error("invalid color value `{value}`: {reason}")]
    Invalid { value: String, reason: &'static str },
}

impl ColorError {
    fn invalid(value: &str, reason: &'static str) -> Self {
        Self::Invalid {
            value: value.to_string(),
            reason,
        }
    }
}

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA`.
    pub fn parse_hex(value: &str) -> Result<Self, ColorError> {
        let digits = value
            .strip_prefix('#')
            .ok_or_else(|| ColorError::invalid(value, "missing leading `#`"))?;
        if digits.len() != 6 && digits.len() != 8 {
            return Err(ColorError::invalid(value, "expected 6 or 8 hex digits"));
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::invalid(value, "non-hex digit"));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ColorError::invalid(value, "non-hex digit"))
        };
        let a = if digits.len() == 8 { channel(6)? } else { 0xFF };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, a))
    }

    #[must_use]
    pub const fn is_opaque(self) -> bool {
        self.a == 0xFF
    }
}

impl fmt::Display for Color {
    /// Lowercase hex; the alpha pair is only written for translucent colors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if !self.is_opaque() {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// A focused/blurred color pair, e.g. for selection highlights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionColors {
    /// Used while the editor has focus.
    pub focused: Color,
    /// Used while the editor is blurred.
    pub blurred: Color,
}

impl SelectionColors {
    #[must_use]
    pub const fn new(focused: Color, blurred: Color) -> Self {
        Self { focused, blurred }
    }

    /// Same color in both states.
    #[must_use]
    pub const fn uniform(color: Color) -> Self {
        Self::new(color, color)
    }

    /// Parse `#RRGGBB[AA]` optionally followed by `;` (one optional space)
    /// and a second color for the blurred state.
    pub fn parse(value: &str) -> Result<Self, ColorError> {
        match value.split_once(';') {
            None => Ok(Self::uniform(Color::parse_hex(value)?)),
            Some((focused, blurred)) => {
                let blurred = blurred.strip_prefix(' ').unwrap_or(blurred);
                Ok(Self::new(
                    Color::parse_hex(focused)?,
                    Color::parse_hex(blurred)?,
                ))
            }
        }
    }

    /// Pick the variant for the current focus state.
    #[inline]
    #[must_use]
    pub const fn pick(self, focused: bool) -> Color {
        if focused { self.focused } else { self.blurred }
    }
}

impl FromStr for SelectionColors {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectionColors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.focused == self.blurred {
            write!(f, "{}", self.focused)
        } else {
            write!(f, "{}; {}", self.focused, self.blurred)
        }
    }
}
