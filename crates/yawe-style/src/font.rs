#![forbid(unsafe_code)]

//! Font descriptors in the canvas `font` shorthand subset the editor uses.
//!
//! Grammar (each emphasis keyword optional, in this order):
//!
//! ```text
//! [bold ][italic ][underline ]<positive integer>px <family>
//! family := [A-Za-z0-9-]+
//! ```
//!
//! The normalized string form doubles as the glyph width cache key.

use std::fmt;
use std::str::FromStr;

use crate::style::StyleFlags;

/// Errors produced while building or parsing a font descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// The descriptor string does not match the grammar.
    #[error("invalid font `{descriptor}`: {reason}")]
    InvalidDescriptor {
        descriptor: String,
        reason: &'static str,
    },
    /// Size must be a positive integer pixel count.
    #[error("invalid font size {0}: must be positive")]
    InvalidSize(u32),
    /// Family must be a non-empty run of ASCII letters, digits and `-`.
    #[error("invalid font family `{0}`")]
    InvalidFamily(String),
}

/// `1.2 × size`, computed as `size * 6 / 5` so integer sizes stay exact.
#[inline]
#[must_use]
pub fn leading_for(size: u32) -> f32 {
    (size as f32 * 6.0) / 5.0
}

/// A validated font descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    flags: StyleFlags,
    size: u32,
    family: String,
}

impl FontDescriptor {
    /// Build a descriptor from parts, validating size and family.
    pub fn new(flags: StyleFlags, size: u32, family: impl Into<String>) -> Result<Self, FontError> {
        let family = family.into();
        if size == 0 {
            return Err(FontError::InvalidSize(size));
        }
        if !is_valid_family(&family) {
            return Err(FontError::InvalidFamily(family));
        }
        Ok(Self {
            flags,
            size,
            family,
        })
    }

    /// Parse a descriptor string such as `"bold 20px serif"`.
    pub fn parse(descriptor: &str) -> Result<Self, FontError> {
        let invalid = |reason| FontError::InvalidDescriptor {
            descriptor: descriptor.to_string(),
            reason,
        };

        let mut rest = descriptor;
        let mut flags = StyleFlags::NONE;
        for (flag, keyword) in StyleFlags::ORDERED {
            if let Some(tail) = rest
                .strip_prefix(keyword)
                .and_then(|tail| tail.strip_prefix(' '))
            {
                flags.insert(flag);
                rest = tail;
            }
        }

        let (size, family) = rest
            .split_once("px ")
            .ok_or_else(|| invalid("expected `<size>px <family>`"))?;
        if !size.starts_with(|c: char| matches!(c, '1'..='9'))
            || !size.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid("size must be a positive integer"));
        }
        let size: u32 = size.parse().map_err(|_| invalid("size out of range"))?;
        if !is_valid_family(family) {
            return Err(invalid("family must be letters, digits or `-`"));
        }

        Ok(Self {
            flags,
            size,
            family: family.to_string(),
        })
    }

    #[inline]
    #[must_use]
    pub fn flags(&self) -> StyleFlags {
        self.flags
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Row height for this size (`1.2 × size`).
    #[inline]
    #[must_use]
    pub fn leading(&self) -> f32 {
        leading_for(self.size)
    }

    /// Same family and size with different emphasis.
    #[must_use]
    pub fn with_flags(&self, flags: StyleFlags) -> Self {
        Self {
            flags,
            ..self.clone()
        }
    }

    /// Same family and emphasis at a different size.
    pub fn with_size(&self, size: u32) -> Result<Self, FontError> {
        Self::new(self.flags, size, self.family.clone())
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}px {}", self.flags.prefix(), self.size, self.family)
    }
}

impl FromStr for FontDescriptor {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// `[A-Za-z0-9-]+`
#[must_use]
pub fn is_valid_family(family: &str) -> bool {
    !family.is_empty()
        && family
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}
