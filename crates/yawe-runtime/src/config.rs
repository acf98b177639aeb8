#![forbid(unsafe_code)]

//! Validated editor configuration.
//!
//! [`EditorConfig`] is an immutable record: every `with_*` setter checks its
//! input and returns a new value, and [`EditorConfig::apply_attribute`]
//! accepts the string attributes a host element forwards. A blank attribute
//! value resets the field to its default.
//!
//! # Example
//!
//! ```
//! use yawe_runtime::EditorConfig;
//!
//! let config = EditorConfig::default()
//!     .apply_attribute("font-size", Some("16"))
//!     .unwrap()
//!     .apply_attribute("selection-background-colors", Some("#3377FF; #123456"))
//!     .unwrap();
//! assert_eq!(config.font_size(), 16);
//! assert_eq!(config.line_height(), 19.2);
//! ```

use web_time::Duration;
use yawe_style::{
    Color, ColorError, ColorOverrides, RunColors, SelectionColors, is_valid_family, leading_for,
};
use yawe_text::RunFont;

/// Errors produced while validating configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A color attribute failed hex validation.
    #[error("invalid color for `{attribute}`: {source}")]
    InvalidColor {
        attribute: &'static str,
        #[source]
        source: ColorError,
    },
    /// A numeric or family value is out of range or unparsable.
    #[error("invalid value `{value}` for `{attribute}`: {reason}")]
    InvalidValue {
        attribute: &'static str,
        value: String,
        reason: &'static str,
    },
    /// The attribute name is not one the editor understands.
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
}

impl ConfigError {
    fn invalid(attribute: &'static str, value: impl ToString, reason: &'static str) -> Self {
        Self::InvalidValue {
            attribute,
            value: value.to_string(),
            reason,
        }
    }
}

/// Attribute names accepted by [`EditorConfig::apply_attribute`].
pub const ATTRIBUTES: [&str; 9] = [
    "font",
    "font-size",
    "line-height",
    "tabindex",
    "blink-interval",
    "color",
    "background-color",
    "selection-colors",
    "selection-background-colors",
];

/// Configuration for one editor instance.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorConfig {
    font_family: String,
    font_size: u32,
    /// `None` follows the font size (`1.2 × size`).
    line_height: Option<f32>,
    colors: ColorOverrides,
    blink_interval: Duration,
    tab_index: i32,
    resize_debounce: Duration,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 20,
            line_height: None,
            colors: ColorOverrides::default(),
            blink_interval: Duration::from_millis(500),
            tab_index: 0,
            resize_debounce: Duration::from_millis(100),
        }
    }
}

impl EditorConfig {
    #[must_use]
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    #[must_use]
    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    /// Explicit line height, or `1.2 × font_size`.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.line_height.unwrap_or_else(|| leading_for(self.font_size))
    }

    #[must_use]
    pub fn blink_interval(&self) -> Duration {
        self.blink_interval
    }

    #[must_use]
    pub fn tab_index(&self) -> i32 {
        self.tab_index
    }

    #[must_use]
    pub fn resize_debounce(&self) -> Duration {
        self.resize_debounce
    }

    /// Colors set by the host; unset ones fall back to run defaults.
    #[must_use]
    pub fn color_overrides(&self) -> ColorOverrides {
        self.colors
    }

    /// Run colors with the host's overrides applied.
    #[must_use]
    pub fn run_colors(&self) -> RunColors {
        RunColors::default().patch(&self.colors)
    }

    /// Font for newly created runs.
    #[must_use]
    pub fn run_font(&self) -> RunFont {
        RunFont::new(self.font_family.clone(), self.font_size).with_line_height(self.line_height())
    }

    /// Whether switching from `self` to `other` changes glyph metrics.
    #[must_use]
    pub fn font_changed(&self, other: &Self) -> bool {
        self.font_family != other.font_family || self.font_size != other.font_size
    }

    pub fn with_font_family(mut self, family: impl Into<String>) -> Result<Self, ConfigError> {
        let family = family.into();
        if !is_valid_family(&family) {
            return Err(ConfigError::invalid(
                "font",
                family,
                "family must be letters, digits or `-`",
            ));
        }
        self.font_family = family;
        Ok(self)
    }

    pub fn with_font_size(mut self, size: u32) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::invalid("font-size", size, "must be positive"));
        }
        self.font_size = size;
        Ok(self)
    }

    pub fn with_line_height(mut self, line_height: f32) -> Result<Self, ConfigError> {
        if !line_height.is_finite() || line_height <= 0.0 {
            return Err(ConfigError::invalid(
                "line-height",
                line_height,
                "must be a positive number",
            ));
        }
        self.line_height = Some(line_height);
        Ok(self)
    }

    pub fn with_tab_index(mut self, tab_index: i32) -> Result<Self, ConfigError> {
        if tab_index < -1 {
            return Err(ConfigError::invalid("tabindex", tab_index, "must be -1 or more"));
        }
        self.tab_index = tab_index;
        Ok(self)
    }

    pub fn with_blink_interval(mut self, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::invalid(
                "blink-interval",
                interval.as_millis(),
                "must be positive",
            ));
        }
        self.blink_interval = interval;
        Ok(self)
    }

    /// Quiet period before a resize is applied; zero applies on the next tick.
    #[must_use]
    pub fn with_resize_debounce(mut self, debounce: Duration) -> Self {
        self.resize_debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.colors.text = color;
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, color: Option<Color>) -> Self {
        self.colors.background = color;
        self
    }

    #[must_use]
    pub fn with_selection_colors(mut self, colors: Option<SelectionColors>) -> Self {
        self.colors.selection_text = colors;
        self
    }

    #[must_use]
    pub fn with_selection_background_colors(mut self, colors: Option<SelectionColors>) -> Self {
        self.colors.selection_background = colors;
        self
    }

    /// Apply a string attribute. `None` or a blank value resets the field.
    pub fn apply_attribute(&self, name: &str, value: Option<&str>) -> Result<Self, ConfigError> {
        let value = value.map(str::trim).filter(|v| !v.is_empty());
        let defaults = Self::default();
        let next = self.clone();
        match name {
            "font" => match value {
                Some(family) => next.with_font_family(family),
                None => next.with_font_family(defaults.font_family),
            },
            "font-size" => match value {
                Some(raw) => next.with_font_size(parse_number("font-size", raw)?),
                None => next.with_font_size(defaults.font_size),
            },
            "line-height" => match value {
                Some(raw) => next.with_line_height(parse_number("line-height", raw)?),
                None => Ok(Self {
                    line_height: None,
                    ..next
                }),
            },
            "tabindex" => match value {
                Some(raw) => next.with_tab_index(parse_number("tabindex", raw)?),
                None => next.with_tab_index(defaults.tab_index),
            },
            "blink-interval" => match value {
                Some(raw) => {
                    let millis: u64 = parse_number("blink-interval", raw)?;
                    next.with_blink_interval(Duration::from_millis(millis))
                }
                None => next.with_blink_interval(defaults.blink_interval),
            },
            "color" => Ok(next.with_color(parse_color("color", value)?)),
            "background-color" => {
                Ok(next.with_background_color(parse_color("background-color", value)?))
            }
            "selection-colors" => {
                Ok(next.with_selection_colors(parse_pair("selection-colors", value)?))
            }
            "selection-background-colors" => Ok(next.with_selection_background_colors(
                parse_pair("selection-background-colors", value)?,
            )),
            other => Err(ConfigError::UnknownAttribute(other.to_string())),
        }
    }
}

fn parse_number<T: std::str::FromStr>(
    attribute: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    raw.parse()
        .map_err(|_| ConfigError::invalid(attribute, raw, "not a number"))
}

fn parse_color(attribute: &'static str, value: Option<&str>) -> Result<Option<Color>, ConfigError> {
    value
        .map(Color::parse_hex)
        .transpose()
        .map_err(|source| ConfigError::InvalidColor { attribute, source })
}

fn parse_pair(
    attribute: &'static str,
    value: Option<&str>,
) -> Result<Option<SelectionColors>, ConfigError> {
    value
        .map(SelectionColors::parse)
        .transpose()
        .map_err(|source| ConfigError::InvalidColor { attribute, source })
}
