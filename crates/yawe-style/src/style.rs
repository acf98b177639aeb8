#![forbid(unsafe_code)]

//! Run formatting: emphasis flags and the color set a run paints with.

use tracing::{instrument, trace};

use crate::color::{Color, SelectionColors};

/// Emphasis flags that change how a run is measured and marked up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[repr(transparent)]
pub struct StyleFlags(pub u8);

impl StyleFlags {
    /// No emphasis.
    pub const NONE: Self = Self(0);
    /// Bold weight.
    pub const BOLD: Self = Self(1 << 0);
    /// Italic slant.
    pub const ITALIC: Self = Self(1 << 1);
    /// Single underline.
    pub const UNDERLINE: Self = Self(1 << 2);

    /// Every flag paired with its keyword, in descriptor/markup order.
    pub const ORDERED: [(Self, &'static str); 3] = [
        (Self::BOLD, "bold"),
        (Self::ITALIC, "italic"),
        (Self::UNDERLINE, "underline"),
    ];

    /// Check if this flags set contains another flags set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Insert flags into this set.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Remove flags from this set.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Insert or remove depending on `on`.
    #[inline]
    pub fn set(&mut self, other: Self, on: bool) {
        if on {
            self.insert(other);
        } else {
            self.remove(other);
        }
    }

    /// Flip `other`, or force it to `force` when given.
    pub fn toggle(&mut self, other: Self, force: Option<bool>) {
        let on = force.unwrap_or(!self.contains(other));
        self.set(other, on);
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Active keywords followed by a space each, e.g. `"bold italic "`.
    ///
    /// This is the prefix of a font descriptor.
    #[must_use]
    pub fn prefix(self) -> String {
        Self::ORDERED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .fold(String::new(), |mut acc, (_, name)| {
                acc.push_str(name);
                acc.push(' ');
                acc
            })
    }
}

impl core::ops::BitOr for StyleFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for StyleFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// The colors a run paints with.
///
/// `background` is optional: no rectangle is painted behind the glyphs when
/// it is `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunColors {
    /// Glyph color.
    pub text: Color,
    /// Fill behind the glyphs.
    pub background: Option<Color>,
    /// Glyph color inside a selection.
    pub selection_text: SelectionColors,
    /// Fill behind selected glyphs.
    pub selection_background: SelectionColors,
}

impl Default for RunColors {
    fn default() -> Self {
        Self {
            text: Color::WHITE,
            background: Some(Color::rgb(0x76, 0x32, 0x82)),
            selection_text: SelectionColors::new(Color::WHITE, Color::rgb(0x65, 0x43, 0x21)),
            selection_background: SelectionColors::new(
                Color::rgb(0x33, 0x77, 0xFF),
                Color::rgb(0x12, 0x34, 0x56),
            ),
        }
    }
}

impl RunColors {
    #[inline]
    #[must_use]
    pub fn text(mut self, color: Color) -> Self {
        self.text = color;
        self
    }

    #[inline]
    #[must_use]
    pub fn background(mut self, color: Option<Color>) -> Self {
        self.background = color;
        self
    }

    #[inline]
    #[must_use]
    pub fn selection_text(mut self, colors: SelectionColors) -> Self {
        self.selection_text = colors;
        self
    }

    #[inline]
    #[must_use]
    pub fn selection_background(mut self, colors: SelectionColors) -> Self {
        self.selection_background = colors;
        self
    }

    /// Patch: every `Some` in `overrides` replaces the matching color.
    #[instrument(skip(self, overrides), level = "trace")]
    #[must_use]
    pub fn patch(&self, overrides: &ColorOverrides) -> Self {
        trace!("Patching run colors");
        Self {
            text: overrides.text.unwrap_or(self.text),
            background: overrides.background.or(self.background),
            selection_text: overrides.selection_text.unwrap_or(self.selection_text),
            selection_background: overrides
                .selection_background
                .unwrap_or(self.selection_background),
        }
    }
}

/// Partial color set; `None` keeps whatever it is patched onto.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ColorOverrides {
    pub text: Option<Color>,
    pub background: Option<Color>,
    pub selection_text: Option<SelectionColors>,
    pub selection_background: Option<SelectionColors>,
}

impl ColorOverrides {
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.background.is_none()
            && self.selection_text.is_none()
            && self.selection_background.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_insert_remove_contains() {
        let mut flags = StyleFlags::NONE;
        assert!(flags.is_empty());
        flags.insert(StyleFlags::BOLD);
        flags.insert(StyleFlags::UNDERLINE);
        assert!(flags.contains(StyleFlags::BOLD));
        assert!(!flags.contains(StyleFlags::ITALIC));
        assert!(flags.contains(StyleFlags::BOLD | StyleFlags::UNDERLINE));
        flags.remove(StyleFlags::BOLD);
        assert_eq!(flags, StyleFlags::UNDERLINE);
    }

    #[test]
    fn toggle_flips_and_forces() {
        let mut flags = StyleFlags::NONE;
        flags.toggle(StyleFlags::ITALIC, None);
        assert!(flags.contains(StyleFlags::ITALIC));
        flags.toggle(StyleFlags::ITALIC, None);
        assert!(!flags.contains(StyleFlags::ITALIC));
        flags.toggle(StyleFlags::BOLD, Some(true));
        flags.toggle(StyleFlags::BOLD, Some(true));
        assert!(flags.contains(StyleFlags::BOLD));
        flags.toggle(StyleFlags::BOLD, Some(false));
        assert!(flags.is_empty());
    }

    #[test]
    fn prefix_uses_fixed_order() {
        let flags = StyleFlags::UNDERLINE | StyleFlags::BOLD | StyleFlags::ITALIC;
        assert_eq!(flags.prefix(), "bold italic underline ");
        assert_eq!(StyleFlags::ITALIC.prefix(), "italic ");
        assert_eq!(StyleFlags::NONE.prefix(), "");
    }

    #[test]
    fn bitor_assign_unions() {
        let mut flags = StyleFlags::BOLD;
        flags |= StyleFlags::ITALIC;
        assert_eq!(flags, StyleFlags::BOLD.union(StyleFlags::ITALIC));
    }

    #[test]
    fn default_colors_match_widget_defaults() {
        let colors = RunColors::default();
        assert_eq!(colors.text.to_string(), "#ffffff");
        assert_eq!(colors.background.unwrap().to_string(), "#763282");
        assert_eq!(colors.selection_background.focused.to_string(), "#3377ff");
        assert_eq!(colors.selection_background.blurred.to_string(), "#123456");
        assert_eq!(colors.selection_text.focused.to_string(), "#ffffff");
        assert_eq!(colors.selection_text.blurred.to_string(), "#654321");
    }

    #[test]
    fn patch_replaces_only_some_fields() {
        let base = RunColors::default();
        let overrides = ColorOverrides {
            text: Some(Color::BLACK),
            ..ColorOverrides::default()
        };
        let patched = base.patch(&overrides);
        assert_eq!(patched.text, Color::BLACK);
        assert_eq!(patched.background, base.background);
        assert_eq!(patched.selection_background, base.selection_background);
    }

    #[test]
    fn patch_with_empty_overrides_is_identity() {
        let base = RunColors::default().background(None);
        let overrides = ColorOverrides::default();
        assert!(overrides.is_empty());
        assert_eq!(base.patch(&overrides), base);
    }

    #[test]
    fn builder_sets_fields() {
        let pair = SelectionColors::uniform(Color::BLACK);
        let colors = RunColors::default()
            .text(Color::BLACK)
            .background(None)
            .selection_text(pair)
            .selection_background(pair);
        assert_eq!(colors.text, Color::BLACK);
        assert!(colors.background.is_none());
        assert_eq!(colors.selection_text, pair);
        assert_eq!(colors.selection_background, pair);
    }
}
