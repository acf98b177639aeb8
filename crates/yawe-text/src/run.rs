#![forbid(unsafe_code)]

//! Styled runs: contiguous text sharing one font, emphasis and color set.
//!
//! A run keeps its characters and their measured advance widths in two
//! parallel vectors. Every mutation updates both in lockstep, so
//! `widths().len() == len()` holds after any call, including failed ones.

use std::fmt;
use std::ops::{Bound, Range, RangeBounds};

use rustc_hash::FxHashMap;
use tracing::trace;
use yawe_style::{FontDescriptor, RunColors, StyleFlags, leading_for};

use crate::cache::Measurer;
use crate::error::{LayoutError, Result};
use crate::surface::{DrawingSurface, Rect};

/// Font family, pixel size and line height of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFont {
    pub family: String,
    pub size: u32,
    pub line_height: f32,
}

impl Default for RunFont {
    fn default() -> Self {
        Self::new("sans-serif", 20)
    }
}

impl RunFont {
    /// Font with the default `1.2 × size` line height.
    #[must_use]
    pub fn new(family: impl Into<String>, size: u32) -> Self {
        Self {
            family: family.into(),
            size,
            line_height: leading_for(size),
        }
    }

    #[must_use]
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }
}

/// Selected character range of a run plus the editor's focus state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSelection {
    pub range: Range<usize>,
    pub focused: bool,
}

/// A contiguous span of text with one style.
#[derive(Debug, Clone)]
pub struct StyledRun {
    text: Vec<char>,
    widths: Vec<f32>,
    style: StyleFlags,
    colors: RunColors,
    font: RunFont,
    descriptor: FontDescriptor,
    char_widths: FxHashMap<char, f32>,
}

impl StyledRun {
    /// Build a run and measure every character of `text`.
    pub fn new(
        text: &str,
        font: RunFont,
        style: StyleFlags,
        colors: RunColors,
        measurer: &mut Measurer<'_>,
    ) -> Result<Self> {
        let descriptor = FontDescriptor::new(style, font.size, font.family.clone())?;
        let mut run = Self {
            text: text.chars().collect(),
            widths: Vec::with_capacity(text.len()),
            style,
            colors,
            font,
            descriptor,
            char_widths: FxHashMap::default(),
        };
        run.remeasure(measurer);
        Ok(run)
    }

    /// An empty run with the same formatting.
    #[must_use]
    pub fn clone_style(&self) -> Self {
        Self {
            text: Vec::new(),
            widths: Vec::new(),
            style: self.style,
            colors: self.colors,
            font: self.font.clone(),
            descriptor: self.descriptor.clone(),
            char_widths: self.char_widths.clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Total advance width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.widths.iter().sum()
    }

    /// Row height this run contributes: `1.2 × size`.
    #[inline]
    #[must_use]
    pub fn height(&self) -> f32 {
        leading_for(self.font.size)
    }

    #[inline]
    #[must_use]
    pub fn chars(&self) -> &[char] {
        &self.text
    }

    #[inline]
    #[must_use]
    pub fn widths(&self) -> &[f32] {
        &self.widths
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> StyleFlags {
        self.style
    }

    #[inline]
    #[must_use]
    pub fn colors(&self) -> &RunColors {
        &self.colors
    }

    #[inline]
    #[must_use]
    pub fn font(&self) -> &RunFont {
        &self.font
    }

    /// The descriptor this run measures and paints with.
    #[inline]
    #[must_use]
    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    /// Width of `ch` in this run's font.
    pub fn measure_width(&mut self, ch: char, measurer: &mut Measurer<'_>) -> f32 {
        if let Some(width) = self.char_widths.get(&ch) {
            return *width;
        }
        let width = measurer.width(&self.descriptor, ch);
        self.char_widths.insert(ch, width);
        width
    }

    /// Insert `ch` before the character at `index` (`index == len` appends).
    pub fn insert(&mut self, ch: char, index: usize, measurer: &mut Measurer<'_>) -> Result<()> {
        if index > self.text.len() {
            return Err(LayoutError::Index {
                operation: "StyledRun::insert",
                index,
                len: self.text.len(),
            });
        }
        let width = self.measure_width(ch, measurer);
        self.text.insert(index, ch);
        self.widths.insert(index, width);
        trace!(?ch, index, width, "run insert");
        Ok(())
    }

    /// Remove `[start, end)`; `end` defaults to `start + 1`.
    pub fn remove(&mut self, start: usize, end: Option<usize>) -> Result<()> {
        let range = self.check_span("StyledRun::remove", start, end)?;
        trace!(?range, "run remove");
        self.text.drain(range.clone());
        self.widths.drain(range);
        Ok(())
    }

    /// Truncate to `[0, index)` and return `[index, len)` as a new run.
    ///
    /// The tail keeps the measured widths and the formatting of `self`.
    pub fn split(&mut self, index: usize) -> Result<Self> {
        if index > self.text.len() {
            return Err(LayoutError::Index {
                operation: "StyledRun::split",
                index,
                len: self.text.len(),
            });
        }
        let mut tail = self.clone_style();
        tail.text = self.text.split_off(index);
        tail.widths = self.widths.split_off(index);
        Ok(tail)
    }

    /// Sum of widths over `range`, clamped to the run.
    #[must_use]
    pub fn sub_width(&self, range: impl RangeBounds<usize>) -> f32 {
        let len = self.widths.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        }
        .min(len);
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        }
        .clamp(start, len);
        self.widths[start..end].iter().sum()
    }

    /// Index of the last character, scanning from `start_at`, whose right
    /// edge stays within `max_x` of the scan origin.
    ///
    /// `None` when not even the character at `start_at` fits (or nothing is
    /// left to scan). Calling again with `start_at = last + 1` carves the
    /// next row out of the same run.
    pub fn chars_before(&self, max_x: f32, start_at: usize) -> Result<Option<usize>> {
        if start_at > self.widths.len() {
            return Err(LayoutError::Index {
                operation: "StyledRun::chars_before",
                index: start_at,
                len: self.widths.len(),
            });
        }
        let mut total = 0.0;
        let mut index = start_at;
        while let Some(&width) = self.widths.get(index) {
            if total + width > max_x {
                break;
            }
            total += width;
            index += 1;
        }
        Ok(index.checked_sub(1).filter(|_| index > start_at))
    }

    /// Flip (or force) an emphasis flag; widths are re-measured when the
    /// font changes.
    pub fn toggle_style(
        &mut self,
        flag: StyleFlags,
        force: Option<bool>,
        measurer: &mut Measurer<'_>,
    ) {
        let before = self.style;
        self.style.toggle(flag, force);
        if self.style != before {
            self.descriptor = self.descriptor.with_flags(self.style);
            self.remeasure(measurer);
        }
    }

    /// Change the pixel size; resets the line height to `1.2 × size`.
    pub fn set_font_size(&mut self, size: u32, measurer: &mut Measurer<'_>) -> Result<()> {
        let descriptor = self.descriptor.with_size(size)?;
        self.font.size = size;
        self.font.line_height = leading_for(size);
        if descriptor != self.descriptor {
            self.descriptor = descriptor;
            self.remeasure(measurer);
        }
        Ok(())
    }

    pub fn set_colors(&mut self, colors: RunColors) {
        self.colors = colors;
    }

    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.text.iter().collect()
    }

    /// Styled markup: emphasis tags (bold innermost) inside a span carrying
    /// the declarative font and color properties.
    #[must_use]
    pub fn to_markup(&self) -> String {
        let mut inner = escape_html(&self.to_plain_text());
        for (flag, tag) in [
            (StyleFlags::BOLD, "b"),
            (StyleFlags::ITALIC, "i"),
            (StyleFlags::UNDERLINE, "u"),
        ] {
            if self.style.contains(flag) {
                inner = format!("<{tag}>{inner}</{tag}>");
            }
        }
        let mut style = format!("color: {};", self.colors.text);
        if let Some(background) = self.colors.background {
            style.push_str(&format!(" background-color: {background};"));
        }
        style.push_str(&format!(
            " font-size: {}px; font-family: {}; line-height: {}px;",
            self.font.size, self.font.family, self.font.line_height
        ));
        format!("<span style=\"{style}\">\n    {inner}\n</span>")
    }

    /// Top and height of the background band for a baseline at `y`: the
    /// glyph box of height `size`, centered within the line's leading.
    #[must_use]
    pub fn band(&self, y: f32) -> (f32, f32) {
        let size = self.font.size as f32;
        let line_height = self.font.line_height;
        (y - 0.8 * line_height + 0.5 * (line_height - size), size)
    }

    /// Paint `span` (the whole run when `None`) with its left edge at
    /// `origin_x` and baseline at `y`. Returns the painted width.
    ///
    /// Characters inside `selection` use the selection colors for the
    /// current focus state. Underline only reaches the surface through the
    /// font descriptor; no stroke is painted.
    pub fn render(
        &self,
        origin_x: f32,
        y: f32,
        span: Option<Range<usize>>,
        selection: Option<&RunSelection>,
        surface: &mut dyn DrawingSurface,
    ) -> Result<f32> {
        let span = match span {
            Some(span) => self.check_span("StyledRun::render", span.start, Some(span.end))?,
            None => 0..self.text.len(),
        };
        if span.is_empty() {
            return Ok(0.0);
        }
        surface.set_font(&self.descriptor);

        let (sel_start, sel_end) = match selection {
            Some(sel) => {
                let start = sel.range.start.clamp(span.start, span.end);
                (start, sel.range.end.clamp(start, span.end))
            }
            None => (span.end, span.end),
        };
        let focused = selection.is_some_and(|sel| sel.focused);
        let pieces = [
            (span.start..sel_start, false),
            (sel_start..sel_end, true),
            (sel_end..span.end, false),
        ];

        let (top, band_height) = self.band(y);
        let mut x = origin_x;
        for (piece, selected) in pieces {
            if piece.is_empty() {
                continue;
            }
            let width = self.sub_width(piece.clone());
            let (fill, ink) = if selected {
                (
                    Some(self.colors.selection_background.pick(focused)),
                    self.colors.selection_text.pick(focused),
                )
            } else {
                (self.colors.background, self.colors.text)
            };
            if let Some(fill) = fill {
                surface.fill_rect(Rect::new(x, top, width, band_height), fill);
            }
            let text: String = self.text[piece].iter().collect();
            surface.fill_text(&text, x, y, ink);
            x += width;
        }
        Ok(x - origin_x)
    }

    fn check_span(
        &self,
        operation: &'static str,
        start: usize,
        end: Option<usize>,
    ) -> Result<Range<usize>> {
        let len = self.text.len();
        if start >= len {
            return Err(LayoutError::Index {
                operation,
                index: start,
                len,
            });
        }
        let end = match end {
            Some(end) if end > len => return Err(LayoutError::RangeEnd { operation, end, len }),
            Some(end) if end < start => {
                return Err(LayoutError::RangeOrder {
                    operation,
                    start,
                    end,
                });
            }
            Some(end) => end,
            None => start + 1,
        };
        Ok(start..end)
    }

    fn remeasure(&mut self, measurer: &mut Measurer<'_>) {
        self.char_widths.clear();
        let text = std::mem::take(&mut self.text);
        self.widths = text
            .iter()
            .map(|&ch| self.measure_width(ch, measurer))
            .collect();
        self.text = text;
    }
}

impl fmt::Display for StyledRun {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.text {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
