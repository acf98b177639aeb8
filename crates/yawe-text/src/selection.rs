#![forbid(unsafe_code)]

//! Cursor and selection endpoints in (line, run, char) coordinates.
//!
//! The model never touches runs or lines; the render pass asks it which
//! characters of each run fall inside the selection.

use std::ops::Range;

use crate::run::RunSelection;

/// A position in the document: line index, run index within the line,
/// character index within the run. Ordered lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TextPoint {
    pub line: usize,
    pub block: usize,
    pub char: usize,
}

impl TextPoint {
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(line: usize, block: usize, char: usize) -> Self {
        Self { line, block, char }
    }
}

/// Selection between `start` and `end` plus the direction it was made in.
///
/// `start <= end` always holds; `left_to_right` says which end is the
/// moving one (the caret): `end` when true, `start` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionModel {
    start: TextPoint,
    end: TextPoint,
    left_to_right: bool,
}

impl Default for SelectionModel {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionModel {
    /// Collapsed at the document origin.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            start: TextPoint::ORIGIN,
            end: TextPoint::ORIGIN,
            left_to_right: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> TextPoint {
        self.start
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> TextPoint {
        self.end
    }

    #[inline]
    #[must_use]
    pub fn left_to_right(&self) -> bool {
        self.left_to_right
    }

    /// True when start and end are the same point (a plain cursor).
    #[inline]
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Replace both endpoints. Swapped endpoints are reordered; the
    /// direction flag is kept as given.
    pub fn set_range(&mut self, start: TextPoint, end: TextPoint, left_to_right: bool) {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        self.start = start;
        self.end = end;
        self.left_to_right = left_to_right;
    }

    /// Collapse to a cursor at `point`.
    pub fn collapse_to(&mut self, point: TextPoint) {
        self.start = point;
        self.end = point;
        self.left_to_right = true;
    }

    /// The fixed end of the selection.
    #[must_use]
    pub fn anchor(&self) -> TextPoint {
        if self.left_to_right { self.start } else { self.end }
    }

    /// The moving end of the selection, where the caret sits.
    #[must_use]
    pub fn caret(&self) -> TextPoint {
        if self.left_to_right { self.end } else { self.start }
    }

    /// Move the caret to `point`, keeping the anchor.
    pub fn extend_to(&mut self, point: TextPoint) {
        let anchor = self.anchor();
        self.set_range(anchor, point, anchor <= point);
    }

    /// `(start, end)` in document order.
    #[must_use]
    pub fn ordered(&self) -> (TextPoint, TextPoint) {
        (self.start, self.end)
    }

    /// Whether `point` lies in `[start, end)`.
    #[must_use]
    pub fn contains(&self, point: TextPoint) -> bool {
        self.start <= point && point < self.end
    }

    /// Characters of run `(line, block)` (of length `len`) covered by the
    /// selection, or `None` when the run is not selected.
    #[must_use]
    pub fn run_range(&self, line: usize, block: usize, len: usize) -> Option<Range<usize>> {
        let key = (line, block);
        let first = (self.start.line, self.start.block);
        let last = (self.end.line, self.end.block);
        if key < first || key > last {
            return None;
        }
        let lo = if key == first { self.start.char.min(len) } else { 0 };
        let hi = if key == last { self.end.char.min(len) } else { len };
        (lo < hi).then_some(lo..hi)
    }

    /// View of the selection restricted to one line, for painting.
    #[must_use]
    pub fn for_line(&self, line: usize, focused: bool) -> LineSelection<'_> {
        LineSelection {
            model: self,
            line,
            focused,
        }
    }
}

/// The selection as seen by a single line's render pass.
#[derive(Debug, Clone, Copy)]
pub struct LineSelection<'a> {
    model: &'a SelectionModel,
    line: usize,
    focused: bool,
}

impl LineSelection<'_> {
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    #[must_use]
    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Selected part of run `block`, if any.
    #[must_use]
    pub fn run(&self, block: usize, len: usize) -> Option<RunSelection> {
        self.model
            .run_range(self.line, block, len)
            .map(|range| RunSelection {
                range,
                focused: self.focused,
            })
    }
}
