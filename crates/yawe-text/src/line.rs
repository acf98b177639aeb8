#![forbid(unsafe_code)]

//! Logical lines and their greedy wrapping into visual rows.
//!
//! [`WrappedLine::rows`] is the single line-breaking pass: height
//! computation, painting and caret placement all walk the rows it returns,
//! so what is measured is exactly what is drawn.
//!
//! Breaking rules, per run in order:
//! 1. An empty run, or one that fits the remaining row width, joins the row.
//! 2. Otherwise the current row is closed (if it holds anything).
//! 3. A run no wider than the full width opens the next row whole.
//! 4. A wider run is carved with [`StyledRun::chars_before`], at least one
//!    character per row; its last slice stays open for following runs.

use std::ops::Range;

use smallvec::SmallVec;
use tracing::trace;

use crate::cache::Measurer;
use crate::error::{LayoutError, Result};
use crate::run::StyledRun;
use crate::selection::LineSelection;
use crate::surface::DrawingSurface;

/// A slice of one run placed on a visual row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowSegment {
    /// Index of the run within the line.
    pub run: usize,
    /// Character range of the run on this row.
    pub chars: Range<usize>,
    /// Left edge relative to the row start.
    pub x: f32,
}

/// One horizontal strip of a wrapped line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisualRow {
    pub segments: SmallVec<[RowSegment; 4]>,
    pub width: f32,
    /// Tallest run height on the row.
    pub height: f32,
}

impl VisualRow {
    fn push(&mut self, run: usize, chars: Range<usize>, width: f32, height: f32) {
        self.segments.push(RowSegment {
            run,
            chars,
            x: self.width,
        });
        self.width += width;
        self.height = self.height.max(height);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Where a cursor lands after wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretPlacement {
    /// Visual row index.
    pub row: usize,
    /// Horizontal offset from the line's left edge.
    pub x: f32,
    /// Offset of the row's baseline from the first row's baseline.
    pub baseline_offset: f32,
}

/// An ordered, non-empty sequence of runs forming one logical line.
#[derive(Debug, Clone)]
pub struct WrappedLine {
    runs: Vec<StyledRun>,
}

impl WrappedLine {
    #[must_use]
    pub fn new(run: StyledRun) -> Self {
        Self { runs: vec![run] }
    }

    /// Build from runs in left-to-right order.
    pub fn from_runs(runs: Vec<StyledRun>) -> Result<Self> {
        if runs.is_empty() {
            return Err(LayoutError::MissingArgument {
                operation: "WrappedLine::from_runs",
                argument: "runs",
            });
        }
        Ok(Self { runs })
    }

    #[inline]
    #[must_use]
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    #[must_use]
    pub fn run(&self, block: usize) -> Option<&StyledRun> {
        self.runs.get(block)
    }

    pub fn run_mut(&mut self, block: usize) -> Option<&mut StyledRun> {
        self.runs.get_mut(block)
    }

    /// Total characters across all runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.runs.iter().map(StyledRun::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(StyledRun::is_empty)
    }

    /// Unwrapped width of the whole line.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.runs.iter().map(StyledRun::width).sum()
    }

    /// Insert `run`.
    ///
    /// - `at` and `split_at`: split run `at` at character `split_at`, then
    ///   place `run` and the split-off tail right after it.
    /// - only `at`: insert before run `at` (`at == runs.len()` appends).
    /// - neither: append.
    pub fn insert_run(
        &mut self,
        run: StyledRun,
        at: Option<usize>,
        split_at: Option<usize>,
    ) -> Result<()> {
        let count = self.runs.len();
        match (at, split_at) {
            (None, None) => self.runs.push(run),
            (Some(at), None) => {
                if at > count {
                    return Err(LayoutError::Index {
                        operation: "WrappedLine::insert_run",
                        index: at,
                        len: count,
                    });
                }
                self.runs.insert(at, run);
            }
            (Some(at), Some(split_at)) => {
                let Some(target) = self.runs.get_mut(at) else {
                    return Err(LayoutError::Index {
                        operation: "WrappedLine::insert_run",
                        index: at,
                        len: count,
                    });
                };
                let tail = target.split(split_at)?;
                self.runs.insert(at + 1, run);
                self.runs.insert(at + 2, tail);
            }
            (None, Some(_)) => {
                return Err(LayoutError::MissingArgument {
                    operation: "WrappedLine::insert_run",
                    argument: "at",
                });
            }
        }
        Ok(())
    }

    /// Run and local offset for a cursor at line-global `position`.
    ///
    /// A position on a run boundary belongs to the run before it.
    pub fn point_at(&self, position: usize) -> Result<(usize, usize)> {
        self.locate("WrappedLine::point_at", position, true)
    }

    /// Line-global position of `(block, char)`, if it exists.
    #[must_use]
    pub fn position_of(&self, block: usize, char: usize) -> Option<usize> {
        let run = self.runs.get(block)?;
        if char > run.len() {
            return None;
        }
        Some(self.runs[..block].iter().map(StyledRun::len).sum::<usize>() + char)
    }

    /// Insert `ch` at line-global `position` (`0..=len`).
    pub fn insert_char(
        &mut self,
        ch: char,
        position: usize,
        measurer: &mut Measurer<'_>,
    ) -> Result<(usize, usize)> {
        let (block, offset) = self.locate("WrappedLine::insert_char", position, true)?;
        self.runs[block].insert(ch, offset, measurer)?;
        Ok((block, offset + 1))
    }

    /// Remove the character at line-global `position` (`0..len`).
    ///
    /// A run emptied by the removal is dropped unless it is the only one.
    pub fn remove_char(&mut self, position: usize) -> Result<char> {
        let (block, offset) = self.locate("WrappedLine::remove_char", position, false)?;
        let run = &mut self.runs[block];
        let removed = run.chars()[offset];
        run.remove(offset, None)?;
        if run.is_empty() && self.runs.len() > 1 {
            self.runs.remove(block);
        }
        Ok(removed)
    }

    /// Break the line at line-global `position`: `self` keeps `[0, position)`
    /// and the returned line holds the rest.
    pub fn split_off(&mut self, position: usize) -> Result<WrappedLine> {
        let (block, offset) = self.locate("WrappedLine::split_off", position, true)?;
        let tail = self.runs[block].split(offset)?;
        let mut runs: Vec<StyledRun> = self.runs.drain(block + 1..).collect();
        if !tail.is_empty() || runs.is_empty() {
            runs.insert(0, tail);
        }
        Ok(Self { runs })
    }

    /// Append the runs of `other`. Empty runs are dropped as long as one
    /// run remains.
    pub fn append(&mut self, other: WrappedLine) {
        self.runs.extend(other.runs);
        if self.is_empty() {
            self.runs.truncate(1);
        } else {
            self.runs.retain(|run| !run.is_empty());
        }
    }

    fn locate(
        &self,
        operation: &'static str,
        position: usize,
        inclusive: bool,
    ) -> Result<(usize, usize)> {
        let mut offset = position;
        for (block, run) in self.runs.iter().enumerate() {
            if offset < run.len() || (inclusive && offset == run.len()) {
                return Ok((block, offset));
            }
            offset -= run.len();
        }
        Err(LayoutError::Position {
            operation,
            position,
            len: self.len(),
        })
    }

    /// Greedy wrap into rows no wider than `max_width` (single characters
    /// wider than `max_width` still get a row of their own).
    #[must_use]
    pub fn rows(&self, max_width: f32) -> Vec<VisualRow> {
        let mut rows = Vec::new();
        let mut current = VisualRow::default();

        for (index, run) in self.runs.iter().enumerate() {
            let width = run.width();
            if run.is_empty() || current.width + width <= max_width {
                current.push(index, 0..run.len(), width, run.height());
                continue;
            }
            if !current.is_empty() {
                rows.push(std::mem::take(&mut current));
            }
            if width <= max_width {
                current.push(index, 0..run.len(), width, run.height());
                continue;
            }

            let mut start = 0;
            while start < run.len() {
                let end = match run.chars_before(max_width, start) {
                    Ok(Some(last)) => last + 1,
                    _ => start + 1,
                };
                current.push(index, start..end, run.sub_width(start..end), run.height());
                start = end;
                if start < run.len() {
                    rows.push(std::mem::take(&mut current));
                }
            }
        }
        if !current.is_empty() {
            rows.push(current);
        }
        trace!(max_width, rows = rows.len(), "wrapped line");
        rows
    }

    /// Wrapped height: the sum of every row's height.
    #[must_use]
    pub fn total_height(&self, max_width: f32) -> f32 {
        self.rows(max_width).iter().map(|row| row.height).sum()
    }

    /// Paint the line with the first row's baseline at `y`; each following
    /// row's baseline sits its own height below the previous one.
    ///
    /// Returns the wrapped height, equal to [`Self::total_height`].
    pub fn render(
        &self,
        y: f32,
        max_width: f32,
        selection: Option<&LineSelection<'_>>,
        surface: &mut dyn DrawingSurface,
    ) -> Result<f32> {
        let rows = self.rows(max_width);
        let mut baseline = y;
        let mut height = 0.0;
        for (index, row) in rows.iter().enumerate() {
            if index > 0 {
                baseline += row.height;
            }
            height += row.height;
            for segment in &row.segments {
                if segment.chars.is_empty() {
                    continue;
                }
                let run = &self.runs[segment.run];
                let run_selection = selection.and_then(|sel| sel.run(segment.run, run.len()));
                run.render(
                    segment.x,
                    baseline,
                    Some(segment.chars.clone()),
                    run_selection.as_ref(),
                    surface,
                )?;
            }
        }
        Ok(height)
    }

    /// Row and offsets of a cursor before character `char` of run `block`.
    #[must_use]
    pub fn caret_position(
        &self,
        block: usize,
        char: usize,
        max_width: f32,
    ) -> Option<CaretPlacement> {
        let run = self.runs.get(block)?;
        if char > run.len() {
            return None;
        }
        let mut baseline_offset = 0.0;
        for (index, row) in self.rows(max_width).iter().enumerate() {
            if index > 0 {
                baseline_offset += row.height;
            }
            let hit = row.segments.iter().find(|segment| {
                segment.run == block
                    && char >= segment.chars.start
                    && (char < segment.chars.end
                        || (char == segment.chars.end && segment.chars.end == run.len()))
            });
            if let Some(segment) = hit {
                return Some(CaretPlacement {
                    row: index,
                    x: segment.x + run.sub_width(segment.chars.start..char),
                    baseline_offset,
                });
            }
        }
        None
    }

    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.runs.iter().map(StyledRun::to_plain_text).collect()
    }

    /// Markup of every run, one per line, terminated by a line break tag.
    #[must_use]
    pub fn to_html_fragment(&self) -> String {
        let mut html = String::new();
        for run in &self.runs {
            html.push_str(&run.to_markup());
            html.push('\n');
        }
        html.push_str("<br/>\n");
        html
    }
}
