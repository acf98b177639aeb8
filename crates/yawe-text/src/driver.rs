#![forbid(unsafe_code)]

//! Repaint orchestration: lines top to bottom, selection highlight, caret.

use tracing::{debug, debug_span};

use crate::document::Document;
use crate::error::Result;
use crate::selection::SelectionModel;
use crate::surface::{DrawingSurface, Rect};

/// Focus and blink state for one paint pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintState {
    pub focused: bool,
    pub caret_visible: bool,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            focused: false,
            caret_visible: true,
        }
    }
}

/// Summary of a finished repaint.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RepaintStats {
    pub lines: usize,
    /// Wrapped height of the whole document.
    pub height: f32,
    pub caret_painted: bool,
}

/// Walks a document and paints it onto a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutDriver {
    /// Baseline of the first row, in surface pixels from the top.
    pub first_baseline: f32,
    pub caret_width: f32,
}

impl Default for LayoutDriver {
    fn default() -> Self {
        Self {
            first_baseline: 24.0,
            caret_width: 1.0,
        }
    }
}

impl LayoutDriver {
    #[must_use]
    pub fn new(first_baseline: f32) -> Self {
        Self {
            first_baseline,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_caret_width(mut self, width: f32) -> Self {
        self.caret_width = width;
        self
    }

    /// Paint every line, each one starting where the previous line's
    /// wrapped height ends, then the caret when the selection is collapsed
    /// and the caret is visible.
    pub fn repaint(
        &self,
        document: &Document,
        max_width: f32,
        selection: &SelectionModel,
        state: PaintState,
        surface: &mut dyn DrawingSurface,
    ) -> Result<RepaintStats> {
        let _span = debug_span!("repaint", max_width, lines = document.line_count()).entered();

        let mut y = self.first_baseline;
        let mut baselines = Vec::with_capacity(document.line_count());
        for (index, line) in document.lines().iter().enumerate() {
            baselines.push(y);
            let view = (!selection.is_collapsed()).then(|| selection.for_line(index, state.focused));
            y += line.render(y, max_width, view.as_ref(), surface)?;
        }

        let mut caret_painted = false;
        if selection.is_collapsed() && state.caret_visible {
            let caret = selection.caret();
            let target = document.line(caret.line).and_then(|line| {
                let placement = line.caret_position(caret.block, caret.char, max_width)?;
                Some((line.run(caret.block)?, placement, *baselines.get(caret.line)?))
            });
            if let Some((run, placement, line_y)) = target {
                let (top, height) = run.band(line_y + placement.baseline_offset);
                surface.fill_rect(
                    Rect::new(placement.x, top, self.caret_width, height),
                    run.colors().text,
                );
                caret_painted = true;
            }
        }

        let stats = RepaintStats {
            lines: document.line_count(),
            height: y - self.first_baseline,
            caret_painted,
        };
        debug!(height = stats.height, caret_painted, "repaint finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{GlyphWidthCache, Measurer};
    use crate::run::RunFont;
    use crate::selection::TextPoint;
    use crate::surface::{DrawCommand, HeadlessSurface};
    use yawe_style::{RunColors, StyleFlags};

    fn setup(text: &str) -> (Document, HeadlessSurface) {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let doc = Document::from_text(
            text,
            &RunFont::new("serif", 20),
            StyleFlags::NONE,
            RunColors::default().background(None),
            &mut Measurer::new(&mut cache, &mut surface),
        )
        .unwrap();
        surface.take_commands();
        (doc, surface)
    }

    fn text_ys(surface: &HeadlessSurface) -> Vec<f32> {
        surface
            .commands()
            .iter()
            .filter_map(|cmd| match cmd {
                DrawCommand::FillText { y, .. } => Some(*y),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn lines_stack_by_wrapped_height() {
        let (doc, mut surface) = setup("Hello world!\nab");
        let stats = LayoutDriver::default()
            .repaint(&doc, 70.0, &SelectionModel::new(), PaintState::default(), &mut surface)
            .unwrap();
        assert_eq!(stats.lines, 2);
        assert_eq!(stats.height, 72.0);
        assert_eq!(text_ys(&surface), vec![24.0, 48.0, 72.0]);
    }

    #[test]
    fn collapsed_visible_caret_is_painted() {
        let (doc, mut surface) = setup("abc");
        let mut sel = SelectionModel::new();
        sel.collapse_to(TextPoint::new(0, 0, 2));
        let stats = LayoutDriver::default()
            .with_caret_width(2.0)
            .repaint(&doc, 500.0, &sel, PaintState::default(), &mut surface)
            .unwrap();
        assert!(stats.caret_painted);
        let rects = surface.filled_rects();
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].0.x, 20.0);
        assert_eq!(rects[0].0.width, 2.0);
        assert_eq!(rects[0].1, RunColors::default().text);
    }

    #[test]
    fn hidden_caret_is_skipped() {
        let (doc, mut surface) = setup("abc");
        let state = PaintState {
            focused: true,
            caret_visible: false,
        };
        let stats = LayoutDriver::default()
            .repaint(&doc, 500.0, &SelectionModel::new(), state, &mut surface)
            .unwrap();
        assert!(!stats.caret_painted);
        assert!(surface.filled_rects().is_empty());
    }

    #[test]
    fn range_selection_paints_highlight_not_caret() {
        let (doc, mut surface) = setup("abcd\nef");
        let mut sel = SelectionModel::new();
        sel.set_range(TextPoint::new(0, 0, 2), TextPoint::new(1, 0, 1), true);
        let stats = LayoutDriver::default()
            .repaint(&doc, 500.0, &sel, PaintState::default(), &mut surface)
            .unwrap();
        assert!(!stats.caret_painted);
        assert_eq!(surface.painted_text(), vec!["ab", "cd", "e", "f"]);
        let blurred = RunColors::default().selection_background.blurred;
        assert!(surface.filled_rects().iter().all(|(_, color)| *color == blurred));
        assert_eq!(surface.filled_rects().len(), 2);
    }

    #[test]
    fn caret_at_end_of_long_line_stays_on_last_row() {
        let (doc, mut surface) = setup("Hello world!");
        let mut sel = SelectionModel::new();
        sel.collapse_to(TextPoint::new(0, 0, 12));
        LayoutDriver::default()
            .repaint(&doc, 70.0, &sel, PaintState::default(), &mut surface)
            .unwrap();
        let (rect, _) = surface.filled_rects()[0];
        assert_eq!(rect.x, 50.0);
        assert!(rect.y > 24.0);
        assert!(rect.right() <= 70.0);
    }

    #[test]
    fn caret_on_wrapped_row() {
        let (doc, mut surface) = setup("Hello world!");
        let mut sel = SelectionModel::new();
        sel.collapse_to(TextPoint::new(0, 0, 9));
        LayoutDriver::new(30.0)
            .repaint(&doc, 70.0, &sel, PaintState::default(), &mut surface)
            .unwrap();
        let (rect, _) = surface.filled_rects()[0];
        assert_eq!(rect.x, 20.0);
        assert!(rect.y > 30.0);
    }
}
