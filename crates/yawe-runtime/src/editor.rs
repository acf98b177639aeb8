#![forbid(unsafe_code)]

//! Per-instance editor context.
//!
//! [`EditorState`] owns everything one editor needs: its configuration,
//! document, selection, glyph width cache and timers. Nothing is shared
//! between instances. The host forwards focus, blur, resize, tick and
//! typing events and repaints when asked.

use tracing::{debug, info, instrument};
use web_time::{Duration, Instant};
use yawe_style::StyleFlags;
use yawe_text::{
    CacheStats, Document, DrawingSurface, GlyphWidthCache, LayoutDriver, LayoutError, Measurer,
    PaintState, RepaintStats, SelectionModel, StyledRun, TextPoint, WrappedLine,
};

use crate::config::EditorConfig;
use crate::error::Result;
use crate::scheduler::{BlinkTimer, ResizeAction, ResizeDebouncer};

/// What a [`EditorState::tick_at`] call changed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TickOutcome {
    /// New viewport width after a debounced resize.
    pub resized: Option<f32>,
    pub blink_toggled: bool,
}

impl TickOutcome {
    #[must_use]
    pub fn needs_repaint(&self) -> bool {
        self.resized.is_some() || self.blink_toggled
    }
}

/// One editor's complete state.
#[derive(Debug)]
pub struct EditorState {
    config: EditorConfig,
    document: Document,
    selection: SelectionModel,
    cache: GlyphWidthCache,
    resize: ResizeDebouncer,
    blink: BlinkTimer,
    focused: bool,
}

impl EditorState {
    /// Build an editor showing `text` in a viewport `width` pixels wide.
    pub fn new(
        config: EditorConfig,
        text: &str,
        width: f32,
        surface: &mut dyn DrawingSurface,
    ) -> Result<Self> {
        let mut cache = GlyphWidthCache::new();
        let document = Self::build_document(&config, text, &mut cache, surface)?;
        info!(
            font = %config.font_family(),
            size = config.font_size(),
            width,
            "editor created"
        );
        Ok(Self {
            resize: ResizeDebouncer::new(config.resize_debounce(), width),
            blink: BlinkTimer::new(config.blink_interval()),
            config,
            document,
            selection: SelectionModel::new(),
            cache,
            focused: false,
        })
    }

    fn build_document(
        config: &EditorConfig,
        text: &str,
        cache: &mut GlyphWidthCache,
        surface: &mut dyn DrawingSurface,
    ) -> std::result::Result<Document, LayoutError> {
        Document::from_text(
            text,
            &config.run_font(),
            StyleFlags::NONE,
            config.run_colors(),
            &mut Measurer::new(cache, surface),
        )
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn viewport_width(&self) -> f32 {
        self.resize.applied_width()
    }

    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    #[must_use]
    pub fn caret_visible(&self) -> bool {
        self.focused && self.blink.caret_visible()
    }

    /// Replace the document with `text` and collapse the selection at the
    /// origin.
    pub fn reset(&mut self, text: &str, surface: &mut dyn DrawingSurface) -> Result<()> {
        self.document = Self::build_document(&self.config, text, &mut self.cache, surface)?;
        self.selection = SelectionModel::new();
        debug!(lines = self.document.line_count(), "document reset");
        Ok(())
    }

    /// Switch to `config`. A font change clears the width cache; any font
    /// or color change restyles every run (emphasis is kept).
    #[instrument(skip_all, level = "debug")]
    pub fn set_config(
        &mut self,
        config: EditorConfig,
        surface: &mut dyn DrawingSurface,
        now: Instant,
    ) -> Result<()> {
        let restyle = self.config.run_font() != config.run_font()
            || self.config.run_colors() != config.run_colors();
        if self.config.font_changed(&config) {
            self.cache.clear();
        }
        self.blink.set_interval(config.blink_interval(), now);
        self.resize.set_debounce(config.resize_debounce());
        self.config = config;
        if restyle {
            self.restyle(surface)?;
        }
        Ok(())
    }

    /// Apply one host attribute, see [`EditorConfig::apply_attribute`].
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: Option<&str>,
        surface: &mut dyn DrawingSurface,
        now: Instant,
    ) -> Result<()> {
        let config = self.config.apply_attribute(name, value)?;
        self.set_config(config, surface, now)
    }

    fn restyle(&mut self, surface: &mut dyn DrawingSurface) -> Result<()> {
        let font = self.config.run_font();
        let colors = self.config.run_colors();
        let mut measurer = Measurer::new(&mut self.cache, surface);
        let lines = self
            .document
            .lines()
            .iter()
            .map(|line| {
                let runs = line
                    .runs()
                    .iter()
                    .map(|run| {
                        StyledRun::new(
                            &run.to_plain_text(),
                            font.clone(),
                            run.style(),
                            colors,
                            &mut measurer,
                        )
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                WrappedLine::from_runs(runs)
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.document = Document::from_lines(lines)?;
        debug!("runs restyled");
        Ok(())
    }

    pub fn on_focus(&mut self) {
        self.on_focus_at(Instant::now());
    }

    /// Gain focus: show the caret and start blinking.
    pub fn on_focus_at(&mut self, now: Instant) {
        self.focused = true;
        self.blink.focus_at(now);
    }

    /// Lose focus: hide the caret and stop blinking.
    pub fn on_blur(&mut self) {
        self.focused = false;
        self.blink.blur();
    }

    pub fn on_resize(&mut self, width: f32) -> ResizeAction {
        self.on_resize_at(width, Instant::now())
    }

    pub fn on_resize_at(&mut self, width: f32, now: Instant) -> ResizeAction {
        self.resize.handle_resize_at(width, now)
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(Instant::now())
    }

    /// Advance both timers.
    pub fn tick_at(&mut self, now: Instant) -> TickOutcome {
        let resized = match self.resize.tick_at(now) {
            ResizeAction::Apply { width, .. } => Some(width),
            ResizeAction::None | ResizeAction::Scheduled => None,
        };
        TickOutcome {
            resized,
            blink_toggled: self.blink.tick_at(now),
        }
    }

    /// How long the host may sleep before the next [`Self::tick_at`].
    #[must_use]
    pub fn next_deadline(&self, now: Instant) -> Option<Duration> {
        match (
            self.resize.time_until_apply(now),
            self.blink.time_until_toggle(now),
        ) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Paint the document, selection and caret at the current viewport width.
    pub fn repaint(&self, surface: &mut dyn DrawingSurface) -> Result<RepaintStats> {
        let state = PaintState {
            focused: self.focused,
            caret_visible: self.caret_visible(),
        };
        let stats = LayoutDriver::new(self.config.line_height()).repaint(
            &self.document,
            self.viewport_width(),
            &self.selection,
            state,
            surface,
        )?;
        Ok(stats)
    }

    /// Wrapped height of the document at the current viewport width.
    #[must_use]
    pub fn total_height(&self) -> f32 {
        self.document.total_height(self.viewport_width())
    }

    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.document.to_plain_text()
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }

    /// Select from `start` to `end`; both points must exist.
    pub fn select(&mut self, start: TextPoint, end: TextPoint, left_to_right: bool) -> Result<()> {
        self.line_position("EditorState::select", start)?;
        self.line_position("EditorState::select", end)?;
        self.selection.set_range(start, end, left_to_right);
        Ok(())
    }

    /// Place a collapsed cursor at `point`.
    pub fn set_caret(&mut self, point: TextPoint) -> Result<()> {
        self.line_position("EditorState::set_caret", point)?;
        self.selection.collapse_to(point);
        Ok(())
    }

    /// Type `ch` at the caret, replacing any selection. `'\n'` breaks the
    /// line.
    pub fn insert_char(&mut self, ch: char, surface: &mut dyn DrawingSurface) -> Result<()> {
        if !self.selection.is_collapsed() {
            self.delete_selection()?;
        }
        let caret = self.selection.caret();
        let position = self.line_position("EditorState::insert_char", caret)?;
        if ch == '\n' {
            self.document.split_line(caret.line, position)?;
            self.selection.collapse_to(TextPoint::new(caret.line + 1, 0, 0));
            return Ok(());
        }
        let mut measurer = Measurer::new(&mut self.cache, surface);
        let (block, char) = self
            .document
            .insert_char(caret.line, position, ch, &mut measurer)?;
        self.selection.collapse_to(TextPoint::new(caret.line, block, char));
        Ok(())
    }

    /// Delete the selection, or the character before the caret; at the
    /// start of a line, join it to the previous one.
    pub fn backspace(&mut self) -> Result<()> {
        if !self.selection.is_collapsed() {
            return self.delete_selection();
        }
        let caret = self.selection.caret();
        let position = self.line_position("EditorState::backspace", caret)?;
        if position > 0 {
            self.document.remove_char(caret.line, position - 1)?;
            self.collapse_at(caret.line, position - 1)?;
        } else if caret.line > 0 {
            let joint = self.document.join_with_next(caret.line - 1)?;
            self.collapse_at(caret.line - 1, joint)?;
        }
        Ok(())
    }

    /// Remove the selected text and collapse the caret at its start.
    pub fn delete_selection(&mut self) -> Result<()> {
        let (start, end) = self.selection.ordered();
        let from = self.line_position("EditorState::delete_selection", start)?;
        let mut to = self.line_position("EditorState::delete_selection", end)?;
        for line in start.line..end.line {
            to += self.document.line(line).map_or(0, WrappedLine::len);
        }
        for _ in start.line..end.line {
            self.document.join_with_next(start.line)?;
        }
        for _ in from..to {
            self.document.remove_char(start.line, from)?;
        }
        debug!(removed = to - from, "selection deleted");
        self.collapse_at(start.line, from)
    }

    fn collapse_at(&mut self, line: usize, position: usize) -> Result<()> {
        let (block, char) = self
            .document
            .line(line)
            .ok_or(LayoutError::Index {
                operation: "EditorState::collapse_at",
                index: line,
                len: self.document.line_count(),
            })?
            .point_at(position)?;
        self.selection.collapse_to(TextPoint::new(line, block, char));
        Ok(())
    }

    fn line_position(&self, operation: &'static str, point: TextPoint) -> Result<usize> {
        let line = self.document.line(point.line).ok_or(LayoutError::Index {
            operation,
            index: point.line,
            len: self.document.line_count(),
        })?;
        let position = line
            .position_of(point.block, point.char)
            .ok_or(LayoutError::Index {
                operation,
                index: point.char,
                len: line.run(point.block).map_or(0, StyledRun::len),
            })?;
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yawe_style::Color;
    use yawe_text::HeadlessSurface;

    fn editor(text: &str) -> (EditorState, HeadlessSurface) {
        let mut surface = HeadlessSurface::new();
        let state = EditorState::new(EditorConfig::default(), text, 800.0, &mut surface).unwrap();
        (state, surface)
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn starts_unfocused_with_collapsed_selection() {
        let (state, _) = editor("Hello world!");
        assert!(!state.is_focused());
        assert!(!state.caret_visible());
        assert!(state.selection().is_collapsed());
        assert_eq!(state.to_plain_text(), "Hello world!");
        assert_eq!(state.total_height(), 24.0);
    }

    #[test]
    fn typing_moves_caret() {
        let (mut state, mut surface) = editor("");
        for ch in "abc".chars() {
            state.insert_char(ch, &mut surface).unwrap();
        }
        assert_eq!(state.to_plain_text(), "abc");
        assert_eq!(state.selection().caret(), TextPoint::new(0, 0, 3));
        state.backspace().unwrap();
        assert_eq!(state.to_plain_text(), "ab");
        assert_eq!(state.selection().caret(), TextPoint::new(0, 0, 2));
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let (mut state, mut surface) = editor("abcd");
        state.set_caret(TextPoint::new(0, 0, 2)).unwrap();
        state.insert_char('\n', &mut surface).unwrap();
        assert_eq!(state.to_plain_text(), "ab\ncd");
        assert_eq!(state.selection().caret(), TextPoint::new(1, 0, 0));
        state.backspace().unwrap();
        assert_eq!(state.to_plain_text(), "abcd");
        assert_eq!(state.selection().caret(), TextPoint::new(0, 0, 2));
        state.set_caret(TextPoint::ORIGIN).unwrap();
        state.backspace().unwrap();
        assert_eq!(state.to_plain_text(), "abcd");
    }

    #[test]
    fn typing_replaces_selection_across_lines() {
        let (mut state, mut surface) = editor("hello\nbig\nworld");
        state
            .select(TextPoint::new(0, 0, 2), TextPoint::new(2, 0, 3), true)
            .unwrap();
        state.insert_char('X', &mut surface).unwrap();
        assert_eq!(state.to_plain_text(), "heXld");
        assert_eq!(state.selection().caret(), TextPoint::new(0, 0, 3));
    }

    #[test]
    fn select_rejects_missing_points() {
        let (mut state, _) = editor("ab");
        assert!(state.select(TextPoint::ORIGIN, TextPoint::new(0, 0, 3), true).is_err());
        assert!(state.set_caret(TextPoint::new(1, 0, 0)).is_err());
        assert!(state.selection().is_collapsed());
    }

    #[test]
    fn focus_blur_drive_caret() {
        let start = Instant::now();
        let (mut state, _) = editor("x");
        state.on_focus_at(start);
        assert!(state.caret_visible());
        assert_eq!(state.next_deadline(start), Some(ms(500)));
        let tick = state.tick_at(start + ms(500));
        assert!(tick.blink_toggled && tick.needs_repaint());
        assert!(!state.caret_visible());
        state.on_blur();
        assert!(!state.caret_visible());
        assert_eq!(state.next_deadline(start + ms(600)), None);
    }

    #[test]
    fn resize_is_debounced() {
        let start = Instant::now();
        let (mut state, _) = editor("Hello world!");
        assert_eq!(state.on_resize_at(70.0, start), ResizeAction::Scheduled);
        assert_eq!(state.viewport_width(), 800.0);
        assert!(!state.tick_at(start + ms(50)).needs_repaint());
        let tick = state.tick_at(start + ms(100));
        assert_eq!(tick.resized, Some(70.0));
        assert_eq!(state.total_height(), 48.0);
    }

    #[test]
    fn repaint_paints_caret_only_when_focused() {
        let (mut state, mut surface) = editor("Hi");
        surface.take_commands();
        assert!(!state.repaint(&mut surface).unwrap().caret_painted);
        state.on_focus_at(Instant::now());
        assert!(state.repaint(&mut surface).unwrap().caret_painted);
    }

    #[test]
    fn font_change_clears_cache_and_remeasures() {
        let now = Instant::now();
        let (mut state, mut surface) = editor("ab");
        state.set_caret(TextPoint::new(0, 0, 1)).unwrap();
        let before = state.cache_stats();
        assert!(before.entries > 0);
        state
            .set_attribute("font-size", Some("40"), &mut surface, now)
            .unwrap();
        let run = &state.document().lines()[0].runs()[0];
        assert_eq!(run.width(), 40.0);
        assert_eq!(state.config().line_height(), 48.0);
        assert_eq!(state.cache_stats().fonts, 1);
        assert_eq!(state.selection().caret(), TextPoint::new(0, 0, 1));
    }

    #[test]
    fn color_change_restyles_without_clearing_cache() {
        let now = Instant::now();
        let (mut state, mut surface) = editor("ab");
        let misses = state.cache_stats().misses;
        state
            .set_attribute("color", Some("#000000"), &mut surface, now)
            .unwrap();
        assert_eq!(
            state.document().lines()[0].runs()[0].colors().text,
            Color::BLACK
        );
        assert_eq!(state.cache_stats().misses, misses);
    }

    #[test]
    fn bad_attribute_leaves_state() {
        let now = Instant::now();
        let (mut state, mut surface) = editor("ab");
        let err = state
            .set_attribute("color", Some("red"), &mut surface, now)
            .unwrap_err();
        assert!(matches!(err, crate::EditorError::Config(_)));
        assert!(state.config().color_overrides().is_empty());
    }

    #[test]
    fn reset_replaces_document_and_selection() {
        let (mut state, mut surface) = editor("abc");
        state
            .select(TextPoint::ORIGIN, TextPoint::new(0, 0, 2), true)
            .unwrap();
        state.reset("one\ntwo", &mut surface).unwrap();
        assert_eq!(state.document().line_count(), 2);
        assert!(state.selection().is_collapsed());
        assert!(state.to_html().ends_with("<br/>\n"));
    }
}
