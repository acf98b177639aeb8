#![forbid(unsafe_code)]

//! Top-to-bottom sequence of logical lines.

use tracing::debug;
use yawe_style::{RunColors, StyleFlags};

use crate::cache::Measurer;
use crate::error::{LayoutError, Result};
use crate::line::WrappedLine;
use crate::run::{RunFont, StyledRun};

/// An ordered, non-empty list of [`WrappedLine`]s.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<WrappedLine>,
}

impl Document {
    #[must_use]
    pub fn new(line: WrappedLine) -> Self {
        Self { lines: vec![line] }
    }

    pub fn from_lines(lines: Vec<WrappedLine>) -> Result<Self> {
        if lines.is_empty() {
            return Err(LayoutError::MissingArgument {
                operation: "Document::from_lines",
                argument: "lines",
            });
        }
        Ok(Self { lines })
    }

    /// One single-run line per `\n`-separated segment of `text`.
    pub fn from_text(
        text: &str,
        font: &RunFont,
        style: StyleFlags,
        colors: RunColors,
        measurer: &mut Measurer<'_>,
    ) -> Result<Self> {
        let lines = text
            .split('\n')
            .map(|segment| {
                StyledRun::new(segment, font.clone(), style, colors, measurer).map(WrappedLine::new)
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(lines = lines.len(), "document built from text");
        Self::from_lines(lines)
    }

    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[WrappedLine] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&WrappedLine> {
        self.lines.get(index)
    }

    pub fn line_mut(&mut self, index: usize) -> Option<&mut WrappedLine> {
        self.lines.get_mut(index)
    }

    /// Number of logical lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Insert `ch` at `position` of line `line`; returns the run coordinate
    /// just after the new character.
    pub fn insert_char(
        &mut self,
        line: usize,
        position: usize,
        ch: char,
        measurer: &mut Measurer<'_>,
    ) -> Result<(usize, usize)> {
        self.line_mut_checked("Document::insert_char", line)?
            .insert_char(ch, position, measurer)
    }

    pub fn remove_char(&mut self, line: usize, position: usize) -> Result<char> {
        self.line_mut_checked("Document::remove_char", line)?
            .remove_char(position)
    }

    /// Break line `line` at `position`; the tail becomes line `line + 1`.
    pub fn split_line(&mut self, line: usize, position: usize) -> Result<()> {
        let tail = self
            .line_mut_checked("Document::split_line", line)?
            .split_off(position)?;
        self.lines.insert(line + 1, tail);
        Ok(())
    }

    /// Append line `line + 1` to line `line`. Returns the length line
    /// `line` had before the join.
    pub fn join_with_next(&mut self, line: usize) -> Result<usize> {
        if line + 1 >= self.lines.len() {
            return Err(LayoutError::Index {
                operation: "Document::join_with_next",
                index: line + 1,
                len: self.lines.len(),
            });
        }
        let next = self.lines.remove(line + 1);
        let target = &mut self.lines[line];
        let joint = target.len();
        target.append(next);
        Ok(joint)
    }

    /// Sum of every line's wrapped height.
    #[must_use]
    pub fn total_height(&self, max_width: f32) -> f32 {
        self.lines.iter().map(|line| line.total_height(max_width)).sum()
    }

    /// Lines joined with `\n`.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        self.lines
            .iter()
            .map(WrappedLine::to_plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.lines.iter().map(WrappedLine::to_html_fragment).collect()
    }

    fn line_mut_checked(
        &mut self,
        operation: &'static str,
        line: usize,
    ) -> Result<&mut WrappedLine> {
        let len = self.lines.len();
        self.lines.get_mut(line).ok_or(LayoutError::Index {
            operation,
            index: line,
            len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::GlyphWidthCache;
    use crate::surface::HeadlessSurface;

    fn doc(text: &str) -> (Document, GlyphWidthCache, HeadlessSurface) {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let doc = Document::from_text(
            text,
            &RunFont::new("serif", 20),
            StyleFlags::NONE,
            RunColors::default(),
            &mut Measurer::new(&mut cache, &mut surface),
        )
        .unwrap();
        (doc, cache, surface)
    }

    #[test]
    fn from_text_splits_lines() {
        let (doc, _, _) = doc("one\ntwo\n");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.to_plain_text(), "one\ntwo\n");
        assert_eq!(doc.total_height(500.0), 72.0);
    }

    #[test]
    fn from_lines_rejects_empty() {
        assert!(matches!(
            Document::from_lines(Vec::new()),
            Err(LayoutError::MissingArgument { argument: "lines", .. })
        ));
    }

    #[test]
    fn edits_address_lines() {
        let (mut doc, mut cache, mut surface) = doc("ab\ncd");
        let mut m = Measurer::new(&mut cache, &mut surface);
        doc.insert_char(1, 2, '!', &mut m).unwrap();
        assert_eq!(doc.remove_char(0, 0).unwrap(), 'a');
        assert_eq!(doc.to_plain_text(), "b\ncd!");
        assert!(matches!(
            doc.insert_char(2, 0, 'x', &mut m),
            Err(LayoutError::Index { index: 2, len: 2, .. })
        ));
    }

    #[test]
    fn split_and_join_lines() {
        let (mut doc, _, _) = doc("hello");
        doc.split_line(0, 2).unwrap();
        assert_eq!(doc.to_plain_text(), "he\nllo");
        assert_eq!(doc.join_with_next(0).unwrap(), 2);
        assert_eq!(doc.to_plain_text(), "hello");
        assert!(doc.join_with_next(0).is_err());
    }

    #[test]
    fn html_concatenates_fragments() {
        let (doc, _, _) = doc("a\nb");
        assert_eq!(doc.to_html().matches("<br/>").count(), 2);
    }
}
