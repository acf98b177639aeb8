#![forbid(unsafe_code)]

//! Per-font glyph width memoization.
//!
//! Each (font, character) pair is measured on the drawing surface once and
//! reused afterwards. There is no eviction: an editing session touches a
//! small alphabet per font, and [`GlyphWidthCache::clear`] is called when
//! the editor's font identity changes.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use yawe_style::FontDescriptor;

use crate::error::Result;
use crate::surface::DrawingSurface;

/// Hit/miss counters for a [`GlyphWidthCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Distinct fonts with at least one cached glyph.
    pub fonts: usize,
    /// Cached (font, character) pairs.
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Font → character → width map.
#[derive(Debug, Default, Clone)]
pub struct GlyphWidthCache {
    fonts: FxHashMap<FontDescriptor, FxHashMap<char, f32>>,
    hits: u64,
    misses: u64,
}

impl GlyphWidthCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Width of `ch` in the font named by the descriptor string `font`.
    ///
    /// Fails with [`LayoutError::InvalidFont`](crate::LayoutError::InvalidFont)
    /// before touching the cache when `font` does not parse.
    pub fn width_of(
        &mut self,
        font: &str,
        ch: char,
        surface: &mut dyn DrawingSurface,
    ) -> Result<f32> {
        let descriptor = FontDescriptor::parse(font)?;
        Ok(self.width_for(&descriptor, ch, surface))
    }

    /// Width of `ch` in an already validated font.
    pub fn width_for(
        &mut self,
        font: &FontDescriptor,
        ch: char,
        surface: &mut dyn DrawingSurface,
    ) -> f32 {
        if let Some(width) = self.fonts.get(font).and_then(|glyphs| glyphs.get(&ch)) {
            self.hits += 1;
            return *width;
        }

        self.misses += 1;
        surface.set_font(font);
        let mut buf = [0u8; 4];
        let width = surface.measure_text(ch.encode_utf8(&mut buf));
        trace!(font = %font, ?ch, width, "glyph width cache miss");

        match self.fonts.get_mut(font) {
            Some(glyphs) => {
                glyphs.insert(ch, width);
            }
            None => {
                let mut glyphs = FxHashMap::default();
                glyphs.insert(ch, width);
                self.fonts.insert(font.clone(), glyphs);
            }
        }
        width
    }

    /// Cached width without measuring.
    #[must_use]
    pub fn get(&self, font: &FontDescriptor, ch: char) -> Option<f32> {
        self.fonts.get(font)?.get(&ch).copied()
    }

    /// Number of cached (font, character) pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fonts.values().map(FxHashMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Drop every cached width (font identity changed).
    pub fn clear(&mut self) {
        debug!(fonts = self.fonts.len(), "glyph width cache cleared");
        self.fonts.clear();
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            fonts: self.fonts.len(),
            entries: self.len(),
        }
    }
}

/// Borrowed pair of cache and surface used while mutating runs.
///
/// Runs measure every inserted character; bundling the two keeps run
/// signatures short and makes it impossible to measure without caching.
pub struct Measurer<'a> {
    cache: &'a mut GlyphWidthCache,
    surface: &'a mut dyn DrawingSurface,
}

impl<'a> Measurer<'a> {
    pub fn new(cache: &'a mut GlyphWidthCache, surface: &'a mut dyn DrawingSurface) -> Self {
        Self { cache, surface }
    }

    /// Width of `ch` in `font`, through the cache.
    pub fn width(&mut self, font: &FontDescriptor, ch: char) -> f32 {
        self.cache.width_for(font, ch, &mut *self.surface)
    }

    #[must_use]
    pub fn cache(&self) -> &GlyphWidthCache {
        self.cache
    }
}

impl std::fmt::Debug for Measurer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Measurer")
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::surface::HeadlessSurface;
    use tracing_test::traced_test;

    #[test]
    fn first_lookup_measures_then_hits() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        assert_eq!(cache.width_of("20px serif", 'a', &mut surface).unwrap(), 10.0);
        assert_eq!(cache.width_of("20px serif", 'a', &mut surface).unwrap(), 10.0);
        assert_eq!(surface.measure_calls(), 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn fonts_are_cached_separately() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let plain = cache.width_of("20px serif", 'a', &mut surface).unwrap();
        let bold = cache.width_of("bold 20px serif", 'a', &mut surface).unwrap();
        assert_eq!(plain, 10.0);
        assert_eq!(bold, 11.0);
        assert_eq!(cache.stats().fonts, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalid_font_is_rejected_without_insertion() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let err = cache.width_of("serif", 'a', &mut surface).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidFont(_)));
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 0);
        assert_eq!(surface.measure_calls(), 0);
    }

    #[test]
    fn clear_forces_remeasure() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        cache.width_of("10px mono", 'x', &mut surface).unwrap();
        cache.clear();
        assert!(cache.is_empty());
        cache.width_of("10px mono", 'x', &mut surface).unwrap();
        assert_eq!(surface.measure_calls(), 2);
    }

    #[test]
    fn get_does_not_measure() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let font = FontDescriptor::parse("10px mono").unwrap();
        assert_eq!(cache.get(&font, 'x'), None);
        cache.width_for(&font, 'x', &mut surface);
        assert_eq!(cache.get(&font, 'x'), Some(5.0));
    }

    #[test]
    fn measurer_routes_through_cache() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        let font = FontDescriptor::parse("10px mono").unwrap();
        {
            let mut m = Measurer::new(&mut cache, &mut surface);
            assert_eq!(m.width(&font, 'q'), 5.0);
            assert_eq!(m.width(&font, 'q'), 5.0);
            assert_eq!(m.cache().stats().hits, 1);
        }
        assert_eq!(surface.measure_calls(), 1);
    }

    #[traced_test]
    #[test]
    fn miss_is_traced() {
        let mut cache = GlyphWidthCache::new();
        let mut surface = HeadlessSurface::new();
        cache.width_of("10px mono", 'z', &mut surface).unwrap();
        assert!(logs_contain("glyph width cache miss"));
    }
}
