//! Text measurement and glyph outlines using cosmic-text.

use crate::font_config::FontConfig;
use crate::style::{FontSlant, FontSpec, TextExtents};
use cosmic_text::{
    Attrs, Buffer, CacheKeyFlags, Command, Family, FontSystem, Metrics, Shaping, Style,
    SwashCache, Weight,
};

/// Shapes text for every surface.
///
/// Owns the cosmic-text font system built from a [`FontConfig`].
pub struct TextEngine {
    font_system: FontSystem,
    swash_cache: SwashCache,
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("faces", &self.font_system.db().len())
            .finish()
    }
}

impl TextEngine {
    pub fn new(config: &FontConfig) -> Self {
        Self::from_database(config.to_fontdb())
    }

    pub fn from_database(db: fontdb::Database) -> Self {
        Self {
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), db),
            swash_cache: SwashCache::new(),
        }
    }

    pub fn database(&self) -> &fontdb::Database {
        self.font_system.db()
    }

    fn shape(&mut self, font: &FontSpec, text: &str) -> Buffer {
        let size = font.size as f32;
        let metrics = Metrics::new(size, size * 1.2);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);

        // Hinting is disabled to match SVG and PDF text, which usvg never hints
        let attrs = Attrs::new()
            .family(family_for(&font.family))
            .weight(Weight(font.weight.0))
            .style(style_for(font.slant))
            .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }

    /// Logical extents of `text`.
    pub fn measure(&mut self, font: &FontSpec, text: &str) -> TextExtents {
        // cosmic-text rejects a zero line height
        if !(font.size > 0.0) {
            return TextExtents::default();
        }
        let buffer = self.shape(font, text);

        let mut width: f32 = 0.0;
        let mut ascent: f32 = 0.0;
        let mut descent: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            ascent = ascent.max(run.line_y - run.line_top);
            descent = descent.max((run.line_top + run.line_height) - run.line_y);
        }

        let size = font.size;
        if ascent == 0.0 && descent == 0.0 {
            return TextExtents {
                width: width as f64,
                ascent: size * 0.8,
                descent: size * 0.2,
            };
        }
        TextExtents {
            width: width as f64,
            ascent: ascent as f64,
            descent: descent as f64,
        }
    }

    /// Glyph outlines of `text` as one path, baseline starting at the origin
    /// and Y pointing down.
    pub fn outline(&mut self, font: &FontSpec, text: &str) -> Option<tiny_skia::Path> {
        if !(font.size > 0.0) {
            return None;
        }
        let buffer = self.shape(font, text);
        let mut path_builder = tiny_skia::PathBuilder::new();

        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical_glyph = glyph.physical((0.0, 0.0), 1.0);
                let gx = glyph.x + glyph.font_size * glyph.x_offset;
                let gy = glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical_glyph.cache_key)
                else {
                    continue;
                };

                // Font outlines have Y pointing up, so Y is negated
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => path_builder.move_to(gx + p.x, gy - p.y),
                        Command::LineTo(p) => path_builder.line_to(gx + p.x, gy - p.y),
                        Command::QuadTo(ctrl, end) => {
                            path_builder.quad_to(gx + ctrl.x, gy - ctrl.y, gx + end.x, gy - end.y)
                        }
                        Command::CurveTo(c1, c2, end) => path_builder.cubic_to(
                            gx + c1.x,
                            gy - c1.y,
                            gx + c2.x,
                            gy - c2.y,
                            gx + end.x,
                            gy - end.y,
                        ),
                        Command::Close => path_builder.close(),
                    }
                }
            }
        }

        path_builder.finish()
    }
}

fn family_for(name: &str) -> Family<'_> {
    match name {
        "sans-serif" | "sans" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" | "mono" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

fn style_for(slant: FontSlant) -> Style {
    match slant {
        FontSlant::Normal => Style::Normal,
        FontSlant::Italic => Style::Italic,
        FontSlant::Oblique => Style::Oblique,
    }
}
