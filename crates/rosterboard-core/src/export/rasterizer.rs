//! Default board rasterizer using tiny-skia.
//!
//! Paints a [`BoardLayout`] as flat rectangles, grid lines and text, then
//! flattens the pixmap onto the background and encodes it as JPEG at the
//! requested quality. Text uses the bundled DejaVu Sans face through
//! `ab_glyph`.

use ab_glyph::{point, Font, FontRef, PxScale, PxScaleFont, ScaleFont};
use jpeg_encoder::{ColorType, Encoder};
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Rect, Stroke, Transform};
use tracing::debug;

use super::layout::{BoardLayout, GridLine, Shape, TextAlign, TextRun};
use super::{BoardRasterizer, BoardSnapshot, ExportArtifact, ExportError, ExportOptions, ImageFormat, Rgb};

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, Copy)]
pub struct TinySkiaRasterizer {
    font_data: &'static [u8],
}

impl TinySkiaRasterizer {
    pub fn new() -> Self {
        Self::with_font(BUNDLED_FONT)
    }

    /// Use another TrueType/OpenType face for board text.
    pub fn with_font(font_data: &'static [u8]) -> Self {
        Self { font_data }
    }

    fn font(&self) -> Result<FontRef<'static>, ExportError> {
        FontRef::try_from_slice(self.font_data).map_err(|e| ExportError::Font(e.to_string()))
    }

    /// Paint a layout onto a fresh pixmap.
    pub fn paint(&self, layout: &BoardLayout) -> Result<Pixmap, ExportError> {
        let font = self.font()?;
        let mut pixmap = Pixmap::new(layout.width, layout.height).ok_or(ExportError::Canvas {
            width: layout.width,
            height: layout.height,
        })?;
        pixmap.fill(color(layout.background));

        for shape in &layout.shapes {
            fill_shape(&mut pixmap, shape);
        }
        for line in &layout.lines {
            stroke_line(&mut pixmap, line);
        }
        for run in &layout.texts {
            draw_text(&mut pixmap, &font, run);
        }

        Ok(pixmap)
    }
}

impl Default for TinySkiaRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardRasterizer for TinySkiaRasterizer {
    fn render(
        &self,
        snapshot: &BoardSnapshot,
        options: &ExportOptions,
    ) -> Result<ExportArtifact, ExportError> {
        options.validate()?;

        let layout = BoardLayout::compute(snapshot, options);
        debug!(
            width = layout.width,
            height = layout.height,
            shapes = layout.shapes.len(),
            texts = layout.texts.len(),
            "Painting board layout"
        );
        let pixmap = self.paint(&layout)?;
        let bytes = encode_jpeg(&pixmap, layout.background, options.quality)?;

        Ok(ExportArtifact {
            bytes,
            format: ImageFormat::Jpeg,
            width: layout.width,
            height: layout.height,
        })
    }
}

/// JPEG encoder quality (1..=100) for an option in `0.0..=1.0`.
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn encode_jpeg(pixmap: &Pixmap, background: Rgb, quality: f32) -> Result<Vec<u8>, ExportError> {
    let canvas_error = || ExportError::Canvas {
        width: pixmap.width(),
        height: pixmap.height(),
    };
    let width = u16::try_from(pixmap.width()).map_err(|_| canvas_error())?;
    let height = u16::try_from(pixmap.height()).map_err(|_| canvas_error())?;

    let rgb = flatten(pixmap, background);
    let mut bytes = Vec::new();
    Encoder::new(&mut bytes, jpeg_quality(quality))
        .encode(&rgb, width, height, ColorType::Rgb)
        .map_err(|e| ExportError::Encode(e.to_string()))?;
    Ok(bytes)
}

/// Composite every pixel over `background`; JPEG has no alpha channel.
fn flatten(pixmap: &Pixmap, background: Rgb) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(pixmap.pixels().len() * 3);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        let alpha = c.alpha() as f32 / 255.0;
        let over = |src: u8, dst: u8| (src as f32 * alpha + dst as f32 * (1.0 - alpha)).round() as u8;
        rgb.push(over(c.red(), background.r));
        rgb.push(over(c.green(), background.g));
        rgb.push(over(c.blue(), background.b));
    }
    rgb
}

fn color(rgb: Rgb) -> Color {
    Color::from_rgba8(rgb.r, rgb.g, rgb.b, 255)
}

fn fill_shape(pixmap: &mut Pixmap, shape: &Shape) {
    let bounds = shape.bounds;
    // Degenerate rectangles are skipped rather than treated as errors
    if let Some(rect) = Rect::from_xywh(bounds.x, bounds.y, bounds.w, bounds.h) {
        let mut paint = Paint::default();
        paint.set_color(color(shape.fill));
        paint.anti_alias = false;
        pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn stroke_line(pixmap: &mut Pixmap, line: &GridLine) {
    let mut path_builder = PathBuilder::new();
    path_builder.move_to(line.x1, line.y1);
    path_builder.line_to(line.x2, line.y2);

    if let Some(path) = path_builder.finish() {
        let mut paint = Paint::default();
        paint.set_color(color(line.color));

        let stroke = Stroke {
            width: line.width,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }
}

fn text_width<F: Font>(font: &PxScaleFont<F>, text: &str) -> f32 {
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = font.glyph_id(c);
        if let Some(prev) = previous {
            width += font.kern(prev, id);
        }
        width += font.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Shorten `text` with an ellipsis until it fits `max_width`.
fn fit_text<F: Font>(font: &PxScaleFont<F>, text: &str, max_width: f32) -> String {
    if text_width(font, text) <= max_width {
        return text.to_string();
    }
    let mut chars: Vec<char> = text.chars().collect();
    while chars.pop().is_some() {
        let mut candidate: String = chars.iter().collect::<String>().trim_end().to_string();
        candidate.push(ELLIPSIS);
        if text_width(font, &candidate) <= max_width {
            return candidate;
        }
    }
    String::new()
}

fn draw_text(pixmap: &mut Pixmap, font: &FontRef<'static>, run: &TextRun) {
    let scale = PxScale::from(run.size);
    let scaled = font.as_scaled(scale);
    let text = fit_text(&scaled, &run.text, run.bounds.w);
    if text.is_empty() {
        return;
    }

    let width = text_width(&scaled, &text);
    let left = match run.align {
        TextAlign::Left => run.bounds.x,
        TextAlign::Center => run.bounds.x + (run.bounds.w - width) / 2.0,
    };
    let line_height = scaled.ascent() - scaled.descent();
    let baseline = run.bounds.y + (run.bounds.h - line_height) / 2.0 + scaled.ascent();

    let mut caret = left;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                blend_pixel(pixmap, x, y, run.color, coverage);
            });
        }
    }
}

/// Blend `color` over an opaque pixel by glyph coverage.
fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Rgb, coverage: f32) {
    if x < 0 || y < 0 || x as u32 >= pixmap.width() || y as u32 >= pixmap.height() {
        return;
    }
    let index = y as usize * pixmap.width() as usize + x as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index].demultiply();
    let a = coverage.clamp(0.0, 1.0);
    let mix = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
    if let Some(blended) = PremultipliedColorU8::from_rgba(
        mix(color.r, dst.red()),
        mix(color.g, dst.green()),
        mix(color.b, dst.blue()),
        255,
    ) {
        pixels[index] = blended;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::export::layout::ShapeKind;
    use crate::models::StaffDirectory;
    use crate::roster::RosterState;

    const JPEG_SOI: [u8; 3] = [0xFF, 0xD8, 0xFF];

    fn small_options() -> ExportOptions {
        ExportOptions {
            pixel_ratio: 0.5,
            ..ExportOptions::default()
        }
    }

    fn snapshot() -> BoardSnapshot {
        let directory = StaffDirectory::builtin();
        let mut roster = RosterState::new();
        roster.toggle("1st-T1_PTI".parse().unwrap(), "p1");
        roster.toggle("2nd-PCA".parse().unwrap(), "s2");
        BoardSnapshot::capture(&directory, &roster)
    }

    fn is_dark(pixmap: &Pixmap, x: u32, y: u32) -> bool {
        let p = pixmap.pixel(x, y).unwrap();
        p.red() < 160 && p.green() < 160
    }

    // -------------------------------------------------------------------------
    // Encoding
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_produces_dated_jpeg() {
        let artifact = TinySkiaRasterizer::new()
            .render(&snapshot(), &small_options())
            .unwrap();
        assert_eq!(artifact.format, ImageFormat::Jpeg);
        assert_eq!((artifact.width, artifact.height), (640, 480));
        assert_eq!(&artifact.bytes[..3], &JPEG_SOI);
        assert_eq!(&artifact.bytes[artifact.bytes.len() - 2..], &[0xFF, 0xD9]);

        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(artifact.file_name(date), "roster-2026-10-18.jpg");
    }

    #[test]
    fn test_quality_changes_output_size() {
        let rasterizer = TinySkiaRasterizer::new();
        let low = ExportOptions {
            quality: 0.2,
            ..small_options()
        };
        let high = ExportOptions {
            quality: 1.0,
            ..small_options()
        };
        let low = rasterizer.render(&snapshot(), &low).unwrap();
        let high = rasterizer.render(&snapshot(), &high).unwrap();
        assert!(low.bytes.len() < high.bytes.len());
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.95), 95);
        assert_eq!(jpeg_quality(1.0), 100);
        assert_eq!(jpeg_quality(0.0), 1);
    }

    #[test]
    fn test_flatten_composites_over_background() {
        let mut pixmap = Pixmap::new(1, 1).unwrap();
        pixmap.fill(Color::from_rgba8(0, 0, 0, 0));
        assert_eq!(flatten(&pixmap, Rgb::WHITE), vec![255, 255, 255]);

        pixmap.fill(Color::from_rgba8(0, 0, 255, 255));
        assert_eq!(flatten(&pixmap, Rgb::WHITE), vec![0, 0, 255]);
    }

    #[test]
    fn test_render_rejects_invalid_options() {
        let options = ExportOptions {
            pixel_ratio: -1.0,
            ..ExportOptions::default()
        };
        let result = TinySkiaRasterizer::new().render(&snapshot(), &options);
        assert!(matches!(result, Err(ExportError::InvalidOptions(_))));
    }

    #[test]
    fn test_unreadable_font_is_an_error() {
        let result = TinySkiaRasterizer::with_font(b"not a font").render(&snapshot(), &small_options());
        assert!(matches!(result, Err(ExportError::Font(_))));
    }

    // -------------------------------------------------------------------------
    // Painting
    // -------------------------------------------------------------------------

    #[test]
    fn test_magnets_are_painted_in_role_colors() {
        let rasterizer = TinySkiaRasterizer::new();
        let layout = BoardLayout::compute(&snapshot(), &small_options());
        let pixmap = rasterizer.paint(&layout).unwrap();

        for magnet in layout.magnets() {
            // Sample the top right corner, clear of the name
            let x = (magnet.bounds.x + magnet.bounds.w - 1.5) as u32;
            let y = (magnet.bounds.y + 1.5) as u32;
            let pixel = pixmap.pixel(x, y).unwrap();
            assert_eq!(
                (pixel.red(), pixel.green(), pixel.blue()),
                (magnet.fill.r, magnet.fill.g, magnet.fill.b),
                "magnet {:?}",
                magnet.kind
            );
        }
    }

    #[test]
    fn test_text_is_painted_inside_its_box() {
        let layout = BoardLayout::compute(&snapshot(), &ExportOptions::default());
        let pixmap = TinySkiaRasterizer::new().paint(&layout).unwrap();

        for label in ["PCA", "ALICE", "Physio FTE: 0.25"] {
            let run = layout.texts.iter().find(|t| t.text == label).unwrap();
            let b = run.bounds;
            let inked = (b.x as u32..(b.x + b.w) as u32)
                .flat_map(|x| (b.y as u32..(b.y + b.h) as u32).map(move |y| (x, y)))
                .any(|(x, y)| is_dark(&pixmap, x, y));
            assert!(inked, "no glyphs drawn for {}", label);
        }
    }

    #[test]
    fn test_long_text_is_ellipsized_to_fit() {
        let font = FontRef::try_from_slice(BUNDLED_FONT).unwrap();
        let scaled = font.as_scaled(PxScale::from(26.0));
        let fitted = fit_text(&scaled, "MAXIMILIANA VAN DER BERG", 150.0);
        assert!(fitted.ends_with(ELLIPSIS));
        assert!(text_width(&scaled, &fitted) <= 150.0);
        assert_eq!(fit_text(&scaled, "ALICE", 150.0), "ALICE");
    }

    #[test]
    fn test_background_is_white() {
        let layout = BoardLayout::compute(&snapshot(), &small_options());
        let pixmap = TinySkiaRasterizer::new().paint(&layout).unwrap();
        // Inside the outer margin nothing is drawn
        let pixel = pixmap.pixel(2, 2).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 255, 255));
        assert!(layout
            .shapes
            .iter()
            .any(|s| matches!(s.kind, ShapeKind::Footer)));
    }
}
