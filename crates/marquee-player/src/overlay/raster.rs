use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::surface::DrawSurface;
use super::types::{FontSpec, Rgba};

/// Well-known font locations probed when no font path is configured.
const SYSTEM_FONT_CANDIDATES: &[(&str, bool)] = &[
    ("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf", true),
    ("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf", false),
    ("/usr/share/fonts/TTF/DejaVuSans-Bold.ttf", true),
    ("/usr/share/fonts/TTF/DejaVuSans.ttf", false),
    ("/usr/share/fonts/noto-cjk/NotoSansCJK-Bold.ttc", true),
    ("/System/Library/Fonts/Supplemental/Arial Bold.ttf", true),
    ("/System/Library/Fonts/Supplemental/Arial.ttf", false),
    ("C:\\Windows\\Fonts\\meiryob.ttc", true),
    ("C:\\Windows\\Fonts\\meiryo.ttc", false),
    ("C:\\Windows\\Fonts\\arialbd.ttf", true),
    ("C:\\Windows\\Fonts\\arial.ttf", false),
];

pub fn load_font(path: &Path) -> Result<fontdue::Font> {
    let bytes = std::fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
    fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
        .map_err(|e| anyhow::anyhow!("parsing font {}: {e}", path.display()))
}

/// First existing system font, preferring a bold face when `bold` is set.
pub fn find_system_font(bold: bool) -> Option<PathBuf> {
    let existing = || {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .filter(|(path, _)| Path::new(path).is_file())
    };
    existing()
        .find(|(_, is_bold)| *is_bold == bold)
        .or_else(|| existing().next())
        .map(|(path, _)| PathBuf::from(path))
}

/// Rasterized glyph: fill coverage and the dilated outline coverage share one box.
struct CachedGlyph {
    advance: f32,
    /// Offset of the bitmap's left edge from the pen position.
    left: i32,
    /// Offset of the bitmap's top edge from the baseline (negative is above).
    top: i32,
    width: usize,
    height: usize,
    fill: Vec<u8>,
    stroke: Vec<u8>,
}

/// CPU raster surface: RGBA8 pixels, fontdue glyphs.
///
/// Without a font the surface still measures text (fixed advances) so the
/// overlay keeps its timing, but draws nothing.
pub struct RasterSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    font: Option<fontdue::Font>,
    font_size: f32,
    fill: Rgba,
    stroke: Rgba,
    line_width: f32,
    glyphs: HashMap<char, CachedGlyph>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, font: Option<fontdue::Font>) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width as usize) * (height as usize) * 4],
            font,
            font_size: FontSpec::default().size_px,
            fill: Rgba::WHITE,
            stroke: Rgba::BLACK,
            line_width: 1.0,
            glyphs: HashMap::new(),
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// RGBA8 row-major pixel buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let p = &self.pixels[i..i + 4];
        Some(Rgba::new(p[0], p[1], p[2], p[3]))
    }

    /// Write the current frame as a PNG.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| anyhow::anyhow!("pixel buffer does not match surface size"))?;
        img.save(path)
            .with_context(|| format!("writing snapshot {}", path.display()))?;
        Ok(())
    }

    fn fallback_advance(&self, ch: char) -> f32 {
        if ch.is_ascii() {
            self.font_size * 0.6
        } else {
            self.font_size
        }
    }

    fn glyph(&mut self, ch: char) -> Option<&CachedGlyph> {
        if !self.glyphs.contains_key(&ch) {
            let font = self.font.as_ref()?;
            let (metrics, coverage) = font.rasterize(ch, self.font_size);
            let pad = (self.line_width / 2.0).ceil().max(0.0) as usize;
            let width = metrics.width + pad * 2;
            let height = metrics.height + pad * 2;

            let mut fill = vec![0u8; width * height];
            for row in 0..metrics.height {
                let src = &coverage[row * metrics.width..(row + 1) * metrics.width];
                let dst = (row + pad) * width + pad;
                fill[dst..dst + metrics.width].copy_from_slice(src);
            }
            let stroke = dilate(&fill, width, height, self.line_width / 2.0);

            let glyph = CachedGlyph {
                advance: metrics.advance_width,
                left: metrics.xmin - pad as i32,
                top: -(metrics.height as i32 + metrics.ymin) - pad as i32,
                width,
                height,
                fill,
                stroke,
            };
            self.glyphs.insert(ch, glyph);
        }
        self.glyphs.get(&ch)
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, outline: bool) {
        if self.font.is_none() {
            return;
        }
        let color = if outline { self.stroke } else { self.fill };
        let mut pen_x = x as f32;
        for ch in text.chars() {
            let Some(glyph) = self.glyph(ch) else {
                continue;
            };
            let origin_x = pen_x.round() as i32 + glyph.left;
            let origin_y = y.round() as i32 + glyph.top;
            let advance = glyph.advance;
            let (gw, gh) = (glyph.width, glyph.height);
            let coverage = if outline {
                glyph.stroke.clone()
            } else {
                glyph.fill.clone()
            };
            self.blit(&coverage, gw, gh, origin_x, origin_y, color);
            pen_x += advance;
        }
    }

    fn blit(&mut self, coverage: &[u8], gw: usize, gh: usize, ox: i32, oy: i32, color: Rgba) {
        for gy in 0..gh {
            let py = oy + gy as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }
            for gx in 0..gw {
                let px = ox + gx as i32;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }
                let cov = coverage[gy * gw + gx];
                if cov == 0 {
                    continue;
                }
                let i = ((py as u32 * self.width + px as u32) * 4) as usize;
                let src_a = (color.a as f32 / 255.0) * (cov as f32 / 255.0);
                blend_over(&mut self.pixels[i..i + 4], color, src_a);
            }
        }
    }
}

/// Source-over compositing of a straight-alpha colour into a straight-alpha pixel.
fn blend_over(dst: &mut [u8], src: Rgba, src_a: f32) {
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    if out_a <= 0.0 {
        dst.copy_from_slice(&[0, 0, 0, 0]);
        return;
    }
    let mix = |s: u8, d: u8| {
        let v = (s as f32 * src_a + d as f32 * dst_a * (1.0 - src_a)) / out_a;
        v.round().clamp(0.0, 255.0) as u8
    };
    dst[0] = mix(src.r, dst[0]);
    dst[1] = mix(src.g, dst[1]);
    dst[2] = mix(src.b, dst[2]);
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Grow coverage outward by `radius` pixels (max over a disc).
fn dilate(src: &[u8], width: usize, height: usize, radius: f32) -> Vec<u8> {
    if radius <= 0.0 {
        return src.to_vec();
    }
    let r = radius.ceil() as i32;
    let r2 = radius * radius;
    let offsets: Vec<(i32, i32)> = (-r..=r)
        .flat_map(|dy| (-r..=r).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| (dx * dx + dy * dy) as f32 <= r2)
        .collect();

    let mut out = vec![0u8; src.len()];
    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let mut best = 0u8;
            for &(dx, dy) in &offsets {
                let (sx, sy) = (x + dx, y + dy);
                if sx < 0 || sy < 0 || sx >= width as i32 || sy >= height as i32 {
                    continue;
                }
                best = best.max(src[sy as usize * width + sx as usize]);
                if best == u8::MAX {
                    break;
                }
            }
            out[y as usize * width + x as usize] = best;
        }
    }
    out
}

impl DrawSurface for RasterSurface {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn set_font(&mut self, font: &FontSpec) {
        if (font.size_px - self.font_size).abs() > f32::EPSILON {
            self.glyphs.clear();
        }
        self.font_size = font.size_px;
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f32) {
        if (width - self.line_width).abs() > f32::EPSILON {
            self.glyphs.clear();
        }
        self.line_width = width;
    }

    fn measure_text(&self, text: &str) -> f64 {
        match &self.font {
            Some(font) => text
                .chars()
                .map(|ch| font.metrics(ch, self.font_size).advance_width as f64)
                .sum(),
            None => text.chars().map(|ch| self.fallback_advance(ch) as f64).sum(),
        }
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let x0 = x.max(0.0).floor() as u32;
        let y0 = y.max(0.0).floor() as u32;
        let x1 = ((x + w).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((y + h).ceil().max(0.0) as u32).min(self.height);
        for py in y0..y1 {
            let row = (py * self.width) as usize * 4;
            let start = row + x0 as usize * 4;
            let end = row + x1 as usize * 4;
            if start < end {
                self.pixels[start..end].fill(0);
            }
        }
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.draw_text(text, x, y, false);
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.draw_text(text, x, y, true);
    }
}
