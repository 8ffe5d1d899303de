use super::types::{FontSpec, Rgba};

/// 2D drawing surface the overlay renders onto.
///
/// Mirrors the subset of a canvas 2D context the overlay needs: style state,
/// text measurement, clearing and text drawing.
pub trait DrawSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;

    fn set_font(&mut self, font: &FontSpec);
    fn set_fill_color(&mut self, color: Rgba);
    fn set_stroke_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f32);

    /// Advance width of `text` under the current font.
    fn measure_text(&self, text: &str) -> f64;

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64);
    fn fill_text(&mut self, text: &str, x: f64, y: f64);
    fn stroke_text(&mut self, text: &str, x: f64, y: f64);
}

/// One call recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { x: f64, y: f64, w: f64, h: f64 },
    Fill { text: String, x: f64, y: f64 },
    Stroke { text: String, x: f64, y: f64 },
}

/// Surface that records draw calls instead of producing pixels.
///
/// Measurement uses a fixed advance per character, scaled by font size, so
/// tests can reason about exact widths. A width override simulates a web font
/// that finishes loading after initialization.
pub struct RecordingSurface {
    width: f64,
    height: f64,
    font_size: f32,
    /// Advance per character as a fraction of the font size.
    advance_ratio: f64,
    width_override: Option<f64>,
    pub commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            font_size: FontSpec::default().size_px,
            advance_ratio: 1.0,
            width_override: None,
            commands: Vec::new(),
        }
    }

    /// Force `measure_text` to return `width` regardless of the text.
    pub fn set_text_width(&mut self, width: Option<f64>) {
        self.width_override = width;
    }

    /// Drain the recorded commands.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl DrawSurface for RecordingSurface {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font_size = font.size_px;
    }

    fn set_fill_color(&mut self, _color: Rgba) {}

    fn set_stroke_color(&mut self, _color: Rgba) {}

    fn set_line_width(&mut self, _width: f32) {}

    fn measure_text(&self, text: &str) -> f64 {
        if let Some(w) = self.width_override {
            return w;
        }
        text.chars().count() as f64 * self.font_size as f64 * self.advance_ratio
    }

    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.commands.push(DrawCommand::Clear { x, y, w, h });
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::Fill {
            text: text.to_string(),
            x,
            y,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f64, y: f64) {
        self.commands.push(DrawCommand::Stroke {
            text: text.to_string(),
            x,
            y,
        });
    }
}
