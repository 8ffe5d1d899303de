use serde::{Deserialize, Serialize};

/// Straight (non-premultiplied) RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#RRGGBB`, `#RRGGBBAA`, `white` or `black`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" => return Some(Self::WHITE),
            "black" => return Some(Self::BLACK),
            "transparent" => return Some(Self::TRANSPARENT),
            _ => {}
        }
        let hex = s.trim().strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Some(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => None,
        }
    }
}

impl Serialize for Rgba {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let s = format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a);
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgba::parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid colour '{s}'")))
    }
}

/// Font request applied to a drawing surface before measuring or drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    #[serde(default = "default_font_size")]
    pub size_px: f32,
    #[serde(default = "default_true")]
    pub bold: bool,
    /// Preferred family names, first match wins.
    #[serde(default = "default_families")]
    pub families: Vec<String>,
}

fn default_font_size() -> f32 {
    70.0
}

fn default_true() -> bool {
    true
}

fn default_families() -> Vec<String> {
    vec!["Meiryo".to_string(), "sans-serif".to_string()]
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size_px: default_font_size(),
            bold: true,
            families: default_families(),
        }
    }
}

/// Everything the overlay needs to know about what it draws and how fast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default)]
    pub font: FontSpec,
    #[serde(default = "default_fill")]
    pub fill: Rgba,
    #[serde(default = "default_stroke")]
    pub stroke: Rgba,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    #[serde(default = "default_baseline_y")]
    pub baseline_y: f32,
    /// Seconds for the text to travel from the right edge until fully off the left edge.
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,
    /// Upper bound on a single frame's delta. `None` accepts one large jump
    /// after the loop was starved (background tab).
    #[serde(default)]
    pub max_frame_delta_secs: Option<f64>,
}

fn default_text() -> String {
    "テキスト".to_string()
}

fn default_fill() -> Rgba {
    Rgba::WHITE
}

fn default_stroke() -> Rgba {
    Rgba::new(0, 0, 0, 0x70)
}

fn default_stroke_width() -> f32 {
    10.0
}

fn default_baseline_y() -> f32 {
    100.0
}

fn default_duration_secs() -> f64 {
    6.0
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            text: default_text(),
            font: FontSpec::default(),
            fill: default_fill(),
            stroke: default_stroke(),
            stroke_width: default_stroke_width(),
            baseline_y: default_baseline_y(),
            duration_secs: default_duration_secs(),
            max_frame_delta_secs: None,
        }
    }
}

/// Render state of the scrolling annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    /// Left edge of the text in surface pixels.
    pub position: f64,
    /// Timestamp (ms) of the previous tick, `None` until the first tick.
    pub last_tick_ms: Option<f64>,
    /// Pixels per second, fixed at initialization.
    pub speed_per_sec: f64,
    pub canvas_width: f64,
}

impl OverlayState {
    pub fn new(canvas_width: f64, text_width: f64, duration_secs: f64) -> Self {
        let total_distance = canvas_width + text_width;
        let speed_per_sec = if duration_secs > 0.0 {
            total_distance / duration_secs
        } else {
            0.0
        };
        Self {
            position: canvas_width,
            last_tick_ms: None,
            speed_per_sec,
            canvas_width,
        }
    }
}
