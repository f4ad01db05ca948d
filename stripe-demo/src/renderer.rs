/// Screen pixmap plus the handful of shapes the demo screen draws.

use anyhow::{Context, Result};
use stripe_progress::geometry::{BarRect, RoundRect};
use stripe_progress::paint::round_rect_path;
use stripe_progress::Color;
use tiny_skia::{FillRule, Paint, Pixmap, Rect, Stroke, Transform};

pub struct Renderer {
    pub pixmap: Pixmap,
}

impl Renderer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height)
            .with_context(|| format!("cannot allocate a {width}x{height} screen"))?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color.to_skia());
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
    }

    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color) {
        let Some(path) = round_rect_path(&round_rect(x, y, w, h, radius)) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        self.pixmap
            .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stroke_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Color, width: f32) {
        let Some(path) = round_rect_path(&round_rect(x, y, w, h, radius)) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color.to_skia());
        paint.anti_alias = true;
        let stroke = Stroke { width, ..Stroke::default() };
        self.pixmap
            .stroke_path(&path, &paint, &stroke, Transform::identity(), None);
    }

    pub fn fill_pill(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.fill_rounded_rect(x, y, w, h, h / 2.0, color);
    }
}

fn round_rect(x: f32, y: f32, w: f32, h: f32, radius: f32) -> RoundRect {
    RoundRect {
        rect: BarRect {
            left: x,
            top: y,
            right: x + w,
            bottom: y + h,
        },
        radius,
    }
}
