/// Paint adapter: turns [`FrameInstructions`] into pixels on a tiny-skia layer.

use tiny_skia::{FillRule, Mask, Paint, PathBuilder, Pixmap, Rect, Transform};

use crate::color::Color;
use crate::error::GeometryError;
use crate::geometry::{BarRect, FrameInstructions, RoundRect};
use crate::tile::StripeTile;

/// The widget's own layer plus the rounded clip of its bar.
pub struct Painter {
    layer: Pixmap,
    bar_clip: Option<Mask>,
}

impl Painter {
    pub fn new(width: u32, height: u32, bar_clip: Option<&RoundRect>) -> Result<Self, GeometryError> {
        let layer = Pixmap::new(width, height)
            .ok_or(GeometryError::LayerAllocation { width, height })?;
        let bar_clip = match bar_clip {
            Some(clip) => Some(clip_mask(width, height, clip)?),
            None => None,
        };
        Ok(Self { layer, bar_clip })
    }

    pub fn paint(&mut self, frame: &FrameInstructions, tile: Option<&StripeTile>, background: Color) {
        self.layer.fill(tiny_skia::Color::TRANSPARENT);

        let mut paint = Paint::default();
        paint.set_color(background.to_skia());
        paint.anti_alias = true;
        if let Some(path) = round_rect_path(&frame.background) {
            self.layer
                .fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        let (Some(bar), Some(tile), Some(mask)) = (frame.bar, tile, self.bar_clip.as_ref()) else {
            return;
        };
        let Some(rect) = skia_rect(&bar) else {
            return;
        };
        let paint = Paint {
            shader: tile.shader(frame.tile_offset),
            anti_alias: true,
            ..Paint::default()
        };
        self.layer
            .fill_rect(rect, &paint, Transform::identity(), Some(mask));
    }

    pub fn layer(&self) -> &Pixmap {
        &self.layer
    }
}

fn clip_mask(width: u32, height: u32, clip: &RoundRect) -> Result<Mask, GeometryError> {
    let mut mask = Mask::new(width, height).ok_or(GeometryError::LayerAllocation { width, height })?;
    if let Some(path) = round_rect_path(clip) {
        mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
    }
    Ok(mask)
}

fn skia_rect(r: &BarRect) -> Option<Rect> {
    Rect::from_ltrb(r.left, r.top, r.right, r.bottom)
}

pub fn round_rect_path(rr: &RoundRect) -> Option<tiny_skia::Path> {
    if rr.rect.is_empty() {
        return None;
    }
    let BarRect { left: x, top: y, .. } = rr.rect;
    let (w, h) = (rr.rect.width(), rr.rect.height());
    let r = rr.effective_radius();
    if r <= 0.0 {
        return skia_rect(&rr.rect).map(PathBuilder::from_rect);
    }
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_corners_when_radius_is_zero() {
        let rr = RoundRect {
            rect: BarRect { left: 1.0, top: 2.0, right: 11.0, bottom: 7.0 },
            radius: 0.0,
        };
        let bounds = round_rect_path(&rr).unwrap().bounds();
        assert_eq!((bounds.left(), bounds.top(), bounds.right(), bounds.bottom()), (1.0, 2.0, 11.0, 7.0));
    }

    #[test]
    fn background_is_rounded() {
        let frame = FrameInstructions::background_only(40.0, 20.0, 8.0);
        let bg = Color::rgb(10, 20, 30);
        let mut painter = Painter::new(40, 20, None).unwrap();
        painter.paint(&frame, None, bg);
        let layer = painter.layer();
        assert_eq!(layer.pixel(20, 10), Some(bg.premultiplied()));
        assert_eq!(layer.pixel(0, 0).map(|p| p.alpha()), Some(0));
        assert_eq!(layer.pixel(39, 19).map(|p| p.alpha()), Some(0));
    }

    #[test]
    fn zero_sized_layer_is_a_layer_error() {
        assert!(matches!(
            Painter::new(0, 20, None),
            Err(GeometryError::LayerAllocation { width: 0, height: 20 })
        ));
        let clip = RoundRect {
            rect: BarRect { left: 0.0, top: 0.0, right: 1.0, bottom: 1.0 },
            radius: 0.0,
        };
        assert!(matches!(
            Painter::new(10, 0, Some(&clip)),
            Err(GeometryError::LayerAllocation { width: 10, height: 0 })
        ));
    }

    #[test]
    fn empty_rect_has_no_path() {
        let rr = RoundRect {
            rect: BarRect { left: 5.0, top: 5.0, right: 5.0, bottom: 9.0 },
            radius: 0.0,
        };
        assert!(round_rect_path(&rr).is_none());
    }
}
