/// Offscreen stripe tile, rasterized with tiny-skia and sampled as a repeating pattern.

use glam::Vec2;
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, Shader, SpreadMode, Transform,
};

use crate::color::Color;
use crate::error::GeometryError;
use crate::geometry::{Parallelogram, StripeGeometry};

pub struct StripeTile {
    pixmap: Pixmap,
}

impl StripeTile {
    /// Bar colour everywhere, stripes painted over it.
    pub fn rasterize(
        geometry: &StripeGeometry,
        bar_color: Color,
        stripe_color: Color,
    ) -> Result<Self, GeometryError> {
        let (width, height) = geometry.tile_size();
        let mut pixmap =
            Pixmap::new(width, height).ok_or(GeometryError::TileAllocation { width, height })?;
        pixmap.fill(bar_color.to_skia());

        if let Some(path) = stripes_path(geometry.stripes()) {
            let mut paint = Paint::default();
            paint.set_color(stripe_color.to_skia());
            paint.anti_alias = true;
            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
        }

        tracing::debug!(width, height, "stripe tile rasterized");
        Ok(Self { pixmap })
    }

    /// Repeating pattern with the tile origin placed at `offset`.
    pub fn shader(&self, offset: Vec2) -> Shader<'_> {
        Pattern::new(
            self.pixmap.as_ref(),
            SpreadMode::Repeat,
            FilterQuality::Nearest,
            1.0,
            Transform::from_translate(offset.x, offset.y),
        )
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

fn stripes_path(stripes: &[Parallelogram]) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for stripe in stripes {
        let [first, rest @ ..] = stripe.corners();
        pb.move_to(first.x, first.y);
        for corner in rest {
            pb.line_to(corner.x, corner.y);
        }
        pb.close();
    }
    pb.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StripeStyle;

    const BAR: Color = Color::rgb(0x3F, 0x51, 0xB5);
    const STRIPE: Color = Color::rgb(0xFF, 0xC1, 0x07);

    fn geometry(rotation: f32) -> StripeGeometry {
        let style = StripeStyle {
            stripe_rotation_degrees: rotation,
            stripe_width: 6.0,
            stripe_interval_width: 4.0,
            padding: 4.0,
            ..StripeStyle::default()
        }
        .validate()
        .unwrap();
        StripeGeometry::compute(&style, 108.0, 28.0).unwrap().unwrap()
    }

    #[test]
    fn tile_matches_geometry_size() {
        let g = geometry(30.0);
        let tile = StripeTile::rasterize(&g, BAR, STRIPE).unwrap();
        assert_eq!((tile.width(), tile.height()), g.tile_size());
    }

    #[test]
    fn vertical_stripes_alternate_with_bar_color() {
        let tile = StripeTile::rasterize(&geometry(0.0), BAR, STRIPE).unwrap();
        for row in [0, 10, 19] {
            for period in 0..20 {
                let x = period * 10;
                assert_eq!(tile.pixmap().pixel(x + 2, row), Some(STRIPE.premultiplied()));
                assert_eq!(tile.pixmap().pixel(x + 8, row), Some(BAR.premultiplied()));
            }
        }
    }

    #[test]
    fn slanted_tile_has_stripes_at_both_ends_of_every_row() {
        for rotation in [30.0, 150.0] {
            let tile = StripeTile::rasterize(&geometry(rotation), BAR, STRIPE).unwrap();
            let last = tile.width() - 1;
            for row in 0..tile.height() {
                let has_stripe = |xs: std::ops::RangeInclusive<u32>| {
                    xs.into_iter()
                        .any(|x| tile.pixmap().pixel(x, row) == Some(STRIPE.premultiplied()))
                };
                assert!(has_stripe(0..=12), "rotation {rotation}: row {row} starts blank");
                assert!(has_stripe(last - 12..=last), "rotation {rotation}: row {row} ends blank");
            }
        }
    }
}
