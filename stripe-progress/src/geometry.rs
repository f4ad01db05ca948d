//! Stripe geometry, computed as plain data.
//!
//! Everything here is in widget pixels with the origin at the widget's top
//! left corner, except stripe polygons which live in tile space (origin at
//! the bar's top left corner). Nothing in this module touches a raster.

use glam::Vec2;

use crate::error::GeometryError;
use crate::style::ValidatedStyle;

/// Upper bound on the extra stripes prepended to cover a slanted edge.
pub const MAX_EDGE_STRIPES: usize = 1024;

/// Upper bound on the doubled stripe count of one tile.
pub const MAX_TILE_STRIPES: usize = 4096;

pub const MAX_PROGRESS: u8 = 100;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BarRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundRect {
    pub rect: BarRect,
    pub radius: f32,
}

impl RoundRect {
    /// Corner radius actually drawn: never more than half the shorter side.
    pub fn effective_radius(&self) -> f32 {
        self.radius
            .min(self.rect.width() / 2.0)
            .min(self.rect.height() / 2.0)
            .max(0.0)
    }
}

/// One stripe, as the four corners of a parallelogram in tile space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parallelogram {
    pub top_left: Vec2,
    pub bottom_left: Vec2,
    pub bottom_right: Vec2,
    pub top_right: Vec2,
}

impl Parallelogram {
    fn translated(self, dx: f32) -> Self {
        let d = Vec2::new(dx, 0.0);
        Self {
            top_left: self.top_left + d,
            bottom_left: self.bottom_left + d,
            bottom_right: self.bottom_right + d,
            top_right: self.top_right + d,
        }
    }

    /// Corners in drawing order.
    pub fn corners(&self) -> [Vec2; 4] {
        [self.top_left, self.bottom_left, self.bottom_right, self.top_right]
    }

    /// x of the left edge at row `y`.
    pub fn left_at(&self, y: f32) -> f32 {
        edge_x(self.top_left, self.bottom_left, y)
    }

    /// x of the right edge at row `y`.
    pub fn right_at(&self, y: f32) -> f32 {
        edge_x(self.top_right, self.bottom_right, y)
    }
}

fn edge_x(top: Vec2, bottom: Vec2, y: f32) -> f32 {
    let span = bottom.y - top.y;
    if span == 0.0 {
        return top.x;
    }
    top.x + (bottom.x - top.x) * (y - top.y) / span
}

/// Signed acute angle of the stripe normal, in radians.
///
/// Rotations up to 90° lean the stripe bottoms left (negative angle), rotations
/// past 90° lean them right.
pub fn normal_line_radians(rotation_degrees: f32) -> f32 {
    let acute = if rotation_degrees <= 90.0 {
        -rotation_degrees
    } else {
        180.0 - rotation_degrees
    };
    acute.to_radians()
}

/// Round a length up to whole pixels, ignoring float noise just above an integer.
pub(crate) fn pixel_ceil(v: f32) -> u32 {
    let rounded = v.round();
    if (v - rounded).abs() < 1e-3 {
        rounded as u32
    } else {
        v.ceil() as u32
    }
}

/// Layout of the bar and its stripe tile for one widget size.
#[derive(Clone, Debug, PartialEq)]
pub struct StripeGeometry {
    width: f32,
    height: f32,
    corner_radius: f32,
    bar: BarRect,
    normal_radians: f32,
    stripe_width_on_x: f32,
    interval_width: f32,
    period_on_x: f32,
    skew: f32,
    edge_stripes: usize,
    tile_length: f32,
    stripes: Vec<Parallelogram>,
}

impl StripeGeometry {
    /// Lay out a `width` x `height` widget.
    ///
    /// Returns `Ok(None)` when padding leaves no room for a bar.
    pub fn compute(
        style: &ValidatedStyle,
        width: f32,
        height: f32,
    ) -> Result<Option<Self>, GeometryError> {
        let padding = style.padding;
        let bar = BarRect {
            left: padding,
            top: padding,
            right: width - padding,
            bottom: height - padding,
        };
        if bar.is_empty() {
            return Ok(None);
        }
        let bar_width = bar.width();
        let bar_height = bar.height();
        let interval_width = style.stripe_interval_width;

        let normal_radians = normal_line_radians(style.stripe_rotation_degrees);
        let stripe_width_on_x = style.stripe_width / normal_radians.cos();
        let period_on_x = stripe_width_on_x.abs() + interval_width;
        // horizontal shift of a stripe's bottom edge relative to its top edge
        let skew = bar_height * normal_radians.tan();
        let mut blank = skew.abs();
        let mut edge_stripes = 0;
        while blank > interval_width {
            if edge_stripes == MAX_EDGE_STRIPES {
                return Err(GeometryError::ExcessiveSkew {
                    skew,
                    period: period_on_x,
                    limit: MAX_EDGE_STRIPES,
                });
            }
            blank -= period_on_x;
            edge_stripes += 1;
        }

        // doubled so the scroll never runs out of stripes
        let per_bar = (bar_width / period_on_x).ceil();
        if !(per_bar <= (MAX_TILE_STRIPES / 2) as f32) {
            return Err(GeometryError::TooManyStripes {
                bar_width,
                period: period_on_x,
                limit: MAX_TILE_STRIPES,
            });
        }
        let doubled = per_bar as usize * 2;
        let tile_length = period_on_x * doubled as f32;

        // one trailing guard stripe keeps left-leaning stripes covering the tile end
        let count = doubled + edge_stripes * 2 + 1;
        let start = edge_stripes as f32 * period_on_x;
        let first = Parallelogram {
            top_left: Vec2::new(-start, 0.0),
            bottom_left: Vec2::new(skew - start, bar_height),
            bottom_right: Vec2::new(skew + stripe_width_on_x - start, bar_height),
            top_right: Vec2::new(stripe_width_on_x - start, 0.0),
        };
        let stripes = (0..count)
            .map(|i| first.translated(i as f32 * period_on_x))
            .collect();

        tracing::debug!(
            width,
            height,
            period_on_x,
            tile_length,
            edge_stripes,
            count,
            "stripe geometry computed"
        );

        Ok(Some(Self {
            width,
            height,
            corner_radius: style.corner_radius,
            bar,
            normal_radians,
            stripe_width_on_x,
            interval_width,
            period_on_x,
            skew,
            edge_stripes,
            tile_length,
            stripes,
        }))
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    pub fn bar(&self) -> BarRect {
        self.bar
    }

    pub fn normal_radians(&self) -> f32 {
        self.normal_radians
    }

    pub fn stripe_width_on_x(&self) -> f32 {
        self.stripe_width_on_x
    }

    pub fn interval_width(&self) -> f32 {
        self.interval_width
    }

    pub fn period_on_x(&self) -> f32 {
        self.period_on_x
    }

    pub fn skew(&self) -> f32 {
        self.skew
    }

    pub fn edge_stripes(&self) -> usize {
        self.edge_stripes
    }

    /// Length of one tile repeat; the animator wraps at half of it.
    pub fn tile_length(&self) -> f32 {
        self.tile_length
    }

    pub fn stripes(&self) -> &[Parallelogram] {
        &self.stripes
    }

    /// Raster size of the stripe tile.
    pub fn tile_size(&self) -> (u32, u32) {
        (pixel_ceil(self.tile_length), pixel_ceil(self.bar.height()))
    }

    pub fn bar_clip(&self) -> RoundRect {
        RoundRect {
            rect: self.bar,
            radius: self.corner_radius,
        }
    }

    /// The part of the bar filled at `progress` percent, before rounding.
    pub fn visible_bar(&self, progress: u8) -> Option<BarRect> {
        let progress = progress.min(MAX_PROGRESS);
        if progress == 0 {
            return None;
        }
        let filled = self.bar.width() * f32::from(progress) / f32::from(MAX_PROGRESS);
        Some(BarRect {
            right: self.bar.left + filled,
            ..self.bar
        })
    }

    /// Everything needed to paint one frame.
    pub fn frame(&self, progress: u8, phase: f32) -> FrameInstructions {
        FrameInstructions {
            background: background(self.width, self.height, self.corner_radius),
            bar_clip: Some(self.bar_clip()),
            bar: self.visible_bar(progress),
            tile_offset: Vec2::new(self.bar.left + phase, self.bar.top),
        }
    }
}

/// Full-size rounded background of a widget.
pub fn background(width: f32, height: f32, corner_radius: f32) -> RoundRect {
    RoundRect {
        rect: BarRect {
            left: 0.0,
            top: 0.0,
            right: width,
            bottom: height,
        },
        radius: corner_radius,
    }
}

/// Paint instructions for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInstructions {
    pub background: RoundRect,
    pub bar_clip: Option<RoundRect>,
    /// Rectangle to fill with the tile, intersected with `bar_clip`.
    pub bar: Option<BarRect>,
    /// Where the tile origin lands in widget space.
    pub tile_offset: Vec2,
}

impl FrameInstructions {
    pub fn background_only(width: f32, height: f32, corner_radius: f32) -> Self {
        Self {
            background: background(width, height, corner_radius),
            bar_clip: None,
            bar: None,
            tile_offset: Vec2::ZERO,
        }
    }
}
