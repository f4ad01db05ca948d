//! The stripe progress bar widget.
//!
//! Owns the geometry, the rasterized tile, its own layer and the animator.
//! The host drives it from a single render thread:
//!
//! 1. [`attach`](StripeProgressBar::attach) when it becomes visible,
//! 2. [`layout`](StripeProgressBar::layout) whenever its size may have changed,
//! 3. [`animate`](StripeProgressBar::animate) every frame,
//! 4. [`draw_onto`](StripeProgressBar::draw_onto) when
//!    [`needs_redraw`](StripeProgressBar::needs_redraw) says so,
//! 5. [`detach`](StripeProgressBar::detach) (or drop) when it goes away.

use std::time::Duration;

use tiny_skia::{Pixmap, PixmapPaint, Transform};

use crate::animator::StripeAnimator;
use crate::error::{GeometryError, StyleError};
use crate::geometry::{FrameInstructions, StripeGeometry, MAX_PROGRESS};
use crate::paint::Painter;
use crate::style::{StripeStyle, ValidatedStyle};
use crate::thread_check::RenderThread;
use crate::tile::StripeTile;

const OFF_THREAD_MESSAGE: &str = "can not change ui in work thread";

pub struct StripeProgressBar {
    style: ValidatedStyle,
    render_thread: RenderThread,
    progress: u8,
    size: Option<(u32, u32)>,
    geometry: Option<StripeGeometry>,
    tile: Option<StripeTile>,
    painter: Option<Painter>,
    animator: StripeAnimator,
    layout_generation: u64,
    attached: bool,
    dirty: bool,
}

impl StripeProgressBar {
    /// Create a detached widget owned by the calling thread.
    pub fn new(style: ValidatedStyle) -> Self {
        let animator = StripeAnimator::from_style(&style);
        Self {
            style,
            render_thread: RenderThread::current(),
            progress: 0,
            size: None,
            geometry: None,
            tile: None,
            painter: None,
            animator,
            layout_generation: 0,
            attached: false,
            dirty: true,
        }
    }

    /// Validate `style` and build the widget; a 90° rotation fails here.
    pub fn from_style(style: StripeStyle) -> Result<Self, StyleError> {
        Ok(Self::new(style.validate()?))
    }

    pub fn style(&self) -> &ValidatedStyle {
        &self.style
    }

    pub fn attach(&mut self) {
        self.render_thread.assert_current(OFF_THREAD_MESSAGE);
        self.attached = true;
        self.animator.start();
        self.dirty = true;
    }

    /// Stop the animator and release the tile and layer.
    pub fn detach(&mut self) {
        self.animator.stop();
        self.release();
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Lay the widget out at `width` x `height`.
    ///
    /// The tile is only rebuilt when the size differs from the last layout.
    pub fn layout(&mut self, width: u32, height: u32) -> Result<(), GeometryError> {
        self.render_thread.assert_current(OFF_THREAD_MESSAGE);
        if self.size == Some((width, height)) && self.painter.is_some() {
            return Ok(());
        }

        let geometry = StripeGeometry::compute(&self.style, width as f32, height as f32)?;
        let tile = geometry
            .as_ref()
            .map(|g| StripeTile::rasterize(g, self.style.bar_color, self.style.stripe_color))
            .transpose()?;
        let bar_clip = geometry.as_ref().map(StripeGeometry::bar_clip);
        let painter = Painter::new(width, height, bar_clip.as_ref())?;

        if geometry.is_none() {
            tracing::warn!(width, height, padding = self.style.padding, "no room for the bar");
        }
        self.geometry = geometry;
        self.tile = tile;
        self.painter = Some(painter);
        self.size = Some((width, height));
        self.layout_generation += 1;
        self.dirty = true;
        Ok(())
    }

    /// Set progress in percent. Values outside [0, 100] are clamped.
    ///
    /// # Panics
    ///
    /// When called from any thread other than the one that created the widget.
    #[track_caller]
    pub fn set_progress(&mut self, progress: i32) {
        self.render_thread.assert_current(OFF_THREAD_MESSAGE);
        self.progress = progress.clamp(0, i32::from(MAX_PROGRESS)) as u8;
        self.dirty = true;
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Feed elapsed frame time to the animator. Returns whether the stripes moved.
    pub fn animate(&mut self, elapsed: Duration) -> bool {
        let tile_length = self.geometry.as_ref().map_or(0.0, StripeGeometry::tile_length);
        let moved = self.animator.advance(elapsed, tile_length);
        self.dirty |= moved;
        moved
    }

    pub fn phase(&self) -> f32 {
        self.animator.phase()
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty
    }

    pub fn size(&self) -> Option<(u32, u32)> {
        self.size
    }

    pub fn geometry(&self) -> Option<&StripeGeometry> {
        self.geometry.as_ref()
    }

    /// Number of geometry rebuilds so far.
    pub fn layout_generation(&self) -> u64 {
        self.layout_generation
    }

    pub fn frame(&self) -> Option<FrameInstructions> {
        let (width, height) = self.size?;
        Some(match &self.geometry {
            Some(g) => g.frame(self.progress, self.animator.phase()),
            None => FrameInstructions::background_only(
                width as f32,
                height as f32,
                self.style.corner_radius,
            ),
        })
    }

    /// Paint the widget layer. `None` before the first layout.
    pub fn draw(&mut self) -> Option<&Pixmap> {
        self.render_thread.assert_current(OFF_THREAD_MESSAGE);
        let frame = self.frame()?;
        let painter = self.painter.as_mut()?;
        painter.paint(&frame, self.tile.as_ref(), self.style.background_color);
        self.dirty = false;
        Some(painter.layer())
    }

    /// Paint and composite onto `dst` with the widget's top left at (`x`, `y`).
    pub fn draw_onto(&mut self, dst: &mut Pixmap, x: i32, y: i32) {
        if let Some(layer) = self.draw() {
            dst.draw_pixmap(
                x,
                y,
                layer.as_ref(),
                &PixmapPaint::default(),
                Transform::identity(),
                None,
            );
        }
    }

    fn release(&mut self) {
        if self.tile.is_some() || self.painter.is_some() {
            tracing::debug!(size = ?self.size, "releasing stripe tile and layer");
        }
        self.tile = None;
        self.painter = None;
        self.geometry = None;
        self.size = None;
        self.dirty = true;
    }
}

impl Drop for StripeProgressBar {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use std::thread;

    const BG: Color = Color::rgb(0xE0, 0xE0, 0xE0);
    const BAR: Color = Color::rgb(0x3F, 0x51, 0xB5);
    const STRIPE: Color = Color::rgb(0xFF, 0xC1, 0x07);

    fn style(rotation: f32) -> StripeStyle {
        StripeStyle {
            background_color: BG,
            bar_color: BAR,
            stripe_color: STRIPE,
            corner_radius: 8.0,
            padding: 4.0,
            stripe_width: 6.0,
            stripe_interval_width: 4.0,
            stripe_rotation_degrees: rotation,
            stripe_translation_offset: 12.0,
            cycle_duration_ms: 300,
        }
    }

    /// 208x28 widget: bar is 200x20 at (4, 4).
    fn laid_out(rotation: f32) -> StripeProgressBar {
        let mut bar = StripeProgressBar::from_style(style(rotation)).unwrap();
        bar.attach();
        bar.layout(208, 28).unwrap();
        bar
    }

    fn pixel(bar: &mut StripeProgressBar, x: u32, y: u32) -> tiny_skia::PremultipliedColorU8 {
        bar.draw().unwrap().pixel(x, y).unwrap()
    }

    fn is_fill(p: tiny_skia::PremultipliedColorU8) -> bool {
        p == BAR.premultiplied() || p == STRIPE.premultiplied()
    }

    #[test]
    fn ninety_degrees_fails_construction() {
        assert!(matches!(
            StripeProgressBar::from_style(style(90.0)),
            Err(StyleError::VerticalStripes { .. })
        ));
    }

    #[test]
    fn progress_is_clamped() {
        let mut bar = laid_out(45.0);
        for (input, stored) in [(-5, 0), (0, 0), (57, 57), (100, 100), (150, 100), (i32::MAX, 100)] {
            bar.set_progress(input);
            assert_eq!(bar.progress(), stored);
        }
    }

    #[test]
    fn set_progress_off_thread_panics_every_time() {
        for _ in 0..3 {
            let mut bar = laid_out(45.0);
            let result = thread::spawn(move || bar.set_progress(10)).join();
            assert!(result.is_err());
        }
    }

    #[test]
    fn layout_rebuilds_only_on_size_change() {
        let mut bar = laid_out(45.0);
        assert_eq!(bar.layout_generation(), 1);
        bar.layout(208, 28).unwrap();
        bar.set_progress(40);
        bar.animate(Duration::from_secs(1));
        bar.draw();
        assert_eq!(bar.layout_generation(), 1);
        bar.layout(300, 28).unwrap();
        assert_eq!(bar.layout_generation(), 2);
    }

    #[test]
    fn visible_width_tracks_progress() {
        let mut bar = laid_out(0.0);
        for (progress, right) in [(50, 104), (25, 54), (90, 184)] {
            bar.set_progress(progress);
            assert!(is_fill(pixel(&mut bar, right - 1, 14)), "{progress}% inside");
            assert_eq!(pixel(&mut bar, right, 14), BG.premultiplied(), "{progress}% outside");
        }
        bar.set_progress(0);
        assert_eq!(pixel(&mut bar, 20, 14), BG.premultiplied());
    }

    #[test]
    fn bar_corners_stay_rounded() {
        let mut bar = laid_out(0.0);
        for progress in [1, 3, 50, 100] {
            bar.set_progress(progress);
            assert_eq!(pixel(&mut bar, 4, 4), BG.premultiplied(), "{progress}% top left");
            assert_eq!(pixel(&mut bar, 4, 23), BG.premultiplied(), "{progress}% bottom left");
            assert!(is_fill(pixel(&mut bar, 4, 14)), "{progress}% left edge");
        }
        assert_eq!(pixel(&mut bar, 203, 4), BG.premultiplied());
        assert_eq!(pixel(&mut bar, 203, 23), BG.premultiplied());
        assert!(is_fill(pixel(&mut bar, 203, 14)));
    }

    #[test]
    fn half_tile_of_travel_is_seamless() {
        let mut bar = laid_out(0.0);
        bar.set_progress(100);
        let first = bar.draw().unwrap().data().to_vec();
        let half = bar.geometry().unwrap().tile_length() / 2.0;
        let interval = bar.style().tick_interval();

        assert!(bar.animate(interval * half as u32));
        assert_eq!(bar.phase(), -half);
        let shifted = bar.draw().unwrap().data().to_vec();
        assert_eq!(first, shifted);

        bar.animate(interval);
        assert_eq!(bar.phase(), 0.0);
    }

    #[test]
    fn slanted_stripes_reach_both_bar_ends_at_every_phase() {
        let mut bar = laid_out(30.0);
        bar.set_progress(100);
        let period = bar.geometry().unwrap().period_on_x().ceil() as u32 + 2;
        let interval = bar.style().tick_interval();
        let stripe = STRIPE.premultiplied();
        let mut frames = 0;
        loop {
            let layer = bar.draw().unwrap();
            for y in 4..24 {
                let left = (12..12 + period).any(|x| layer.pixel(x, y) == Some(stripe));
                let right = (196 - period..196).any(|x| layer.pixel(x, y) == Some(stripe));
                assert!(left && right, "phase {}: row {y} has a blank end", bar.phase());
            }
            frames += 1;
            bar.animate(interval);
            if bar.phase() == 0.0 {
                break;
            }
        }
        assert!(frames > 100);
    }

    #[test]
    fn detach_stops_animation_and_releases_layer() {
        let mut bar = laid_out(45.0);
        assert_eq!(bar.size(), Some((208, 28)));
        bar.detach();
        assert_eq!(bar.size(), None);
        assert!(!bar.is_attached());
        assert!(bar.geometry().is_none());
        assert!(bar.draw().is_none());
        assert!(!bar.animate(Duration::from_secs(1)));
        assert_eq!(bar.phase(), 0.0);
    }

    #[test]
    fn padding_only_widget_draws_background() {
        let mut bar = StripeProgressBar::from_style(style(45.0)).unwrap();
        bar.layout(8, 28).unwrap();
        bar.set_progress(100);
        assert!(bar.geometry().is_none());
        assert_eq!(pixel(&mut bar, 4, 14), BG.premultiplied());
    }

    #[test]
    fn draw_onto_composites_at_offset() {
        let mut bar = laid_out(0.0);
        bar.set_progress(100);
        let mut screen = Pixmap::new(300, 100).unwrap();
        bar.draw_onto(&mut screen, 50, 30);
        assert!(!bar.needs_redraw());
        assert_eq!(screen.pixel(50 + 100, 30 + 14).map(is_fill), Some(true));
        assert_eq!(screen.pixel(10, 10).map(|p| p.alpha()), Some(0));
    }
}
