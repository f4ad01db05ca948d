//! Stripe style configuration.
//!
//! A [`StripeStyle`] is what a host reads from its resources or a JSON file.
//! It has to pass [`StripeStyle::validate`] before a widget can be built
//! from it; the resulting [`ValidatedStyle`] is fixed for the widget's life.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::color::Color;
use crate::error::StyleError;

pub const DEFAULT_CYCLE_DURATION_MS: u64 = 300;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StripeStyle {
    pub background_color: Color,
    pub bar_color: Color,
    pub corner_radius: f32,
    pub padding: f32,
    pub stripe_color: Color,
    pub stripe_width: f32,
    pub stripe_interval_width: f32,
    /// Any angle except an odd multiple of 90; folded into [0, 180).
    pub stripe_rotation_degrees: f32,
    /// Pixels the pattern travels per animation cycle.
    pub stripe_translation_offset: f32,
    pub cycle_duration_ms: u64,
}

impl Default for StripeStyle {
    fn default() -> Self {
        Self {
            background_color: Color::rgb(0xE0, 0xE0, 0xE0),
            bar_color: Color::rgb(0x3F, 0x51, 0xB5),
            corner_radius: 8.0,
            padding: 4.0,
            stripe_color: Color::rgb(0x5C, 0x6B, 0xC0),
            stripe_width: 12.0,
            stripe_interval_width: 12.0,
            stripe_rotation_degrees: 45.0,
            stripe_translation_offset: 12.0,
            cycle_duration_ms: DEFAULT_CYCLE_DURATION_MS,
        }
    }
}

impl StripeStyle {
    pub fn from_json_str(json: &str) -> Result<Self, StyleError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StyleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check every numeric option and fold the rotation into [0, 180).
    pub fn validate(mut self) -> Result<ValidatedStyle, StyleError> {
        require(self.stripe_width, "stripe_width", "a positive number", |v| v > 0.0)?;
        require(
            self.stripe_interval_width,
            "stripe_interval_width",
            "zero or positive",
            |v| v >= 0.0,
        )?;
        require(self.corner_radius, "corner_radius", "zero or positive", |v| v >= 0.0)?;
        require(self.padding, "padding", "zero or positive", |v| v >= 0.0)?;
        require(
            self.stripe_translation_offset,
            "stripe_translation_offset",
            "a positive number",
            |v| v > 0.0,
        )?;
        if self.cycle_duration_ms == 0 {
            return Err(StyleError::OutOfRange {
                field: "cycle_duration_ms",
                requirement: "a positive number",
                value: 0.0,
            });
        }
        self.stripe_rotation_degrees = normalize_rotation(self.stripe_rotation_degrees)?;
        Ok(ValidatedStyle(self))
    }
}

fn require(
    value: f32,
    field: &'static str,
    requirement: &'static str,
    ok: impl Fn(f32) -> bool,
) -> Result<(), StyleError> {
    if value.is_finite() && ok(value) {
        Ok(())
    } else {
        Err(StyleError::OutOfRange { field, requirement, value })
    }
}

/// Fold a raw rotation into [0, 180).
///
/// The magnitude is reduced modulo 180; a negative input is reflected to
/// `180 - reduced`. Anything landing on 90 is rejected.
pub fn normalize_rotation(raw: f32) -> Result<f32, StyleError> {
    if !raw.is_finite() {
        return Err(StyleError::OutOfRange {
            field: "stripe_rotation_degrees",
            requirement: "a finite angle",
            value: raw,
        });
    }
    let mut positive = raw.abs();
    if positive >= 180.0 {
        positive -= 180.0 * (positive / 180.0).floor();
    }
    if positive == 90.0 {
        return Err(StyleError::VerticalStripes { raw });
    }
    let folded = if raw < 0.0 { 180.0 - positive } else { positive };
    Ok(if folded >= 180.0 { 0.0 } else { folded })
}

/// A style that passed validation. Rotation is already in [0, 180) and not 90.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedStyle(StripeStyle);

impl ValidatedStyle {
    /// Pixel step of one animator tick.
    pub const TICK_STEP_PX: f32 = 1.0;

    pub fn get(&self) -> &StripeStyle {
        &self.0
    }

    pub fn cycle_duration(&self) -> Duration {
        Duration::from_millis(self.0.cycle_duration_ms)
    }

    /// Time between animator ticks so that the pattern moves
    /// `stripe_translation_offset` pixels per cycle.
    pub fn tick_interval(&self) -> Duration {
        let ticks_per_cycle = f64::from(self.0.stripe_translation_offset / Self::TICK_STEP_PX).max(1.0);
        let cycle_nanos = self.0.cycle_duration_ms as f64 * 1_000_000.0;
        Duration::from_nanos((cycle_nanos / ticks_per_cycle).round() as u64)
    }
}

impl std::ops::Deref for ValidatedStyle {
    type Target = StripeStyle;

    fn deref(&self) -> &StripeStyle {
        &self.0
    }
}
