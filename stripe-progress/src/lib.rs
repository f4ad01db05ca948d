//! Animated diagonal-stripe progress bar.
//!
//! [`geometry`] computes the stripe tiling as plain data, [`tile`] and
//! [`paint`] turn it into pixels with tiny-skia, and [`StripeProgressBar`]
//! ties them to an [`animator::StripeAnimator`]. [`ProgressController`] is
//! the screen logic that feeds bars from typed input and a background
//! [`ticker::AutoTicker`].

pub mod animator;
pub mod color;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod paint;
pub mod style;
pub mod thread_check;
pub mod ticker;
pub mod tile;
pub mod widget;

pub use color::Color;
pub use controller::{parse_manual_input, InputError, ManualInput, ProgressController};
pub use error::{GeometryError, StyleError};
pub use geometry::{FrameInstructions, StripeGeometry};
pub use style::{StripeStyle, ValidatedStyle};
pub use widget::StripeProgressBar;
