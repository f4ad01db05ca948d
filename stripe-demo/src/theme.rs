/// Demo screen palette and metrics.

use stripe_progress::Color;

pub const BG: Color = Color::rgb(0xFA, 0xFA, 0xFA);
pub const SURFACE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BORDER: Color = Color::rgb(0xBD, 0xBD, 0xBD);

pub const TEXT_PRIMARY: Color = Color::rgb(0x21, 0x21, 0x21);
pub const TEXT_SECONDARY: Color = Color::rgb(0x75, 0x75, 0x75);
pub const TEXT_MUTED: Color = Color::rgb(0xB0, 0xB0, 0xB0);

pub const ACCENT: Color = Color::rgb(0x3F, 0x51, 0xB5);
pub const ERROR: Color = Color::rgb(0xD3, 0x2F, 0x2F);

pub const FONT_SIZE_TITLE: f32 = 28.0;
pub const FONT_SIZE_BODY: f32 = 18.0;
pub const FONT_SIZE_SMALL: f32 = 14.0;

pub const MARGIN: f32 = 32.0;
pub const BAR_HEIGHT: u32 = 36;
pub const LABEL_WIDTH: f32 = 80.0;
pub const ROW_GAP: f32 = 24.0;
