/// Text rendering with fontdue. The font is read at startup; without one, labels are skipped.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use fontdue::{Font, FontSettings};
use stripe_progress::Color;

use crate::renderer::Renderer;

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
];

pub struct TextRenderer {
    font: Option<Font>,
}

impl TextRenderer {
    /// Load `path`, or the first common system font when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => Some(path.to_path_buf()),
            None => SYSTEM_FONTS.iter().map(PathBuf::from).find(|p| p.exists()),
        };
        let Some(path) = path else {
            tracing::warn!("no font found, labels will not be drawn");
            return Ok(Self { font: None });
        };

        let bytes = std::fs::read(&path).with_context(|| format!("failed to read font {}", path.display()))?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow!("failed to parse font {}: {e}", path.display()))?;
        tracing::info!(font = %path.display(), "font loaded");
        Ok(Self { font: Some(font) })
    }

    /// A renderer that draws nothing.
    pub fn none() -> Self {
        Self { font: None }
    }

    /// Draw one line with its top at `y`. Returns the advance width.
    pub fn draw(&self, renderer: &mut Renderer, text: &str, x: f32, y: f32, size: f32, color: Color) -> f32 {
        let Some(font) = &self.font else {
            return 0.0;
        };
        let (pw, ph) = (renderer.width() as i32, renderer.height() as i32);
        let data = renderer.pixmap.data_mut();
        let mut cursor_x = x;
        for ch in text.chars() {
            let (metrics, coverage) = font.rasterize(ch, size);
            let gx = cursor_x as i32 + metrics.xmin;
            let gy = y as i32 + size as i32 - metrics.height as i32 - metrics.ymin;

            for (row, line) in coverage.chunks(metrics.width.max(1)).enumerate() {
                let py = gy + row as i32;
                if py < 0 || py >= ph {
                    continue;
                }
                for (col, &alpha) in line.iter().enumerate() {
                    let px = gx + col as i32;
                    if alpha == 0 || px < 0 || px >= pw {
                        continue;
                    }
                    let idx = (py as usize * pw as usize + px as usize) * 4;
                    let pixel = &mut data[idx..idx + 4];
                    let under = Color::rgb(pixel[0], pixel[1], pixel[2]);
                    let mixed = under.blend(color, f32::from(alpha) / 255.0);
                    pixel.copy_from_slice(&[mixed.r, mixed.g, mixed.b, 255]);
                }
            }
            cursor_x += metrics.advance_width;
        }
        cursor_x - x
    }

    pub fn measure(&self, text: &str, size: f32) -> f32 {
        let Some(font) = &self.font else {
            return 0.0;
        };
        text.chars().map(|ch| font.metrics(ch, size).advance_width).sum()
    }
}
