/// Percentage text field with a cursor, placeholder and inline validation message.

use crate::renderer::Renderer;
use crate::text::TextRenderer;
use crate::theme;

const MAX_CHARS: usize = 6;

pub struct TextInputState {
    pub text: String,
    pub placeholder: String,
    /// Shown under the field until the next edit.
    pub error: Option<String>,
}

impl TextInputState {
    pub fn new(placeholder: &str) -> Self {
        Self {
            text: String::new(),
            placeholder: placeholder.to_string(),
            error: None,
        }
    }

    /// Append a typed character. Returns whether the text changed.
    pub fn insert_char(&mut self, ch: char) -> bool {
        let accepted = ch.is_ascii_digit() || (ch == '-' && self.text.is_empty());
        if !accepted || self.text.len() >= MAX_CHARS {
            return false;
        }
        self.text.push(ch);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.text.pop().is_some()
    }
}

/// Draw the field at (`x`, `y`). Returns the height used, message included.
pub fn draw_text_input(
    renderer: &mut Renderer,
    text_renderer: &TextRenderer,
    state: &TextInputState,
    x: f32,
    y: f32,
    width: f32,
) -> f32 {
    let pad = 10.0;
    let h = theme::FONT_SIZE_BODY + pad * 2.0;
    let border = if state.error.is_some() { theme::ERROR } else { theme::BORDER };

    renderer.fill_rounded_rect(x, y, width, h, 6.0, theme::SURFACE);
    renderer.stroke_rounded_rect(x, y, width, h, 6.0, border, 1.5);

    let text_y = y + pad;
    let cursor_x = if state.text.is_empty() {
        text_renderer.draw(renderer, &state.placeholder, x + pad, text_y, theme::FONT_SIZE_BODY, theme::TEXT_MUTED);
        x + pad
    } else {
        x + pad + text_renderer.draw(renderer, &state.text, x + pad, text_y, theme::FONT_SIZE_BODY, theme::TEXT_PRIMARY)
    };
    renderer.fill_rect(cursor_x, text_y, 2.0, theme::FONT_SIZE_BODY, theme::ACCENT);

    match &state.error {
        Some(message) => {
            let gap = 6.0;
            text_renderer.draw(renderer, message, x, y + h + gap, theme::FONT_SIZE_SMALL, theme::ERROR);
            h + gap + theme::FONT_SIZE_SMALL
        }
        None => h,
    }
}
