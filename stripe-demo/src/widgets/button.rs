/// Start/pause button: a pill with a centered label.

use crate::renderer::Renderer;
use crate::text::TextRenderer;
use crate::theme;

/// Draw the button and return its size.
pub fn draw_button(
    renderer: &mut Renderer,
    text_renderer: &TextRenderer,
    label: &str,
    x: f32,
    y: f32,
    active: bool,
) -> (f32, f32) {
    let pad_h = 20.0;
    let pad_v = 10.0;
    let w = text_renderer.measure(label, theme::FONT_SIZE_BODY).max(60.0) + pad_h * 2.0;
    let h = theme::FONT_SIZE_BODY + pad_v * 2.0;

    let (bg, fg) = if active {
        (theme::ACCENT, theme::SURFACE)
    } else {
        (theme::SURFACE, theme::ACCENT)
    };
    renderer.fill_pill(x, y, w, h, bg);
    if !active {
        renderer.stroke_rounded_rect(x, y, w, h, h / 2.0, theme::ACCENT, 1.5);
    }
    let text_w = text_renderer.measure(label, theme::FONT_SIZE_BODY);
    text_renderer.draw(renderer, label, x + (w - text_w) / 2.0, y + pad_v, theme::FONT_SIZE_BODY, fg);

    (w, h)
}
