/// The demo screen: a manual bar driven by the text field and an automatic bar driven by the ticker.

use std::time::Duration;

use anyhow::{Context, Result};
use stripe_progress::{ProgressController, StripeProgressBar, ValidatedStyle};

use crate::input::Key;
use crate::renderer::Renderer;
use crate::text::TextRenderer;
use crate::theme;
use crate::widgets::button::draw_button;
use crate::widgets::text_input::{draw_text_input, TextInputState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
}

pub struct DemoScreen {
    controller: ProgressController,
    manual_bar: StripeProgressBar,
    auto_bar: StripeProgressBar,
    field: TextInputState,
    bar_width: u32,
    dirty: bool,
}

impl DemoScreen {
    pub fn new(style: ValidatedStyle, screen_width: u32, tick_interval: Duration) -> Result<Self> {
        let bar_width = (screen_width as f32 - theme::MARGIN * 2.0 - theme::LABEL_WIDTH).max(1.0) as u32;
        let mut manual_bar = StripeProgressBar::new(style.clone());
        let mut auto_bar = StripeProgressBar::new(style);
        for bar in [&mut manual_bar, &mut auto_bar] {
            bar.attach();
            bar.layout(bar_width, theme::BAR_HEIGHT)
                .context("failed to lay out progress bar")?;
        }

        Ok(Self {
            controller: ProgressController::new(tick_interval),
            manual_bar,
            auto_bar,
            field: TextInputState::new("0 - 100"),
            bar_width,
            dirty: true,
        })
    }

    pub fn handle_key(&mut self, key: Key) -> Result<Action> {
        match key {
            Key::Escape => return Ok(Action::Quit),
            Key::Enter | Key::Char(' ') => {
                let running = self.controller.toggle_auto().context("failed to start auto progress")?;
                tracing::info!(running, "auto progress toggled");
                self.dirty = true;
            }
            Key::Backspace => {
                if self.field.backspace() {
                    self.on_text_changed();
                }
            }
            Key::Char(ch) => {
                if self.field.insert_char(ch) {
                    self.on_text_changed();
                }
            }
        }
        Ok(Action::None)
    }

    /// Replace the field contents, as if typed.
    pub fn set_text(&mut self, text: &str) {
        self.field.text.clear();
        for ch in text.chars() {
            self.field.insert_char(ch);
        }
        self.on_text_changed();
    }

    fn on_text_changed(&mut self) {
        let input = self.controller.set_manual_text(&self.field.text);
        self.field.error = input.error.map(|err| err.to_string());
        self.publish();
    }

    /// Apply one auto tick directly, for headless runs.
    pub fn tick_auto(&mut self) {
        self.controller.apply_tick();
        self.publish();
    }

    fn publish(&mut self) {
        self.manual_bar
            .set_progress(i32::from(self.controller.manual_progress()));
        self.auto_bar
            .set_progress(i32::from(self.controller.auto_display()));
        self.dirty = true;
    }

    /// Apply delivered ticks and advance both animations.
    pub fn update(&mut self, elapsed: Duration) {
        if self.controller.pump() {
            self.publish();
        }
        self.manual_bar.animate(elapsed);
        self.auto_bar.animate(elapsed);
    }

    pub fn needs_redraw(&self) -> bool {
        self.dirty || self.manual_bar.needs_redraw() || self.auto_bar.needs_redraw()
    }

    pub fn draw(&mut self, renderer: &mut Renderer, text: &TextRenderer) {
        renderer.clear(theme::BG);
        let x = theme::MARGIN;
        let mut y = theme::MARGIN;

        text.draw(renderer, "Stripe progress bar", x, y, theme::FONT_SIZE_TITLE, theme::TEXT_PRIMARY);
        y += theme::FONT_SIZE_TITLE + theme::ROW_GAP;

        y = self.draw_bar_row(renderer, text, "Manual", Row::Manual, y);
        let field_width = self.bar_width as f32 / 3.0;
        y += draw_text_input(renderer, text, &self.field, x, y, field_width) + theme::ROW_GAP * 2.0;

        y = self.draw_bar_row(renderer, text, "Automatic", Row::Auto, y);
        let label = if self.controller.is_auto_running() { "Pause" } else { "Start" };
        draw_button(renderer, text, label, x, y, self.controller.is_auto_running());

        self.dirty = false;
    }

    fn draw_bar_row(&mut self, renderer: &mut Renderer, text: &TextRenderer, title: &str, row: Row, y: f32) -> f32 {
        let x = theme::MARGIN;
        text.draw(renderer, title, x, y, theme::FONT_SIZE_SMALL, theme::TEXT_SECONDARY);
        let y = y + theme::FONT_SIZE_SMALL + 8.0;

        let bar = match row {
            Row::Manual => &mut self.manual_bar,
            Row::Auto => &mut self.auto_bar,
        };
        bar.draw_onto(&mut renderer.pixmap, x as i32, y as i32);

        let bar_h = theme::BAR_HEIGHT as f32;
        let label = format!("{} %", bar.progress());
        let label_y = y + (bar_h - theme::FONT_SIZE_BODY) / 2.0;
        text.draw(renderer, &label, x + self.bar_width as f32 + 16.0, label_y, theme::FONT_SIZE_BODY, theme::TEXT_PRIMARY);

        y + bar_h + theme::ROW_GAP
    }

    pub fn manual_progress(&self) -> u8 {
        self.manual_bar.progress()
    }

    pub fn auto_progress(&self) -> u8 {
        self.auto_bar.progress()
    }

    /// Stop the ticker and release both bars.
    pub fn shutdown(&mut self) {
        self.controller.on_destroy();
        self.manual_bar.detach();
        self.auto_bar.detach();
    }
}

#[derive(Clone, Copy)]
enum Row {
    Manual,
    Auto,
}
