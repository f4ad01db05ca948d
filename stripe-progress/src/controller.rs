//! Progress controller: the screen logic feeding the bars.
//!
//! Two producers: typed text for the manual bar and a background
//! [`AutoTicker`] for the automatic one. Ticks are only applied on the
//! render thread, through [`ProgressController::pump`] or
//! [`ProgressController::wait_tick`].

use std::num::IntErrorKind;
use std::time::Duration;

use crate::geometry::MAX_PROGRESS;
use crate::thread_check::RenderThread;
use crate::ticker::AutoTicker;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Why typed input was not taken as-is. The clamped value is still applied.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0:?} is not a number, please enter 0 to 100")]
    NotANumber(String),

    #[error("{0} is out of range, please enter 0 to 100")]
    OutOfRange(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManualInput {
    pub progress: u8,
    pub error: Option<InputError>,
}

/// Parse the manual progress field.
pub fn parse_manual_input(text: &str) -> ManualInput {
    let text = text.trim();
    if text.is_empty() {
        return ManualInput { progress: 0, error: None };
    }
    let out_of_range = |progress| ManualInput {
        progress,
        error: Some(InputError::OutOfRange(text.to_owned())),
    };
    let value = match text.parse::<i64>() {
        Ok(value) => value,
        Err(err) => {
            return match err.kind() {
                IntErrorKind::PosOverflow => out_of_range(MAX_PROGRESS),
                IntErrorKind::NegOverflow => out_of_range(0),
                _ => ManualInput {
                    progress: 0,
                    error: Some(InputError::NotANumber(text.to_owned())),
                },
            }
        }
    };
    match u8::try_from(value) {
        Ok(progress) if progress <= MAX_PROGRESS => ManualInput { progress, error: None },
        _ if value < 0 => out_of_range(0),
        _ => out_of_range(MAX_PROGRESS),
    }
}

pub struct ProgressController {
    render_thread: RenderThread,
    manual: u8,
    auto: u8,
    auto_display: u8,
    ticker: Option<AutoTicker>,
    interval: Duration,
    resume_on_show: bool,
}

impl Default for ProgressController {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl ProgressController {
    pub fn new(interval: Duration) -> Self {
        Self {
            render_thread: RenderThread::current(),
            manual: 0,
            auto: 0,
            auto_display: 0,
            ticker: None,
            interval,
            resume_on_show: false,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn manual_progress(&self) -> u8 {
        self.manual
    }

    /// The automatic counter. Back at 0 right after 100 was published.
    pub fn auto_progress(&self) -> u8 {
        self.auto
    }

    /// Last value published to the automatic bar.
    pub fn auto_display(&self) -> u8 {
        self.auto_display
    }

    pub fn set_manual_text(&mut self, text: &str) -> ManualInput {
        let input = parse_manual_input(text);
        if let Some(err) = &input.error {
            tracing::warn!(%err, clamped = input.progress, "manual progress input rejected");
        }
        self.manual = input.progress;
        input
    }

    /// Advance the automatic counter by one and return the value to publish.
    pub fn apply_tick(&mut self) -> u8 {
        self.render_thread
            .assert_current("can not change ui in work thread");
        self.auto += 1;
        let published = self.auto;
        if published >= MAX_PROGRESS {
            self.auto = 0;
        }
        self.auto_display = published;
        published
    }

    pub fn is_auto_running(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn start_auto(&mut self) -> std::io::Result<()> {
        if self.ticker.is_none() {
            self.ticker = Some(AutoTicker::spawn(self.interval)?);
        }
        Ok(())
    }

    pub fn pause_auto(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Start/pause button. Returns whether the ticker now runs.
    pub fn toggle_auto(&mut self) -> std::io::Result<bool> {
        if self.is_auto_running() {
            self.pause_auto();
        } else {
            self.start_auto()?;
        }
        Ok(self.is_auto_running())
    }

    /// Screen hidden: stop ticking but remember to resume.
    pub fn on_hide(&mut self) {
        self.resume_on_show = self.is_auto_running();
        self.pause_auto();
    }

    pub fn on_show(&mut self) -> std::io::Result<()> {
        if std::mem::take(&mut self.resume_on_show) {
            self.start_auto()?;
        }
        Ok(())
    }

    pub fn on_destroy(&mut self) {
        self.resume_on_show = false;
        self.pause_auto();
    }

    /// Apply every tick delivered so far. Returns whether any arrived.
    pub fn pump(&mut self) -> bool {
        let pending = self.ticker.as_ref().map_or(0, AutoTicker::try_recv);
        for _ in 0..pending {
            self.apply_tick();
        }
        pending > 0
    }

    /// Block for one tick and apply it.
    pub fn wait_tick(&mut self, timeout: Duration) -> bool {
        let arrived = self
            .ticker
            .as_ref()
            .is_some_and(|ticker| ticker.recv_timeout(timeout));
        if arrived {
            self.apply_tick();
        }
        arrived
    }
}

impl Drop for ProgressController {
    fn drop(&mut self) {
        self.pause_auto();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn manual_input_is_clamped_with_a_warning() {
        let cases = [
            ("150", 100, Some(InputError::OutOfRange("150".into()))),
            ("", 0, None),
            ("-5", 0, Some(InputError::OutOfRange("-5".into()))),
            ("3000000000", 100, Some(InputError::OutOfRange("3000000000".into()))),
            (
                "99999999999999999999",
                100,
                Some(InputError::OutOfRange("99999999999999999999".into())),
            ),
            (
                "-99999999999999999999",
                0,
                Some(InputError::OutOfRange("-99999999999999999999".into())),
            ),
            ("-", 0, Some(InputError::NotANumber("-".into()))),
            ("57", 57, None),
            ("0", 0, None),
            ("100", 100, None),
            ("abc", 0, Some(InputError::NotANumber("abc".into()))),
        ];
        let mut controller = ProgressController::default();
        for (text, progress, error) in cases {
            let input = controller.set_manual_text(text);
            assert_eq!(input, ManualInput { progress, error }, "input {text:?}");
            assert_eq!(controller.manual_progress(), progress);
        }
    }

    #[test]
    fn hundred_ticks_wrap_back_to_zero() {
        let mut controller = ProgressController::default();
        let published: Vec<u8> = (0..100).map(|_| controller.apply_tick()).collect();
        assert_eq!(published, (1..=100).collect::<Vec<u8>>());
        assert_eq!(published.iter().filter(|&&p| p == 100).count(), 1);
        assert_eq!(controller.auto_progress(), 0);
        assert_eq!(controller.auto_display(), 100);
        assert_eq!(controller.apply_tick(), 1);
    }

    #[test]
    fn cancel_after_three_ticks_stops_updates() {
        let mut controller = ProgressController::new(Duration::from_millis(5));
        controller.start_auto().unwrap();
        for _ in 0..3 {
            assert!(controller.wait_tick(WAIT));
        }
        controller.pause_auto();
        assert_eq!(controller.auto_progress(), 3);

        thread::sleep(Duration::from_millis(50));
        assert!(!controller.pump());
        assert!(!controller.wait_tick(Duration::from_millis(20)));
        assert_eq!(controller.auto_progress(), 3);
    }

    #[test]
    fn pump_applies_every_delivered_tick() {
        let mut controller = ProgressController::new(Duration::from_millis(2));
        controller.start_auto().unwrap();
        thread::sleep(Duration::from_millis(40));
        assert!(controller.pump());
        controller.pause_auto();
        assert!(controller.auto_progress() > 0);
    }

    #[test]
    fn toggle_starts_and_pauses() {
        let mut controller = ProgressController::new(Duration::from_secs(60));
        assert!(controller.toggle_auto().unwrap());
        assert!(controller.is_auto_running());
        assert!(!controller.toggle_auto().unwrap());
        assert!(!controller.is_auto_running());
    }

    #[test]
    fn hide_and_show_resume_only_a_running_ticker() {
        let mut controller = ProgressController::new(Duration::from_secs(60));
        controller.on_hide();
        controller.on_show().unwrap();
        assert!(!controller.is_auto_running());

        controller.start_auto().unwrap();
        controller.on_hide();
        assert!(!controller.is_auto_running());
        controller.on_show().unwrap();
        assert!(controller.is_auto_running());

        controller.on_destroy();
        controller.on_show().unwrap();
        assert!(!controller.is_auto_running());
    }

    #[test]
    fn ticks_from_another_thread_are_rejected() {
        let controller = ProgressController::default();
        let result = thread::spawn(move || {
            let mut controller = controller;
            controller.apply_tick();
        })
        .join();
        assert!(result.is_err());
    }
}
