/// Background auto-progress timeline: a worker thread that emits a tick per interval.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Shared cancellation flag. Once cancelled it stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick;

/// Handle to a running ticker. Ticks are collected on the owning thread.
pub struct AutoTicker {
    token: CancelToken,
    ticks: mpsc::Receiver<Tick>,
    wake: Option<mpsc::Sender<()>>,
    worker: Option<JoinHandle<()>>,
    interval: Duration,
}

impl AutoTicker {
    pub fn spawn(interval: Duration) -> std::io::Result<Self> {
        let token = CancelToken::new();
        let (tick_tx, ticks) = mpsc::channel();
        let (wake, wake_rx) = mpsc::channel::<()>();

        let worker_token = token.clone();
        let worker = thread::Builder::new()
            .name("auto-progress".into())
            .spawn(move || run(interval, &worker_token, &wake_rx, &tick_tx))?;

        tracing::debug!(?interval, "auto ticker started");
        Ok(Self {
            token,
            ticks,
            wake: Some(wake),
            worker: Some(worker),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drain delivered ticks without blocking. Always 0 after [`cancel`](Self::cancel).
    pub fn try_recv(&self) -> usize {
        if self.token.is_cancelled() {
            return 0;
        }
        let mut count = 0;
        loop {
            match self.ticks.try_recv() {
                Ok(Tick) => count += 1,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return count,
            }
        }
    }

    /// Block until one tick arrives or `timeout` passes.
    pub fn recv_timeout(&self, timeout: Duration) -> bool {
        !self.token.is_cancelled() && self.ticks.recv_timeout(timeout).is_ok()
    }

    /// Stop the worker and discard anything it already sent.
    pub fn cancel(&mut self) {
        self.token.cancel();
        if let Some(wake) = self.wake.take() {
            // the worker may already be gone
            let _ = wake.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("auto ticker worker panicked");
            }
            tracing::debug!("auto ticker cancelled");
        }
        while self.ticks.try_recv().is_ok() {}
    }
}

impl Drop for AutoTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run(
    interval: Duration,
    token: &CancelToken,
    wake: &mpsc::Receiver<()>,
    ticks: &mpsc::Sender<Tick>,
) {
    loop {
        match wake.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if token.is_cancelled() || ticks.send(Tick).is_err() {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    const FAST: Duration = Duration::from_millis(5);

    #[test]
    fn delivers_ticks_on_interval() {
        let ticker = AutoTicker::spawn(FAST).unwrap();
        assert_eq!(ticker.interval(), FAST);
        for _ in 0..3 {
            assert!(ticker.recv_timeout(Duration::from_secs(5)));
        }
    }

    #[test]
    fn cancel_is_prompt_and_final() {
        let mut ticker = AutoTicker::spawn(Duration::from_secs(60)).unwrap();
        let token = ticker.token().clone();
        let started = Instant::now();
        ticker.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(token.is_cancelled());
        assert!(ticker.is_cancelled());
        assert_eq!(ticker.try_recv(), 0);
        assert!(!ticker.recv_timeout(Duration::from_millis(20)));
    }

    #[test]
    fn pending_ticks_are_dropped_on_cancel() {
        let mut ticker = AutoTicker::spawn(Duration::from_millis(1)).unwrap();
        assert!(ticker.recv_timeout(Duration::from_secs(5)));
        thread::sleep(Duration::from_millis(20));
        ticker.cancel();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(ticker.try_recv(), 0);
    }

    #[test]
    fn token_clones_share_state() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }
}
