use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);
const LOW_TIME_SECS: u64 = 5 * 60;
const CRITICAL_TIME_SECS: u64 = 60;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    Idle,
    Running,
    Expired,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WarningLevel {
    Normal,
    Low,
    Critical,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub remaining_secs: u64,
    pub total_secs: u64,
}

impl TimerSnapshot {
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs - self.remaining_secs
    }

    pub fn warning_level(&self) -> WarningLevel {
        if self.phase != TimerPhase::Running {
            return WarningLevel::Normal;
        }
        if self.remaining_secs <= CRITICAL_TIME_SECS {
            WarningLevel::Critical
        } else if self.remaining_secs <= LOW_TIME_SECS {
            WarningLevel::Low
        } else {
            WarningLevel::Normal
        }
    }

    /// `MM:SS`, or `H:MM:SS` from one hour up.
    pub fn clock(&self) -> String {
        let hours = self.remaining_secs / 3600;
        let minutes = (self.remaining_secs % 3600) / 60;
        let seconds = self.remaining_secs % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }
}

/// Invoked once when the countdown reaches zero. It runs as its own task so
/// stopping the timer never cancels work the handler started.
pub type ExpiryHandler = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Whole-second countdown driven by a tokio interval.
///
/// A timer with zero seconds is untimed and never leaves `Idle`.
#[derive(Debug)]
pub struct CountdownTimer {
    state: Arc<watch::Sender<TimerSnapshot>>,
    handle: Option<JoinHandle<()>>,
}

impl CountdownTimer {
    pub fn new(total_secs: u64) -> Self {
        let (state, _) = watch::channel(TimerSnapshot {
            phase: TimerPhase::Idle,
            remaining_secs: total_secs,
            total_secs,
        });

        Self {
            state: Arc::new(state),
            handle: None,
        }
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        *self.state.borrow()
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.borrow().phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.state.borrow().remaining_secs
    }

    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.state.subscribe()
    }

    /// Starts ticking. Must be called from within a tokio runtime. Returns
    /// false when the timer is untimed or has already left `Idle`.
    pub fn start(&mut self, on_expire: ExpiryHandler) -> bool {
        let snapshot = self.snapshot();
        if snapshot.total_secs == 0 {
            log::debug!("Countdown not started: attempt is untimed");
            return false;
        }
        if snapshot.phase != TimerPhase::Idle {
            log::debug!("Countdown already {:?}; ignoring start", snapshot.phase);
            return false;
        }

        self.state.send_modify(|s| s.phase = TimerPhase::Running);
        log::info!("Countdown started with {} seconds", snapshot.total_secs);

        let state = Arc::clone(&self.state);
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + TICK, TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let mut expired = false;
                let mut running = true;
                state.send_modify(|s| {
                    if s.phase != TimerPhase::Running {
                        running = false;
                        return;
                    }
                    s.remaining_secs = s.remaining_secs.saturating_sub(1);
                    if s.remaining_secs == 0 {
                        s.phase = TimerPhase::Expired;
                        expired = true;
                    }
                });

                if expired {
                    log::info!("Countdown expired");
                    tokio::spawn(on_expire());
                    break;
                }
                if !running {
                    break;
                }
            }
        }));

        true
    }

    /// Cancels the tick task. Expiry is terminal and is left as is.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.state.send_modify(|s| {
            if matches!(s.phase, TimerPhase::Idle | TimerPhase::Running) {
                s.phase = TimerPhase::Stopped;
            }
        });
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handler(counter: &Arc<AtomicUsize>) -> ExpiryHandler {
        let counter = Arc::clone(counter);
        Box::new(move || {
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
            })
        })
    }

    #[test]
    fn clock_formats_minutes_and_hours() {
        let snapshot = |remaining_secs| TimerSnapshot {
            phase: TimerPhase::Running,
            remaining_secs,
            total_secs: 7200,
        };

        assert_eq!(snapshot(59).clock(), "00:59");
        assert_eq!(snapshot(605).clock(), "10:05");
        assert_eq!(snapshot(3661).clock(), "1:01:01");
    }

    #[test]
    fn warning_levels_follow_remaining_time() {
        let snapshot = |remaining_secs| TimerSnapshot {
            phase: TimerPhase::Running,
            remaining_secs,
            total_secs: 3600,
        };

        assert_eq!(snapshot(301).warning_level(), WarningLevel::Normal);
        assert_eq!(snapshot(300).warning_level(), WarningLevel::Low);
        assert_eq!(snapshot(60).warning_level(), WarningLevel::Critical);
    }

    #[tokio::test]
    async fn untimed_timer_stays_idle() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut timer = CountdownTimer::new(0);

        assert!(!timer.start(counting_handler(&counter)));
        assert_eq!(timer.phase(), TimerPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn expires_exactly_once_after_duration() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut timer = CountdownTimer::new(5);
        let mut rx = timer.subscribe();

        assert!(timer.start(counting_handler(&counter)));
        assert!(!timer.start(counting_handler(&counter)));

        let mut observed = Vec::new();
        while rx.changed().await.is_ok() {
            let snapshot = *rx.borrow_and_update();
            observed.push(snapshot.remaining_secs);
            if snapshot.phase == TimerPhase::Expired {
                break;
            }
        }

        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(timer.phase(), TimerPhase::Expired);
        assert_eq!(timer.remaining_secs(), 0);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(observed.last(), Some(&0));
        assert!(observed.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut timer = CountdownTimer::new(60);
        timer.start(counting_handler(&counter));

        time::sleep(Duration::from_millis(10_500)).await;

        assert_eq!(timer.remaining_secs(), 50);
        assert_eq!(timer.snapshot().elapsed_secs(), 10);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_cancels_before_expiry() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut timer = CountdownTimer::new(3);
        timer.start(counting_handler(&counter));

        time::sleep(Duration::from_millis(1500)).await;
        timer.stop();
        time::sleep(Duration::from_secs(10)).await;

        assert_eq!(timer.phase(), TimerPhase::Stopped);
        assert_eq!(timer.remaining_secs(), 2);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_timer_cancels_ticks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut timer = CountdownTimer::new(2);
        timer.start(counting_handler(&counter));
        drop(timer);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
