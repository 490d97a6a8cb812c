//! Fixed-interval polling tied to the lifetime of a view. The first tick fires
//! one period after `start`; `stop` (or dropping the task) cancels the timer.
//! Ticks do not wait for work they trigger, so a slow fetch can overlap the
//! next one.

use std::time::Duration;
use tracing::debug;

/// A running poll timer.
pub struct PollTask {
    period: Duration,
    handle: Option<imp::Handle>,
}

impl PollTask {
    /// Starts calling `tick` every `period`.
    #[cfg(target_arch = "wasm32")]
    pub fn start(period: Duration, tick: impl FnMut() + 'static) -> Self {
        debug!(period_ms = period.as_millis() as u64, "poll started");
        Self {
            period,
            handle: Some(imp::spawn(period, tick)),
        }
    }

    /// Starts calling `tick` every `period`. Requires a running Tokio runtime.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn start(period: Duration, tick: impl FnMut() + Send + 'static) -> Self {
        debug!(period_ms = period.as_millis() as u64, "poll started");
        Self {
            period,
            handle: Some(imp::spawn(period, tick)),
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Cancels the timer; calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            imp::cancel(handle);
            debug!("poll stopped");
        }
    }
}

impl Drop for PollTask {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use gloo_timers::callback::Interval;
    use std::time::Duration;

    pub(super) type Handle = Interval;

    pub(super) fn spawn(period: Duration, tick: impl FnMut() + 'static) -> Handle {
        let millis = u32::try_from(period.as_millis()).unwrap_or(u32::MAX);
        Interval::new(millis, tick)
    }

    pub(super) fn cancel(handle: Handle) {
        handle.cancel();
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use std::time::Duration;
    use tokio::{
        task::JoinHandle,
        time::{Instant, MissedTickBehavior, interval_at},
    };

    pub(super) type Handle = JoinHandle<()>;

    pub(super) fn spawn(period: Duration, mut tick: impl FnMut() + Send + 'static) -> Handle {
        tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                timer.tick().await;
                tick();
            }
        })
    }

    pub(super) fn cancel(handle: Handle) {
        handle.abort();
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::PollTask;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };
    use tokio::time::sleep;

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_after_the_first_period() {
        let (count, tick) = counter();
        let task = PollTask::start(Duration::from_secs(3), tick);

        sleep(Duration::from_millis(2_900)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);

        sleep(Duration::from_millis(6_200)).await;
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert!(task.is_running());
        assert_eq!(task.period(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_further_ticks() {
        let (count, tick) = counter();
        let mut task = PollTask::start(Duration::from_secs(3), tick);

        sleep(Duration::from_millis(3_100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        task.stop();
        task.stop();
        assert!(!task.is_running());

        sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_task_cancels_it() {
        let (count, tick) = counter();
        let task = PollTask::start(Duration::from_secs(3), tick);
        drop(task);

        sleep(Duration::from_secs(30)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
