//! The tick counter, the single callback slot, and the interrupt source.
//!
//! The hardware contract this models is deliberately narrow: a single
//! countdown/overflow timer peripheral that fires a periodic interrupt. On
//! every interrupt the tick counter is incremented by one and the registered
//! callback, if any, is invoked with the new count. The counter is the only
//! state shared between interrupt context and main-line code, and main-line
//! code may only [`read`](TickCounter::read) it, or
//! [`reset`](TickCounter::reset) it to zero once a timeline has completed
//! and the timer is disarmed.

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, AtomicU16, Ordering},
};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// One timer-interrupt-driven unit of elapsed time.
pub type Tick = u16;

/// Callback invoked from interrupt context with the just-incremented tick
/// count. Must be short and non-blocking; it runs on the interrupt path and
/// must never wait on interrupts itself.
pub type Callback = Box<dyn FnMut(Tick) + Send + 'static>;

/// Errors from timer configuration.
#[derive(Debug, Error)]
pub enum TimerError {
    /// Requested tick rate cannot be represented in the 16-bit tick domain.
    #[error("Tick rate {hz}Hz out of range (1..={max}Hz)")]
    RateOutOfRange { hz: u32, max: u32 },
}

/// Interrupt rate of the armed timer, in ticks per second.
///
/// Every timeline constant in [`crate::timeline`] is expressed in seconds
/// and multiplied by this rate, so the rate is configuration, never a
/// hard-coded tick count. The default of 32 matches a 250-count overflow at
/// a 1024 prescale on an 8MHz part; any other rate works as long as the
/// longest timeline (60s of alarm) still fits in 16 bits.
///
/// # Examples
///
/// ```
/// use deadbolt_timer::TickRate;
///
/// let rate = TickRate::default();
/// assert_eq!(rate.hz(), 32);
/// assert_eq!(rate.ticks_in(15), 480);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRate(u32);

impl TickRate {
    /// Default interrupt rate (ticks per second).
    pub const DEFAULT_HZ: u32 = 32;

    /// Highest representable rate: 60s of alarm timeline must fit in u16.
    pub const MAX_HZ: u32 = u16::MAX as u32 / 60;

    /// Create a tick rate with validation.
    ///
    /// # Errors
    /// Returns `TimerError::RateOutOfRange` if the rate is zero or the 60s
    /// alarm timeline would overflow the 16-bit tick counter.
    pub fn new(hz: u32) -> Result<Self, TimerError> {
        if hz == 0 || hz > Self::MAX_HZ {
            return Err(TimerError::RateOutOfRange {
                hz,
                max: Self::MAX_HZ,
            });
        }
        Ok(TickRate(hz))
    }

    /// Ticks per second.
    #[must_use]
    pub fn hz(&self) -> u32 {
        self.0
    }

    /// Tick count equivalent to `secs` seconds at this rate.
    #[must_use]
    pub fn ticks_in(&self, secs: u32) -> Tick {
        (self.0 * secs) as Tick
    }
}

impl Default for TickRate {
    fn default() -> Self {
        TickRate(Self::DEFAULT_HZ)
    }
}

/// Peripheral counting mode.
///
/// `Overflow` free-runs and auto-reloads a configured initial count;
/// `Compare` fires at an absolute threshold and needs no reload. Both
/// produce the same periodic interrupt as far as the tick counter is
/// concerned; the mode is carried so the configuration states which
/// hardware mechanism the period was derived from. An invalid mode cannot
/// be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Overflow,
    Compare,
}

/// Timer configuration: interrupt rate, real interrupt period, and mode.
///
/// Rate and period are deliberately separate. The rate fixes the tick
/// arithmetic (15s of door travel is always `15 * rate` ticks); the period
/// is how much wall time one tick takes, which tests and demos shrink to
/// run timelines in milliseconds without touching any schedule math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub rate: TickRate,
    pub period: Duration,
    pub mode: TimerMode,
}

impl TimerConfig {
    /// Real-time configuration: one tick lasts `1/rate` seconds.
    #[must_use]
    pub fn real_time(rate: TickRate) -> Self {
        TimerConfig {
            rate,
            period: Duration::from_secs(1) / rate.hz(),
            mode: TimerMode::Overflow,
        }
    }

    /// Accelerated configuration: same tick arithmetic, shorter wall time
    /// per tick.
    #[must_use]
    pub fn accelerated(rate: TickRate, period: Duration) -> Self {
        TimerConfig {
            rate,
            period,
            mode: TimerMode::Compare,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::real_time(TickRate::default())
    }
}

/// 16-bit wrapping tick counter shared between interrupt and main-line
/// context.
///
/// Incremented exclusively from the interrupt path; main-line code observes
/// it through cheap atomic loads and may reset it to zero only once the
/// owning timeline has completed and the timer is disarmed (disarming
/// quiesces the interrupt source, so the increment/reset race cannot
/// occur).
#[derive(Debug, Default)]
pub struct TickCounter(AtomicU16);

impl TickCounter {
    /// Increment by one, wrapping, and return the new count. Interrupt
    /// path only.
    pub(crate) fn bump(&self) -> Tick {
        self.0.fetch_add(1, Ordering::AcqRel).wrapping_add(1)
    }

    /// Current tick count.
    #[must_use]
    pub fn read(&self) -> Tick {
        self.0.load(Ordering::Acquire)
    }

    /// Reset to zero. Only valid from main-line code after the timer has
    /// been disarmed.
    pub fn reset(&self) {
        self.0.store(0, Ordering::Release);
    }
}

type CallbackSlot = Arc<Mutex<Option<Callback>>>;

/// The interrupt path: bump the counter, then invoke the callback if one is
/// registered.
///
/// The armed driver fires this once per period; tests fire it directly to
/// drive timelines deterministically without a clock.
#[derive(Clone)]
pub struct InterruptLine {
    counter: Arc<TickCounter>,
    slot: CallbackSlot,
}

impl InterruptLine {
    /// Run one interrupt: increment the tick counter, then call the
    /// registered callback with the new count.
    pub fn fire(&self) {
        let tick = self.counter.bump();
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(callback) = slot.as_mut() {
            callback(tick);
        }
    }

    /// The counter this line increments.
    #[must_use]
    pub fn counter(&self) -> &Arc<TickCounter> {
        &self.counter
    }
}

/// A node's single timer resource.
///
/// Owns the tick counter, the single callback slot, and the interrupt
/// source lifecycle. Registering a callback while another is set silently
/// supersedes it: last writer wins, no stacking. That single-slot design
/// is intentional and is what makes timelines mutually exclusive per node.
///
/// # Examples
///
/// ```
/// use deadbolt_timer::TickTimer;
///
/// let timer = TickTimer::new();
/// let line = timer.interrupt_line();
///
/// timer.set_callback(|tick| {
///     let _ = tick; // actuator transitions happen here
/// });
///
/// line.fire();
/// line.fire();
/// assert_eq!(timer.counter().read(), 2);
/// ```
pub struct TickTimer {
    counter: Arc<TickCounter>,
    slot: CallbackSlot,
    armed: Arc<AtomicBool>,
    driver: Option<JoinHandle<()>>,
}

impl TickTimer {
    /// Create a quiescent timer: counter at zero, no callback, not armed.
    #[must_use]
    pub fn new() -> Self {
        TickTimer {
            counter: Arc::new(TickCounter::default()),
            slot: Arc::new(Mutex::new(None)),
            armed: Arc::new(AtomicBool::new(false)),
            driver: None,
        }
    }

    /// The shared tick counter.
    #[must_use]
    pub fn counter(&self) -> &Arc<TickCounter> {
        &self.counter
    }

    /// A handle onto the interrupt path, for the armed driver and for
    /// deterministic tests.
    #[must_use]
    pub fn interrupt_line(&self) -> InterruptLine {
        InterruptLine {
            counter: Arc::clone(&self.counter),
            slot: Arc::clone(&self.slot),
        }
    }

    /// Register the callback, replacing any previous one.
    ///
    /// Single slot, last writer wins. The callback runs in interrupt
    /// context: keep it short, never block, never wait on the tick counter
    /// from inside it.
    pub fn set_callback(&self, callback: impl FnMut(Tick) + Send + 'static) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Box::new(callback));
    }

    /// Remove the registered callback, if any.
    pub fn clear_callback(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Whether the interrupt source is currently armed.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::Acquire)
    }

    /// Arm the interrupt source: fire the interrupt path once per
    /// configured period until disarmed.
    ///
    /// Re-arming replaces a previously armed source.
    pub fn arm(&mut self, config: TimerConfig) {
        if let Some(previous) = self.driver.take() {
            previous.abort();
        }

        debug!(rate_hz = config.rate.hz(), mode = ?config.mode, "arming timer");
        self.armed.store(true, Ordering::Release);

        let armed = Arc::clone(&self.armed);
        let line = self.interrupt_line();
        let period = config.period;
        self.driver = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; swallow it so
            // the first counted tick lands one period after arming.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !armed.load(Ordering::Acquire) {
                    break;
                }
                line.fire();
            }
        }));
    }

    /// Disarm: stop the interrupt source and wait for it to quiesce.
    ///
    /// After this returns no further increment can occur, which is what
    /// makes a subsequent [`TickCounter::reset`] race-free.
    pub async fn disarm(&mut self) {
        self.armed.store(false, Ordering::Release);
        if let Some(driver) = self.driver.take() {
            driver.abort();
            let _ = driver.await;
        }
        debug!("timer disarmed");
    }

    /// Block until the tick counter reaches `target`.
    ///
    /// This is a busy-poll of the counter; the caller does nothing else
    /// while a timeline runs; actuator transitions keep happening through
    /// the interrupt path meanwhile. There is deliberately no cancellation:
    /// an armed timeline runs to completion.
    pub async fn wait_for_tick(&self, target: Tick) {
        trace!(target, "waiting on tick counter");
        loop {
            if self.counter.read() >= target {
                return;
            }
            tokio::time::sleep(Duration::from_micros(100)).await;
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickTimer {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_rate_default_and_arithmetic() {
        let rate = TickRate::default();
        assert_eq!(rate.hz(), 32);
        assert_eq!(rate.ticks_in(15), 480);
        assert_eq!(rate.ticks_in(18), 576);
        assert_eq!(rate.ticks_in(33), 1056);
        assert_eq!(rate.ticks_in(60), 1920);
    }

    #[test]
    fn test_tick_rate_bounds() {
        assert!(TickRate::new(0).is_err());
        assert!(TickRate::new(TickRate::MAX_HZ).is_ok());
        assert!(TickRate::new(TickRate::MAX_HZ + 1).is_err());
    }

    #[test]
    fn test_counter_read_reset() {
        let counter = TickCounter::default();
        assert_eq!(counter.read(), 0);
        assert_eq!(counter.bump(), 1);
        assert_eq!(counter.bump(), 2);
        assert_eq!(counter.read(), 2);
        counter.reset();
        assert_eq!(counter.read(), 0);
    }

    #[test]
    fn test_counter_wraps_at_u16() {
        let counter = TickCounter(AtomicU16::new(u16::MAX));
        assert_eq!(counter.bump(), 0);
    }

    #[test]
    fn test_interrupt_fires_callback_with_new_count() {
        let timer = TickTimer::new();
        let line = timer.interrupt_line();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        timer.set_callback(move |tick| {
            sink.lock().unwrap().push(tick);
        });

        line.fire();
        line.fire();
        line.fire();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(timer.counter().read(), 3);
    }

    #[test]
    fn test_interrupt_without_callback_still_counts() {
        let timer = TickTimer::new();
        let line = timer.interrupt_line();
        line.fire();
        line.fire();
        assert_eq!(timer.counter().read(), 2);
    }

    #[test]
    fn test_callback_slot_last_writer_wins() {
        let timer = TickTimer::new();
        let line = timer.interrupt_line();
        let first = Arc::new(AtomicU16::new(0));
        let second = Arc::new(AtomicU16::new(0));

        let hits = Arc::clone(&first);
        timer.set_callback(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        // Registering again silently supersedes; no stacking.
        let hits = Arc::clone(&second);
        timer.set_callback(move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        line.fire();
        line.fire();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_callback() {
        let timer = TickTimer::new();
        let line = timer.interrupt_line();
        let hits = Arc::new(AtomicU16::new(0));

        let sink = Arc::clone(&hits);
        timer.set_callback(move |_| {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        line.fire();
        timer.clear_callback();
        line.fire();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_armed_timer_counts_periodically() {
        let mut timer = TickTimer::new();
        let config = TimerConfig::accelerated(
            TickRate::default(),
            Duration::from_millis(1),
        );
        timer.arm(config);
        assert!(timer.is_armed());

        timer.wait_for_tick(10).await;
        assert!(timer.counter().read() >= 10);

        timer.disarm().await;
        assert!(!timer.is_armed());

        let settled = timer.counter().read();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(timer.counter().read(), settled, "disarmed timer kept counting");

        timer.counter().reset();
        assert_eq!(timer.counter().read(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_driver() {
        let mut timer = TickTimer::new();
        let fast = TimerConfig::accelerated(TickRate::default(), Duration::from_millis(1));
        timer.arm(fast);
        timer.wait_for_tick(5).await;

        timer.arm(fast);
        timer.wait_for_tick(20).await;
        timer.disarm().await;
        assert!(timer.counter().read() >= 20);
    }

    #[test]
    fn test_timer_config_real_time_period() {
        let config = TimerConfig::real_time(TickRate::default());
        assert_eq!(config.period, Duration::from_secs(1) / 32);
        assert_eq!(config.mode, TimerMode::Overflow);
    }

    #[test]
    fn test_timer_mode_serialization() {
        let serialized = serde_json::to_string(&TimerMode::Overflow).unwrap();
        assert_eq!(serialized, "\"overflow\"");
    }
}
