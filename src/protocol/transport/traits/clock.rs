//! Monotonic millisecond clock consumed by the polled timers (heartbeat).

/// Source of monotonic time. Implementations must never go backwards.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Clock backed by the `embassy-time` driver of the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    #[inline]
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
