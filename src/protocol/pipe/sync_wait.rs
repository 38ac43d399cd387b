//! Startup rendezvous between cores.
use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Barrier for `parties` execution contexts, usable once.
///
/// Every caller of [`SyncWait::wait`] takes a ticket. All but the last spin
/// until the last one arrives; the last one never blocks and releases the
/// others.
pub struct SyncWait {
    remaining: Mutex<CriticalSectionRawMutex, Cell<u8>>,
}

impl SyncWait {
    pub const fn new(parties: u8) -> Self {
        Self {
            remaining: Mutex::new(Cell::new(parties)),
        }
    }

    /// Two-core rendezvous.
    pub const fn pair() -> Self {
        Self::new(2)
    }

    pub fn wait(&self) {
        let last = self.remaining.lock(|remaining| {
            let left = remaining.get().saturating_sub(1);
            remaining.set(left);
            left == 0
        });
        if last {
            return;
        }
        while !self.is_released() {
            core::hint::spin_loop();
        }
    }

    /// `true` once every party has arrived.
    pub fn is_released(&self) -> bool {
        self.remaining.lock(|remaining| remaining.get() == 0)
    }
}
