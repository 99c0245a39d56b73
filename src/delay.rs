//! Busy-wait delays. There is no scheduler or timer interrupt involved in any of the waiting that
//! the harness does: the core simply spins until enough time has passed.

use crate::counter::WideCounter;

/// Blocks the caller for a given amount of time.
pub trait Delay {
    /// Blocks for (at least approximately) `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Provides the core's clock frequency.
pub trait ClockSource {
    /// Returns the core clock frequency, in Hz.
    fn read_hz(&self) -> u32;
}

/// A calibrated delay, which converts the requested duration into a number of clock cycles based
/// on the [ClockSource]'s frequency, and then spins until the cycle counter has advanced by at least
/// that many cycles.
///
/// The clock frequency is read once, at construction time, and isn't validated. A frequency of zero
/// results in delays that return immediately.
pub struct CycleDelay<W> {
    cycle_counter: W,
    cycles_per_ms: u64,
}

impl<W: WideCounter> CycleDelay<W> {
    /// Constructs a new [CycleDelay] instance. `cycle_counter` must count clock cycles.
    pub fn new<C: ClockSource>(clock: &C, cycle_counter: W) -> CycleDelay<W> {
        CycleDelay {
            cycle_counter,
            cycles_per_ms: u64::from(clock.read_hz()) / 1000,
        }
    }

    /// Returns the number of cycles that a delay of `ms` milliseconds spins for.
    pub fn cycles_for_ms(&self, ms: u32) -> u64 {
        self.cycles_per_ms * u64::from(ms)
    }
}

impl<W: WideCounter> Delay for CycleDelay<W> {
    fn delay_ms(&mut self, ms: u32) {
        let cycles = self.cycles_for_ms(ms);
        let start = self.cycle_counter.read();
        while self.cycle_counter.read().wrapping_sub(start) < cycles {
            core::hint::spin_loop();
        }
    }
}
