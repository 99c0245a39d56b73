//! An uncalibrated busy-wait delay, for when neither the clock frequency nor the cycle counter
//! should be relied upon.

use ledbench::delay::Delay;

/// Waits by executing a fixed number of `nop` loop iterations per millisecond. The actual duration
/// depends on the clock frequency and on how many cycles each loop iteration takes.
pub struct SpinDelay {
    iterations_per_ms: u32,
}

impl SpinDelay {
    /// Constructs a new [SpinDelay] instance.
    pub const fn new(iterations_per_ms: u32) -> SpinDelay {
        SpinDelay { iterations_per_ms }
    }

    /// Executes the given number of `nop` loop iterations.
    pub fn spin(iterations: u32) {
        for _ in 0..iterations {
            // The asm! block can't be optimized away, and hence neither can the loop.
            unsafe { core::arch::asm!("nop") };
        }
    }
}

impl Delay for SpinDelay {
    fn delay_ms(&mut self, ms: u32) {
        Self::spin(self.iterations_per_ms.saturating_mul(ms));
    }
}
