//! This binary runs the four-wide multiply workload once, and only indicates when it's done: all
//! LEDs are off while the workload runs, and all LEDs turn on once it has finished. The run time
//! can then be measured externally, e.g. with a stopwatch or by filming the board.
//!
//! No counters, SYSINFO or UART are used, so this also works on minimal core configurations.

#![no_std]
#![no_main]

use ledbench::{
    harness::{Harness, HarnessConfig},
    reporter::{LedPort, ResultReporter, Timing},
    workload::KernelVariant,
};
use ledbench_neorv32::{delay::SpinDelay, Board, POLARITY};
use panic_halt as _;
use riscv_rt::entry;

/// The number of `nop` loop iterations per millisecond assumed by the hold delay. This isn't
/// calibrated, so the actual hold time varies with the clock frequency.
const SPIN_ITERATIONS_PER_MS: u32 = 2_500;
/// How long to keep the LEDs on after the run, before parking the core.
const DONE_HOLD_MS: u32 = 2_000;

#[entry]
fn main() -> ! {
    let board = Board::take().unwrap();
    let mut reporter = ResultReporter::new(
        LedPort::new(board.gpio, POLARITY),
        SpinDelay::new(SPIN_ITERATIONS_PER_MS),
        Timing::default(),
    );

    let mut harness = Harness::new(HarnessConfig {
        variant: KernelVariant::FourWide,
        ..Default::default()
    });
    harness.run_indicator(&mut reporter, DONE_HOLD_MS);

    // The LEDs keep showing the done pattern.
    ledbench_neorv32::park()
}
