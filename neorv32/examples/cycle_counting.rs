//! This binary measures how many CPU cycles and retired instructions a multiply-heavy workload
//! takes, and shows both results on the board's eight LEDs.
//!
//! Each result is shown as eight frames of one byte each, most significant byte first, with every
//! frame held for 500ms. After the last frame of a result the LEDs stay on for another 800ms, then
//! turn off for a second before the next result is shown. The cycle count is shown first, then the
//! instruction count, and the pair is repeated forever. Filming the LEDs is the easiest way to read
//! the results off.
//!
//! The workload and its iteration counts are fixed, so that results are comparable across different
//! core configurations (e.g. with a faster or slower multiplier).

#![no_std]
#![no_main]

use ledbench::{
    counter::{CounterKind, WideCounterReader},
    delay::CycleDelay,
    harness::{Harness, HarnessConfig},
    reporter::{LedPort, ResultReporter, Timing},
};
use ledbench_neorv32::{Board, POLARITY};
use log::info;
use panic_halt as _;
use riscv_rt::entry;

#[entry]
fn main() -> ! {
    #[cfg(feature = "uart-log")]
    ledbench_neorv32::logger::init_logger_from_env();
    info!("Booted up!");

    let board = Board::take().unwrap();
    let counters = WideCounterReader::new(board.counters);
    // The delays are calibrated using the clock frequency reported by SYSINFO.
    let delay = CycleDelay::new(&board.sysinfo, counters.counter(CounterKind::Cycle));
    let mut reporter = ResultReporter::new(
        LedPort::new(board.gpio, POLARITY),
        delay,
        Timing::default(),
    );
    // Start with all LEDs off, so that the first frame is clearly distinguishable.
    reporter.reset();

    let mut harness = Harness::new(HarnessConfig::default());
    let measurement = harness.measure(&counters);

    reporter.show_forever(&measurement.values())
}
