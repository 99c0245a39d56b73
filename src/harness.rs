//! Ties the counters, the workload and the reporter together into a single benchmark run.

use crate::counter::{HalfCounterSource, WideCounterReader};
use crate::debug_util;
use crate::delay::Delay;
use crate::reporter::{ParallelOutput, ResultReporter};
use crate::workload::{KernelVariant, Sink};
use log::{debug, info};

/// Describes the work done in a benchmark run. Runs are only comparable with each other if they use
/// the same configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// The number of kernel iterations that are timed.
    pub timed_iterations: u32,
    /// The number of kernel iterations run before timing starts. Their result is discarded.
    pub warmup_iterations: u32,
    /// The kernel to run.
    pub variant: KernelVariant,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            timed_iterations: 5_000_000,
            warmup_iterations: 1_000,
            variant: KernelVariant::default(),
        }
    }
}

/// The result of a timed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// The number of cycles that elapsed during the timed run.
    pub cycles: u64,
    /// The number of instructions retired during the timed run.
    pub instructions: u64,
    /// The value returned by the kernel.
    pub accumulator: u32,
}

impl Measurement {
    /// Returns the values to report, in the order in which they should be shown.
    pub fn values(&self) -> [u64; 2] {
        [self.cycles, self.instructions]
    }
}

/// Runs benchmarks according to a [HarnessConfig].
pub struct Harness {
    config: HarnessConfig,
    sink: Sink,
}

impl Harness {
    /// Constructs a new [Harness] instance.
    pub const fn new(config: HarnessConfig) -> Harness {
        Harness {
            config,
            sink: Sink::new(),
        }
    }

    /// The sink that the accumulator of each timed run is stored to.
    pub fn sink(&self) -> &Sink {
        &self.sink
    }

    /// Warms up and then times the configured kernel, using the given counters.
    pub fn measure<S: HalfCounterSource>(&mut self, reader: &WideCounterReader<S>) -> Measurement {
        let variant = self.config.variant;
        self.measure_with(reader, |iterations| variant.run(iterations))
    }

    /// Like [Harness::measure], but times the given kernel instead of the configured one.
    ///
    /// The steps are strictly sequential: warm-up, start sample, timed run, storing the result to
    /// the sink, end sample.
    pub fn measure_with<S, K>(
        &mut self,
        reader: &WideCounterReader<S>,
        mut kernel: K,
    ) -> Measurement
    where
        S: HalfCounterSource,
        K: FnMut(u32) -> u32,
    {
        debug!(
            "Warming up with {} iterations of {:?}",
            self.config.warmup_iterations, self.config.variant
        );
        kernel(self.config.warmup_iterations);

        let start = reader.sample();
        let accumulator = kernel(self.config.timed_iterations);
        self.sink.observe(accumulator);
        let end = reader.sample();

        let delta = end.elapsed_since(&start);
        let measurement = Measurement {
            cycles: delta.cycles,
            instructions: delta.instructions,
            accumulator,
        };
        info!(
            "{:?} x{}: {} cycles, {} instructions (accumulator {accumulator:08x})",
            self.config.variant, self.config.timed_iterations, delta.cycles, delta.instructions,
        );
        if log::log_enabled!(log::Level::Debug) {
            debug!("Start {start:?}, end {end:?}");
            for value in measurement.values() {
                debug_util::log_frames(log::Level::Debug, value);
            }
        }
        measurement
    }

    /// Runs the configured kernel without measuring it, using the reporter's run/done indicator to
    /// show when the run has finished. The done pattern is held for `hold_ms` milliseconds.
    ///
    /// Returns the kernel's accumulator.
    pub fn run_indicator<O, D>(&mut self, reporter: &mut ResultReporter<O, D>, hold_ms: u32) -> u32
    where
        O: ParallelOutput,
        D: Delay,
    {
        reporter.mark_running();
        self.config.variant.run(self.config.warmup_iterations);
        let accumulator = self.config.variant.run(self.config.timed_iterations);
        self.sink.observe(accumulator);
        reporter.mark_done(hold_ms);
        info!(
            "{:?} x{} done (accumulator {accumulator:08x})",
            self.config.variant, self.config.timed_iterations
        );
        accumulator
    }
}
