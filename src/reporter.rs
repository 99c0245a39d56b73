//! Reports measurement results on an 8-bit parallel output, such as a row of eight LEDs.
//!
//! Two reporting modes are supported:
//! - Serialized: a 64-bit value is shown as a sequence of eight frames, one byte per frame, from the
//!   most significant byte to the least significant byte. Each frame is held for a fixed dwell time
//!   so that it can be read off (or filmed) by an observer. See [ResultReporter::show].
//! - Run/done indicator: the output is switched between two fixed patterns, all outputs inactive
//!   while the benchmark is running and all outputs active once it is done. See
//!   [ResultReporter::mark_running] and [ResultReporter::mark_done].
//!
//! Output patterns are handled as logical values throughout this module (a set bit means "output
//! active"). The [Polarity] of the board only comes into play right before a value is written to the
//! device, in [LedPort].

use crate::debug_util;
use crate::delay::Delay;
use byteorder::{BigEndian, ByteOrder};
use log::debug;

/// The logical pattern with all outputs inactive.
pub const PATTERN_ALL_OFF: u8 = 0x00;
/// The logical pattern with all outputs active.
pub const PATTERN_ALL_ON: u8 = 0xFF;

/// The number of frames needed to show a 64-bit value.
pub const FRAMES_PER_VALUE: usize = 8;

/// Describes how the board's outputs respond to logic levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// An output is active when driven high.
    ActiveHigh,
    /// An output is active when driven low. Common for LEDs wired between the supply and the pin.
    ActiveLow,
}

impl Polarity {
    /// Converts a logical pattern into the value that must be written to the device to show it.
    pub const fn apply(self, pattern: u8) -> u8 {
        match self {
            Polarity::ActiveHigh => pattern,
            Polarity::ActiveLow => !pattern,
        }
    }
}

/// An 8-bit output device. Each write is applied to the outputs immediately.
pub trait ParallelOutput {
    /// Drives the outputs to the given (physical) value.
    fn write(&mut self, value: u8);
}

/// A [ParallelOutput] together with its [Polarity], accepting logical patterns.
pub struct LedPort<O> {
    output: O,
    polarity: Polarity,
}

impl<O: ParallelOutput> LedPort<O> {
    /// Constructs a new [LedPort] instance.
    pub const fn new(output: O, polarity: Polarity) -> LedPort<O> {
        LedPort { output, polarity }
    }

    /// Shows the given logical pattern.
    pub fn write_pattern(&mut self, pattern: u8) {
        self.output.write(self.polarity.apply(pattern));
    }
}

/// One byte of a value being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// The position of the byte within the value, with 7 being the most significant byte.
    pub position: u8,
    pub byte: u8,
}

/// Splits a value into the frames used to show it, most significant byte first.
pub fn frames(value: u64) -> Frames {
    let mut bytes = [0u8; FRAMES_PER_VALUE];
    BigEndian::write_u64(&mut bytes, value);
    Frames { bytes, next: 0 }
}

/// Reassembles a value from its frames. Frames may be provided in any order. Frames with a
/// position that doesn't exist in a 64-bit value are ignored.
pub fn reassemble(frames: impl IntoIterator<Item = Frame>) -> u64 {
    let mut bytes = [0u8; FRAMES_PER_VALUE];
    for frame in frames {
        let Some(idx) = (FRAMES_PER_VALUE - 1).checked_sub(usize::from(frame.position)) else {
            continue;
        };
        bytes[idx] = frame.byte;
    }
    BigEndian::read_u64(&bytes)
}

/// An iterator over the frames of a value. See [frames].
#[derive(Debug, Clone)]
pub struct Frames {
    bytes: [u8; FRAMES_PER_VALUE],
    next: usize,
}

impl Iterator for Frames {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let byte = *self.bytes.get(self.next)?;
        let position = (FRAMES_PER_VALUE - 1 - self.next) as u8;
        self.next += 1;
        Some(Frame { position, byte })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = FRAMES_PER_VALUE - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Frames {}

/// The hold times used when showing values. Changing these doesn't affect the measurements, but
/// observers (and any tooling that decodes recordings of the outputs) rely on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// How long each frame is shown.
    pub frame_dwell_ms: u32,
    /// How long the last frame of a value remains shown, on top of its dwell time.
    pub post_sequence_pause_ms: u32,
    /// How long the outputs stay inactive in between two values.
    pub inter_value_pause_ms: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            frame_dwell_ms: 500,
            post_sequence_pause_ms: 800,
            inter_value_pause_ms: 1000,
        }
    }
}

/// The current state of a [ResultReporter].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterState {
    /// All outputs are inactive, and no value is being shown.
    Idle,
    /// The frame at the given position is being shown.
    Frame(u8),
    /// The last frame of a value remains shown for a while longer.
    Pause,
    /// Run/done indicator mode: the benchmark is running.
    Running,
    /// Run/done indicator mode: the benchmark has finished.
    Done,
}

/// Shows values on an [LedPort], using a [Delay] to hold each pattern.
pub struct ResultReporter<O, D> {
    port: LedPort<O>,
    delay: D,
    timing: Timing,
    state: ReporterState,
}

impl<O: ParallelOutput, D: Delay> ResultReporter<O, D> {
    /// Constructs a new [ResultReporter] instance. Nothing is written to the port until one of the
    /// other methods is called; callers will usually want to call [ResultReporter::reset] first.
    pub fn new(port: LedPort<O>, delay: D, timing: Timing) -> ResultReporter<O, D> {
        ResultReporter {
            port,
            delay,
            timing,
            state: ReporterState::Idle,
        }
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Turns all outputs off.
    pub fn reset(&mut self) {
        self.port.write_pattern(PATTERN_ALL_OFF);
        self.state = ReporterState::Idle;
    }

    /// Shows the given value, one frame at a time, after which all outputs are turned off again.
    pub fn show(&mut self, value: u64) {
        if log::log_enabled!(log::Level::Debug) {
            debug!("Showing {value} ({})", debug_util::FormatFrames(value));
        }
        for frame in frames(value) {
            self.state = ReporterState::Frame(frame.position);
            self.port.write_pattern(frame.byte);
            self.delay.delay_ms(self.timing.frame_dwell_ms);
        }
        self.state = ReporterState::Pause;
        self.delay.delay_ms(self.timing.post_sequence_pause_ms);
        self.reset();
    }

    /// Shows each of the given values in turn, with a pause in between each pair of values.
    pub fn show_sequence(&mut self, values: &[u64]) {
        for (idx, value) in values.iter().enumerate() {
            if idx > 0 {
                self.delay.delay_ms(self.timing.inter_value_pause_ms);
            }
            self.show(*value);
        }
    }

    /// Keeps showing the given values forever, since once the benchmark is done there's nothing
    /// else the device can do to make the results available.
    pub fn show_forever(&mut self, values: &[u64]) -> ! {
        self.show_sequence(values);
        loop {
            self.delay.delay_ms(self.timing.inter_value_pause_ms);
            self.show_sequence(values);
        }
    }

    /// Run/done indicator mode: indicates that the benchmark is running, by turning all outputs off.
    pub fn mark_running(&mut self) {
        self.port.write_pattern(PATTERN_ALL_OFF);
        self.state = ReporterState::Running;
    }

    /// Run/done indicator mode: indicates that the benchmark has finished, by turning all outputs
    /// on, and then holds that pattern for `hold_ms` milliseconds.
    pub fn mark_done(&mut self, hold_ms: u32) {
        self.port.write_pattern(PATTERN_ALL_ON);
        self.state = ReporterState::Done;
        self.delay.delay_ms(hold_ms);
    }
}
