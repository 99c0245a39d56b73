//! Reads the CPU's 64-bit cycle and retired-instruction counters on cores that only expose them as
//! pairs of 32-bit halves.
//!
//! On RV32 cores the `cycle` and `instret` counters are each split into a low half (`cycle`,
//! `instret`) and a high half (`cycleh`, `instreth`), which have to be read with separate
//! instructions. Since the counter keeps running in between those reads, naively combining the two
//! halves can produce a torn value. [WideCounterReader::read_wide] detects and corrects this.

use log::trace;

/// The hardware counters that the harness samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// The number of clock cycles executed by the core.
    Cycle,
    /// The number of instructions retired by the core.
    InstructionsRetired,
}

/// Provides access to the two 32-bit halves of each hardware counter. Implemented once per target
/// platform.
///
/// Both halves must come from the same free-running, monotonic counter, which only ever wraps
/// around at 2^64 (i.e. the high half is incremented whenever the low half wraps around).
pub trait HalfCounterSource {
    /// Reads the least significant 32 bits of the given counter.
    fn read_low_half(&self, kind: CounterKind) -> u32;
    /// Reads the most significant 32 bits of the given counter.
    fn read_high_half(&self, kind: CounterKind) -> u32;
}

impl<S: HalfCounterSource + ?Sized> HalfCounterSource for &S {
    fn read_low_half(&self, kind: CounterKind) -> u32 {
        (**self).read_low_half(kind)
    }
    fn read_high_half(&self, kind: CounterKind) -> u32 {
        (**self).read_high_half(kind)
    }
}

/// A source of full-width 64-bit counter values.
pub trait WideCounter {
    /// Reads the current counter value.
    fn read(&self) -> u64;
}

/// Assembles consistent 64-bit counter values out of a [HalfCounterSource].
pub struct WideCounterReader<S> {
    source: S,
}

impl<S: HalfCounterSource> WideCounterReader<S> {
    /// Constructs a new [WideCounterReader] instance.
    pub const fn new(source: S) -> WideCounterReader<S> {
        WideCounterReader { source }
    }

    /// Reads the given counter as a single 64-bit value.
    ///
    /// The high half is read before and after the low half. If the two high half reads differ, then
    /// the low half wrapped around at some point during the sequence, and we can't tell whether the
    /// low value we read belongs to the first or the second high value. In that case the low half is
    /// read once more, and combined with the second high value.
    ///
    /// A single retry is sufficient: the low half takes 2^32 increments to wrap around again, far
    /// more than the handful of instructions between the reads.
    pub fn read_wide(&self, kind: CounterKind) -> u64 {
        let high_before = self.source.read_high_half(kind);
        let mut low = self.source.read_low_half(kind);
        let high_after = self.source.read_high_half(kind);
        if high_before != high_after {
            low = self.source.read_low_half(kind);
            trace!(
                "{kind:?} counter carried during read (high {high_before:08x} -> \
                 {high_after:08x}), re-read low half {low:08x}"
            );
        }
        (u64::from(high_after) << 32) | u64::from(low)
    }

    /// Returns a [WideCounter] that reads the given counter.
    pub fn counter(&self, kind: CounterKind) -> KindCounter<'_, S> {
        KindCounter { reader: self, kind }
    }

    /// Samples both counters, reading the cycle counter first.
    pub fn sample(&self) -> Sample {
        let cycles = self.read_wide(CounterKind::Cycle);
        let instructions = self.read_wide(CounterKind::InstructionsRetired);
        Sample {
            cycles,
            instructions,
        }
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }
}

/// A [WideCounter] that reads one specific kind of counter. See [WideCounterReader::counter].
pub struct KindCounter<'a, S> {
    reader: &'a WideCounterReader<S>,
    kind: CounterKind,
}

impl<'a, S: HalfCounterSource> WideCounter for KindCounter<'a, S> {
    fn read(&self) -> u64 {
        self.reader.read_wide(self.kind)
    }
}

/// The values of both counters, taken at (approximately) the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub cycles: u64,
    pub instructions: u64,
}

impl Sample {
    /// Returns the amount by which each counter advanced between `start` and this sample.
    ///
    /// Uses wrapping subtraction, so a counter which wrapped around in between still produces the
    /// right result (as long as it didn't advance by 2^64 or more, which is never the case).
    pub fn elapsed_since(&self, start: &Sample) -> Delta {
        Delta {
            cycles: self.cycles.wrapping_sub(start.cycles),
            instructions: self.instructions.wrapping_sub(start.instructions),
        }
    }
}

/// The difference between two [Sample]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delta {
    pub cycles: u64,
    pub instructions: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    /// Returns pre-recorded half values, in order, and records the order of the reads.
    #[derive(Default)]
    struct ScriptedHalves {
        highs: RefCell<VecDeque<u32>>,
        lows: RefCell<VecDeque<u32>>,
        reads: RefCell<Vec<(CounterKind, &'static str)>>,
    }

    impl ScriptedHalves {
        fn new(highs: &[u32], lows: &[u32]) -> ScriptedHalves {
            ScriptedHalves {
                highs: RefCell::new(highs.iter().copied().collect()),
                lows: RefCell::new(lows.iter().copied().collect()),
                reads: Default::default(),
            }
        }
    }

    impl HalfCounterSource for ScriptedHalves {
        fn read_low_half(&self, kind: CounterKind) -> u32 {
            self.reads.borrow_mut().push((kind, "low"));
            self.lows.borrow_mut().pop_front().expect("unexpected low read")
        }
        fn read_high_half(&self, kind: CounterKind) -> u32 {
            self.reads.borrow_mut().push((kind, "high"));
            self.highs.borrow_mut().pop_front().expect("unexpected high read")
        }
    }

    /// Emulates a real counter that advances by `step` after every half read.
    struct RunningCounter {
        value: Cell<u64>,
        step: u64,
    }

    impl RunningCounter {
        fn tick(&self) -> u64 {
            let value = self.value.get();
            self.value.set(value.wrapping_add(self.step));
            value
        }
    }

    impl HalfCounterSource for RunningCounter {
        fn read_low_half(&self, _kind: CounterKind) -> u32 {
            self.tick() as u32
        }
        fn read_high_half(&self, _kind: CounterKind) -> u32 {
            (self.tick() >> 32) as u32
        }
    }

    #[test]
    fn read_without_carry_combines_halves() {
        let reader = WideCounterReader::new(ScriptedHalves::new(&[0x1234, 0x1234], &[0xdeadbeef]));
        assert_eq!(0x0000_1234_dead_beef, reader.read_wide(CounterKind::Cycle));
        // No retry happened.
        assert_eq!(
            vec![
                (CounterKind::Cycle, "high"),
                (CounterKind::Cycle, "low"),
                (CounterKind::Cycle, "high")
            ],
            *reader.source().reads.borrow()
        );
    }

    #[test]
    fn read_with_carry_rereads_low_half() {
        // The low half was read just before it wrapped around, and the high half was incremented
        // before the second high read.
        let reader = WideCounterReader::new(ScriptedHalves::new(&[7, 8], &[0xffff_fffe, 0x3]));
        let value = reader.read_wide(CounterKind::InstructionsRetired);
        assert_eq!(0x0000_0008_0000_0003, value);
        // Combining the first high value with the first low value would be off by a full epoch
        // compared to the second high value.
        assert_ne!(0x0000_0007_ffff_fffe, value);
        assert_eq!(4, reader.source().reads.borrow().len());
    }

    #[test]
    fn read_with_carry_retries_only_once() {
        // Even if the high half were to change again, only one extra low read happens.
        let reader = WideCounterReader::new(ScriptedHalves::new(&[1, 2], &[0xffff_ffff, 0x0]));
        assert_eq!(0x0000_0002_0000_0000, reader.read_wide(CounterKind::Cycle));
        assert!(reader.source().highs.borrow().is_empty());
        assert!(reader.source().lows.borrow().is_empty());
    }

    #[test]
    fn read_running_counter_across_carry() {
        // For each starting point near a carry, the result must lie within the range of values
        // the counter held during the read sequence.
        for offset in 0..8u64 {
            let start = 0x0000_0001_ffff_fffc + offset;
            let reader = WideCounterReader::new(RunningCounter {
                value: Cell::new(start),
                step: 1,
            });
            let value = reader.read_wide(CounterKind::Cycle);
            let end = reader.source().value.get();
            assert!(
                (start..end).contains(&value),
                "start {start:x}, value {value:x}, end {end:x}"
            );
        }
    }

    #[test]
    fn sample_reads_cycles_before_instructions() {
        let reader = WideCounterReader::new(ScriptedHalves::new(&[0, 0, 1, 1], &[100, 50]));
        assert_eq!(
            Sample {
                cycles: 100,
                instructions: 0x1_0000_0032,
            },
            reader.sample()
        );
        let reads = reader.source().reads.borrow();
        assert_eq!(CounterKind::Cycle, reads[0].0);
        assert_eq!(CounterKind::InstructionsRetired, reads[5].0);
    }

    #[test]
    fn kind_counter_reads_selected_kind() {
        let reader = WideCounterReader::new(ScriptedHalves::new(&[3, 3], &[9]));
        assert_eq!(
            0x3_0000_0009,
            reader.counter(CounterKind::InstructionsRetired).read()
        );
        assert!(reader
            .source()
            .reads
            .borrow()
            .iter()
            .all(|(kind, _)| *kind == CounterKind::InstructionsRetired));
    }

    #[test]
    fn elapsed_wraps_around() {
        let start = Sample {
            cycles: u64::MAX - 9,
            instructions: 5,
        };
        let end = Sample {
            cycles: 10,
            instructions: 25,
        };
        assert_eq!(
            Delta {
                cycles: 20,
                instructions: 20,
            },
            end.elapsed_since(&start)
        );
    }
}
