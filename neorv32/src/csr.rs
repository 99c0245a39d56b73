//! Access to the CPU's `cycle`/`cycleh` and `instret`/`instreth` counter CSRs.

use ledbench::counter::{CounterKind, HalfCounterSource};
use riscv::register::{cycle, cycleh, instret, instreth};

/// Reads the counter halves using the unprivileged counter CSRs (i.e. `rdcycle`, `rdcycleh`,
/// `rdinstret` and `rdinstreth`). Requires the core to be configured with the Zicntr extension.
pub struct CsrCounters {
    _private: (),
}

impl CsrCounters {
    pub(crate) const fn new() -> CsrCounters {
        CsrCounters { _private: () }
    }
}

impl HalfCounterSource for CsrCounters {
    #[inline(always)]
    fn read_low_half(&self, kind: CounterKind) -> u32 {
        (match kind {
            CounterKind::Cycle => cycle::read(),
            CounterKind::InstructionsRetired => instret::read(),
        }) as u32
    }

    #[inline(always)]
    fn read_high_half(&self, kind: CounterKind) -> u32 {
        (match kind {
            CounterKind::Cycle => cycleh::read(),
            CounterKind::InstructionsRetired => instreth::read(),
        }) as u32
    }
}
