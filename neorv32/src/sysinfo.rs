//! Access to the SYSINFO module, which describes the processor's configuration.

use ledbench::delay::ClockSource;

/// The base address of the SYSINFO module.
const SYSINFO_BASE: usize = 0xFFFE_0000;
/// The offset of the CLK register, which holds the core clock frequency in Hz.
const SYSINFO_CLK: usize = 0x0;

/// Provides the core clock frequency. Requires the processor to be synthesized with SYSINFO
/// enabled.
pub struct Sysinfo {
    _private: (),
}

impl Sysinfo {
    pub(crate) const fn new() -> Sysinfo {
        Sysinfo { _private: () }
    }
}

impl ClockSource for Sysinfo {
    fn read_hz(&self) -> u32 {
        // SAFETY: the CLK register is a read-only, always-present register of the SYSINFO module.
        unsafe { core::ptr::read_volatile((SYSINFO_BASE + SYSINFO_CLK) as *const u32) }
    }
}
