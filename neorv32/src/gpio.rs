//! Access to the GPIO module's output port.

use ledbench::reporter::ParallelOutput;

/// The base address of the GPIO module.
const GPIO_BASE: usize = 0xFFFC_0000;
/// The offset of the PORT_OUT register.
const GPIO_PORT_OUT: usize = 0x4;

/// Drives GPIO outputs 0 through 7. The remaining outputs are driven low.
///
/// Values are written as-is: any inversion required by the board's wiring must be done by the
/// caller (see [ledbench::reporter::LedPort]).
pub struct GpioPort {
    _private: (),
}

impl GpioPort {
    pub(crate) const fn new() -> GpioPort {
        GpioPort { _private: () }
    }
}

impl ParallelOutput for GpioPort {
    fn write(&mut self, value: u8) {
        // SAFETY: PORT_OUT is a plain read/write register of the GPIO module, and we hold the only
        // GpioPort instance.
        unsafe {
            core::ptr::write_volatile((GPIO_BASE + GPIO_PORT_OUT) as *mut u32, u32::from(value))
        }
    }
}
