#![no_std]

// This crate contains the NEORV32-specific code: access to the CPU's counters and to the memory
// mapped SYSINFO, GPIO and UART peripherals. The register layouts follow the NEORV32 v1.10 memory
// map.

pub mod csr;
pub mod delay;
pub mod gpio;
#[cfg(feature = "uart-log")]
pub mod logger;
pub mod sysinfo;

use core::cell::Cell;
use critical_section::Mutex;
use ledbench::reporter::Polarity;

/// The polarity of the board's LEDs, selected by the `active-low` feature.
#[cfg(feature = "active-low")]
pub const POLARITY: Polarity = Polarity::ActiveLow;
/// The polarity of the board's LEDs, selected by the `active-low` feature.
#[cfg(not(feature = "active-low"))]
pub const POLARITY: Polarity = Polarity::ActiveHigh;

#[derive(Debug)]
pub enum Error {
    /// [Board::take] was called more than once.
    AlreadyTaken,
}
pub type Result<T> = core::result::Result<T, Error>;

/// Whether [Board::take] has been called before.
static TAKEN: Mutex<Cell<bool>> = Mutex::new(Cell::new(false));

/// The hardware used by the benchmark harness. There is only a single instance of each of these
/// peripherals, so only a single [Board] can exist.
pub struct Board {
    /// The cycle and retired-instruction counters.
    pub counters: csr::CsrCounters,
    /// The SYSINFO module, which provides the clock frequency.
    pub sysinfo: sysinfo::Sysinfo,
    /// The GPIO output port that the LEDs are connected to.
    pub gpio: gpio::GpioPort,
}

impl Board {
    /// Returns the [Board] instance the first time it is called, and [Error::AlreadyTaken] after
    /// that.
    pub fn take() -> Result<Board> {
        let already_taken = critical_section::with(|cs| TAKEN.borrow(cs).replace(true));
        if already_taken {
            return Err(Error::AlreadyTaken);
        }
        Ok(Board {
            counters: csr::CsrCounters::new(),
            sysinfo: sysinfo::Sysinfo::new(),
            gpio: gpio::GpioPort::new(),
        })
    }
}

/// Spins forever. Used once there is nothing left to do.
pub fn park() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
