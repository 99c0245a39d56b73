//! A [log::Log] implementation that writes to UART0.
//!
//! The UART is not configured here: its baud rate etc. must already have been set up, which the
//! NEORV32 bootloader does before it starts the application.

use core::fmt::Write;
use core::str::FromStr;

/// The base address of the UART0 module.
const UART0_BASE: usize = 0xFFF5_0000;
/// The offset of the CTRL register.
const UART_CTRL: usize = 0x0;
/// The offset of the DATA register.
const UART_DATA: usize = 0x4;
/// The CTRL register bit that is set while the TX FIFO is full.
const UART_CTRL_TX_FULL: u32 = 1 << 21;

/// Writes bytes to UART0, blocking while its TX FIFO is full.
struct Uart0;

impl Uart0 {
    fn write_byte(&mut self, byte: u8) {
        // SAFETY: CTRL and DATA are plain registers of the UART0 module. Writing to DATA only
        // enqueues a byte for transmission.
        unsafe {
            while core::ptr::read_volatile((UART0_BASE + UART_CTRL) as *const u32)
                & UART_CTRL_TX_FULL
                != 0
            {}
            core::ptr::write_volatile((UART0_BASE + UART_DATA) as *mut u32, u32::from(byte));
        }
    }
}

impl Write for Uart0 {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

struct UartLogger;

impl log::Log for UartLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        // Writing to the UART can't fail.
        let _ = writeln!(Uart0, "{:5} {}", record.level(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: UartLogger = UartLogger;

/// Installs the UART logger, using the log level given by the `LEDBENCH_LOGLEVEL` environment
/// variable at build time (e.g. "debug"), or "info" if it isn't set or can't be parsed.
pub fn init_logger_from_env() {
    let level = option_env!("LEDBENCH_LOGLEVEL")
        .and_then(|level| log::LevelFilter::from_str(level).ok())
        .unwrap_or(log::LevelFilter::Info);
    init_logger(level);
}

/// Installs the UART logger with the given maximum log level.
pub fn init_logger(level: log::LevelFilter) {
    // SAFETY: there's only a single thread of execution, and this is called before any logging
    // happens.
    unsafe {
        // This can only fail if a logger was already installed, in which case we keep that one.
        let _ = log::set_logger_racy(&LOGGER);
    }
    log::set_max_level(level);
}
