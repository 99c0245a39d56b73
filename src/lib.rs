//! A microbenchmark harness for soft-core RISC-V processors.
//!
//! The harness times a multiply-heavy workload using the core's cycle and retired-instruction
//! counters, and reports the results on an 8-bit parallel output (typically a row of LEDs), one
//! byte at a time. Everything in this crate is hardware-independent: the counters, the clock
//! frequency, the output port and the delays are all reached through the traits defined in the
//! [counter], [delay] and [reporter] modules, and are implemented for a specific board elsewhere.

// The code in this crate runs on bare-metal targets, but tests are run on the host.
#![cfg_attr(not(test), no_std)]

pub mod counter;
pub mod debug_util;
pub mod delay;
pub mod harness;
pub mod reporter;
pub mod workload;
