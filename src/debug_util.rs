//! Contains debug utilities that may be useful for users of this crate.

use crate::reporter::{self, Frame};
use bitvec::prelude::*;

/// A wrapper struct whose [core::fmt::Display] implementation prints the frames of a 64-bit value
/// in hexadecimal, in the order in which they are shown, in two groups of four bytes each.
pub struct FormatFrames(pub u64);
impl core::fmt::Display for FormatFrames {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (idx, frame) in reporter::frames(self.0).enumerate() {
            if idx == 4 {
                write!(f, "  ")?;
            } else if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02x}", frame.byte)?;
        }
        Ok(())
    }
}

/// A wrapper struct whose [core::fmt::Display] implementation draws a logical output pattern the
/// way it appears on a row of LEDs, with the most significant bit on the left. Active outputs are
/// drawn as `#`, inactive ones as `.`.
pub struct FormatLedPattern(pub u8);
impl core::fmt::Display for FormatLedPattern {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for bit in self.0.view_bits::<Msb0>().iter().by_vals() {
            write!(f, "{}", if bit { '#' } else { '.' })?;
        }
        Ok(())
    }
}

/// A wrapper struct whose [core::fmt::Display] implementation prints a single frame, both as the LED
/// pattern that shows it and in hexadecimal.
pub struct FormatFrame(pub Frame);
impl core::fmt::Display for FormatFrame {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "frame {}: {} ({:02x})",
            self.0.position,
            FormatLedPattern(self.0.byte),
            self.0.byte
        )
    }
}

/// Logs what an observer will see when the given value is shown: one line per frame, in the order
/// in which the frames are shown.
///
/// This is useful when checking a recording of the outputs against the expected result.
pub fn log_frames(log_level: log::Level, value: u64) {
    log::log!(log_level, "--- {value} = {}", FormatFrames(value));
    for frame in reporter::frames(value) {
        log::log!(log_level, "{}", FormatFrame(frame));
    }
}
