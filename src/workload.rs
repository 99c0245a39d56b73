//! The synthetic workloads that the harness times.
//!
//! Both kernels are dominated by 32-bit multiplications, so that the measured cycle counts mostly
//! reflect the throughput of the core's multiplier (rather than e.g. memory or branch overhead). All
//! arithmetic wraps silently: the accumulated values are meaningless, they only exist to keep the
//! work observable.

use ledbench_proc_macros::opaque_kernel;

/// The initial operand values used by the kernels. Changing these changes the work being measured,
/// so they must stay the same across runs that are compared with each other.
pub mod initial {
    pub const A: u32 = 12345;
    pub const B: u32 = 6789;
    pub const C: u32 = 42407;
    pub const D: u32 = 77;
}

/// Selects which of the kernels to run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum KernelVariant {
    /// See [mul_four_wide].
    FourWide,
    /// See [mul_feedback].
    #[default]
    Feedback,
}

impl KernelVariant {
    /// Runs the selected kernel for the given number of iterations, returning its accumulator.
    pub fn run(self, iterations: u32) -> u32 {
        match self {
            KernelVariant::FourWide => mul_four_wide(iterations),
            KernelVariant::Feedback => mul_feedback(iterations),
        }
    }
}

/// Computes four independent products per iteration, from two pairs of operands which are
/// incremented every iteration. None of the multiplier inputs depend on the result of a previous
/// multiplication, so a pipelined multiplier can be kept fully busy.
#[opaque_kernel]
pub fn mul_four_wide(iterations: u32) -> u32 {
    let (mut a, b, mut c, d) = (initial::A, initial::B, initial::C, initial::D);
    let mut acc = 0u32;
    for _ in 0..iterations {
        let p0 = a.wrapping_mul(b);
        let p1 = c.wrapping_mul(d);
        let p2 = a.wrapping_add(3).wrapping_mul(b.wrapping_add(5));
        let p3 = c.wrapping_add(7).wrapping_mul(d.wrapping_add(11));
        acc = acc
            .wrapping_add(p0)
            .wrapping_add(p1)
            .wrapping_add(p2)
            .wrapping_add(p3);
        a = a.wrapping_add(1);
        c = c.wrapping_add(1);
    }
    acc
}

/// Computes one product per iteration, and folds the accumulator back into one of the multiplier's
/// operands. Each multiplication therefore depends on the result of the previous one, which
/// measures the multiplier's latency rather than its throughput, and which the compiler can't
/// reorder or vectorize away.
#[opaque_kernel]
pub fn mul_feedback(iterations: u32) -> u32 {
    let (mut a, mut b) = (initial::A, initial::B);
    let mut acc = 0u32;
    for _ in 0..iterations {
        acc = acc.wrapping_add(a.wrapping_mul(b));
        a = a.wrapping_add(1);
        b ^= acc;
    }
    acc
}

/// A location that kernel results are stored to, to make them observable.
///
/// Stores and loads are volatile, so the compiler must assume that some other party may read the
/// stored value, and hence can't conclude that the computation that produced it was unnecessary.
/// This relies on the optimizer respecting volatile accesses to memory it otherwise fully
/// controls, which holds for rustc/LLVM.
#[derive(Debug, Default)]
pub struct Sink {
    value: u32,
}

impl Sink {
    /// Constructs a new [Sink] instance.
    pub const fn new() -> Sink {
        Sink { value: 0 }
    }

    /// Stores the given value.
    pub fn observe(&mut self, value: u32) {
        // SAFETY: the pointer is derived from a live, exclusive reference.
        unsafe { core::ptr::write_volatile(&mut self.value, value) }
    }

    /// Returns the most recently stored value.
    pub fn last(&self) -> u32 {
        // SAFETY: the pointer is derived from a live reference.
        unsafe { core::ptr::read_volatile(&self.value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::Wrapping;

    /// A straightforward model of [mul_feedback], written with [Wrapping] rather than explicit
    /// wrapping operations.
    fn feedback_model(iterations: u32) -> u32 {
        let mut a = Wrapping(12345u32);
        let mut b = Wrapping(6789u32);
        let mut acc = Wrapping(0u32);
        for _ in 0..iterations {
            acc += a * b;
            a += Wrapping(1);
            b ^= acc;
        }
        acc.0
    }

    /// Same as [feedback_model], but for [mul_four_wide].
    fn four_wide_model(iterations: u32) -> u32 {
        let (mut a, b) = (Wrapping(12345u32), Wrapping(6789u32));
        let (mut c, d) = (Wrapping(42407u32), Wrapping(77u32));
        let mut acc = Wrapping(0u32);
        for _ in 0..iterations {
            acc += a * b + c * d + (a + Wrapping(3)) * (b + Wrapping(5))
                + (c + Wrapping(7)) * (d + Wrapping(11));
            a += Wrapping(1);
            c += Wrapping(1);
        }
        acc.0
    }

    #[test]
    fn zero_iterations_return_initial_accumulator() {
        assert_eq!(0, mul_feedback(0));
        assert_eq!(0, mul_four_wide(0));
        assert_eq!(0, KernelVariant::Feedback.run(0));
        assert_eq!(0, KernelVariant::FourWide.run(0));
    }

    #[test]
    fn first_iterations_by_hand() {
        // 12345 * 6789 = 83810205.
        assert_eq!(83_810_205, mul_feedback(1));
        // 12346 * (6789 ^ 83810205) = 12346 * 83807512 = 1034687543152 (3895392112 mod 2^32),
        // plus 83810205.
        assert_eq!(83_810_205u32.wrapping_add(3_895_392_112), mul_feedback(2));
        // 83810205 + 42407 * 77 + 12348 * 6794 + 42414 * 88.
        assert_eq!(
            83_810_205 + 3_265_339 + 83_892_312 + 3_732_432,
            mul_four_wide(1)
        );
    }

    #[test]
    fn feedback_matches_model_for_timed_iteration_count() {
        assert_eq!(feedback_model(5_000_000), mul_feedback(5_000_000));
    }

    #[test]
    fn four_wide_matches_model() {
        for iterations in [1, 2, 3, 1_000, 100_000] {
            assert_eq!(four_wide_model(iterations), mul_four_wide(iterations));
        }
    }

    #[test]
    fn kernels_are_deterministic() {
        for variant in [KernelVariant::FourWide, KernelVariant::Feedback] {
            let first = variant.run(1_000);
            for _ in 0..3 {
                assert_eq!(first, variant.run(1_000));
            }
        }
    }

    #[test]
    fn variant_dispatch() {
        assert_eq!(mul_four_wide(10), KernelVariant::FourWide.run(10));
        assert_eq!(mul_feedback(10), KernelVariant::Feedback.run(10));
        assert_eq!(KernelVariant::Feedback, KernelVariant::default());
    }

    #[test]
    fn sink_keeps_last_value() {
        let mut sink = Sink::new();
        assert_eq!(0, sink.last());
        sink.observe(1);
        sink.observe(mul_feedback(3));
        assert_eq!(mul_feedback(3), sink.last());
    }
}
