//! Timing contract with the controller.
//!
//! The bus has no busy-flag read-back, so every transfer is followed by a
//! fixed wait that must cover the controller's worst case.

use embedded_hal::delay::DelayNs;

/// Minimum waits, in microseconds.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// Hold time for each level of the E pulse.
    pub strobe_us: u32,
    /// Time for the controller to store one character.
    pub write_us: u32,
    /// Time for the controller to execute any instruction, clear included.
    pub instruction_us: u32,
}

impl Timing {
    /// Datasheet minimums: 3 us pulse, 50 us data write, 1.53 ms instruction.
    pub const DEFAULT: Timing = Timing {
        strobe_us: 3,
        write_us: 50,
        instruction_us: 1530,
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Calibrated spin loop.
///
/// For targets without a timer to spare. The calibration only ever rounds
/// up, so a delay is never shorter than requested at the given clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusyWait {
    iterations_per_us: u32,
}

impl BusyWait {
    /// Spin loop doing `iterations_per_us` iterations per microsecond.
    pub const fn new(iterations_per_us: u32) -> Self {
        BusyWait { iterations_per_us }
    }

    /// Calibrates for a core running at `cpu_hz`, where one loop iteration
    /// takes `cycles_per_iteration` cycles.
    ///
    /// An iteration is a counter increment, compare, branch and an opaque
    /// use of the counter, so `cycles_per_iteration` is at least 3 to 4 on a
    /// simple in-order core and comes from the target's instruction timings.
    /// Passing too low a value only makes delays longer. Zero counts as one.
    pub const fn from_cpu_hz(cpu_hz: u32, cycles_per_iteration: u32) -> Self {
        let cycles_per_iteration = if cycles_per_iteration == 0 {
            1
        } else {
            cycles_per_iteration
        };
        let per_second = cpu_hz.div_ceil(cycles_per_iteration);
        let per_us = per_second.div_ceil(1_000_000);
        BusyWait {
            iterations_per_us: if per_us == 0 { 1 } else { per_us },
        }
    }

    /// Loop count that covers `ns` nanoseconds.
    pub fn iterations_for_ns(&self, ns: u32) -> u64 {
        (u64::from(ns) * u64::from(self.iterations_per_us)).div_ceil(1000)
    }
}

impl DelayNs for BusyWait {
    fn delay_ns(&mut self, ns: u32) {
        spin(self.iterations_for_ns(ns));
    }
}

/// Runs `iterations` loop passes and returns how many ran.
///
/// `black_box` keeps every pass observable to the optimiser, which would
/// otherwise drop the loop on targets where `spin_loop` emits nothing.
fn spin(iterations: u64) -> u64 {
    let mut passes = 0;
    for i in 0..iterations {
        core::hint::black_box(i);
        core::hint::spin_loop();
        passes += 1;
    }
    passes
}
