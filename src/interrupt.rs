//! Masking interrupts around a bus transfer.
//!
//! An interrupt handler elsewhere in the firmware may touch the same port, so
//! a write runs with interrupts disabled and the previous enable state is put
//! back afterwards. [`InterruptGuard`] restores it on every exit path,
//! including early returns on port errors.

use critical_section::RestoreState;

/// Global interrupt enable control.
pub trait InterruptControl {
    /// Snapshot of the enable state taken by [`disable`](Self::disable).
    type State;

    /// Disables interrupts and returns the state before the call.
    fn disable(&mut self) -> Self::State;

    /// Puts back a state returned by [`disable`](Self::disable).
    ///
    /// Interrupts are only re-enabled if they were enabled when it was taken.
    fn restore(&mut self, state: Self::State);

    /// Clears pending pin-change and external-interrupt flags that toggling
    /// the bus may have raised.
    fn clear_pending(&mut self) {}
}

impl<I: InterruptControl + ?Sized> InterruptControl for &mut I {
    type State = I::State;

    fn disable(&mut self) -> Self::State {
        I::disable(self)
    }

    fn restore(&mut self, state: Self::State) {
        I::restore(self, state)
    }

    fn clear_pending(&mut self) {
        I::clear_pending(self)
    }
}

/// Scoped critical section.
///
/// Must be the outermost critical section around the bus: the driver is not
/// safe to call from an interrupt handler while the main context uses it.
pub struct InterruptGuard<'a, I: InterruptControl> {
    control: &'a mut I,
    saved: Option<I::State>,
}

impl<'a, I: InterruptControl> InterruptGuard<'a, I> {
    /// Disables interrupts until the guard is dropped.
    pub fn new(control: &'a mut I) -> Self {
        let saved = control.disable();
        InterruptGuard {
            control,
            saved: Some(saved),
        }
    }

    /// Clears pending interrupt flags without leaving the critical section.
    pub fn clear_pending(&mut self) {
        self.control.clear_pending();
    }
}

impl<I: InterruptControl> Drop for InterruptGuard<'_, I> {
    fn drop(&mut self) {
        if let Some(state) = self.saved.take() {
            self.control.restore(state);
        }
    }
}

/// Interrupt control through the [`critical_section`] implementation of the
/// target (for example `cortex-m` or `avr-device` with their
/// `critical-section` features).
///
/// Use it only through [`InterruptGuard`] (which is what [`Lcd`](crate::Lcd)
/// does). Calling [`disable`](InterruptControl::disable) and
/// [`restore`](InterruptControl::restore) directly must keep them paired and
/// strictly nested, or the target's critical section is left unbalanced.
#[derive(Debug, Default, Clone, Copy)]
pub struct CriticalSectionInterrupts;

impl InterruptControl for CriticalSectionInterrupts {
    type State = RestoreState;

    /// Enters the critical section. Pair with [`restore`](Self::restore)
    /// through [`InterruptGuard`].
    fn disable(&mut self) -> Self::State {
        // SAFETY: callers pair this with `restore` in nesting order, as
        // `InterruptGuard` does by releasing exactly once on drop.
        unsafe { critical_section::acquire() }
    }

    /// Leaves the critical section entered by the matching `disable`.
    fn restore(&mut self, state: Self::State) {
        // SAFETY: `state` came from the matching `acquire` above.
        unsafe { critical_section::release(state) }
    }
}

/// For targets where nothing else touches the display port.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterrupts;

impl InterruptControl for NoInterrupts {
    type State = ();

    fn disable(&mut self) -> Self::State {}

    fn restore(&mut self, _state: Self::State) {}
}
