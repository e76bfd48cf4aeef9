use embedded_hal::digital::InputPin;

/// Running count from an entry sensor and an exit sensor.
///
/// Each poll checks both sensors: an active entry sensor adds one, an active
/// exit sensor takes one away. The count is a 16-bit unsigned value that
/// wraps in both directions.
pub struct PresenceCounter<ENTRY, EXIT> {
    entry: ENTRY,
    exit: EXIT,
    count: u16,
}

impl<ENTRY, EXIT, E> PresenceCounter<ENTRY, EXIT>
where
    ENTRY: InputPin<Error = E>,
    EXIT: InputPin<Error = E>,
{
    /// Creates a counter starting at zero.
    pub fn new(entry: ENTRY, exit: EXIT) -> Self {
        PresenceCounter {
            entry,
            exit,
            count: 0,
        }
    }

    /// Samples both sensors once and returns the updated count.
    pub fn poll(&mut self) -> Result<u16, E> {
        if self.entry.is_high()? {
            self.count = self.count.wrapping_add(1);
        }
        if self.exit.is_high()? {
            self.count = self.count.wrapping_sub(1);
        }
        Ok(self.count)
    }

    /// Current count without sampling.
    pub fn count(&self) -> u16 {
        self.count
    }
}
