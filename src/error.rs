/// Possible errors from the LCD driver.
///
/// The controller never acknowledges a transfer, so the only failures that
/// can be observed come from the GPIO port itself.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, PartialEq, Eq)]
pub enum LcdError<E> {
    /// Error from the GPIO port driving the bus.
    Port(E),
    /// Decimal text did not fit the conversion buffer.
    Overflow,
}

impl<E> From<E> for LcdError<E> {
    fn from(value: E) -> Self {
        Self::Port(value)
    }
}
