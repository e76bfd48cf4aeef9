//! GPIO port the display bus is wired to.
//!
//! Wiring, as bits of one 8-bit port:
//!
//! | Bit | Line |
//! |-----|------|
//! | 0-3 | DB4-DB7 |
//! | 4   | RS |
//! | 5   | E |

use embedded_hal::digital::{ErrorType, OutputPin, PinState};

/// Port bits carrying the data nibble.
pub const DATA_MASK: u8 = 0x0F;
/// Register-select line.
pub const RS: u8 = 1 << 4;
/// Strobe (enable) line. Data is latched on its falling edge.
pub const EN: u8 = 1 << 5;
/// Pattern left on the bus between writes: RS high, data and E low.
pub const IDLE: u8 = RS;
/// Direction value that makes every line an output. A set bit marks an input.
pub const ALL_OUTPUT: u8 = 0x00;

/// An 8-bit GPIO port with a direction register.
///
/// The driver owns the bus only for the duration of one write; the direction
/// register is read before and written back after, so other lines of the
/// port keep whatever configuration the rest of the firmware gave them.
pub trait Port: ErrorType {
    /// Current direction register (set bit = input).
    fn direction(&mut self) -> Result<u8, Self::Error>;

    /// Overwrites the direction register.
    fn set_direction(&mut self, direction: u8) -> Result<(), Self::Error>;

    /// Drives all output lines of the port at once.
    fn write(&mut self, value: u8) -> Result<(), Self::Error>;

    /// Samples the port.
    ///
    /// On parts with pin-change interrupts this also resets the change
    /// detector, which the driver relies on after releasing the bus.
    fn read(&mut self) -> Result<u8, Self::Error>;
}

impl<P: Port + ?Sized> Port for &mut P {
    fn direction(&mut self) -> Result<u8, Self::Error> {
        P::direction(self)
    }

    fn set_direction(&mut self, direction: u8) -> Result<(), Self::Error> {
        P::set_direction(self, direction)
    }

    fn write(&mut self, value: u8) -> Result<(), Self::Error> {
        P::write(self, value)
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        P::read(self)
    }
}

/// A [`Port`] assembled from six individual output pins.
///
/// For boards where the display lines are not one contiguous port register.
/// The pins are permanently outputs, so direction changes are ignored, and
/// `read` reports the last value written.
pub struct PinPort<DB, RSPIN, ENPIN> {
    data: [DB; 4],
    rs: RSPIN,
    en: ENPIN,
    latch: Option<u8>,
}

impl<DB, RSPIN, ENPIN> PinPort<DB, RSPIN, ENPIN>
where
    DB: OutputPin,
    RSPIN: OutputPin<Error = DB::Error>,
    ENPIN: OutputPin<Error = DB::Error>,
{
    /// Creates a port from the four data pins (DB4 first) and the two control pins.
    pub fn new(data: [DB; 4], rs: RSPIN, en: ENPIN) -> Self {
        PinPort {
            data,
            rs,
            en,
            latch: None,
        }
    }

    /// Gives the pins back.
    pub fn release(self) -> ([DB; 4], RSPIN, ENPIN) {
        (self.data, self.rs, self.en)
    }
}

impl<DB, RSPIN, ENPIN> ErrorType for PinPort<DB, RSPIN, ENPIN>
where
    DB: OutputPin,
    RSPIN: OutputPin<Error = DB::Error>,
    ENPIN: OutputPin<Error = DB::Error>,
{
    type Error = DB::Error;
}

impl<DB, RSPIN, ENPIN> Port for PinPort<DB, RSPIN, ENPIN>
where
    DB: OutputPin,
    RSPIN: OutputPin<Error = DB::Error>,
    ENPIN: OutputPin<Error = DB::Error>,
{
    fn direction(&mut self) -> Result<u8, Self::Error> {
        Ok(ALL_OUTPUT)
    }

    fn set_direction(&mut self, _direction: u8) -> Result<(), Self::Error> {
        Ok(())
    }

    fn write(&mut self, value: u8) -> Result<(), Self::Error> {
        // Unknown pin states until the first write completes.
        let changed = self.latch.take().map_or(0xFF, |prev| prev ^ value);

        // Data and RS settle before E moves.
        for (bit, pin) in self.data.iter_mut().enumerate() {
            let mask = 1 << bit;
            if changed & mask != 0 {
                pin.set_state(PinState::from(value & mask != 0))?;
            }
        }
        if changed & RS != 0 {
            self.rs.set_state(PinState::from(value & RS != 0))?;
        }
        if changed & EN != 0 {
            self.en.set_state(PinState::from(value & EN != 0))?;
        }

        self.latch = Some(value);
        Ok(())
    }

    fn read(&mut self) -> Result<u8, Self::Error> {
        Ok(self.latch.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTx,
    };

    struct Pins {
        data: [PinMock; 4],
        rs: PinMock,
        en: PinMock,
    }

    impl Pins {
        fn port(&self) -> PinPort<PinMock, PinMock, PinMock> {
            PinPort::new(self.data.clone(), self.rs.clone(), self.en.clone())
        }

        fn done(&mut self) {
            self.data.iter_mut().for_each(|pin| pin.done());
            self.rs.done();
            self.en.done();
        }
    }

    #[test]
    fn test_first_write_drives_every_line() {
        let mut pins = Pins {
            data: [
                PinMock::new(&[PinTx::set(PinState::High)]),
                PinMock::new(&[PinTx::set(PinState::High)]),
                PinMock::new(&[PinTx::set(PinState::Low)]),
                PinMock::new(&[PinTx::set(PinState::Low)]),
            ],
            rs: PinMock::new(&[PinTx::set(PinState::High)]),
            en: PinMock::new(&[PinTx::set(PinState::Low)]),
        };

        let mut port = pins.port();
        port.write(0x13).unwrap();
        assert_eq!(port.read().unwrap(), 0x13);

        pins.done();
    }

    #[test]
    fn test_strobe_only_toggles_enable() {
        let mut pins = Pins {
            data: [
                PinMock::new(&[PinTx::set(PinState::Low)]),
                PinMock::new(&[PinTx::set(PinState::Low)]),
                PinMock::new(&[PinTx::set(PinState::High)]),
                PinMock::new(&[PinTx::set(PinState::Low)]),
            ],
            rs: PinMock::new(&[PinTx::set(PinState::Low)]),
            en: PinMock::new(&[
                PinTx::set(PinState::Low),
                PinTx::set(PinState::High),
                PinTx::set(PinState::Low),
            ]),
        };

        let mut port = pins.port();
        port.write(0x04).unwrap();
        port.write(0x04 | EN).unwrap();
        port.write(0x04).unwrap();

        pins.done();
    }

    #[test]
    fn test_direction_is_fixed_output() {
        let mut pins = Pins {
            data: [
                PinMock::new(&[]),
                PinMock::new(&[]),
                PinMock::new(&[]),
                PinMock::new(&[]),
            ],
            rs: PinMock::new(&[]),
            en: PinMock::new(&[]),
        };

        let mut port = pins.port();
        port.set_direction(0xFF).unwrap();
        assert_eq!(port.direction().unwrap(), ALL_OUTPUT);
        assert_eq!(port.read().unwrap(), 0);

        pins.done();
    }
}
