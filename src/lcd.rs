use core::fmt::Write;

use embedded_hal::delay::DelayNs;
use heapless::String;

use crate::{
    command::{Command, INIT_SEQUENCE, LINE_WIDTH, Mode},
    delay::Timing,
    error::LcdError,
    interrupt::{InterruptControl, InterruptGuard},
    port::{ALL_OUTPUT, DATA_MASK, EN, IDLE, Port, RS},
};

/// Longest decimal text of an `i32`: sign plus ten digits.
const VALUE_TEXT_LEN: usize = 11;

/// Driver for a 16x2 character LCD on a bit-banged 4-bit bus.
pub struct Lcd<P, I, D> {
    port: P,
    interrupts: I,
    delay: D,
    timing: Timing,
}

impl<P, I, D, E> Lcd<P, I, D>
where
    P: Port<Error = E>,
    I: InterruptControl,
    D: DelayNs,
{
    /// Creates a new instance of the LCD driver with datasheet timing.
    ///
    /// # Arguments
    ///
    /// * `port` - The GPIO port the display bus is wired to.
    /// * `interrupts` - Global interrupt control, masked during each transfer.
    /// * `delay` - A delay provider implementing the `DelayNs` trait.
    ///
    /// The display is not touched until [`init`](Self::init) is called.
    pub fn new(port: P, interrupts: I, delay: D) -> Self {
        Self::with_timing(port, interrupts, delay, Timing::DEFAULT)
    }

    /// Same as [`new`](Self::new), with explicit minimum waits.
    pub fn with_timing(port: P, interrupts: I, delay: D, timing: Timing) -> Self {
        Lcd {
            port,
            interrupts,
            delay,
            timing,
        }
    }

    /// Gives back the port, interrupt control and delay.
    pub fn release(self) -> (P, I, D) {
        (self.port, self.interrupts, self.delay)
    }

    /// Runs the power-up configuration and clears the display.
    ///
    /// Must be called once before anything else is written.
    pub fn init(&mut self) -> Result<(), LcdError<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("lcd: init, timing {}", self.timing);

        for command in INIT_SEQUENCE {
            self.command(command)?;
        }
        self.clear()
    }

    /// Sends one byte as two nibbles, high nibble first.
    ///
    /// Interrupts are masked and every port line is an output for the
    /// duration of the transfer; both are put back before returning, even
    /// when the port reports an error.
    pub fn write(&mut self, byte: u8, mode: Mode) -> Result<(), LcdError<E>> {
        let mut guard = InterruptGuard::new(&mut self.interrupts);

        let saved = self.port.direction()?;
        self.port.set_direction(ALL_OUTPUT)?;

        let sent = Self::shift_out(
            &mut self.port,
            &mut self.delay,
            self.timing.strobe_us,
            byte,
            mode,
        );
        // RS high, data and E low, even after a failed strobe: a stray high E
        // would latch a nibble at the start of the next transfer.
        let parked = self.port.write(IDLE);
        let restored = self.port.set_direction(saved);
        // Reading the port resets its change detector after the line toggling.
        let sampled = self.port.read();
        guard.clear_pending();
        drop(guard);

        sent?;
        parked?;
        restored?;
        sampled?;
        Ok(())
    }

    /// Sends an instruction and waits for the controller to execute it.
    pub fn command(&mut self, command: Command) -> Result<(), LcdError<E>> {
        self.write(command.code(), Mode::Command)?;
        self.delay.delay_us(self.timing.instruction_us);
        Ok(())
    }

    /// Clears the display and homes the cursor to row 0, column 0.
    pub fn clear(&mut self) -> Result<(), LcdError<E>> {
        self.command(Command::ClearDisplay)?;
        self.command(Command::ReturnHome)
    }

    /// Writes one character at the cursor.
    ///
    /// Nothing stops a write past the visible line; the controller wraps or
    /// drops it.
    pub fn put_char(&mut self, c: u8) -> Result<(), LcdError<E>> {
        self.write(c, Mode::Data)?;
        self.delay.delay_us(self.timing.write_us);
        Ok(())
    }

    /// Writes characters until a 0 byte, the end of `text`, or one full line
    /// of 16 characters, whichever comes first.
    pub fn put_bytes(&mut self, text: &[u8]) -> Result<(), LcdError<E>> {
        for &c in text.iter().take(LINE_WIDTH).take_while(|&&c| c != 0) {
            self.put_char(c)?;
        }
        Ok(())
    }

    /// [`put_bytes`](Self::put_bytes) for string slices.
    pub fn put_str(&mut self, text: &str) -> Result<(), LcdError<E>> {
        self.put_bytes(text.as_bytes())
    }

    /// Moves the cursor to `column` on `row`.
    ///
    /// Row 0 is the top line, any other row the bottom line. The column is
    /// not checked against the display width.
    ///
    /// The address command is followed by the character write wait rather
    /// than no wait at all: setting the address takes the controller about
    /// 37 us, so a character sent straight after could arrive before it is done.
    pub fn set_cursor(&mut self, column: u8, row: u8) -> Result<(), LcdError<E>> {
        let command = Command::cursor(column, row);

        #[cfg(feature = "defmt")]
        defmt::trace!("lcd: cursor {}", command);

        self.write(command.code(), Mode::Command)?;
        self.delay.delay_us(self.timing.write_us);
        Ok(())
    }

    /// Writes `value` in decimal at the cursor, with a leading `-` when negative.
    pub fn display_value(&mut self, value: i32) -> Result<(), LcdError<E>> {
        let mut text: String<VALUE_TEXT_LEN> = String::new();
        write!(text, "{value}").map_err(|_| LcdError::Overflow)?;
        self.put_str(&text)
    }

    /// Presents both nibbles, each followed by an E pulse.
    fn shift_out(
        port: &mut P,
        delay: &mut D,
        strobe_us: u32,
        byte: u8,
        mode: Mode,
    ) -> Result<(), E> {
        let rs = match mode {
            Mode::Command => 0,
            Mode::Data => RS,
        };

        for nibble in [byte >> 4, byte & DATA_MASK] {
            let bus = nibble | rs;
            port.write(bus)?;
            Self::strobe(port, delay, bus, strobe_us)?;
        }
        Ok(())
    }

    /// Pulses E high then low, holding each level for `strobe_us`.
    fn strobe(port: &mut P, delay: &mut D, bus: u8, strobe_us: u32) -> Result<(), E> {
        port.write(bus | EN)?;
        delay.delay_us(strobe_us);
        port.write(bus)?;
        delay.delay_us(strobe_us);
        Ok(())
    }
}
