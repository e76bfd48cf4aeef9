//! Instruction set of the display controller, limited to what the driver issues.

/// Base DDRAM address of the top line.
pub const ROW_0_BASE: u8 = 0x80;
/// Base DDRAM address of the bottom line.
pub const ROW_1_BASE: u8 = 0xC0;

/// Number of visible characters on one line.
pub const LINE_WIDTH: usize = 16;

/// Which controller register a transfer targets, chosen by the RS line.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// RS low: the byte is an instruction.
    Command,
    /// RS high: the byte is character data.
    Data,
}

/// Controller instructions.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// First power-up pulse, sent while the controller may still be in 8-bit mode.
    Initialise,
    /// Switch transfers to two nibbles per byte.
    FourBitMode,
    /// Two-line display geometry.
    TwoLineMode,
    /// Advance the cursor after every write.
    MoveAfterWrite,
    /// Display on, cursor off, no blink.
    DisplayOn,
    /// Clear the display and home the cursor.
    ClearDisplay,
    /// Home the cursor only.
    ReturnHome,
    /// Move the cursor to a raw DDRAM address (already including the row base).
    SetAddress(u8),
}

impl Command {
    /// Cursor command for `column` on `row`.
    ///
    /// Row 0 selects the top line; every other value aliases to the bottom
    /// line. The column is not bounds checked and wraps like the 8-bit sum
    /// the controller receives.
    pub fn cursor(column: u8, row: u8) -> Self {
        let base = if row == 0 { ROW_0_BASE } else { ROW_1_BASE };
        Command::SetAddress(base.wrapping_add(column))
    }

    /// The byte put on the bus for this instruction.
    pub fn code(self) -> u8 {
        match self {
            Command::Initialise => 0x33,
            Command::FourBitMode => 0x32,
            Command::TwoLineMode => 0x2C,
            Command::MoveAfterWrite => 0x06,
            Command::DisplayOn => 0x0C,
            Command::ClearDisplay => 0x01,
            Command::ReturnHome => 0x02,
            Command::SetAddress(address) => address,
        }
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.code()
    }
}

/// Power-up configuration, issued in order before the display is cleared.
pub const INIT_SEQUENCE: [Command; 5] = [
    Command::Initialise,
    Command::FourBitMode,
    Command::TwoLineMode,
    Command::MoveAfterWrite,
    Command::DisplayOn,
];
