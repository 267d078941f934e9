//! Peripheral trait definitions.
//!
//! These traits establish the contract between the node logic and its
//! peripherals, enabling substitution between the mock implementations in
//! [`crate::mock`] and real device drivers. Blocking peripherals use native
//! `async fn` methods (Edition 2024 RPITIT); feedback-free actuators are
//! synchronous so they can be driven from interrupt context.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A single key press from the panel keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),

    /// Enter/terminator key.
    Enter,

    /// Plus key; selects "open door" in the options menu.
    Plus,

    /// Minus key; selects "change passcode" in the options menu.
    Minus,
}

impl Key {
    /// Create a digit key with validation.
    ///
    /// # Errors
    /// Returns an error if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(crate::error::HardwareError::invalid_data(format!(
                "Digit must be 0-9, got {d}"
            )));
        }
        Ok(Self::Digit(d))
    }

    /// Check if this key is a digit.
    #[must_use]
    pub fn is_digit(&self) -> bool {
        matches!(self, Self::Digit(_))
    }

    /// Get the digit value if this is a digit key.
    #[must_use]
    pub fn as_digit(&self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(*d),
            _ => None,
        }
    }
}

/// Keypad device abstraction.
///
/// One key code per call; the call blocks until a key press is detected.
pub trait Keypad: Send {
    /// Read the next key press.
    ///
    /// # Errors
    /// Returns an error if the device is disconnected.
    async fn read_key(&mut self) -> Result<Key>;
}

/// Character display abstraction (2 rows × 16 columns on the panel).
///
/// Fire-and-forget: the display gives no feedback, so these methods cannot
/// fail and return nothing. Like [`MotorDrive`], the trait takes `&self`
/// and requires `Sync` because the door timeline reports its phase changes
/// from the timer interrupt path.
pub trait Display: Send + Sync {
    /// Clear the display and home the cursor.
    fn clear(&self);

    /// Move the cursor to (row, col).
    fn move_cursor(&self, row: u8, col: u8);

    /// Print a string at the cursor, advancing it.
    fn print_str(&self, text: &str);

    /// Print a single character at the cursor, advancing it.
    fn print_char(&self, ch: char);
}

/// Three-valued door motor command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotorCommand {
    /// Rotate forward (door opening).
    Forward,
    /// Rotate in reverse (door closing).
    Reverse,
    /// Stop.
    Stop,
}

/// Door motor abstraction. Fire-and-forget and `Sync`, because the
/// scheduler issues commands from the timer interrupt path.
pub trait MotorDrive: Send + Sync {
    /// Issue a motor command.
    fn rotate(&self, command: MotorCommand);
}

/// Alarm siren abstraction. Fire-and-forget and `Sync` for the same reason
/// as [`MotorDrive`].
pub trait AlarmSiren: Send + Sync {
    /// Switch the siren on or off.
    fn set_active(&self, active: bool);
}

/// Half-duplex serial link between the two nodes.
///
/// Reliable, in-order, byte-oriented, no framing. `recv_byte` blocks until
/// a byte is available; there is no timeout, so a stalled peer stalls its
/// partner, which is an accepted property of the closed two-node system.
pub trait SerialLink: Send {
    /// Transmit one byte.
    ///
    /// # Errors
    /// Returns an error if the peer endpoint is gone.
    async fn send_byte(&mut self, byte: u8) -> Result<()>;

    /// Receive one byte, blocking until one is available.
    ///
    /// # Errors
    /// Returns an error if the peer endpoint is gone.
    async fn recv_byte(&mut self) -> Result<u8>;
}

/// Addressed persistent byte store (the keeper's credential EEPROM).
///
/// Implementations honor the part's settle delay between consecutive
/// operations; callers simply await each operation.
pub trait PersistentStore: Send {
    /// Write one byte at an absolute address.
    ///
    /// # Errors
    /// Returns an error if the address is outside the device.
    async fn write_byte(&mut self, addr: u16, value: u8) -> Result<()>;

    /// Read one byte from an absolute address.
    ///
    /// # Errors
    /// Returns an error if the address is outside the device.
    async fn read_byte(&mut self, addr: u16) -> Result<u8>;
}
