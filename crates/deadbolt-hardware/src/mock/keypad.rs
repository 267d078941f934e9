//! Mock keypad implementation for testing and development.
//!
//! Simulates the panel keypad by receiving key presses through an internal
//! channel; tests push keys programmatically via a [`MockKeypadHandle`].

use crate::{
    Result,
    traits::{Key, Keypad},
};
use tokio::sync::mpsc;

/// Mock keypad device.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::mock::MockKeypad;
/// use deadbolt_hardware::traits::{Key, Keypad};
///
/// #[tokio::main]
/// async fn main() -> deadbolt_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.send_key(Key::Digit(7)).await?;
///     handle.send_key(Key::Enter).await?;
///
///     assert_eq!(keypad.read_key().await?, Key::Digit(7));
///     assert_eq!(keypad.read_key().await?, Key::Enter);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    input_rx: mpsc::Receiver<Key>,
}

impl MockKeypad {
    /// Create a new mock keypad and its control handle.
    pub fn new() -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::channel(32);
        (MockKeypad { input_rx }, MockKeypadHandle { input_tx })
    }
}

impl Keypad for MockKeypad {
    async fn read_key(&mut self) -> Result<Key> {
        self.input_rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("keypad input channel closed"))
    }
}

/// Handle for feeding key presses into a [`MockKeypad`].
///
/// Cloneable; can be shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    input_tx: mpsc::Sender<Key>,
}

impl MockKeypadHandle {
    /// Send one key press.
    ///
    /// # Errors
    /// Returns an error if the keypad has been dropped.
    pub async fn send_key(&self, key: Key) -> Result<()> {
        self.input_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("keypad input channel closed"))
    }

    /// Send a sequence of digit keys.
    ///
    /// # Errors
    /// Returns an error if any digit is greater than 9 or the keypad has
    /// been dropped.
    pub async fn send_digits(&self, digits: &[u8]) -> Result<()> {
        for &digit in digits {
            self.send_key(Key::digit(digit)?).await?;
        }
        Ok(())
    }

    /// Send a complete entry: digits followed by the enter key.
    ///
    /// # Errors
    /// Returns an error if any digit is greater than 9 or the keypad has
    /// been dropped.
    pub async fn send_entry(&self, digits: &[u8]) -> Result<()> {
        self.send_digits(digits).await?;
        self.send_key(Key::Enter).await
    }
}
