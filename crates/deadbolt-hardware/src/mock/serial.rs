//! In-memory serial link.
//!
//! [`MockSerialLink::pair`] creates two connected endpoints over a pair of
//! byte channels: reliable, in-order, no framing, exactly the contract the
//! real UART wrapper provides. Receiving blocks until the peer sends; if
//! the peer endpoint is dropped, receiving fails with a disconnect error.

use crate::{Result, traits::SerialLink};
use tokio::sync::mpsc;

/// Capacity of each direction's byte channel. Large enough that the
/// lock-step protocol (at most `PASS_SIZE` bytes in flight) never blocks a
/// sender.
const CHANNEL_CAPACITY: usize = 64;

/// One endpoint of an in-memory serial link.
///
/// # Examples
///
/// ```
/// use deadbolt_hardware::mock::MockSerialLink;
/// use deadbolt_hardware::traits::SerialLink;
///
/// #[tokio::main]
/// async fn main() -> deadbolt_hardware::Result<()> {
///     let (mut left, mut right) = MockSerialLink::pair();
///
///     left.send_byte(0x42).await?;
///     assert_eq!(right.recv_byte().await?, 0x42);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSerialLink {
    tx: mpsc::Sender<u8>,
    rx: mpsc::Receiver<u8>,
}

impl MockSerialLink {
    /// Create two connected endpoints.
    #[must_use]
    pub fn pair() -> (Self, Self) {
        let (left_tx, right_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (right_tx, left_rx) = mpsc::channel(CHANNEL_CAPACITY);
        (
            MockSerialLink {
                tx: left_tx,
                rx: left_rx,
            },
            MockSerialLink {
                tx: right_tx,
                rx: right_rx,
            },
        )
    }
}

impl SerialLink for MockSerialLink {
    async fn send_byte(&mut self, byte: u8) -> Result<()> {
        self.tx
            .send(byte)
            .await
            .map_err(|_| crate::HardwareError::disconnected("serial peer closed"))
    }

    async fn recv_byte(&mut self) -> Result<u8> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| crate::HardwareError::disconnected("serial peer closed"))
    }
}
